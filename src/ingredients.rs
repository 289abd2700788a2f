/// Free text typed into the ingredient overlay, one ingredient per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientInput {
    text: String,
}

impl IngredientInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Non-empty trimmed lines, in order.
    pub fn lines(&self) -> Vec<String> {
        self.text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}
