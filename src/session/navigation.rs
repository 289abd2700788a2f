use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Scan,
    Dashboard,
    GroceryGuide,
    Profile,
}

impl View {
    pub const ALL: [View; 4] = [View::Scan, View::Dashboard, View::GroceryGuide, View::Profile];

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Scan => "scan",
            View::Dashboard => "dashboard",
            View::GroceryGuide => "grocery-guide",
            View::Profile => "profile",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        match wanted.as_str() {
            "grocery" | "groceries" => Ok(View::GroceryGuide),
            other => View::ALL
                .iter()
                .copied()
                .find(|v| v.as_str() == other)
                .ok_or_else(|| format!("unknown view `{s}`")),
        }
    }
}

/// Active view plus the ingredient-entry overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    pub view: View,
    pub ingredient_overlay: bool,
}

impl Navigation {
    pub fn select(&mut self, view: View) {
        self.view = view;
    }

    pub fn open_overlay(&mut self) {
        self.ingredient_overlay = true;
    }

    pub fn close_overlay(&mut self) {
        self.ingredient_overlay = false;
    }
}
