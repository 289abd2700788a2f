use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Generated plan text plus whatever else the service attached to it.
///
/// Serialized back unchanged as the PDF export body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub meal_plan: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl MealPlan {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            meal_plan: text.into(),
            metadata: Map::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.meal_plan
    }
}
