use serde::{Deserialize, Serialize};

use crate::profile::ProfilePayload;

#[derive(Debug, Serialize)]
pub struct IngredientAnalysisRequest {
    pub user_profile: ProfilePayload,
    pub ingredients: Vec<String>,
}

/// Totals reported by the service; any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub fat: Option<f64>,
    #[serde(default)]
    pub fiber: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub identified_foods: Option<String>,
    #[serde(default)]
    pub extracted_ingredients: Vec<String>,
    #[serde(default)]
    pub nutrition: NutritionTotals,
    #[serde(default)]
    pub percentage_of_daily: Option<f64>,
    #[serde(default)]
    pub daily_calorie_target: Option<f64>,
}
