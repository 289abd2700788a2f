mod dto;

pub use dto::{AnalysisResult, IngredientAnalysisRequest, NutritionTotals};

/// One rounded line of the nutrition summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub label: &'static str,
    pub value: String,
}

impl NutritionTotals {
    /// Rounded values for display; absent values show as zero.
    pub fn summary(&self) -> Vec<SummaryLine> {
        let grams = |v: Option<f64>| format!("{}g", round(v));
        vec![
            SummaryLine {
                label: "Calories",
                value: round(self.calories).to_string(),
            },
            SummaryLine {
                label: "Protein",
                value: grams(self.protein),
            },
            SummaryLine {
                label: "Carbs",
                value: grams(self.carbs),
            },
            SummaryLine {
                label: "Fat",
                value: grams(self.fat),
            },
            SummaryLine {
                label: "Fiber",
                value: grams(self.fiber),
            },
        ]
    }
}

impl AnalysisResult {
    pub fn daily_progress(&self) -> String {
        format!(
            "{}% of your {} calorie target",
            number(self.percentage_of_daily),
            number(self.daily_calorie_target)
        )
    }
}

fn round(v: Option<f64>) -> i64 {
    let v = v.unwrap_or(0.0);
    if v.is_finite() {
        v.round() as i64
    } else {
        0
    }
}

// Whole numbers print without a fractional part.
fn number(v: Option<f64>) -> String {
    match v {
        Some(v) if v.fract() == 0.0 => format!("{}", v as i64),
        Some(v) => format!("{v}"),
        None => "0".into(),
    }
}
