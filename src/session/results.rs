use crate::analysis::AnalysisResult;
use crate::meal_plan::{extract_grocery_list, MealPlan};

/// Latest results returned by the service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultStore {
    pub analysis: Option<AnalysisResult>,
    pub meal_plan: Option<MealPlan>,
    pub grocery_list: Vec<String>,
}

impl ResultStore {
    pub fn replace_analysis(&mut self, result: AnalysisResult) {
        self.analysis = Some(result);
    }

    /// The grocery list always follows the plan it was derived from.
    pub fn replace_meal_plan(&mut self, plan: MealPlan) {
        self.grocery_list = extract_grocery_list(plan.text());
        self.meal_plan = Some(plan);
    }
}
