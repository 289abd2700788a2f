mod dto;
mod grocery;
mod guide;

pub use dto::MealPlan;
pub use grocery::extract_grocery_list;
pub use guide::{GroceryGuide, GuideCategory};

/// File name the exported plan is delivered under.
pub const PDF_FILE_NAME: &str = "meal_plan.pdf";
