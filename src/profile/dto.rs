use serde::{Deserialize, Serialize};

use super::{Allergen, DietaryPreference, HealthGoal, Sex};

/// Profile as the service expects it: age is a required integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePayload {
    pub age: u32,
    pub sex: Sex,
    pub dietary_preference: DietaryPreference,
    pub allergies: Vec<Allergen>,
    pub health_goal: HealthGoal,
    pub num_meals: u8,
}
