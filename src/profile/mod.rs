mod dto;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ValidationFailure;

pub use dto::ProfilePayload;

/// Declares a closed vocabulary that travels as a snake_case string.
macro_rules! vocabulary {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ProfileFieldError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| ProfileFieldError::InvalidValue {
                        field: stringify!($name),
                        value: s.to_string(),
                    })
            }
        }
    };
}

vocabulary!(Sex {
    Male => "male",
    Female => "female",
});

vocabulary!(DietaryPreference {
    Omnivore => "omnivore",
    Vegetarian => "vegetarian",
    Vegan => "vegan",
    Keto => "keto",
    Paleo => "paleo",
});

vocabulary!(HealthGoal {
    WeightLoss => "weight_loss",
    Maintain => "maintain",
    WeightGain => "weight_gain",
    MuscleGain => "muscle_gain",
});

vocabulary!(
    /// Allergens the profile form offers.
    Allergen {
        Nuts => "nuts",
        Dairy => "dairy",
        Gluten => "gluten",
        Shellfish => "shellfish",
        Eggs => "eggs",
        Soy => "soy",
        Fish => "fish",
    }
);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileFieldError {
    #[error("unknown profile field `{0}`")]
    UnknownField(String),

    #[error("invalid {field} value `{value}`")]
    InvalidValue { field: &'static str, value: String },
}

/// One profile field together with its new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileField {
    Age(Option<u32>),
    Sex(Sex),
    DietaryPreference(DietaryPreference),
    Allergies(Vec<Allergen>),
    HealthGoal(HealthGoal),
    NumMeals(u8),
}

impl ProfileField {
    /// Parses a `field value` pair as typed into a form.
    ///
    /// An empty age clears it. Allergies are a comma separated list.
    pub fn parse(field: &str, value: &str) -> Result<Self, ProfileFieldError> {
        let invalid = |field: &'static str| ProfileFieldError::InvalidValue {
            field,
            value: value.to_string(),
        };
        let value = value.trim();
        match field.trim().to_ascii_lowercase().as_str() {
            "age" if value.is_empty() => Ok(ProfileField::Age(None)),
            "age" => value
                .parse::<u32>()
                .map(|a| ProfileField::Age(Some(a)))
                .map_err(|_| invalid("age")),
            "sex" => value.parse().map(ProfileField::Sex),
            "diet" | "dietary_preference" => value.parse().map(ProfileField::DietaryPreference),
            "goal" | "health_goal" => value.parse().map(ProfileField::HealthGoal),
            "meals" | "num_meals" => value
                .parse::<u8>()
                .map(ProfileField::NumMeals)
                .map_err(|_| invalid("num_meals")),
            "allergies" => {
                let mut allergies: Vec<Allergen> = Vec::new();
                for name in value.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                    let allergen: Allergen = name.parse()?;
                    if !allergies.contains(&allergen) {
                        allergies.push(allergen);
                    }
                }
                Ok(ProfileField::Allergies(allergies))
            }
            other => Err(ProfileFieldError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub age: Option<u32>,
    pub sex: Sex,
    pub dietary_preference: DietaryPreference,
    pub allergies: Vec<Allergen>,
    pub health_goal: HealthGoal,
    pub num_meals: u8,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age: None,
            sex: Sex::Male,
            dietary_preference: DietaryPreference::Omnivore,
            allergies: Vec::new(),
            health_goal: HealthGoal::Maintain,
            num_meals: 3,
        }
    }
}

impl UserProfile {
    /// Age counts as present only when it is a positive number.
    pub fn age(&self) -> Option<u32> {
        self.age.filter(|a| *a > 0)
    }

    pub fn has_age(&self) -> bool {
        self.age().is_some()
    }

    /// Replaces exactly one field; no validation happens here.
    pub fn set(&mut self, field: ProfileField) {
        match field {
            ProfileField::Age(age) => self.age = age,
            ProfileField::Sex(sex) => self.sex = sex,
            ProfileField::DietaryPreference(pref) => self.dietary_preference = pref,
            ProfileField::Allergies(allergies) => self.allergies = allergies,
            ProfileField::HealthGoal(goal) => self.health_goal = goal,
            ProfileField::NumMeals(n) => self.num_meals = n,
        }
    }

    pub fn toggle_allergy(&mut self, allergen: Allergen) {
        match self.allergies.iter().position(|a| *a == allergen) {
            Some(idx) => {
                self.allergies.remove(idx);
            }
            None => self.allergies.push(allergen),
        }
    }

    pub fn to_payload(&self) -> Result<ProfilePayload, ValidationFailure> {
        let age = self.age().ok_or(ValidationFailure::MissingAge)?;
        Ok(ProfilePayload {
            age,
            sex: self.sex,
            dietary_preference: self.dietary_preference,
            allergies: self.allergies.clone(),
            health_goal: self.health_goal,
            num_meals: self.num_meals,
        })
    }
}
