use crate::profile::{DietaryPreference, HealthGoal, UserProfile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideCategory {
    pub title: &'static str,
    pub items: &'static [&'static str],
}

/// Shopping recommendations tailored to a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroceryGuide {
    pub categories: Vec<GuideCategory>,
    pub shopping_list: Vec<String>,
}

const VEGAN_PROTEINS: &[&str] = &[
    "Tofu & Tempeh",
    "Lentils & Legumes",
    "Quinoa",
    "Plant-based protein powder",
    "Nuts & Seeds",
];

const VEGETARIAN_PROTEINS: &[&str] = &[
    "Greek yogurt",
    "Eggs",
    "Cottage cheese",
    "Tofu & Tempeh",
    "Lentils & Beans",
];

const DEFAULT_PROTEINS: &[&str] = &[
    "Lean chicken breast",
    "Wild salmon",
    "Greek yogurt",
    "Eggs",
    "Lean ground turkey",
];

const VEGETABLES: &[&str] = &[
    "Leafy greens (spinach, kale)",
    "Bell peppers",
    "Broccoli & cauliflower",
    "Sweet potatoes",
    "Zucchini & squash",
];

const HEALTHY_FATS: &[&str] = &[
    "Avocados",
    "Extra virgin olive oil",
    "Nuts & seeds",
    "Fatty fish (salmon, sardines)",
    "Coconut oil",
];

fn proteins(pref: DietaryPreference) -> &'static [&'static str] {
    match pref {
        DietaryPreference::Vegan => VEGAN_PROTEINS,
        DietaryPreference::Vegetarian => VEGETARIAN_PROTEINS,
        _ => DEFAULT_PROTEINS,
    }
}

fn goal_focus(goal: HealthGoal) -> &'static [&'static str] {
    match goal {
        HealthGoal::WeightLoss => &[
            "High-fiber vegetables",
            "Lean proteins",
            "Complex carbohydrates",
            "Low-calorie density foods",
        ],
        HealthGoal::WeightGain => &[
            "Calorie-dense nuts",
            "Healthy oils",
            "Protein-rich foods",
            "Whole grain carbs",
        ],
        HealthGoal::MuscleGain => &[
            "High-quality proteins",
            "Post-workout carbs",
            "Creatine-rich foods",
            "Recovery nutrients",
        ],
        HealthGoal::Maintain => &[
            "Balanced macronutrients",
            "Variety of colors",
            "Whole foods",
            "Consistent portions",
        ],
    }
}

impl GroceryGuide {
    /// `None` until the profile has an age.
    pub fn for_profile(profile: &UserProfile, grocery_list: &[String]) -> Option<Self> {
        profile.age()?;
        Some(Self {
            categories: vec![
                GuideCategory {
                    title: "Proteins",
                    items: proteins(profile.dietary_preference),
                },
                GuideCategory {
                    title: "Vegetables",
                    items: VEGETABLES,
                },
                GuideCategory {
                    title: "Healthy Fats",
                    items: HEALTHY_FATS,
                },
                GuideCategory {
                    title: "Goal Focus",
                    items: goal_focus(profile.health_goal),
                },
            ],
            shopping_list: grocery_list.to_vec(),
        })
    }
}
