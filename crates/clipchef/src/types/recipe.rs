//! Structured recipe parsed from a transcript
//!
//! Field shapes are tolerant of LLM omissions: everything except a title
//! and step instructions is optional, so a sparse model answer still
//! deserializes.

use serde::{Deserialize, Serialize};

/// A single ingredient with free-form quantity fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    /// Ingredient name
    pub name: String,
    /// Amount as spoken ("2", "half", "a pinch")
    #[serde(default)]
    pub amount: Option<String>,
    /// Unit as spoken ("tbsp", "cups", "cloves")
    #[serde(default)]
    pub unit: Option<String>,
    /// Preparation note ("finely chopped", "room temperature")
    #[serde(default)]
    pub note: Option<String>,
}

/// One ordered cooking step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeStep {
    /// 1-based step number
    #[serde(rename = "stepNumber")]
    pub step_number: u32,
    /// What to do
    pub instruction: String,
    /// Offset in the video where this step starts, in seconds
    #[serde(default)]
    pub timestamp: f64,
    /// How long the step takes, as spoken ("5 minutes")
    #[serde(default)]
    pub duration: Option<String>,
    /// Extra detail beyond the instruction
    #[serde(default)]
    pub details: Option<String>,
    /// Step-specific tip
    #[serde(default)]
    pub tips: Option<String>,
}

/// A structured recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Dish name
    pub title: String,
    /// Short description of the dish
    #[serde(default)]
    pub description: Option<String>,
    /// Servings as spoken ("2 portions", "serves 4")
    #[serde(default)]
    pub servings: Option<String>,
    /// Total time as spoken ("30 minutes")
    #[serde(default)]
    pub total_time: Option<String>,
    /// Difficulty label ("easy", "intermediate")
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Ingredient list
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    /// Ordered cooking steps
    #[serde(default)]
    pub steps: Vec<RecipeStep>,
    /// General tips not tied to a step
    #[serde(default)]
    pub tips: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_recipe_deserializes() {
        let json = r#"{
            "title": "Kimchi Stew",
            "steps": [
                {"stepNumber": 1, "instruction": "Boil the broth", "timestamp": 12.5}
            ]
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.title, "Kimchi Stew");
        assert_eq!(recipe.steps.len(), 1);
        assert_eq!(recipe.steps[0].step_number, 1);
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.description.is_none());
    }

    #[test]
    fn test_step_number_wire_key() {
        let step = RecipeStep {
            step_number: 3,
            instruction: "Serve".to_string(),
            timestamp: 0.0,
            duration: None,
            details: None,
            tips: None,
        };
        let json = serde_json::to_value(&step).unwrap();
        assert!(json.get("stepNumber").is_some());
    }
}
