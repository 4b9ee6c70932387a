//! LLM-backed ingredient matching for substitution requests.
//!
//! The model resolves informal references ("tomatoes" for "Roma tomatoes").
//! When the model call fails for any reason, matching degrades to an exact,
//! case-insensitive name lookup.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::api_connection::endpoints::JsonSchema;
use crate::api_connection::{extract_as, ExtractionRequest, ModelClient, ServiceError};
use crate::recipe::Recipe;

pub const SUBSTITUTION_SCHEMA_NAME: &str = "substitution_result";

pub const SUBSTITUTION_PROMPT: &str = "\
You are an expert chef helping with ingredient substitutions.

Given a recipe's ingredient list and a substitution request, you must:
1. Find the ingredient in the recipe that BEST MATCHES what the user wants to replace
   - Use fuzzy matching: \"tomatoes\" should match \"Roma tomatoes\" or \"cherry tomatoes\"
   - Consider partial matches: \"garlic\" matches \"garlic cloves\"
   - Be flexible with descriptors: \"parmesan\" matches \"parmesan cheese\"
2. If a match is found, suggest appropriate quantity/unit adjustments if needed
3. If NO match is found, set matched_ingredient to null and provide a helpful suggestion
   about what ingredients ARE in the recipe that might be relevant
4. Provide a brief cooking tip about using the substitute if relevant

IMPORTANT:
- If the user's ingredient clearly refers to something in the recipe (even with different wording),
  find and return that match
- Only set matched_ingredient to null if there's truly no relevant ingredient
- The confidence score should reflect how well the match fits (1.0 = exact, 0.5+ = good partial match)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionResult {
    /// Recipe ingredient that was matched; `None` means nothing relevant was found
    pub matched_ingredient: Option<String>,
    pub substitute_name: String,
    pub substitute_quantity: Option<f64>,
    pub substitute_unit: Option<String>,
    /// Match quality in `[0, 1]`
    #[serde(default)]
    pub confidence: f64,
    /// Guidance shown to the user when there is no match
    pub suggestion: Option<String>,
    pub cooking_tip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubstitutionResultError {
    #[error("Substitute name must not be empty")]
    EmptySubstituteName,

    #[error("Confidence must be within [0, 1], got {0}")]
    ConfidenceOutOfRange(f64),

    #[error("Substitute quantity must be a non-negative number, got {0}")]
    InvalidQuantity(f64),
}

impl SubstitutionResult {
    pub fn matched(
        ingredient: &str,
        substitute_name: &str,
        quantity: Option<f64>,
        unit: Option<String>,
        confidence: f64,
    ) -> Self {
        Self {
            matched_ingredient: Some(ingredient.to_string()),
            substitute_name: substitute_name.to_string(),
            substitute_quantity: quantity,
            substitute_unit: unit,
            confidence,
            suggestion: None,
            cooking_tip: None,
        }
    }

    pub fn not_found(substitute_name: &str, suggestion: String) -> Self {
        Self {
            matched_ingredient: None,
            substitute_name: substitute_name.to_string(),
            substitute_quantity: None,
            substitute_unit: None,
            confidence: 0.0,
            suggestion: Some(suggestion),
            cooking_tip: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.matched_ingredient.is_some()
    }

    pub fn validate(&self) -> Result<(), SubstitutionResultError> {
        if self.substitute_name.trim().is_empty() {
            return Err(SubstitutionResultError::EmptySubstituteName);
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(SubstitutionResultError::ConfidenceOutOfRange(self.confidence));
        }
        if let Some(quantity) = self.substitute_quantity {
            if !quantity.is_finite() || quantity < 0.0 {
                return Err(SubstitutionResultError::InvalidQuantity(quantity));
            }
        }
        Ok(())
    }
}

fn substitution_schema() -> JsonSchema {
    JsonSchema::object(
        vec![
            (
                "matched_ingredient",
                JsonSchema::string(
                    "Name of the ingredient in the recipe that was matched, or null if none",
                )
                .nullable(),
            ),
            (
                "substitute_name",
                JsonSchema::string("Name of the substitute ingredient"),
            ),
            (
                "substitute_quantity",
                JsonSchema::number("Suggested quantity for the substitute, or null").nullable(),
            ),
            (
                "substitute_unit",
                JsonSchema::string("Unit for the substitute quantity, or null").nullable(),
            ),
            (
                "confidence",
                JsonSchema::number("Confidence score for the ingredient match (0-1)"),
            ),
            (
                "suggestion",
                JsonSchema::string("Suggestion message if no match found, or null").nullable(),
            ),
            (
                "cooking_tip",
                JsonSchema::string("Cooking tip for using the substitute, or null").nullable(),
            ),
        ],
        &["matched_ingredient", "substitute_name", "confidence"],
    )
}

pub fn substitution_prompt(recipe: &Recipe, original_ingredient: &str, substitute_name: &str) -> String {
    format!(
        "Recipe ingredients:\n{}\n\nUser wants to replace: \"{}\"\nWith: \"{}\"\n\nFind the best matching ingredient and provide substitution details.",
        recipe.ingredient_lines(),
        original_ingredient,
        substitute_name
    )
}

/// Resolve `original_ingredient` against the recipe and describe the swap.
///
/// Never fails: model errors fall back to [`exact_match_fallback`].
pub async fn find_and_substitute(
    client: &dyn ModelClient,
    recipe: &Recipe,
    original_ingredient: &str,
    substitute_name: &str,
) -> SubstitutionResult {
    match match_with_model(client, recipe, original_ingredient, substitute_name).await {
        Ok(result) => result,
        Err(e) => {
            warn!("LLM substitution matching failed: {}", e);
            exact_match_fallback(recipe, original_ingredient, substitute_name)
        }
    }
}

async fn match_with_model(
    client: &dyn ModelClient,
    recipe: &Recipe,
    original_ingredient: &str,
    substitute_name: &str,
) -> Result<SubstitutionResult, ServiceError> {
    let request = ExtractionRequest::new(
        SUBSTITUTION_PROMPT,
        substitution_prompt(recipe, original_ingredient, substitute_name),
        SUBSTITUTION_SCHEMA_NAME,
        substitution_schema(),
    )
    .with_max_tokens(512);

    let result: SubstitutionResult = extract_as(client, request).await?;
    result
        .validate()
        .map_err(|e| ServiceError::UnexpectedShape(e.to_string()))?;
    Ok(result)
}

/// Exact, case-insensitive lookup used while the model is unavailable.
pub fn exact_match_fallback(
    recipe: &Recipe,
    original_ingredient: &str,
    substitute_name: &str,
) -> SubstitutionResult {
    match recipe.find_ingredient(original_ingredient) {
        Some(ingredient) => SubstitutionResult::matched(
            &ingredient.name,
            substitute_name,
            ingredient.quantity,
            ingredient.unit.clone(),
            1.0,
        ),
        None => SubstitutionResult::not_found(
            substitute_name,
            format!("Could not find '{}' in the recipe.", original_ingredient),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_connection::FakeModelClient;
    use crate::recipe::{Ingredient, IngredientCategory};
    use serde_json::json;

    fn recipe() -> Recipe {
        Recipe::builder("Bruschetta", 4)
            .ingredient(
                Ingredient::new("Roma tomatoes")
                    .with_quantity(4.0)
                    .with_preparation("diced")
                    .with_category(IngredientCategory::Produce),
            )
            .ingredient(Ingredient::new("olive oil").with_quantity(3.0).with_unit("tbsp"))
            .ingredient(Ingredient::new("garlic cloves").with_quantity(2.0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_prompt_lists_ingredients_and_request() {
        let prompt = substitution_prompt(&recipe(), "tomatoes", "cherry tomatoes");
        assert!(prompt.contains("- Roma tomatoes: 4 (diced)"));
        assert!(prompt.contains("- olive oil: 3 tbsp"));
        assert!(prompt.contains("User wants to replace: \"tomatoes\""));
        assert!(prompt.contains("With: \"cherry tomatoes\""));
    }

    #[tokio::test]
    async fn test_model_result_is_returned() {
        let client = FakeModelClient::with_response(
            SUBSTITUTION_SCHEMA_NAME,
            json!({
                "matched_ingredient": "Roma tomatoes",
                "substitute_name": "cherry tomatoes",
                "substitute_quantity": 20,
                "substitute_unit": "whole",
                "confidence": 0.9,
                "cooking_tip": "Halve them first."
            }),
        );
        let result = find_and_substitute(&client, &recipe(), "tomatoes", "cherry tomatoes").await;
        assert_eq!(result.matched_ingredient.as_deref(), Some("Roma tomatoes"));
        assert_eq!(result.substitute_quantity, Some(20.0));
        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.cooking_tip.as_deref(), Some("Halve them first."));
    }

    #[tokio::test]
    async fn test_fallback_exact_match_on_failure() {
        let client = FakeModelClient::new();
        let result = find_and_substitute(&client, &recipe(), "OLIVE OIL", "vegetable oil").await;
        assert_eq!(result.matched_ingredient.as_deref(), Some("olive oil"));
        assert_eq!(result.substitute_name, "vegetable oil");
        assert_eq!(result.substitute_quantity, Some(3.0));
        assert_eq!(result.substitute_unit.as_deref(), Some("tbsp"));
        assert_eq!(result.confidence, 1.0);
    }

    #[tokio::test]
    async fn test_fallback_is_not_fuzzy() {
        let client = FakeModelClient::new();
        let result = find_and_substitute(&client, &recipe(), "tomatoes", "cherry tomatoes").await;
        assert!(!result.is_match());
        assert!(result.suggestion.unwrap().contains("tomatoes"));
    }

    #[tokio::test]
    async fn test_out_of_range_confidence_uses_fallback() {
        let client = FakeModelClient::with_response(
            SUBSTITUTION_SCHEMA_NAME,
            json!({
                "matched_ingredient": "Roma tomatoes",
                "substitute_name": "cherry tomatoes",
                "confidence": 7
            }),
        );
        let result = find_and_substitute(&client, &recipe(), "garlic cloves", "shallots").await;
        assert_eq!(result.matched_ingredient.as_deref(), Some("garlic cloves"));
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_schema_allows_null_match() {
        let value = serde_json::to_value(substitution_schema()).unwrap();
        assert_eq!(value["properties"]["matched_ingredient"]["type"], json!(["string", "null"]));
        assert_eq!(value["properties"]["substitute_name"]["type"], "string");
        assert!(value["required"]
            .as_array()
            .unwrap()
            .contains(&json!("matched_ingredient")));
    }

    #[test]
    fn test_validate_rejects_empty_substitute() {
        let result = SubstitutionResult::not_found(" ", "nothing".to_string());
        assert_eq!(result.validate(), Err(SubstitutionResultError::EmptySubstituteName));
    }

    #[test]
    fn test_missing_confidence_defaults_to_zero() {
        let result: SubstitutionResult = serde_json::from_value(json!({
            "matched_ingredient": null,
            "substitute_name": "tofu",
            "suggestion": "Try replacing the chicken instead."
        }))
        .unwrap();
        assert_eq!(result.confidence, 0.0);
        assert!(result.validate().is_ok());
    }
}
