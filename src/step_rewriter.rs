//! Step rewording after an ingredient substitution.
//!
//! Only the instruction text comes from the model. Step numbers, durations,
//! timer labels, attention flags and tips are always taken from the recipe.

use serde::Deserialize;
use tracing::{info, warn};

use crate::api_connection::endpoints::JsonSchema;
use crate::api_connection::{extract_as, ExtractionRequest, ModelClient, ServiceError};
use crate::recipe::{Recipe, RecipeStep};

pub const STEP_REWRITE_SCHEMA_NAME: &str = "rewritten_steps";

pub const STEP_REWRITE_PROMPT: &str = "\
You are an expert chef updating a recipe after an ingredient substitution.

Rewrite the cooking steps so they refer to the substitute instead of the replaced ingredient.
- Only change wording that concerns the replaced ingredient; keep every other instruction as written
- Adjust technique or timing hints in the instruction text when the substitute needs it
- Keep the same number of steps and the same step numbers
Respond ONLY with a JSON object of the form {\"steps\": [{\"step_number\": 1, \"instruction\": \"...\"}]} that follows the provided schema.";

#[derive(Debug, Deserialize)]
struct RewrittenStep {
    step_number: u32,
    instruction: String,
}

#[derive(Debug, Deserialize)]
struct RewrittenSteps {
    steps: Vec<RewrittenStep>,
}

fn rewritten_steps_schema() -> JsonSchema {
    let step = JsonSchema::object(
        vec![
            (
                "step_number",
                JsonSchema::integer("Step number, unchanged from the input"),
            ),
            (
                "instruction",
                JsonSchema::string("Rewritten instruction text"),
            ),
        ],
        &["step_number", "instruction"],
    );
    JsonSchema::object(
        vec![(
            "steps",
            JsonSchema::array(step, "The full list of rewritten steps"),
        )],
        &["steps"],
    )
}

/// Rewrite step instructions to mention `substitute_name` instead of `original_name`.
///
/// Falls back to the recipe's current steps when the model fails or returns a
/// list that does not line up with them.
pub async fn rewrite_steps_for_substitution(
    client: &dyn ModelClient,
    recipe: &Recipe,
    original_name: &str,
    substitute_name: &str,
) -> Vec<RecipeStep> {
    if recipe.steps.is_empty() {
        return Vec::new();
    }

    match request_rewrite(client, recipe, original_name, substitute_name).await {
        Ok(steps) => {
            info!(
                original = original_name,
                substitute = substitute_name,
                "Rewrote {} steps for substitution",
                steps.len()
            );
            steps
        }
        Err(e) => {
            warn!("Step rewrite failed, keeping original steps: {}", e);
            recipe.steps.clone()
        }
    }
}

async fn request_rewrite(
    client: &dyn ModelClient,
    recipe: &Recipe,
    original_name: &str,
    substitute_name: &str,
) -> Result<Vec<RecipeStep>, ServiceError> {
    let current_steps = serde_json::to_string_pretty(&recipe.steps)
        .map_err(|e| ServiceError::UnexpectedShape(e.to_string()))?;
    let user_prompt = format!(
        "Recipe: {}\nReplaced ingredient: \"{}\"\nSubstitute: \"{}\"\n\nCurrent steps:\n{}",
        recipe.title, original_name, substitute_name, current_steps
    );
    let request = ExtractionRequest::new(
        STEP_REWRITE_PROMPT,
        user_prompt,
        STEP_REWRITE_SCHEMA_NAME,
        rewritten_steps_schema(),
    );

    let rewritten: RewrittenSteps = extract_as(client, request).await?;
    merge_instructions(&recipe.steps, rewritten.steps)
}

/// Copy each rewritten instruction onto the step with the same number.
fn merge_instructions(
    steps: &[RecipeStep],
    rewritten: Vec<RewrittenStep>,
) -> Result<Vec<RecipeStep>, ServiceError> {
    if rewritten.len() != steps.len() {
        return Err(ServiceError::UnexpectedShape(format!(
            "expected {} steps, got {}",
            steps.len(),
            rewritten.len()
        )));
    }

    steps
        .iter()
        .map(|step| -> Result<RecipeStep, ServiceError> {
            let instruction = rewritten
                .iter()
                .find(|r| r.step_number == step.step_number)
                .map(|r| r.instruction.trim())
                .ok_or_else(|| {
                    ServiceError::UnexpectedShape(format!("step {} is missing", step.step_number))
                })?;
            if instruction.is_empty() {
                return Err(ServiceError::UnexpectedShape(format!(
                    "step {} has an empty instruction",
                    step.step_number
                )));
            }
            Ok(RecipeStep {
                instruction: instruction.to_string(),
                ..step.clone()
            })
        })
        .collect()
}
