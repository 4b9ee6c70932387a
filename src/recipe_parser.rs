//! Structured recipe extraction from uploaded document text.

use tracing::{info, warn};

use crate::api_connection::endpoints::JsonSchema;
use crate::api_connection::{extract_as, ExtractionRequest, ModelClient, ServiceError};
use crate::recipe::Recipe;

pub const RECIPE_SCHEMA_NAME: &str = "parsed_recipe_schema";

pub const PARSE_RECIPE_PROMPT: &str = "\
You are a recipe parsing expert. Extract structured recipe data from the provided text.

Guidelines:
- Extract the recipe title, description, servings count, and timing information
- Parse each ingredient with its quantity, unit, name, and preparation notes
- Number and structure each cooking step starting from 1
- Identify cuisine type and dietary tags if mentioned
- Estimate difficulty based on technique complexity and time
- If information is not explicitly stated, make reasonable inferences
- For ambiguous quantities, use the most common interpretation

Respond ONLY with a JSON object that follows the provided schema. Use null for unknown optional values.
Parse the following recipe text into a structured format.";

fn ingredient_schema() -> JsonSchema {
    JsonSchema::object(
        vec![
            ("name", JsonSchema::string("Name of the ingredient")),
            ("quantity", JsonSchema::number("Numeric quantity, or null if unspecified").nullable()),
            (
                "unit",
                JsonSchema::string("Unit of measurement (cup, tbsp, lb, etc.), or null").nullable(),
            ),
            (
                "preparation",
                JsonSchema::string("Preparation notes like 'diced' or 'minced', or null").nullable(),
            ),
            (
                "category",
                JsonSchema::enumeration(
                    &["produce", "protein", "dairy", "pantry", "spice", "other"],
                    "Ingredient category for grocery organization",
                ),
            ),
            (
                "substitutes",
                JsonSchema::array(
                    JsonSchema::string("Substitute ingredient name"),
                    "Possible ingredient substitutions",
                ),
            ),
        ],
        &["name", "category"],
    )
}

fn step_schema() -> JsonSchema {
    JsonSchema::object(
        vec![
            (
                "step_number",
                JsonSchema::integer("Sequential step number starting from 1"),
            ),
            ("instruction", JsonSchema::string("The step instruction text")),
            (
                "duration_minutes",
                JsonSchema::integer("Estimated time for this step in minutes, or null").nullable(),
            ),
            (
                "timer_label",
                JsonSchema::string("Label for a timer button if applicable, or null").nullable(),
            ),
            (
                "requires_attention",
                JsonSchema::boolean("Whether the step needs constant attention"),
            ),
            (
                "tips",
                JsonSchema::array(JsonSchema::string("Tip"), "Helpful tips for this step"),
            ),
        ],
        &["step_number", "instruction"],
    )
}

fn recipe_schema() -> JsonSchema {
    JsonSchema::object(
        vec![
            ("title", JsonSchema::string("Recipe title/name")),
            ("description", JsonSchema::string("Brief recipe description, or null").nullable()),
            ("servings", JsonSchema::integer("Number of servings this recipe makes")),
            (
                "prep_time_minutes",
                JsonSchema::integer("Preparation time in minutes, or null").nullable(),
            ),
            (
                "cook_time_minutes",
                JsonSchema::integer("Cooking time in minutes, or null").nullable(),
            ),
            (
                "difficulty",
                JsonSchema::enumeration(&["easy", "medium", "hard"], "Recipe difficulty level"),
            ),
            (
                "cuisine",
                JsonSchema::string("Cuisine type (Italian, Mexican, etc.), or null").nullable(),
            ),
            (
                "dietary_tags",
                JsonSchema::array(
                    JsonSchema::string("Dietary tag"),
                    "Dietary tags like 'vegetarian', 'gluten-free', 'vegan'",
                ),
            ),
            (
                "ingredients",
                JsonSchema::array(ingredient_schema(), "List of recipe ingredients"),
            ),
            (
                "steps",
                JsonSchema::array(step_schema(), "Ordered list of cooking steps"),
            ),
        ],
        &["title", "servings", "ingredients", "steps"],
    )
}

/// Extract a structured recipe from raw document text.
///
/// Returns `None` on any failure; the caller keeps the recipe state empty.
pub async fn parse_recipe(client: &dyn ModelClient, document_text: &str) -> Option<Recipe> {
    if document_text.trim().is_empty() {
        warn!("Recipe parsing skipped: document text is empty");
        return None;
    }

    match try_parse_recipe(client, document_text).await {
        Ok(recipe) => {
            info!(
                title = %recipe.title,
                ingredients = recipe.ingredients.len(),
                steps = recipe.steps.len(),
                "Parsed recipe"
            );
            Some(recipe)
        }
        Err(e) => {
            warn!("Recipe parsing failed: {}", e);
            None
        }
    }
}

async fn try_parse_recipe(
    client: &dyn ModelClient,
    document_text: &str,
) -> Result<Recipe, ServiceError> {
    let request = ExtractionRequest::new(
        PARSE_RECIPE_PROMPT,
        document_text,
        RECIPE_SCHEMA_NAME,
        recipe_schema(),
    )
    .with_max_tokens(4096);

    let mut recipe: Recipe = extract_as(client, request).await?;
    recipe.source_text = Some(document_text.to_string());
    recipe
        .validate()
        .map_err(|e| ServiceError::UnexpectedShape(e.to_string()))?;
    Ok(recipe)
}
