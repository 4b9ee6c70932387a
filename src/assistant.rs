//! Tools the chat orchestrator dispatches to.
//!
//! Each tool mutates the session's [`RecipeContext`] and returns an
//! [`AgentEvent`]: a state snapshot when something changed, or a text message
//! the model should relay when the request could not be applied.

use std::sync::Arc;
use tracing::{info, warn};

use crate::api_connection::ModelClient;
use crate::context::RecipeContext;
use crate::events::AgentEvent;
use crate::ingredient_matcher::find_and_substitute;
use crate::recipe::Recipe;
use crate::recipe_parser::parse_recipe;
use crate::step_rewriter::rewrite_steps_for_substitution;

pub const NO_RECIPE_MESSAGE: &str = "No recipe is currently loaded. Please upload a recipe first.";
pub const INVALID_SERVINGS_MESSAGE: &str = "Servings must be at least 1.";

/// How many ingredient names a "not found" reply lists.
const AVAILABLE_PREVIEW: usize = 5;

pub const CHAT_PROMPT: &str = "\
You are a friendly, expert cooking companion. Your personality is warm,
encouraging, and practical - like a patient friend who happens to be a great cook.

CRITICAL - TOOL USAGE RULES:
You MUST use tools to make ANY changes to the recipe. NEVER just describe changes.

ALWAYS call a tool when the user:
- Asks to change servings, scale, double, halve -> call scale_recipe
- Asks to substitute, replace, swap, or change an ingredient -> call substitute_ingredient
- Says \"I don't have X\" or \"can I use Y instead\" -> call substitute_ingredient
- Says \"next step\", \"done\", \"what's next\" -> call update_cooking_progress
- Says they have an ingredient ready or wants to tick it off -> call toggle_ingredient

After calling a tool:
- Confirm what was changed
- Mention any cooking tips related to the change

CAPABILITIES:
- Scale recipes up or down, recalculating all quantities
- Substitute ingredients based on dietary needs or availability
- Provide step-by-step cooking guidance with timing
- Help recover from cooking mistakes

Be encouraging! Cooking should be fun, not stressful.";

#[derive(Debug, Clone)]
pub struct RecipeAssistant {
    client: Arc<dyn ModelClient>,
}

impl RecipeAssistant {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }

    /// Fresh session state for an uploaded document.
    pub async fn load_document(&self, document_text: String) -> RecipeContext {
        let recipe = parse_recipe(self.client.as_ref(), &document_text).await;
        RecipeContext::from_document(document_text, recipe)
    }

    pub fn scale_recipe(&self, state: &mut RecipeContext, target_servings: u32) -> AgentEvent {
        let Some(recipe) = state.recipe.as_ref() else {
            return AgentEvent::message(NO_RECIPE_MESSAGE);
        };
        if target_servings == 0 {
            return AgentEvent::message(INVALID_SERVINGS_MESSAGE);
        }

        let previous_servings = recipe.servings;
        let scaled = recipe.scale(target_servings).into_owned();
        state.recipe = Some(scaled);
        state.scaled_servings = Some(target_servings);

        info!(
            "Scaled recipe from {} to {} servings",
            previous_servings, target_servings
        );
        AgentEvent::snapshot(state)
    }

    pub async fn substitute_ingredient(
        &self,
        state: &mut RecipeContext,
        original_ingredient: &str,
        substitute_name: &str,
    ) -> AgentEvent {
        let Some(recipe) = state.recipe.as_ref() else {
            return AgentEvent::message(NO_RECIPE_MESSAGE);
        };

        let result =
            find_and_substitute(self.client.as_ref(), recipe, original_ingredient, substitute_name)
                .await;

        let Some(matched) = result.matched_ingredient.as_deref() else {
            let suggestion = result
                .suggestion
                .clone()
                .unwrap_or_else(|| format!("Could not find '{}' in the recipe.", original_ingredient));
            return not_found_message(recipe, &suggestion);
        };

        let mut updated = recipe.substitute(
            matched,
            &result.substitute_name,
            result.substitute_quantity,
            result.substitute_unit.as_deref(),
        );
        if updated.ingredients == recipe.ingredients {
            warn!(
                matched,
                requested = original_ingredient,
                "Matched ingredient is not in the recipe, nothing substituted"
            );
            return not_found_message(
                recipe,
                &format!("Could not find '{}' in the recipe.", original_ingredient),
            );
        }

        updated.steps = rewrite_steps_for_substitution(
            self.client.as_ref(),
            &updated,
            matched,
            &result.substitute_name,
        )
        .await;

        info!(
            "Substituted '{}' with '{}' (user requested: '{}', confidence: {})",
            matched, result.substitute_name, original_ingredient, result.confidence
        );
        if let Some(tip) = &result.cooking_tip {
            info!(tip = %tip, "Substitution cooking tip");
        }

        state.recipe = Some(updated);
        AgentEvent::snapshot(state)
    }

    /// `current_step` is 0-based and only applied when it points at an existing step.
    pub fn update_cooking_progress(
        &self,
        state: &mut RecipeContext,
        current_step: Option<usize>,
        cooking_started: Option<bool>,
    ) -> AgentEvent {
        if let Some(step) = current_step {
            if state.set_current_step(step) {
                info!("Updated current step to {}", step);
            }
        }
        if let Some(started) = cooking_started {
            state.cooking_started = started;
            info!("Updated cooking_started to {}", started);
        }
        AgentEvent::snapshot(state)
    }

    pub fn toggle_ingredient(&self, state: &mut RecipeContext, ingredient_name: &str) -> AgentEvent {
        if state.recipe.is_none() {
            return AgentEvent::message(NO_RECIPE_MESSAGE);
        }
        let checked = state.toggle_checked(ingredient_name);
        info!(ingredient = ingredient_name, checked, "Toggled ingredient");
        AgentEvent::snapshot(state)
    }

    /// System prompt for the next chat turn, describing the loaded recipe.
    pub fn instructions(&self, state: &RecipeContext) -> String {
        let mut prompt = CHAT_PROMPT.to_string();

        if let Some(recipe) = &state.recipe {
            prompt.push_str(&format!("\n\nCURRENT RECIPE: {}", recipe.title));
            prompt.push_str(&format!("\nServings: {}", recipe.servings));
            if let Some(original) = recipe.original_servings {
                prompt.push_str(&format!(" (originally {})", original));
            }
            prompt.push_str(&format!("\nIngredients: {}", recipe.ingredients.len()));
            prompt.push_str(&format!("\nSteps: {}", recipe.steps.len()));
            prompt.push_str(&format!("\nCurrent step: {}", state.current_step));
        }

        prompt
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }
}

fn not_found_message(recipe: &Recipe, suggestion: &str) -> AgentEvent {
    let available = recipe
        .ingredients
        .iter()
        .take(AVAILABLE_PREVIEW)
        .map(|i| i.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    AgentEvent::message(format!(
        "{} Available ingredients include: {}",
        suggestion, available
    ))
}
