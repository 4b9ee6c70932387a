//! Session state shared between the chat client and the assistant.

use serde::{Deserialize, Serialize};

use crate::recipe::{names_match, Recipe, RecipeStep};

/// Snapshot sent to the client after every mutating tool call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecipeContext {
    pub document_text: Option<String>,
    pub recipe: Option<Recipe>,

    /// 0-based index into `recipe.steps`
    #[serde(default)]
    pub current_step: usize,

    /// Servings value applied by the last scaling
    pub scaled_servings: Option<u32>,

    #[serde(default)]
    pub checked_ingredients: Vec<String>,

    #[serde(default)]
    pub cooking_started: bool,
}

impl RecipeContext {
    pub fn from_document(document_text: String, recipe: Option<Recipe>) -> Self {
        Self {
            document_text: Some(document_text),
            recipe,
            ..Self::default()
        }
    }

    /// Move to step `index` if a recipe is loaded and the index is in range.
    /// Returns whether the index was accepted.
    pub fn set_current_step(&mut self, index: usize) -> bool {
        match &self.recipe {
            Some(recipe) if index < recipe.steps.len() => {
                self.current_step = index;
                true
            }
            _ => false,
        }
    }

    pub fn current_step_detail(&self) -> Option<&RecipeStep> {
        self.recipe.as_ref()?.steps.get(self.current_step)
    }

    pub fn is_checked(&self, name: &str) -> bool {
        self.checked_ingredients.iter().any(|n| names_match(n, name))
    }

    /// Flip the checklist mark for `name`; returns the new checked state.
    pub fn toggle_checked(&mut self, name: &str) -> bool {
        if self.is_checked(name) {
            self.checked_ingredients.retain(|n| !names_match(n, name));
            false
        } else {
            self.checked_ingredients.push(name.to_string());
            true
        }
    }
}
