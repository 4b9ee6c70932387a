//! # Recipe Data Model
//!
//! Structured recipe records as extracted from an uploaded document, plus the
//! two deterministic transitions the assistant applies to them: scaling to a
//! new serving count and substituting an ingredient.
//!
//! Both transitions leave their input untouched. Ingredients have no identity
//! beyond their name, and names are compared case-insensitively.
//!
//! ## Usage
//!
//! ```rust
//! use recipe_companion::recipe::{Ingredient, Recipe, RecipeStep};
//!
//! let recipe = Recipe::builder("Pasta al Pomodoro", 4)
//!     .ingredient(Ingredient::new("spaghetti").with_quantity(400.0).with_unit("g"))
//!     .step(RecipeStep::new(1, "Boil water and cook pasta"))
//!     .build()
//!     .unwrap();
//!
//! let doubled = recipe.scale(8);
//! assert_eq!(doubled.ingredients[0].quantity, Some(800.0));
//! assert_eq!(doubled.original_servings, Some(4));
//! ```

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// Grocery category of an ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientCategory {
    Produce,
    Protein,
    Dairy,
    Pantry,
    Spice,
    #[default]
    Other,
}

impl IngredientCategory {
    /// Display order used when grouping a shopping list.
    pub const ALL: [IngredientCategory; 6] = [
        IngredientCategory::Produce,
        IngredientCategory::Protein,
        IngredientCategory::Dairy,
        IngredientCategory::Pantry,
        IngredientCategory::Spice,
        IngredientCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            IngredientCategory::Produce => "Produce",
            IngredientCategory::Protein => "Protein",
            IngredientCategory::Dairy => "Dairy",
            IngredientCategory::Pantry => "Pantry",
            IngredientCategory::Spice => "Spices",
            IngredientCategory::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// A single ingredient line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Display name, not normalized (e.g. "Roma tomatoes")
    pub name: String,

    pub quantity: Option<f64>,

    /// Free-text unit (cup, tbsp, g, cloves, ...)
    pub unit: Option<String>,

    /// Preparation notes like "minced" or "diced"
    pub preparation: Option<String>,

    #[serde(default)]
    pub category: IngredientCategory,

    /// Candidate substitutes suggested for this ingredient
    #[serde(default)]
    pub substitutes: Vec<String>,
}

impl Ingredient {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            quantity: None,
            unit: None,
            preparation: None,
            category: IngredientCategory::Other,
            substitutes: Vec::new(),
        }
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn with_preparation(mut self, preparation: &str) -> Self {
        self.preparation = Some(preparation.to_string());
        self
    }

    pub fn with_category(mut self, category: IngredientCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_substitutes(mut self, substitutes: &[&str]) -> Self {
        self.substitutes = substitutes.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Case-insensitive comparison against this ingredient's name.
    pub fn is_named(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }

    fn validate(&self, index: usize) -> Result<(), RecipeError> {
        if self.name.trim().is_empty() {
            return Err(RecipeError::EmptyIngredientName { index });
        }
        if let Some(quantity) = self.quantity {
            if !quantity.is_finite() || quantity < 0.0 {
                return Err(RecipeError::InvalidQuantity {
                    ingredient: self.name.clone(),
                    quantity,
                });
            }
        }
        Ok(())
    }
}

/// Renders as `name: quantity unit (preparation)`, omitting absent parts.
impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        if let Some(quantity) = self.quantity {
            write!(f, " {}", quantity)?;
        }
        if let Some(unit) = &self.unit {
            write!(f, " {}", unit)?;
        }
        if let Some(preparation) = &self.preparation {
            write!(f, " ({})", preparation)?;
        }
        Ok(())
    }
}

/// A cooking step with timing and UI hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeStep {
    /// 1-based, sequential within a recipe
    pub step_number: u32,

    pub instruction: String,

    pub duration_minutes: Option<u32>,

    /// Label for a timer button, when the step is timed
    pub timer_label: Option<String>,

    /// Whether the step needs constant attention (e.g. "stir constantly")
    #[serde(default)]
    pub requires_attention: bool,

    #[serde(default)]
    pub tips: Vec<String>,
}

impl RecipeStep {
    pub fn new(step_number: u32, instruction: &str) -> Self {
        Self {
            step_number,
            instruction: instruction.to_string(),
            duration_minutes: None,
            timer_label: None,
            requires_attention: false,
            tips: Vec::new(),
        }
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_timer_label(mut self, label: &str) -> Self {
        self.timer_label = Some(label.to_string());
        self
    }

    pub fn requiring_attention(mut self) -> Self {
        self.requires_attention = true;
        self
    }

    pub fn with_tip(mut self, tip: &str) -> Self {
        self.tips.push(tip.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecipeError {
    #[error("Recipe title must not be empty")]
    EmptyTitle,

    #[error("Servings must be a positive integer")]
    ZeroServings,

    #[error("Original servings must be a positive integer when present")]
    ZeroOriginalServings,

    #[error("Ingredient at position {index} has an empty name")]
    EmptyIngredientName { index: usize },

    #[error("Ingredient '{ingredient}' has an invalid quantity: {quantity}")]
    InvalidQuantity { ingredient: String, quantity: f64 },

    #[error("Step {step_number} has an empty instruction")]
    EmptyInstruction { step_number: u32 },

    #[error("Steps must be numbered sequentially from 1: expected {expected}, found {found}")]
    StepOutOfSequence { expected: u32, found: u32 },
}

/// Complete extracted recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub description: Option<String>,

    /// Current serving count; authoritative for scaling
    pub servings: u32,

    /// Serving count before the first scaling, preserved across rescales
    pub original_servings: Option<u32>,

    pub prep_time_minutes: Option<u32>,
    pub cook_time_minutes: Option<u32>,

    #[serde(default)]
    pub difficulty: Difficulty,

    pub cuisine: Option<String>,

    #[serde(default)]
    pub dietary_tags: Vec<String>,

    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<RecipeStep>,

    /// The document text the recipe was extracted from
    pub source_text: Option<String>,
}

impl Recipe {
    pub fn builder(title: &str, servings: u32) -> RecipeBuilder {
        RecipeBuilder::new(title, servings)
    }

    /// Check the field constraints that serde alone cannot express.
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.title.trim().is_empty() {
            return Err(RecipeError::EmptyTitle);
        }
        if self.servings == 0 {
            return Err(RecipeError::ZeroServings);
        }
        if self.original_servings == Some(0) {
            return Err(RecipeError::ZeroOriginalServings);
        }
        for (index, ingredient) in self.ingredients.iter().enumerate() {
            ingredient.validate(index)?;
        }
        validate_steps(&self.steps)
    }

    /// Scale every ingredient quantity to `target_servings`.
    ///
    /// The factor is always relative to the current `servings`; the first
    /// baseline is kept in `original_servings`. Quantities are rounded to two
    /// decimals and missing quantities stay missing.
    ///
    /// Scaling to the current serving count, or scaling a recipe with zero
    /// servings, hands back the input itself (`Cow::Borrowed`) rather than an
    /// equal copy.
    pub fn scale(&self, target_servings: u32) -> Cow<'_, Recipe> {
        if self.servings == 0 || self.servings == target_servings {
            return Cow::Borrowed(self);
        }

        let factor = f64::from(target_servings) / f64::from(self.servings);
        let mut scaled = self.clone();
        for ingredient in &mut scaled.ingredients {
            ingredient.quantity = ingredient.quantity.map(|q| round_to_hundredths(q * factor));
        }
        scaled.original_servings = Some(self.original_servings.unwrap_or(self.servings));
        scaled.servings = target_servings;
        Cow::Owned(scaled)
    }

    /// Replace every ingredient named `original_name` (case-insensitive).
    ///
    /// Quantity and unit fall back to the replaced ingredient's when not
    /// given; preparation and category are kept, the substitute suggestions
    /// are cleared. No match yields an equal recipe.
    pub fn substitute(
        &self,
        original_name: &str,
        substitute_name: &str,
        quantity: Option<f64>,
        unit: Option<&str>,
    ) -> Recipe {
        let ingredients = self
            .ingredients
            .iter()
            .map(|ingredient| {
                if !ingredient.is_named(original_name) {
                    return ingredient.clone();
                }
                Ingredient {
                    name: substitute_name.to_string(),
                    quantity: quantity.or(ingredient.quantity),
                    unit: unit.map(str::to_string).or_else(|| ingredient.unit.clone()),
                    preparation: ingredient.preparation.clone(),
                    category: ingredient.category,
                    substitutes: Vec::new(),
                }
            })
            .collect();

        Recipe {
            ingredients,
            ..self.clone()
        }
    }

    pub fn find_ingredient(&self, name: &str) -> Option<&Ingredient> {
        self.ingredients.iter().find(|i| i.is_named(name))
    }

    /// Ingredient list as `- name: quantity unit (preparation)` lines.
    pub fn ingredient_lines(&self) -> String {
        self.ingredients
            .iter()
            .map(|i| format!("- {}", i))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Ingredients grouped in shopping-list order; empty categories are omitted.
    pub fn ingredients_by_category(&self) -> Vec<(IngredientCategory, Vec<&Ingredient>)> {
        IngredientCategory::ALL
            .iter()
            .filter_map(|category| {
                let items: Vec<&Ingredient> = self
                    .ingredients
                    .iter()
                    .filter(|i| i.category == *category)
                    .collect();
                if items.is_empty() {
                    None
                } else {
                    Some((*category, items))
                }
            })
            .collect()
    }
}

fn validate_steps(steps: &[RecipeStep]) -> Result<(), RecipeError> {
    for (position, step) in steps.iter().enumerate() {
        let expected = position as u32 + 1;
        if step.step_number != expected {
            return Err(RecipeError::StepOutOfSequence {
                expected,
                found: step.step_number,
            });
        }
        if step.instruction.trim().is_empty() {
            return Err(RecipeError::EmptyInstruction {
                step_number: step.step_number,
            });
        }
    }
    Ok(())
}

/// Case-insensitive ingredient name equality.
pub fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Validating constructor for [`Recipe`].
#[derive(Debug, Clone)]
pub struct RecipeBuilder {
    recipe: Recipe,
}

impl RecipeBuilder {
    pub fn new(title: &str, servings: u32) -> Self {
        Self {
            recipe: Recipe {
                title: title.to_string(),
                description: None,
                servings,
                original_servings: None,
                prep_time_minutes: None,
                cook_time_minutes: None,
                difficulty: Difficulty::Medium,
                cuisine: None,
                dietary_tags: Vec::new(),
                ingredients: Vec::new(),
                steps: Vec::new(),
                source_text: None,
            },
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.recipe.description = Some(description.to_string());
        self
    }

    pub fn prep_time(mut self, minutes: u32) -> Self {
        self.recipe.prep_time_minutes = Some(minutes);
        self
    }

    pub fn cook_time(mut self, minutes: u32) -> Self {
        self.recipe.cook_time_minutes = Some(minutes);
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.recipe.difficulty = difficulty;
        self
    }

    pub fn cuisine(mut self, cuisine: &str) -> Self {
        self.recipe.cuisine = Some(cuisine.to_string());
        self
    }

    pub fn dietary_tag(mut self, tag: &str) -> Self {
        self.recipe.dietary_tags.push(tag.to_string());
        self
    }

    pub fn ingredient(mut self, ingredient: Ingredient) -> Self {
        self.recipe.ingredients.push(ingredient);
        self
    }

    pub fn step(mut self, step: RecipeStep) -> Self {
        self.recipe.steps.push(step);
        self
    }

    pub fn source_text(mut self, text: &str) -> Self {
        self.recipe.source_text = Some(text.to_string());
        self
    }

    pub fn build(self) -> Result<Recipe, RecipeError> {
        self.recipe.validate()?;
        Ok(self.recipe)
    }
}
