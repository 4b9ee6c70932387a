use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use recipe_companion::recipe::{Ingredient, IngredientCategory, Recipe, RecipeStep};
use std::borrow::Cow;

fn spaghetti_recipe() -> Recipe {
    Recipe::builder("Pasta al Pomodoro", 4)
        .ingredient(
            Ingredient::new("spaghetti")
                .with_quantity(400.0)
                .with_unit("g")
                .with_category(IngredientCategory::Pantry),
        )
        .ingredient(
            Ingredient::new("garlic")
                .with_quantity(3.0)
                .with_unit("cloves")
                .with_preparation("minced")
                .with_category(IngredientCategory::Produce)
                .with_substitutes(&["shallots", "garlic powder"]),
        )
        .ingredient(Ingredient::new("salt").with_category(IngredientCategory::Spice))
        .step(RecipeStep::new(1, "Boil water and cook pasta").with_duration(10))
        .step(RecipeStep::new(2, "Sauté garlic in olive oil").requiring_attention())
        .build()
        .unwrap()
}

fn random_recipe(rng: &mut StdRng) -> Recipe {
    let servings = rng.gen_range(1..=12);
    let mut builder = Recipe::builder("Random stew", servings);
    for i in 0..rng.gen_range(1..8) {
        let mut ingredient = Ingredient::new(&format!("ingredient {}", i));
        if rng.gen_bool(0.8) {
            let quantity = (rng.gen_range(0.0..1000.0_f64) * 100.0).round() / 100.0;
            ingredient = ingredient.with_quantity(quantity);
        }
        builder = builder.ingredient(ingredient);
    }
    builder.build().unwrap()
}

#[test]
fn test_scale_four_to_eight_doubles_quantities() {
    let recipe = spaghetti_recipe();
    let scaled = recipe.scale(8);

    assert_eq!(scaled.servings, 8);
    assert_eq!(scaled.original_servings, Some(4));
    assert_eq!(scaled.ingredients[0].quantity, Some(800.0));
    assert_eq!(scaled.ingredients[1].quantity, Some(6.0));
    assert_eq!(scaled.ingredients[2].quantity, None);
    assert_eq!(scaled.ingredients[1].preparation.as_deref(), Some("minced"));
    assert_eq!(scaled.steps, recipe.steps);
}

#[test]
fn test_chained_scaling_keeps_first_baseline() {
    let recipe = spaghetti_recipe();
    let eight = recipe.scale(8).into_owned();
    let two = eight.scale(2);

    assert_eq!(two.servings, 2);
    assert_eq!(two.original_servings, Some(4));
    assert_eq!(two.ingredients[0].quantity, Some(200.0));
    assert_eq!(two.ingredients[1].quantity, Some(1.5));
}

#[test]
fn test_scale_to_same_servings_borrows_input() {
    let recipe = spaghetti_recipe();
    match recipe.scale(4) {
        Cow::Borrowed(same) => assert!(std::ptr::eq(same, &recipe)),
        Cow::Owned(_) => panic!("scaling to the current servings should not copy"),
    }
}

#[test]
fn test_scale_rounds_to_two_decimals() {
    let recipe = Recipe::builder("Dressing", 3)
        .ingredient(Ingredient::new("vinegar").with_quantity(1.0).with_unit("tbsp"))
        .build()
        .unwrap();
    let scaled = recipe.scale(1);
    assert_eq!(scaled.ingredients[0].quantity, Some(0.33));
}

#[test]
fn test_scale_properties_hold_for_random_recipes() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let recipe = random_recipe(&mut rng);
        let before = recipe.clone();
        let target = rng.gen_range(1..=24);
        let scaled = recipe.scale(target);

        assert_eq!(recipe, before, "input must not change");
        assert_eq!(scaled.servings, target);
        assert_eq!(scaled.ingredients.len(), recipe.ingredients.len());
        if target != recipe.servings {
            assert_eq!(scaled.original_servings, Some(recipe.servings));
        }

        let factor = f64::from(target) / f64::from(recipe.servings);
        for (original, new) in recipe.ingredients.iter().zip(scaled.ingredients.iter()) {
            assert_eq!(original.name, new.name);
            match (original.quantity, new.quantity) {
                (None, None) => {}
                (Some(q), Some(s)) => {
                    let expected = (q * factor * 100.0).round() / 100.0;
                    if target == recipe.servings {
                        assert_eq!(s, q);
                    } else {
                        assert!((s - expected).abs() < 1e-9, "{} vs {}", s, expected);
                    }
                    assert!(s >= 0.0);
                }
                other => panic!("quantity presence changed: {:?}", other),
            }
        }
    }
}

#[test]
fn test_original_servings_survives_random_rescale_chains() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let recipe = random_recipe(&mut rng);
        let baseline = recipe.servings;
        let mut current = recipe;
        for _ in 0..5 {
            let target = rng.gen_range(1..=16);
            current = current.scale(target).into_owned();
            assert_eq!(current.servings, target);
            if let Some(original) = current.original_servings {
                assert_eq!(original, baseline);
            }
        }
    }
}

#[test]
fn test_substitute_is_case_insensitive_and_keeps_quantity() {
    let recipe = spaghetti_recipe();
    let updated = recipe.substitute("GARLIC", "shallots", None, None);

    let shallots = &updated.ingredients[1];
    assert_eq!(shallots.name, "shallots");
    assert_eq!(shallots.quantity, Some(3.0));
    assert_eq!(shallots.unit.as_deref(), Some("cloves"));
    assert_eq!(shallots.preparation.as_deref(), Some("minced"));
    assert_eq!(shallots.category, IngredientCategory::Produce);
    assert!(shallots.substitutes.is_empty());

    assert_eq!(updated.ingredients[0], recipe.ingredients[0]);
    assert_eq!(updated.servings, recipe.servings);
    assert_eq!(updated.steps, recipe.steps);
    assert_eq!(recipe.ingredients[1].name, "garlic");
}

#[test]
fn test_substitute_replaces_every_same_named_ingredient() {
    let recipe = Recipe::builder("Tomato soup", 2)
        .ingredient(Ingredient::new("tomatoes").with_quantity(400.0).with_unit("g"))
        .ingredient(Ingredient::new("onion").with_quantity(1.0))
        .ingredient(Ingredient::new("Tomatoes").with_quantity(1.0).with_preparation("diced"))
        .build()
        .unwrap();

    let updated = recipe.substitute("tomatoes", "passata", None, None);

    let names_and_quantities: Vec<(&str, Option<f64>)> = updated
        .ingredients
        .iter()
        .map(|i| (i.name.as_str(), i.quantity))
        .collect();
    assert_eq!(
        names_and_quantities,
        vec![("passata", Some(400.0)), ("onion", Some(1.0)), ("passata", Some(1.0))]
    );
    assert_eq!(updated.ingredients[0].unit.as_deref(), Some("g"));
    assert_eq!(updated.ingredients[2].preparation.as_deref(), Some("diced"));
}

#[test]
fn test_substitute_with_explicit_amount() {
    let recipe = spaghetti_recipe();
    let updated = recipe.substitute("garlic", "garlic powder", Some(1.5), Some("tsp"));
    assert_eq!(updated.ingredients[1].quantity, Some(1.5));
    assert_eq!(updated.ingredients[1].unit.as_deref(), Some("tsp"));
}

#[test]
fn test_substitute_without_match_is_a_no_op() {
    let recipe = spaghetti_recipe();
    let updated = recipe.substitute("saffron", "turmeric", Some(1.0), Some("tsp"));
    assert_eq!(updated, recipe);
}

#[test]
fn test_substitute_then_scale_keeps_substitute() {
    let recipe = spaghetti_recipe();
    let updated = recipe.substitute("spaghetti", "linguine", None, None).scale(2).into_owned();
    assert_eq!(updated.ingredients[0].name, "linguine");
    assert_eq!(updated.ingredients[0].quantity, Some(200.0));
    assert_eq!(updated.original_servings, Some(4));
}
