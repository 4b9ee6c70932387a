use anyhow::{Context, Result};
use recipe_companion::api_connection::OpenRouterClient;
use recipe_companion::assistant::RecipeAssistant;
use recipe_companion::cli::{parse_args, Command};
use recipe_companion::config::ModelConfig;
use recipe_companion::context::RecipeContext;
use recipe_companion::events::AgentEvent;
use recipe_companion::session_store::{load_context, read_document, save_context};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_event(event: &AgentEvent) -> Result<()> {
    let json = serde_json::to_string_pretty(event).context("Failed to serialize event")?;
    println!("{}", json);
    Ok(())
}

fn print_overview(assistant: &RecipeAssistant, state: &RecipeContext) {
    println!("{}", assistant.instructions(state));
    let Some(recipe) = &state.recipe else {
        return;
    };
    let mut details = vec![format!("Difficulty: {}", recipe.difficulty.as_str())];
    if let Some(cuisine) = &recipe.cuisine {
        details.push(format!("Cuisine: {}", cuisine));
    }
    println!("\n{}", details.join(" | "));
    if let Some(step) = state.current_step_detail() {
        let timer = step
            .timer_label
            .as_deref()
            .map(|label| format!(" [timer: {}]", label))
            .unwrap_or_default();
        println!("Now: {}. {}{}", step.step_number, step.instruction, timer);
    }
    println!("\nShopping list:");
    for (category, ingredients) in recipe.ingredients_by_category() {
        println!("{}:", category.label());
        for ingredient in ingredients {
            let mark = if state.is_checked(&ingredient.name) { "x" } else { " " };
            println!("  [{}] {}", mark, ingredient);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok(); // Load .env file for API keys
    init_logging();

    let cli = parse_args();
    let config = ModelConfig::from_env().context("Invalid model configuration")?;
    let client = OpenRouterClient::new(&config).context("Failed to create model client")?;
    let assistant = RecipeAssistant::new(Arc::new(client));
    info!(model = assistant.model_name(), state = %cli.state.display(), "Recipe companion ready");

    let mut state = match &cli.command {
        Command::Upload { .. } => RecipeContext::default(),
        _ => load_context(&cli.state).await?,
    };

    let event = match cli.command {
        Command::Upload { document } => {
            let text = read_document(&document).await?;
            state = assistant.load_document(text).await;
            if state.recipe.is_none() {
                info!("Recipe could not be parsed; session holds the document text only");
            }
            AgentEvent::snapshot(&state)
        }
        Command::Scale { servings } => assistant.scale_recipe(&mut state, servings),
        Command::Substitute {
            original,
            substitute,
        } => {
            assistant
                .substitute_ingredient(&mut state, &original, &substitute)
                .await
        }
        Command::Progress {
            step,
            cooking_started,
        } => assistant.update_cooking_progress(&mut state, step, cooking_started),
        Command::Check { ingredient } => assistant.toggle_ingredient(&mut state, &ingredient),
        Command::Show => {
            print_overview(&assistant, &state);
            return Ok(());
        }
    };

    if event.as_snapshot().is_some() {
        save_context(&cli.state, &state).await?;
    }
    print_event(&event)
}
