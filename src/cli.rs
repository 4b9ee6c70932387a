//! Command-line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON session file holding the recipe context
    #[arg(short, long, global = true, default_value = "recipe_state.json")]
    pub state: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Parse a recipe text file and start a new session
    Upload {
        /// Path to the recipe text file
        #[arg(short, long)]
        document: PathBuf,
    },
    /// Scale the recipe to a number of servings
    Scale {
        #[arg(long)]
        servings: u32,
    },
    /// Replace an ingredient, matched loosely by name
    Substitute {
        /// Ingredient to replace (may be informal, e.g. "tomatoes")
        #[arg(long)]
        original: String,
        /// Substitute ingredient
        #[arg(long = "with")]
        substitute: String,
    },
    /// Move to a step (0-based) or start/stop cooking
    Progress {
        #[arg(long)]
        step: Option<usize>,
        #[arg(long)]
        cooking_started: Option<bool>,
    },
    /// Tick an ingredient off the checklist, or un-tick it
    Check {
        #[arg(long)]
        ingredient: String,
    },
    /// Print the assistant instructions and the shopping list
    Show,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
