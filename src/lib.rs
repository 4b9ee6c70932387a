pub mod api_connection;
pub mod assistant;
pub mod cli;
pub mod config;
pub mod context;
pub mod events;
pub mod ingredient_matcher;
pub mod recipe;
pub mod recipe_parser;
pub mod session_store;
pub mod step_rewriter;
