//! JSON persistence of a [`RecipeContext`] between command-line invocations.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::context::RecipeContext;

/// Load the session at `path`; a missing file is an empty session.
pub async fn load_context(path: &Path) -> Result<RecipeContext> {
    if !fs::try_exists(path)
        .await
        .with_context(|| format!("Failed to check session file '{}'", path.display()))?
    {
        debug!(path = %path.display(), "No session file yet, starting empty");
        return Ok(RecipeContext::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read session file '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Session file '{}' is not a valid recipe context", path.display()))
}

pub async fn save_context(path: &Path, context: &RecipeContext) -> Result<()> {
    let json = serde_json::to_string_pretty(context).context("Failed to serialize recipe context")?;
    fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write session file '{}'", path.display()))?;
    debug!(path = %path.display(), "Saved session");
    Ok(())
}

/// Read an uploaded document as text, dropping invalid UTF-8.
pub async fn read_document(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .await
        .with_context(|| format!("Failed to read recipe file '{}'", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
