//! Events returned by assistant tools.

use serde::{Deserialize, Serialize};

use crate::context::RecipeContext;

/// What a tool call hands back to the chat orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentEvent {
    /// Full replacement of the client's shared state.
    StateSnapshot { snapshot: RecipeContext },
    /// Plain text for the model to relay to the user.
    TextMessage { content: String },
}

impl AgentEvent {
    pub fn snapshot(state: &RecipeContext) -> Self {
        AgentEvent::StateSnapshot {
            snapshot: state.clone(),
        }
    }

    pub fn message(content: impl Into<String>) -> Self {
        AgentEvent::TextMessage {
            content: content.into(),
        }
    }

    pub fn as_snapshot(&self) -> Option<&RecipeContext> {
        match self {
            AgentEvent::StateSnapshot { snapshot } => Some(snapshot),
            AgentEvent::TextMessage { .. } => None,
        }
    }

    pub fn as_message(&self) -> Option<&str> {
        match self {
            AgentEvent::TextMessage { content } => Some(content),
            AgentEvent::StateSnapshot { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_wire_format() {
        let value = serde_json::to_value(AgentEvent::snapshot(&RecipeContext::default())).unwrap();
        assert_eq!(value["type"], "STATE_SNAPSHOT");
        assert_eq!(value["snapshot"]["current_step"], 0);
    }

    #[test]
    fn test_message_wire_format() {
        let value = serde_json::to_value(AgentEvent::message("hello")).unwrap();
        assert_eq!(value, serde_json::json!({"type": "TEXT_MESSAGE", "content": "hello"}));
    }
}
