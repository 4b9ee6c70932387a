use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OpenRouterAvailableModel {
    pub model_name: &'static str,
    pub model_source: &'static str,
}

/// Hosted chat-completions backends the model client can talk to.
#[derive(Clone, Debug)]
pub enum Provider {
    OpenRouter {
        api_key_env_var: String,
        base_url: String,
        provider_only: Vec<String>,
        site_url: String,
        app_name: String,
        http: reqwest::Client,
    },
}

pub const OPENROUTER_MODELS: &[OpenRouterAvailableModel] = &[
    OpenRouterAvailableModel {
        model_name: "qwen/qwen3-32b",
        model_source: "cerebras",
    },
    OpenRouterAvailableModel {
        model_name: "openai/gpt-4o",
        model_source: "openai",
    },
    OpenRouterAvailableModel {
        model_name: "google/gemini-2.5-flash",
        model_source: "google",
    },
];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// The `type` keyword: one type name, or a union such as `["string", "null"]`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Union(Vec<String>),
}

/// A (non-strict) JSON schema node describing structured model output.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JsonSchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, JsonSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<JsonSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#enum: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "additionalProperties")]
    pub additional_properties: Option<bool>,
}

impl JsonSchema {
    fn leaf(schema_type: &str, description: &str) -> Self {
        Self {
            schema_type: SchemaType::Single(schema_type.to_string()),
            description: Some(description.to_string()),
            properties: None,
            items: None,
            required: None,
            r#enum: None,
            additional_properties: None,
        }
    }

    pub fn string(description: &str) -> Self {
        Self::leaf("string", description)
    }

    pub fn number(description: &str) -> Self {
        Self::leaf("number", description)
    }

    pub fn integer(description: &str) -> Self {
        Self::leaf("integer", description)
    }

    pub fn boolean(description: &str) -> Self {
        Self::leaf("boolean", description)
    }

    pub fn enumeration(values: &[&str], description: &str) -> Self {
        Self {
            r#enum: Some(values.iter().map(|v| v.to_string()).collect()),
            ..Self::leaf("string", description)
        }
    }

    pub fn array(items: JsonSchema, description: &str) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::leaf("array", description)
        }
    }

    /// Also accept `null` in place of a value.
    pub fn nullable(mut self) -> Self {
        self.schema_type = match self.schema_type {
            SchemaType::Single(name) => SchemaType::Union(vec![name, "null".to_string()]),
            SchemaType::Union(mut names) => {
                if !names.iter().any(|n| n == "null") {
                    names.push("null".to_string());
                }
                SchemaType::Union(names)
            }
        };
        self
    }

    /// Object node; `required` lists the property names the model must always emit.
    pub fn object(properties: Vec<(&str, JsonSchema)>, required: &[&str]) -> Self {
        Self {
            schema_type: SchemaType::Single("object".to_string()),
            description: None,
            properties: Some(
                properties
                    .into_iter()
                    .map(|(name, schema)| (name.to_string(), schema))
                    .collect(),
            ),
            items: None,
            required: Some(required.iter().map(|r| r.to_string()).collect()),
            r#enum: None,
            additional_properties: Some(false),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JsonSchemaDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    pub schema: JsonSchema,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<JsonSchemaDefinition>,
}

impl ResponseFormat {
    pub fn json_schema(definition: JsonSchemaDefinition) -> Self {
        Self {
            format_type: "json_schema".to_string(),
            json_schema: Some(definition),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionResponseMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
    pub index: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: Option<u32>,
    pub total_tokens: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionResponse {
    pub id: String,
    #[serde(default)]
    pub object: Option<String>,
    pub created: u64,
    pub model: String,
    pub choices: Vec<ChatCompletionChoice>,
    #[serde(default)]
    pub usage: Option<ChatCompletionUsage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_schema_serializes_with_openai_field_names() {
        let schema = JsonSchema::object(
            vec![
                ("name", JsonSchema::string("Ingredient name")),
                (
                    "category",
                    JsonSchema::enumeration(&["produce", "other"], "Category"),
                ),
            ],
            &["name"],
        );
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["type"], "object");
        assert_eq!(value["additionalProperties"], false);
        assert_eq!(value["required"], json!(["name"]));
        assert_eq!(value["properties"]["category"]["enum"], json!(["produce", "other"]));
        assert!(value["properties"]["name"].get("items").is_none());
    }

    #[test]
    fn nullable_schema_serializes_type_union() {
        let value = serde_json::to_value(JsonSchema::string("Matched name").nullable().nullable()).unwrap();
        assert_eq!(value["type"], json!(["string", "null"]));
        assert_eq!(value["description"], "Matched name");
    }

    #[test]
    fn response_message_tolerates_null_content() {
        let raw = json!({
            "id": "gen-1",
            "created": 1,
            "model": "qwen/qwen3-32b",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": null}}]
        });
        let response: ChatCompletionResponse = serde_json::from_value(raw).unwrap();
        assert!(response.choices[0].message.content.is_none());
        assert!(response.usage.is_none());
    }
}
