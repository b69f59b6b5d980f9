//! Wire types for the completions endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Value of `id` in every response.
pub const RESPONSE_ID: &str = "chatcmpl-123";
/// Value of `object` in every response.
pub const RESPONSE_OBJECT: &str = "text_completion";
/// Value of `created` in every response.
pub const RESPONSE_CREATED: i64 = 1_234_567_890;
/// `finish_reason` of the single choice.
pub const FINISH_REASON: &str = "stop";

/// Field names of [`CompletionRequest`] as they appear on the wire.
const REQUEST_FIELDS: [&str; 4] = ["model", "prompt", "max_tokens", "temperature"];

/// Body of `POST /v1/completions`.
///
/// Every field is optional and falls back to its zero value, as does an
/// explicit `null`. `max_tokens` and `temperature` are accepted for client
/// compatibility but never reach the inference binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionRequest {
    /// Model name, echoed back in the response.
    #[serde(deserialize_with = "null_as_default")]
    pub model: String,
    /// Prompt text passed to the inference binary.
    #[serde(deserialize_with = "null_as_default")]
    pub prompt: String,
    /// Requested output cap (ignored).
    #[serde(deserialize_with = "null_as_default")]
    pub max_tokens: i64,
    /// Requested sampling temperature (ignored).
    #[serde(deserialize_with = "null_as_default")]
    pub temperature: f64,
}

impl CompletionRequest {
    /// Parses a request body leniently.
    ///
    /// A top-level `null` is an empty request, the last of duplicate keys
    /// wins, and keys match field names case-insensitively with an exact
    /// match taking precedence. Wrong value types are still errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not JSON or a field has the wrong type.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        match serde_json::from_slice::<Value>(body)? {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => serde_json::from_value(Value::Object(fold_field_case(map))),
            other => serde_json::from_value(other),
        }
    }
}

/// Renames keys that match a request field only up to ASCII case.
fn fold_field_case(map: Map<String, Value>) -> Map<String, Value> {
    let mut folded = Map::with_capacity(map.len());
    let mut inexact = Vec::new();
    for (key, value) in map {
        match REQUEST_FIELDS.iter().find(|field| field.eq_ignore_ascii_case(&key)) {
            Some(field) if **field != key => inexact.push((*field, value)),
            _ => {
                folded.insert(key, value);
            }
        }
    }
    for (field, value) in inexact {
        folded.entry(field).or_insert(value);
    }
    folded
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One generated alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Generated text.
    pub text: String,
    /// Position in `choices`.
    pub index: u32,
    /// Why generation stopped.
    pub finish_reason: String,
}

/// Token accounting. Never computed, so always zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens generated.
    pub completion_tokens: u32,
    /// Sum of the two.
    pub total_tokens: u32,
}

/// Successful response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Response id (constant).
    pub id: String,
    /// Object type (constant).
    pub object: String,
    /// Creation timestamp (constant).
    pub created: i64,
    /// Model name from the request.
    pub model: String,
    /// Exactly one choice.
    pub choices: Vec<Choice>,
    /// Always zero.
    pub usage: Usage,
}

impl CompletionResponse {
    /// Wraps generated `text` in the fixed envelope.
    #[must_use]
    pub fn new(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: RESPONSE_ID.to_string(),
            object: RESPONSE_OBJECT.to_string(),
            created: RESPONSE_CREATED,
            model: model.into(),
            choices: vec![Choice {
                text: text.into(),
                index: 0,
                finish_reason: FINISH_REASON.to_string(),
            }],
            usage: Usage::default(),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Generic, client-safe message.
    pub error: String,
}
