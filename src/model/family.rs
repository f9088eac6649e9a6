//! Per-family request bodies and response text extraction.
//!
//! | Family | Request shape | Response text |
//! |--------|---------------|---------------|
//! | Claude | chat messages | `content[*].text` |
//! | Titan  | `inputText` + `textGenerationConfig` | `results[0].outputText` |
//! | Llama  | completion `prompt` | `generation` |

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::error::{ModelError, ModelResult};

/// Claude message API version expected by the inference endpoint.
pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelFamily {
    #[default]
    Claude,
    Titan,
    Llama,
}

impl ModelFamily {
    /// Maps a selection token (`claude|titan|llama|auto`) to a family.
    ///
    /// `auto` and unrecognized tokens select the default family.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "titan" => Self::Titan,
            "llama" => Self::Llama,
            _ => Self::Claude,
        }
    }

    /// Infers the family from a model identifier.
    pub fn from_model_id(model_id: &str) -> Self {
        let id = model_id.to_lowercase();
        if id.contains("titan") {
            Self::Titan
        } else if id.contains("llama") || id.starts_with("meta.") {
            Self::Llama
        } else {
            Self::Claude
        }
    }

    pub fn default_model_id(&self) -> &'static str {
        match self {
            Self::Claude => "anthropic.claude-3-5-sonnet-20241022-v2:0",
            Self::Titan => "amazon.titan-text-premier-v1:0",
            Self::Llama => "meta.llama3-1-70b-instruct-v1:0",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Titan => "titan",
            Self::Llama => "llama",
        }
    }

    /// Builds the JSON request body for `prompt`.
    pub fn request_body(&self, prompt: &str, params: &GenerationParams) -> Value {
        match self {
            Self::Claude => serde_json::to_value(ClaudeRequest {
                anthropic_version: ANTHROPIC_VERSION,
                max_tokens: params.max_tokens,
                temperature: params.temperature,
                messages: vec![ClaudeMessage {
                    role: "user",
                    content: prompt,
                }],
            }),
            Self::Titan => serde_json::to_value(TitanRequest {
                input_text: prompt,
                text_generation_config: TitanGenerationConfig {
                    max_token_count: params.max_tokens,
                    temperature: params.temperature,
                    top_p: params.top_p,
                },
            }),
            Self::Llama => serde_json::to_value(LlamaRequest {
                prompt: &llama_instruction(prompt),
                max_gen_len: params.max_tokens,
                temperature: params.temperature,
                top_p: params.top_p,
            }),
        }
        .unwrap_or(Value::Null)
    }

    /// Pulls the generated text out of a decoded response body.
    pub fn extract_text(&self, body: &Value) -> ModelResult<String> {
        match self {
            Self::Claude => {
                let blocks = body
                    .get("content")
                    .and_then(Value::as_array)
                    .ok_or(ModelError::MissingText { path: "content" })?;
                let text = blocks
                    .iter()
                    .filter(|b| b.get("type").and_then(Value::as_str).unwrap_or("text") == "text")
                    .filter_map(|b| b.get("text").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join("\n");
                if text.is_empty() {
                    return Err(ModelError::MissingText {
                        path: "content[*].text",
                    });
                }
                Ok(text)
            }
            Self::Titan => body
                .get("results")
                .and_then(|r| r.get(0))
                .and_then(|r| r.get("outputText"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(ModelError::MissingText {
                    path: "results[0].outputText",
                }),
            Self::Llama => body
                .get("generation")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(ModelError::MissingText { path: "generation" }),
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sampling parameters shared by all families.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: crate::constants::DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: crate::constants::DEFAULT_TEMPERATURE,
            top_p: 0.9,
        }
    }
}

fn llama_instruction(prompt: &str) -> String {
    format!(
        "<|begin_of_text|><|start_header_id|>user<|end_header_id|>\n\n{prompt}<|eot_id|><|start_header_id|>assistant<|end_header_id|>\n\n"
    )
}

#[derive(Serialize)]
struct ClaudeRequest<'a> {
    anthropic_version: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ClaudeMessage<'a>>,
}

#[derive(Serialize)]
struct ClaudeMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanRequest<'a> {
    input_text: &'a str,
    text_generation_config: TitanGenerationConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanGenerationConfig {
    max_token_count: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Serialize)]
struct LlamaRequest<'a> {
    prompt: &'a str,
    max_gen_len: u32,
    temperature: f32,
    top_p: f32,
}
