//! Static model registry.
//!
//! Each entry describes one hosted model: its provider routing id, the
//! default and min/max bounds for every tunable parameter, and capability
//! flags. The registry is built once at startup and shared read-only; it is
//! never mutated afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::chat::{ChatMessage, TuningParams};

/// Default, minimum and maximum for one numeric parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParamBounds<T> {
    pub default: T,
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> ParamBounds<T> {
    pub const fn new(default: T, min: T, max: T) -> Self {
        Self { default, min, max }
    }

    /// Clamp a supplied value into `[min, max]`, or fall back to the default.
    pub fn resolve(&self, value: Option<T>) -> T {
        match value {
            None => self.default,
            Some(v) if v < self.min => self.min,
            Some(v) if v > self.max => self.max,
            Some(v) => v,
        }
    }

    /// Clamp a value into `[min, max]` only when one was supplied.
    pub fn resolve_opt(&self, value: Option<T>) -> Option<T> {
        value.map(|v| {
            if v < self.min {
                self.min
            } else if v > self.max {
                self.max
            } else {
                v
            }
        })
    }
}

/// Configuration for one registry model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelConfig {
    /// Provider routing id, e.g. `@cf/meta/llama-3.1-8b-instruct`.
    pub id: String,
    /// Human-readable name for the model picker.
    pub display_name: String,
    pub max_tokens: ParamBounds<u32>,
    pub temperature: ParamBounds<f64>,
    pub top_p: ParamBounds<f64>,
    pub top_k: ParamBounds<u32>,
    /// Seed has no default: an unseeded call stays unseeded.
    pub seed: ParamBounds<u64>,
    pub repetition_penalty: ParamBounds<f64>,
    pub frequency_penalty: ParamBounds<f64>,
    pub presence_penalty: ParamBounds<f64>,
    pub supports_tools: bool,
    pub supports_json_mode: bool,
}

/// Fully-resolved parameter bundle actually dispatched to the provider.
///
/// Field names are the provider's snake_case wire names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedParams {
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub repetition_penalty: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<serde_json::Value>>,
}

/// The body posted to the provider's run endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchBody {
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    #[serde(flatten)]
    pub params: ResolvedParams,
}

impl ModelConfig {
    /// Resolve client-supplied tuning parameters against this model's
    /// bounds: every numeric value is clamped into `[min, max]`, absent
    /// values fall back to the defaults, and capability-gated fields are
    /// dropped when the model cannot honor them.
    pub fn resolve(&self, params: &TuningParams) -> ResolvedParams {
        let response_format = if self.supports_json_mode {
            params.response_format.clone().or_else(|| {
                if params.use_json_mode == Some(true) {
                    Some(serde_json::json!({ "type": "json_object" }))
                } else {
                    None
                }
            })
        } else {
            if params.use_json_mode == Some(true) || params.response_format.is_some() {
                tracing::debug!(model = %self.id, "dropping response_format: model has no JSON mode");
            }
            None
        };

        let tools = if self.supports_tools {
            params.tools.clone().filter(|t| !t.is_empty())
        } else {
            if params.tools.is_some() {
                tracing::debug!(model = %self.id, "dropping tools: model has no tool support");
            }
            None
        };

        ResolvedParams {
            max_tokens: self.max_tokens.resolve(params.max_tokens),
            temperature: self.temperature.resolve(params.temperature),
            top_p: self.top_p.resolve(params.top_p),
            top_k: self.top_k.resolve(params.top_k),
            seed: self.seed.resolve_opt(params.seed),
            repetition_penalty: self.repetition_penalty.resolve(params.repetition_penalty),
            frequency_penalty: self.frequency_penalty.resolve(params.frequency_penalty),
            presence_penalty: self.presence_penalty.resolve(params.presence_penalty),
            response_format,
            tools,
        }
    }
}

/// Read-only registry of available models, keyed by short model key.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: BTreeMap<String, ModelConfig>,
}

impl ModelRegistry {
    /// Build the built-in registry.
    #[must_use]
    pub fn builtin() -> Self {
        let mut models = BTreeMap::new();

        models.insert(
            "llama-3.1-8b".to_string(),
            ModelConfig {
                id: "@cf/meta/llama-3.1-8b-instruct".to_string(),
                display_name: "Llama 3.1 8B Instruct".to_string(),
                supports_tools: true,
                supports_json_mode: true,
                ..Self::default_bounds()
            },
        );
        models.insert(
            "llama-3.3-70b".to_string(),
            ModelConfig {
                id: "@cf/meta/llama-3.3-70b-instruct-fp8-fast".to_string(),
                display_name: "Llama 3.3 70B Instruct".to_string(),
                supports_tools: true,
                supports_json_mode: true,
                max_tokens: ParamBounds::new(512, 1, 4096),
                ..Self::default_bounds()
            },
        );
        models.insert(
            "mistral-7b".to_string(),
            ModelConfig {
                id: "@cf/mistral/mistral-7b-instruct-v0.2".to_string(),
                display_name: "Mistral 7B Instruct v0.2".to_string(),
                supports_tools: false,
                supports_json_mode: false,
                ..Self::default_bounds()
            },
        );
        models.insert(
            "qwen2.5-coder-32b".to_string(),
            ModelConfig {
                id: "@cf/qwen/qwen2.5-coder-32b-instruct".to_string(),
                display_name: "Qwen 2.5 Coder 32B".to_string(),
                supports_tools: false,
                supports_json_mode: true,
                temperature: ParamBounds::new(0.2, 0.0, 2.0),
                ..Self::default_bounds()
            },
        );
        models.insert(
            "deepseek-r1-32b".to_string(),
            ModelConfig {
                id: "@cf/deepseek-ai/deepseek-r1-distill-qwen-32b".to_string(),
                display_name: "DeepSeek R1 Distill 32B".to_string(),
                supports_tools: false,
                supports_json_mode: false,
                max_tokens: ParamBounds::new(1024, 1, 8192),
                ..Self::default_bounds()
            },
        );

        Self { models }
    }

    /// Shared bounds most entries start from.
    fn default_bounds() -> ModelConfig {
        ModelConfig {
            id: String::new(),
            display_name: String::new(),
            max_tokens: ParamBounds::new(256, 1, 2048),
            temperature: ParamBounds::new(0.7, 0.0, 2.0),
            top_p: ParamBounds::new(0.9, 0.0, 1.0),
            top_k: ParamBounds::new(40, 1, 100),
            seed: ParamBounds::new(0, 1, 9_999_999_999),
            repetition_penalty: ParamBounds::new(1.0, 0.0, 2.0),
            frequency_penalty: ParamBounds::new(0.0, -2.0, 2.0),
            presence_penalty: ParamBounds::new(0.0, -2.0, 2.0),
            supports_tools: false,
            supports_json_mode: false,
        }
    }

    /// Look up a model by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ModelConfig> {
        self.models.get(key)
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelConfig)> {
        self.models.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of registered models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
