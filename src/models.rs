//! Chat model catalog
//!
//! Metadata for the models the client can address, used for the models
//! listing, the gateway's token cap, and the simulator's delay banding.

/// Metadata for one selectable chat model
#[derive(Debug, Clone, Copy)]
pub struct ChatModel {
    /// Provider-facing identifier (e.g. "gpt-4o-mini")
    pub id: &'static str,
    /// Display name (e.g. "GPT-4o Mini")
    pub name: &'static str,
    /// Short capability description
    pub description: &'static str,
    /// Completion token ceiling
    pub max_tokens: u32,
    /// Cost per 1K tokens, in dollars
    pub cost_per_1k: f64,
    /// Whether the model handles attached-file analysis
    pub supports_files: bool,
}

/// All models the client knows about
pub const CHAT_MODELS: &[ChatModel] = &[
    ChatModel {
        id: "gpt-4o",
        name: "GPT-4o",
        description: "Most advanced model, excellent for file analysis and complex tasks",
        max_tokens: 4096,
        cost_per_1k: 0.03,
        supports_files: true,
    },
    ChatModel {
        id: "gpt-4o-mini",
        name: "GPT-4o Mini",
        description: "Faster and affordable, good for file analysis",
        max_tokens: 16384,
        cost_per_1k: 0.0015,
        supports_files: true,
    },
    ChatModel {
        id: "gpt-4-turbo",
        name: "GPT-4 Turbo",
        description: "High-performance model with excellent file processing",
        max_tokens: 4096,
        cost_per_1k: 0.01,
        supports_files: true,
    },
    ChatModel {
        id: "gpt-4",
        name: "GPT-4",
        description: "Most capable model, excellent for document analysis",
        max_tokens: 8192,
        cost_per_1k: 0.03,
        supports_files: true,
    },
    ChatModel {
        id: "gpt-3.5-turbo",
        name: "GPT-3.5 Turbo",
        description: "Fast and efficient, basic file analysis support",
        max_tokens: 4096,
        cost_per_1k: 0.001,
        supports_files: false,
    },
    ChatModel {
        id: "gpt-3.5-turbo-16k",
        name: "GPT-3.5 Turbo 16K",
        description: "Extended context, good for larger files",
        max_tokens: 16384,
        cost_per_1k: 0.003,
        supports_files: false,
    },
];

/// Identifier of the model selected when nothing else is configured
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Look up a model by identifier, falling back to the default model
///
/// # Examples
///
/// ```
/// use intermax::models::model_by_id;
///
/// assert_eq!(model_by_id("gpt-4").name, "GPT-4");
/// assert_eq!(model_by_id("no-such-model").id, "gpt-4o-mini");
/// ```
pub fn model_by_id(id: &str) -> &'static ChatModel {
    CHAT_MODELS
        .iter()
        .find(|m| m.id == id)
        .unwrap_or(&CHAT_MODELS[1])
}

/// Whether a model identifier names the higher-capability tier
pub fn is_advanced_tier(id: &str) -> bool {
    id.contains("gpt-4")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lists_six_models() {
        assert_eq!(CHAT_MODELS.len(), 6);
    }

    #[test]
    fn test_model_by_id_finds_known_model() {
        let model = model_by_id("gpt-3.5-turbo-16k");
        assert_eq!(model.max_tokens, 16384);
        assert!(!model.supports_files);
    }

    #[test]
    fn test_model_by_id_falls_back_to_default() {
        assert_eq!(model_by_id("unknown").id, DEFAULT_MODEL);
        assert_eq!(model_by_id("").id, DEFAULT_MODEL);
    }

    #[test]
    fn test_advanced_tier_detection() {
        assert!(is_advanced_tier("gpt-4o"));
        assert!(is_advanced_tier("gpt-4-turbo"));
        assert!(!is_advanced_tier("gpt-3.5-turbo"));
    }
}
