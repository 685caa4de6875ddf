//! Generation parameters attached to templates and individual calls
//!
//! These model the tunable knobs of a chat-completion request but stay
//! provider-agnostic: local backends read the sampling projection, the remote
//! wrapper maps fields onto its wire format.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// How the next token is picked. Temperature and nucleus sampling are
/// mutually exclusive on every backend we target, so callers get one or the
/// other, never both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sampling {
    /// Softmax temperature sampling
    Temperature(f64),
    /// Nucleus (top-p) sampling
    Nucleus(f64),
}

/// Tunable parameters for a single generation call
///
/// Templates carry a default set; callers may override per call. Both raw
/// fields are stored for serialization, but backends must go through
/// [`GenerationParams::sampling`] which enforces the exclusivity rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GenerationParams {
    /// Softmax temperature, used when `use_top_p` is false (default 0.5)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Nucleus sampling probability mass, used when `use_top_p` is true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    /// Selects nucleus sampling over temperature sampling
    pub use_top_p: bool,

    /// Top-k cutoff for local backends that support it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    /// Number of completions to request (remote only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_answers: Option<u32>,

    /// Token budget for the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_tokens: Option<u32>,

    /// Stop sequences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,

    /// Per-token logit adjustments, keyed by token id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logit_bias: Option<HashMap<String, f64>>,

    /// End-user identifier forwarded to remote providers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// System prompt delivered outside the user-visible prompt body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Stream partial output as it is generated
    pub stream: bool,

    /// Emit partial output every N tokens while streaming
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_every: Option<u32>,

    /// Remote model override for this template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,

    /// Schema version of the parameter set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl GenerationParams {
    /// Project the raw temperature/top-p pair onto the sampling strategy
    /// backends actually consume
    pub fn sampling(&self) -> Sampling {
        if self.use_top_p {
            Sampling::Nucleus(self.top_p.unwrap_or(1.0))
        } else {
            Sampling::Temperature(self.temperature.unwrap_or(0.5))
        }
    }

    /// Copy of these parameters with the system prompt replaced
    pub fn with_system_prompt(&self, system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: Some(system_prompt.into()),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_defaults_to_temperature() {
        let params = GenerationParams::default();
        assert_eq!(params.sampling(), Sampling::Temperature(0.5));
    }

    #[test]
    fn test_sampling_uses_configured_temperature() {
        let params = GenerationParams {
            temperature: Some(0.7),
            ..Default::default()
        };
        assert_eq!(params.sampling(), Sampling::Temperature(0.7));
    }

    #[test]
    fn test_sampling_top_p_wins_when_flagged() {
        let params = GenerationParams {
            temperature: Some(0.7),
            top_p: Some(0.9),
            use_top_p: true,
            ..Default::default()
        };
        assert_eq!(params.sampling(), Sampling::Nucleus(0.9));
    }

    #[test]
    fn test_sampling_top_p_defaults_to_full_mass() {
        let params = GenerationParams {
            use_top_p: true,
            ..Default::default()
        };
        assert_eq!(params.sampling(), Sampling::Nucleus(1.0));
    }

    #[test]
    fn test_with_system_prompt_preserves_other_fields() {
        let params = GenerationParams {
            temperature: Some(0.4),
            maximum_tokens: Some(800),
            ..Default::default()
        };

        let updated = params.with_system_prompt("Act like a Career Advisor");
        assert_eq!(updated.system_prompt.as_deref(), Some("Act like a Career Advisor"));
        assert_eq!(updated.temperature, Some(0.4));
        assert_eq!(updated.maximum_tokens, Some(800));
    }

    #[test]
    fn test_serde_skips_unset_fields() {
        let json = serde_json::to_string(&GenerationParams::default()).unwrap();
        assert!(!json.contains("temperature"));
        assert!(json.contains("use-top-p"));
    }
}
