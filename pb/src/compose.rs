//! Final prompt composition
//!
//! The last pure step before a backend sees the request. No state, no side
//! effects: identical inputs always produce byte-identical output, which is
//! what makes resolved prompts cacheable and testable upstream.

use crate::resolve::ResolvedPrompt;

/// A fully composed request prompt
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPrompt {
    pub system_prompt: Option<String>,
    pub body: String,
}

impl ComposedPrompt {
    /// Single-string form, system segment strictly before the body
    pub fn text(&self) -> String {
        match &self.system_prompt {
            Some(system) => format!("{system}\n\n{}", self.body),
            None => self.body.clone(),
        }
    }
}

/// Compose the final request prompt
///
/// The override, when given, replaces whatever system prompt resolution
/// recorded.
pub fn compose(resolved: &ResolvedPrompt, system_prompt_override: Option<&str>) -> ComposedPrompt {
    let system_prompt = system_prompt_override
        .map(str::to_string)
        .or_else(|| resolved.params.system_prompt.clone());

    ComposedPrompt {
        system_prompt,
        body: resolved.instruction.clone(),
    }
}
