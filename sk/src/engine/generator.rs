//! Token generation loop
//!
//! Drives a loaded model's incremental decode, enforcing the token budget
//! and the display cadence, and delivers partial and final output to a
//! caller-supplied sink. Partial output is sanitized before display so a
//! reasoning preamble never reaches the user unless asked for.

use std::sync::Arc;

use tracing::debug;

use promptbook::GenerationParams;

use super::backend::{BackendError, DecodeStep, GenerateRequest, ModelBackend, StepDirective};
use super::loader::ModelLoader;
use super::sanitize::SanitizeSession;

/// Default response token budget
pub const DEFAULT_MAX_TOKENS: u32 = 1200;

/// Update the display every N tokens. 4 looks like it updates continuously
/// and is low overhead; updating on every token costs around 15% of
/// tokens/s.
pub const DEFAULT_DISPLAY_EVERY: u32 = 4;

/// Per-call options for the generation loop
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    /// Emit partial output while decoding
    pub stream: bool,
    /// Show partial output even before a reasoning tag has appeared
    pub show_thinking: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            stream: true,
            show_thinking: false,
        }
    }
}

/// Sink receiving partial and final output as `(text, is_final)`
pub type OutputFn<'a> = &'a mut (dyn FnMut(&str, bool) + Send);

/// Runs generations against a lazily loaded model
pub struct Generator<B: ModelBackend> {
    loader: Arc<ModelLoader<B>>,
    max_tokens: u32,
    display_every: u32,
}

impl<B: ModelBackend> Generator<B> {
    pub fn new(loader: Arc<ModelLoader<B>>) -> Self {
        Self {
            loader,
            max_tokens: DEFAULT_MAX_TOKENS,
            display_every: DEFAULT_DISPLAY_EVERY,
        }
    }

    /// Generator with budget and cadence taken from configuration
    pub fn from_config(loader: Arc<ModelLoader<B>>, config: &crate::config::GenerationConfig) -> Self {
        Self::new(loader)
            .with_max_tokens(config.max_tokens)
            .with_display_every(config.display_every)
    }

    /// Replace the default token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Replace the default display cadence
    pub fn with_display_every(mut self, display_every: u32) -> Self {
        self.display_every = display_every;
        self
    }

    pub fn loader(&self) -> &Arc<ModelLoader<B>> {
        &self.loader
    }

    /// Generate text for `prompt`, loading the model first if needed
    ///
    /// The sink sees zero or more `(chunk, false)` calls in increasing
    /// token order, then exactly one `(text, true)` call. On error the
    /// final call never happens; an error and a final callback are
    /// mutually exclusive outcomes.
    pub async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        params: &GenerationParams,
        options: GenerateOptions,
        output: OutputFn<'_>,
    ) -> Result<(), BackendError> {
        let handle = self.loader.load().await?;

        let max_tokens = params.maximum_tokens.unwrap_or(self.max_tokens);
        let display_every = params.display_every.unwrap_or(self.display_every).max(1);

        // Backend-facing system wrap, distinct from the task framing the
        // composer already applied
        let full_prompt = match system_prompt {
            Some(system) => format!("<system>{system}</system>\n{prompt}"),
            None => prompt.to_string(),
        };

        let request = GenerateRequest {
            prompt: full_prompt,
            sampling: params.sampling(),
            seed: chrono::Utc::now().timestamp_millis() as u64,
        };

        debug!(
            max_tokens,
            display_every,
            stream = options.stream,
            show_thinking = options.show_thinking,
            "Generator::generate: starting decode"
        );

        let mut session = SanitizeSession::new();

        let result = {
            let session = &mut session;
            let output = &mut *output;
            let mut on_step = |step: &DecodeStep<'_>| {
                let count = step.token_count();

                if options.stream && count % display_every == 0 {
                    let text = step.decode();
                    if let Some(chunk) = session.sanitize(&text, options.show_thinking)
                        && !chunk.is_empty()
                    {
                        output(&chunk, false);
                    }
                }

                if count >= max_tokens {
                    debug!(count, "Generator::generate: token budget reached, stopping");
                    StepDirective::Stop
                } else {
                    StepDirective::Continue
                }
            };

            self.loader
                .backend()
                .generate(&handle, request, &mut on_step)
                .await?
        };

        debug!(token_count = result.token_count, "Generator::generate: decode complete");

        // Final output is always visualized; an empty answer is still an
        // answer
        let final_text = session.sanitize(&result.text, true).unwrap_or_default();
        output(&final_text, true);

        Ok(())
    }
}
