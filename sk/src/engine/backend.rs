//! Model backend abstraction
//!
//! The on-device runtime is an external collaborator reached through
//! [`ModelBackend`]: one slow `load` producing an opaque handle, then
//! `generate` driving an incremental decode loop. The per-step callback is
//! the only control channel into a running generation - it observes the
//! cumulative token sequence and decides whether decoding continues.

use async_trait::async_trait;
use thiserror::Error;

use promptbook::Sampling;

/// Errors from the model backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// Model load failed; the lifecycle manager stays idle and the caller
    /// may retry
    #[error("model load failed: {0}")]
    Load(String),

    /// Decoding failed mid-generation
    #[error("generation failed: {0}")]
    Generation(String),
}

/// Fractional progress sink for model loading (0.0 to 1.0)
pub type ProgressFn<'a> = &'a (dyn Fn(f32) + Send + Sync);

/// Directive returned by the per-step callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirective {
    Continue,
    Stop,
}

/// Decodes token ids into text
pub trait TokenDecoder: Send + Sync {
    fn decode(&self, tokens: &[u32]) -> String;
}

/// One decoding step: the cumulative token ids so far plus a decoder for
/// on-demand text conversion. Decoding on every step costs real throughput,
/// so the callback decides when to pay for it.
pub struct DecodeStep<'a> {
    tokens: &'a [u32],
    decoder: &'a dyn TokenDecoder,
}

impl<'a> DecodeStep<'a> {
    pub fn new(tokens: &'a [u32], decoder: &'a dyn TokenDecoder) -> Self {
        Self { tokens, decoder }
    }

    /// Number of tokens produced so far
    pub fn token_count(&self) -> u32 {
        self.tokens.len() as u32
    }

    /// Decode the cumulative token sequence to text
    pub fn decode(&self) -> String {
        self.decoder.decode(self.tokens)
    }
}

/// Per-step callback driving the decode loop
pub type StepFn<'a> = &'a mut (dyn FnMut(&DecodeStep<'_>) -> StepDirective + Send);

/// Request for one generation call
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Full prompt, including any backend-facing system wrapping
    pub prompt: String,
    /// Sampling strategy, already projected to one of the two modes
    pub sampling: Sampling,
    /// RNG seed for the decode
    pub seed: u64,
}

/// Final output of one generation call
#[derive(Debug, Clone)]
pub struct GenerateOutput {
    pub text: String,
    pub token_count: u32,
}

/// An on-device model runtime
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Opaque loaded-model handle, shared read-only across generations
    type Handle: Send + Sync;

    /// Identifier of the model this backend loads
    fn model_id(&self) -> &str;

    /// Load the model, reporting fractional progress along the way
    async fn load(&self, on_progress: ProgressFn<'_>) -> Result<Self::Handle, BackendError>;

    /// Run the decode loop, invoking `on_step` after each produced token
    /// until the script ends or the callback returns [`StepDirective::Stop`]
    async fn generate(
        &self,
        handle: &Self::Handle,
        request: GenerateRequest,
        on_step: StepFn<'_>,
    ) -> Result<GenerateOutput, BackendError>;
}
