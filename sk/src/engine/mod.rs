//! Local generation engine
//!
//! Model lifecycle, the token decode loop, and output sanitization.

pub mod backend;
mod generator;
mod loader;
mod sanitize;

pub use backend::{
    BackendError, DecodeStep, GenerateOutput, GenerateRequest, ModelBackend, ProgressFn, StepDirective, StepFn,
    TokenDecoder,
};
pub use generator::{DEFAULT_DISPLAY_EVERY, DEFAULT_MAX_TOKENS, GenerateOptions, Generator, OutputFn};
pub use loader::ModelLoader;
pub use sanitize::SanitizeSession;
