//! Sidekick - template-driven prompt assembly and completion
//!
//! Sidekick turns the `promptbook` template catalog into answers. Prompts are
//! assembled locally (template + subcommand selections + user text), then run
//! either through an in-process [`engine`] backend with token streaming, or
//! through a hosted [`remote`] completion service.
//!
//! # Core Concepts
//!
//! - **Assembly is pure**: resolve and compose never touch the network
//! - **One load, many generations**: backends load once behind a once-cell
//! - **Stream-first output**: tokens reach the sink at a display cadence
//! - **Sanitized answers**: think-tags never leak into final output
//!
//! # Modules
//!
//! - [`engine`] - Local generation engine (backend trait, decode loop, sanitizer)
//! - [`remote`] - Hosted completion clients (OpenAI and Azure)
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod engine;
pub mod remote;

// Re-export commonly used types
pub use config::{Config, GenerationConfig, RemoteConfig};
pub use engine::{
    BackendError, GenerateOptions, GenerateOutput, GenerateRequest, Generator, ModelBackend, ModelLoader,
    SanitizeSession, StepDirective,
};
pub use remote::{AzureClient, CompletionService, OpenAiClient, RemoteError, create_client};
