//! PromptBook - prompt assembly engine
//!
//! PromptBook turns reusable templates plus user choices into final request
//! prompts. Everything here is pure data and pure functions: templates are
//! immutable, per-call choices travel in selections, and resolution has no
//! state to leak between calls.
//!
//! # Modules
//!
//! - [`template`] - Template, subcommand, and selection types
//! - [`params`] - Generation parameters and the sampling projection
//! - [`catalog`] - Built-in template catalog
//! - [`resolve`] - Subcommand resolution into instruction text
//! - [`compose`] - Final system-prompt + body composition

pub mod catalog;
pub mod compose;
pub mod params;
pub mod resolve;
pub mod template;

// Re-export commonly used types
pub use catalog::Catalog;
pub use compose::{ComposedPrompt, compose};
pub use params::{GenerationParams, Sampling};
pub use resolve::{ResolveError, ResolvedPrompt, Resolver};
pub use template::{
    DEFAULT_FILE_TOKEN_BUDGET, Selection, SubcommandOption, SubcommandSpec, Template, TemplateKind, placeholder,
};
