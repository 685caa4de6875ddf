//! Template and subcommand descriptors
//!
//! A template is an immutable recipe for one instruction prompt: base text
//! with `{subcommand:<id>}` placeholders, ordered subcommand specs supplying
//! the substitutions, and default generation parameters. Templates never
//! change after construction; per-call choices travel in [`Selection`]s so
//! resolution stays a pure function of its inputs.

use serde::{Deserialize, Serialize};

use crate::params::GenerationParams;

/// Token budget applied to injected file contents when an option does not
/// set its own
pub const DEFAULT_FILE_TOKEN_BUDGET: u32 = 1200;

/// Literal placeholder for a subcommand's resolved text inside base text.
///
/// There is no escape syntax; the sequence is always treated as a
/// placeholder wherever it appears.
pub fn placeholder(subcommand_id: &str) -> String {
    format!("{{subcommand:{subcommand_id}}}")
}

/// Where a template comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    /// Stock template from the built-in catalog
    #[default]
    System,
    /// User-authored template
    Custom,
}

/// One selectable option within a subcommand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubcommandOption {
    /// Identifier the caller selects by
    pub id: String,

    /// Text substituted for the placeholder (or replacing the base text)
    pub text: String,

    /// Pure gate for a conditional subcommand; contributes no text itself
    #[serde(default)]
    pub is_conditional_placeholder: bool,

    /// Replaces the whole working text instead of filling a placeholder
    #[serde(default)]
    pub overrides_base_text: bool,

    /// Accepts an attached file whose contents are appended to the prompt
    #[serde(default)]
    pub accepts_file: bool,

    /// Permitted file extensions when `accepts_file` is set
    #[serde(default)]
    pub allowed_file_extensions: Vec<String>,

    /// Token budget for injected file contents
    #[serde(default = "default_file_token_budget")]
    pub file_token_budget: u32,

    /// Input-field hint for a host UI
    #[serde(default)]
    pub helper_text: Option<String>,

    /// Human label for the expected file (e.g. "Resumé")
    #[serde(default)]
    pub file_description: Option<String>,
}

fn default_file_token_budget() -> u32 {
    DEFAULT_FILE_TOKEN_BUDGET
}

impl Default for SubcommandOption {
    fn default() -> Self {
        Self {
            id: String::new(),
            text: String::new(),
            is_conditional_placeholder: false,
            overrides_base_text: false,
            accepts_file: false,
            allowed_file_extensions: Vec::new(),
            file_token_budget: DEFAULT_FILE_TOKEN_BUDGET,
            helper_text: None,
            file_description: None,
        }
    }
}

impl SubcommandOption {
    /// Create a plain substitution option
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create an option whose text replaces the working text entirely
    pub fn overriding(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            overrides_base_text: true,
            ..Default::default()
        }
    }

    /// Create a textless gate that enables a conditional subcommand
    pub fn conditional_gate(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_conditional_placeholder: true,
            ..Default::default()
        }
    }
}

/// A named axis of choices within a template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubcommandSpec {
    /// Identifier referenced by `{subcommand:<id>}` placeholders
    pub id: String,

    /// Governing subcommand id. This subcommand applies only when the
    /// governing one is selected with an option id equal to this one's id.
    #[serde(default)]
    pub conditional_on: Option<String>,

    /// Options in declaration order
    pub options: Vec<SubcommandOption>,
}

impl SubcommandSpec {
    /// Create an unconditional subcommand
    pub fn new(id: impl Into<String>, options: Vec<SubcommandOption>) -> Self {
        Self {
            id: id.into(),
            conditional_on: None,
            options,
        }
    }

    /// Create a subcommand gated on another subcommand's selection
    pub fn conditional(
        id: impl Into<String>,
        conditional_on: impl Into<String>,
        options: Vec<SubcommandOption>,
    ) -> Self {
        Self {
            id: id.into(),
            conditional_on: Some(conditional_on.into()),
            options,
        }
    }

    /// Look up an option by id
    pub fn option(&self, id: &str) -> Option<&SubcommandOption> {
        self.options.iter().find(|opt| opt.id == id)
    }
}

/// A caller's choice for one subcommand, plus any attached file payload
///
/// File contents ride here rather than on the template so templates stay
/// shareable between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    pub subcommand_id: String,
    pub option_id: String,

    /// Contents of an attached file, for options that accept one
    #[serde(default)]
    pub file_contents: Option<String>,
}

impl Selection {
    /// Select an option with no file attached
    pub fn new(subcommand_id: impl Into<String>, option_id: impl Into<String>) -> Self {
        Self {
            subcommand_id: subcommand_id.into(),
            option_id: option_id.into(),
            file_contents: None,
        }
    }

    /// Select an option and attach file contents
    pub fn with_file(
        subcommand_id: impl Into<String>,
        option_id: impl Into<String>,
        contents: impl Into<String>,
    ) -> Self {
        Self {
            subcommand_id: subcommand_id.into(),
            option_id: option_id.into(),
            file_contents: Some(contents.into()),
        }
    }
}

/// An immutable prompt recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// Unique identifier within a catalog
    pub id: String,

    /// Instruction text, possibly holding `{subcommand:<id>}` placeholders.
    /// May be empty for templates driven entirely by overriding options.
    pub base_text: String,

    /// One-line description for listings
    #[serde(default)]
    pub description: String,

    /// Input-field hint for a host UI
    #[serde(default)]
    pub helper_text: Option<String>,

    /// Default generation parameters, including any system prompt
    #[serde(default)]
    pub params: GenerationParams,

    /// Whether this template declares subcommands
    #[serde(default)]
    pub has_subcommand: bool,

    /// Subcommand axes in declaration order
    #[serde(default)]
    pub subcommands: Vec<SubcommandSpec>,

    /// Stock or user-authored
    #[serde(default)]
    pub kind: TemplateKind,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub version: Option<String>,
}

impl Template {
    /// Create a stock template with no subcommands
    pub fn system(id: impl Into<String>, base_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            base_text: base_text.into(),
            description: String::new(),
            helper_text: None,
            params: GenerationParams::default(),
            has_subcommand: false,
            subcommands: Vec::new(),
            kind: TemplateKind::System,
            author: None,
            version: None,
        }
    }

    /// Create a user-authored template
    pub fn custom(
        id: impl Into<String>,
        base_text: impl Into<String>,
        params: GenerationParams,
    ) -> Self {
        Self {
            params,
            kind: TemplateKind::Custom,
            ..Self::system(id, base_text)
        }
    }

    /// Attach subcommand axes, keeping `has_subcommand` in sync
    pub fn with_subcommands(mut self, subcommands: Vec<SubcommandSpec>) -> Self {
        self.has_subcommand = !subcommands.is_empty();
        self.subcommands = subcommands;
        self
    }

    /// Set the listing description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the input-field hint
    pub fn with_helper_text(mut self, helper_text: impl Into<String>) -> Self {
        self.helper_text = Some(helper_text.into());
        self
    }

    /// Set the default generation parameters
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Look up a subcommand by id
    pub fn subcommand(&self, id: &str) -> Option<&SubcommandSpec> {
        self.subcommands.iter().find(|sc| sc.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_format() {
        assert_eq!(placeholder("wordcount"), "{subcommand:wordcount}");
        assert_eq!(placeholder("subject"), "{subcommand:subject}");
    }

    #[test]
    fn test_option_defaults() {
        let opt = SubcommandOption::new("60 words", "60 words or less");
        assert!(!opt.overrides_base_text);
        assert!(!opt.is_conditional_placeholder);
        assert!(!opt.accepts_file);
        assert_eq!(opt.file_token_budget, DEFAULT_FILE_TOKEN_BUDGET);
    }

    #[test]
    fn test_conditional_gate_has_no_text() {
        let opt = SubcommandOption::conditional_gate("research");
        assert!(opt.is_conditional_placeholder);
        assert!(opt.text.is_empty());
    }

    #[test]
    fn test_subcommand_option_lookup() {
        let spec = SubcommandSpec::new(
            "language",
            vec![
                SubcommandOption::new("swiftui", "swiftui"),
                SubcommandOption::new("java", "java"),
            ],
        );
        assert_eq!(spec.option("java").map(|o| o.id.as_str()), Some("java"));
        assert!(spec.option("rust").is_none());
    }

    #[test]
    fn test_with_subcommands_syncs_flag() {
        let template = Template::system("code", "Provide sample code");
        assert!(!template.has_subcommand);

        let template = template.with_subcommands(vec![SubcommandSpec::new("language", vec![])]);
        assert!(template.has_subcommand);
        assert_eq!(template.subcommands.len(), 1);
    }

    #[test]
    fn test_custom_template_kind() {
        let template = Template::custom("mine", "Do the thing", GenerationParams::default());
        assert_eq!(template.kind, TemplateKind::Custom);
    }

    #[test]
    fn test_selection_with_file() {
        let sel = Selection::with_file("subject", "cover letter", "resume text");
        assert_eq!(sel.file_contents.as_deref(), Some("resume text"));
    }
}
