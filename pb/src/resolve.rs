//! Subcommand resolution
//!
//! Turns (template, selections, attached files, user text) into the final
//! instruction string and the generation parameters that go with it.
//! Resolution is pure: same inputs, same output, no state carried between
//! calls.

use handlebars::Handlebars;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::params::GenerationParams;
use crate::template::{Selection, Template, TemplateKind, placeholder};

const WRAP: &str = include_str!("../prompts/wrap.pmt");

/// Errors from resolving selections against a template
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A selection referenced a subcommand or option id the template does
    /// not declare
    #[error("unknown selection {subcommand}={option} for template '{template}'")]
    UnknownSelection {
        template: String,
        subcommand: String,
        option: String,
    },

    /// The task-description wrapper failed to render
    #[error("failed to render prompt wrapper: {0}")]
    Wrap(#[from] handlebars::RenderError),
}

/// Product of resolution: the instruction text plus the parameters the
/// generation layer should use for it
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPrompt {
    pub instruction: String,
    pub params: GenerationParams,
}

impl ResolvedPrompt {
    /// Effective system prompt (template default or caller override)
    pub fn system_prompt(&self) -> Option<&str> {
        self.params.system_prompt.as_deref()
    }
}

/// Resolves templates into instruction prompts
pub struct Resolver {
    hbs: Handlebars<'static>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    pub fn new() -> Self {
        let mut hbs = Handlebars::new();
        // Prompt text is not HTML; keep every character as written
        hbs.register_escape_fn(handlebars::no_escape);
        Self { hbs }
    }

    /// Resolve with the template's own system prompt
    pub fn resolve(
        &self,
        template: &Template,
        selections: &[Selection],
        user_text: &str,
    ) -> Result<ResolvedPrompt, ResolveError> {
        self.resolve_with_system_prompt(template, selections, user_text, None)
    }

    /// Resolve, optionally replacing the template's system prompt
    ///
    /// The override is recorded in the returned parameters so downstream
    /// layers see the caller's choice, not the template default.
    pub fn resolve_with_system_prompt(
        &self,
        template: &Template,
        selections: &[Selection],
        user_text: &str,
        system_prompt: Option<&str>,
    ) -> Result<ResolvedPrompt, ResolveError> {
        debug!(
            template = %template.id,
            selection_count = selections.len(),
            user_text_len = user_text.len(),
            "Resolver::resolve: called"
        );

        // Validate every selection up front so a bad id fails the whole
        // call before any text is assembled
        for selection in selections {
            let known = template
                .subcommand(&selection.subcommand_id)
                .is_some_and(|spec| spec.option(&selection.option_id).is_some());
            if !known {
                debug!(
                    subcommand = %selection.subcommand_id,
                    option = %selection.option_id,
                    "Resolver::resolve: unknown selection"
                );
                return Err(ResolveError::UnknownSelection {
                    template: template.id.clone(),
                    subcommand: selection.subcommand_id.clone(),
                    option: selection.option_id.clone(),
                });
            }
        }

        let mut working = template.base_text.clone();

        // Walk subcommands in declaration order, not selection order.
        // Conditional specs are declared after their governing subcommand
        // and must see its effect first.
        for spec in &template.subcommands {
            let Some(selection) = selections.iter().find(|s| s.subcommand_id == spec.id) else {
                continue;
            };

            if let Some(governing) = &spec.conditional_on {
                let armed = selections
                    .iter()
                    .any(|s| &s.subcommand_id == governing && s.option_id == spec.id);
                if !armed {
                    debug!(subcommand = %spec.id, "Resolver::resolve: conditional not armed, skipping");
                    continue;
                }
            }

            // Selections were validated above
            let Some(option) = spec.option(&selection.option_id) else {
                continue;
            };

            if option.is_conditional_placeholder {
                debug!(subcommand = %spec.id, option = %option.id, "Resolver::resolve: gate option, no text");
                continue;
            }

            if option.overrides_base_text {
                debug!(subcommand = %spec.id, option = %option.id, "Resolver::resolve: overriding working text");
                working = option.text.clone();
            } else {
                working = working.replace(&placeholder(&spec.id), &option.text);
            }

            if option.accepts_file
                && let Some(contents) = &selection.file_contents
            {
                let clipped = truncate_to_budget(contents, option.file_token_budget);
                if clipped.len() < contents.len() {
                    debug!(
                        subcommand = %spec.id,
                        budget = option.file_token_budget,
                        original_len = contents.len(),
                        clipped_len = clipped.len(),
                        "Resolver::resolve: file contents truncated to budget"
                    );
                }
                working.push_str(&format!("$user_file=###\n{clipped}\n###"));
            }
        }

        // Custom templates skip the wrapper when there is no user text;
        // stock templates always frame their instruction
        let instruction = if user_text.trim().is_empty() && template.kind == TemplateKind::Custom {
            working
        } else {
            self.hbs.render_template(
                WRAP.trim_end(),
                &json!({ "instruction": working, "user_text": user_text }),
            )?
        };

        let params = match system_prompt {
            Some(value) => template.params.with_system_prompt(value),
            None => template.params.clone(),
        };

        Ok(ResolvedPrompt { instruction, params })
    }
}

/// Clip file contents to a token budget, roughly four characters per token.
/// File content is advisory context, so over-budget input truncates rather
/// than failing the call.
fn truncate_to_budget(contents: &str, budget_tokens: u32) -> &str {
    let max_chars = budget_tokens as usize * 4;
    match contents.char_indices().nth(max_chars) {
        Some((idx, _)) => &contents[..idx],
        None => contents,
    }
}
