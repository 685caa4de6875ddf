//! CLI command definitions and subcommands

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// Sidekick - template-driven prompt assembly and completion
#[derive(Parser)]
#[command(
    name = "sk",
    about = "Assemble prompts from the built-in template catalog and run them against a completion service",
    version,
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List templates in the built-in catalog
    Templates,

    /// Show a template's base text, subcommands, and options
    Show {
        /// Template id
        #[arg(value_name = "TEMPLATE")]
        template: String,
    },

    /// Assemble a prompt and print it without sending it anywhere
    Resolve {
        #[command(flatten)]
        prompt: PromptArgs,
    },

    /// Assemble a prompt and send it to the configured completion service
    Ask {
        #[command(flatten)]
        prompt: PromptArgs,

        /// Stream the answer token by token as it arrives
        #[arg(long)]
        stream: bool,

        /// Model to use for this call (overrides template and config)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// List models available from the completion service
    Models,
}

/// Arguments that assemble one prompt
#[derive(Debug, Args)]
pub struct PromptArgs {
    /// Template id from the catalog
    #[arg(value_name = "TEMPLATE", required_unless_present = "raw", conflicts_with = "raw")]
    pub template: Option<String>,

    /// Pick a subcommand option, as SUBCOMMAND=OPTION (repeatable)
    #[arg(
        short = 's',
        long = "select",
        value_name = "SUB=OPT",
        value_parser = parse_key_value,
        conflicts_with = "raw"
    )]
    pub selections: Vec<(String, String)>,

    /// Attach a file to a selected subcommand, as SUBCOMMAND=PATH (repeatable)
    #[arg(
        short = 'f',
        long = "file",
        value_name = "SUB=PATH",
        value_parser = parse_key_value,
        conflicts_with = "raw"
    )]
    pub files: Vec<(String, String)>,

    /// User text the instruction applies to
    #[arg(short, long, conflicts_with = "raw")]
    pub input: Option<String>,

    /// System prompt override
    #[arg(long)]
    pub system: Option<String>,

    /// Send text as-is, bypassing the catalog
    #[arg(long, value_name = "TEXT")]
    pub raw: Option<String>,
}

/// Parse a KEY=VALUE argument into its two halves
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    debug!(%s, "parse_key_value: called");
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() && !value.is_empty() => {
            Ok((key.to_string(), value.to_string()))
        }
        _ => {
            debug!(%s, "parse_key_value: malformed pair");
            Err(format!("expected KEY=VALUE, got '{}'", s))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_templates() {
        let cli = Cli::parse_from(["sk", "templates"]);
        assert!(matches!(cli.command, Command::Templates));
    }

    #[test]
    fn test_cli_parse_show() {
        let cli = Cli::parse_from(["sk", "show", "summarize"]);
        if let Command::Show { template } = cli.command {
            assert_eq!(template, "summarize");
        } else {
            panic!("Expected Show command");
        }
    }

    #[test]
    fn test_cli_parse_resolve_with_selections() {
        let cli = Cli::parse_from([
            "sk",
            "resolve",
            "summarize",
            "-s",
            "wordcount=120 words or less",
            "-i",
            "Some long article",
        ]);
        if let Command::Resolve { prompt } = cli.command {
            assert_eq!(prompt.template.as_deref(), Some("summarize"));
            assert_eq!(
                prompt.selections,
                vec![("wordcount".to_string(), "120 words or less".to_string())]
            );
            assert_eq!(prompt.input.as_deref(), Some("Some long article"));
        } else {
            panic!("Expected Resolve command");
        }
    }

    #[test]
    fn test_cli_parse_resolve_with_file() {
        let cli = Cli::parse_from(["sk", "resolve", "jobs", "-s", "job=cover letter", "-f", "resume=/tmp/resume.txt"]);
        if let Command::Resolve { prompt } = cli.command {
            assert_eq!(prompt.files, vec![("resume".to_string(), "/tmp/resume.txt".to_string())]);
        } else {
            panic!("Expected Resolve command");
        }
    }

    #[test]
    fn test_cli_parse_ask_with_stream_and_model() {
        let cli = Cli::parse_from(["sk", "ask", "reword", "-i", "hello", "--stream", "-m", "gpt-4o"]);
        if let Command::Ask { prompt, stream, model } = cli.command {
            assert_eq!(prompt.template.as_deref(), Some("reword"));
            assert!(stream);
            assert_eq!(model.as_deref(), Some("gpt-4o"));
        } else {
            panic!("Expected Ask command");
        }
    }

    #[test]
    fn test_cli_parse_ask_raw() {
        let cli = Cli::parse_from(["sk", "ask", "--raw", "What is a monad?"]);
        if let Command::Ask { prompt, stream, .. } = cli.command {
            assert_eq!(prompt.raw.as_deref(), Some("What is a monad?"));
            assert!(prompt.template.is_none());
            assert!(!stream);
        } else {
            panic!("Expected Ask command");
        }
    }

    #[test]
    fn test_cli_raw_conflicts_with_template() {
        let result = Cli::try_parse_from(["sk", "ask", "reword", "--raw", "hello"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_resolve_requires_template_or_raw() {
        let result = Cli::try_parse_from(["sk", "resolve"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_models() {
        let cli = Cli::parse_from(["sk", "models"]);
        assert!(matches!(cli.command, Command::Models));
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["sk", "-c", "/path/to/sidekick.yml", "templates"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/sidekick.yml")));
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("wordcount=120 words or less"),
            Ok(("wordcount".to_string(), "120 words or less".to_string()))
        );
        assert!(parse_key_value("no-equals-sign").is_err());
        assert!(parse_key_value("=value").is_err());
        assert!(parse_key_value("key=").is_err());
    }
}
