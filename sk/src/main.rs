//! Sidekick - template-driven prompt assembly and completion
//!
//! CLI entry point for listing templates, assembling prompts, and running
//! them against the configured completion service.

use std::fs;
use std::io::Write;

use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use tokio::sync::mpsc;
use tracing::{debug, info};

use promptbook::{Catalog, ComposedPrompt, GenerationParams, Resolver, Selection, Template, compose};
use sidekick::cli::{Cli, Command, PromptArgs};
use sidekick::config::Config;
use sidekick::remote::create_client;

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let level = if let Some(s) = cli_log_level {
        match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", s);
                tracing::Level::WARN
            }
        }
    } else {
        // Default to WARN so command output stays clean on stderr
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Sidekick loaded config: provider={}", config.remote.provider);

    // Dispatch command
    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Templates => {
            debug!("main: matched Templates command");
            cmd_templates()
        }
        Command::Show { template } => {
            debug!(%template, "main: matched Show command");
            cmd_show(&template)
        }
        Command::Resolve { prompt } => {
            debug!("main: matched Resolve command");
            cmd_resolve(&prompt)
        }
        Command::Ask { prompt, stream, model } => {
            debug!(stream, ?model, "main: matched Ask command");
            cmd_ask(&config, &prompt, stream, model.as_deref()).await
        }
        Command::Models => {
            debug!("main: matched Models command");
            cmd_models(&config).await
        }
    }
}

/// List every template in the built-in catalog
fn cmd_templates() -> Result<()> {
    debug!("cmd_templates: called");
    let catalog = Catalog::builtin();

    println!("Available templates:");
    println!();
    for template in catalog.all() {
        debug!(template = %template.id, "cmd_templates: printing template");
        println!("  {}", template.id.cyan());
        if !template.description.is_empty() {
            println!("    {}", template.description);
        }
        if template.has_subcommand {
            let ids: Vec<&str> = template.subcommands.iter().map(|spec| spec.id.as_str()).collect();
            println!("    {}", format!("Subcommands: {}", ids.join(", ")).dimmed());
        }
        println!();
    }

    Ok(())
}

/// Show one template in detail
fn cmd_show(template_id: &str) -> Result<()> {
    debug!(%template_id, "cmd_show: called");
    let catalog = Catalog::builtin();
    let Some(template) = catalog.get(template_id) else {
        return Err(eyre!("Unknown template: '{}'. Run 'sk templates' to list them.", template_id));
    };

    println!("{}", template.id.cyan().bold());
    if !template.description.is_empty() {
        println!("{}", template.description);
    }
    if let Some(helper) = &template.helper_text {
        println!("{}", helper.dimmed());
    }

    if !template.base_text.is_empty() {
        println!();
        println!("{}", template.base_text);
    }

    if template.has_subcommand {
        println!();
        println!("Subcommands:");
        for spec in &template.subcommands {
            match &spec.conditional_on {
                Some(governing) => {
                    println!("  {} {}", spec.id.yellow(), format!("(when {}={})", governing, spec.id).dimmed())
                }
                None => println!("  {}", spec.id.yellow()),
            }
            for option in &spec.options {
                let mut notes = Vec::new();
                if option.overrides_base_text {
                    notes.push("replaces base text");
                }
                if option.accepts_file {
                    notes.push("accepts --file");
                }
                if option.is_conditional_placeholder {
                    notes.push("arms a conditional");
                }
                if notes.is_empty() {
                    println!("    - {}", option.id);
                } else {
                    println!("    - {} {}", option.id, format!("[{}]", notes.join(", ")).dimmed());
                }
            }
        }
    }

    Ok(())
}

/// Resolve prompt arguments into a composed prompt plus generation parameters
fn assemble(args: &PromptArgs) -> Result<(ComposedPrompt, GenerationParams)> {
    debug!("assemble: called");
    let resolver = Resolver::new();

    // Raw mode sends the text through untouched: a custom template with the
    // raw text as its base and no user text never triggers the wrapper frame
    if let Some(raw) = &args.raw {
        debug!(len = raw.len(), "assemble: raw mode");
        let template = Template::custom("adhoc", raw.clone(), GenerationParams::default());
        let resolved = resolver.resolve_with_system_prompt(&template, &[], "", args.system.as_deref())?;
        let composed = compose(&resolved, None);
        return Ok((composed, resolved.params));
    }

    let template_id = args
        .template
        .as_deref()
        .ok_or_else(|| eyre!("A template id (or --raw) is required"))?;
    let catalog = Catalog::builtin();
    let Some(template) = catalog.get(template_id) else {
        return Err(eyre!("Unknown template: '{}'. Run 'sk templates' to list them.", template_id));
    };

    let mut selections: Vec<Selection> = args
        .selections
        .iter()
        .map(|(subcommand, option)| Selection::new(subcommand, option))
        .collect();

    // File payloads ride on the selection for their subcommand
    for (subcommand, path) in &args.files {
        let selection = selections
            .iter_mut()
            .find(|s| s.subcommand_id == *subcommand)
            .ok_or_else(|| eyre!("--file {}=... needs a matching --select {}=OPTION", subcommand, subcommand))?;
        let contents = fs::read_to_string(path).context(format!("Failed to read file: {}", path))?;
        debug!(%subcommand, %path, len = contents.len(), "assemble: attached file contents");
        selection.file_contents = Some(contents);
    }

    let user_text = args.input.as_deref().unwrap_or("");
    let resolved = resolver.resolve_with_system_prompt(template, &selections, user_text, args.system.as_deref())?;
    let composed = compose(&resolved, None);
    Ok((composed, resolved.params))
}

/// Assemble a prompt and print it
fn cmd_resolve(args: &PromptArgs) -> Result<()> {
    debug!("cmd_resolve: called");
    let (composed, _params) = assemble(args)?;
    println!("{}", composed.text());
    Ok(())
}

/// Assemble a prompt and run it against the completion service
async fn cmd_ask(config: &Config, args: &PromptArgs, stream: bool, model: Option<&str>) -> Result<()> {
    debug!(stream, ?model, "cmd_ask: called");
    config.validate()?;

    let (composed, mut params) = assemble(args)?;

    // The configured token budget applies when the template sets none
    if params.maximum_tokens.is_none() {
        params.maximum_tokens = Some(config.generation.max_tokens);
    }

    // Model priority: --model flag, then the template's engine hint, then config
    let mut remote = config.remote.clone();
    if let Some(model) = model {
        remote.model = model.to_string();
    } else if let Some(engine) = &params.engine {
        remote.model = engine.clone();
    }
    debug!(provider = %remote.provider, model = %remote.model, "cmd_ask: resolved model");

    let client = create_client(&remote)?;

    if stream {
        let (chunk_tx, mut chunk_rx) = mpsc::channel::<String>(32);
        let printer = tokio::spawn(async move {
            let mut out = std::io::stdout();
            while let Some(delta) = chunk_rx.recv().await {
                let _ = write!(out, "{}", delta);
                let _ = out.flush();
            }
        });

        client
            .ask_streaming(&composed.body, composed.system_prompt.as_deref(), &params, chunk_tx)
            .await?;
        // The sender was moved into the call and is gone now; the printer
        // drains whatever is left and exits
        printer.await?;
        println!();
    } else {
        let answer = client
            .ask(&composed.body, composed.system_prompt.as_deref(), &params)
            .await?;
        println!("{}", answer);
    }

    Ok(())
}

/// List models available from the completion service
async fn cmd_models(config: &Config) -> Result<()> {
    debug!("cmd_models: called");
    config.validate()?;

    let client = create_client(&config.remote)?;
    let models = client.models().await?;
    debug!(count = models.len(), "cmd_models: got models");

    if models.is_empty() {
        println!("No models available.");
        return Ok(());
    }

    for model in models {
        match model.owned_by {
            Some(owner) => println!("{}  {}", model.id.cyan(), owner.dimmed()),
            None => println!("{}", model.id.cyan()),
        }
    }

    Ok(())
}
