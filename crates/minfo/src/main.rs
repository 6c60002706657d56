use std::fs;
use std::io::{self, IsTerminal, Read, Write};

use clap::{Parser, Subcommand};
use console::style;
use dialoguer::{Input, theme::ColorfulTheme};
use minfo_analyze::{AnalyzeClient, Analyzer, FeedbackHook};
use minfo_config::{
    MinfoConfig, config_exists, get_config_value, load_config, open_in_editor, resolve_bell,
    resolve_endpoint, resolve_timeout, resolve_view, save_config, set_config_value,
};
use minfo_core::{MinfoError, MinfoResult, ViewMode};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Open config file in editor
    Edit,
}

#[derive(Debug, Parser)]
#[command(name = "minfo")]
#[command(version, about = "Remote media inspector", long_about = None)]
struct Cli {
    /// Render the structured per-track view instead of the text report
    #[arg(long)]
    structured: bool,
    /// Print the raw JSON report, for piping
    #[arg(long)]
    raw: bool,
    /// Analysis endpoint, overriding config and environment
    #[arg(long)]
    endpoint: Option<String>,
    /// Read URLs from a file, one per line
    #[arg(long)]
    input: Option<String>,
    #[arg(value_name = "URL")]
    urls: Vec<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Rings the terminal bell when an analysis fails.
struct BellFeedback {
    enabled: bool,
}

impl FeedbackHook for BellFeedback {
    fn on_error(&self) {
        if self.enabled {
            let mut stderr = io::stderr();
            let _ = stderr.write_all(b"\x07");
            let _ = stderr.flush();
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("MINFO_LOG"))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // Handle config commands first
    if let Some(Commands::Config { action }) = cli.command {
        if let Err(err) = handle_config_command(action) {
            eprintln!("{} {err}", style("Error:").red());
            std::process::exit(1);
        }
        return;
    }

    let mut config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {err}", style("Error:").red());
            std::process::exit(1);
        }
    };

    let urls = gather_inputs(&cli).unwrap_or_else(|err| {
        eprintln!("{} {err}", style("Error:").red());
        std::process::exit(1);
    });

    if urls.is_empty() {
        eprintln!("{} no input URLs provided", style("Error:").red());
        std::process::exit(1);
    }

    let Some(endpoint) = resolve_or_prompt_endpoint(cli.endpoint.as_deref(), &mut config) else {
        eprintln!(
            "{} no analysis endpoint configured (set api.endpoint or MINFO_ENDPOINT)",
            style("Error:").red()
        );
        std::process::exit(1);
    };

    let client = AnalyzeClient::new(endpoint, resolve_timeout(&config));
    let analyzer = Analyzer::with_feedback(
        client,
        BellFeedback {
            enabled: resolve_bell(&config),
        },
    );

    let view = if cli.structured {
        ViewMode::Structured
    } else {
        resolve_view(&config).unwrap_or_default()
    };

    let mut success = 0usize;
    let mut failed = 0usize;

    // One submission at a time; the next URL waits for this one to finish.
    for url in &urls {
        let outcome = analyzer.submit(url).await;
        if outcome.is_done() {
            success += 1;
            if cli.raw {
                render::print_raw(&outcome);
            } else {
                render::print_outcome(&outcome, view);
            }
        } else {
            failed += 1;
            let message = outcome.error.as_deref().unwrap_or("Analysis Failed");
            eprintln!("{} {url}: {message}", style("Failed").red());
        }
    }

    print_summary(success + failed, success, failed);
}

fn gather_inputs(cli: &Cli) -> MinfoResult<Vec<String>> {
    let mut urls = cli.urls.clone();

    if let Some(path) = &cli.input {
        let content = fs::read_to_string(path)
            .map_err(|err| MinfoError::InvalidInput(format!("failed to read input file: {err}")))?;
        urls.extend(parse_lines(&content));
    }

    if urls.is_empty() && !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|err| MinfoError::InvalidInput(format!("failed to read stdin: {err}")))?;
        urls.extend(parse_lines(&buffer));
    }

    Ok(urls)
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

fn resolve_or_prompt_endpoint(
    cli_endpoint: Option<&str>,
    config: &mut MinfoConfig,
) -> Option<String> {
    if let Some(endpoint) = cli_endpoint {
        return Some(endpoint.to_string());
    }

    // Environment variable, then config file
    if let Some(endpoint) = resolve_endpoint(config) {
        return Some(endpoint);
    }

    // If a config file exists, respect whatever it says (never prompt)
    if config_exists().unwrap_or(false) || !io::stdin().is_terminal() {
        return None;
    }

    // Config file doesn't exist - first time setup
    let theme = ColorfulTheme::default();
    println!(
        "{} {}",
        style("First-time setup:").bold().cyan(),
        "Let's configure your minfo settings"
    );

    let input: String = Input::with_theme(&theme)
        .with_prompt("Analysis endpoint URL (e.g. https://host/resource/analyze)")
        .allow_empty(true)
        .interact_text()
        .unwrap_or_default();

    if input.trim().is_empty() {
        return None;
    }
    config.api.endpoint = Some(input.trim().to_string());

    if let Err(err) = save_config(config) {
        eprintln!("{} {err}", style("Warning:").yellow());
    } else {
        println!(
            "{} Config file created at ~/.minfo/config.toml",
            style("✓").green()
        );
    }

    config.api.endpoint.clone()
}

fn handle_config_command(action: ConfigAction) -> MinfoResult<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = load_config()?;
            match get_config_value(&config, &key) {
                Some(value) => println!("{} = {}", key, value),
                None => println!("{} = <null>", key),
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            set_config_value(&key, &value)?;
            println!("{} Set {} = {}", style("✓").green(), key, value);
            Ok(())
        }
        ConfigAction::List => {
            let config = load_config()?;
            println!("Current configuration:");
            println!("\n[api]");
            println!(
                "endpoint = {}",
                config.api.endpoint.as_deref().unwrap_or("<null>")
            );
            println!(
                "timeout_secs = {}",
                config
                    .api
                    .timeout_secs
                    .map(|secs| secs.to_string())
                    .unwrap_or_else(|| "<null>".to_string())
            );
            println!("\n[output]");
            println!("view = {}", config.output.view.as_deref().unwrap_or("<null>"));
            println!("bell = {}", config.output.bell.unwrap_or(false));
            Ok(())
        }
        ConfigAction::Edit => {
            open_in_editor()?;
            Ok(())
        }
    }
}

fn print_summary(total: usize, success: usize, failed: usize) {
    println!(
        "{} Total: {} | Success: {} | Failed: {}",
        style("Summary:").bold(),
        total,
        success,
        failed
    );
}
