use std::io::{self, Read, Write};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use annotations_policy_kernel::{validate, validate_settings};

/// Annotations admission policy
///
/// Reads the request from stdin and writes the JSON decision to stdout.
#[derive(Parser, Debug)]
#[command(name = "annotations-policy", version, disable_help_subcommand = true)]
#[command(about = "Enforce required and forbidden annotations on Kubernetes resources", long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format (always written to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Evaluate an admission request envelope
    Validate,

    /// Check policy settings for consistency
    ValidateSettings,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Stdout only ever carries a response, help and version included.
            eprint!("{err}");
            process::exit(2);
        }
    };
    init_tracing(&cli.log_level, cli.log_format);

    // ----------------------------
    // Read request
    // ----------------------------
    let mut input = Vec::new();
    io::stdin()
        .read_to_end(&mut input)
        .context("cannot read input")?;
    debug!(bytes = input.len(), command = ?cli.command, "request read");

    // ----------------------------
    // Decide
    // ----------------------------
    let response = match cli.command {
        Command::Validate => validate(&input)?,
        Command::ValidateSettings => validate_settings(&input)?,
    };

    // ----------------------------
    // Output
    // ----------------------------
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&response)
        .and_then(|()| stdout.flush())
        .context("cannot write response")?;

    Ok(())
}

/// Install a stderr-only subscriber. Stdout carries the response.
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(io::stderr),
            )
            .init(),
    }
}
