//! InkAI CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success (including an ignored blank prompt)
//! - 1: Generation failed
//! - 2: Not configured / invalid configuration

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERATION_FAILED: u8 = 1;
    pub const NOT_CONFIGURED: u8 = 2;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "inkai=debug"
    } else if cli.quiet {
        "inkai=error"
    } else {
        "inkai=info"
    };

    let mut filter = EnvFilter::from_default_env();
    for directive in [default_level, "warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    // Already initialized only happens under test harnesses
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::execute(&cli.global, args).await,
        Commands::History(args) => commands::history::execute(&cli.global, args),
        Commands::Model(args) => commands::model::execute(&cli.global, args).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(categorize_error(&e))
        }
    }
}

/// Map an error to an exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    match e.downcast_ref::<inkai_core::CoreError>() {
        Some(inkai_core::CoreError::NotConfigured) | Some(inkai_core::CoreError::InvalidConfig(_)) => {
            ExitCodes::NOT_CONFIGURED
        }
        _ => ExitCodes::GENERATION_FAILED,
    }
}
