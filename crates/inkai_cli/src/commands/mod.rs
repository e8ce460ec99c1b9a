//! CLI command definitions.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use inkai_core::InkConfig;

pub mod generate;
pub mod history;
pub mod model;

/// InkAI - short illustrated-style stories from a single prompt
#[derive(Parser)]
#[command(name = "inkai")]
#[command(version, about = "InkAI - turn a prompt into a short paginated story")]
#[command(long_about = r#"
InkAI turns a free-text prompt into a short story of up to ten pages using a
remote generative model, and keeps the last stories in a local history.

COMMANDS:
  generate  → Generate a story and save it to history
  history   → List, show, delete or clear saved stories
  model     → Show which model would be used

CONFIGURATION:
  INKAI_API_KEY (or GEMINI_API_KEY) must hold the API credential.
  INKAI_MODEL, INKAI_BASE_URL and INKAI_DATA_DIR are optional overrides,
  and settings.json in the data directory may tune model selection, history
  size and retries. Environment variables win over the settings file.

EXIT CODES:
  0 - Success
  1 - Generation failed
  2 - Not configured
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Args)]
pub struct GlobalArgs {
    /// Directory holding history and settings.json (default: ./.inkai)
    #[arg(long, global = true, env = "INKAI_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

impl GlobalArgs {
    /// Full configuration; requires the API credential.
    pub fn load_config(&self) -> Result<InkConfig> {
        let config = match &self.data_dir {
            Some(data_dir) => InkConfig::from_data_dir(data_dir)?,
            None => InkConfig::from_settings(&std::env::current_dir()?)?,
        };
        Ok(config)
    }

    /// Where history lives; works without a credential.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?.join(inkai_core::config::DATA_DIR_NAME)),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a story from a prompt and save it to history
    Generate(generate::GenerateArgs),

    /// Inspect or edit saved stories
    History(history::HistoryArgs),

    /// Show the model that would be used for generation
    Model(model::ModelArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from(["inkai", "generate", "a", "brave", "snail"]).unwrap();
        match cli.command {
            Commands::Generate(args) => assert_eq!(args.prompt_text(), "a brave snail"),
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_parse_history_delete() {
        let cli = Cli::try_parse_from(["inkai", "--data-dir", "/tmp/ink", "history", "delete", "42"])
            .unwrap();
        assert_eq!(cli.global.data_dir, Some(PathBuf::from("/tmp/ink")));
        assert!(matches!(cli.command, Commands::History(_)));
    }
}
