//! Generate command - Turn a prompt into a story.

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use inkai_core::{Prompt, StoryPage};
use inkai_story::{GenerationOutcome, StoryApp};

use crate::ExitCodes;

#[derive(Args)]
pub struct GenerateArgs {
    /// Story prompt (multiple words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    prompt: Vec<String>,

    /// Print the pages as JSON
    #[arg(long)]
    json: bool,
}

impl GenerateArgs {
    pub fn prompt_text(&self) -> String {
        self.prompt.join(" ")
    }
}

pub async fn execute(global: &super::GlobalArgs, args: GenerateArgs) -> Result<u8> {
    let Some(prompt) = Prompt::parse(&args.prompt_text()) else {
        println!("Nothing to generate: the prompt is blank.");
        return Ok(ExitCodes::SUCCESS);
    };

    let config = global.load_config()?;
    let app = StoryApp::from_config(&config)?;

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    info!("Crafting a story for: {}", prompt);
    let attempt = app.create_story(prompt, &cancel).await;
    ctrl_c.abort();

    match attempt.outcome() {
        GenerationOutcome::Success { pages, prompt } => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&pages)?);
            } else {
                print!("{}", render_story(prompt.as_str(), &pages));
            }
            if let Some(record) = attempt.record() {
                if attempt.history_saved() {
                    info!("Saved to history as {}", record.id);
                }
            }
            Ok(ExitCodes::SUCCESS)
        }
        GenerationOutcome::Failed { message } => {
            if let Some(error) = attempt.error() {
                debug!("Generation failure cause: {}", error);
            }
            eprintln!("{}", message);
            Ok(ExitCodes::GENERATION_FAILED)
        }
    }
}

/// Plain-text rendering of a story, one block per page.
pub fn render_story(prompt: &str, pages: &[StoryPage]) -> String {
    let mut out = format!("\"{}\"\n\n", prompt);
    for page in pages {
        out.push_str(&format!("--- Page {} of {} ---\n{}\n\n", page.page, pages.len(), page.content));
    }
    out
}
