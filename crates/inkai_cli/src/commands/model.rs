//! Model command - Show which model generation would use.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use inkai_story::{GeminiClient, StoryGenerationService};

use crate::ExitCodes;

#[derive(Args)]
pub struct ModelArgs {}

pub async fn execute(global: &super::GlobalArgs, _args: ModelArgs) -> Result<u8> {
    let config = global.load_config()?;
    let api = Arc::new(GeminiClient::from_config(&config)?);
    let service = StoryGenerationService::from_config(api, &config);

    match service.resolver().resolve().await {
        Ok(model) => {
            println!("{}", model);
            Ok(ExitCodes::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", e);
            Ok(ExitCodes::GENERATION_FAILED)
        }
    }
}
