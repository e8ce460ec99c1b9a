//! History command - Inspect and edit saved stories.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use clap::{Args, Subcommand};

use inkai_core::{FileKeyValueStore, HistoryStore, RecordId, Settings, StoryRecord, MAX_HISTORY};

use super::generate::render_story;
use crate::ExitCodes;

#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    action: HistoryAction,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List saved stories, newest first
    List {
        /// Print the raw records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print one saved story
    Show {
        /// Story id as shown by `history list`
        id: RecordId,
    },

    /// Delete one saved story
    Delete {
        /// Story id as shown by `history list`
        id: RecordId,
    },

    /// Delete all saved stories
    Clear,
}

pub fn execute(global: &super::GlobalArgs, args: HistoryArgs) -> Result<u8> {
    let history = open_history(&global.data_dir()?)?;

    match args.action {
        HistoryAction::List { json } => {
            let records = history.list();
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("No stories yet.");
            } else {
                for record in &records {
                    println!("{}", summary_line(record));
                }
            }
        }
        HistoryAction::Show { id } => match history.get(id) {
            Some(record) => print!("{}", render_story(&record.prompt, &record.pages)),
            None => anyhow::bail!("Story not found: {}", id),
        },
        HistoryAction::Delete { id } => {
            history.remove(id)?;
            println!("Deleted story {}", id);
        }
        HistoryAction::Clear => {
            history.clear()?;
            println!("History cleared");
        }
    }

    Ok(ExitCodes::SUCCESS)
}

/// History in `data_dir`, sized by `historyCapacity` from its settings file.
fn open_history(data_dir: &Path) -> Result<HistoryStore> {
    let capacity = Settings::load(data_dir)?
        .history_capacity
        .unwrap_or(MAX_HISTORY);
    let store = Arc::new(FileKeyValueStore::new(data_dir));
    Ok(HistoryStore::with_capacity(store, capacity))
}

fn summary_line(record: &StoryRecord) -> String {
    format!(
        "{}  {}  {:>2} pages  {}",
        record.id,
        record.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        record.page_count(),
        record.prompt
    )
}
