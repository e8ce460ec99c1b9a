//! Drives one generation attempt from prompt to history.
//!
//! ```text
//! Idle ──start──▶ Generating ──pages──▶ Success   (record appended to history)
//!                      │
//!                      └──error/cancel──▶ Failed   (history untouched)
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use inkai_core::{HistoryRepository, Prompt, RecordIdAllocator, StoryPage, StoryRecord};

use crate::error::{GenerationError, StoryError};
use crate::service::StoryGenerator;

/// Message shown to users for any failed attempt.
pub const FAILURE_MESSAGE: &str = "Failed to generate story. Please try again.";

/// Attempt state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    Idle,
    Generating,
    Success,
    Failed,
}

impl AttemptState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

/// What the caller sees once an attempt finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success { pages: Vec<StoryPage>, prompt: Prompt },
    Failed { message: &'static str },
}

/// Bookkeeping for one `start` call.
#[derive(Debug, Clone)]
pub struct GenerationAttempt {
    prompt: Prompt,
    state: AttemptState,
    record: Option<StoryRecord>,
    error: Option<StoryError>,
    history_saved: bool,
}

impl GenerationAttempt {
    fn new(prompt: Prompt) -> Self {
        Self {
            prompt,
            state: AttemptState::Idle,
            record: None,
            error: None,
            history_saved: false,
        }
    }

    fn transition(&mut self, next: AttemptState) {
        debug!("Generation attempt {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn succeed(&mut self, record: StoryRecord, history_saved: bool) {
        self.record = Some(record);
        self.history_saved = history_saved;
        self.transition(AttemptState::Success);
    }

    fn fail(&mut self, error: StoryError) {
        warn!("Story generation failed: {}", error);
        self.error = Some(error);
        self.transition(AttemptState::Failed);
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    /// The record built on success.
    pub fn record(&self) -> Option<&StoryRecord> {
        self.record.as_ref()
    }

    /// Underlying cause of a failure, for diagnostics.
    pub fn error(&self) -> Option<&StoryError> {
        self.error.as_ref()
    }

    /// Whether the history write on success went through.
    pub fn history_saved(&self) -> bool {
        self.history_saved
    }

    /// Caller-facing result; failures collapse into one generic message.
    pub fn outcome(&self) -> GenerationOutcome {
        match (&self.state, &self.record) {
            (AttemptState::Success, Some(record)) => GenerationOutcome::Success {
                pages: record.pages.clone(),
                prompt: self.prompt.clone(),
            },
            _ => GenerationOutcome::Failed {
                message: FAILURE_MESSAGE,
            },
        }
    }
}

/// Runs generation attempts and records successes in history.
pub struct Orchestrator {
    generator: Arc<dyn StoryGenerator>,
    history: Arc<dyn HistoryRepository>,
    ids: RecordIdAllocator,
}

impl Orchestrator {
    pub fn new(
        generator: Arc<dyn StoryGenerator>,
        history: Arc<dyn HistoryRepository>,
        ids: RecordIdAllocator,
    ) -> Self {
        Self {
            generator,
            history,
            ids,
        }
    }

    /// Run exactly one attempt for `prompt`.
    ///
    /// If `cancel` fires before generation finishes, the in-flight request is
    /// dropped, the attempt fails and nothing is written to history.
    pub async fn start(&self, prompt: Prompt, cancel: &CancellationToken) -> GenerationAttempt {
        let mut attempt = GenerationAttempt::new(prompt);
        attempt.transition(AttemptState::Generating);

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StoryError::Cancelled),
            result = self.generator.generate(&attempt.prompt) => result,
        };

        let pages = match result {
            Ok(pages) if pages.is_empty() => {
                attempt.fail(GenerationError::EmptyStory.into());
                return attempt;
            }
            Ok(pages) => pages,
            Err(e) => {
                attempt.fail(e);
                return attempt;
            }
        };

        let record = StoryRecord::new(self.ids.next_id(), &attempt.prompt, pages);
        let saved = match self.history.append(record.clone()) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save story {} to history: {}", record.id, e);
                false
            }
        };

        info!("Story {} generated with {} pages", record.id, record.page_count());
        attempt.succeed(record, saved);
        attempt
    }
}
