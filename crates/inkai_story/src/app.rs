//! Application facade used by front ends.
//!
//! Bundles the generation pipeline, the orchestrator and the history store
//! behind the operations a UI needs. History writes made through this facade
//! never fail the caller; failures are logged.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use inkai_core::{
    CoreResult, FileKeyValueStore, HistoryStore, InkConfig, Prompt, RecordId, RecordIdAllocator,
    StoryPage, StoryRecord,
};

use crate::error::StoryResult;
use crate::gemini::GeminiClient;
use crate::orchestrator::{GenerationAttempt, Orchestrator};
use crate::service::{StoryGenerationService, StoryGenerator};

/// Story generation plus history, wired together.
pub struct StoryApp {
    generator: Arc<dyn StoryGenerator>,
    history: Arc<HistoryStore>,
    orchestrator: Orchestrator,
}

impl StoryApp {
    /// Wire a generator to a history store.
    pub fn new(generator: Arc<dyn StoryGenerator>, history: Arc<HistoryStore>) -> Self {
        let ids = history
            .max_id()
            .map(RecordIdAllocator::starting_after)
            .unwrap_or_default();
        let orchestrator = Orchestrator::new(generator.clone(), history.clone(), ids);
        Self {
            generator,
            history,
            orchestrator,
        }
    }

    /// Production wiring: Gemini over HTTP, history under the data dir.
    pub fn from_config(config: &InkConfig) -> CoreResult<Self> {
        config.validate()?;
        let api = Arc::new(GeminiClient::from_config(config)?);
        let generator = Arc::new(StoryGenerationService::from_config(api, config));
        let store = Arc::new(FileKeyValueStore::new(&config.data_dir));
        let history = Arc::new(HistoryStore::with_capacity(store, config.history_capacity));
        Ok(Self::new(generator, history))
    }

    /// Generate pages without touching history.
    pub async fn generate_story(&self, prompt: &Prompt) -> StoryResult<Vec<StoryPage>> {
        self.generator.generate(prompt).await
    }

    /// Generate pages and, on success, save them to history.
    pub async fn create_story(&self, prompt: Prompt, cancel: &CancellationToken) -> GenerationAttempt {
        self.orchestrator.start(prompt, cancel).await
    }

    pub fn save_story_to_history(&self, record: StoryRecord) {
        let id = record.id;
        if let Err(e) = self.history.append(record) {
            warn!("Failed to save story {} to history: {}", id, e);
        }
    }

    /// Stored stories, newest first.
    pub fn get_history(&self) -> Vec<StoryRecord> {
        self.history.list()
    }

    pub fn get_story(&self, id: RecordId) -> Option<StoryRecord> {
        self.history.get(id)
    }

    pub fn delete_story_from_history(&self, id: RecordId) {
        if let Err(e) = self.history.remove(id) {
            warn!("Failed to delete story {} from history: {}", id, e);
        }
    }

    pub fn clear_history(&self) {
        if let Err(e) = self.history.clear() {
            warn!("Failed to clear story history: {}", e);
        }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockApi;
    use inkai_core::MemoryKeyValueStore;

    fn app(api: MockApi) -> StoryApp {
        let generator = Arc::new(StoryGenerationService::new(Arc::new(api)));
        let history = Arc::new(HistoryStore::new(Arc::new(MemoryKeyValueStore::new())));
        StoryApp::new(generator, history)
    }

    fn prompt(text: &str) -> Prompt {
        Prompt::parse(text).unwrap()
    }

    #[tokio::test]
    async fn test_generate_story_leaves_history_alone() {
        let app = app(MockApi::new().reply_text("One.\nTwo."));

        let pages = app.generate_story(&prompt("p")).await.unwrap();

        assert_eq!(pages.len(), 2);
        assert!(app.get_history().is_empty());
    }

    #[tokio::test]
    async fn test_history_operations() {
        let app = app(MockApi::new());
        let p = prompt("a kite");

        app.save_story_to_history(StoryRecord::new(1, &p, vec![StoryPage::new(1, "x")]));
        app.save_story_to_history(StoryRecord::new(2, &p, vec![StoryPage::new(1, "y")]));
        assert_eq!(app.get_history().len(), 2);
        assert_eq!(app.get_story(1).unwrap().pages[0].content, "x");

        app.delete_story_from_history(1);
        app.delete_story_from_history(1);
        assert_eq!(app.get_history().len(), 1);

        app.clear_history();
        assert!(app.get_history().is_empty());
    }

    #[tokio::test]
    async fn test_ids_continue_after_existing_history() {
        let api = MockApi::new().reply_text("Fresh story.");
        let generator = Arc::new(StoryGenerationService::new(Arc::new(api)));
        let history = Arc::new(HistoryStore::new(Arc::new(MemoryKeyValueStore::new())));
        let far_future = i64::MAX / 2;
        history
            .append(StoryRecord::new(far_future, &prompt("old"), vec![]))
            .unwrap();

        let app = StoryApp::new(generator, history);
        let attempt = app.create_story(prompt("new"), &CancellationToken::new()).await;

        assert!(attempt.record().unwrap().id > far_future);
    }

    #[tokio::test]
    async fn test_history_holding_max_id_does_not_break_generation() {
        let api = MockApi::new().reply_text("Fresh story.");
        let generator = Arc::new(StoryGenerationService::new(Arc::new(api)));
        let history = Arc::new(HistoryStore::new(Arc::new(MemoryKeyValueStore::new())));
        history
            .append(StoryRecord::new(i64::MAX, &prompt("old"), vec![]))
            .unwrap();

        let app = StoryApp::new(generator, history);
        let attempt = app.create_story(prompt("new"), &CancellationToken::new()).await;

        assert!(attempt.history_saved());
        let ids: Vec<_> = app.get_history().iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }
}
