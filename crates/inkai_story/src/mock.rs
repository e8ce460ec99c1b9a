//! Scripted generative API for testing.
//!
//! Serves a fixed catalog and a queue of canned generation replies, and
//! records every call so tests can assert on what was sent.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::api::{
    GenerateContentRequest, GenerateContentResponse, GenerativeApi, ModelCatalog, ModelDescriptor,
    GENERATE_CONTENT,
};
use crate::error::{ApiError, ApiResult};

/// A call received by [`MockApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturedCall {
    ListModels,
    GenerateContent { model: String, text: Option<String> },
}

/// In-memory [`GenerativeApi`] with canned replies.
#[derive(Clone)]
pub struct MockApi {
    catalog: Arc<RwLock<ApiResult<ModelCatalog>>>,
    replies: Arc<RwLock<VecDeque<ApiResult<GenerateContentResponse>>>>,
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    /// A mock whose catalog lists one capable model, `models/mock-story`.
    pub fn new() -> Self {
        let catalog = ModelCatalog {
            models: vec![ModelDescriptor::new("models/mock-story", &[GENERATE_CONTENT])],
        };
        Self {
            catalog: Arc::new(RwLock::new(Ok(catalog))),
            replies: Arc::new(RwLock::new(VecDeque::new())),
            captured_calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Replace the catalog.
    pub fn with_models(self, models: Vec<ModelDescriptor>) -> Self {
        *self.catalog.write() = Ok(ModelCatalog { models });
        self
    }

    /// Make every catalog request fail.
    pub fn fail_catalog(self, error: ApiError) -> Self {
        *self.catalog.write() = Err(error);
        self
    }

    /// Queue a successful reply with `text`.
    pub fn reply_text(self, text: impl Into<String>) -> Self {
        self.reply(Ok(GenerateContentResponse::with_text(text)))
    }

    /// Queue an error status reply.
    pub fn reply_status(self, status: u16, message: impl Into<String>) -> Self {
        self.reply(Err(ApiError::Status {
            status,
            message: Some(message.into()),
        }))
    }

    /// Queue an arbitrary reply.
    pub fn reply(self, reply: ApiResult<GenerateContentResponse>) -> Self {
        self.replies.write().push_back(reply);
        self
    }

    /// All calls received so far.
    pub fn captured_calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    /// Number of generation calls received so far.
    pub fn generate_calls(&self) -> usize {
        self.captured_calls
            .read()
            .iter()
            .filter(|c| matches!(c, CapturedCall::GenerateContent { .. }))
            .count()
    }
}

#[async_trait]
impl GenerativeApi for MockApi {
    async fn list_models(&self) -> ApiResult<ModelCatalog> {
        self.captured_calls.write().push(CapturedCall::ListModels);
        self.catalog.read().clone()
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> ApiResult<GenerateContentResponse> {
        self.captured_calls.write().push(CapturedCall::GenerateContent {
            model: model.to_string(),
            text: request.first_text().map(str::to_string),
        });

        self.replies
            .write()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no mock reply queued".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_in_order_and_captures_calls() {
        let api = MockApi::new().reply_text("first").reply_status(500, "boom");

        let catalog = api.list_models().await.unwrap();
        assert_eq!(catalog.models[0].name, "models/mock-story");

        let request = GenerateContentRequest::text("hi");
        let first = api.generate_content("models/mock-story", &request).await.unwrap();
        assert_eq!(first.generated_text(), Some("first"));

        let second = api.generate_content("models/mock-story", &request).await;
        assert!(matches!(second, Err(ApiError::Status { status: 500, .. })));

        let third = api.generate_content("models/mock-story", &request).await;
        assert!(matches!(third, Err(ApiError::Transport(_))));

        assert_eq!(api.generate_calls(), 3);
        assert_eq!(api.captured_calls()[0], CapturedCall::ListModels);
        assert_eq!(
            api.captured_calls()[1],
            CapturedCall::GenerateContent {
                model: "models/mock-story".into(),
                text: Some("hi".into())
            }
        );
    }
}
