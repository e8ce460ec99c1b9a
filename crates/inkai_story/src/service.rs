//! Story generation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use inkai_core::{InkConfig, Prompt, StoryPage};

use crate::api::{GenerateContentRequest, GenerativeApi};
use crate::error::{GenerationError, StoryResult};
use crate::pagination::paginate;
use crate::resolver::ModelResolver;

/// Instruction placed before every prompt.
pub const STORY_INSTRUCTION: &str = "Write a creative story in maximum 10 short paragraphs.";

/// Anything that turns a prompt into pages.
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> StoryResult<Vec<StoryPage>>;
}

/// Generates stories through a [`GenerativeApi`].
pub struct StoryGenerationService {
    api: Arc<dyn GenerativeApi>,
    resolver: ModelResolver,
}

impl StoryGenerationService {
    pub fn new(api: Arc<dyn GenerativeApi>) -> Self {
        let resolver = ModelResolver::new(api.clone());
        Self { api, resolver }
    }

    /// Service with model selection taken from configuration.
    pub fn from_config(api: Arc<dyn GenerativeApi>, config: &InkConfig) -> Self {
        let resolver = ModelResolver::new(api.clone())
            .selection(config.model_selection)
            .fixed_model(config.model.clone());
        Self { api, resolver }
    }

    pub fn resolver(&self) -> &ModelResolver {
        &self.resolver
    }
}

/// Request body for a story about `prompt`.
pub fn build_request(prompt: &Prompt) -> GenerateContentRequest {
    GenerateContentRequest::text(format!(
        "{}\n\nStory prompt: {}",
        STORY_INSTRUCTION, prompt
    ))
}

#[async_trait]
impl StoryGenerator for StoryGenerationService {
    async fn generate(&self, prompt: &Prompt) -> StoryResult<Vec<StoryPage>> {
        let model = self.resolver.resolve().await?;

        let request = build_request(prompt);
        let response = self
            .api
            .generate_content(&model, &request)
            .await
            .map_err(GenerationError::from)?;

        let text = response.generated_text().ok_or_else(|| {
            GenerationError::MalformedResponse("response has no generated text".to_string())
        })?;

        let pages = paginate(text);
        debug!("Paginated {} bytes of text into {} pages", text.len(), pages.len());
        info!("Generated story with {} pages using {}", pages.len(), model);
        Ok(pages)
    }
}
