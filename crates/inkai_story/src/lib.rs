//! # inkai_story
//!
//! Story generation pipeline for InkAI.
//!
//! A prompt goes through model discovery, one generation request and
//! pagination; the orchestrator then saves the result to history.
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌───────────────┐
//! │ Orchestrator │────▶│ GenerationService │────▶│ ModelResolver │
//! └──────┬───────┘     └─────────┬─────────┘     └───────┬───────┘
//!        │                       │                       │
//!        ▼                       └──────────┬────────────┘
//! ┌──────────────┐                          ▼
//! │ HistoryStore │                 ┌────────────────┐
//! └──────────────┘                 │ GenerativeApi  │
//!                                  └────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use inkai_core::{InkConfig, Prompt};
//! use inkai_story::StoryApp;
//! use tokio_util::sync::CancellationToken;
//!
//! let app = StoryApp::from_config(&InkConfig::from_env()?)?;
//! let prompt = Prompt::parse("a robot learning to paint").unwrap();
//! let attempt = app.create_story(prompt, &CancellationToken::new()).await;
//! ```

pub mod api;
pub mod app;
pub mod error;
pub mod gemini;
pub mod mock;
pub mod orchestrator;
pub mod pagination;
pub mod resolver;
pub mod retry;
pub mod service;

pub use api::{
    GenerateContentRequest, GenerateContentResponse, GenerativeApi, ModelCatalog, ModelDescriptor,
    GENERATE_CONTENT,
};
pub use app::StoryApp;
pub use error::{
    ApiError, ApiResult, GenerationError, ResolutionError, StoryError, StoryResult,
};
pub use gemini::GeminiClient;
pub use mock::{CapturedCall, MockApi};
pub use orchestrator::{
    AttemptState, GenerationAttempt, GenerationOutcome, Orchestrator, FAILURE_MESSAGE,
};
pub use pagination::{paginate, MAX_PAGES};
pub use resolver::{select_model, ModelResolver};
pub use retry::RetryPolicy;
pub use service::{StoryGenerationService, StoryGenerator, STORY_INSTRUCTION};
