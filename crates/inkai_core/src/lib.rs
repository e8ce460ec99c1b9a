//! # inkai_core
//!
//! Core data model and local persistence for InkAI.
//!
//! This crate owns everything that outlives a single generation attempt:
//!
//! - **Model**: prompts, story pages and the records kept in history
//! - **Store**: a key-value slot abstraction with file and in-memory backends
//! - **History**: the bounded, newest-first collection of past stories
//! - **Config**: credential and tuning knobs, loaded from env and settings
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use inkai_core::{HistoryStore, MemoryKeyValueStore, StoryRecord};
//!
//! let history = HistoryStore::new(Arc::new(MemoryKeyValueStore::new()));
//! history.append(record)?;
//! assert_eq!(history.list().len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod history;
pub mod ids;
pub mod model;
pub mod store;

pub use config::{InkConfig, ModelSelection, Settings, DEFAULT_BASE_URL};
pub use error::{CoreError, CoreResult};
pub use history::{HistoryRepository, HistoryStore, HISTORY_KEY, MAX_HISTORY};
pub use ids::RecordIdAllocator;
pub use model::{Prompt, RecordId, StoryPage, StoryRecord};
pub use store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
