//! Runtime configuration.
//!
//! The API credential always comes from the environment:
//! 1. `INKAI_API_KEY`
//! 2. `GEMINI_API_KEY`
//!
//! Everything else has a default, can be tuned in `<data dir>/settings.json`,
//! and `INKAI_BASE_URL` / `INKAI_MODEL` from the environment beat the file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::history::MAX_HISTORY;

/// Public endpoint of the generative language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Directory, relative to the workspace, holding settings and history.
pub const DATA_DIR_NAME: &str = ".inkai";

/// Settings file name inside the data directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// How a model is picked from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModelSelection {
    /// First capable model in the order the provider returned.
    #[default]
    CatalogOrder,
    /// Capable model with the lexicographically smallest name.
    ByName,
}

/// Configuration for the generation pipeline and history.
#[derive(Clone)]
pub struct InkConfig {
    pub api_key: String,
    pub base_url: String,
    /// Fixed model name; skips the catalog lookup when set
    pub model: Option<String>,
    pub model_selection: ModelSelection,
    pub data_dir: PathBuf,
    pub history_capacity: usize,
    /// Total tries per API call, including the first
    pub max_attempts: u32,
    pub retry_base_delay: Duration,
    pub request_timeout: Option<Duration>,
}

/// On-disk settings file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub model_selection: Option<ModelSelection>,
    pub history_capacity: Option<usize>,
    pub max_attempts: Option<u32>,
    pub request_timeout_secs: Option<u64>,
}

impl Settings {
    /// Read `<data_dir>/settings.json`; a missing file yields the defaults.
    pub fn load(data_dir: &Path) -> CoreResult<Self> {
        let path = data_dir.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|e| CoreError::InvalidConfig(format!("{}: {}", path.display(), e)))
    }
}

impl InkConfig {
    /// Create a configuration with defaults around an explicit credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: None,
            model_selection: ModelSelection::default(),
            data_dir: PathBuf::from(DATA_DIR_NAME),
            history_capacity: MAX_HISTORY,
            max_attempts: 3,
            retry_base_delay: Duration::from_secs(1),
            request_timeout: Some(Duration::from_secs(60)),
        }
    }

    /// Load with data under `./.inkai`.
    pub fn from_env() -> CoreResult<Self> {
        let root = std::env::current_dir()?;
        Self::from_settings(&root)
    }

    /// Load from the environment and `<data dir>/settings.json`, where the data
    /// dir is `INKAI_DATA_DIR` or `<root>/.inkai`.
    pub fn from_settings(workspace_root: &Path) -> CoreResult<Self> {
        Self::from_lookup(workspace_root, None, |name| std::env::var(name).ok())
    }

    /// Load from the environment, keeping history and settings in `data_dir`.
    pub fn from_data_dir(data_dir: &Path) -> CoreResult<Self> {
        Self::from_lookup(data_dir, Some(data_dir.to_path_buf()), |name| {
            std::env::var(name).ok()
        })
    }

    fn from_lookup<F>(
        workspace_root: &Path,
        data_dir: Option<PathBuf>,
        lookup: F,
    ) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("INKAI_API_KEY")
            .or_else(|| non_empty("GEMINI_API_KEY"))
            .ok_or(CoreError::NotConfigured)?;

        let mut config = Self::new(api_key);
        config.data_dir = data_dir
            .or_else(|| non_empty("INKAI_DATA_DIR").map(PathBuf::from))
            .unwrap_or_else(|| workspace_root.join(DATA_DIR_NAME));
        config.apply(Settings::load(&config.data_dir)?);

        // The environment wins over the settings file
        if let Some(base_url) = non_empty("INKAI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(model) = non_empty("INKAI_MODEL") {
            config.model = Some(model);
        }

        config.validate()?;
        Ok(config)
    }

    fn apply(&mut self, settings: Settings) {
        if let Some(base_url) = settings.base_url {
            self.base_url = base_url;
        }
        if settings.model.is_some() {
            self.model = settings.model;
        }
        if let Some(selection) = settings.model_selection {
            self.model_selection = selection;
        }
        if let Some(capacity) = settings.history_capacity {
            self.history_capacity = capacity;
        }
        if let Some(attempts) = settings.max_attempts {
            self.max_attempts = attempts;
        }
        if let Some(secs) = settings.request_timeout_secs {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> CoreResult<()> {
        if self.history_capacity == 0 {
            return Err(CoreError::InvalidConfig(
                "historyCapacity must be at least 1".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(CoreError::InvalidConfig(
                "maxAttempts must be at least 1".to_string(),
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(CoreError::InvalidConfig("baseUrl must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn model_selection(mut self, selection: ModelSelection) -> Self {
        self.model_selection = selection;
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}

impl fmt::Debug for InkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InkConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("model_selection", &self.model_selection)
            .field("data_dir", &self.data_dir)
            .field("history_capacity", &self.history_capacity)
            .field("max_attempts", &self.max_attempts)
            .field("retry_base_delay", &self.retry_base_delay)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
