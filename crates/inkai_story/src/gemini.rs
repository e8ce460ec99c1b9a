//! HTTP client for the Gemini generative language API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use inkai_core::{CoreError, CoreResult, InkConfig, DEFAULT_BASE_URL};

use crate::api::{
    error_message, GenerateContentRequest, GenerateContentResponse, GenerativeApi, ModelCatalog,
};
use crate::error::{ApiError, ApiResult};
use crate::retry::{with_retry, RetryPolicy};

/// reqwest-backed [`GenerativeApi`] implementation.
///
/// The credential travels as the `key` query parameter on every call.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Client against the public endpoint with default retry.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            retry: RetryPolicy::default(),
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from configuration, applying the request timeout.
    pub fn from_config(config: &InkConfig) -> CoreResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CoreError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            retry: RetryPolicy::new(config.max_attempts, config.retry_base_delay),
            client,
        })
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.base_url)
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/{}:generateContent", self.base_url, qualified_model_name(model))
    }

    fn catalog_request(&self) -> ApiResult<reqwest::Request> {
        self.client
            .get(self.models_url())
            .query(&[("key", self.api_key.as_str())])
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))
    }

    fn generate_request(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> ApiResult<reqwest::Request> {
        self.client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(request)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::Request) -> ApiResult<T> {
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        read_json(response).await
    }

    async fn fetch_models(&self) -> ApiResult<ModelCatalog> {
        self.send(self.catalog_request()?).await
    }

    async fn post_generate(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> ApiResult<GenerateContentResponse> {
        self.send(self.generate_request(url, request)?).await
    }
}

#[async_trait]
impl GenerativeApi for GeminiClient {
    async fn list_models(&self) -> ApiResult<ModelCatalog> {
        with_retry(&self.retry, "Model catalog request", move || self.fetch_models()).await
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> ApiResult<GenerateContentResponse> {
        let url = self.generate_url(model);
        let url = url.as_str();
        debug!("Requesting generation from {}", url);
        with_retry(&self.retry, "Generation request", move || {
            self.post_generate(url, request)
        })
        .await
    }
}

/// Catalog names carry a `models/` prefix; configured names may omit it.
pub fn qualified_model_name(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    decode_body(status, &body)
}

/// Turn a status and body into a typed result.
fn decode_body<T: DeserializeOwned>(status: u16, body: &str) -> ApiResult<T> {
    if !(200..300).contains(&status) {
        return Err(ApiError::Status {
            status,
            message: error_message(body),
        });
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}
