//! Model discovery.

use std::sync::Arc;

use tracing::{debug, info};

use inkai_core::ModelSelection;

use crate::api::{GenerativeApi, ModelDescriptor};
use crate::error::ResolutionError;
use crate::gemini::qualified_model_name;

/// Picks a model able to generate content.
pub struct ModelResolver {
    api: Arc<dyn GenerativeApi>,
    selection: ModelSelection,
    fixed_model: Option<String>,
}

impl ModelResolver {
    pub fn new(api: Arc<dyn GenerativeApi>) -> Self {
        Self {
            api,
            selection: ModelSelection::default(),
            fixed_model: None,
        }
    }

    pub fn selection(mut self, selection: ModelSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Always use `model` instead of asking the catalog.
    pub fn fixed_model(mut self, model: Option<String>) -> Self {
        self.fixed_model = model;
        self
    }

    /// Name of the model to generate with.
    pub async fn resolve(&self) -> Result<String, ResolutionError> {
        if let Some(model) = &self.fixed_model {
            debug!("Using configured model {}", model);
            return Ok(qualified_model_name(model));
        }

        let catalog = self
            .api
            .list_models()
            .await
            .map_err(ResolutionError::Catalog)?;

        let model = select_model(&catalog.models, self.selection)
            .ok_or(ResolutionError::NoCapableModel)?;

        info!(
            "Resolved model {} from {} catalog entries",
            model.name,
            catalog.models.len()
        );
        Ok(model.name.clone())
    }
}

/// Choose among the capable entries of a catalog.
pub fn select_model(models: &[ModelDescriptor], selection: ModelSelection) -> Option<&ModelDescriptor> {
    let mut capable = models.iter().filter(|m| m.supports_generation());
    match selection {
        ModelSelection::CatalogOrder => capable.next(),
        ModelSelection::ByName => capable.min_by(|a, b| a.name.cmp(&b.name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{GenerateContentRequest, GenerateContentResponse, ModelCatalog};
    use crate::error::{ApiError, ApiResult};
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        pub Api {}

        #[async_trait]
        impl GenerativeApi for Api {
            async fn list_models(&self) -> ApiResult<ModelCatalog>;
            async fn generate_content(
                &self,
                model: &str,
                request: &GenerateContentRequest,
            ) -> ApiResult<GenerateContentResponse>;
        }
    }

    fn catalog() -> ModelCatalog {
        ModelCatalog {
            models: vec![
                ModelDescriptor::new("models/embedding-001", &["embedContent"]),
                ModelDescriptor::new("models/gemini-pro", &["generateContent"]),
                ModelDescriptor::new("models/gemini-1.5-flash", &["countTokens", "generateContent"]),
            ],
        }
    }

    #[test]
    fn test_select_first_capable() {
        let catalog = catalog();
        let model = select_model(&catalog.models, ModelSelection::CatalogOrder).unwrap();
        assert_eq!(model.name, "models/gemini-pro");
    }

    #[test]
    fn test_select_by_name() {
        let catalog = catalog();
        let model = select_model(&catalog.models, ModelSelection::ByName).unwrap();
        assert_eq!(model.name, "models/gemini-1.5-flash");
    }

    #[test]
    fn test_select_none_capable() {
        let models = vec![ModelDescriptor::new("models/embedding-001", &["embedContent"])];
        assert!(select_model(&models, ModelSelection::CatalogOrder).is_none());
        assert!(select_model(&[], ModelSelection::ByName).is_none());
    }

    #[tokio::test]
    async fn test_resolve_from_catalog() {
        let mut api = MockApi::new();
        api.expect_list_models().times(1).returning(|| Ok(catalog()));

        let resolver = ModelResolver::new(Arc::new(api));
        assert_eq!(resolver.resolve().await.unwrap(), "models/gemini-pro");
    }

    #[tokio::test]
    async fn test_resolve_no_capable_model() {
        let mut api = MockApi::new();
        api.expect_list_models().returning(|| {
            Ok(ModelCatalog {
                models: vec![ModelDescriptor::new("models/aqa", &["generateAnswer"])],
            })
        });

        let resolver = ModelResolver::new(Arc::new(api));
        assert_eq!(resolver.resolve().await, Err(ResolutionError::NoCapableModel));
    }

    #[tokio::test]
    async fn test_resolve_catalog_failure() {
        let mut api = MockApi::new();
        api.expect_list_models()
            .returning(|| Err(ApiError::Transport("dns failure".into())));

        let resolver = ModelResolver::new(Arc::new(api));
        assert_eq!(
            resolver.resolve().await,
            Err(ResolutionError::Catalog(ApiError::Transport("dns failure".into())))
        );
    }

    #[tokio::test]
    async fn test_fixed_model_skips_catalog() {
        let mut api = MockApi::new();
        api.expect_list_models().never();

        let resolver = ModelResolver::new(Arc::new(api)).fixed_model(Some("gemini-pro".into()));
        assert_eq!(resolver.resolve().await.unwrap(), "models/gemini-pro");
    }
}
