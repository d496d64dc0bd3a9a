use crate::config::AppConfig;
use crate::llm::{LlmClient, TextGenerator};
use crate::render::{ChromeBackend, RenderBackend};
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state accessible to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Validated configuration
    pub config: Arc<AppConfig>,

    /// Caption text source (LLM client in production)
    pub generator: Arc<dyn TextGenerator>,

    /// Poster rasterizer (headless Chrome in production)
    pub renderer: Arc<dyn RenderBackend>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        generator: Arc<dyn TextGenerator>,
        renderer: Arc<dyn RenderBackend>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            generator,
            renderer,
        }
    }

    /// Production wiring: HTTP LLM client and headless Chrome.
    pub fn from_config(config: AppConfig) -> Result<Self, reqwest::Error> {
        let generator: Arc<dyn TextGenerator> = Arc::new(LlmClient::new(&config.llm)?);
        let renderer: Arc<dyn RenderBackend> = Arc::new(ChromeBackend::new(&config.render));
        Ok(Self::new(config, generator, renderer))
    }

    pub fn public_dir(&self) -> PathBuf {
        self.config.paths.public_dir.clone()
    }

    pub fn outputs_dir(&self) -> PathBuf {
        self.config.outputs_dir()
    }
}
