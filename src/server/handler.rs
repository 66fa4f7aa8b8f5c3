use anyhow::Result;
use std::sync::Arc;

use crate::pipeline::ChartPipeline;
use crate::utils::config::AppConfig;
use crate::utils::graph::ChartRenderer;
use crate::utils::llm::OpenAiGateway;

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ChartPipeline>,
}

impl AppState {
    pub fn new(pipeline: ChartPipeline) -> Self {
        AppState {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Wires the gateway and renderer described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let gateway = OpenAiGateway::new(config.llm.clone())?;
        let renderer = ChartRenderer::from_font_path(&config.font_path);

        let settings = gateway.settings();
        tracing::info!(
            "[INIT] Chart pipeline ready (model: {}, timeout: {:?}, model calls: {})",
            settings.model,
            settings.timeout,
            if settings.is_configured() { "enabled" } else { "disabled" }
        );

        Ok(AppState::new(ChartPipeline::new(Arc::new(gateway), renderer)))
    }
}
