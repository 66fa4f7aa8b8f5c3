use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{ChartAnalysis, ChartRequest};
use crate::utils::fallback::fallback;
use crate::utils::graph::{ChartRenderer, RenderError};
use crate::utils::interpreter::{ParseFailure, interpret};
use crate::utils::llm::{ChatGateway, LlmError};
use crate::utils::prompt::{PromptHints, build_prompt};

/// Why the model path could not produce an analysis.
#[derive(Debug, Error)]
pub enum FallbackReason {
    #[error(transparent)]
    Gateway(#[from] LlmError),
    #[error(transparent)]
    Interpretation(#[from] ParseFailure),
}

/// Result of the model path, before any fallback is applied.
#[derive(Debug)]
pub enum AnalysisOutcome {
    Analyzed(ChartAnalysis),
    NeedsFallback(FallbackReason),
}

impl AnalysisOutcome {
    /// Resolves the outcome, deriving an analysis from `data` when the model path failed.
    pub fn or_fallback(self, data: &Value, title: Option<&str>) -> ChartAnalysis {
        match self {
            AnalysisOutcome::Analyzed(analysis) => analysis,
            AnalysisOutcome::NeedsFallback(reason) => {
                tracing::warn!("[PIPELINE] Using fallback chart analysis: {}", reason);
                fallback(data, title)
            }
        }
    }
}

/// Request data in, chart analysis (and optionally PNG bytes) out.
///
/// Holds no per-request state, so one instance serves every request concurrently.
#[derive(Clone)]
pub struct ChartPipeline {
    gateway: Arc<dyn ChatGateway>,
    renderer: ChartRenderer,
}

impl ChartPipeline {
    pub fn new(gateway: Arc<dyn ChatGateway>, renderer: ChartRenderer) -> Self {
        ChartPipeline { gateway, renderer }
    }

    /// Asks the model for a recommendation. Never falls back by itself.
    pub async fn try_analyze(&self, request: &ChartRequest, data: &Value) -> AnalysisOutcome {
        let prompt = build_prompt(
            data,
            PromptHints {
                title: request.title.as_deref(),
                description: request.description.as_deref(),
                chart_type: request.chart_type.as_deref(),
            },
        );

        let raw = match self.gateway.send(&prompt).await {
            Ok(raw) => raw,
            Err(e) => return AnalysisOutcome::NeedsFallback(e.into()),
        };

        match interpret(&raw) {
            Ok(analysis) => {
                tracing::info!(
                    "[PIPELINE] Model recommended a {} chart titled '{}'",
                    analysis.chart_type,
                    analysis.title
                );
                AnalysisOutcome::Analyzed(analysis)
            }
            Err(e) => {
                tracing::debug!("[PIPELINE] Unparseable model output: {}", raw);
                AnalysisOutcome::NeedsFallback(e.into())
            }
        }
    }

    /// Always produces an analysis, degrading to the local fallback on any model-side failure.
    pub async fn analyze(&self, request: &ChartRequest) -> ChartAnalysis {
        let data = request.dataset();
        self.try_analyze(request, &data)
            .await
            .or_fallback(&data, request.title.as_deref())
    }

    /// Analyzes and renders. Only a rendering failure is reported back.
    pub async fn generate(&self, request: &ChartRequest) -> Result<Vec<u8>, RenderError> {
        let analysis = self.analyze(request).await;
        self.renderer.render(&analysis)
    }
}
