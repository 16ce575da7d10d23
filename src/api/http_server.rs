// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use super::crop::crop_handler;
use super::detection::{detection_handler, select_handler};
use super::errors::ApiError;
use super::ocr::{calculate_handler, classification_handler};
use super::slide::{capcode_handler, slide_comparison_handler};
use crate::version;
use crate::vision::{ImageLoader, Recognizer, VisionModelManager};

pub const LIVENESS_MESSAGE: &str = "Captcha API is running!";

/// Which engine capabilities have a model behind them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModelAvailability {
    pub ocr: bool,
    pub detection: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// `version`, `build`, `date` and `features`
    #[serde(flatten)]
    pub build: serde_json::Value,
    pub models: ModelAvailability,
}

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub recognizer: Arc<dyn Recognizer>,
    pub loader: ImageLoader,
    pub models: ModelAvailability,
}

impl AppState {
    pub fn new(recognizer: Arc<dyn Recognizer>, loader: ImageLoader) -> Self {
        Self {
            recognizer,
            loader,
            models: ModelAvailability::default(),
        }
    }

    pub fn with_models(mut self, models: ModelAvailability) -> Self {
        self.models = models;
        self
    }

    pub fn from_manager(manager: VisionModelManager, loader: ImageLoader) -> Self {
        let models = ModelAvailability {
            ocr: manager.has_ocr(),
            detection: manager.has_detection(),
        };
        Self::new(Arc::new(manager), loader).with_models(models)
    }

    /// Run engine work on the blocking pool
    pub async fn run_blocking<T, E, F>(&self, job: F) -> Result<T, ApiError>
    where
        F: FnOnce(&dyn Recognizer) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<ApiError> + Send + 'static,
    {
        let recognizer = Arc::clone(&self.recognizer);
        tokio::task::spawn_blocking(move || job(recognizer.as_ref()))
            .await
            .map_err(|e| ApiError::InternalError(format!("recognition task failed: {}", e)))?
            .map_err(Into::into)
    }
}

pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        // Liveness and health
        .route("/", get(liveness_handler))
        .route("/health", get(health_handler))
        // Slider captchas
        .route("/capcode", post(capcode_handler))
        .route("/slideComparison", post(slide_comparison_handler))
        // Text captchas
        .route("/classification", post(classification_handler))
        .route("/calculate", post(calculate_handler))
        // Click captchas
        .route("/detection", post(detection_handler))
        .route("/select", post(select_handler))
        // Stacked slider images
        .route("/crop", post(crop_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("🚀 Captcha API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("⏹️  Shutting down...");
        })
        .await
        .context("server error")?;

    Ok(())
}

async fn liveness_handler() -> &'static str {
    LIVENESS_MESSAGE
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        build: version::get_version_info(),
        models: state.models,
    })
}
