// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Click captcha endpoint handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::info;

use super::request::DetectionRequest;
use super::response::{DetectionResponse, SelectResponse};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::solver;

/// POST /detection - Locate every glyph or icon in the image
pub async fn detection_handler(
    State(state): State<AppState>,
    payload: Result<Json<DetectionRequest>, JsonRejection>,
) -> Result<Json<DetectionResponse>, ApiError> {
    let Json(request) = payload?;
    let image = state.loader.resolve_json(request.validate()?).await?;

    let boxes = state
        .run_blocking(move |engine| engine.detect(&image))
        .await?;

    info!("Detection complete: {} boxes", boxes.len());
    Ok(Json(DetectionResponse { result: boxes }))
}

/// POST /select - Locate every glyph and read each one
///
/// Entries follow detection order, not reading order.
pub async fn select_handler(
    State(state): State<AppState>,
    payload: Result<Json<DetectionRequest>, JsonRejection>,
) -> Result<Json<SelectResponse>, ApiError> {
    let Json(request) = payload?;
    let image = state.loader.resolve_json(request.validate()?).await?;

    let regions = state
        .run_blocking(move |engine| solver::select_points(engine, &image))
        .await?;

    info!("Selection complete: {} regions", regions.len());
    Ok(Json(SelectResponse { result: regions }))
}
