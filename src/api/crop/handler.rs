// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::info;

use super::request::CropRequest;
use super::response::CropResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::solver;

/// POST /crop - Split a stacked slider image at `y_coordinate`
///
/// Returns rows `[0, y)` as `slidingImage` and `[2y, height)` as `backImage`.
pub async fn crop_handler(
    State(state): State<AppState>,
    payload: Result<Json<CropRequest>, JsonRejection>,
) -> Result<Json<CropResponse>, ApiError> {
    let Json(request) = payload?;
    let (image, y) = request.validate()?;
    let image = state.loader.resolve_json(image).await?;

    // no model involved, but decoding and PNG encoding are CPU bound
    let bands = tokio::task::spawn_blocking(move || solver::split_bands(&image, y))
        .await
        .map_err(|e| ApiError::InternalError(format!("crop task failed: {}", e)))??;

    info!("Crop complete at y={}", y);
    Ok(Json(CropResponse { result: bands }))
}
