// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Slider endpoint handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{debug, info};

use super::request::{SlideCompareRequest, SlideMatchRequest};
use super::response::OffsetResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

/// POST /capcode - Find where the puzzle piece fits
///
/// # Request
/// - `slidingImage`: the piece (required)
/// - `backImage`: the background (required)
/// - `simpleTarget`: skip trimming the piece's transparent margin, defaults to true
///
/// # Errors
/// - 400 Bad Request: missing field or unreadable image
/// - 500 Internal Server Error: matching failed
pub async fn capcode_handler(
    State(state): State<AppState>,
    payload: Result<Json<SlideMatchRequest>, JsonRejection>,
) -> Result<Json<OffsetResponse>, ApiError> {
    let Json(request) = payload?;
    let (sliding, background) = request.validate()?;
    let simple_target = request.simple_target();
    debug!("Slide match request, simple_target={}", simple_target);

    let sliding = state.loader.resolve_json(sliding).await?;
    let background = state.loader.resolve_json(background).await?;

    let offset = state
        .run_blocking(move |engine| engine.slide_match(&sliding, &background, simple_target))
        .await?;

    info!("Slide match complete: offset {}", offset);
    Ok(Json(OffsetResponse { result: offset }))
}

/// POST /slideComparison - Find the gap by diffing two backgrounds
pub async fn slide_comparison_handler(
    State(state): State<AppState>,
    payload: Result<Json<SlideCompareRequest>, JsonRejection>,
) -> Result<Json<OffsetResponse>, ApiError> {
    let Json(request) = payload?;
    let (sliding, background) = request.validate()?;

    let sliding = state.loader.resolve_json(sliding).await?;
    let background = state.loader.resolve_json(background).await?;

    let offset = state
        .run_blocking(move |engine| engine.slide_compare(&sliding, &background))
        .await?;

    info!("Slide comparison complete: offset {}", offset);
    Ok(Json(OffsetResponse { result: offset }))
}
