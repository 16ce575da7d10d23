// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text captcha endpoint handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::info;

use super::request::OcrRequest;
use super::response::{CalculateResponse, ClassificationResponse};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::solver;

/// POST /classification - Read the text of a captcha image
///
/// # Errors
/// - 400 Bad Request: missing image, unresolvable or undecodable image
/// - 500 Internal Server Error: OCR model missing or inference failed
pub async fn classification_handler(
    State(state): State<AppState>,
    payload: Result<Json<OcrRequest>, JsonRejection>,
) -> Result<Json<ClassificationResponse>, ApiError> {
    let Json(request) = payload?;
    let image = state.loader.resolve_json(request.validate()?).await?;

    let text = state
        .run_blocking(move |engine| engine.classify(&image))
        .await?;

    info!("Classification complete: {:?}", text);
    Ok(Json(ClassificationResponse { result: text }))
}

/// POST /calculate - Answer an arithmetic captcha
///
/// Only digits, `+ - * /` and parentheses before the first `=` are evaluated.
pub async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<OcrRequest>, JsonRejection>,
) -> Result<Json<CalculateResponse>, ApiError> {
    let Json(request) = payload?;
    let image = state.loader.resolve_json(request.validate()?).await?;

    let answer = state
        .run_blocking(move |engine| solver::solve_arithmetic(engine, &image))
        .await?;

    info!("Calculation complete: {}", answer);
    Ok(Json(CalculateResponse { result: answer }))
}
