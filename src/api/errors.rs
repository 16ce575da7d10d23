// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, warn};

use crate::solver::{ExpressionError, SolveError};
use crate::vision::{LoaderError, RecognitionError};

/// Body of every failed request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// A required field is absent or empty
    ValidationError {
        field: String,
        message: String,
    },
    /// The body is not usable JSON, or an image could not be decoded
    InvalidRequest(String),
    /// An image descriptor could not be resolved into bytes
    Loader(LoaderError),
    /// The recognition engine failed
    Recognition(RecognitionError),
    /// Recognized text did not hold a usable arithmetic expression
    Expression(ExpressionError),
    /// A crop row outside the image
    Bounds { y: u32, height: u32 },
    InternalError(String),
}

impl ApiError {
    pub fn missing_field(field: &str) -> Self {
        ApiError::ValidationError {
            field: field.to_string(),
            message: format!("{} is required", field),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::ValidationError { .. } | ApiError::InvalidRequest(_) | ApiError::Loader(_) => {
                400
            }
            ApiError::Recognition(_)
            | ApiError::Expression(_)
            | ApiError::Bounds { .. }
            | ApiError::InternalError(_) => 500,
        }
    }

    /// Message returned to the client
    ///
    /// Server-side failures get a fixed message per category; the detail is logged.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::ValidationError { message, .. } => message.clone(),
            ApiError::InvalidRequest(msg) => format!("Invalid request: {}", msg),
            ApiError::Loader(e) => format!("Invalid image: {}", e),
            ApiError::Recognition(_) => "Recognition failed".to_string(),
            ApiError::Expression(_) => "Could not evaluate the recognized expression".to_string(),
            ApiError::Bounds { .. } => "Crop coordinate is outside the image".to_string(),
            ApiError::InternalError(_) => "Internal server error".to_string(),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.public_message(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::Loader(e) => write!(f, "Image loading failed: {}", e),
            ApiError::Recognition(e) => write!(f, "Recognition failed: {}", e),
            ApiError::Expression(e) => write!(f, "Expression error: {}", e),
            ApiError::Bounds { y, height } => write!(
                f,
                "Crop row {} is outside the splittable range of a {} row image",
                y, height
            ),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<LoaderError> for ApiError {
    fn from(err: LoaderError) -> Self {
        ApiError::Loader(err)
    }
}

impl From<RecognitionError> for ApiError {
    fn from(err: RecognitionError) -> Self {
        match err {
            // bytes resolved fine but are not an image the engine can read
            RecognitionError::Image(e) => ApiError::InvalidRequest(e.to_string()),
            other => ApiError::Recognition(other),
        }
    }
}

impl From<SolveError> for ApiError {
    fn from(err: SolveError) -> Self {
        match err {
            SolveError::Expression(e) => ApiError::Expression(e),
            SolveError::Bounds { y, height } => ApiError::Bounds { y, height },
            SolveError::Image(e) => ApiError::InvalidRequest(e.to_string()),
            SolveError::Recognition(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }
        (status, Json(self.to_response())).into_response()
    }
}
