// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Slider request types and validation

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::fields::required_image;

/// Request for POST /capcode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideMatchRequest {
    /// The puzzle piece
    #[serde(default)]
    pub sliding_image: Option<Value>,

    /// The background holding the gap
    #[serde(default)]
    pub back_image: Option<Value>,

    /// Match the piece as-is instead of trimming its transparent margin
    #[serde(default)]
    pub simple_target: Option<bool>,
}

impl SlideMatchRequest {
    /// Validate the request, returning the sliding and background fields
    pub fn validate(&self) -> Result<(&Value, &Value), ApiError> {
        Ok((
            required_image("slidingImage", &self.sliding_image)?,
            required_image("backImage", &self.back_image)?,
        ))
    }

    pub fn simple_target(&self) -> bool {
        self.simple_target.unwrap_or(true)
    }
}

/// Request for POST /slideComparison
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideCompareRequest {
    /// Background with the gap drawn in
    #[serde(default)]
    pub sliding_image: Option<Value>,

    /// Untouched background
    #[serde(default)]
    pub back_image: Option<Value>,
}

impl SlideCompareRequest {
    pub fn validate(&self) -> Result<(&Value, &Value), ApiError> {
        Ok((
            required_image("slidingImage", &self.sliding_image)?,
            required_image("backImage", &self.back_image)?,
        ))
    }
}
