// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text captcha request types and validation

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::fields::required_image;

/// Request for POST /classification and POST /calculate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrRequest {
    /// Raw bytes, an http(s) URL or base64
    #[serde(default)]
    pub image: Option<Value>,
}

impl OcrRequest {
    /// Validate the request, returning the image field
    pub fn validate(&self) -> Result<&Value, ApiError> {
        required_image("image", &self.image)
    }
}
