// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::fields::required_image;

/// Request for POST /detection and POST /select
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionRequest {
    #[serde(default)]
    pub image: Option<Value>,
}

impl DetectionRequest {
    pub fn validate(&self) -> Result<&Value, ApiError> {
        required_image("image", &self.image)
    }
}
