// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crop request types and validation

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::fields::required_image;

/// Request for POST /crop
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CropRequest {
    /// Stacked slider image
    #[serde(default)]
    pub image: Option<Value>,

    /// Height of the top band; the bottom band starts at twice this row
    #[serde(default)]
    pub y_coordinate: Option<Value>,
}

impl CropRequest {
    /// Validate the request, returning the image field and the split row
    pub fn validate(&self) -> Result<(&Value, u32), ApiError> {
        let image = required_image("image", &self.image)?;
        let y = match &self.y_coordinate {
            None | Some(Value::Null) => return Err(ApiError::missing_field("y_coordinate")),
            Some(value) => parse_row(value).ok_or_else(|| ApiError::ValidationError {
                field: "y_coordinate".to_string(),
                message: format!("y_coordinate must be a non-negative integer, got {}", value),
            })?,
        };
        Ok((image, y))
    }
}

/// Accept `50` and `"50"`
fn parse_row(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
