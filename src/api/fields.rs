// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Required-field checks shared by the request types

use serde_json::Value;

use super::errors::ApiError;

/// The value of a required image field
///
/// `null` and the empty string count as missing.
pub fn required_image<'a>(field: &str, value: &'a Option<Value>) -> Result<&'a Value, ApiError> {
    match value {
        None | Some(Value::Null) => Err(ApiError::missing_field(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ApiError::missing_field(field)),
        Some(v) => Ok(v),
    }
}
