// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text captcha response types

use serde::Serialize;

use crate::solver::Number;

/// Recognized text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResponse {
    pub result: String,
}

/// Answer to an arithmetic captcha
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalculateResponse {
    pub result: Number,
}
