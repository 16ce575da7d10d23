// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text captcha endpoints
//!
//! Provides POST /classification (read the text) and POST /calculate
//! (read an arithmetic expression and answer it).

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{calculate_handler, classification_handler};
pub use request::OcrRequest;
pub use response::{CalculateResponse, ClassificationResponse};
