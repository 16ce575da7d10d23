// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Click captcha endpoints
//!
//! Provides POST /detection (glyph boxes) and POST /select (boxes with
//! the text read from each).

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{detection_handler, select_handler};
pub use request::DetectionRequest;
pub use response::{DetectionResponse, SelectResponse};
