// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Slider captcha endpoints
//!
//! Provides POST /capcode (piece matching) and POST /slideComparison
//! (gap diffing).

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{capcode_handler, slide_comparison_handler};
pub use request::{SlideCompareRequest, SlideMatchRequest};
pub use response::OffsetResponse;
