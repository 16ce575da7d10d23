// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Stacked slider image endpoint
//!
//! Provides POST /crop for splitting one image into piece and background.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::crop_handler;
pub use request::CropRequest;
pub use response::CropResponse;
