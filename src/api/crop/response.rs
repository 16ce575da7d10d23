// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::Serialize;

use crate::solver::SplitBands;

/// `{"result": {"slidingImage": ..., "backImage": ...}}`, both base64 PNG
#[derive(Debug, Clone, Serialize)]
pub struct CropResponse {
    pub result: SplitBands,
}
