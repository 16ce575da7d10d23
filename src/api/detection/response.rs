// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::Serialize;

use crate::solver::SelectedRegion;
use crate::vision::BoundingBox;

/// Boxes as `[x1, y1, x2, y2]`, in detection order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResponse {
    pub result: Vec<BoundingBox>,
}

/// One `{"<text>": [x1, y1, x2, y2]}` entry per detected region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectResponse {
    pub result: Vec<SelectedRegion>,
}
