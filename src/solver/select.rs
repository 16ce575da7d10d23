// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Click-to-select captchas: detect every glyph, then read each one

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;

use super::SolveError;
use crate::vision::bbox::BoundingBox;
use crate::vision::image_utils::{crop_region, decode_image, encode_png};
use crate::vision::recognizer::{RecognitionError, Recognizer};

/// A detected region and the text read from it
///
/// Serializes as a single-entry object `{"<label>": [x1, y1, x2, y2]}`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedRegion {
    pub label: String,
    pub bbox: BoundingBox,
}

impl Serialize for SelectedRegion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.label, &self.bbox.to_array())?;
        map.end()
    }
}

/// Detect regions and classify each crop, keeping detection order
pub fn select_points(
    recognizer: &dyn Recognizer,
    image: &[u8],
) -> Result<Vec<SelectedRegion>, SolveError> {
    let decoded = decode_image(image)?;
    let boxes = recognizer.detect(image)?;
    debug!("detected {} regions", boxes.len());

    boxes
        .into_iter()
        .map(|bbox| {
            // a box the engine placed outside the image is an engine fault
            let crop = crop_region(&decoded, &bbox).map_err(|e| {
                RecognitionError::inference(format!("detected region {:?}: {}", bbox.to_array(), e))
            })?;
            let label = recognizer.classify(&encode_png(&crop)?)?;
            Ok(SelectedRegion { label, bbox })
        })
        .collect()
}
