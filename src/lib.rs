// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod solver;
pub mod version;
pub mod vision;

pub use api::{create_router, AppState};
pub use config::ServerConfig;
pub use solver::{Number, SelectedRegion, SolveError, SplitBands};
pub use vision::{BoundingBox, ImageLoader, LoaderConfig, Recognizer, VisionModelManager};
