// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Surface Integrity
//!
//! Decides whether a depth-captured surface is intact or compromised. A
//! classified triangle mesh is filtered to the segmented region of interest,
//! a reference plane is fitted, faces tilted away from it are grouped into
//! connected components, and the result is cross-checked against damage
//! detector boxes.

pub mod camera;
pub mod cli;
pub mod capture;
pub mod error;
pub mod geometry;
pub mod integrity;
pub mod io;
pub mod utils;

pub use capture::{FrameSnapshot, SnapshotPublisher};
pub use error::{AnalysisError, DatasetError, MissingInput, Result};
pub use integrity::{
    IntegrityCalculator, IntegrityConfig, IntegrityResults, IntegrityStatus,
    IntegrityStatusDetails,
};

/// Analyze a snapshot with the default configuration
pub fn analyze(snapshot: &FrameSnapshot) -> Result<IntegrityResults> {
    IntegrityCalculator::default().analyze(snapshot)
}
