// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types surfaced by the analysis and persistence layers

use thiserror::Error;
use uuid::Uuid;

/// Result type for integrity analysis
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Inputs an analysis pass cannot run without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    CameraTransform,
    CameraIntrinsics,
    LabelImage,
    /// Camera transform present but not invertible
    InvalidCameraTransform,
}

impl std::fmt::Display for MissingInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MissingInput::CameraTransform => "camera transform",
            MissingInput::CameraIntrinsics => "camera intrinsics",
            MissingInput::LabelImage => "segmentation label image",
            MissingInput::InvalidCameraTransform => "invertible camera transform",
        };
        f.write_str(name)
    }
}

/// Errors returned by an analysis pass
///
/// None of these are fatal: the caller keeps the previous result and waits
/// for the next snapshot.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Insufficient data: missing {0}")]
    InsufficientData(MissingInput),
}

impl AnalysisError {
    /// True when the pass was skipped for lack of inputs rather than computed
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, AnalysisError::InsufficientData(_))
    }
}

/// Errors raised while persisting captured frames
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Frame {0} has already been captured; choose a different frame id")]
    DuplicateFrame(Uuid),

    #[error("Mesh has no geometry to encode")]
    EmptyMesh,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from typed reads of raw mesh buffers
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    #[error("Element {index} out of range for buffer of {count} elements")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Read of {len} bytes at {start} exceeds buffer length {available}")]
    Truncated {
        start: usize,
        len: usize,
        available: usize,
    },
}
