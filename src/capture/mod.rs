// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Capture module - raw mesh buffers, frame snapshots and their hand-off

pub mod anchor;
pub mod buffer;
pub mod frame;
pub mod publisher;

pub use anchor::{extract_triangles, ExtractedTriangle, MeshAnchor, MeshClassification};
pub use buffer::{FaceBuffer, IndexFormat, StridedBuffer};
pub use frame::{
    CameraIntrinsics, DepthBuffer, Detection, FrameSnapshot, HeadingFix, LabelImage, LocationFix,
};
pub use publisher::SnapshotPublisher;
