// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Frame snapshot: everything one analysis pass reads

use super::anchor::MeshAnchor;
use crate::camera::DeviceOrientation;
use crate::geometry::{Rect, Size};
use image::GrayImage;
use nalgebra::{Matrix3, Matrix4};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pinhole intrinsics in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl CameraIntrinsics {
    pub fn new(fx: f32, fy: f32, cx: f32, cy: f32) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Read from a row-major `[fx 0 cx; 0 fy cy; 0 0 1]` matrix
    pub fn from_matrix(matrix: &Matrix3<f32>) -> Self {
        Self {
            fx: matrix[(0, 0)],
            fy: matrix[(1, 1)],
            cx: matrix[(0, 2)],
            cy: matrix[(1, 2)],
        }
    }

    pub fn matrix(&self) -> Matrix3<f32> {
        Matrix3::new(self.fx, 0.0, self.cx, 0.0, self.fy, self.cy, 0.0, 0.0, 1.0)
    }
}

/// Single-channel segmentation mask, one class id per pixel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelImage {
    pub width: usize,
    pub height: usize,
    /// Row pitch; may exceed `width` when rows are padded
    pub bytes_per_row: usize,
    pub bytes: Vec<u8>,
}

impl LabelImage {
    pub fn new(width: usize, height: usize, bytes_per_row: usize, bytes: Vec<u8>) -> Self {
        Self {
            width,
            height,
            bytes_per_row,
            bytes,
        }
    }

    /// Unpadded mask with every pixel set to `class`
    pub fn filled(width: usize, height: usize, class: u8) -> Self {
        Self::new(width, height, width, vec![class; width * height])
    }

    pub fn from_gray_image(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(
            width as usize,
            height as usize,
            width as usize,
            image.as_raw().clone(),
        )
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }

    /// Class at pixel (x, y); `None` outside the image or the buffer
    pub fn sample(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y.checked_mul(self.bytes_per_row)?.checked_add(x)?;
        self.bytes.get(index).copied()
    }
}

/// Damage detector output in normalized top-left image coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bounding_box: Rect,
    pub confidence: f32,
    pub label: String,
}

impl Detection {
    pub fn new(bounding_box: Rect, confidence: f32, label: impl Into<String>) -> Self {
        Self {
            bounding_box,
            confidence,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub timestamp: f64,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadingFix {
    pub timestamp: f64,
    pub magnetic_heading: f64,
    pub true_heading: f64,
}

/// Scene depth in meters with optional per-pixel confidence (0 low, 2 high)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthBuffer {
    pub width: usize,
    pub height: usize,
    pub depth: Vec<f32>,
    #[serde(default)]
    pub confidence: Option<Vec<u8>>,
}

/// Immutable bundle of one captured frame.
///
/// Camera transform, intrinsics and label image are optional because a
/// frame can be published before the segmentation or tracking catches up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame_id: Uuid,
    /// Seconds since the Unix epoch
    pub timestamp: f64,
    /// Camera-to-world transform
    #[serde(default)]
    pub camera_transform: Option<Matrix4<f32>>,
    #[serde(default)]
    pub intrinsics: Option<CameraIntrinsics>,
    #[serde(default)]
    pub label_image: Option<LabelImage>,
    /// Size of the original color image; the label image is expected to be
    /// at this resolution
    #[serde(default)]
    pub image_size: Option<Size>,
    #[serde(default)]
    pub detections: Option<Vec<Detection>>,
    #[serde(default)]
    pub anchors: Vec<MeshAnchor>,
    #[serde(default)]
    pub depth: Option<DepthBuffer>,
    #[serde(default)]
    pub location: Option<LocationFix>,
    #[serde(default)]
    pub heading: Option<HeadingFix>,
    #[serde(default)]
    pub device_orientation: DeviceOrientation,
}

impl FrameSnapshot {
    pub fn new(timestamp: f64) -> Self {
        Self {
            frame_id: Uuid::new_v4(),
            timestamp,
            camera_transform: None,
            intrinsics: None,
            label_image: None,
            image_size: None,
            detections: None,
            anchors: Vec::new(),
            depth: None,
            location: None,
            heading: None,
            device_orientation: DeviceOrientation::default(),
        }
    }

    pub fn with_frame_id(mut self, frame_id: Uuid) -> Self {
        self.frame_id = frame_id;
        self
    }

    pub fn with_camera_transform(mut self, transform: Matrix4<f32>) -> Self {
        self.camera_transform = Some(transform);
        self
    }

    pub fn with_intrinsics(mut self, intrinsics: CameraIntrinsics) -> Self {
        self.intrinsics = Some(intrinsics);
        self
    }

    pub fn with_label_image(mut self, label_image: LabelImage) -> Self {
        self.label_image = Some(label_image);
        self
    }

    pub fn with_image_size(mut self, size: Size) -> Self {
        self.image_size = Some(size);
        self
    }

    pub fn with_detections(mut self, detections: Vec<Detection>) -> Self {
        self.detections = Some(detections);
        self
    }

    pub fn with_anchor(mut self, anchor: MeshAnchor) -> Self {
        self.anchors.push(anchor);
        self
    }

    pub fn with_depth(mut self, depth: DepthBuffer) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_location(mut self, location: LocationFix) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_heading(mut self, heading: HeadingFix) -> Self {
        self.heading = Some(heading);
        self
    }

    pub fn with_device_orientation(mut self, orientation: DeviceOrientation) -> Self {
        self.device_orientation = orientation;
        self
    }
}
