// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mapping boxes between the original camera frame and detector input
//!
//! Frames are prepared for the detector by resizing with the aspect ratio
//! preserved, center-cropping to the model input size and then applying the
//! capture orientation. Detector boxes come back normalized to that prepared
//! image, possibly with a bottom-left origin. [`DetectionRemapper`] runs the
//! exact inverse so boxes line up with the projected mesh.

use super::orientation::ImageOrientation;
use crate::capture::Detection;
use crate::geometry::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Uniform scale plus centering offset of a resize-then-crop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectCrop {
    pub scale: f32,
    pub x_offset: f32,
    pub y_offset: f32,
}

impl AspectCrop {
    /// Fit `source` to cover `target`, cropping the overflowing axis evenly
    pub fn new(source: Size, target: Size) -> Self {
        if source.aspect() > target.aspect() {
            // Wider than the target: match heights, crop x
            let scale = target.height / source.height;
            Self {
                scale,
                x_offset: (target.width - source.width * scale) / 2.0,
                y_offset: 0.0,
            }
        } else {
            let scale = target.width / source.width;
            Self {
                scale,
                x_offset: 0.0,
                y_offset: (target.height - source.height * scale) / 2.0,
            }
        }
    }

    pub fn apply(&self, rect: &Rect) -> Rect {
        rect.scaled(self.scale, self.scale)
            .translated(self.x_offset, self.y_offset)
    }

    pub fn invert(&self, rect: &Rect) -> Rect {
        let inv = 1.0 / self.scale;
        rect.translated(-self.x_offset, -self.y_offset).scaled(inv, inv)
    }
}

/// Map a pixel rectangle in `source` into the resized and cropped `target`
pub fn resize_with_aspect_then_crop(rect: &Rect, source: Size, target: Size) -> Rect {
    AspectCrop::new(source, target).apply(rect)
}

/// Map a pixel rectangle in the cropped `target` back into `source`
pub fn undo_resize_with_aspect_then_crop(rect: &Rect, source: Size, target: Size) -> Rect {
    AspectCrop::new(source, target).invert(rect)
}

/// Vertical origin of normalized detector boxes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoxOrigin {
    TopLeft,
    #[default]
    BottomLeft,
}

/// Converts boxes between original-frame and detector-input coordinates.
/// Both sides are normalized to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionRemapper {
    pub original_size: Size,
    pub model_input_size: Size,
    pub orientation: ImageOrientation,
    pub origin: BoxOrigin,
}

impl DetectionRemapper {
    pub fn new(
        original_size: Size,
        model_input_size: Size,
        orientation: ImageOrientation,
        origin: BoxOrigin,
    ) -> Self {
        Self {
            original_size,
            model_input_size,
            orientation,
            origin,
        }
    }

    fn crop(&self) -> AspectCrop {
        AspectCrop::new(self.original_size, self.model_input_size)
    }

    /// Box in the original frame (top-left) to detector coordinates
    pub fn to_detector(&self, rect: &Rect) -> Rect {
        let original_px = rect.scaled(self.original_size.width, self.original_size.height);
        let model_px = self.crop().apply(&original_px);
        let normalized = model_px.scaled(
            1.0 / self.model_input_size.width,
            1.0 / self.model_input_size.height,
        );
        let oriented = normalized.transformed(&self.orientation.normalized_transform());
        match self.origin {
            BoxOrigin::TopLeft => oriented,
            BoxOrigin::BottomLeft => oriented.flipped_y(),
        }
    }

    /// Detector box back to the original frame, top-left normalized
    pub fn to_original(&self, rect: &Rect) -> Rect {
        let top_left = match self.origin {
            BoxOrigin::TopLeft => *rect,
            BoxOrigin::BottomLeft => rect.flipped_y(),
        };
        let upright = top_left.transformed(&self.orientation.inverted().normalized_transform());
        let model_px = upright.scaled(self.model_input_size.width, self.model_input_size.height);
        let original_px = self.crop().invert(&model_px);
        original_px.scaled(
            1.0 / self.original_size.width,
            1.0 / self.original_size.height,
        )
    }

    /// Remap every detection box to the original frame
    pub fn remap_detections(&self, detections: &[Detection]) -> Vec<Detection> {
        detections
            .iter()
            .map(|d| Detection {
                bounding_box: self.to_original(&d.bounding_box),
                ..d.clone()
            })
            .collect()
    }
}
