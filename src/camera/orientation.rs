// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Image and device orientation
//!
//! Orientation maps act on normalized top-left coordinates in the unit
//! square. Rotations by a quarter turn swap the axes, so a rectangle's width
//! and height trade places when mapped.

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// How stored image pixels are rotated or mirrored relative to upright
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageOrientation {
    #[default]
    Up,
    Down,
    Left,
    Right,
    UpMirrored,
    DownMirrored,
    LeftMirrored,
    RightMirrored,
}

impl ImageOrientation {
    pub const ALL: [ImageOrientation; 8] = [
        ImageOrientation::Up,
        ImageOrientation::Down,
        ImageOrientation::Left,
        ImageOrientation::Right,
        ImageOrientation::UpMirrored,
        ImageOrientation::DownMirrored,
        ImageOrientation::LeftMirrored,
        ImageOrientation::RightMirrored,
    ];

    /// Orientation whose map undoes this one
    pub fn inverted(self) -> Self {
        match self {
            ImageOrientation::Left => ImageOrientation::Right,
            ImageOrientation::Right => ImageOrientation::Left,
            other => other,
        }
    }

    /// Whether a quarter turn is involved
    pub fn swaps_axes(self) -> bool {
        matches!(
            self,
            ImageOrientation::Left
                | ImageOrientation::Right
                | ImageOrientation::LeftMirrored
                | ImageOrientation::RightMirrored
        )
    }

    /// Homogeneous 2D transform on the unit square
    pub fn normalized_transform(self) -> Matrix3<f32> {
        // (x, y) -> (a x + b y + tx, c x + d y + ty)
        let (a, b, tx, c, d, ty) = match self {
            ImageOrientation::Up => (1.0, 0.0, 0.0, 0.0, 1.0, 0.0),
            ImageOrientation::Down => (-1.0, 0.0, 1.0, 0.0, -1.0, 1.0),
            ImageOrientation::Left => (0.0, -1.0, 1.0, 1.0, 0.0, 0.0),
            ImageOrientation::Right => (0.0, 1.0, 0.0, -1.0, 0.0, 1.0),
            ImageOrientation::UpMirrored => (-1.0, 0.0, 1.0, 0.0, 1.0, 0.0),
            ImageOrientation::DownMirrored => (1.0, 0.0, 0.0, 0.0, -1.0, 1.0),
            ImageOrientation::LeftMirrored => (0.0, -1.0, 1.0, -1.0, 0.0, 1.0),
            ImageOrientation::RightMirrored => (0.0, 1.0, 0.0, 1.0, 0.0, 0.0),
        };
        Matrix3::new(a, b, tx, c, d, ty, 0.0, 0.0, 1.0)
    }
}

/// Physical orientation of the capture device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum DeviceOrientation {
    #[default]
    Unknown = 0,
    Portrait = 1,
    PortraitUpsideDown = 2,
    LandscapeLeft = 3,
    LandscapeRight = 4,
    FaceUp = 5,
    FaceDown = 6,
}

impl DeviceOrientation {
    pub fn from_raw(value: u8) -> Self {
        match value {
            1 => Self::Portrait,
            2 => Self::PortraitUpsideDown,
            3 => Self::LandscapeLeft,
            4 => Self::LandscapeRight,
            5 => Self::FaceUp,
            6 => Self::FaceDown,
            _ => Self::Unknown,
        }
    }

    pub fn raw(self) -> u8 {
        self as u8
    }

    pub fn is_landscape(self) -> bool {
        matches!(self, Self::LandscapeLeft | Self::LandscapeRight)
    }

    /// Orientation of back-camera frames held this way. Unknown and flat
    /// postures are treated as portrait.
    pub fn back_camera_image_orientation(self) -> ImageOrientation {
        match self {
            Self::Portrait => ImageOrientation::Right,
            Self::PortraitUpsideDown => ImageOrientation::Left,
            Self::LandscapeLeft => ImageOrientation::Up,
            Self::LandscapeRight => ImageOrientation::Down,
            _ => ImageOrientation::Right,
        }
    }
}
