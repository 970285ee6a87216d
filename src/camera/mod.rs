// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Camera module - projection, orientation and detector box remapping

pub mod orientation;
pub mod projection;
pub mod remap;

pub use orientation::{DeviceOrientation, ImageOrientation};
pub use projection::{project_world_to_pixel, PixelPoint, Projector};
pub use remap::{
    resize_with_aspect_then_crop, undo_resize_with_aspect_then_crop, AspectCrop, BoxOrigin,
    DetectionRemapper,
};
