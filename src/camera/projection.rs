// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! World-to-pixel projection through a pinhole camera
//!
//! Camera space follows the usual graphics convention: the camera looks down
//! -z with +y up, while image rows grow downward. Pixel coordinates are top-left
//! origin.

use crate::capture::CameraIntrinsics;
use crate::geometry::{Size, Triangle};
use nalgebra::{Matrix4, Point2, Point3};
use serde::{Deserialize, Serialize};

/// Integer pixel position, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: u32,
    pub y: u32,
}

impl PixelPoint {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Position divided by the image size
    pub fn normalized(&self, size: &Size) -> Point2<f32> {
        Point2::new(self.x as f32 / size.width, self.y as f32 / size.height)
    }
}

/// Camera pose, intrinsics and image bounds with the view matrix precomputed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    camera_to_world: Matrix4<f32>,
    world_to_camera: Matrix4<f32>,
    intrinsics: CameraIntrinsics,
    image_size: Size,
}

impl Projector {
    /// `None` when the camera transform cannot be inverted
    pub fn new(
        camera_to_world: Matrix4<f32>,
        intrinsics: CameraIntrinsics,
        image_size: Size,
    ) -> Option<Self> {
        let world_to_camera = camera_to_world.try_inverse()?;
        Some(Self {
            camera_to_world,
            world_to_camera,
            intrinsics,
            image_size,
        })
    }

    pub fn image_size(&self) -> Size {
        self.image_size
    }

    /// Sub-pixel image position of a world point in front of the camera
    pub fn project_precise(&self, world: &Point3<f32>) -> Option<Point2<f32>> {
        let p = self.world_to_camera.transform_point(world);
        if p.z >= 0.0 {
            return None;
        }

        let xn = p.x / -p.z;
        let yn = -p.y / -p.z;
        let u = self.intrinsics.fx * xn + self.intrinsics.cx;
        let v = self.intrinsics.fy * yn + self.intrinsics.cy;

        if !u.is_finite() || !v.is_finite() {
            return None;
        }
        if u < 0.0 || v < 0.0 || u >= self.image_size.width || v >= self.image_size.height {
            return None;
        }
        Some(Point2::new(u, v))
    }

    /// Nearest pixel of a world point, kept inside the image
    pub fn project(&self, world: &Point3<f32>) -> Option<PixelPoint> {
        let p = self.project_precise(world)?;
        let max_x = (self.image_size.width - 1.0).max(0.0);
        let max_y = (self.image_size.height - 1.0).max(0.0);
        Some(PixelPoint::new(
            p.x.round().min(max_x) as u32,
            p.y.round().min(max_y) as u32,
        ))
    }

    /// Pixels of all three corners, or `None` if any corner fails to project
    pub fn project_triangle(&self, triangle: &Triangle) -> Option<[PixelPoint; 3]> {
        Some([
            self.project(&triangle.v0)?,
            self.project(&triangle.v1)?,
            self.project(&triangle.v2)?,
        ])
    }

    /// World point seen at `pixel` at `depth` meters in front of the camera
    pub fn unproject(&self, pixel: &Point2<f32>, depth: f32) -> Point3<f32> {
        let xn = (pixel.x - self.intrinsics.cx) / self.intrinsics.fx;
        let yn = (pixel.y - self.intrinsics.cy) / self.intrinsics.fy;
        let camera = Point3::new(xn * depth, -yn * depth, -depth);
        self.camera_to_world.transform_point(&camera)
    }
}

/// One-off projection of a world point to a pixel
pub fn project_world_to_pixel(
    world: &Point3<f32>,
    camera_to_world: &Matrix4<f32>,
    intrinsics: &CameraIntrinsics,
    image_size: Size,
) -> Option<PixelPoint> {
    Projector::new(*camera_to_world, *intrinsics, image_size)?.project(world)
}
