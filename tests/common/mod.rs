// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Shared scene builders for integration tests.
//!
//! Scenes use an identity camera looking down -z at a wall of quads on the
//! plane z = -5. With fx = fy = 500 and a 1000×1000 label image, a point
//! (x, y) lands on pixel (500 + 100x, 500 - 100y).

#![allow(dead_code)]

use nalgebra::{Matrix4, Point3};
use surface_integrity::capture::{
    CameraIntrinsics, Detection, FaceBuffer, FrameSnapshot, LabelImage, MeshAnchor, StridedBuffer,
};
use surface_integrity::geometry::Rect;

pub const WALL_Z: f32 = -5.0;
pub const LABEL_SIZE: usize = 1000;
pub const QUAD: f32 = 0.2;

/// Quad (column, row) of the 10×10 wall spanning -1..1
pub fn quad_origin(column: usize, row: usize) -> (f32, f32) {
    (-1.0 + QUAD * column as f32, -1.0 + QUAD * row as f32)
}

/// Indexed mesh builder; each `add_grid` call gets its own vertices
#[derive(Default)]
pub struct MeshBuilder {
    vertices: Vec<[f32; 3]>,
    faces: Vec<[u32; 3]>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a grid of `columns × rows` quads starting at `(x0, y0)`.
    /// `keep(column, row)` selects quads, `place` moves each vertex.
    pub fn add_grid(
        mut self,
        x0: f32,
        y0: f32,
        columns: usize,
        rows: usize,
        keep: impl Fn(usize, usize) -> bool,
        place: impl Fn(Point3<f32>) -> Point3<f32>,
    ) -> Self {
        let base = self.vertices.len() as u32;
        for j in 0..=rows {
            for i in 0..=columns {
                let p = place(Point3::new(
                    x0 + QUAD * i as f32,
                    y0 + QUAD * j as f32,
                    WALL_Z,
                ));
                self.vertices.push([p.x, p.y, p.z]);
            }
        }

        let stride = columns as u32 + 1;
        for j in 0..rows {
            for i in 0..columns {
                if !keep(i, j) {
                    continue;
                }
                let v00 = base + j as u32 * stride + i as u32;
                let v10 = v00 + 1;
                let v01 = v00 + stride;
                let v11 = v01 + 1;
                self.faces.push([v00, v10, v11]);
                self.faces.push([v00, v11, v01]);
            }
        }
        self
    }

    pub fn add_triangle(mut self, corners: [Point3<f32>; 3]) -> Self {
        let base = self.vertices.len() as u32;
        for p in corners {
            self.vertices.push([p.x, p.y, p.z]);
        }
        self.faces.push([base, base + 1, base + 2]);
        self
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn build(self) -> MeshAnchor {
        MeshAnchor::new(
            Matrix4::identity(),
            StridedBuffer::from_points(&self.vertices),
            FaceBuffer::from_u32(&self.faces),
        )
    }
}

/// The full flat 10×10 wall
pub fn flat_wall() -> MeshBuilder {
    let (x0, y0) = quad_origin(0, 0);
    MeshBuilder::new().add_grid(x0, y0, 10, 10, |_, _| true, |p| p)
}

/// The wall with a 3×3 block of quads at columns and rows 3..6 cut out and
/// re-added as a separate patch rotated by `tilt_deg` about its horizontal
/// center line
pub fn wall_with_tilted_block(tilt_deg: f32) -> MeshBuilder {
    let (x0, y0) = quad_origin(0, 0);
    let in_block = |i: usize, j: usize| (3..6).contains(&i) && (3..6).contains(&j);

    let (bx, by) = quad_origin(3, 3);
    let center_y = by + 1.5 * QUAD;
    let (sin, cos) = tilt_deg.to_radians().sin_cos();

    MeshBuilder::new()
        .add_grid(x0, y0, 10, 10, |i, j| !in_block(i, j), |p| p)
        .add_grid(bx, by, 3, 3, |_, _| true, move |p| {
            let dy = p.y - center_y;
            Point3::new(p.x, center_y + dy * cos, p.z + dy * sin)
        })
}

/// The flat wall with its bottom-right corner vertex pulled `lift` toward
/// the camera. Only the one triangle using that vertex tilts, and it keeps
/// sharing its other two vertices with the grid.
pub fn wall_with_lifted_corner(lift: f32) -> MeshBuilder {
    let (x0, y0) = quad_origin(0, 0);
    let (cx, cy) = quad_origin(10, 0);
    MeshBuilder::new().add_grid(x0, y0, 10, 10, |_, _| true, move |p| {
        if (p.x - cx).abs() < 1e-4 && (p.y - cy).abs() < 1e-4 {
            Point3::new(p.x, p.y, p.z + lift)
        } else {
            p
        }
    })
}

/// Snapshot with camera, intrinsics and an all-target label image
pub fn scene(anchor: MeshAnchor) -> FrameSnapshot {
    FrameSnapshot::new(1.0)
        .with_camera_transform(Matrix4::identity())
        .with_intrinsics(CameraIntrinsics::new(500.0, 500.0, 500.0, 500.0))
        .with_label_image(LabelImage::filled(LABEL_SIZE, LABEL_SIZE, 1))
        .with_anchor(anchor)
}

/// Detection box in normalized label coordinates
pub fn detection(x: f32, y: f32, width: f32, height: f32) -> Detection {
    Detection::new(Rect::new(x, y, width, height), 0.9, "crack")
}
