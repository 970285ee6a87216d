// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! World-space triangles

use crate::utils::math::scaled_triangle_normal;
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Triangle defined by three world-space positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub v0: Point3<f32>,
    pub v1: Point3<f32>,
    pub v2: Point3<f32>,
}

impl Triangle {
    pub fn new(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) -> Self {
        Self { v0, v1, v2 }
    }

    pub fn vertices(&self) -> [Point3<f32>; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Unit face normal following the v0 -> v1 -> v2 winding.
    /// Degenerate triangles report a zero vector.
    pub fn normal(&self) -> Vector3<f32> {
        self.unit_normal().unwrap_or_else(Vector3::zeros)
    }

    /// Unit face normal, `None` for collapsed or collinear triangles
    pub fn unit_normal(&self) -> Option<Vector3<f32>> {
        scaled_triangle_normal(&self.v0, &self.v1, &self.v2).try_normalize(f32::EPSILON)
    }

    pub fn area(&self) -> f32 {
        0.5 * scaled_triangle_normal(&self.v0, &self.v1, &self.v2).norm()
    }

    pub fn centroid(&self) -> Point3<f32> {
        Point3::from((self.v0.coords + self.v1.coords + self.v2.coords) / 3.0)
    }

    /// Apply an affine transform to every vertex (w = 1)
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Self {
        Self {
            v0: matrix.transform_point(&self.v0),
            v1: matrix.transform_point(&self.v1),
            v2: matrix.transform_point(&self.v2),
        }
    }
}
