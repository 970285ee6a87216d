// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities

use nalgebra::{Point3, Vector3};

/// Unnormalized triangle normal; its length is twice the triangle area
pub fn scaled_triangle_normal(
    p0: &Point3<f32>,
    p1: &Point3<f32>,
    p2: &Point3<f32>,
) -> Vector3<f32> {
    (p1 - p0).cross(&(p2 - p0))
}

/// Fold an angle in [0, 180] onto [0, 90]
///
/// Normals that point the opposite way still describe the same surface.
pub fn fold_angle_deg(angle: f32) -> f32 {
    if angle > 90.0 {
        180.0 - angle
    } else {
        angle
    }
}

/// Angle between two unit vectors in degrees, folded onto [0, 90]
pub fn folded_angle_between_deg(a: &Vector3<f32>, b: &Vector3<f32>) -> f32 {
    let cos = a.dot(b).clamp(-1.0, 1.0);
    fold_angle_deg(cos.acos().to_degrees())
}
