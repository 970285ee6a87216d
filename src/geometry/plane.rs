// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Reference plane fitting
//!
//! The plane is fitted with weighted PCA: the direction of least variance of
//! the weighted point cloud is the surface normal. For a mesh the points are
//! triangle centroids weighted by triangle area, so large faces dominate the
//! fit and slivers barely move it.
//!
//! The sign of the normal is whatever the eigen-solver returns. Consumers
//! compare angles with [`folded_angle_between_deg`] so either sign works.

use crate::utils::math::folded_angle_between_deg;
use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};
use serde::{Deserialize, Serialize};

/// Lower bound for the weight sum used as a divisor
const MIN_WEIGHT_SUM: f32 = 1e-6;

/// Covariance trace below which the cloud is treated as a single point
const DEGENERATE_SPREAD: f32 = 1e-12;

const EIGEN_EPSILON: f32 = f32::EPSILON;
const EIGEN_MAX_ITERATIONS: usize = 256;

/// Plane `normal · p + offset = 0` with a unit normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vector3<f32>,
    pub offset: f32,
}

impl Plane {
    /// Build a plane through `point`; `normal` is normalized
    pub fn from_point_normal(point: &Point3<f32>, normal: &Vector3<f32>) -> Option<Self> {
        let normal = normal.try_normalize(f32::EPSILON)?;
        Some(Self {
            normal,
            offset: -normal.dot(&point.coords),
        })
    }

    pub fn signed_distance(&self, point: &Point3<f32>) -> f32 {
        self.normal.dot(&point.coords) + self.offset
    }

    /// Angle in degrees between a face normal and this plane's normal,
    /// folded onto [0, 90]
    pub fn deviation_deg(&self, normal: &Vector3<f32>) -> f32 {
        folded_angle_between_deg(normal, &self.normal)
    }

    /// Inclination of the plane relative to an up axis, in degrees
    pub fn slope_deg(&self, up: &Vector3<f32>) -> Option<f32> {
        let up = up.try_normalize(f32::EPSILON)?;
        Some(folded_angle_between_deg(&self.normal, &up))
    }
}

/// Fit a plane through weighted points with PCA.
///
/// Returns `None` for fewer than three points, mismatched weights, coincident
/// points, or when the eigen-decomposition does not converge.
pub fn fit_plane_pca(points: &[Point3<f32>], weights: &[f32]) -> Option<Plane> {
    if points.len() < 3 || points.len() != weights.len() {
        return None;
    }

    let total_weight: f32 = weights.iter().sum();
    let denom = total_weight.max(MIN_WEIGHT_SUM);

    let mu = points
        .iter()
        .zip(weights)
        .fold(Vector3::zeros(), |acc, (p, &w)| acc + p.coords * w)
        / denom;

    let mut cov = Matrix3::zeros();
    for (p, &w) in points.iter().zip(weights) {
        let diff = p.coords - mu;
        cov += diff * diff.transpose() * w;
    }
    cov /= denom;

    if !cov.iter().all(|v| v.is_finite()) || cov.trace() <= DEGENERATE_SPREAD {
        return None;
    }

    let eigen = SymmetricEigen::try_new(cov, EIGEN_EPSILON, EIGEN_MAX_ITERATIONS)?;
    let (smallest, _) = eigen
        .eigenvalues
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))?;

    let normal = eigen
        .eigenvectors
        .column(smallest)
        .into_owned()
        .try_normalize(f32::EPSILON)?;

    if !normal.iter().all(|v| v.is_finite()) {
        return None;
    }

    Some(Plane {
        normal,
        offset: -normal.dot(&mu),
    })
}
