// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Output of one analysis pass

use super::filter::FilterStats;
use super::status::{combine, IntegrityStatus, IntegrityStatusDetails};
use crate::camera::PixelPoint;
use crate::geometry::{Component, Plane, Triangle};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Debug color assigned to each considered triangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriangleColor {
    #[default]
    Normal,
    /// Deviant and part of an accepted component
    Deviant,
    /// Deviant but discarded by the component filters
    Noise,
    /// Within the angle threshold but far from its detection box's mean normal
    BoxOutlier,
}

impl TriangleColor {
    pub fn rgb(self) -> [u8; 3] {
        match self {
            TriangleColor::Normal => [0, 255, 0],
            TriangleColor::Deviant => [255, 0, 0],
            TriangleColor::Noise => [255, 255, 0],
            TriangleColor::BoxOutlier => [0, 0, 255],
        }
    }
}

/// Area bookkeeping of the deviation stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviationMetrics {
    pub total_area: f32,
    pub deviant_area: f32,
    pub component_area: f32,
    pub deviant_count: usize,
}

impl DeviationMetrics {
    pub fn deviant_ratio(&self) -> f32 {
        ratio(self.deviant_area, self.total_area)
    }

    pub fn component_ratio(&self) -> f32 {
        ratio(self.component_area, self.total_area)
    }
}

fn ratio(part: f32, total: f32) -> f32 {
    if total > 0.0 {
        part / total
    } else {
        0.0
    }
}

/// Triangles whose projected centroid fell inside one detection box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxGroup {
    /// Index into the snapshot's detections
    pub detection: usize,
    pub label: String,
    /// Indices into [`IntegrityResults::triangles`]
    pub faces: Vec<usize>,
    pub area: f32,
    /// Spread of face normals around their mean; `None` for empty boxes
    pub normal_deviation: Option<f32>,
}

/// Snapshot produced by one analysis pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityResults {
    pub frame_id: Uuid,
    /// Triangles that passed the segmentation filter
    pub triangles: Vec<Triangle>,
    /// Rejection counts for the triangles that did not
    #[serde(default)]
    pub filter_stats: FilterStats,
    pub normals: Vec<Vector3<f32>>,
    /// Projected corner pixels per triangle
    pub projected: Vec<[PixelPoint; 3]>,
    pub centroid_pixels: Vec<PixelPoint>,
    /// Folded angle to the plane per triangle; empty when no plane was fitted
    pub deviations_deg: Vec<f32>,
    pub colors: Vec<TriangleColor>,
    pub plane: Option<Plane>,
    pub plane_slope_deg: Option<f32>,
    /// Accepted deviant components, faces indexing `triangles`
    pub components: Vec<Component>,
    pub metrics: DeviationMetrics,
    pub box_groups: Vec<BoxGroup>,
    pub mesh_status: Option<IntegrityStatusDetails>,
    pub bbox_status: Option<IntegrityStatusDetails>,
    pub bbox_variance_status: Option<IntegrityStatusDetails>,
    pub status: IntegrityStatus,
}

impl IntegrityResults {
    /// Recompute the overall status from the individual signals
    pub fn combined_status(&self) -> IntegrityStatus {
        combine([
            self.mesh_status.as_ref(),
            self.bbox_status.as_ref(),
            self.bbox_variance_status.as_ref(),
        ])
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Triangles drawn with `color`
    pub fn triangles_with_color(&self, color: TriangleColor) -> impl Iterator<Item = &Triangle> {
        self.triangles
            .iter()
            .zip(&self.colors)
            .filter(move |(_, c)| **c == color)
            .map(|(t, _)| t)
    }

    /// Triangles that exceeded the angle threshold, including noise
    pub fn deviant_triangles(&self) -> Vec<Triangle> {
        self.triangles
            .iter()
            .zip(&self.colors)
            .filter(|(_, c)| matches!(c, TriangleColor::Deviant | TriangleColor::Noise))
            .map(|(t, _)| *t)
            .collect()
    }

    /// Triangles within the angle threshold
    pub fn normal_triangles(&self) -> Vec<Triangle> {
        self.triangles
            .iter()
            .zip(&self.colors)
            .filter(|(_, c)| matches!(c, TriangleColor::Normal | TriangleColor::BoxOutlier))
            .map(|(t, _)| *t)
            .collect()
    }

    /// One-line summary of every signal
    pub fn summary(&self) -> String {
        let describe = |name: &str, signal: &Option<IntegrityStatusDetails>| match signal {
            Some(d) => format!("{}: {} ({})", name, d.status, d.details),
            None => format!("{}: n/a", name),
        };
        format!(
            "{}; {}; {}; {}",
            describe("mesh", &self.mesh_status),
            describe("bbox", &self.bbox_status),
            describe("bbox variance", &self.bbox_variance_status),
            self.status.description()
        )
    }
}
