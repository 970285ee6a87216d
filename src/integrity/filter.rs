// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Region-of-interest filtering through the segmentation mask

use super::config::IntegrityConfig;
use crate::camera::{PixelPoint, Projector};
use crate::capture::{ExtractedTriangle, LabelImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Triangle that projects fully into the image and onto a target class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilteredTriangle {
    pub source: ExtractedTriangle,
    pub centroid_pixel: PixelPoint,
    pub corners: [PixelPoint; 3],
}

/// Why a triangle was rejected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    pub mesh_class: usize,
    pub centroid_outside: usize,
    pub wrong_label: usize,
    pub corner_outside: usize,
}

impl FilterStats {
    pub fn rejected(&self) -> usize {
        self.mesh_class + self.centroid_outside + self.wrong_label + self.corner_outside
    }
}

/// Keep triangles whose centroid lands on a target class pixel and whose
/// corners all project inside the image
pub fn filter_triangles(
    triangles: &[ExtractedTriangle],
    projector: &Projector,
    label: &LabelImage,
    config: &IntegrityConfig,
) -> (Vec<FilteredTriangle>, FilterStats) {
    let mut stats = FilterStats::default();
    let mut kept = Vec::new();

    for extracted in triangles {
        if !config.accepts_mesh_class(extracted.classification) {
            stats.mesh_class += 1;
            continue;
        }

        let Some(centroid_pixel) = projector.project(&extracted.triangle.centroid()) else {
            stats.centroid_outside += 1;
            continue;
        };

        let class = label.sample(centroid_pixel.x as usize, centroid_pixel.y as usize);
        if !class.is_some_and(|c| config.is_target_class(c)) {
            stats.wrong_label += 1;
            continue;
        }

        let Some(corners) = projector.project_triangle(&extracted.triangle) else {
            stats.corner_outside += 1;
            continue;
        };

        kept.push(FilteredTriangle {
            source: *extracted,
            centroid_pixel,
            corners,
        });
    }

    debug!(
        kept = kept.len(),
        rejected = stats.rejected(),
        wrong_label = stats.wrong_label,
        outside = stats.centroid_outside + stats.corner_outside,
        "Filtered triangles by segmentation mask"
    );
    (kept, stats)
}
