// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Integrity analysis pipeline
//!
//! One pass runs Filtering, PlaneFitting, DeviationScoring and, when the
//! frame carries detections, BoundingBoxCorrelation and
//! BoundingBoxVarianceScoring. Nothing is kept between passes.

use super::config::IntegrityConfig;
use super::detections::{box_area_status, box_variance_status, correlate_boxes};
use super::deviation::score_deviation;
use super::filter::filter_triangles;
use super::results::{DeviationMetrics, IntegrityResults, TriangleColor};
use super::status::combine;
use crate::camera::Projector;
use crate::capture::{extract_triangles, FrameSnapshot, SnapshotPublisher};
use crate::error::{AnalysisError, MissingInput, Result};
use crate::geometry::fit_plane_pca;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Pipeline stage, logged on every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    Idle,
    Filtering,
    PlaneFitting,
    DeviationScoring,
    BoundingBoxCorrelation,
    BoundingBoxVarianceScoring,
    Finalized,
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalysisStage::Idle => "idle",
            AnalysisStage::Filtering => "filtering",
            AnalysisStage::PlaneFitting => "plane-fitting",
            AnalysisStage::DeviationScoring => "deviation-scoring",
            AnalysisStage::BoundingBoxCorrelation => "bbox-correlation",
            AnalysisStage::BoundingBoxVarianceScoring => "bbox-variance-scoring",
            AnalysisStage::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

fn enter(frame_id: &Uuid, stage: AnalysisStage) {
    debug!(%frame_id, %stage, "Analysis stage");
}

/// Stateless integrity classifier
#[derive(Debug, Clone, Default)]
pub struct IntegrityCalculator {
    config: IntegrityConfig,
}

impl IntegrityCalculator {
    pub fn new(config: IntegrityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IntegrityConfig {
        &self.config
    }

    /// Analyze the latest published snapshot, if any
    pub fn analyze_latest(
        &self,
        publisher: &SnapshotPublisher,
    ) -> Option<(Arc<FrameSnapshot>, Result<IntegrityResults>)> {
        let snapshot = publisher.latest()?;
        let result = self.analyze(&snapshot);
        Some((snapshot, result))
    }

    /// Run one full pass over a frame snapshot.
    ///
    /// Fails with [`AnalysisError::InsufficientData`] when the camera pose,
    /// intrinsics or label image are missing. A failed plane fit leaves the
    /// mesh signal absent; missing detections leave both box signals absent.
    pub fn analyze(&self, snapshot: &FrameSnapshot) -> Result<IntegrityResults> {
        let frame_id = snapshot.frame_id;
        enter(&frame_id, AnalysisStage::Idle);

        let transform = snapshot
            .camera_transform
            .ok_or(AnalysisError::InsufficientData(MissingInput::CameraTransform))?;
        let intrinsics = snapshot
            .intrinsics
            .ok_or(AnalysisError::InsufficientData(MissingInput::CameraIntrinsics))?;
        let label = snapshot
            .label_image
            .as_ref()
            .ok_or(AnalysisError::InsufficientData(MissingInput::LabelImage))?;
        let label_size = label.size();
        let projector = Projector::new(transform, intrinsics, label_size).ok_or(
            AnalysisError::InsufficientData(MissingInput::InvalidCameraTransform),
        )?;

        enter(&frame_id, AnalysisStage::Filtering);
        let extracted = extract_triangles(&snapshot.anchors);
        let (filtered, filter_stats) =
            filter_triangles(&extracted, &projector, label, &self.config);
        let sources: Vec<_> = filtered.iter().map(|f| f.source).collect();
        let triangles: Vec<_> = sources.iter().map(|s| s.triangle).collect();
        let normals: Vec<_> = triangles.iter().map(|t| t.normal()).collect();

        enter(&frame_id, AnalysisStage::PlaneFitting);
        let centroids: Vec<_> = triangles.iter().map(|t| t.centroid()).collect();
        let areas: Vec<_> = triangles.iter().map(|t| t.area()).collect();
        let plane = fit_plane_pca(&centroids, &areas);
        let plane_slope_deg = plane.and_then(|p| p.slope_deg(&self.config.up_axis));
        if plane.is_none() {
            debug!(%frame_id, triangles = triangles.len(), "No reference plane; mesh signal absent");
        }

        let mut colors = vec![TriangleColor::Normal; triangles.len()];
        let mut deviations_deg = Vec::new();
        let mut components = Vec::new();
        let mut metrics = DeviationMetrics::default();
        let mut mesh_status = None;

        if let Some(plane) = &plane {
            enter(&frame_id, AnalysisStage::DeviationScoring);
            let outcome = score_deviation(&sources, plane, &self.config);
            let in_component = outcome.in_component();
            for (i, color) in colors.iter_mut().enumerate() {
                if outcome.deviant[i] {
                    *color = if in_component[i] {
                        TriangleColor::Deviant
                    } else {
                        TriangleColor::Noise
                    };
                }
            }
            deviations_deg = outcome.deviations_deg;
            components = outcome.components;
            metrics = outcome.metrics;
            mesh_status = Some(outcome.status);
        }

        let mut box_groups = Vec::new();
        let mut bbox_status = None;
        let mut bbox_variance_status = None;

        if let Some(detections) = &snapshot.detections {
            enter(&frame_id, AnalysisStage::BoundingBoxCorrelation);
            let centroid_pixels: Vec<_> = filtered.iter().map(|f| f.centroid_pixel).collect();
            box_groups = correlate_boxes(detections, &triangles, &centroid_pixels, &label_size);
            bbox_status = Some(box_area_status(&box_groups, &self.config));

            enter(&frame_id, AnalysisStage::BoundingBoxVarianceScoring);
            let (status, outliers) =
                box_variance_status(&mut box_groups, &normals, plane.as_ref(), &self.config);
            for face in outliers {
                if colors[face] == TriangleColor::Normal {
                    colors[face] = TriangleColor::BoxOutlier;
                }
            }
            bbox_variance_status = Some(status);
        }

        enter(&frame_id, AnalysisStage::Finalized);
        let status = combine([
            mesh_status.as_ref(),
            bbox_status.as_ref(),
            bbox_variance_status.as_ref(),
        ]);

        info!(
            %frame_id,
            %status,
            triangles = triangles.len(),
            components = components.len(),
            deviant_ratio = metrics.deviant_ratio(),
            component_ratio = metrics.component_ratio(),
            "Integrity analysis complete"
        );

        Ok(IntegrityResults {
            frame_id,
            projected: filtered.iter().map(|f| f.corners).collect(),
            centroid_pixels: filtered.iter().map(|f| f.centroid_pixel).collect(),
            triangles,
            filter_stats,
            normals,
            deviations_deg,
            colors,
            plane,
            plane_slope_deg,
            components,
            metrics,
            box_groups,
            mesh_status,
            bbox_status,
            bbox_variance_status,
            status,
        })
    }
}
