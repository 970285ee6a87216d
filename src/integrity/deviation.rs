// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Deviation scoring against the reference plane
//!
//! Deviant faces alone form the topology that components run on, so a
//! component is a patch of contiguous deviant surface. Faces from different
//! anchors never join the same component.

use super::config::IntegrityConfig;
use super::results::DeviationMetrics;
use super::status::IntegrityStatusDetails;
use crate::capture::ExtractedTriangle;
use crate::geometry::{build_topology, connected_components, Component, MeshPart, Plane};
use std::collections::BTreeMap;

/// Result of scoring every filtered triangle
#[derive(Debug, Clone, PartialEq)]
pub struct DeviationOutcome {
    pub deviations_deg: Vec<f32>,
    pub deviant: Vec<bool>,
    /// Accepted components, faces indexing the scored triangles
    pub components: Vec<Component>,
    pub metrics: DeviationMetrics,
    pub status: IntegrityStatusDetails,
}

impl DeviationOutcome {
    /// Whether a deviant face ended up in an accepted component
    pub fn in_component(&self) -> Vec<bool> {
        let mut mask = vec![false; self.deviant.len()];
        for face in self.components.iter().flat_map(|c| &c.face_indices) {
            mask[*face] = true;
        }
        mask
    }
}

/// Group deviant faces by anchor and find their connected components
pub fn deviant_components(
    triangles: &[ExtractedTriangle],
    deviant: &[bool],
    config: &IntegrityConfig,
) -> Vec<Component> {
    let mut by_anchor: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (index, t) in triangles.iter().enumerate() {
        if deviant.get(index).copied().unwrap_or(false) {
            by_anchor.entry(t.anchor).or_default().push(index);
        }
    }

    // Topology faces are numbered part by part, in the order pushed here
    let mut face_to_source = Vec::new();
    let parts: Vec<MeshPart> = by_anchor
        .values()
        .map(|faces| {
            face_to_source.extend_from_slice(faces);
            MeshPart::from_indexed_triangles(
                faces
                    .iter()
                    .map(|&i| (&triangles[i].triangle, triangles[i].indices)),
            )
        })
        .collect();

    let topology = build_topology(&parts);
    connected_components(&topology, &config.components)
        .into_iter()
        .map(|component| {
            let mut face_indices: Vec<usize> = component
                .face_indices
                .iter()
                .map(|&f| face_to_source[f])
                .collect();
            face_indices.sort_unstable();
            Component {
                face_indices,
                total_area: component.total_area,
            }
        })
        .collect()
}

/// Score each triangle against `plane` and decide the mesh signal.
///
/// Degenerate triangles have no orientation; they score 0° and are never
/// deviant.
pub fn score_deviation(
    triangles: &[ExtractedTriangle],
    plane: &Plane,
    config: &IntegrityConfig,
) -> DeviationOutcome {
    let normals: Vec<_> = triangles.iter().map(|t| t.triangle.unit_normal()).collect();
    let deviations_deg: Vec<f32> = normals
        .iter()
        .map(|n| n.map_or(0.0, |n| plane.deviation_deg(&n)))
        .collect();
    let deviant: Vec<bool> = deviations_deg
        .iter()
        .zip(&normals)
        .map(|(&angle, n)| n.is_some() && angle > config.angle_threshold_deg)
        .collect();

    let mut metrics = DeviationMetrics::default();
    for (t, &is_deviant) in triangles.iter().zip(&deviant) {
        let area = t.triangle.area();
        metrics.total_area += area;
        if is_deviant {
            metrics.deviant_area += area;
            metrics.deviant_count += 1;
        }
    }

    let components = deviant_components(triangles, &deviant, config);
    metrics.component_area = components.iter().map(|c| c.total_area).sum();

    let details = format!(
        "Deviant area {:.1}% ({} faces), {:.1}% in {} component(s), threshold {:.1}%",
        metrics.deviant_ratio() * 100.0,
        metrics.deviant_count,
        metrics.component_ratio() * 100.0,
        components.len(),
        config.area_ratio_threshold * 100.0
    );
    let status = if metrics.component_ratio() > config.area_ratio_threshold {
        IntegrityStatusDetails::compromised(details)
    } else {
        IntegrityStatusDetails::intact(details)
    };

    DeviationOutcome {
        deviations_deg,
        deviant,
        components,
        metrics,
        status,
    }
}
