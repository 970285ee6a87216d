// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Correlating detector boxes with the filtered mesh

use super::config::IntegrityConfig;
use super::results::BoxGroup;
use super::status::IntegrityStatusDetails;
use crate::camera::PixelPoint;
use crate::capture::Detection;
use crate::geometry::{Plane, Size, Triangle};
use nalgebra::Vector3;

/// Group triangles by every detection box containing their projected
/// centroid. A triangle may fall in several boxes.
pub fn correlate_boxes(
    detections: &[Detection],
    triangles: &[Triangle],
    centroid_pixels: &[PixelPoint],
    label_size: &Size,
) -> Vec<BoxGroup> {
    let normalized: Vec<_> = centroid_pixels
        .iter()
        .map(|p| p.normalized(label_size))
        .collect();

    detections
        .iter()
        .enumerate()
        .map(|(index, detection)| {
            let faces: Vec<usize> = normalized
                .iter()
                .enumerate()
                .filter(|(_, p)| detection.bounding_box.contains(p))
                .map(|(i, _)| i)
                .collect();
            let area = faces.iter().map(|&i| triangles[i].area()).sum();
            BoxGroup {
                detection: index,
                label: detection.label.clone(),
                faces,
                area,
                normal_deviation: None,
            }
        })
        .collect()
}

/// Compromised when any box covers more surface than the area threshold
pub fn box_area_status(groups: &[BoxGroup], config: &IntegrityConfig) -> IntegrityStatusDetails {
    let largest = groups.iter().map(|g| g.area).fold(0.0f32, f32::max);
    let over: Vec<String> = groups
        .iter()
        .filter(|g| g.area > config.bbox_area_threshold)
        .map(|g| format!("{} #{} {:.3} m²", g.label, g.detection, g.area))
        .collect();

    if over.is_empty() {
        IntegrityStatusDetails::intact(format!(
            "{} box(es), largest {:.3} m² within {:.3} m²",
            groups.len(),
            largest,
            config.bbox_area_threshold
        ))
    } else {
        IntegrityStatusDetails::compromised(format!(
            "Boxes over {:.3} m²: {}",
            config.bbox_area_threshold,
            over.join(", ")
        ))
    }
}

/// Spread of unit normals around their mean: sqrt(mean |nᵢ - μ|²).
///
/// Normals are first flipped into the hemisphere of `reference`, so faces
/// with opposite winding still count as aligned. Returns the spread and each
/// normal's distance from the mean.
pub fn normal_spread(normals: &[Vector3<f32>], reference: &Vector3<f32>) -> Option<(f32, Vec<f32>)> {
    if normals.is_empty() {
        return None;
    }
    let oriented: Vec<Vector3<f32>> = normals
        .iter()
        .map(|n| if n.dot(reference) < 0.0 { -n } else { *n })
        .collect();
    let mean = oriented.iter().sum::<Vector3<f32>>() / oriented.len() as f32;
    let distances: Vec<f32> = oriented.iter().map(|n| (n - mean).norm()).collect();
    let variance = distances.iter().map(|d| d * d).sum::<f32>() / distances.len() as f32;
    Some((variance.sqrt(), distances))
}

/// Score normal spread inside each box and collect outlier faces.
///
/// Fills `normal_deviation` on each group holding at least one oriented
/// face. Zero normals from degenerate faces take no part in the spread.
/// Outliers are faces farther than `outlier_sigma` spreads from their box
/// mean.
pub fn box_variance_status(
    groups: &mut [BoxGroup],
    normals: &[Vector3<f32>],
    plane: Option<&Plane>,
    config: &IntegrityConfig,
) -> (IntegrityStatusDetails, Vec<usize>) {
    let mut outliers = Vec::new();
    let mut worst = 0.0f32;
    let mut over = Vec::new();

    for group in groups.iter_mut() {
        let oriented: Vec<usize> = group
            .faces
            .iter()
            .copied()
            .filter(|&i| normals[i].norm_squared() > 0.0)
            .collect();
        let Some(&first) = oriented.first() else {
            continue;
        };
        let reference = plane.map(|p| p.normal).unwrap_or(normals[first]);
        let box_normals: Vec<Vector3<f32>> = oriented.iter().map(|&i| normals[i]).collect();
        let Some((sigma, distances)) = normal_spread(&box_normals, &reference) else {
            continue;
        };

        group.normal_deviation = Some(sigma);
        worst = worst.max(sigma);
        if sigma > config.bbox_variance_threshold {
            over.push(format!("{} #{} σ={:.3}", group.label, group.detection, sigma));
        }
        outliers.extend(
            oriented
                .iter()
                .zip(&distances)
                .filter(|(_, &d)| d > config.outlier_sigma * sigma)
                .map(|(&face, _)| face),
        );
    }

    outliers.sort_unstable();
    outliers.dedup();

    let status = if over.is_empty() {
        IntegrityStatusDetails::intact(format!(
            "Largest normal spread {:.3} within {:.3}, {} outlier face(s)",
            worst,
            config.bbox_variance_threshold,
            outliers.len()
        ))
    } else {
        IntegrityStatusDetails::compromised(format!(
            "Normal spread over {:.3}: {}, {} outlier face(s)",
            config.bbox_variance_threshold,
            over.join(", "),
            outliers.len()
        ))
    };
    (status, outliers)
}
