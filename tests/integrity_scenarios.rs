// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! End-to-end integrity analysis over synthetic walls

mod common;

use anyhow::Result;
use common::*;
use nalgebra::{Matrix4, Point3};
use surface_integrity::geometry::ComponentParams;
use surface_integrity::integrity::{
    IntegrityCalculator, IntegrityConfig, IntegrityStatus, TriangleColor,
};
use surface_integrity::{analyze, AnalysisError, MissingInput, SnapshotPublisher};

#[test]
fn test_flat_wall_is_intact() -> Result<()> {
    let results = analyze(&scene(flat_wall().build()))?;

    assert_eq!(results.triangle_count(), 200);
    assert_eq!(results.status, IntegrityStatus::Intact);
    assert!(results.plane.is_some());
    assert!(results.deviations_deg.iter().all(|d| *d < 0.01));
    assert!(results.colors.iter().all(|c| *c == TriangleColor::Normal));
    assert!(results.components.is_empty());
    assert!((results.metrics.total_area - 4.0).abs() < 1e-3);

    let mesh = results.mesh_status.as_ref().expect("plane was fitted");
    assert!(!mesh.is_compromised());
    // No detections in the snapshot
    assert!(results.bbox_status.is_none());
    assert!(results.bbox_variance_status.is_none());
    Ok(())
}

#[test]
fn test_isolated_tilted_triangle_is_noise() -> Result<()> {
    let anchor = flat_wall()
        .add_triangle([
            Point3::new(1.2, 0.0, WALL_Z),
            Point3::new(1.4, 0.0, WALL_Z),
            Point3::new(1.2, 0.2, WALL_Z + 0.1),
        ])
        .build();
    let results = analyze(&scene(anchor))?;

    assert_eq!(results.triangle_count(), 201);
    assert_eq!(results.metrics.deviant_count, 1);
    assert!(results.components.is_empty());
    assert_eq!(results.metrics.component_area, 0.0);
    assert_eq!(results.triangles_with_color(TriangleColor::Noise).count(), 1);
    assert_eq!(results.deviant_triangles().len(), 1);
    assert_eq!(results.normal_triangles().len(), 200);
    assert_eq!(results.status, IntegrityStatus::Intact);
    Ok(())
}

#[test]
fn test_erosion_removes_lone_tilted_corner() -> Result<()> {
    // A lift of QUAD / sqrt(2) turns the corner triangle 45° off the wall
    let snapshot = scene(wall_with_lifted_corner(QUAD / 2f32.sqrt()).build());
    let relaxed = |k_keep| IntegrityConfig {
        area_ratio_threshold: 0.005,
        components: ComponentParams {
            k_keep,
            min_faces: 1,
            ..ComponentParams::default()
        },
        ..IntegrityConfig::default()
    };

    let without_erosion = IntegrityCalculator::new(relaxed(0)).analyze(&snapshot)?;
    assert_eq!(without_erosion.metrics.deviant_count, 1);
    let tilted = without_erosion
        .deviations_deg
        .iter()
        .copied()
        .fold(0.0f32, f32::max);
    assert!((tilted - 45.0).abs() < 1.0, "corner tilt {}", tilted);
    assert_eq!(without_erosion.components.len(), 1);
    assert_eq!(without_erosion.triangles_with_color(TriangleColor::Deviant).count(), 1);
    assert_eq!(without_erosion.status, IntegrityStatus::Compromised);

    let eroded = IntegrityCalculator::new(relaxed(2)).analyze(&snapshot)?;
    assert_eq!(eroded.metrics.deviant_count, 1);
    assert!(eroded.components.is_empty());
    assert_eq!(eroded.metrics.component_area, 0.0);
    assert_eq!(eroded.triangles_with_color(TriangleColor::Noise).count(), 1);
    assert_eq!(eroded.status, IntegrityStatus::Intact);
    Ok(())
}

#[test]
fn test_collinear_sliver_in_box_keeps_wall_intact() -> Result<()> {
    let sliver = [
        Point3::new(0.05, -0.1, WALL_Z),
        Point3::new(0.1, -0.1, WALL_Z),
        Point3::new(0.15, -0.1, WALL_Z),
    ];
    let snapshot = scene(flat_wall().add_triangle(sliver).build())
        .with_detections(vec![detection(0.5, 0.5, 0.02, 0.02)]);
    let results = analyze(&snapshot)?;

    assert_eq!(results.triangle_count(), 201);
    assert_eq!(results.metrics.deviant_count, 0);
    assert_eq!(results.box_groups[0].faces.len(), 3);
    let spread = results.box_groups[0].normal_deviation.expect("box has oriented faces");
    assert!(spread < 1e-4, "spread {}", spread);
    assert!(!results.bbox_variance_status.as_ref().is_some_and(|s| s.is_compromised()));
    assert!(results.colors.iter().all(|c| *c == TriangleColor::Normal));
    assert_eq!(results.status, IntegrityStatus::Intact);
    Ok(())
}

#[test]
fn test_tilted_patch_compromises_mesh() -> Result<()> {
    let results = analyze(&scene(wall_with_tilted_block(20.0).build()))?;

    println!("{}", results.summary());
    println!(
        "  deviant ratio {:.4}, component ratio {:.4}",
        results.metrics.deviant_ratio(),
        results.metrics.component_ratio()
    );

    assert_eq!(results.triangle_count(), 200);
    assert_eq!(results.metrics.deviant_count, 18);

    // Erosion drops the two patch corners with a single patch neighbor
    assert_eq!(results.components.len(), 1);
    assert_eq!(results.components[0].face_count(), 16);
    assert_eq!(results.triangles_with_color(TriangleColor::Deviant).count(), 16);
    assert_eq!(results.triangles_with_color(TriangleColor::Noise).count(), 2);

    let deviant_ratio = results.metrics.deviant_ratio();
    let component_ratio = results.metrics.component_ratio();
    assert!((0.09..0.1).contains(&deviant_ratio), "deviant ratio {}", deviant_ratio);
    assert!((0.08..0.09).contains(&component_ratio), "component ratio {}", component_ratio);

    assert!(results.mesh_status.as_ref().is_some_and(|s| s.is_compromised()));
    assert_eq!(results.status, IntegrityStatus::Compromised);
    assert_eq!(results.combined_status(), results.status);
    Ok(())
}

#[test]
fn test_angle_threshold_is_configurable() -> Result<()> {
    let snapshot = scene(wall_with_tilted_block(5.0).build());

    let lenient = IntegrityCalculator::default().analyze(&snapshot)?;
    assert_eq!(lenient.metrics.deviant_count, 0);
    assert_eq!(lenient.status, IntegrityStatus::Intact);

    let strict = IntegrityCalculator::new(IntegrityConfig {
        angle_threshold_deg: 3.0,
        ..IntegrityConfig::default()
    })
    .analyze(&snapshot)?;
    assert_eq!(strict.metrics.deviant_count, 18);
    assert_eq!(strict.status, IntegrityStatus::Compromised);
    Ok(())
}

#[test]
fn test_uniformly_tilted_wall_follows_plane() -> Result<()> {
    let (x0, y0) = quad_origin(0, 0);
    let (sin, cos) = 30f32.to_radians().sin_cos();
    let anchor = MeshBuilder::new()
        .add_grid(x0, y0, 10, 10, |_, _| true, |p| {
            Point3::new(p.x, p.y * cos, p.z + p.y * sin)
        })
        .build();
    let results = analyze(&scene(anchor))?;

    assert_eq!(results.triangle_count(), 200);
    assert!(results.deviations_deg.iter().all(|d| *d < 0.1));
    assert_eq!(results.status, IntegrityStatus::Intact);
    Ok(())
}

#[test]
fn test_unlabeled_pixels_are_filtered() -> Result<()> {
    let snapshot = scene(flat_wall().build());
    let config = IntegrityConfig {
        target_classes: vec![2],
        ..IntegrityConfig::default()
    };
    let results = IntegrityCalculator::new(config).analyze(&snapshot)?;

    assert_eq!(results.triangle_count(), 0);
    assert_eq!(results.filter_stats.wrong_label, 200);
    assert_eq!(results.filter_stats.rejected(), 200);
    assert!(results.plane.is_none());
    assert!(results.mesh_status.is_none());
    assert_eq!(results.status, IntegrityStatus::Intact);
    Ok(())
}

#[test]
fn test_large_box_compromises_area_signal() -> Result<()> {
    // Columns 5..8 and rows 2..5 of the wall: 18 triangles, 0.36 m²
    let large = detection(0.5, 0.5, 0.06, 0.06);
    // Column 5, row 4: 2 triangles, 0.04 m²
    let small = detection(0.5, 0.5, 0.02, 0.02);

    let results = analyze(&scene(flat_wall().build()).with_detections(vec![small.clone()]))?;
    assert_eq!(results.box_groups.len(), 1);
    assert_eq!(results.box_groups[0].faces.len(), 2);
    assert!((results.box_groups[0].area - 0.04).abs() < 1e-3);
    assert!(!results.bbox_status.as_ref().is_some_and(|s| s.is_compromised()));
    assert_eq!(results.status, IntegrityStatus::Intact);

    let results = analyze(&scene(flat_wall().build()).with_detections(vec![small, large]))?;
    assert_eq!(results.box_groups.len(), 2);
    assert_eq!(results.box_groups[1].faces.len(), 18);
    assert!((results.box_groups[1].area - 0.36).abs() < 1e-3);
    assert!(results.bbox_status.as_ref().is_some_and(|s| s.is_compromised()));
    // Flat faces agree within every box
    assert!(!results
        .bbox_variance_status
        .as_ref()
        .is_some_and(|s| s.is_compromised()));
    assert_eq!(results.status, IntegrityStatus::Compromised);
    Ok(())
}

#[test]
fn test_box_over_rough_patch_compromises_variance() -> Result<()> {
    // Columns and rows 2..7 around the tilted patch: 32 flat and 18 tilted faces
    let around_patch = detection(0.44, 0.46, 0.10, 0.10);
    let snapshot = scene(wall_with_tilted_block(20.0).build()).with_detections(vec![around_patch]);
    let results = analyze(&snapshot)?;

    let group = &results.box_groups[0];
    assert_eq!(group.faces.len(), 50);
    let spread = group.normal_deviation.expect("box has faces");
    println!("Normal spread around the patch: {:.4}", spread);
    assert!((spread - 0.167).abs() < 0.01, "spread {}", spread);
    assert!(results
        .bbox_variance_status
        .as_ref()
        .is_some_and(|s| s.is_compromised()));
    Ok(())
}

#[test]
fn test_empty_detection_list_reports_intact_boxes() -> Result<()> {
    let results = analyze(&scene(flat_wall().build()).with_detections(Vec::new()))?;

    assert!(results.box_groups.is_empty());
    assert!(results.bbox_status.as_ref().is_some_and(|s| !s.is_compromised()));
    assert!(results
        .bbox_variance_status
        .as_ref()
        .is_some_and(|s| !s.is_compromised()));
    assert_eq!(results.status, IntegrityStatus::Intact);
    Ok(())
}

#[test]
fn test_missing_label_is_insufficient_data() {
    let snapshot = scene(flat_wall().build());
    let without_label = surface_integrity::FrameSnapshot {
        label_image: None,
        ..snapshot
    };

    let err = analyze(&without_label).unwrap_err();
    assert!(err.is_insufficient_data());
    assert_eq!(
        err,
        AnalysisError::InsufficientData(MissingInput::LabelImage)
    );
}

#[test]
fn test_camera_pose_moves_projection() -> Result<()> {
    // Moving the camera right shifts the wall left in the image
    let snapshot = scene(flat_wall().build())
        .with_camera_transform(Matrix4::new_translation(&nalgebra::Vector3::new(0.5, 0.0, 0.0)));
    let results = analyze(&snapshot)?;

    assert_eq!(results.triangle_count(), 200);
    let min_u = results.centroid_pixels.iter().map(|p| p.x).min().unwrap_or(0);
    assert!((345..=360).contains(&min_u), "min u {}", min_u);
    Ok(())
}

#[test]
fn test_latest_published_snapshot_is_analyzed() -> Result<()> {
    let publisher = SnapshotPublisher::new();
    let calculator = IntegrityCalculator::default();
    assert!(calculator.analyze_latest(&publisher).is_none());

    publisher.publish(scene(flat_wall().build()));
    publisher.publish(scene(wall_with_tilted_block(20.0).build()));

    let (snapshot, results) = calculator.analyze_latest(&publisher).expect("snapshot published");
    let results = results?;
    assert_eq!(results.frame_id, snapshot.frame_id);
    assert_eq!(results.status, IntegrityStatus::Compromised);
    Ok(())
}
