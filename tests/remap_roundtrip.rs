// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Detector box remapping across orientations and crops

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use surface_integrity::camera::{BoxOrigin, DetectionRemapper, DeviceOrientation, ImageOrientation};
use surface_integrity::capture::Detection;
use surface_integrity::geometry::{Rect, Size};

fn random_box(rng: &mut StdRng) -> Rect {
    let x = rng.gen_range(0.0..0.8);
    let y = rng.gen_range(0.0..0.8);
    Rect::new(x, y, rng.gen_range(0.01..0.2), rng.gen_range(0.01..0.2))
}

#[test]
fn test_every_orientation_round_trips() {
    let mut rng = StdRng::seed_from_u64(42);
    let sizes = [
        (Size::new(1920.0, 1440.0), Size::new(640.0, 640.0)),
        (Size::new(1440.0, 1920.0), Size::new(640.0, 640.0)),
        (Size::new(1280.0, 720.0), Size::new(416.0, 320.0)),
    ];

    for (original, model) in sizes {
        for orientation in ImageOrientation::ALL {
            for origin in [BoxOrigin::TopLeft, BoxOrigin::BottomLeft] {
                let remapper = DetectionRemapper::new(original, model, orientation, origin);
                for _ in 0..10 {
                    let rect = random_box(&mut rng);
                    let back = remapper.to_original(&remapper.to_detector(&rect));
                    assert!(
                        back.approx_eq(&rect, 1e-4),
                        "{:?} {:?} {:?}: {:?} -> {:?}",
                        orientation,
                        origin,
                        original,
                        rect,
                        back
                    );
                }
            }
        }
    }
}

#[test]
fn test_wide_frame_is_center_cropped() {
    // 1920×1440 scaled by 640/1440 overhangs 640 px by 213 px, split evenly
    let remapper = DetectionRemapper::new(
        Size::new(1920.0, 1440.0),
        Size::new(640.0, 640.0),
        ImageOrientation::Up,
        BoxOrigin::TopLeft,
    );
    let detector = remapper.to_detector(&Rect::new(0.5, 0.5, 0.1, 0.1));
    assert!(detector.approx_eq(&Rect::new(0.5, 0.5, 0.1333, 0.1), 1e-3), "{:?}", detector);

    let bottom_left = DetectionRemapper {
        origin: BoxOrigin::BottomLeft,
        ..remapper
    };
    let flipped = bottom_left.to_detector(&Rect::new(0.5, 0.5, 0.1, 0.1));
    assert!(flipped.approx_eq(&Rect::new(0.5, 0.4, 0.1333, 0.1), 1e-3), "{:?}", flipped);
}

#[test]
fn test_portrait_capture_boxes_land_upright() {
    let orientation = DeviceOrientation::Portrait.back_camera_image_orientation();
    assert_eq!(orientation, ImageOrientation::Right);

    let remapper = DetectionRemapper::new(
        Size::new(640.0, 640.0),
        Size::new(640.0, 640.0),
        orientation,
        BoxOrigin::TopLeft,
    );
    // Upper-left corner of the sensor frame ends up in the upper-right of the
    // upright image
    let detection = Detection::new(Rect::new(0.0, 0.0, 0.2, 0.1), 0.8, "spall");
    let remapped = remapper.remap_detections(&[detection]);
    assert_eq!(remapped.len(), 1);
    assert_eq!(remapped[0].label, "spall");

    let rect = remapped[0].bounding_box;
    assert!((rect.width - 0.1).abs() < 1e-4 && (rect.height - 0.2).abs() < 1e-4);
    assert!(rect.max_x() > 0.99 || rect.min_x() < 0.01);
}
