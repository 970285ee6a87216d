// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Append-only CSV logs for captured frame metadata
//!
//! Fields are separated by `", "` and every row starts with the capture
//! timestamp and the frame id.

use crate::camera::DeviceOrientation;
use crate::capture::{CameraIntrinsics, HeadingFix, LocationFix};
use crate::geometry::Size;
use nalgebra::Matrix4;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const LOCATION_HEADER: &str = "timestamp, frame, latitude, longitude";
pub const HEADING_HEADER: &str = "timestamp, frame, magnetic_heading, true_heading";
pub const OTHER_DETAILS_HEADER: &str =
    "timestamp, frame, deviceOrientation, originalWidth, originalHeight";

/// Header of the camera transform log: 16 row-major matrix entries
pub fn camera_transform_header() -> String {
    let mut columns = vec!["timestamp".to_string(), "frame".to_string()];
    for row in 0..4 {
        for col in 0..4 {
            columns.push(format!("m{}{}", row, col));
        }
    }
    columns.join(", ")
}

/// CSV file opened with its header written
#[derive(Debug)]
pub struct CsvLog {
    path: PathBuf,
    writer: BufWriter<File>,
    rows: usize,
}

impl CsvLog {
    /// Create or truncate `path` and write `header`
    pub fn create(path: impl AsRef<Path>, header: &str) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut writer = BufWriter::new(File::create(&path)?);
        writeln!(writer, "{}", header)?;
        Ok(Self {
            path,
            writer,
            rows: 0,
        })
    }

    pub fn append<S: AsRef<str>>(&mut self, fields: &[S]) -> io::Result<()> {
        let line = fields
            .iter()
            .map(|f| f.as_ref())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(self.writer, "{}", line)?;
        self.rows += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn camera_transform_fields(timestamp: f64, frame: &Uuid, transform: &Matrix4<f32>) -> Vec<String> {
    let mut fields = vec![timestamp.to_string(), frame.to_string()];
    for row in 0..4 {
        for col in 0..4 {
            fields.push(transform[(row, col)].to_string());
        }
    }
    fields
}

pub fn location_fields(frame: &Uuid, location: &LocationFix) -> Vec<String> {
    vec![
        location.timestamp.to_string(),
        frame.to_string(),
        location.latitude.to_string(),
        location.longitude.to_string(),
    ]
}

pub fn heading_fields(frame: &Uuid, heading: &HeadingFix) -> Vec<String> {
    vec![
        heading.timestamp.to_string(),
        frame.to_string(),
        heading.magnetic_heading.to_string(),
        heading.true_heading.to_string(),
    ]
}

pub fn other_details_fields(
    timestamp: f64,
    frame: &Uuid,
    orientation: DeviceOrientation,
    original_size: &Size,
) -> Vec<String> {
    vec![
        timestamp.to_string(),
        frame.to_string(),
        orientation.raw().to_string(),
        original_size.width.to_string(),
        original_size.height.to_string(),
    ]
}

/// Intrinsics as three matrix rows
pub fn intrinsics_csv(intrinsics: &CameraIntrinsics) -> String {
    let k = intrinsics.matrix();
    (0..3)
        .map(|row| format!("{}, {}, {}", k[(row, 0)], k[(row, 1)], k[(row, 2)]))
        .collect::<Vec<_>>()
        .join("\n")
}
