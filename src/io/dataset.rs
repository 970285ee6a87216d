// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! On-disk capture dataset
//!
//! Layout of one dataset directory:
//!
//! ```text
//! <root>/<yyyy-mm-dd_HH-MM-SS>/
//!     camera_matrix.csv
//!     camera_transform.csv
//!     location.csv
//!     heading.csv
//!     other_details.csv
//!     mesh/<frame>.ply
//! ```

use super::csv_log::{
    camera_transform_fields, camera_transform_header, heading_fields, intrinsics_csv,
    location_fields, other_details_fields, CsvLog, HEADING_HEADER, LOCATION_HEADER,
    OTHER_DETAILS_HEADER,
};
use super::ply::PlyMesh;
use crate::capture::{extract_triangles, FrameSnapshot};
use crate::error::DatasetError;
use crate::geometry::{Size, Triangle};
use crate::integrity::IntegrityResults;
use ahash::AHashSet;
use chrono::Local;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

pub const CAMERA_MATRIX_FILE: &str = "camera_matrix.csv";
pub const CAMERA_TRANSFORM_FILE: &str = "camera_transform.csv";
pub const LOCATION_FILE: &str = "location.csv";
pub const HEADING_FILE: &str = "heading.csv";
pub const OTHER_DETAILS_FILE: &str = "other_details.csv";
pub const MESH_DIR: &str = "mesh";

/// Health of the encoder's output files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DatasetStatus {
    #[default]
    AllGood,
    DirectoryCreationError,
    FileCreationError,
}

#[derive(Debug)]
struct Logs {
    camera_transform: CsvLog,
    location: CsvLog,
    heading: CsvLog,
    other_details: CsvLog,
}

impl Logs {
    fn create(dir: &Path) -> io::Result<Self> {
        Ok(Self {
            camera_transform: CsvLog::create(
                dir.join(CAMERA_TRANSFORM_FILE),
                &camera_transform_header(),
            )?,
            location: CsvLog::create(dir.join(LOCATION_FILE), LOCATION_HEADER)?,
            heading: CsvLog::create(dir.join(HEADING_FILE), HEADING_HEADER)?,
            other_details: CsvLog::create(dir.join(OTHER_DETAILS_FILE), OTHER_DETAILS_HEADER)?,
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        self.camera_transform.flush()?;
        self.location.flush()?;
        self.heading.flush()?;
        self.other_details.flush()
    }
}

fn missing_logs() -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, "dataset logs were not created")
}

/// Writes captured frames and their analysis into a dataset directory
#[derive(Debug)]
pub struct DatasetEncoder {
    directory: PathBuf,
    logs: Option<Logs>,
    status: DatasetStatus,
    saved_frames: usize,
    captured: AHashSet<Uuid>,
}

impl DatasetEncoder {
    /// Start a dataset in a new timestamped directory under `root`
    pub fn new(root: impl AsRef<Path>) -> Self {
        let name = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        Self::in_directory(root.as_ref().join(name))
    }

    /// Start a dataset in `directory`, creating it if needed.
    ///
    /// Creation failures are recorded in [`DatasetEncoder::status`]; later
    /// writes then fail with I/O errors.
    pub fn in_directory(directory: impl Into<PathBuf>) -> Self {
        let directory = directory.into();
        let mut encoder = Self {
            directory,
            logs: None,
            status: DatasetStatus::AllGood,
            saved_frames: 0,
            captured: AHashSet::new(),
        };

        if let Err(error) = std::fs::create_dir_all(encoder.directory.join(MESH_DIR)) {
            warn!(directory = ?encoder.directory, %error, "Could not create dataset directory");
            encoder.status = DatasetStatus::DirectoryCreationError;
            return encoder;
        }

        match Logs::create(&encoder.directory) {
            Ok(logs) => encoder.logs = Some(logs),
            Err(error) => {
                warn!(directory = ?encoder.directory, %error, "Could not create dataset logs");
                encoder.status = DatasetStatus::FileCreationError;
            }
        }
        encoder
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn status(&self) -> DatasetStatus {
        self.status
    }

    pub fn saved_frames(&self) -> usize {
        self.saved_frames
    }

    pub fn contains(&self, frame_id: &Uuid) -> bool {
        self.captured.contains(frame_id)
    }

    pub fn mesh_path(&self, frame_id: &Uuid) -> PathBuf {
        self.directory
            .join(MESH_DIR)
            .join(format!("{}.ply", frame_id))
    }

    /// Persist one frame. With analysis results the mesh is written as green
    /// and red groups, otherwise as a single white mesh.
    pub fn add_frame(
        &mut self,
        snapshot: &FrameSnapshot,
        results: Option<&IntegrityResults>,
    ) -> Result<(), DatasetError> {
        let frame = snapshot.frame_id;
        if self.captured.contains(&frame) {
            return Err(DatasetError::DuplicateFrame(frame));
        }

        let outcome = self.write_frame(snapshot, results);
        if let Err(DatasetError::Io(error)) = &outcome {
            warn!(%frame, %error, "Failed to write frame");
            self.status = DatasetStatus::FileCreationError;
        }
        outcome?;

        self.captured.insert(frame);
        self.saved_frames += 1;
        info!(%frame, saved = self.saved_frames, "Frame saved to dataset");
        Ok(())
    }

    /// Mesh and camera matrix go first; log rows are only appended once
    /// every file of the frame is on disk, so a failed frame can be retried
    /// without duplicating rows.
    fn write_frame(
        &mut self,
        snapshot: &FrameSnapshot,
        results: Option<&IntegrityResults>,
    ) -> Result<(), DatasetError> {
        let frame = snapshot.frame_id;
        if self.logs.is_none() {
            return Err(missing_logs().into());
        }

        let mesh = match results {
            Some(results) => PlyMesh::from_results(results),
            None => {
                let triangles: Vec<Triangle> = extract_triangles(&snapshot.anchors)
                    .into_iter()
                    .map(|t| t.triangle)
                    .collect();
                PlyMesh::full(&triangles)
            }
        };
        match mesh.to_ascii() {
            Ok(content) => std::fs::write(self.mesh_path(&frame), content)?,
            Err(DatasetError::EmptyMesh) => {
                warn!(%frame, "Frame has no mesh geometry; skipping PLY");
            }
            Err(other) => return Err(other),
        }

        if let Some(intrinsics) = &snapshot.intrinsics {
            std::fs::write(self.directory.join(CAMERA_MATRIX_FILE), intrinsics_csv(intrinsics))?;
        }

        let logs = self.logs.as_mut().ok_or_else(missing_logs)?;
        if let Some(transform) = &snapshot.camera_transform {
            logs.camera_transform
                .append(&camera_transform_fields(snapshot.timestamp, &frame, transform))?;
        }
        if let Some(location) = &snapshot.location {
            logs.location.append(&location_fields(&frame, location))?;
        }
        if let Some(heading) = &snapshot.heading {
            logs.heading.append(&heading_fields(&frame, heading))?;
        }
        let original_size = snapshot
            .image_size
            .or_else(|| snapshot.label_image.as_ref().map(|l| l.size()))
            .unwrap_or(Size::new(0.0, 0.0));
        logs.other_details.append(&other_details_fields(
            snapshot.timestamp,
            &frame,
            snapshot.device_orientation,
            &original_size,
        ))?;
        logs.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_frame_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut encoder = DatasetEncoder::in_directory(dir.path().join("run"));
        assert_eq!(encoder.status(), DatasetStatus::AllGood);

        let snapshot = FrameSnapshot::new(1.0);
        encoder.add_frame(&snapshot, None).unwrap();
        let err = encoder.add_frame(&snapshot, None).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateFrame(id) if id == snapshot.frame_id));
        assert_eq!(encoder.saved_frames(), 1);
        assert!(encoder.contains(&snapshot.frame_id));
    }

    #[test]
    fn test_timestamped_directory() {
        let dir = tempfile::tempdir().unwrap();
        let encoder = DatasetEncoder::new(dir.path());
        let name = encoder.directory().file_name().unwrap().to_string_lossy().to_string();
        // yyyy-mm-dd_HH-MM-SS
        assert_eq!(name.len(), 19);
        assert_eq!(&name[10..11], "_");
        assert!(encoder.directory().join(MESH_DIR).is_dir());
    }

    #[test]
    fn test_failed_mesh_write_leaves_logs_untouched() {
        use crate::capture::{FaceBuffer, MeshAnchor, StridedBuffer};
        use nalgebra::Matrix4;

        let dir = tempfile::tempdir().unwrap();
        let mut encoder = DatasetEncoder::in_directory(dir.path().join("run"));
        let anchor = MeshAnchor::new(
            Matrix4::identity(),
            StridedBuffer::from_points(&[[0.0, 0.0, -1.0], [1.0, 0.0, -1.0], [0.0, 1.0, -1.0]]),
            FaceBuffer::from_u32(&[[0, 1, 2]]),
        );
        let snapshot = FrameSnapshot::new(2.0)
            .with_camera_transform(Matrix4::identity())
            .with_anchor(anchor);

        std::fs::remove_dir(encoder.directory().join(MESH_DIR)).unwrap();
        assert!(encoder.add_frame(&snapshot, None).is_err());
        assert!(!encoder.contains(&snapshot.frame_id));
        let rows = |encoder: &DatasetEncoder| {
            let logs = encoder.logs.as_ref().unwrap();
            (logs.camera_transform.rows(), logs.other_details.rows())
        };
        assert_eq!(rows(&encoder), (0, 0));

        std::fs::create_dir(encoder.directory().join(MESH_DIR)).unwrap();
        encoder.add_frame(&snapshot, None).unwrap();
        assert_eq!(rows(&encoder), (1, 1));
        assert!(encoder.mesh_path(&snapshot.frame_id).is_file());
    }

    #[test]
    fn test_unwritable_root_sets_status() {
        let file = tempfile::NamedTempFile::new().unwrap();
        // A regular file cannot hold a directory
        let mut encoder = DatasetEncoder::in_directory(file.path().join("run"));
        assert_eq!(encoder.status(), DatasetStatus::DirectoryCreationError);
        assert!(encoder.add_frame(&FrameSnapshot::new(0.0), None).is_err());
    }
}
