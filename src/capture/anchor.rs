// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh anchors and world-space triangle extraction

use super::buffer::{FaceBuffer, StridedBuffer};
use crate::error::BufferError;
use crate::geometry::Triangle;
use nalgebra::{Matrix4, Point3};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Semantic class the capture device assigns to each mesh face
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum MeshClassification {
    #[default]
    None = 0,
    Wall = 1,
    Floor = 2,
    Ceiling = 3,
    Table = 4,
    Seat = 5,
    Window = 6,
    Door = 7,
}

impl MeshClassification {
    /// Decode a raw classification byte; unknown values map to `None`
    pub fn from_raw(value: u8) -> Self {
        match value {
            1 => Self::Wall,
            2 => Self::Floor,
            3 => Self::Ceiling,
            4 => Self::Table,
            5 => Self::Seat,
            6 => Self::Window,
            7 => Self::Door,
            _ => Self::None,
        }
    }

    pub fn raw(self) -> u8 {
        self as u8
    }
}

/// One reconstructed mesh chunk with its own vertex index space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshAnchor {
    pub id: Uuid,
    /// Local-to-world transform
    pub transform: Matrix4<f32>,
    pub vertices: StridedBuffer,
    pub faces: FaceBuffer,
    /// One classification byte per face, when the device provides them
    #[serde(default)]
    pub classifications: Option<StridedBuffer>,
}

impl MeshAnchor {
    pub fn new(transform: Matrix4<f32>, vertices: StridedBuffer, faces: FaceBuffer) -> Self {
        Self {
            id: Uuid::new_v4(),
            transform,
            vertices,
            faces,
            classifications: None,
        }
    }

    pub fn with_classifications(mut self, classifications: StridedBuffer) -> Self {
        self.classifications = Some(classifications);
        self
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// World-space position of vertex `index`
    pub fn world_vertex(&self, index: u32) -> Result<Point3<f32>, BufferError> {
        let [x, y, z] = self.vertices.read_f32x3(index as usize)?;
        Ok(self.transform.transform_point(&Point3::new(x, y, z)))
    }

    pub fn classification(&self, face: usize) -> Result<MeshClassification, BufferError> {
        match &self.classifications {
            Some(buffer) => buffer.read_u8(face).map(MeshClassification::from_raw),
            None => Ok(MeshClassification::None),
        }
    }

    /// World-space triangle for face `face` and its local vertex indices
    pub fn triangle(&self, face: usize) -> Result<(Triangle, [u32; 3]), BufferError> {
        let indices = self.faces.read_triangle_indices(face)?;
        let v0 = self.world_vertex(indices[0])?;
        let v1 = self.world_vertex(indices[1])?;
        let v2 = self.world_vertex(indices[2])?;
        Ok((Triangle::new(v0, v1, v2), indices))
    }
}

/// Triangle pulled out of an anchor, remembering where it came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTriangle {
    pub triangle: Triangle,
    pub classification: MeshClassification,
    /// Position of the source anchor in the snapshot
    pub anchor: usize,
    /// Anchor-local vertex indices
    pub indices: [u32; 3],
}

/// Extract every readable face of every anchor in world space.
///
/// Faces with out-of-range indices or truncated buffers are skipped.
pub fn extract_triangles(anchors: &[MeshAnchor]) -> Vec<ExtractedTriangle> {
    let mut out = Vec::new();
    let mut skipped = 0usize;

    for (anchor_index, anchor) in anchors.iter().enumerate() {
        for face in 0..anchor.face_count() {
            let extracted = anchor.triangle(face).and_then(|(triangle, indices)| {
                Ok(ExtractedTriangle {
                    triangle,
                    classification: anchor.classification(face)?,
                    anchor: anchor_index,
                    indices,
                })
            });
            match extracted {
                Ok(t) => out.push(t),
                Err(_) => skipped += 1,
            }
        }
    }

    if skipped > 0 {
        debug!(skipped, extracted = out.len(), "Skipped unreadable mesh faces");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn quad_anchor(transform: Matrix4<f32>) -> MeshAnchor {
        MeshAnchor::new(
            transform,
            StridedBuffer::from_points(&[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0],
            ]),
            FaceBuffer::from_u32(&[[0, 1, 2], [0, 2, 3]]),
        )
    }

    #[test]
    fn test_classification_from_raw() {
        assert_eq!(MeshClassification::from_raw(2), MeshClassification::Floor);
        assert_eq!(MeshClassification::from_raw(7), MeshClassification::Door);
        assert_eq!(MeshClassification::from_raw(42), MeshClassification::None);
        assert_eq!(MeshClassification::Seat.raw(), 5);
    }

    #[test]
    fn test_extraction_applies_transform() {
        let anchor = quad_anchor(Matrix4::new_translation(&Vector3::new(0.0, 2.0, 0.0)));
        let triangles = extract_triangles(&[anchor]);
        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[0].triangle.v0, Point3::new(0.0, 2.0, 0.0));
        assert_eq!(triangles[1].indices, [0, 2, 3]);
        assert_eq!(triangles[1].classification, MeshClassification::None);
    }

    #[test]
    fn test_bad_faces_are_skipped() {
        let mut anchor = quad_anchor(Matrix4::identity());
        anchor.faces = FaceBuffer::from_u32(&[[0, 1, 2], [0, 2, 9]]);
        anchor.classifications = Some(StridedBuffer::from_bytes(&[2, 2]));
        let triangles = extract_triangles(&[anchor]);
        assert_eq!(triangles.len(), 1);
        assert_eq!(triangles[0].classification, MeshClassification::Floor);
    }

    #[test]
    fn test_inflated_face_count() {
        let mut anchor = quad_anchor(Matrix4::identity());
        anchor.faces.count = usize::MAX / 4;
        assert_eq!(anchor.face_count(), 2);
        assert_eq!(extract_triangles(&[anchor]).len(), 2);
    }

    #[test]
    fn test_empty_mesh() {
        let anchor = MeshAnchor::new(
            Matrix4::identity(),
            StridedBuffer::default(),
            FaceBuffer::default(),
        );
        assert!(extract_triangles(&[anchor]).is_empty());
        assert!(extract_triangles(&[]).is_empty());
    }
}
