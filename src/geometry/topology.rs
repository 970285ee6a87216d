// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Face adjacency for triangle soups grouped into parts
//!
//! Two faces are neighbors when they share an edge that no other face uses.
//! Boundary edges (one face) and non-manifold edges (three or more faces)
//! contribute nothing. Vertex indices are only compared within a part, so
//! faces from different anchors never connect.

use super::Triangle;
use ahash::AHashMap;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Triangles sharing one vertex index space
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshPart {
    pub positions: Vec<Point3<f32>>,
    /// Triangle corner indices into `positions`; `None` means consecutive
    /// triples of positions form the triangles
    pub indices: Option<Vec<[u32; 3]>>,
}

impl MeshPart {
    pub fn indexed(positions: Vec<Point3<f32>>, indices: Vec<[u32; 3]>) -> Self {
        Self {
            positions,
            indices: Some(indices),
        }
    }

    pub fn unindexed(positions: Vec<Point3<f32>>) -> Self {
        Self {
            positions,
            indices: None,
        }
    }

    /// Build an indexed part from triangles that carry their source vertex
    /// indices. Indices are compacted to a dense range; the first position
    /// seen for an index wins.
    pub fn from_indexed_triangles<'a, I>(triangles: I) -> Self
    where
        I: IntoIterator<Item = (&'a Triangle, [u32; 3])>,
    {
        let mut remap: AHashMap<u32, u32> = AHashMap::new();
        let mut positions = Vec::new();
        let mut indices = Vec::new();

        for (triangle, source) in triangles {
            let corners = triangle.vertices();
            let mut face = [0u32; 3];
            for (slot, (&index, corner)) in face.iter_mut().zip(source.iter().zip(corners)) {
                *slot = *remap.entry(index).or_insert_with(|| {
                    positions.push(corner);
                    (positions.len() - 1) as u32
                });
            }
            indices.push(face);
        }

        Self::indexed(positions, indices)
    }

    pub fn face_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len(),
            None => self.positions.len() / 3,
        }
    }

    /// Corner indices of each face; out-of-range faces are dropped
    fn faces(&self) -> Vec<[u32; 3]> {
        let count = self.positions.len() as u32;
        match &self.indices {
            Some(indices) => indices
                .iter()
                .copied()
                .filter(|face| face.iter().all(|&i| i < count))
                .collect(),
            None => (0..count / 3)
                .map(|t| [3 * t, 3 * t + 1, 3 * t + 2])
                .collect(),
        }
    }
}

/// Read-only adjacency graph over faces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshTopology {
    pub face_count: usize,
    /// Sorted neighbor face indices per face
    pub neighbors: Vec<Vec<usize>>,
    /// Per-face area in square meters
    pub areas: Vec<f32>,
}

impl MeshTopology {
    pub fn total_area(&self) -> f32 {
        self.areas.iter().sum()
    }

    /// Number of neighbors of `face` that are set in `active`
    pub fn active_neighbor_count(&self, face: usize, active: &[bool]) -> usize {
        self.neighbors[face]
            .iter()
            .filter(|&&n| active.get(n).copied().unwrap_or(false))
            .count()
    }
}

/// Build face adjacency across all parts.
///
/// Faces are numbered in part order, then in face order within each part.
pub fn build_topology(parts: &[MeshPart]) -> MeshTopology {
    let mut edge_map: AHashMap<(usize, u32, u32), Vec<usize>> = AHashMap::new();
    let mut areas = Vec::new();

    for (part_index, part) in parts.iter().enumerate() {
        for [i0, i1, i2] in part.faces() {
            let face = areas.len();
            let triangle = Triangle::new(
                part.positions[i0 as usize],
                part.positions[i1 as usize],
                part.positions[i2 as usize],
            );
            areas.push(triangle.area());

            for (a, b) in [(i0, i1), (i1, i2), (i2, i0)] {
                if a == b {
                    continue;
                }
                let key = (part_index, a.min(b), a.max(b));
                edge_map.entry(key).or_default().push(face);
            }
        }
    }

    let face_count = areas.len();
    let mut neighbors = vec![Vec::new(); face_count];
    for faces in edge_map.values() {
        if let [a, b] = faces[..] {
            if a != b {
                neighbors[a].push(b);
                neighbors[b].push(a);
            }
        }
    }
    for list in &mut neighbors {
        list.sort_unstable();
        list.dedup();
    }

    MeshTopology {
        face_count,
        neighbors,
        areas,
    }
}
