// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! ASCII PLY export of analyzed meshes
//!
//! Each group carries one color applied to all of its faces. Face indices
//! are rebased onto the group's offset in the shared vertex list.

use crate::error::DatasetError;
use crate::geometry::Triangle;
use crate::integrity::IntegrityResults;
use anyhow::{bail, Context, Result};
use nalgebra::Point3;
use std::fmt::Write as _;
use std::path::Path;

pub const WHITE: [u8; 3] = [255, 255, 255];
pub const GREEN: [u8; 3] = [0, 255, 0];
pub const RED: [u8; 3] = [255, 0, 0];

/// Triangles sharing one face color
#[derive(Debug, Clone, PartialEq)]
pub struct PlyGroup {
    pub positions: Vec<Point3<f32>>,
    pub faces: Vec<[u32; 3]>,
    pub color: [u8; 3],
}

impl PlyGroup {
    pub fn from_triangles<'a>(triangles: impl IntoIterator<Item = &'a Triangle>, color: [u8; 3]) -> Self {
        let mut positions = Vec::new();
        let mut faces = Vec::new();
        for t in triangles {
            let base = positions.len() as u32;
            positions.extend(t.vertices());
            faces.push([base, base + 1, base + 2]);
        }
        Self {
            positions,
            faces,
            color,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// Colored mesh ready to be written as PLY
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlyMesh {
    pub groups: Vec<PlyGroup>,
}

impl PlyMesh {
    /// Green for triangles within the angle threshold, red for deviant ones
    pub fn from_results(results: &IntegrityResults) -> Self {
        let normal = results.normal_triangles();
        let deviant = results.deviant_triangles();
        Self {
            groups: vec![
                PlyGroup::from_triangles(&normal, GREEN),
                PlyGroup::from_triangles(&deviant, RED),
            ],
        }
    }

    /// Every triangle in white
    pub fn full(triangles: &[Triangle]) -> Self {
        Self {
            groups: vec![PlyGroup::from_triangles(triangles, WHITE)],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.groups.iter().map(|g| g.positions.len()).sum()
    }

    pub fn face_count(&self) -> usize {
        self.groups.iter().map(|g| g.faces.len()).sum()
    }

    /// Render the PLY document
    pub fn to_ascii(&self) -> Result<String, DatasetError> {
        if self.face_count() == 0 {
            return Err(DatasetError::EmptyMesh);
        }

        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = write!(
            out,
            "ply\nformat ascii 1.0\ncomment generated by surface-integrity\n\
             element vertex {}\n\
             property float x\nproperty float y\nproperty float z\n\
             element face {}\n\
             property list uchar int vertex_indices\n\
             property uchar red\nproperty uchar green\nproperty uchar blue\n\
             end_header\n",
            self.vertex_count(),
            self.face_count()
        );

        for p in self.groups.iter().flat_map(|g| &g.positions) {
            let _ = writeln!(out, "{} {} {}", p.x, p.y, p.z);
        }

        let mut base = 0u32;
        for group in &self.groups {
            let [r, g, b] = group.color;
            for [i0, i1, i2] in &group.faces {
                let _ = writeln!(out, "3 {} {} {} {} {} {}", i0 + base, i1 + base, i2 + base, r, g, b);
            }
            base += group.positions.len() as u32;
        }

        Ok(out)
    }

    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = self.to_ascii()?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write PLY file: {:?}", path.as_ref()))?;
        Ok(())
    }
}

/// Flat view of an ASCII PLY document with per-face colors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlyDocument {
    pub positions: Vec<Point3<f32>>,
    pub faces: Vec<[u32; 3]>,
    pub colors: Vec<[u8; 3]>,
}

impl PlyDocument {
    /// Parse a document in the layout written by [`PlyMesh::to_ascii`]
    pub fn parse(content: &str) -> Result<Self> {
        let mut lines = content.lines();
        if lines.next() != Some("ply") {
            bail!("Missing ply magic");
        }

        let mut vertex_count = 0usize;
        let mut face_count = 0usize;
        for line in lines.by_ref() {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some("element"), Some("vertex"), Some(n)) => vertex_count = n.parse()?,
                (Some("element"), Some("face"), Some(n)) => face_count = n.parse()?,
                (Some("end_header"), _, _) => break,
                _ => {}
            }
        }

        let mut doc = Self::default();
        for _ in 0..vertex_count {
            let line = lines.next().context("Truncated vertex list")?;
            let coords: Vec<f32> = line
                .split_whitespace()
                .map(str::parse)
                .collect::<std::result::Result<_, _>>()?;
            if coords.len() != 3 {
                bail!("Bad vertex line: {:?}", line);
            }
            doc.positions.push(Point3::new(coords[0], coords[1], coords[2]));
        }

        for _ in 0..face_count {
            let line = lines.next().context("Truncated face list")?;
            let values: Vec<u32> = line
                .split_whitespace()
                .map(str::parse)
                .collect::<std::result::Result<_, _>>()?;
            if values.len() != 7 || values[0] != 3 {
                bail!("Bad face line: {:?}", line);
            }
            if values[1..4].iter().any(|&i| i as usize >= vertex_count) {
                bail!("Face index out of range: {:?}", line);
            }
            doc.faces.push([values[1], values[2], values[3]]);
            doc.colors.push([values[4] as u8, values[5] as u8, values[6] as u8]);
        }

        Ok(doc)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read PLY file: {:?}", path.as_ref()))?;
        Self::parse(&content)
    }

    /// Number of faces drawn with `color`
    pub fn count_color(&self, color: [u8; 3]) -> usize {
        self.colors.iter().filter(|&&c| c == color).count()
    }
}
