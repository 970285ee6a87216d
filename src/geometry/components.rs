// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Connected regions of faces after a morphological clean-up
//!
//! An erosion pass drops faces with too few active neighbors, which removes
//! isolated slivers and thin strands. An optional dilation pass grows the
//! survivors back by one ring. The remaining active faces are grouped by
//! adjacency and small groups are discarded.

use super::MeshTopology;
use serde::{Deserialize, Serialize};

/// Tuning for [`connected_components`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentParams {
    /// Erosion keeps a face only with at least this many active neighbors; 0 disables
    pub k_keep: usize,
    /// Dilation revives a face with at least this many active neighbors; 0 disables
    pub k_dilate: usize,
    pub min_faces: usize,
    /// Minimum component area in square meters
    pub min_area: f32,
}

impl Default for ComponentParams {
    fn default() -> Self {
        Self {
            k_keep: 2,
            k_dilate: 0,
            min_faces: 6,
            min_area: 0.001,
        }
    }
}

impl ComponentParams {
    /// Parameters that keep every active face in some component
    pub fn unfiltered() -> Self {
        Self {
            k_keep: 0,
            k_dilate: 0,
            min_faces: 0,
            min_area: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Face indices in ascending order
    pub face_indices: Vec<usize>,
    pub total_area: f32,
}

impl Component {
    pub fn face_count(&self) -> usize {
        self.face_indices.len()
    }
}

/// Apply erosion then dilation to an activity mask.
///
/// Each pass counts neighbors against the state before that pass.
pub fn morphology(topology: &MeshTopology, initial: &[bool], params: &ComponentParams) -> Vec<bool> {
    let mut active: Vec<bool> = (0..topology.face_count)
        .map(|i| initial.get(i).copied().unwrap_or(false))
        .collect();

    if params.k_keep > 0 {
        let kept: Vec<bool> = (0..topology.face_count)
            .map(|i| active[i] && topology.active_neighbor_count(i, &active) >= params.k_keep)
            .collect();
        active = kept;
    }

    if params.k_dilate > 0 {
        let dilated: Vec<bool> = (0..topology.face_count)
            .map(|i| active[i] || topology.active_neighbor_count(i, &active) >= params.k_dilate)
            .collect();
        active = dilated;
    }

    active
}

/// Components of a topology where every face starts active
pub fn connected_components(topology: &MeshTopology, params: &ComponentParams) -> Vec<Component> {
    let initial = vec![true; topology.face_count];
    connected_components_with_activity(topology, &initial, params)
}

/// Components over the faces marked in `initial`, after morphology and the
/// size filters
pub fn connected_components_with_activity(
    topology: &MeshTopology,
    initial: &[bool],
    params: &ComponentParams,
) -> Vec<Component> {
    let active = morphology(topology, initial, params);
    let mut visited = vec![false; topology.face_count];
    let mut components = Vec::new();

    for seed in 0..topology.face_count {
        if !active[seed] || visited[seed] {
            continue;
        }

        let mut stack = vec![seed];
        visited[seed] = true;
        let mut faces = Vec::new();
        let mut area = 0.0f32;

        while let Some(face) = stack.pop() {
            faces.push(face);
            area += topology.areas[face];
            for &next in &topology.neighbors[face] {
                if active[next] && !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }

        if faces.len() >= params.min_faces && area >= params.min_area {
            faces.sort_unstable();
            components.push(Component {
                face_indices: faces,
                total_area: area,
            });
        }
    }

    components
}
