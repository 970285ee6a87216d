// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - triangles, plane fitting and face connectivity

mod components;
mod plane;
mod rect;
mod topology;
mod triangle;

pub use components::{
    connected_components, connected_components_with_activity, morphology, Component,
    ComponentParams,
};
pub use plane::{fit_plane_pca, Plane};
pub use rect::{Rect, Size};
pub use topology::{build_topology, MeshPart, MeshTopology};
pub use triangle::Triangle;
