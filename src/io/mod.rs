// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - snapshot files, PLY meshes, CSV logs and datasets

pub mod csv_log;
pub mod dataset;
pub mod ply;
pub mod snapshot;

pub use csv_log::CsvLog;
pub use dataset::{DatasetEncoder, DatasetStatus};
pub use ply::{PlyDocument, PlyGroup, PlyMesh};
pub use snapshot::{find_snapshot_files, load_snapshot, save_snapshot, SnapshotFile};
