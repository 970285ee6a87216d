// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Snapshot files for offline analysis
//!
//! A snapshot file is a JSON-encoded [`FrameSnapshot`]. Instead of an inline
//! label image it may name a grayscale PNG mask through `label_mask`,
//! resolved relative to the JSON file.

use crate::capture::{FrameSnapshot, LabelImage};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(flatten)]
    pub snapshot: FrameSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_mask: Option<PathBuf>,
}

/// Read a snapshot file, loading a referenced PNG mask when the snapshot has
/// no inline label image
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<FrameSnapshot> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {:?}", path))?;
    let file: SnapshotFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot: {:?}", path))?;

    let mut snapshot = file.snapshot;
    if snapshot.label_image.is_none() {
        if let Some(mask) = file.label_mask {
            let mask_path = match path.parent() {
                Some(dir) if mask.is_relative() => dir.join(mask),
                _ => mask,
            };
            debug!(mask = ?mask_path, "Loading label mask");
            let image = image::open(&mask_path)
                .with_context(|| format!("Failed to load label mask: {:?}", mask_path))?;
            snapshot.label_image = Some(LabelImage::from_gray_image(&image.to_luma8()));
        }
    }
    Ok(snapshot)
}

/// Write a snapshot with its label image inline
pub fn save_snapshot(path: impl AsRef<Path>, snapshot: &FrameSnapshot) -> Result<()> {
    let file = SnapshotFile {
        snapshot: snapshot.clone(),
        label_mask: None,
    };
    let content = serde_json::to_string(&file).context("Failed to serialize snapshot")?;
    std::fs::write(path.as_ref(), content)
        .with_context(|| format!("Failed to write snapshot: {:?}", path.as_ref()))?;
    Ok(())
}

/// Expand files and directories into the `.json` snapshot files they hold,
/// sorted for a stable processing order
pub fn find_snapshot_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = paths
        .iter()
        .flat_map(|root| {
            WalkDir::new(root)
                .follow_links(true)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        })
        .collect();
    files.sort();
    files.dedup();
    files
}
