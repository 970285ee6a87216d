// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Integrity analysis configuration

use crate::capture::MeshClassification;
use crate::geometry::ComponentParams;
use anyhow::{Context, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up by [`IntegrityConfig::load`]
pub const CONFIG_FILE: &str = "integrity.toml";

/// Prefix of environment variables that override file values
pub const ENV_PREFIX: &str = "SURFACE_INTEGRITY_";

/// Thresholds and filters for one analysis pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrityConfig {
    /// Segmentation class ids that mark the region of interest
    pub target_classes: Vec<u8>,
    /// Keep only faces with these mesh classifications when set
    pub mesh_classes: Option<Vec<MeshClassification>>,
    /// Face-to-plane angle above which a face is deviant
    pub angle_threshold_deg: f32,
    /// Fraction of surface area in deviant components that compromises the mesh
    pub area_ratio_threshold: f32,
    /// Area in square meters inside one detection box that compromises it
    pub bbox_area_threshold: f32,
    /// Normal spread inside detection boxes that compromises them
    pub bbox_variance_threshold: f32,
    /// Faces farther than this many standard deviations from the box mean
    /// normal are outliers
    pub outlier_sigma: f32,
    /// World up axis used to report the plane slope
    pub up_axis: Vector3<f32>,
    pub components: ComponentParams,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            target_classes: vec![1],
            mesh_classes: None,
            angle_threshold_deg: 7.5,
            area_ratio_threshold: 0.05,
            bbox_area_threshold: 0.1,
            bbox_variance_threshold: 0.1,
            outlier_sigma: 2.0,
            up_axis: Vector3::y(),
            components: ComponentParams::default(),
        }
    }
}

impl IntegrityConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: IntegrityConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `integrity.toml` from the working directory if present, then
    /// apply environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override fields from `SURFACE_INTEGRITY_*` variables resolved by `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        fn parsed<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
        where
            T::Err: std::error::Error + Send + Sync + 'static,
        {
            value
                .trim()
                .parse()
                .with_context(|| format!("Invalid value for {}{}: {:?}", ENV_PREFIX, name, value))
        }

        if let Some(v) = var("ANGLE_THRESHOLD_DEG") {
            self.angle_threshold_deg = parsed("ANGLE_THRESHOLD_DEG", &v)?;
        }
        if let Some(v) = var("AREA_RATIO_THRESHOLD") {
            self.area_ratio_threshold = parsed("AREA_RATIO_THRESHOLD", &v)?;
        }
        if let Some(v) = var("BBOX_AREA_THRESHOLD") {
            self.bbox_area_threshold = parsed("BBOX_AREA_THRESHOLD", &v)?;
        }
        if let Some(v) = var("BBOX_VARIANCE_THRESHOLD") {
            self.bbox_variance_threshold = parsed("BBOX_VARIANCE_THRESHOLD", &v)?;
        }
        if let Some(v) = var("K_KEEP") {
            self.components.k_keep = parsed("K_KEEP", &v)?;
        }
        if let Some(v) = var("MIN_FACES") {
            self.components.min_faces = parsed("MIN_FACES", &v)?;
        }
        if let Some(v) = var("TARGET_CLASSES") {
            self.target_classes = v
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| parsed("TARGET_CLASSES", s))
                .collect::<Result<_>>()?;
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn is_target_class(&self, class: u8) -> bool {
        self.target_classes.contains(&class)
    }

    pub fn accepts_mesh_class(&self, class: MeshClassification) -> bool {
        match &self.mesh_classes {
            Some(classes) => classes.contains(&class),
            None => true,
        }
    }
}
