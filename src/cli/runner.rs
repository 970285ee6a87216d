// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Batch analysis of snapshot files

use crate::integrity::{IntegrityCalculator, IntegrityResults, IntegrityStatus};
use crate::io::load_snapshot;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Outcome of analyzing one snapshot file
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub path: PathBuf,
    pub duration: Duration,
    /// Error text for unreadable files or insufficient data
    pub result: std::result::Result<IntegrityResults, String>,
}

impl AnalysisOutcome {
    pub fn status(&self) -> Option<IntegrityStatus> {
        self.result.as_ref().ok().map(|r| r.status)
    }
}

/// Counts over a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub intact: usize,
    pub compromised: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[AnalysisOutcome]) -> Self {
        let mut summary = Self {
            total: outcomes.len(),
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome.status() {
                Some(IntegrityStatus::Intact) => summary.intact += 1,
                Some(IntegrityStatus::Compromised) => summary.compromised += 1,
                None => summary.failed += 1,
            }
        }
        summary
    }
}

/// Runs the calculator over snapshot files
pub struct Runner {
    calculator: IntegrityCalculator,
    show_progress: bool,
}

impl Runner {
    pub fn new(calculator: IntegrityCalculator) -> Self {
        Self {
            calculator,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Load and analyze one snapshot file
    pub fn run_file(&self, path: &Path) -> Result<IntegrityResults> {
        let snapshot = load_snapshot(path)?;
        self.calculator
            .analyze(&snapshot)
            .with_context(|| format!("Analysis failed for {:?}", path))
    }

    /// Analyze files in parallel; each file gets its own synchronous pass
    pub fn run_batch(&self, files: &[PathBuf]) -> Vec<AnalysisOutcome> {
        let progress = self.show_progress.then(|| {
            let pb = ProgressBar::new(files.len() as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb
        });

        let outcomes: Vec<AnalysisOutcome> = files
            .par_iter()
            .map(|path| {
                if let Some(ref pb) = progress {
                    pb.set_message(format!("Analyzing {}", path.display()));
                }

                let start = Instant::now();
                let result = self.run_file(path).map_err(|e| format!("{:#}", e));
                let outcome = AnalysisOutcome {
                    path: path.clone(),
                    duration: start.elapsed(),
                    result,
                };

                if let Some(ref pb) = progress {
                    pb.inc(1);
                }
                outcome
            })
            .collect();

        if let Some(pb) = progress {
            pb.finish_with_message("Analysis complete");
        }
        outcomes
    }
}
