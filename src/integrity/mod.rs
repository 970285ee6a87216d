// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Integrity module - classifying a captured surface as intact or compromised

pub mod calculator;
pub mod config;
pub mod detections;
pub mod deviation;
pub mod filter;
pub mod results;
pub mod status;

pub use calculator::{AnalysisStage, IntegrityCalculator};
pub use config::IntegrityConfig;
pub use filter::FilterStats;
pub use results::{BoxGroup, DeviationMetrics, IntegrityResults, TriangleColor};
pub use status::{IntegrityStatus, IntegrityStatusDetails};
