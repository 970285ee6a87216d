// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Integrity verdicts

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrityStatus {
    #[default]
    Intact,
    Compromised,
}

impl IntegrityStatus {
    pub const ALL: [IntegrityStatus; 2] = [IntegrityStatus::Intact, IntegrityStatus::Compromised];

    pub fn from_compromised(compromised: bool) -> Self {
        if compromised {
            IntegrityStatus::Compromised
        } else {
            IntegrityStatus::Intact
        }
    }

    pub fn is_compromised(self) -> bool {
        self == IntegrityStatus::Compromised
    }

    /// Sentence shown to the operator
    pub fn description(self) -> &'static str {
        match self {
            IntegrityStatus::Intact => "The surface is intact.",
            IntegrityStatus::Compromised => "The surface has integrity issues.",
        }
    }
}

impl fmt::Display for IntegrityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityStatus::Intact => f.write_str("intact"),
            IntegrityStatus::Compromised => f.write_str("compromised"),
        }
    }
}

/// One signal's verdict with a short justification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityStatusDetails {
    pub status: IntegrityStatus,
    pub details: String,
}

impl IntegrityStatusDetails {
    pub fn new(status: IntegrityStatus, details: impl Into<String>) -> Self {
        Self {
            status,
            details: details.into(),
        }
    }

    pub fn intact(details: impl Into<String>) -> Self {
        Self::new(IntegrityStatus::Intact, details)
    }

    pub fn compromised(details: impl Into<String>) -> Self {
        Self::new(IntegrityStatus::Compromised, details)
    }

    pub fn is_compromised(&self) -> bool {
        self.status.is_compromised()
    }
}

/// Logical OR over the signals that were computed; intact when none were
pub fn combine<'a, I>(signals: I) -> IntegrityStatus
where
    I: IntoIterator<Item = Option<&'a IntegrityStatusDetails>>,
{
    let compromised = signals
        .into_iter()
        .flatten()
        .any(IntegrityStatusDetails::is_compromised);
    IntegrityStatus::from_compromised(compromised)
}
