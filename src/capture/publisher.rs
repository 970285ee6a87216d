// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Latest-snapshot hand-off between the capture side and analysis
//!
//! The producer swaps in a whole new [`FrameSnapshot`]; readers clone the
//! `Arc` and never observe a half-updated frame. The lock only guards the
//! pointer swap.

use super::frame::FrameSnapshot;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct SnapshotPublisher {
    latest: Arc<RwLock<Option<Arc<FrameSnapshot>>>>,
}

impl SnapshotPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot and return the previous one
    pub fn publish(&self, snapshot: FrameSnapshot) -> Option<Arc<FrameSnapshot>> {
        let snapshot = Arc::new(snapshot);
        trace!(frame_id = %snapshot.frame_id, "Publishing frame snapshot");
        let mut guard = self.latest.write().unwrap_or_else(PoisonError::into_inner);
        guard.replace(snapshot)
    }

    /// Most recently published snapshot
    pub fn latest(&self) -> Option<Arc<FrameSnapshot>> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Take the current snapshot, leaving nothing published
    pub fn take(&self) -> Option<Arc<FrameSnapshot>> {
        self.latest
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}
