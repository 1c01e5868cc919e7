// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Cancellation handles and the liveness arena behind them.

use std::collections::HashSet;
use std::fmt;

/// Opaque cancellation token returned by a `start` operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u64);

impl Handle {
    /// Handle returned by starts that scheduled nothing. Never live.
    pub const NOOP: Handle = Handle(0);

    /// Numeric id of this handle
    pub fn id(self) -> u64 {
        self.0
    }

    /// Check if this is the no-op handle
    pub fn is_noop(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_noop() {
            write!(f, "handle#noop")
        } else {
            write!(f, "handle#{}", self.0)
        }
    }
}

/// Arena of live handle ids.
///
/// Only live ids are stored, so revoked handles cost nothing no matter how
/// many loop passes a session runs through. Ids are never reused.
#[derive(Debug, Default)]
pub struct Liveness {
    live: HashSet<u64>,
    last_id: u64,
}

impl Liveness {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh live handle
    pub fn issue(&mut self) -> Handle {
        self.last_id += 1;
        self.live.insert(self.last_id);
        Handle(self.last_id)
    }

    /// Check whether a handle is still live
    pub fn is_live(&self, handle: Handle) -> bool {
        self.live.contains(&handle.0)
    }

    /// Revoke a handle. Returns true if it was live before the call.
    pub fn revoke(&mut self, handle: Handle) -> bool {
        self.live.remove(&handle.0)
    }

    /// Number of handles currently live
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}
