// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Wall clock anchoring the virtual timer clock to real time.

use std::time::{Duration, Instant};

/// Maps offsets on the virtual clock onto wall-clock instants
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    /// Wall-clock instant corresponding to offset zero
    origin: Instant,
}

impl WallClock {
    /// Start a clock anchored at the current instant
    pub fn start() -> Self {
        Self::anchored_at(Instant::now())
    }

    /// Create a clock anchored at a specific instant
    pub fn anchored_at(origin: Instant) -> Self {
        Self { origin }
    }

    /// Time elapsed since the origin
    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Wall-clock instant of an offset on the virtual clock
    pub fn instant_at(&self, offset: Duration) -> Instant {
        self.origin + offset
    }

    /// Time remaining until an offset is reached, zero if already past
    pub fn time_until(&self, offset: Duration) -> Duration {
        self.instant_at(offset).saturating_duration_since(Instant::now())
    }
}
