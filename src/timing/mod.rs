// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing module.
//!
//! This module provides the virtual-clock timer queue, cancellation
//! handles and the wall clock used to drive them in real time.

pub mod clock;
pub mod handle;
pub mod queue;

pub use clock::WallClock;
pub use handle::{Handle, Liveness};
pub use queue::{TimerQueue, TimerTask};

/// Convert whole milliseconds to queue microseconds
pub fn ms_to_micros(ms: u64) -> u64 {
    ms.saturating_mul(1000)
}

/// Convert a duration to queue microseconds, saturating on overflow
pub fn duration_to_micros(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}
