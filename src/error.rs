// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for the presentation engine.

use thiserror::Error;

use crate::timing::Handle;

/// Invalid presentation inputs, reported before any timer is scheduled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No scenes configured
    #[error("scene sequence is empty")]
    EmptySequence,
    /// A scene with a zero duration
    #[error("scene {index} has a non-positive duration")]
    NonPositiveDuration { index: usize },
    /// Narration enabled with no lines to speak
    #[error("narration script is empty")]
    EmptyScript,
    /// Minimum narration gap larger than the maximum
    #[error("narration gap bounds are inverted: min {min_ms}ms > max {max_ms}ms")]
    InvalidGapBounds { min_ms: u64, max_ms: u64 },
    /// Reference length of zero characters
    #[error("narration reference length must be at least one character")]
    ZeroReferenceLength,
}

/// Errors from starting presentation components
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresentationError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    /// `start` called while an earlier handle from the same component is live
    #[error("{component} already running under {handle}; stop it before starting again")]
    DoubleStart {
        component: &'static str,
        handle: Handle,
    },
}
