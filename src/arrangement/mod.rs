// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scene arrangement.
//!
//! This module provides:
//! - Scenes: named display states with fixed durations
//! - Scene sequences: the validated, ordered list played each pass
//! - Scene timeline: the per-pass advance schedule

pub mod scene;
pub mod timeline;

pub use scene::{Scene, SceneSequence};
pub use timeline::{SceneTimeline, DEFAULT_LOOP_PAUSE_MS};
