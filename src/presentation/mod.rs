// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Presentation control.
//!
//! This module provides the controller that owns a show's timeline and
//! narration, the collaborator traits the host implements to render scenes
//! and play music, and a real-time driver for running a show from a
//! terminal.

pub mod controller;
pub mod driver;
pub mod host;

pub use controller::PresentationController;
pub use driver::{run, RunOptions};
pub use host::{ConsoleView, SceneView, Soundtrack};

/// Presentation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationState {
    Stopped,
    Running,
}

/// Scene position within a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimelineState {
    /// Index of the scene on screen
    pub current_index: usize,
    /// Completed loop passes since start
    pub loop_generation: u64,
}

/// What the rendering layer needs to draw the current scene.
///
/// `loop_generation` changes on every pass, which lets a renderer replay
/// entrance animations even though the index returns to the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneFrame {
    /// Presentation state
    pub state: PresentationState,
    /// Index of the scene on screen
    pub scene_index: usize,
    /// Display label of the scene on screen
    pub scene_name: String,
    /// Completed loop passes since start
    pub loop_generation: u64,
}
