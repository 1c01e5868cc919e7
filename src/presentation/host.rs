// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Host collaborators: scene rendering and background music.
//!
//! Both are called from inside the controller while it is mid-update, so
//! implementations must not call back into the controller.

use tracing::debug;

use super::{PresentationState, SceneFrame};

/// Rendering layer. Receives a frame on start, on every scene change, at
/// every loop reset and on stop.
pub trait SceneView {
    fn render(&mut self, frame: &SceneFrame);
}

/// Background music tied to the presentation lifecycle
pub trait Soundtrack {
    /// Rewind and start playing
    fn play_from_start(&mut self);

    /// Pause playback
    fn pause(&mut self);
}

/// View that prints scene changes to stdout
#[derive(Debug, Clone)]
pub struct ConsoleView {
    show_name: String,
    frames: usize,
}

impl ConsoleView {
    /// Create a console view for a named show
    pub fn new(show_name: impl Into<String>) -> Self {
        Self {
            show_name: show_name.into(),
            frames: 0,
        }
    }

    /// Number of frames rendered so far
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl SceneView for ConsoleView {
    fn render(&mut self, frame: &SceneFrame) {
        self.frames += 1;
        match frame.state {
            PresentationState::Running => {
                debug!(
                    scene = frame.scene_index,
                    generation = frame.loop_generation,
                    "rendering scene"
                );
                println!(
                    "[{}] loop {} | scene {}: {}",
                    self.show_name, frame.loop_generation, frame.scene_index, frame.scene_name
                );
            }
            PresentationState::Stopped => {
                println!("[{}] stopped", self.show_name);
            }
        }
    }
}
