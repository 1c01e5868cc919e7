// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scenes and the fixed sequence they are played in.
//!
//! Scenes are defined once at configuration time and never change while a
//! presentation runs; only the current index into the sequence moves.

use std::time::Duration;

use crate::error::ConfigurationError;

/// One discrete visual state of the presentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    /// Display name (None = referred to by index)
    name: Option<String>,
    /// How long the scene stays on screen
    duration_ms: u64,
}

impl Scene {
    /// Create an unnamed scene
    pub fn new(duration_ms: u64) -> Self {
        Self {
            name: None,
            duration_ms,
        }
    }

    /// Create a named scene
    pub fn named(name: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            name: Some(name.into()),
            duration_ms,
        }
    }

    /// Get scene name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get display duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Get display duration
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Ordered, non-empty list of scenes with positive durations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSequence {
    scenes: Vec<Scene>,
}

impl SceneSequence {
    /// Build a sequence, rejecting empty lists and zero durations
    pub fn new(scenes: Vec<Scene>) -> Result<Self, ConfigurationError> {
        if scenes.is_empty() {
            return Err(ConfigurationError::EmptySequence);
        }
        if let Some(index) = scenes.iter().position(|s| s.duration_ms == 0) {
            return Err(ConfigurationError::NonPositiveDuration { index });
        }
        Ok(Self { scenes })
    }

    /// Build an unnamed sequence from bare durations
    pub fn from_durations(durations_ms: &[u64]) -> Result<Self, ConfigurationError> {
        Self::new(durations_ms.iter().map(|&d| Scene::new(d)).collect())
    }

    /// Number of scenes
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Check if the sequence has no scenes
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Get all scenes
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Get a scene by index
    pub fn scene(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }

    /// Display label for an index: the scene's name or `scene-<index>`
    pub fn label(&self, index: usize) -> String {
        match self.scene(index).and_then(Scene::name) {
            Some(name) => name.to_string(),
            None => format!("scene-{}", index),
        }
    }

    /// Start offset of every scene in milliseconds.
    ///
    /// `offsets()[i]` is the sum of the durations before scene `i`, so the
    /// first entry is always zero.
    pub fn offsets_ms(&self) -> Vec<u64> {
        self.scenes
            .iter()
            .scan(0u64, |acc, scene| {
                let start = *acc;
                *acc = acc.saturating_add(scene.duration_ms);
                Some(start)
            })
            .collect()
    }

    /// Length of one full pass in milliseconds
    pub fn total_ms(&self) -> u64 {
        self.scenes
            .iter()
            .fold(0u64, |acc, scene| acc.saturating_add(scene.duration_ms))
    }
}
