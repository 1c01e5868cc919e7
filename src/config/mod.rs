// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for reel.
//!
//! This module provides the show file format: scene durations, narration
//! lines and the timing constants that drive them. Show files are YAML or
//! TOML; every field has a default reproducing the built-in show.

pub mod watcher;

pub use watcher::{validate_config, ConfigEvent, ConfigWatcher};

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::arrangement::{Scene, SceneSequence, DEFAULT_LOOP_PAUSE_MS};
use crate::error::ConfigurationError;
use crate::narration::{
    GapPolicy, NarrationLine, NarrationScript, SpeechParams, VoicePreference, MAX_GAP_MS,
    MIN_GAP_MS, REFERENCE_LENGTH,
};

/// Root configuration for a show
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShowFile {
    /// Show metadata and loop settings
    #[serde(default)]
    pub show: ShowConfig,
    /// Scenes in play order
    #[serde(default = "default_scenes")]
    pub scenes: Vec<SceneConfig>,
    /// Narration settings and script
    #[serde(default)]
    pub narration: NarrationConfig,
}

impl ShowFile {
    /// Load a show from a YAML or TOML file (chosen by extension)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read show file: {:?}", path))?;
        let parsed = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&contents),
            _ => Self::from_yaml(&contents),
        };
        parsed.with_context(|| format!("Failed to load show file: {:?}", path))
    }

    /// Parse a show from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML show configuration")
    }

    /// Parse a show from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).context("Failed to parse TOML show configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize show configuration to YAML")
    }

    /// Save the show to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write show file: {:?}", path.as_ref()))
    }

    /// Build the validated scene sequence
    pub fn scene_sequence(&self) -> Result<SceneSequence, ConfigurationError> {
        SceneSequence::new(
            self.scenes
                .iter()
                .map(|scene| match &scene.name {
                    Some(name) => Scene::named(name.clone(), scene.duration_ms),
                    None => Scene::new(scene.duration_ms),
                })
                .collect(),
        )
    }

    /// Build the validated narration script
    pub fn narration_script(&self) -> Result<NarrationScript, ConfigurationError> {
        let params = self.narration.speech_params();
        NarrationScript::new(
            self.narration
                .lines
                .iter()
                .map(|text| NarrationLine::with_params(text.clone(), params))
                .collect(),
        )
    }

    /// Build the validated gap policy
    pub fn gap_policy(&self) -> Result<GapPolicy, ConfigurationError> {
        GapPolicy::new(
            self.narration.min_gap_ms,
            self.narration.max_gap_ms,
            self.narration.reference_length,
        )
    }

    /// Build the voice preference rule
    pub fn voice_preference(&self) -> VoicePreference {
        VoicePreference::new(
            self.narration.voices.preferred.clone(),
            self.narration.voices.fallback.clone(),
        )
    }

    /// Check everything a start would check.
    ///
    /// The narration script and gaps only matter while narration is enabled.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.scene_sequence()?;
        if self.narration.enabled {
            self.narration_script()?;
            self.gap_policy()?;
        }
        Ok(())
    }
}

impl Default for ShowFile {
    fn default() -> Self {
        Self {
            show: ShowConfig::default(),
            scenes: default_scenes(),
            narration: NarrationConfig::default(),
        }
    }
}

/// Show-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShowConfig {
    /// Show name
    #[serde(default = "default_show_name")]
    pub name: String,
    /// Pause after the last scene before looping, in milliseconds
    #[serde(default = "default_loop_pause_ms")]
    pub loop_pause_ms: u64,
}

fn default_show_name() -> String {
    "DesignArena.ai".to_string()
}
fn default_loop_pause_ms() -> u64 {
    DEFAULT_LOOP_PAUSE_MS
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            name: default_show_name(),
            loop_pause_ms: default_loop_pause_ms(),
        }
    }
}

/// Scene configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneConfig {
    /// Scene name (used for display and logs)
    #[serde(default)]
    pub name: Option<String>,
    /// Display duration in milliseconds
    pub duration_ms: u64,
}

impl SceneConfig {
    fn named(name: &str, duration_ms: u64) -> Self {
        Self {
            name: Some(name.to_string()),
            duration_ms,
        }
    }
}

fn default_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig::named("intro", 1700),
        SceneConfig::named("compare", 3600),
        SceneConfig::named("battle", 3200),
        SceneConfig::named("leaderboard", 3200),
        SceneConfig::named("slogan", 1800),
        SceneConfig::named("logo", 2200),
    ]
}

/// Narration configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NarrationConfig {
    /// Whether narration plays at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Shortest gap between lines
    #[serde(default = "default_min_gap_ms")]
    pub min_gap_ms: u64,
    /// Longest gap between lines
    #[serde(default = "default_max_gap_ms")]
    pub max_gap_ms: u64,
    /// Line length (characters) that earns the longest gap
    #[serde(default = "default_reference_length")]
    pub reference_length: usize,
    /// Speaking rate
    #[serde(default = "default_rate")]
    pub rate: f32,
    /// Voice pitch
    #[serde(default = "default_pitch")]
    pub pitch: f32,
    /// Output volume (0.0 - 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Voice selection patterns
    #[serde(default)]
    pub voices: VoiceConfig,
    /// Lines in speaking order
    #[serde(default = "default_lines")]
    pub lines: Vec<String>,
}

fn default_enabled() -> bool {
    true
}
fn default_min_gap_ms() -> u64 {
    MIN_GAP_MS
}
fn default_max_gap_ms() -> u64 {
    MAX_GAP_MS
}
fn default_reference_length() -> usize {
    REFERENCE_LENGTH
}
fn default_rate() -> f32 {
    SpeechParams::default().rate
}
fn default_pitch() -> f32 {
    SpeechParams::default().pitch
}
fn default_volume() -> f32 {
    SpeechParams::default().volume
}
fn default_lines() -> Vec<String> {
    vec![
        "Ab design karega AI vs AI!".to_string(),
        "Kaunsa model banayega best look?".to_string(),
        "Tum decide karoge ? vote do aur dekho kaun jeetega DesignArena mein!".to_string(),
    ]
}

impl NarrationConfig {
    /// Speech parameters shared by every line
    pub fn speech_params(&self) -> SpeechParams {
        SpeechParams {
            rate: self.rate,
            pitch: self.pitch,
            volume: self.volume.clamp(0.0, 1.0),
        }
    }
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            min_gap_ms: default_min_gap_ms(),
            max_gap_ms: default_max_gap_ms(),
            reference_length: default_reference_length(),
            rate: default_rate(),
            pitch: default_pitch(),
            volume: default_volume(),
            voices: VoiceConfig::default(),
            lines: default_lines(),
        }
    }
}

/// Voice selection patterns, matched against language tags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoiceConfig {
    /// Regional patterns tried first
    #[serde(default = "default_preferred_voices")]
    pub preferred: Vec<String>,
    /// Broader language patterns tried next
    #[serde(default = "default_fallback_voices")]
    pub fallback: Vec<String>,
}

fn default_preferred_voices() -> Vec<String> {
    vec!["hi".to_string(), "en-IN".to_string()]
}
fn default_fallback_voices() -> Vec<String> {
    vec!["en".to_string()]
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            preferred: default_preferred_voices(),
            fallback: default_fallback_voices(),
        }
    }
}
