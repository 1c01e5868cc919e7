// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Spoken narration.
//!
//! This module provides:
//! - Narration lines and scripts with length-derived spacing
//! - Voice selection over a backend's catalog
//! - A trait-based speech backend abstraction
//! - The cancellable narration queue scheduler

pub mod backend;
pub mod line;
pub mod queue;
pub mod voice;

pub use backend::{ConsoleSpeech, SpeechBackend, Utterance};
pub use line::{
    GapPolicy, NarrationLine, NarrationScript, SpeechParams, MAX_GAP_MS, MIN_GAP_MS,
    REFERENCE_LENGTH,
};
pub use queue::{NarrationQueueScheduler, SharedSpeech};
pub use voice::{Voice, VoiceHint, VoicePreference};
