// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Speech backend abstraction.
//!
//! The scheduler only depends on the cancellation contract: after
//! `cancel_all` returns, neither the utterance being spoken nor anything
//! queued inside the backend may produce further output.

use tracing::{debug, info};

use super::line::SpeechParams;
use super::voice::{Voice, VoiceHint};

/// A single request to speak
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// Text to speak
    pub text: String,
    /// Rate, pitch and volume
    pub params: SpeechParams,
    /// Voice chosen for this utterance
    pub voice: VoiceHint,
}

/// Trait for speech output implementations.
///
/// Calls trigger output synchronously; the audio itself may play out
/// asynchronously inside the backend.
pub trait SpeechBackend {
    /// Voices currently available. Read again before every dispatch.
    fn voices(&self) -> Vec<Voice>;

    /// Start speaking, or enqueue behind what is already playing
    fn speak(&mut self, utterance: Utterance);

    /// Silence the current utterance and drop everything queued
    fn cancel_all(&mut self);
}

/// Backend that prints utterances to stdout
#[derive(Debug, Clone, Default)]
pub struct ConsoleSpeech {
    voices: Vec<Voice>,
    spoken: usize,
}

impl ConsoleSpeech {
    /// Create a console backend with an empty voice catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a console backend advertising the given voices
    pub fn with_voices(voices: Vec<Voice>) -> Self {
        Self { voices, spoken: 0 }
    }

    /// Number of utterances printed so far
    pub fn spoken(&self) -> usize {
        self.spoken
    }
}

impl SpeechBackend for ConsoleSpeech {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn speak(&mut self, utterance: Utterance) {
        self.spoken += 1;
        let voice = utterance
            .voice
            .voice()
            .map(|v| format!("{} ({})", v.name, v.lang))
            .unwrap_or_else(|| "default voice".to_string());
        info!(voice = %voice, rate = utterance.params.rate, "speaking");
        println!("  >> \"{}\"", utterance.text);
    }

    fn cancel_all(&mut self) {
        debug!("console speech cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_speech_counts() {
        let mut speech = ConsoleSpeech::with_voices(vec![Voice::new("Rishi", "en-IN")]);
        assert_eq!(speech.voices().len(), 1);

        speech.speak(Utterance {
            text: "Ab design karega AI vs AI!".to_string(),
            params: SpeechParams::default(),
            voice: VoiceHint::BackendDefault,
        });
        speech.cancel_all();

        assert_eq!(speech.spoken(), 1);
    }

    #[test]
    fn test_console_speech_default_catalog_empty() {
        assert!(ConsoleSpeech::new().voices().is_empty());
    }
}
