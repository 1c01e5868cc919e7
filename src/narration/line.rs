// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Narration lines, scripts and the gap heuristic that spaces them out.

use crate::error::ConfigurationError;
use crate::timing::ms_to_micros;

/// Shortest gap between two dispatches
pub const MIN_GAP_MS: u64 = 1500;
/// Longest gap between two dispatches
pub const MAX_GAP_MS: u64 = 3500;
/// Line length (in characters) that earns the full gap
pub const REFERENCE_LENGTH: usize = 40;

/// Speech parameters applied to an utterance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeechParams {
    /// Speaking rate (1.0 = backend default)
    pub rate: f32,
    /// Voice pitch (1.0 = backend default)
    pub pitch: f32,
    /// Output volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self {
            rate: 1.03,
            pitch: 1.02,
            volume: 1.0,
        }
    }
}

/// One unit of spoken text
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationLine {
    text: String,
    params: SpeechParams,
}

impl NarrationLine {
    /// Create a line with default speech parameters
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_params(text, SpeechParams::default())
    }

    /// Create a line with explicit speech parameters
    pub fn with_params(text: impl Into<String>, params: SpeechParams) -> Self {
        Self {
            text: text.into(),
            params,
        }
    }

    /// Get the text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the speech parameters
    pub fn params(&self) -> SpeechParams {
        self.params
    }

    /// Length in characters (Unicode scalar values)
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Spacing rule between consecutive lines.
///
/// The gap after a line is proportional to its length, floored at the
/// minimum and capped at the maximum:
/// `max(min_gap, max_gap * min(1, len / reference_length))`.
/// It estimates speech duration rather than measuring it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapPolicy {
    min_gap_ms: u64,
    max_gap_ms: u64,
    reference_length: usize,
}

impl GapPolicy {
    /// Create a policy, validating its bounds
    pub fn new(
        min_gap_ms: u64,
        max_gap_ms: u64,
        reference_length: usize,
    ) -> Result<Self, ConfigurationError> {
        if min_gap_ms > max_gap_ms {
            return Err(ConfigurationError::InvalidGapBounds {
                min_ms: min_gap_ms,
                max_ms: max_gap_ms,
            });
        }
        if reference_length == 0 {
            return Err(ConfigurationError::ZeroReferenceLength);
        }
        Ok(Self {
            min_gap_ms,
            max_gap_ms,
            reference_length,
        })
    }

    /// Get minimum gap
    pub fn min_gap_ms(&self) -> u64 {
        self.min_gap_ms
    }

    /// Get maximum gap
    pub fn max_gap_ms(&self) -> u64 {
        self.max_gap_ms
    }

    /// Get reference length
    pub fn reference_length(&self) -> usize {
        self.reference_length
    }

    /// Gap following a line of `char_len` characters, in microseconds.
    ///
    /// Computed in microseconds so fractional milliseconds (27 characters
    /// gives 2362.5ms) survive without a rounding step.
    pub fn gap_micros(&self, char_len: usize) -> u64 {
        let capped = char_len.min(self.reference_length) as u128;
        let proportional =
            ms_to_micros(self.max_gap_ms) as u128 * capped / self.reference_length as u128;
        let proportional = u64::try_from(proportional).unwrap_or(u64::MAX);
        proportional.max(ms_to_micros(self.min_gap_ms))
    }

    /// Dispatch offset of each line in microseconds, first line at zero
    pub fn offsets_micros(&self, script: &NarrationScript) -> Vec<u64> {
        let mut cursor = 0u64;
        script
            .lines()
            .iter()
            .map(|line| {
                let at = cursor;
                cursor = cursor.saturating_add(self.gap_micros(line.char_len()));
                at
            })
            .collect()
    }
}

impl Default for GapPolicy {
    fn default() -> Self {
        Self {
            min_gap_ms: MIN_GAP_MS,
            max_gap_ms: MAX_GAP_MS,
            reference_length: REFERENCE_LENGTH,
        }
    }
}

/// Ordered, fixed list of narration lines
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationScript {
    lines: Vec<NarrationLine>,
}

impl NarrationScript {
    /// Build a script, rejecting an empty line list
    pub fn new(lines: Vec<NarrationLine>) -> Result<Self, ConfigurationError> {
        if lines.is_empty() {
            return Err(ConfigurationError::EmptyScript);
        }
        Ok(Self { lines })
    }

    /// Build a script from bare texts with default speech parameters
    pub fn from_texts<S: AsRef<str>>(texts: &[S]) -> Result<Self, ConfigurationError> {
        Self::new(texts.iter().map(|t| NarrationLine::new(t.as_ref())).collect())
    }

    /// Get all lines
    pub fn lines(&self) -> &[NarrationLine] {
        &self.lines
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the script has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
