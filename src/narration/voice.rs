// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Voice catalog entries and the preference rule used to pick one.

/// A voice offered by a speech backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Backend-specific voice name
    pub name: String,
    /// Language tag (e.g., "en-IN", "hi-IN", "en-US")
    pub lang: String,
}

impl Voice {
    /// Create a voice entry
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }
}

/// Voice choice passed to the backend with each utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceHint {
    /// Voice matching the regional patterns
    Preferred(Voice),
    /// Voice matching only the broader language patterns
    Fallback(Voice),
    /// Nothing matched; let the backend use its default voice
    BackendDefault,
}

impl VoiceHint {
    /// Get the chosen voice, if any
    pub fn voice(&self) -> Option<&Voice> {
        match self {
            VoiceHint::Preferred(voice) | VoiceHint::Fallback(voice) => Some(voice),
            VoiceHint::BackendDefault => None,
        }
    }
}

/// Two-tier voice selection rule.
///
/// Patterns are matched case-insensitively anywhere in a voice's language
/// tag. The first voice in catalog order matching a preferred pattern wins,
/// then the first matching a fallback pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoicePreference {
    preferred: Vec<String>,
    fallback: Vec<String>,
}

impl VoicePreference {
    /// Create a preference rule from regional and broader patterns
    pub fn new(preferred: Vec<String>, fallback: Vec<String>) -> Self {
        Self {
            preferred: preferred.into_iter().map(|p| p.to_lowercase()).collect(),
            fallback: fallback.into_iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    /// Get regional patterns
    pub fn preferred(&self) -> &[String] {
        &self.preferred
    }

    /// Get broader patterns
    pub fn fallback(&self) -> &[String] {
        &self.fallback
    }

    /// Pick a voice from the catalog
    pub fn select(&self, catalog: &[Voice]) -> VoiceHint {
        if let Some(voice) = Self::first_match(catalog, &self.preferred) {
            return VoiceHint::Preferred(voice.clone());
        }
        if let Some(voice) = Self::first_match(catalog, &self.fallback) {
            return VoiceHint::Fallback(voice.clone());
        }
        VoiceHint::BackendDefault
    }

    fn first_match<'a>(catalog: &'a [Voice], patterns: &[String]) -> Option<&'a Voice> {
        catalog.iter().find(|voice| {
            let lang = voice.lang.to_lowercase();
            patterns.iter().any(|p| !p.is_empty() && lang.contains(p.as_str()))
        })
    }
}

impl Default for VoicePreference {
    fn default() -> Self {
        Self::new(
            vec!["hi".to_string(), "en-IN".to_string()],
            vec!["en".to_string()],
        )
    }
}
