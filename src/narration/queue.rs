// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Narration queue scheduler.
//!
//! Spaces the lines of a script out on the timer queue according to the
//! gap policy and hands each one to the speech backend when it falls due.
//! Stopping revokes the pending dispatches and silences the backend.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use super::backend::{SpeechBackend, Utterance};
use super::line::{GapPolicy, NarrationLine, NarrationScript};
use super::voice::VoicePreference;
use crate::error::PresentationError;
use crate::timing::{Handle, TimerQueue};

/// Speech backend shared between the scheduler and its pending dispatches
pub type SharedSpeech = Rc<RefCell<dyn SpeechBackend>>;

/// Schedules narration lines against a speech backend
pub struct NarrationQueueScheduler {
    /// Speech output (None = no backend in this environment)
    backend: Option<SharedSpeech>,
    /// Spacing between lines
    gaps: GapPolicy,
    /// Voice selection rule, applied at dispatch time
    voices: Rc<VoicePreference>,
    /// Handle of the most recent start
    live: Option<Handle>,
}

impl NarrationQueueScheduler {
    /// Create a scheduler around an optional backend
    pub fn new(backend: Option<SharedSpeech>) -> Self {
        Self {
            backend,
            gaps: GapPolicy::default(),
            voices: Rc::new(VoicePreference::default()),
            live: None,
        }
    }

    /// Create a scheduler owning the given backend
    pub fn with_backend<B: SpeechBackend + 'static>(backend: B) -> Self {
        let shared: SharedSpeech = Rc::new(RefCell::new(backend));
        Self::new(Some(shared))
    }

    /// Create a scheduler with no backend; every start is a no-op
    pub fn unavailable() -> Self {
        Self::new(None)
    }

    /// Check if a speech backend is present
    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Get the gap policy
    pub fn gaps(&self) -> GapPolicy {
        self.gaps
    }

    /// Set the gap policy (applies to the next start)
    pub fn set_gaps(&mut self, gaps: GapPolicy) {
        self.gaps = gaps;
    }

    /// Get the voice preference
    pub fn voices(&self) -> &VoicePreference {
        &self.voices
    }

    /// Set the voice preference (applies to the next start)
    pub fn set_voices(&mut self, voices: VoicePreference) {
        self.voices = Rc::new(voices);
    }

    /// Handle of the running narration, if it has not been stopped
    pub fn live_handle(&self, queue: &TimerQueue) -> Option<Handle> {
        self.live.filter(|&handle| queue.is_live(handle))
    }

    /// Schedule every line of `script`, the first one immediately.
    ///
    /// With `enabled` false, or without a backend, nothing is scheduled and
    /// [`Handle::NOOP`] is returned. Starting while an earlier handle is
    /// live is rejected.
    pub fn start(
        &mut self,
        queue: &mut TimerQueue,
        script: &NarrationScript,
        enabled: bool,
    ) -> Result<Handle, PresentationError> {
        if !enabled {
            debug!("narration disabled, nothing scheduled");
            return Ok(Handle::NOOP);
        }
        let Some(backend) = self.backend.as_ref() else {
            warn!("no speech backend available, narration skipped");
            return Ok(Handle::NOOP);
        };
        if let Some(handle) = self.live_handle(queue) {
            return Err(PresentationError::DoubleStart {
                component: "narration queue",
                handle,
            });
        }

        let handle = queue.issue_handle();
        let offsets = self.gaps.offsets_micros(script);

        for (index, (line, offset)) in script.lines().iter().zip(offsets).enumerate() {
            let backend = Rc::clone(backend);
            let voices = Rc::clone(&self.voices);
            let line = line.clone();
            queue.schedule_after(handle, offset, move |_| {
                dispatch(&backend, &voices, index, &line);
            });
        }

        debug!(%handle, lines = script.len(), "narration scheduled");
        self.live = Some(handle);
        Ok(handle)
    }

    /// Stop narration: drop pending dispatches and silence the backend.
    ///
    /// Returns true if the handle was live. The backend is cancelled only
    /// on that first stop, so repeated stops have no side effects.
    pub fn stop(&mut self, queue: &mut TimerQueue, handle: Handle) -> bool {
        if self.live == Some(handle) {
            self.live = None;
        }
        let was_live = queue.revoke(handle);
        if was_live {
            if let Some(backend) = &self.backend {
                backend.borrow_mut().cancel_all();
            }
            debug!(%handle, "narration stopped");
        }
        was_live
    }
}

impl fmt::Debug for NarrationQueueScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NarrationQueueScheduler")
            .field("available", &self.is_available())
            .field("gaps", &self.gaps)
            .field("voices", &self.voices)
            .field("live", &self.live)
            .finish()
    }
}

fn dispatch(backend: &SharedSpeech, voices: &VoicePreference, index: usize, line: &NarrationLine) {
    let mut backend = backend.borrow_mut();
    let voice = voices.select(&backend.voices());
    debug!(line = index, ?voice, "dispatching narration");
    backend.speak(Utterance {
        text: line.text().to_string(),
        params: line.params(),
        voice,
    });
}
