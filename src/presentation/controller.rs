// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Presentation controller.
//!
//! Composition root of a show: owns the timer queue, one scene timeline
//! and one narration scheduler, and runs the STOPPED/RUNNING state machine
//! that restarts both at every loop boundary.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::{debug, error, info};

use super::host::{SceneView, Soundtrack};
use super::{PresentationState, SceneFrame, TimelineState};
use crate::arrangement::{SceneSequence, SceneTimeline};
use crate::config::ShowFile;
use crate::error::PresentationError;
use crate::narration::{
    GapPolicy, NarrationQueueScheduler, NarrationScript, SharedSpeech, SpeechBackend,
    VoicePreference,
};
use crate::timing::{duration_to_micros, Handle, TimerQueue};

/// Validated inputs for one session
struct Plan {
    sequence: SceneSequence,
    /// None when narration is switched off in the show
    script: Option<NarrationScript>,
    gaps: GapPolicy,
    voices: VoicePreference,
    loop_pause_ms: u64,
}

impl Plan {
    /// Validate a show. Fails before anything is scheduled.
    fn from_show(show: &ShowFile) -> Result<Self, PresentationError> {
        let sequence = show.scene_sequence()?;
        let (script, gaps) = if show.narration.enabled {
            (Some(show.narration_script()?), show.gap_policy()?)
        } else {
            (None, GapPolicy::default())
        };
        Ok(Self {
            sequence,
            script,
            gaps,
            voices: show.voice_preference(),
            loop_pause_ms: show.show.loop_pause_ms,
        })
    }
}

/// One start-to-stop lifetime
struct Session {
    sequence: SceneSequence,
    script: Option<NarrationScript>,
    timeline: TimelineState,
    scene_handle: Handle,
    narration_handle: Handle,
}

struct Inner {
    show: ShowFile,
    /// Host-level narration switch, on top of the show's own setting
    narration_enabled: bool,
    state: PresentationState,
    session: Option<Session>,
    timeline: SceneTimeline,
    narration: NarrationQueueScheduler,
    view: Option<Box<dyn SceneView>>,
    soundtrack: Option<Box<dyn Soundtrack>>,
}

impl Inner {
    /// Start the scene timeline and narration for the current pass
    fn begin_pass(
        this: &Weak<RefCell<Inner>>,
        inner: &mut Inner,
        queue: &mut TimerQueue,
    ) -> Result<(), PresentationError> {
        let running = inner.state == PresentationState::Running;
        let narrate = running && inner.narration_enabled;
        let Some(session) = inner.session.as_mut() else {
            return Ok(());
        };

        let advance_ref = this.clone();
        let loop_ref = this.clone();
        session.scene_handle = inner.timeline.start(
            queue,
            &session.sequence,
            move |index| {
                if let Some(rc) = advance_ref.upgrade() {
                    rc.borrow_mut().on_advance(index);
                }
            },
            move |q| {
                if let Some(rc) = loop_ref.upgrade() {
                    let mut guard = rc.borrow_mut();
                    Inner::on_loop_complete(&loop_ref, &mut guard, q);
                }
            },
        )?;

        session.narration_handle = match &session.script {
            Some(script) => inner.narration.start(queue, script, narrate)?,
            None => Handle::NOOP,
        };
        Ok(())
    }

    fn on_advance(&mut self, index: usize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if index <= session.timeline.current_index {
            debug!(index, current = session.timeline.current_index, "ignoring non-forward advance");
            return;
        }
        session.timeline.current_index = index;
        debug!(index, "scene advanced");
        self.render();
    }

    /// Loop boundary: reset the index, bump the generation, reissue both starts
    fn on_loop_complete(this: &Weak<RefCell<Inner>>, inner: &mut Inner, queue: &mut TimerQueue) {
        let Some(session) = inner.session.as_mut() else {
            return;
        };
        inner.timeline.stop(queue, session.scene_handle);
        inner.narration.stop(queue, session.narration_handle);
        session.scene_handle = Handle::NOOP;
        session.narration_handle = Handle::NOOP;
        session.timeline.current_index = 0;
        session.timeline.loop_generation += 1;
        info!(generation = session.timeline.loop_generation, "loop pass complete");

        if let Err(e) = Inner::begin_pass(this, inner, queue) {
            error!("failed to restart presentation pass: {}", e);
            inner.halt(queue);
            return;
        }
        inner.render();
    }

    /// Stop both handles and drop the session
    fn halt(&mut self, queue: &mut TimerQueue) {
        if let Some(session) = self.session.take() {
            self.timeline.stop(queue, session.scene_handle);
            self.narration.stop(queue, session.narration_handle);
        }
        self.state = PresentationState::Stopped;
        if let Some(soundtrack) = self.soundtrack.as_mut() {
            soundtrack.pause();
        }
        self.render();
    }

    fn frame(&self) -> SceneFrame {
        let timeline = self.session.as_ref().map(|s| s.timeline).unwrap_or_default();
        let scene_name = match &self.session {
            Some(session) => session.sequence.label(timeline.current_index),
            None => self
                .show
                .scenes
                .first()
                .and_then(|scene| scene.name.clone())
                .unwrap_or_else(|| "scene-0".to_string()),
        };
        SceneFrame {
            state: self.state,
            scene_index: timeline.current_index,
            scene_name,
            loop_generation: timeline.loop_generation,
        }
    }

    fn render(&mut self) {
        let frame = self.frame();
        if let Some(view) = self.view.as_mut() {
            view.render(&frame);
        }
    }
}

/// Drives a looping, narrated presentation
pub struct PresentationController {
    queue: TimerQueue,
    inner: Rc<RefCell<Inner>>,
}

impl PresentationController {
    /// Create a stopped controller for a show, with no speech backend
    pub fn new(show: ShowFile) -> Self {
        let timeline = SceneTimeline::new(show.show.loop_pause_ms);
        Self {
            queue: TimerQueue::new(),
            inner: Rc::new(RefCell::new(Inner {
                show,
                narration_enabled: true,
                state: PresentationState::Stopped,
                session: None,
                timeline,
                narration: NarrationQueueScheduler::unavailable(),
                view: None,
                soundtrack: None,
            })),
        }
    }

    /// Builder: speak through the given backend
    pub fn with_speech<B: SpeechBackend + 'static>(self, backend: B) -> Self {
        let shared: SharedSpeech = Rc::new(RefCell::new(backend));
        self.with_shared_speech(shared)
    }

    /// Builder: speak through a backend the caller keeps a reference to
    pub fn with_shared_speech(self, backend: SharedSpeech) -> Self {
        self.inner.borrow_mut().narration = NarrationQueueScheduler::new(Some(backend));
        self
    }

    /// Builder: render through the given view
    pub fn with_view<V: SceneView + 'static>(self, view: V) -> Self {
        self.inner.borrow_mut().view = Some(Box::new(view));
        self
    }

    /// Builder: tie background music to the lifecycle
    pub fn with_soundtrack<S: Soundtrack + 'static>(self, soundtrack: S) -> Self {
        self.inner.borrow_mut().soundtrack = Some(Box::new(soundtrack));
        self
    }

    /// Switch narration on or off.
    ///
    /// Switching off cancels the current pass's narration immediately.
    /// Switching on takes effect from the next pass.
    pub fn set_narration_enabled(&mut self, enabled: bool) {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        inner.narration_enabled = enabled;
        if enabled {
            return;
        }
        if let Some(session) = inner.session.as_mut() {
            if inner.narration.stop(&mut self.queue, session.narration_handle) {
                info!("narration muted");
            }
            session.narration_handle = Handle::NOOP;
        }
    }

    /// Start the presentation.
    ///
    /// Returns `Ok(true)` on the STOPPED to RUNNING transition and
    /// `Ok(false)` if it was already running (starting twice is a no-op).
    /// Invalid configuration is reported before any timer is scheduled.
    pub fn start(&mut self) -> Result<bool, PresentationError> {
        {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            if inner.state == PresentationState::Running {
                debug!("start ignored, already running");
                return Ok(false);
            }

            let plan = Plan::from_show(&inner.show)?;
            inner.timeline.set_loop_pause_ms(plan.loop_pause_ms);
            inner.narration.set_gaps(plan.gaps);
            inner.narration.set_voices(plan.voices);
            inner.session = Some(Session {
                sequence: plan.sequence,
                script: plan.script,
                timeline: TimelineState::default(),
                scene_handle: Handle::NOOP,
                narration_handle: Handle::NOOP,
            });
            inner.state = PresentationState::Running;

            let this = Rc::downgrade(&self.inner);
            if let Err(e) = Inner::begin_pass(&this, inner, &mut self.queue) {
                inner.halt(&mut self.queue);
                return Err(e);
            }

            if let Some(soundtrack) = inner.soundtrack.as_mut() {
                soundtrack.play_from_start();
            }
            info!(show = %inner.show.show.name, "presentation started");
            inner.render();
        }

        // Run work due at offset zero (the first narration line)
        self.queue.advance_by(0);
        Ok(true)
    }

    /// Stop the presentation, cancelling every timer and any speech.
    ///
    /// Returns true on the RUNNING to STOPPED transition; stopping a
    /// stopped controller does nothing.
    pub fn stop(&mut self) -> bool {
        let mut guard = self.inner.borrow_mut();
        if guard.state == PresentationState::Stopped {
            return false;
        }
        guard.halt(&mut self.queue);
        info!("presentation stopped");
        true
    }

    /// Replace the show.
    ///
    /// The new show is validated first; if it is invalid the current session
    /// keeps running and the error is returned. Otherwise a running
    /// presentation is stopped and restarted on the new inputs.
    pub fn reload(&mut self, show: ShowFile) -> Result<(), PresentationError> {
        Plan::from_show(&show)?;
        let was_running = self.stop();
        self.inner.borrow_mut().show = show;
        if was_running {
            self.start()?;
        }
        info!(restarted = was_running, "show reloaded");
        Ok(())
    }

    /// Advance time to `at`, firing everything that falls due
    pub fn advance_to(&mut self, at: Duration) -> usize {
        self.queue.advance_to(duration_to_micros(at))
    }

    /// Advance time by `delta`
    pub fn advance_by(&mut self, delta: Duration) -> usize {
        self.queue.advance_by(duration_to_micros(delta))
    }

    /// Current position of the controller's clock
    pub fn now(&self) -> Duration {
        self.queue.now()
    }

    /// When the next timer falls due, if any are pending
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.next_deadline_micros().map(Duration::from_micros)
    }

    /// Number of pending timers
    pub fn pending_timers(&self) -> usize {
        self.queue.len()
    }

    /// Get the presentation state
    pub fn state(&self) -> PresentationState {
        self.inner.borrow().state
    }

    /// Scene index and loop generation of the running session
    pub fn timeline_state(&self) -> Option<TimelineState> {
        self.inner.borrow().session.as_ref().map(|s| s.timeline)
    }

    /// Frame describing what should be on screen now
    pub fn snapshot(&self) -> SceneFrame {
        self.inner.borrow().frame()
    }

    /// Get the current show
    pub fn show(&self) -> ShowFile {
        self.inner.borrow().show.clone()
    }
}

impl Drop for PresentationController {
    fn drop(&mut self) {
        self.stop();
    }
}
