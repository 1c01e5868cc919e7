// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scene timeline: advances a scene index through a sequence on a fixed
//! schedule and signals when one full pass (plus the loop pause) is over.

use std::rc::Rc;

use tracing::debug;

use super::scene::SceneSequence;
use crate::error::PresentationError;
use crate::timing::{ms_to_micros, Handle, TimerQueue};

/// Pause after the last scene before a pass counts as complete
pub const DEFAULT_LOOP_PAUSE_MS: u64 = 1200;

/// Schedules scene advances for one pass at a time
#[derive(Debug, Clone)]
pub struct SceneTimeline {
    /// Pause after the final scene, in milliseconds
    loop_pause_ms: u64,
    /// Handle of the most recent start
    live: Option<Handle>,
}

impl SceneTimeline {
    /// Create a timeline with a custom loop pause
    pub fn new(loop_pause_ms: u64) -> Self {
        Self {
            loop_pause_ms,
            live: None,
        }
    }

    /// Get the loop pause in milliseconds
    pub fn loop_pause_ms(&self) -> u64 {
        self.loop_pause_ms
    }

    /// Set the loop pause (applies to the next start)
    pub fn set_loop_pause_ms(&mut self, loop_pause_ms: u64) {
        self.loop_pause_ms = loop_pause_ms;
    }

    /// Handle of the running pass, if it has not been stopped
    pub fn live_handle(&self, queue: &TimerQueue) -> Option<Handle> {
        self.live.filter(|&handle| queue.is_live(handle))
    }

    /// Schedule one pass over `sequence`, starting now.
    ///
    /// Index 0 is in effect immediately and is never scheduled. For every
    /// later index `i`, `on_advance(i)` fires at the sum of the durations
    /// before it. `on_loop_complete` fires once the whole sequence plus the
    /// loop pause has elapsed, always after the last advance.
    ///
    /// Starting while an earlier handle is still live is rejected; the
    /// earlier pass is left untouched.
    pub fn start<A, L>(
        &mut self,
        queue: &mut TimerQueue,
        sequence: &SceneSequence,
        on_advance: A,
        on_loop_complete: L,
    ) -> Result<Handle, PresentationError>
    where
        A: Fn(usize) + 'static,
        L: FnOnce(&mut TimerQueue) + 'static,
    {
        if let Some(handle) = self.live_handle(queue) {
            return Err(PresentationError::DoubleStart {
                component: "scene timeline",
                handle,
            });
        }

        let handle = queue.issue_handle();
        let on_advance = Rc::new(on_advance);

        for (index, offset) in sequence.offsets_ms().into_iter().enumerate().skip(1) {
            let on_advance = Rc::clone(&on_advance);
            queue.schedule_after(handle, ms_to_micros(offset), move |_| on_advance(index));
        }

        let loop_at_ms = sequence.total_ms().saturating_add(self.loop_pause_ms);
        queue.schedule_after(handle, ms_to_micros(loop_at_ms), on_loop_complete);

        debug!(
            %handle,
            scenes = sequence.len(),
            loop_at_ms,
            "scene timeline started"
        );
        self.live = Some(handle);
        Ok(handle)
    }

    /// Stop a pass. No callback of `handle` fires afterwards.
    ///
    /// Returns true if the handle was live; stopping again is a no-op.
    pub fn stop(&mut self, queue: &mut TimerQueue, handle: Handle) -> bool {
        let was_live = queue.revoke(handle);
        if self.live == Some(handle) {
            self.live = None;
        }
        if was_live {
            debug!(%handle, "scene timeline stopped");
        }
        was_live
    }
}

impl Default for SceneTimeline {
    fn default() -> Self {
        Self::new(DEFAULT_LOOP_PAUSE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum Cue {
        Advance(usize),
        LoopComplete(u64),
    }

    type CueLog = Rc<RefCell<Vec<Cue>>>;

    fn start_recording(
        timeline: &mut SceneTimeline,
        queue: &mut TimerQueue,
        sequence: &SceneSequence,
    ) -> (Handle, CueLog) {
        let log: CueLog = Rc::new(RefCell::new(Vec::new()));
        let advance_log = Rc::clone(&log);
        let loop_log = Rc::clone(&log);
        let handle = timeline
            .start(
                queue,
                sequence,
                move |index| advance_log.borrow_mut().push(Cue::Advance(index)),
                move |q| loop_log.borrow_mut().push(Cue::LoopComplete(q.now_micros() / 1000)),
            )
            .unwrap();
        (handle, log)
    }

    fn advance_indices(log: &CueLog) -> Vec<usize> {
        log.borrow()
            .iter()
            .filter_map(|cue| match cue {
                Cue::Advance(index) => Some(*index),
                Cue::LoopComplete(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_schedules_every_index_after_zero() {
        let mut queue = TimerQueue::new();
        let mut timeline = SceneTimeline::default();
        let seq = SceneSequence::from_durations(&[1700, 3600, 3200, 3200, 1800, 2200]).unwrap();

        let (handle, _log) = start_recording(&mut timeline, &mut queue, &seq);

        // Five advances plus the loop marker
        assert_eq!(queue.pending_for(handle), 6);
        assert_eq!(queue.next_deadline_micros(), Some(1_700_000));
    }

    #[test]
    fn test_advances_at_prefix_sums() {
        let mut queue = TimerQueue::new();
        let mut timeline = SceneTimeline::default();
        let seq = SceneSequence::from_durations(&[1700, 3600, 3200, 3200, 1800, 2200]).unwrap();
        let (_handle, log) = start_recording(&mut timeline, &mut queue, &seq);

        let advances = [(1usize, 1700u64), (2, 5300), (3, 8500), (4, 11700), (5, 13500)];
        for (expected, offset) in advances {
            queue.advance_to((offset - 1) * 1000);
            assert_eq!(advance_indices(&log).last().copied().unwrap_or(0), expected - 1);
            queue.advance_to(offset * 1000);
            assert_eq!(advance_indices(&log).last().copied(), Some(expected));
        }
    }

    #[test]
    fn test_loop_complete_after_total_plus_pause() {
        let mut queue = TimerQueue::new();
        let mut timeline = SceneTimeline::default();
        let seq = SceneSequence::from_durations(&[1700, 3600, 3200, 3200, 1800, 2200]).unwrap();
        let (_handle, log) = start_recording(&mut timeline, &mut queue, &seq);

        queue.advance_to(16_899_999);
        assert!(!log.borrow().iter().any(|c| matches!(c, Cue::LoopComplete(_))));

        queue.advance_to(16_900_000);
        assert_eq!(log.borrow().last(), Some(&Cue::LoopComplete(16_900)));
        assert_eq!(advance_indices(&log), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_single_scene_still_loops() {
        let mut queue = TimerQueue::new();
        let mut timeline = SceneTimeline::new(300);
        let seq = SceneSequence::from_durations(&[1000]).unwrap();
        let (_handle, log) = start_recording(&mut timeline, &mut queue, &seq);

        queue.advance_to(10_000_000);
        assert_eq!(*log.borrow(), vec![Cue::LoopComplete(1300)]);
    }

    #[test]
    fn test_stop_silences_everything() {
        let mut queue = TimerQueue::new();
        let mut timeline = SceneTimeline::default();
        let seq = SceneSequence::from_durations(&[1000, 1000, 1000]).unwrap();
        let (handle, log) = start_recording(&mut timeline, &mut queue, &seq);

        queue.advance_to(1_500_000);
        assert!(timeline.stop(&mut queue, handle));
        queue.advance_to(1_000_000_000);

        assert_eq!(advance_indices(&log), vec![1]);
        assert!(!log.borrow().iter().any(|c| matches!(c, Cue::LoopComplete(_))));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_stop_twice_is_noop() {
        let mut queue = TimerQueue::new();
        let mut timeline = SceneTimeline::default();
        let seq = SceneSequence::from_durations(&[1000]).unwrap();
        let (handle, _log) = start_recording(&mut timeline, &mut queue, &seq);

        assert!(timeline.stop(&mut queue, handle));
        assert!(!timeline.stop(&mut queue, handle));
        assert_eq!(timeline.live_handle(&queue), None);
    }

    #[test]
    fn test_double_start_rejected() {
        let mut queue = TimerQueue::new();
        let mut timeline = SceneTimeline::default();
        let seq = SceneSequence::from_durations(&[1000, 1000]).unwrap();
        let (first, _log) = start_recording(&mut timeline, &mut queue, &seq);

        let result = timeline.start(&mut queue, &seq, |_| {}, |_| {});
        assert_eq!(
            result,
            Err(PresentationError::DoubleStart {
                component: "scene timeline",
                handle: first,
            })
        );
        // The first pass keeps running
        assert_eq!(queue.pending_for(first), 2);
    }

    #[test]
    fn test_restart_after_stop() {
        let mut queue = TimerQueue::new();
        let mut timeline = SceneTimeline::default();
        let seq = SceneSequence::from_durations(&[1000, 1000]).unwrap();
        let (first, _log) = start_recording(&mut timeline, &mut queue, &seq);

        timeline.stop(&mut queue, first);
        let second = timeline.start(&mut queue, &seq, |_| {}, |_| {}).unwrap();
        assert_ne!(first, second);
        assert_eq!(timeline.live_handle(&queue), Some(second));
    }
}
