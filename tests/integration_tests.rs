// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for REEL
//!
//! These tests drive a whole show through the public API on the virtual
//! clock, stepping from deadline to deadline and timestamping every output.

use std::cell::{Cell, RefCell};
use std::fs;
use std::rc::Rc;
use std::time::Duration;

use reel::config::watcher::validate_config;
use reel::config::ShowFile;
use reel::error::{ConfigurationError, PresentationError};
use reel::narration::{SharedSpeech, SpeechBackend, Utterance, Voice, VoiceHint};
use reel::presentation::{
    PresentationController, PresentationState, SceneFrame, SceneView, Soundtrack,
};
use tempfile::tempdir;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Scene(usize, u64),
    Stopped,
    Spoke(String),
    CancelAll,
    MusicStart,
    MusicPause,
}

/// Output log shared by every mock, stamped with the driving clock
#[derive(Clone, Default)]
struct Recorder {
    now: Rc<Cell<Duration>>,
    events: Rc<RefCell<Vec<(Duration, Event)>>>,
}

impl Recorder {
    fn push(&self, event: Event) {
        self.events.borrow_mut().push((self.now.get(), event));
    }

    fn all(&self) -> Vec<(Duration, Event)> {
        self.events.borrow().clone()
    }

    fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Times at which the scene index changed to a non-zero value
    fn advance_times(&self) -> Vec<(u64, usize)> {
        self.all()
            .into_iter()
            .filter_map(|(at, event)| match event {
                Event::Scene(index, _) if index > 0 => Some((at.as_micros() as u64, index)),
                _ => None,
            })
            .collect()
    }

    fn spoken_times(&self) -> Vec<u64> {
        self.all()
            .into_iter()
            .filter_map(|(at, event)| match event {
                Event::Spoke(_) => Some(at.as_micros() as u64),
                _ => None,
            })
            .collect()
    }

    /// Times at which a new loop generation was first rendered
    fn loop_times(&self) -> Vec<(u64, u64)> {
        let mut seen = 0;
        self.all()
            .into_iter()
            .filter_map(|(at, event)| match event {
                Event::Scene(0, generation) if generation > seen => {
                    seen = generation;
                    Some((at.as_micros() as u64, generation))
                }
                _ => None,
            })
            .collect()
    }
}

struct MockSpeech {
    recorder: Recorder,
    voices: Vec<Voice>,
    hints: Vec<VoiceHint>,
}

impl SpeechBackend for MockSpeech {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn speak(&mut self, utterance: Utterance) {
        self.hints.push(utterance.voice);
        self.recorder.push(Event::Spoke(utterance.text));
    }

    fn cancel_all(&mut self) {
        self.recorder.push(Event::CancelAll);
    }
}

struct MockView(Recorder);

impl SceneView for MockView {
    fn render(&mut self, frame: &SceneFrame) {
        match frame.state {
            PresentationState::Running => {
                self.0.push(Event::Scene(frame.scene_index, frame.loop_generation))
            }
            PresentationState::Stopped => self.0.push(Event::Stopped),
        }
    }
}

struct MockMusic(Recorder);

impl Soundtrack for MockMusic {
    fn play_from_start(&mut self) {
        self.0.push(Event::MusicStart);
    }

    fn pause(&mut self) {
        self.0.push(Event::MusicPause);
    }
}

struct Harness {
    controller: PresentationController,
    recorder: Recorder,
    speech: Rc<RefCell<MockSpeech>>,
}

impl Harness {
    fn new(show: ShowFile) -> Self {
        Self::with_voices(show, Vec::new())
    }

    fn with_voices(show: ShowFile, voices: Vec<Voice>) -> Self {
        let recorder = Recorder::default();
        let speech = Rc::new(RefCell::new(MockSpeech {
            recorder: recorder.clone(),
            voices,
            hints: Vec::new(),
        }));
        let shared: SharedSpeech = speech.clone();
        let controller = PresentationController::new(show)
            .with_shared_speech(shared)
            .with_view(MockView(recorder.clone()))
            .with_soundtrack(MockMusic(recorder.clone()));
        Self {
            controller,
            recorder,
            speech,
        }
    }

    fn without_speech(show: ShowFile) -> Self {
        let recorder = Recorder::default();
        let speech = Rc::new(RefCell::new(MockSpeech {
            recorder: recorder.clone(),
            voices: Vec::new(),
            hints: Vec::new(),
        }));
        let controller =
            PresentationController::new(show).with_view(MockView(recorder.clone()));
        Self {
            controller,
            recorder,
            speech,
        }
    }

    fn start(&mut self) -> Result<bool, PresentationError> {
        self.recorder.now.set(self.controller.now());
        self.controller.start()
    }

    fn stop(&mut self) -> bool {
        self.recorder.now.set(self.controller.now());
        self.controller.stop()
    }

    /// Step deadline by deadline up to `end` (in milliseconds)
    fn run_until_ms(&mut self, end: u64) {
        let end = Duration::from_millis(end);
        while let Some(deadline) = self.controller.next_deadline() {
            if deadline > end {
                break;
            }
            self.recorder.now.set(deadline);
            self.controller.advance_to(deadline);
        }
        self.recorder.now.set(end);
        self.controller.advance_to(end);
    }
}

fn micros(ms: f64) -> u64 {
    (ms * 1000.0) as u64
}

/// Built-in show with narration switched off
fn silent_show() -> ShowFile {
    let mut show = ShowFile::default();
    show.narration.enabled = false;
    show
}

#[test]
fn test_scene_advances_and_loop_boundary() {
    let mut harness = Harness::new(silent_show());
    assert_eq!(harness.start(), Ok(true));
    harness.run_until_ms(16_899);

    assert_eq!(
        harness.recorder.advance_times(),
        vec![
            (micros(1700.0), 1),
            (micros(5300.0), 2),
            (micros(8500.0), 3),
            (micros(11_700.0), 4),
            (micros(13_500.0), 5),
        ]
    );
    assert!(harness.recorder.loop_times().is_empty());

    harness.run_until_ms(16_900);
    assert_eq!(harness.recorder.loop_times(), vec![(micros(16_900.0), 1)]);
}

/// Built-in scenes with narration lines of 27 and 33 characters
fn scenario_show() -> ShowFile {
    let mut show = ShowFile::default();
    show.narration.lines = vec![
        "Ab design karega AI vs AI!!".to_string(),
        "Kaunsa model banayega best look??".to_string(),
        "Tum decide karoge, vote do aur dekho kaun jeetega!".to_string(),
    ];
    show
}

#[test]
fn test_narration_offsets() {
    let mut harness = Harness::new(scenario_show());
    harness.start().unwrap();
    harness.run_until_ms(16_000);

    assert_eq!(
        harness.recorder.spoken_times(),
        vec![0, micros(2362.5), micros(5250.0)]
    );
}

#[test]
fn test_builtin_narration_script() {
    let mut harness = Harness::new(ShowFile::default());
    harness.start().unwrap();
    harness.run_until_ms(16_000);

    // Lines of 26 and 32 characters
    assert_eq!(
        harness.recorder.spoken_times(),
        vec![0, micros(2275.0), micros(5075.0)]
    );
    let texts: Vec<String> = harness
        .recorder
        .all()
        .into_iter()
        .filter_map(|(_, event)| match event {
            Event::Spoke(text) => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(
        texts,
        vec![
            "Ab design karega AI vs AI!".to_string(),
            "Kaunsa model banayega best look?".to_string(),
            "Tum decide karoge ? vote do aur dekho kaun jeetega DesignArena mein!".to_string(),
        ]
    );
}

#[test]
fn test_no_drift_over_many_loops() {
    let mut harness = Harness::new(scenario_show());
    harness.start().unwrap();
    harness.run_until_ms(16_900 * 7 - 1);

    let loops = harness.recorder.loop_times();
    assert_eq!(loops.len(), 6);
    for (pass, (at, generation)) in loops.iter().enumerate() {
        assert_eq!(*generation, pass as u64 + 1);
        assert_eq!(*at, micros(16_900.0) * (pass as u64 + 1));
    }

    // Every pass repeats the same scene and narration offsets
    let advances = harness.recorder.advance_times();
    assert_eq!(advances.len(), 5 * 7);
    for (i, (at, index)) in advances.iter().enumerate() {
        let pass = (i / 5) as u64;
        let offset = [1700.0, 5300.0, 8500.0, 11_700.0, 13_500.0][i % 5];
        assert_eq!(*index, i % 5 + 1);
        assert_eq!(*at, pass * micros(16_900.0) + micros(offset));
    }

    let spoken = harness.recorder.spoken_times();
    assert_eq!(spoken.len(), 3 * 7);
    for (i, at) in spoken.iter().enumerate() {
        let pass = (i / 3) as u64;
        let offset = [0.0, 2362.5, 5250.0][i % 3];
        assert_eq!(*at, pass * micros(16_900.0) + micros(offset));
    }

    assert_eq!(
        harness.controller.timeline_state().unwrap().loop_generation,
        6
    );
}

#[test]
fn test_stop_leaves_silence() {
    let mut harness = Harness::new(ShowFile::default());
    harness.start().unwrap();
    harness.run_until_ms(3000);

    assert!(harness.stop());
    let after_stop = harness.recorder.len();
    let tail: Vec<Event> = harness
        .recorder
        .all()
        .into_iter()
        .skip(after_stop - 3)
        .map(|(_, event)| event)
        .collect();
    assert_eq!(tail, vec![Event::CancelAll, Event::MusicPause, Event::Stopped]);

    harness.run_until_ms(100_000);
    assert_eq!(harness.recorder.len(), after_stop);
    assert_eq!(harness.controller.pending_timers(), 0);

    // Second stop has no observable effect
    assert!(!harness.stop());
    assert_eq!(harness.recorder.len(), after_stop);
}

#[test]
fn test_stop_before_first_advance() {
    let mut harness = Harness::new(silent_show());
    harness.start().unwrap();
    harness.run_until_ms(1000);
    harness.stop();
    harness.run_until_ms(20_000);

    assert!(harness.recorder.advance_times().is_empty());
    assert!(harness.recorder.loop_times().is_empty());
}

#[test]
fn test_missing_speech_backend_keeps_timeline() {
    let mut harness = Harness::without_speech(ShowFile::default());
    harness.start().unwrap();
    harness.run_until_ms(16_900);

    assert!(harness.recorder.spoken_times().is_empty());
    assert_eq!(harness.recorder.advance_times().len(), 5);
    assert_eq!(harness.recorder.loop_times(), vec![(micros(16_900.0), 1)]);
    assert!(harness.speech.borrow().hints.is_empty());
}

#[test]
fn test_invalid_show_schedules_nothing() {
    let mut show = ShowFile::default();
    show.scenes[2].duration_ms = 0;
    let mut harness = Harness::new(show);

    assert_eq!(
        harness.start(),
        Err(PresentationError::Configuration(
            ConfigurationError::NonPositiveDuration { index: 2 }
        ))
    );
    assert_eq!(harness.controller.pending_timers(), 0);
    assert_eq!(harness.controller.state(), PresentationState::Stopped);
    harness.run_until_ms(20_000);
    assert_eq!(harness.recorder.len(), 0);
}

#[test]
fn test_empty_script_only_matters_with_narration() {
    let mut show = ShowFile::default();
    show.narration.lines.clear();
    let mut harness = Harness::new(show.clone());
    assert_eq!(
        harness.start(),
        Err(PresentationError::Configuration(ConfigurationError::EmptyScript))
    );

    show.narration.enabled = false;
    let mut harness = Harness::new(show);
    assert_eq!(harness.start(), Ok(true));
}

#[test]
fn test_double_start_does_not_duplicate() {
    let mut harness = Harness::new(ShowFile::default());
    harness.start().unwrap();
    assert_eq!(harness.start(), Ok(false));
    harness.run_until_ms(16_899);

    assert_eq!(harness.recorder.advance_times().len(), 5);
    assert_eq!(harness.recorder.spoken_times().len(), 3);
}

#[test]
fn test_soundtrack_follows_lifecycle() {
    let mut harness = Harness::new(silent_show());
    harness.start().unwrap();
    harness.run_until_ms(40_000);
    harness.stop();

    let music: Vec<Event> = harness
        .recorder
        .all()
        .into_iter()
        .map(|(_, event)| event)
        .filter(|event| matches!(event, Event::MusicStart | Event::MusicPause))
        .collect();
    // Loop restarts do not rewind the music
    assert_eq!(music, vec![Event::MusicStart, Event::MusicPause]);
}

#[test]
fn test_preferred_voice_selected() {
    let voices = vec![
        Voice::new("Samantha", "en-US"),
        Voice::new("Lekha", "hi-IN"),
    ];
    let mut harness = Harness::with_voices(ShowFile::default(), voices);
    harness.start().unwrap();
    harness.run_until_ms(6000);

    let hints = harness.speech.borrow().hints.clone();
    assert_eq!(hints.len(), 3);
    for hint in hints {
        assert_eq!(hint, VoiceHint::Preferred(Voice::new("Lekha", "hi-IN")));
    }
}

#[test]
fn test_voice_catalog_reread_each_line() {
    let mut harness = Harness::new(ShowFile::default());
    harness.start().unwrap();

    // Catalog becomes available after the first line was spoken
    harness
        .speech
        .borrow_mut()
        .voices
        .push(Voice::new("Daniel", "en-GB"));
    harness.run_until_ms(6000);

    let hints = harness.speech.borrow().hints.clone();
    assert_eq!(hints[0], VoiceHint::BackendDefault);
    assert_eq!(hints[1], VoiceHint::Fallback(Voice::new("Daniel", "en-GB")));
    assert_eq!(hints[2], VoiceHint::Fallback(Voice::new("Daniel", "en-GB")));
}

#[test]
fn test_mute_skips_narration() {
    let mut harness = Harness::new(ShowFile::default());
    harness.controller.set_narration_enabled(false);
    harness.start().unwrap();
    harness.run_until_ms(16_899);

    assert!(harness.recorder.spoken_times().is_empty());
    assert_eq!(harness.recorder.advance_times().len(), 5);
}

#[test]
fn test_reload_restarts_from_current_time() {
    let mut harness = Harness::new(silent_show());
    harness.start().unwrap();
    harness.run_until_ms(4000);

    let mut show = silent_show();
    show.scenes.truncate(3);
    show.show.loop_pause_ms = 500;
    harness.recorder.now.set(harness.controller.now());
    harness.controller.reload(show).unwrap();

    // 1700 + 3600 + 3200 + 500 after the reload point
    harness.run_until_ms(4000 + 8999);
    assert!(harness.recorder.loop_times().is_empty());
    harness.run_until_ms(4000 + 9000);
    assert_eq!(harness.recorder.loop_times(), vec![(micros(13_000.0), 1)]);
}

#[test]
fn test_show_from_yaml_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("show.yaml");
    fs::write(
        &path,
        r#"
show:
  name: "Short Show"
  loop_pause_ms: 100
scenes:
  - name: first
    duration_ms: 400
  - name: second
    duration_ms: 600
narration:
  enabled: false
"#,
    )
    .unwrap();

    let show = validate_config(&path).unwrap();
    let mut harness = Harness::new(show);
    harness.start().unwrap();
    harness.run_until_ms(1100);

    assert_eq!(harness.recorder.advance_times(), vec![(micros(400.0), 1)]);
    assert_eq!(harness.recorder.loop_times(), vec![(micros(1100.0), 1)]);
    assert_eq!(harness.controller.snapshot().scene_name, "first");
}

#[test]
fn test_show_from_toml_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("show.toml");
    fs::write(
        &path,
        r#"
[show]
name = "Toml Show"

[[scenes]]
duration_ms = 1000

[narration]
min_gap_ms = 100
max_gap_ms = 200
reference_length = 10
lines = ["one", "two"]
"#,
    )
    .unwrap();

    let show = ShowFile::load(&path).unwrap();
    let mut harness = Harness::new(show);
    harness.start().unwrap();
    harness.run_until_ms(1000);

    // "one" is 3 chars: max(100, 200 * 3 / 10) = 100
    assert_eq!(harness.recorder.spoken_times(), vec![0, micros(100.0)]);
    assert_eq!(harness.controller.snapshot().scene_name, "scene-0");
}

#[test]
fn test_invalid_file_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(&path, "narration:\n  min_gap_ms: 5000\n  max_gap_ms: 100\n").unwrap();

    assert!(validate_config(&path).is_err());
}
