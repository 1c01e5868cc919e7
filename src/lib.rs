// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Reel - looping, narrated scene presentations.
//!
//! A show is a fixed sequence of timed scenes played in an endless loop,
//! optionally accompanied by spoken narration lines spaced by their length.
//! Everything runs on a single virtual clock (`timing::TimerQueue`) so the
//! engine can be driven in real time or stepped deterministically in tests.

pub mod arrangement;
pub mod config;
pub mod error;
pub mod narration;
pub mod presentation;
pub mod timing;
