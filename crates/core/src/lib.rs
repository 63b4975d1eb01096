// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hold'em Lab hand simulation.
//!
//! A [GameState] deals a single hand from a seeded deck, it moves from the
//! preflop to showdown and records each step in an [EventLog]:
//!
//! ```
//! # use holdem_core::*;
//! let mut state = GameState::new(3, 42).unwrap();
//! let winners = state.run_to_showdown().unwrap();
//! assert_eq!(state.stage(), Stage::Complete);
//!
//! // The log rebuilds the same hand.
//! let replayed = GameState::replay(state.event_log().unwrap()).unwrap();
//! assert_eq!(replayed.board(), state.board());
//! assert_eq!(replayed.winners(), Some(&winners[..]));
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

mod error;
pub use error::{GameError, Result};

pub mod event_log;
pub use event_log::{Event, EventKind, EventLog};

mod game_state;
pub use game_state::GameState;

pub mod replay;
pub use replay::{Replayer, Snapshot};

mod stage;
pub use stage::Stage;
