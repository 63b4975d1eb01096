// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Game errors.
use thiserror::Error;

use holdem_cards::CardError;
use holdem_eval::EvalError;

/// Game state and replay errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The number of players is not in 2..=10.
    #[error("A hand needs 2 to 10 players, got {0}")]
    InvalidPlayers(usize),
    /// The hand is complete and cannot advance.
    #[error("The hand is complete")]
    HandComplete,
    /// The hand has not been dealt yet.
    #[error("The hand has not started")]
    NotStarted,
    /// The state has no deck to deal from, e.g. it was replayed from a log.
    #[error("The hand has no deck, a replayed hand cannot advance")]
    NoDeck,
    /// A malformed event log.
    #[error("Invalid event log at event {index}: {reason}")]
    InvalidLog {
        /// The index of the offending event.
        index: usize,
        /// What is wrong with the event.
        reason: String,
    },
    /// Card or deck error.
    #[error(transparent)]
    Card(#[from] CardError),
    /// Evaluation or equity error.
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Game result type.
pub type Result<T> = std::result::Result<T, GameError>;
