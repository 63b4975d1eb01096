// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Evaluation errors.
use thiserror::Error;

use holdem_cards::{Card, CardError};

/// Evaluation, equity and draws errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Card parsing or deck error.
    #[error(transparent)]
    Card(#[from] CardError),
    /// Malformed canonical hand notation.
    #[error("Invalid hand '{text}': {reason}")]
    InvalidHand {
        /// The offending text.
        text: String,
        /// Why the text is not a canonical hand.
        reason: String,
    },
    /// Malformed range or player hand.
    #[error("Invalid range '{text}': {reason}")]
    InvalidRange {
        /// The offending text.
        text: String,
        /// Why the text is not a range.
        reason: String,
    },
    /// All the range combos use dead or known cards.
    #[error("Range '{0}' has no combos left after removing known cards")]
    EmptyRange(String),
    /// Not enough players for an equity calculation.
    #[error("At least 2 players are required, got {0}")]
    TooFewPlayers(usize),
    /// Too many players for an equity calculation.
    #[error("At most 10 players are supported, got {0}")]
    TooManyPlayers(usize),
    /// More than 5 board cards.
    #[error("A board has at most 5 cards, got {0}")]
    TooManyBoardCards(usize),
    /// The same card is used twice.
    #[error("Card {0} is used more than once")]
    CardConflict(Card),
    /// The request needs more cards than the deck has.
    #[error("The request needs {needed} unknown cards but only {available} are left")]
    NotEnoughCards {
        /// Cards needed to complete hands and board.
        needed: usize,
        /// Cards left in the deck.
        available: usize,
    },
    /// The range players cannot be dealt hands that share no card.
    #[error("No hole cards assignment for the range players is free of card conflicts")]
    NoValidAssignment,
    /// Sampling with zero trials.
    #[error("The number of trials must be positive")]
    NoTrials,
    /// Draws analysis with an unsupported number of cards.
    #[error("Draws need 2 hole cards and 3 or 4 board cards, got {hole} and {board}")]
    InvalidDrawInput {
        /// Number of hole cards.
        hole: usize,
        /// Number of board cards.
        board: usize,
    },
}

/// Evaluation result type.
pub type Result<T> = std::result::Result<T, EvalError>;
