// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Cards and deck errors.
use thiserror::Error;

use crate::Card;

/// Cards and deck errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    /// A card token could not be parsed.
    #[error("Invalid card '{text}': {reason}")]
    Parse {
        /// The offending text.
        text: String,
        /// Why the text is not a card.
        reason: String,
    },
    /// A card appears more than once.
    #[error("Duplicate card {0}")]
    Duplicate(Card),
    /// A card is excluded from the current context (dealt or dead).
    #[error("Card {0} is not available")]
    Excluded(Card),
    /// A card is not in the deck.
    #[error("Card {0} not in deck")]
    NotInDeck(Card),
    /// Dealing more cards than the deck holds.
    #[error("Cannot deal {requested} cards, only {available} left in the deck")]
    DeckExhausted {
        /// The number of cards requested.
        requested: usize,
        /// The number of cards left in the deck.
        available: usize,
    },
}

/// Cards result type.
pub type Result<T> = std::result::Result<T, CardError>;
