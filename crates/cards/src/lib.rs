// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hold'em Lab cards types.
//!
//! This crate define types to create and parse cards:
//!
//! ```
//! # use holdem_cards::{Card, Rank, Suit, parse_cards};
//! let ah = Card::new(Rank::Ace, Suit::Hearts);
//! let kd: Card = "Kd".parse().unwrap();
//! assert_eq!(parse_cards("Ah Kd").unwrap(), vec![ah, kd]);
//! ```
//!
//! a [CardSet] bitset for fast conflict checks, and a [Deck] type for
//! shuffling, dealing, and iterating cards in the deck.
//!
//! For example to iterate through all 7 cards hands:
//!
//! ```no_run
//! # use holdem_cards::Deck;
//! // Iterate through all 7 cards hands (133M hands).
//! let mut counter = 0;
//! Deck::default().for_each(7, |hand| {
//!     counter += 1;
//! });
//! assert_eq!(counter, 133_784_560);
//! ```
//!
//! Iteration can be split across tasks, the closure `task_id` can be used to
//! store per task data to reduce contention:
//!
//! ```
//! # use std::sync::atomic;
//! # use holdem_cards::Deck;
//! // Iterate through all 3 cards flops.
//! let counter = atomic::AtomicU64::new(0);
//! Deck::default().par_for_each(4, 3, |task_id, hand| {
//!     assert_eq!(hand.len(), 3);
//!     counter.fetch_add(1, atomic::Ordering::Relaxed);
//! });
//! assert_eq!(counter.load(atomic::Ordering::Relaxed), 22_100);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

mod card;
pub use card::{Card, Rank, Suit, format_cards, parse_cards, parse_cards_excluding};

mod card_set;
pub use card_set::CardSet;

mod deck;
pub use deck::{Deck, combinations};

mod error;
pub use error::{CardError, Result};
