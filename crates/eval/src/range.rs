// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hand ranges.
use ahash::HashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use holdem_cards::{Card, CardSet, Deck};

use crate::{CanonicalHand, EvalError, Result};

/// A set of concrete two cards combos a player may hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    text: String,
    combos: Vec<[Card; 2]>,
}

impl Range {
    /// Parses a list of canonical hands separated by commas or spaces, e.g.
    /// `"AA, KK, AKs"`.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_excluding(text, CardSet::EMPTY)
    }

    /// Parses a range dropping the combos that use a dead card.
    pub fn parse_excluding(text: &str, dead: CardSet) -> Result<Self> {
        let tokens = text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>();

        if tokens.is_empty() {
            return Err(EvalError::InvalidRange {
                text: text.to_string(),
                reason: "the range is empty".to_string(),
            });
        }

        let mut seen = HashSet::default();
        let mut combos = Vec::new();
        for token in tokens {
            let hand = CanonicalHand::parse(token)?;
            for combo in hand.expand_combos(dead) {
                if seen.insert(CardSet::from_cards(&combo)) {
                    combos.push(combo);
                }
            }
        }

        let text = text.trim().to_string();
        if combos.is_empty() {
            return Err(EvalError::EmptyRange(text));
        }

        Ok(Self { text, combos })
    }

    /// The range of all 1326 two cards hands.
    pub fn full() -> Self {
        let mut combos = Vec::with_capacity(1326);
        Deck::default().for_each(2, |cards| combos.push([cards[0], cards[1]]));
        Self {
            text: "random".to_string(),
            combos,
        }
    }

    /// Returns a range without the combos that use a dead card, fails if no
    /// combo is left.
    pub fn excluding(&self, dead: CardSet) -> Result<Self> {
        let combos = self
            .combos
            .iter()
            .filter(|[c1, c2]| !dead.contains(*c1) && !dead.contains(*c2))
            .copied()
            .collect::<Vec<_>>();

        if combos.is_empty() {
            return Err(EvalError::EmptyRange(self.text.clone()));
        }

        Ok(Self {
            text: self.text.clone(),
            combos,
        })
    }

    /// The range combos.
    pub fn combos(&self) -> &[[Card; 2]] {
        &self.combos
    }

    /// Number of combos.
    pub fn len(&self) -> usize {
        self.combos.len()
    }

    /// Checks if the range has no combos.
    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }

    /// The text this range was parsed from.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
