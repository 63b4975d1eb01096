// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Canonical starting hands.
//!
//! The 1326 two cards starting hands fall into 169 classes that only differ
//! by suits permutations: 13 pairs, 78 suited and 78 offsuit hands. The
//! classes are usually shown in a 13x13 matrix with pairs on the diagonal,
//! suited hands above and offsuit hands below it.
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use holdem_cards::{Card, CardSet, Rank, Suit};

use crate::{EvalError, Result};

/// The number of canonical hands.
pub const NUM_CANONICAL_HANDS: usize = 169;

/// A canonical starting hand class, e.g. `AKs`, `QQ`, `72o`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CanonicalHand {
    high: Rank,
    low: Rank,
    suited: bool,
}

impl CanonicalHand {
    /// Creates a canonical hand, the ranks can be given in any order.
    pub fn try_new(r1: Rank, r2: Rank, suited: bool) -> Result<Self> {
        let (high, low) = if r1 >= r2 { (r1, r2) } else { (r2, r1) };
        if high == low && suited {
            return Err(EvalError::InvalidHand {
                text: format!("{high}{low}s"),
                reason: "a pair cannot be suited".to_string(),
            });
        }

        Ok(Self { high, low, suited })
    }

    /// Creates a pair.
    pub fn pair(rank: Rank) -> Self {
        Self {
            high: rank,
            low: rank,
            suited: false,
        }
    }

    /// Parses a canonical hand notation, case insensitive.
    ///
    /// Pairs are two ranks (`QQ`), other hands need the `s` or `o` suffix
    /// (`AKs`, `T9o`), ranks can be in any order (`KAs` is `AKs`).
    pub fn parse(text: &str) -> Result<Self> {
        let err = |reason: &str| EvalError::InvalidHand {
            text: text.to_string(),
            reason: reason.to_string(),
        };

        let chars = text.trim().chars().collect::<Vec<_>>();
        if !(2..=3).contains(&chars.len()) {
            return Err(err("expected 2 or 3 characters"));
        }

        let r1 = Rank::from_char(chars[0]).ok_or_else(|| err("invalid first rank"))?;
        let r2 = Rank::from_char(chars[1]).ok_or_else(|| err("invalid second rank"))?;

        let suited = match chars.get(2).map(|c| c.to_ascii_lowercase()) {
            None if r1 == r2 => false,
            None => return Err(err("missing 's' or 'o' suffix")),
            Some(_) if r1 == r2 => return Err(err("a pair takes no suffix")),
            Some('s') => true,
            Some('o') => false,
            Some(_) => return Err(err("suffix must be 's' or 'o'")),
        };

        Self::try_new(r1, r2, suited)
    }

    /// The higher rank.
    pub fn high(&self) -> Rank {
        self.high
    }

    /// The lower rank, equal to the higher rank for pairs.
    pub fn low(&self) -> Rank {
        self.low
    }

    /// Checks if both cards have the same suit.
    pub fn is_suited(&self) -> bool {
        self.suited
    }

    /// Checks if this is a pair.
    pub fn is_pair(&self) -> bool {
        self.high == self.low
    }

    /// Number of concrete combos: 6 for pairs, 4 suited, 12 offsuit.
    pub fn combo_count(&self) -> usize {
        if self.is_pair() {
            6
        } else if self.suited {
            4
        } else {
            12
        }
    }

    /// The rank distance, 0 for pairs and 1 for connectors.
    pub fn gap(&self) -> u8 {
        self.high.value() - self.low.value()
    }

    /// The row in the 13x13 matrix, the aces row is 0.
    pub fn matrix_row(&self) -> usize {
        if self.suited || self.is_pair() {
            matrix_index(self.high)
        } else {
            matrix_index(self.low)
        }
    }

    /// The column in the 13x13 matrix, the aces column is 0.
    pub fn matrix_col(&self) -> usize {
        if self.suited || self.is_pair() {
            matrix_index(self.low)
        } else {
            matrix_index(self.high)
        }
    }

    /// All the concrete combos in this class.
    pub fn combos(&self) -> Vec<[Card; 2]> {
        self.expand_combos(CardSet::EMPTY)
    }

    /// The concrete combos in this class that use no dead card.
    pub fn expand_combos(&self, dead: CardSet) -> Vec<[Card; 2]> {
        let mut combos = Vec::with_capacity(self.combo_count());
        let suits = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

        for (i, &s1) in suits.iter().enumerate() {
            if self.is_pair() {
                for &s2 in &suits[i + 1..] {
                    combos.push([Card::new(self.high, s1), Card::new(self.low, s2)]);
                }
            } else if self.suited {
                combos.push([Card::new(self.high, s1), Card::new(self.low, s1)]);
            } else {
                for &s2 in suits.iter().filter(|&&s| s != s1) {
                    combos.push([Card::new(self.high, s1), Card::new(self.low, s2)]);
                }
            }
        }

        combos.retain(|[c1, c2]| !dead.contains(*c1) && !dead.contains(*c2));
        combos
    }

    /// A serializable description of this hand.
    pub fn info(&self) -> CanonicalHandInfo {
        CanonicalHandInfo {
            notation: self.to_string(),
            high: self.high,
            low: self.low,
            suited: self.suited,
            pair: self.is_pair(),
            combos: self.combo_count(),
            row: self.matrix_row(),
            col: self.matrix_col(),
        }
    }
}

fn matrix_index(rank: Rank) -> usize {
    usize::from(Rank::Ace.value() - rank.value())
}

impl fmt::Display for CanonicalHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.high, self.low)?;
        match (self.is_pair(), self.suited) {
            (true, _) => Ok(()),
            (false, true) => f.write_str("s"),
            (false, false) => f.write_str("o"),
        }
    }
}

impl FromStr for CanonicalHand {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A canonical hand description for calling layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalHandInfo {
    /// The hand notation, e.g. "AKs".
    pub notation: String,
    /// The higher rank.
    pub high: Rank,
    /// The lower rank.
    pub low: Rank,
    /// Suited flag.
    pub suited: bool,
    /// Pair flag.
    pub pair: bool,
    /// Number of concrete combos.
    pub combos: usize,
    /// Matrix row, 0 is the aces row.
    pub row: usize,
    /// Matrix column, 0 is the aces column.
    pub col: usize,
}

/// Returns the 169 canonical hands in matrix order, row by row starting
/// from `AA, AKs, AQs, ...` and ending with `..., 32o, 22`.
pub fn all_canonical_hands() -> Vec<CanonicalHand> {
    let ranks = Rank::ranks().rev().collect::<Vec<_>>();
    let mut hands = Vec::with_capacity(NUM_CANONICAL_HANDS);

    for (row, &r1) in ranks.iter().enumerate() {
        for (col, &r2) in ranks.iter().enumerate() {
            let hand = match row.cmp(&col) {
                std::cmp::Ordering::Equal => CanonicalHand::pair(r1),
                std::cmp::Ordering::Less => CanonicalHand {
                    high: r1,
                    low: r2,
                    suited: true,
                },
                std::cmp::Ordering::Greater => CanonicalHand {
                    high: r2,
                    low: r1,
                    suited: false,
                },
            };

            hands.push(hand);
        }
    }

    hands
}

/// Returns the canonical class of two hole cards.
///
/// # Panics
///
/// Panics if the two cards are the same card.
pub fn canonize(c1: Card, c2: Card) -> CanonicalHand {
    assert_ne!(c1, c2, "Cannot canonize a hand with the same card twice");

    let (high, low) = if c1.rank() >= c2.rank() {
        (c1.rank(), c2.rank())
    } else {
        (c2.rank(), c1.rank())
    };

    CanonicalHand {
        high,
        low,
        suited: high != low && c1.suit() == c2.suit(),
    }
}

/// Checks if two hole cards hands belong to the same canonical class.
pub fn is_equivalent(h1: [Card; 2], h2: [Card; 2]) -> bool {
    canonize(h1[0], h1[1]) == canonize(h2[0], h2[1])
}
