// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hold'em Lab hand evaluator and equity engine.
//!
//! Poker hand evaluator for 5, 6 and 7 cards hands, to evaluate a hand use
//! [evaluate] and compare the resulting [HandRank]s:
//!
//! ```
//! # use holdem_eval::*;
//! # use holdem_cards::parse_cards;
//! let straight = evaluate(&parse_cards("Ah 2d 3c 4s 5h 9d Kc").unwrap());
//! let trips = evaluate(&parse_cards("Ah Ad Ac 4s 7h 9d Kc").unwrap());
//! assert!(straight > trips);
//! assert_eq!(straight.category(), HandCategory::Straight);
//! assert_eq!(straight.describe(), "Straight, Five high");
//! ```
//!
//! The crate also provides the 169 [CanonicalHand] starting hands classes,
//! [Range]s of hole cards, [analyze_draws] for flush and straight draws on the
//! flop and turn, and [calculate_equity] to compute players equities by
//! enumeration or Monte Carlo sampling.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

mod canonical;
pub use canonical::{
    CanonicalHand, CanonicalHandInfo, NUM_CANONICAL_HANDS, all_canonical_hands, canonize,
    is_equivalent,
};

mod draws;
pub use draws::{DrawAnalysis, DrawType, FlushDraw, StraightDraw, analyze_draws};

mod equity;
pub use equity::{
    EquityMode, EquityRequest, EquityResult, MAX_PLAYERS, PlayerEquity, PlayerSpec,
    calculate_equity, equity_vs_random,
};

mod error;
pub use error::{EvalError, Result};

mod eval;
pub use eval::{HandCategory, HandRank, evaluate, evaluate_with_best, evaluate5, evaluate7, find_winners};

mod range;
pub use range::Range;
