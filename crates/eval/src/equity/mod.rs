// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Equity calculation.
//!
//! Equity is computed either by enumerating all the boards and hands
//! consistent with the known cards, or by Monte Carlo sampling. Both modes
//! share the same accumulation: the players with the best hand share one unit
//! of equity for each outcome.
//!
//! ```
//! # use holdem_eval::{EquityRequest, PlayerSpec, calculate_equity};
//! # use holdem_cards::parse_cards;
//! let request = EquityRequest::new(vec![
//!     PlayerSpec::parse("AhAd").unwrap(),
//!     PlayerSpec::parse("KhKd").unwrap(),
//! ])
//! .with_board(parse_cards("2c 7s 9d").unwrap())
//! .enumerate();
//!
//! let result = calculate_equity(&request).unwrap();
//! assert_eq!(result.samples, 990);
//! assert!(result.players[0].equity > 0.9);
//! ```
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{fmt, num::NonZeroUsize, thread, time::Duration};

use holdem_cards::{Card, CardSet, parse_cards};

use crate::{EvalError, Range, Result};

mod accumulator;
mod enumerate;
mod sample;

/// Maximum number of players.
pub const MAX_PLAYERS: usize = 10;

/// The hands a player may hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerSpec {
    /// Known hole cards.
    Exact([Card; 2]),
    /// Any combo from a range.
    Range(Range),
    /// Any two cards.
    Random,
}

impl PlayerSpec {
    /// Parses exact cards (`"AhKh"`), a range (`"AKs,QQ"`), or `"random"`.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("random") {
            return Ok(PlayerSpec::Random);
        }

        match parse_cards(text) {
            Ok(cards) => match cards.as_slice() {
                &[c1, c2] => Ok(PlayerSpec::Exact([c1, c2])),
                _ => Err(EvalError::InvalidRange {
                    text: text.to_string(),
                    reason: format!("expected 2 hole cards, got {}", cards.len()),
                }),
            },
            Err(_) => Range::parse(text).map(PlayerSpec::Range),
        }
    }
}

impl fmt::Display for PlayerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerSpec::Exact([c1, c2]) => write!(f, "{c1}{c2}"),
            PlayerSpec::Range(range) => write!(f, "{range}"),
            PlayerSpec::Random => f.write_str("random"),
        }
    }
}

/// How equity is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquityMode {
    /// Every board and hands assignment, exact.
    Enumerate,
    /// Random trials.
    Sample {
        /// Number of trials.
        trials: u64,
    },
}

/// An equity calculation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityRequest {
    /// The players hands.
    pub players: Vec<PlayerSpec>,
    /// Known board cards.
    pub board: Vec<Card>,
    /// Cards out of play.
    pub dead: Vec<Card>,
    /// The calculation mode.
    pub mode: EquityMode,
    /// Sampling seed, drawn from the OS when missing.
    pub seed: Option<u64>,
    /// Number of worker tasks, capped at four per CPU.
    pub tasks: usize,
}

impl EquityRequest {
    /// Default number of sampling trials.
    pub const DEFAULT_TRIALS: u64 = 10_000;

    /// Creates a sampling request with default trials and one task per CPU.
    pub fn new(players: Vec<PlayerSpec>) -> Self {
        Self {
            players,
            board: Vec::new(),
            dead: Vec::new(),
            mode: EquityMode::Sample {
                trials: Self::DEFAULT_TRIALS,
            },
            seed: None,
            tasks: thread::available_parallelism().map_or(1, NonZeroUsize::get),
        }
    }

    /// Sets the known board cards.
    pub fn with_board(mut self, board: Vec<Card>) -> Self {
        self.board = board;
        self
    }

    /// Sets the dead cards.
    pub fn with_dead(mut self, dead: Vec<Card>) -> Self {
        self.dead = dead;
        self
    }

    /// Uses enumeration.
    pub fn enumerate(mut self) -> Self {
        self.mode = EquityMode::Enumerate;
        self
    }

    /// Uses sampling with the given number of trials.
    pub fn trials(mut self, trials: u64) -> Self {
        self.mode = EquityMode::Sample { trials };
        self
    }

    /// Sets the sampling seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the number of worker tasks.
    pub fn tasks(mut self, tasks: usize) -> Self {
        self.tasks = tasks;
        self
    }
}

/// A player equity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEquity {
    /// Fraction of outcomes won outright.
    pub win: f64,
    /// Fraction of outcomes split with other players.
    pub tie: f64,
    /// Wins plus each split divided by the number of players sharing it,
    /// averaged over all outcomes.
    pub equity: f64,
    /// Outcomes won outright.
    pub wins: u64,
    /// Outcomes split.
    pub ties: u64,
}

/// An equity calculation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityResult {
    /// Per player equity in request order.
    pub players: Vec<PlayerEquity>,
    /// Number of outcomes evaluated.
    pub samples: u64,
    /// Wall clock time.
    pub elapsed: Duration,
    /// The calculation mode.
    pub mode: EquityMode,
    /// The seed used for sampling.
    pub seed: Option<u64>,
}

/// A validated player hand.
#[derive(Debug, Clone)]
enum Seat {
    Exact([Card; 2]),
    Range(Vec<[Card; 2]>),
    Random,
}

/// A validated request.
#[derive(Debug)]
struct Setup {
    seats: Vec<Seat>,
    board: Vec<Card>,
    known: CardSet,
}

impl Setup {
    fn new(request: &EquityRequest) -> Result<Self> {
        let num_players = request.players.len();
        if num_players < 2 {
            return Err(EvalError::TooFewPlayers(num_players));
        }

        if num_players > MAX_PLAYERS {
            return Err(EvalError::TooManyPlayers(num_players));
        }

        if request.board.len() > 5 {
            return Err(EvalError::TooManyBoardCards(request.board.len()));
        }

        if request.mode == (EquityMode::Sample { trials: 0 }) {
            return Err(EvalError::NoTrials);
        }

        let exact = request
            .players
            .iter()
            .filter_map(|p| match p {
                PlayerSpec::Exact(cards) => Some(cards),
                _ => None,
            })
            .flatten();

        let mut known = CardSet::EMPTY;
        for &c in exact.chain(&request.board).chain(&request.dead) {
            if !known.insert(c) {
                return Err(EvalError::CardConflict(c));
            }
        }

        let unknown_holes = request
            .players
            .iter()
            .filter(|p| !matches!(p, PlayerSpec::Exact(_)))
            .count();
        let needed = unknown_holes * 2 + 5 - request.board.len();
        let available = known.complement().len();
        if needed > available {
            return Err(EvalError::NotEnoughCards { needed, available });
        }

        let seats = request
            .players
            .iter()
            .map(|p| match p {
                PlayerSpec::Exact(cards) => Ok(Seat::Exact(*cards)),
                PlayerSpec::Range(range) => {
                    range.excluding(known).map(|r| Seat::Range(r.combos().to_vec()))
                }
                PlayerSpec::Random => Ok(Seat::Random),
            })
            .collect::<Result<Vec<_>>>()?;

        let ranges = seats
            .iter()
            .filter_map(|seat| match seat {
                Seat::Range(combos) => Some(combos.as_slice()),
                _ => None,
            })
            .collect::<Vec<_>>();
        if !has_assignment(&ranges, known) {
            return Err(EvalError::NoValidAssignment);
        }

        Ok(Self {
            seats,
            board: request.board.clone(),
            known,
        })
    }
}

/// Checks if each range can get a combo with no card shared with `used` or
/// with the other ranges combos.
fn has_assignment(ranges: &[&[[Card; 2]]], used: CardSet) -> bool {
    match ranges.split_first() {
        None => true,
        Some((combos, rest)) => combos.iter().any(|combo| {
            let cards = CardSet::from_cards(combo);
            !used.intersects(cards) && has_assignment(rest, used | cards)
        }),
    }
}

/// Maximum number of worker tasks for a request.
fn max_tasks() -> usize {
    thread::available_parallelism().map_or(1, NonZeroUsize::get) * 4
}

/// Computes the equity of all the players in a request.
///
/// The request is validated before any work: 2 to 10 players, at most 5
/// board cards, no card used twice, enough cards left to complete hands and
/// board, at least one combo left in each range, and at least one way to deal
/// the ranges without sharing cards.
pub fn calculate_equity(request: &EquityRequest) -> Result<EquityResult> {
    let setup = Setup::new(request)?;
    let tasks = request.tasks.clamp(1, max_tasks());

    debug!(
        "Equity request players: [{}] board: [{}] dead: {} mode: {:?} tasks: {tasks}",
        request
            .players
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join("] ["),
        holdem_cards::format_cards(&request.board),
        request.dead.len(),
        request.mode,
    );

    let result = match request.mode {
        EquityMode::Enumerate => enumerate::run(&setup, tasks),
        EquityMode::Sample { trials } => {
            let seed = request.seed.unwrap_or_else(sample::os_seed);
            sample::run(&setup, trials, seed, tasks)
        }
    };

    info!(
        "Equity {:?} evaluated {} samples in {:.3}s",
        result.mode,
        result.samples,
        result.elapsed.as_secs_f64()
    );

    Ok(result)
}

/// Computes the sampled equity of hole cards against a number of opponents
/// with random hands.
pub fn equity_vs_random(
    hole: [Card; 2],
    board: &[Card],
    opponents: usize,
    trials: u64,
    seed: Option<u64>,
) -> Result<EquityResult> {
    let mut players = vec![PlayerSpec::Exact(hole)];
    players.extend((0..opponents).map(|_| PlayerSpec::Random));

    let mut request = EquityRequest::new(players)
        .with_board(board.to_vec())
        .trials(trials);
    request.seed = seed;

    calculate_equity(&request)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(s: &str) -> PlayerSpec {
        PlayerSpec::parse(s).unwrap()
    }

    fn total_equity(result: &EquityResult) -> f64 {
        result.players.iter().map(|p| p.equity).sum()
    }

    #[test]
    fn parse_player_spec() {
        let cards = parse_cards("Ah Kh").unwrap();
        assert_eq!(exact("AhKh"), PlayerSpec::Exact([cards[0], cards[1]]));
        assert_eq!(exact(" RANDOM "), PlayerSpec::Random);
        assert!(matches!(exact("AKs,QQ"), PlayerSpec::Range(r) if r.len() == 10));
        assert!(matches!(
            PlayerSpec::parse("AhKhQh"),
            Err(EvalError::InvalidRange { .. })
        ));
        assert!(PlayerSpec::parse("xyz").is_err());
        assert_eq!(exact("AhKh").to_string(), "AhKh");
    }

    #[test]
    fn validation() {
        let request = |players: &[&str]| {
            EquityRequest::new(players.iter().map(|s| exact(s)).collect()).trials(100)
        };

        assert_eq!(
            calculate_equity(&request(&["AhKh"])),
            Err(EvalError::TooFewPlayers(1))
        );
        assert_eq!(
            calculate_equity(&request(&["random"; 11])),
            Err(EvalError::TooManyPlayers(11))
        );

        let ah = parse_cards("Ah").unwrap()[0];
        assert_eq!(
            calculate_equity(&request(&["AhKh", "AhQd"])),
            Err(EvalError::CardConflict(ah))
        );
        assert_eq!(
            calculate_equity(&request(&["AhKh", "QdQc"]).with_board(vec![ah])),
            Err(EvalError::CardConflict(ah))
        );
        assert_eq!(
            calculate_equity(&request(&["AhKh", "QdQc"]).with_dead(vec![ah])),
            Err(EvalError::CardConflict(ah))
        );
        assert_eq!(
            calculate_equity(
                &request(&["AhKh", "QdQc"]).with_board(parse_cards("2c 3c 4c 5c 6c 7c").unwrap())
            ),
            Err(EvalError::TooManyBoardCards(6))
        );
        assert_eq!(
            calculate_equity(&request(&["AhKh", "QdQc"]).trials(0)),
            Err(EvalError::NoTrials)
        );
        assert_eq!(
            calculate_equity(&request(&["AhKh", "AA"]).with_dead(parse_cards("As Ad").unwrap())),
            Err(EvalError::EmptyRange("AA".to_string()))
        );

        let dead = holdem_cards::Deck::default()
            .into_iter()
            .filter(|c| c.rank().value() < 13)
            .collect::<Vec<_>>();
        assert_eq!(
            calculate_equity(&request(&["AhKh", "random", "random"]).with_dead(dead)),
            Err(EvalError::NotEnoughCards {
                needed: 9,
                available: 6
            })
        );
    }

    #[test]
    fn conflicting_ranges() {
        let request =
            |players: &[&str]| EquityRequest::new(players.iter().map(|s| exact(s)).collect());

        // Two aces left once AhKd is out, only one player can have them.
        let players = ["AA", "AA", "AhKd"];
        assert_eq!(
            calculate_equity(&request(&players).trials(100).seed(5)),
            Err(EvalError::NoValidAssignment)
        );
        assert_eq!(
            calculate_equity(&request(&players).enumerate()),
            Err(EvalError::NoValidAssignment)
        );

        // Three players on four kings need a backtrack to find no deal.
        assert_eq!(
            calculate_equity(&request(&["KK", "KK", "KK"]).trials(100)),
            Err(EvalError::NoValidAssignment)
        );

        // Feasible only with AsAc for the second player.
        let result =
            calculate_equity(&request(&["AhAd", "AA", "KK"]).trials(500).seed(1)).unwrap();
        assert_eq!(result.samples, 500);
        assert!((total_equity(&result) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn many_tasks() {
        let request = EquityRequest::new(vec![exact("AhKh"), exact("random")])
            .trials(2_000)
            .seed(4);

        let many = calculate_equity(&request.clone().tasks(usize::MAX)).unwrap();
        let one = calculate_equity(&request.tasks(1)).unwrap();
        assert_eq!(many.samples, 2_000);
        assert_eq!(many.players, one.players);
    }

    #[test]
    fn equity_sums_to_one() {
        let board = parse_cards("2c 7s 9d").unwrap();
        let players = vec![exact("AhAd"), exact("KK,QQ"), exact("JTs,98s")];

        let enumerated = calculate_equity(
            &EquityRequest::new(players.clone())
                .with_board(board.clone())
                .enumerate()
                .tasks(3),
        )
        .unwrap();
        assert!((total_equity(&enumerated) - 1.0).abs() < 1e-9);

        let sampled = calculate_equity(
            &EquityRequest::new(players)
                .with_board(board)
                .trials(2_000)
                .seed(7),
        )
        .unwrap();
        assert!((total_equity(&sampled) - 1.0).abs() < 1e-9);
        assert_eq!(sampled.seed, Some(7));
    }

    #[test]
    fn vs_random() {
        let cards = parse_cards("Ah As").unwrap();
        let result = equity_vs_random([cards[0], cards[1]], &[], 1, 20_000, Some(3)).unwrap();
        assert_eq!(result.players.len(), 2);
        assert_eq!(result.samples, 20_000);

        // Aces are about 85% against a random hand.
        assert!((result.players[0].equity - 0.852).abs() < 0.015);
    }
}
