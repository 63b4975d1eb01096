// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Monte Carlo equity.
use log::warn;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::{ops, panic, thread, time::Instant};

use holdem_cards::{Card, CardSet};

use super::{EquityMode, EquityResult, Seat, Setup, accumulator::Accumulator};
use crate::evaluate7;

/// Attempts to draw conflict free range combos before skipping a trial.
const MAX_ATTEMPTS: usize = 1_000;

/// Draws a seed from the OS.
pub(super) fn os_seed() -> u64 {
    StdRng::from_os_rng().random()
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// The generator for a trial, each trial has its own generator so results
/// do not depend on how trials are split across tasks.
fn trial_rng(seed: u64, trial: u64) -> StdRng {
    StdRng::seed_from_u64(splitmix64(seed ^ splitmix64(trial)))
}

pub(super) fn run(setup: &Setup, trials: u64, seed: u64, tasks: usize) -> EquityResult {
    let now = Instant::now();
    let num_players = setup.seats.len();

    let tasks = (tasks as u64).clamp(1, trials);
    let trials_per_task = trials.div_ceil(tasks);

    let acc = thread::scope(|s| {
        let handles = (0..tasks)
            .map(|task| task * trials_per_task)
            .take_while(|&start| start < trials)
            .map(|start| {
                let end = (start + trials_per_task).min(trials);
                s.spawn(move || run_trials(setup, seed, start..end))
            })
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .fold(Accumulator::new(num_players), |mut acc, handle| {
                let task_acc = handle.join().unwrap_or_else(|e| panic::resume_unwind(e));
                acc.merge(&task_acc);
                acc
            })
    });

    let skipped = trials - acc.samples();
    if skipped > 0 {
        warn!("Skipped {skipped} trials, range combos kept colliding");
    }

    acc.into_result(EquityMode::Sample { trials }, Some(seed), now.elapsed())
}

fn run_trials(setup: &Setup, seed: u64, trials: ops::Range<u64>) -> Accumulator {
    let num_players = setup.seats.len();
    let mut acc = Accumulator::new(num_players);
    let mut deal = Deal::new(setup);
    let mut ranks = Vec::with_capacity(num_players);

    for trial in trials {
        let mut rng = trial_rng(seed, trial);
        if !deal.next(setup, &mut rng) {
            continue;
        }

        ranks.clear();
        ranks.extend(deal.holes.iter().map(|hole| {
            let mut hand = [hole[0]; 7];
            hand[..2].copy_from_slice(hole);
            hand[2..].copy_from_slice(&deal.board);
            evaluate7(&hand)
        }));

        acc.add(&ranks);
    }

    acc
}

/// The cards of one trial, reused across trials.
struct Deal {
    /// Hole cards in seat order.
    holes: Vec<[Card; 2]>,
    /// The complete board.
    board: Vec<Card>,
    ranged: Vec<[Card; 2]>,
    pool: Vec<Card>,
    num_random: usize,
}

impl Deal {
    fn new(setup: &Setup) -> Self {
        let num_players = setup.seats.len();
        let num_random = setup
            .seats
            .iter()
            .filter(|s| matches!(s, Seat::Random))
            .count();

        Self {
            holes: Vec::with_capacity(num_players),
            board: Vec::with_capacity(5),
            ranged: Vec::with_capacity(num_players),
            pool: Vec::with_capacity(52),
            num_random,
        }
    }

    /// Deals hole cards for all seats and completes the board, returns false
    /// if the range players could not be dealt.
    fn next<R: Rng>(&mut self, setup: &Setup, rng: &mut R) -> bool {
        let Some(used) = assign_ranges(setup, rng, &mut self.ranged) else {
            return false;
        };

        // Random hands and missing board cards from a fresh pool.
        self.pool.clear();
        self.pool.extend(used.complement().iter());
        let missing = 5 - setup.board.len();
        let (drawn, _) = self.pool.partial_shuffle(rng, self.num_random * 2 + missing);
        let (random_holes, board) = drawn.split_at(self.num_random * 2);

        self.board.clear();
        self.board.extend_from_slice(&setup.board);
        self.board.extend_from_slice(board);

        let mut ranged = self.ranged.iter();
        let mut random = random_holes.chunks_exact(2);
        self.holes.clear();
        for seat in &setup.seats {
            let hole = match seat {
                Seat::Exact(cards) => Some(*cards),
                Seat::Range(_) => ranged.next().copied(),
                Seat::Random => random.next().map(|c| [c[0], c[1]]),
            };

            self.holes.extend(hole);
        }

        self.holes.len() == setup.seats.len()
    }
}

/// Draws combos for the range players, in seat order. Combos are drawn for
/// all range players together and redrawn when any two collide. Returns the
/// cards used by all the seats or None if no valid assignment was found.
fn assign_ranges<R: Rng>(setup: &Setup, rng: &mut R, ranged: &mut Vec<[Card; 2]>) -> Option<CardSet> {
    'attempts: for _ in 0..MAX_ATTEMPTS {
        let mut used = setup.known;
        ranged.clear();
        for seat in &setup.seats {
            if let Seat::Range(combos) = seat {
                let combo = combos[rng.random_range(0..combos.len())];
                let cards = CardSet::from_cards(&combo);
                if used.intersects(cards) {
                    continue 'attempts;
                }

                used = used | cards;
                ranged.push(combo);
            }
        }

        return Some(used);
    }

    None
}
