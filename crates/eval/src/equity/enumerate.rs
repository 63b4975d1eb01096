// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Exact equity by enumeration.
use log::debug;
use parking_lot::Mutex;
use std::time::Instant;

use holdem_cards::{Card, CardSet, Deck, Rank, Suit, combinations};

use super::{EquityMode, EquityResult, Seat, Setup, accumulator::Accumulator};
use crate::{Range, evaluate7};

/// Hole cards for all players that share no card.
struct Assignment {
    cards: CardSet,
    holes: Vec<[Card; 2]>,
}

/// Builds all the conflict free hole cards assignments.
fn assignments(choices: &[Vec<[Card; 2]>]) -> Vec<Assignment> {
    let mut result = vec![Assignment {
        cards: CardSet::EMPTY,
        holes: Vec::new(),
    }];

    for combos in choices {
        let mut next = Vec::with_capacity(result.len() * combos.len());
        for a in &result {
            for combo in combos {
                let set = CardSet::from_cards(combo);
                if a.cards.intersects(set) {
                    continue;
                }

                let mut holes = a.holes.clone();
                holes.push(*combo);
                next.push(Assignment {
                    cards: a.cards | set,
                    holes,
                });
            }
        }

        result = next;
    }

    result
}

pub(super) fn run(setup: &Setup, tasks: usize) -> EquityResult {
    let now = Instant::now();
    let num_players = setup.seats.len();

    let choices = setup
        .seats
        .iter()
        .map(|seat| match seat {
            Seat::Exact(cards) => vec![*cards],
            Seat::Range(combos) => combos.clone(),
            Seat::Random => Range::full()
                .combos()
                .iter()
                .filter(|[c1, c2]| !setup.known.contains(*c1) && !setup.known.contains(*c2))
                .copied()
                .collect(),
        })
        .collect::<Vec<_>>();

    let assignments = assignments(&choices);
    let deck = Deck::without(setup.known);
    let missing = 5 - setup.board.len();

    debug!(
        "Enumerating {} boards for {} hole cards assignments",
        combinations(deck.count(), missing),
        assignments.len()
    );

    let accumulators = (0..tasks)
        .map(|_| Mutex::new(Accumulator::new(num_players)))
        .collect::<Vec<_>>();

    deck.par_for_each(tasks, missing, |task_id, cards| {
        let board_cards = CardSet::from_cards(cards);

        let mut hand = [Card::new(Rank::Deuce, Suit::Clubs); 7];
        hand[2..2 + setup.board.len()].copy_from_slice(&setup.board);
        hand[2 + setup.board.len()..].copy_from_slice(cards);

        let mut ranks = Vec::with_capacity(num_players);
        let mut acc = accumulators[task_id].lock();
        for a in &assignments {
            if a.cards.intersects(board_cards) {
                continue;
            }

            ranks.clear();
            for hole in &a.holes {
                hand[..2].copy_from_slice(hole);
                ranks.push(evaluate7(&hand));
            }

            acc.add(&ranks);
        }
    });

    let acc = accumulators
        .into_iter()
        .fold(Accumulator::new(num_players), |mut acc, task_acc| {
            acc.merge(&task_acc.into_inner());
            acc
        });

    acc.into_result(EquityMode::Enumerate, None, now.elapsed())
}
