// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Win and tie counters.
use std::time::Duration;

use super::{EquityMode, EquityResult, PlayerEquity};
use crate::HandRank;

/// Equity units for one outcome, divisible by any number of tied players.
const UNITS: u64 = 2520;

/// Integer counters for an equity run.
///
/// A split among `k` players gives each winner `UNITS / k` equity units, all
/// counters are integers so merging accumulators is exact whatever the order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Accumulator {
    wins: Vec<u64>,
    ties: Vec<u64>,
    units: Vec<u64>,
    samples: u64,
}

impl Accumulator {
    pub fn new(num_players: usize) -> Self {
        Self {
            wins: vec![0; num_players],
            ties: vec![0; num_players],
            units: vec![0; num_players],
            samples: 0,
        }
    }

    /// Adds an outcome given all players hand ranks.
    pub fn add(&mut self, ranks: &[HandRank]) {
        debug_assert_eq!(ranks.len(), self.wins.len());

        let Some(best) = ranks.iter().max() else {
            return;
        };

        let num_winners = ranks.iter().filter(|r| *r == best).count() as u64;
        let share = UNITS / num_winners;

        for (idx, rank) in ranks.iter().enumerate() {
            if rank == best {
                if num_winners == 1 {
                    self.wins[idx] += 1;
                } else {
                    self.ties[idx] += 1;
                }

                self.units[idx] += share;
            }
        }

        self.samples += 1;
    }

    /// Adds the other counters to this.
    pub fn merge(&mut self, other: &Accumulator) {
        for (l, r) in self.wins.iter_mut().zip(&other.wins) {
            *l += r;
        }

        for (l, r) in self.ties.iter_mut().zip(&other.ties) {
            *l += r;
        }

        for (l, r) in self.units.iter_mut().zip(&other.units) {
            *l += r;
        }

        self.samples += other.samples;
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn into_result(self, mode: EquityMode, seed: Option<u64>, elapsed: Duration) -> EquityResult {
        let samples = self.samples;
        let frac = |n: u64, d: u64| if d == 0 { 0.0 } else { n as f64 / d as f64 };

        let players = (0..self.wins.len())
            .map(|idx| PlayerEquity {
                win: frac(self.wins[idx], samples),
                tie: frac(self.ties[idx], samples),
                equity: frac(self.units[idx], samples * UNITS),
                wins: self.wins[idx],
                ties: self.ties[idx],
            })
            .collect();

        EquityResult {
            players,
            samples,
            elapsed,
            mode,
            seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate;
    use holdem_cards::parse_cards;

    fn rank(s: &str) -> HandRank {
        evaluate(&parse_cards(s).unwrap())
    }

    #[test]
    fn split_pots() {
        let high = rank("Ah Ad Kc 7s 2d");
        let low = rank("Kh Kd Qc 7s 2d");

        let mut acc = Accumulator::new(3);
        acc.add(&[high, low, low]);
        acc.add(&[high, high, low]);
        acc.add(&[high, high, high]);
        assert_eq!(acc.samples(), 3);

        let result = acc.into_result(EquityMode::Enumerate, None, Duration::ZERO);
        assert_eq!(result.players[0].wins, 1);
        assert_eq!(result.players[0].ties, 2);
        assert_eq!(result.players[2].wins, 0);
        assert_eq!(result.players[2].ties, 1);

        let equity = |idx: usize| result.players[idx].equity;
        assert!((equity(0) - (1.0 + 0.5 + 1.0 / 3.0) / 3.0).abs() < 1e-12);
        assert!((equity(1) - (0.5 + 1.0 / 3.0) / 3.0).abs() < 1e-12);
        assert!((equity(2) - (1.0 / 3.0) / 3.0).abs() < 1e-12);

        let total = result.players.iter().map(|p| p.equity).sum::<f64>();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn merge_is_order_independent() {
        let high = rank("Ah Ad Kc 7s 2d");
        let low = rank("Kh Kd Qc 7s 2d");
        let outcomes = [[high, low], [low, high], [high, high], [high, low]];

        let mut all = Accumulator::new(2);
        outcomes.iter().for_each(|o| all.add(o));

        let mut a = Accumulator::new(2);
        let mut b = Accumulator::new(2);
        outcomes[..1].iter().for_each(|o| a.add(o));
        outcomes[1..].iter().for_each(|o| b.add(o));

        let mut ab = a.clone();
        ab.merge(&b);
        let mut ba = b.clone();
        ba.merge(&a);

        assert_eq!(ab, all);
        assert_eq!(ba, all);
    }
}
