// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Event log replay.
//!
//! A [Replayer] checks a log event by event and keeps the hand [Snapshot]
//! after each event so that a hand can be stepped forward and back.
use holdem_cards::{Card, CardSet};
use holdem_eval::{HandRank, MAX_PLAYERS, evaluate5};

use crate::{
    EventLog, GameError, Result, Stage,
    event_log::{Event, EventKind},
    game_state::showdown,
};

/// The hand as seen after a number of events.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Number of events applied.
    pub applied: usize,
    /// The hand stage.
    pub stage: Stage,
    /// Number of players, 0 before the hand starts.
    pub num_players: usize,
    /// The deck seed.
    pub seed: Option<u64>,
    /// Hole cards dealt so far, by player.
    pub holes: Vec<[Card; 2]>,
    /// The board cards.
    pub board: Vec<Card>,
    /// Winners after showdown.
    pub winners: Option<Vec<usize>>,
    /// Winning rank after showdown.
    pub winning_rank: Option<HandRank>,
    /// The last equity snapshot.
    pub equities: Option<Vec<f64>>,
}

impl Snapshot {
    fn initial() -> Self {
        Self {
            applied: 0,
            stage: Stage::NotStarted,
            num_players: 0,
            seed: None,
            holes: Vec::new(),
            board: Vec::new(),
            winners: None,
            winning_rank: None,
            equities: None,
        }
    }

    /// Checks `event` against this snapshot and returns the next snapshot.
    fn apply(&self, index: usize, event: &Event) -> Result<Snapshot> {
        let invalid = |reason: String| GameError::InvalidLog { index, reason };

        let expect_stage = |stage: Stage| {
            if event.stage == stage {
                Ok(())
            } else {
                Err(invalid(format!(
                    "event stage is {}, expected {stage}",
                    event.stage
                )))
            }
        };

        if event.sequence != index as u64 {
            return Err(invalid(format!(
                "sequence {} out of order, expected {index}",
                event.sequence
            )));
        }

        if self.stage == Stage::Complete {
            return Err(invalid("event after hand complete".to_string()));
        }

        if self.stage == Stage::NotStarted
            && !matches!(event.kind, EventKind::HandStarted { .. })
        {
            return Err(invalid("the log must start with a hand started".to_string()));
        }

        let all_dealt = self.holes.len() == self.num_players;
        let mut next = self.clone();
        next.applied = index + 1;

        match &event.kind {
            EventKind::HandStarted { players, seed } => {
                if self.stage != Stage::NotStarted {
                    return Err(invalid("hand already started".to_string()));
                }

                if !(2..=MAX_PLAYERS).contains(players) {
                    return Err(invalid(format!("invalid number of players {players}")));
                }

                expect_stage(Stage::Preflop)?;
                next.num_players = *players;
                next.seed = Some(*seed);
                next.stage = Stage::Preflop;
            }
            EventKind::HoleCards { player, cards } => {
                if self.stage != Stage::Preflop || all_dealt {
                    return Err(invalid(format!("hole cards dealt at {}", self.stage)));
                }

                if *player != self.holes.len() {
                    return Err(invalid(format!(
                        "hole cards for player {player}, expected player {}",
                        self.holes.len()
                    )));
                }

                expect_stage(Stage::Preflop)?;
                self.check_unused(cards).map_err(invalid)?;
                next.holes.push(*cards);
            }
            EventKind::Board { cards } => {
                let stage = self
                    .stage
                    .next()
                    .filter(|s| matches!(s, Stage::Flop | Stage::Turn | Stage::River));
                let Some(stage) = stage.filter(|_| all_dealt) else {
                    return Err(invalid(format!("board cards dealt at {}", self.stage)));
                };

                if cards.len() != stage.board_cards() {
                    return Err(invalid(format!(
                        "{} board cards on the {stage}, expected {}",
                        cards.len(),
                        stage.board_cards()
                    )));
                }

                expect_stage(stage)?;
                self.check_unused(cards).map_err(invalid)?;
                next.board.extend_from_slice(cards);
                next.stage = stage;
            }
            EventKind::Showdown {
                winners,
                rank,
                best,
            } => {
                if self.stage != Stage::River {
                    return Err(invalid(format!("showdown at {}", self.stage)));
                }

                expect_stage(Stage::Showdown)?;

                let (expected, expected_rank, _) = showdown(&self.holes, &self.board);
                if *winners != expected {
                    return Err(invalid(format!(
                        "winners {winners:?} do not match the hands, expected {expected:?}"
                    )));
                }

                if *rank != expected_rank {
                    return Err(invalid(format!(
                        "winning rank {rank} does not match {expected_rank}"
                    )));
                }

                // Any five of the first winner cards that make the winning rank.
                let winner = self.holes[expected[0]];
                let seven = winner.iter().chain(&self.board).copied().collect::<CardSet>();
                if best.iter().any(|c| !seven.contains(*c)) || evaluate5(best) != *rank {
                    return Err(invalid("best five cards do not make the winning rank".into()));
                }

                next.winners = Some(expected);
                next.winning_rank = Some(expected_rank);
                next.stage = Stage::Showdown;
            }
            EventKind::EquitySnapshot { equities } => {
                if !all_dealt {
                    return Err(invalid("equity snapshot before hole cards".to_string()));
                }

                if equities.len() != self.num_players {
                    return Err(invalid(format!(
                        "{} equities for {} players",
                        equities.len(),
                        self.num_players
                    )));
                }

                expect_stage(self.stage)?;
                next.equities = Some(equities.clone());
            }
            EventKind::HandComplete => {
                if self.stage != Stage::Showdown {
                    return Err(invalid(format!("hand complete at {}", self.stage)));
                }

                expect_stage(Stage::Complete)?;
                next.stage = Stage::Complete;
            }
        }

        Ok(next)
    }

    fn check_unused(&self, cards: &[Card]) -> std::result::Result<(), String> {
        let mut used = self
            .holes
            .iter()
            .flatten()
            .chain(&self.board)
            .copied()
            .collect::<CardSet>();

        for card in cards {
            if !used.insert(*card) {
                return Err(format!("card {card} dealt twice"));
            }
        }

        Ok(())
    }
}

/// Steps through a checked event log.
#[derive(Debug, Clone)]
pub struct Replayer {
    snapshots: Vec<Snapshot>,
    position: usize,
}

impl Replayer {
    /// Checks all the events in the log, the replayer starts before the
    /// first event.
    pub fn new(log: &EventLog) -> Result<Self> {
        let mut snapshots = Vec::with_capacity(log.len() + 1);
        snapshots.push(Snapshot::initial());

        for (index, event) in log.iter().enumerate() {
            let next = snapshots[index].apply(index, event)?;
            snapshots.push(next);
        }

        Ok(Self {
            snapshots,
            position: 0,
        })
    }

    /// Number of events in the log.
    pub fn len(&self) -> usize {
        self.snapshots.len() - 1
    }

    /// Checks if the log has no events.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of events applied at the current position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The snapshot at the current position.
    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.position]
    }

    /// The snapshot after all the events.
    pub fn last(&self) -> &Snapshot {
        &self.snapshots[self.len()]
    }

    /// All the snapshots, the first one is before any event.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Applies the next event, None at the end of the log.
    pub fn step_forward(&mut self) -> Option<&Snapshot> {
        if self.position < self.len() {
            self.position += 1;
            Some(self.current())
        } else {
            None
        }
    }

    /// Undoes the last event, None at the start of the log.
    pub fn step_back(&mut self) -> Option<&Snapshot> {
        if self.position > 0 {
            self.position -= 1;
            Some(self.current())
        } else {
            None
        }
    }

    /// Moves to the snapshot after `position` events.
    pub fn goto(&mut self, position: usize) -> Option<&Snapshot> {
        if position <= self.len() {
            self.position = position;
            Some(self.current())
        } else {
            None
        }
    }
}
