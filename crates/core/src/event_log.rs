// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Append only log of hand events.
use serde::{Deserialize, Serialize};
use std::slice;

use holdem_cards::Card;
use holdem_eval::HandRank;

use crate::Stage;

/// A hand event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// The event position in the log, starting at 0.
    pub sequence: u64,
    /// The stage the event belongs to.
    pub stage: Stage,
    /// What happened.
    pub kind: EventKind,
}

/// The event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// A new hand with the given players and deck seed.
    HandStarted {
        /// Number of players.
        players: usize,
        /// The seed used to shuffle the deck.
        seed: u64,
    },
    /// A player hole cards.
    HoleCards {
        /// The player index.
        player: usize,
        /// The player cards.
        cards: [Card; 2],
    },
    /// Board cards dealt, 3 on the flop then 1 on turn and river.
    Board {
        /// The new cards.
        cards: Vec<Card>,
    },
    /// Hands compared at showdown.
    Showdown {
        /// The winning players, more than one for a split pot.
        winners: Vec<usize>,
        /// The winning hand rank.
        rank: HandRank,
        /// The best five cards of the first winner.
        best: [Card; 5],
    },
    /// Players equities at the current stage.
    EquitySnapshot {
        /// One equity per player.
        equities: Vec<f64>,
    },
    /// The hand is over.
    HandComplete,
}

/// An append only sequence of events.
///
/// Events get contiguous sequence numbers as they are appended, a log built
/// from deserialized or collected events keeps the events as they are and
/// is checked when replayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event with the next sequence number.
    pub fn append(&mut self, stage: Stage, kind: EventKind) -> &Event {
        let sequence = self.events.len() as u64;
        self.events.push(Event {
            sequence,
            stage,
            kind,
        });

        &self.events[self.events.len() - 1]
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Checks if the log has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The event at `index`.
    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    /// The last event.
    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    /// All the events in order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Iterator over the events.
    pub fn iter(&self) -> slice::Iter<'_, Event> {
        self.events.iter()
    }
}

impl FromIterator<Event> for EventLog {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_cards::parse_cards;

    #[test]
    fn append() {
        let mut log = EventLog::new();
        assert!(log.is_empty());

        let event = log.append(
            Stage::Preflop,
            EventKind::HandStarted {
                players: 2,
                seed: 7,
            },
        );
        assert_eq!(event.sequence, 0);

        let cards = parse_cards("Ah Kd Qc").unwrap();
        let event = log.append(Stage::Flop, EventKind::Board { cards });
        assert_eq!(event.sequence, 1);
        assert_eq!(event.stage, Stage::Flop);

        assert_eq!(log.len(), 2);
        assert_eq!(log.last().map(|e| e.sequence), Some(1));
        assert!(log.get(2).is_none());

        let sequences = log.iter().map(|e| e.sequence).collect::<Vec<_>>();
        assert_eq!(sequences, vec![0, 1]);
    }

    #[test]
    fn json() {
        let mut log = EventLog::new();
        log.append(
            Stage::Preflop,
            EventKind::HoleCards {
                player: 1,
                cards: [Card::parse("Ah").unwrap(), Card::parse("Td").unwrap()],
            },
        );
        log.append(
            Stage::Flop,
            EventKind::EquitySnapshot {
                equities: vec![0.25, 0.75],
            },
        );
        log.append(Stage::Complete, EventKind::HandComplete);

        let json = serde_json::to_string(&log).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains(r#"["Ah","Td"]"#), "{json}");

        let decoded: EventLog = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, log);
    }
}
