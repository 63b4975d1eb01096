// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hand stages.
use serde::{Deserialize, Serialize};
use std::fmt;

/// The stage of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// No card dealt yet.
    NotStarted,
    /// Hole cards dealt.
    Preflop,
    /// Three board cards.
    Flop,
    /// Four board cards.
    Turn,
    /// Five board cards.
    River,
    /// Hands evaluated and winners known.
    Showdown,
    /// The hand is over.
    Complete,
}

impl Stage {
    /// The stage after this one, None for [Stage::Complete].
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::NotStarted => Some(Stage::Preflop),
            Stage::Preflop => Some(Stage::Flop),
            Stage::Flop => Some(Stage::Turn),
            Stage::Turn => Some(Stage::River),
            Stage::River => Some(Stage::Showdown),
            Stage::Showdown => Some(Stage::Complete),
            Stage::Complete => None,
        }
    }

    /// Number of board cards dealt when entering this stage.
    pub fn board_cards(self) -> usize {
        match self {
            Stage::Flop => 3,
            Stage::Turn | Stage::River => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::NotStarted => "not started",
            Stage::Preflop => "preflop",
            Stage::Flop => "flop",
            Stage::Turn => "turn",
            Stage::River => "river",
            Stage::Showdown => "showdown",
            Stage::Complete => "complete",
        };

        f.write_str(name)
    }
}
