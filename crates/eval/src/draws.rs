// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Flush and straight draws analysis.
//!
//! Draws are computed on the flop and on the turn from the hole cards and the
//! board, outs are the unseen cards that complete a flush or a straight on the
//! next card. Backdoor draws need two running cards, they are reported but do
//! not count in the total outs.
use serde::{Deserialize, Serialize};

use holdem_cards::{Card, CardSet, Rank, Suit};

use crate::{EvalError, HandCategory, Result, evaluate};

/// The kind of a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawType {
    /// Four cards to a flush.
    FlushDraw,
    /// Three cards to a flush on the flop.
    BackdoorFlush,
    /// Four consecutive ranks open at both ends.
    OpenEnded,
    /// Two different ranks each complete a straight.
    DoubleGutshot,
    /// A single rank completes a straight.
    Gutshot,
    /// Two running cards complete a straight on the flop.
    BackdoorStraight,
}

impl DrawType {
    /// The draw name.
    pub const fn name(self) -> &'static str {
        match self {
            DrawType::FlushDraw => "Flush Draw",
            DrawType::BackdoorFlush => "Backdoor Flush",
            DrawType::OpenEnded => "Open-Ended Straight Draw",
            DrawType::DoubleGutshot => "Double Gutshot",
            DrawType::Gutshot => "Gutshot",
            DrawType::BackdoorStraight => "Backdoor Straight",
        }
    }

    /// Checks if the draw needs two running cards.
    pub const fn is_backdoor(self) -> bool {
        matches!(self, DrawType::BackdoorFlush | DrawType::BackdoorStraight)
    }

    fn priority(self) -> u8 {
        match self {
            DrawType::FlushDraw => 4,
            DrawType::OpenEnded | DrawType::DoubleGutshot => 3,
            DrawType::Gutshot => 2,
            DrawType::BackdoorFlush => 1,
            DrawType::BackdoorStraight => 0,
        }
    }
}

/// A flush draw in one suit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlushDraw {
    /// The draw type, [DrawType::FlushDraw] or [DrawType::BackdoorFlush].
    pub draw_type: DrawType,
    /// The suit.
    pub suit: Suit,
    /// Number of hole and board cards of this suit.
    pub cards_held: usize,
    /// Unseen cards of this suit.
    pub outs: Vec<Card>,
    /// Whether the hole cards hold the highest card of this suit that is
    /// not on the board or dead.
    pub is_nut: bool,
}

/// A straight draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StraightDraw {
    /// The draw type.
    pub draw_type: DrawType,
    /// Ranks that complete the straight, descending.
    pub needed_ranks: Vec<Rank>,
    /// Unseen cards of the needed ranks.
    pub outs: Vec<Card>,
    /// The top rank of the highest straight this draw can make.
    pub high_card: Rank,
}

/// The result of a draws analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawAnalysis {
    /// The hole cards.
    pub hole: [Card; 2],
    /// The board cards.
    pub board: Vec<Card>,
    /// A flush is already made.
    pub has_flush: bool,
    /// A straight is already made.
    pub has_straight: bool,
    /// Flush draws, empty if a flush is made.
    pub flush_draws: Vec<FlushDraw>,
    /// Straight draws, empty if a straight is made.
    pub straight_draws: Vec<StraightDraw>,
    /// Number of unique cards that complete a draw on the next card.
    pub total_outs: usize,
    /// The unique cards that complete a draw on the next card.
    pub all_outs: Vec<Card>,
}

impl DrawAnalysis {
    /// Checks if there is any draw.
    pub fn has_draw(&self) -> bool {
        !self.flush_draws.is_empty() || !self.straight_draws.is_empty()
    }

    /// Checks if there are both a flush draw and a straight draw, backdoor
    /// draws excluded.
    pub fn is_combo_draw(&self) -> bool {
        let flush = self
            .flush_draws
            .iter()
            .any(|d| d.draw_type == DrawType::FlushDraw);
        let straight = self
            .straight_draws
            .iter()
            .any(|d| !d.draw_type.is_backdoor());
        flush && straight
    }

    /// The strongest draw type.
    pub fn primary_draw(&self) -> Option<DrawType> {
        self.flush_draws
            .iter()
            .map(|d| d.draw_type)
            .chain(self.straight_draws.iter().map(|d| d.draw_type))
            .reduce(|best, d| if d.priority() > best.priority() { d } else { best })
    }
}

/// Analyzes the draws for 2 hole cards and a 3 or 4 cards board, the dead
/// cards are excluded from the outs.
pub fn analyze_draws(hole: &[Card], board: &[Card], dead: &[Card]) -> Result<DrawAnalysis> {
    let hole: [Card; 2] = hole.try_into().map_err(|_| EvalError::InvalidDrawInput {
        hole: hole.len(),
        board: board.len(),
    })?;

    if !(3..=4).contains(&board.len()) {
        return Err(EvalError::InvalidDrawInput {
            hole: 2,
            board: board.len(),
        });
    }

    let mut known = CardSet::EMPTY;
    for &c in hole.iter().chain(board).chain(dead) {
        if !known.insert(c) {
            return Err(EvalError::CardConflict(c));
        }
    }

    let mut cards = hole.to_vec();
    cards.extend_from_slice(board);

    let category = evaluate(&cards).category();
    let has_flush = matches!(
        category,
        HandCategory::Flush | HandCategory::StraightFlush | HandCategory::RoyalFlush
    );
    let has_straight = matches!(
        category,
        HandCategory::Straight | HandCategory::StraightFlush | HandCategory::RoyalFlush
    );

    let is_flop = board.len() == 3;
    let flush_draws = if has_flush {
        Vec::new()
    } else {
        flush_draws(&hole, &cards, board, dead, known, is_flop)
    };

    let straight_draws = if has_straight {
        Vec::new()
    } else {
        straight_draws(&cards, known, is_flop)
    };

    let all_outs = flush_draws
        .iter()
        .filter(|d| !d.draw_type.is_backdoor())
        .flat_map(|d| d.outs.iter())
        .chain(
            straight_draws
                .iter()
                .filter(|d| !d.draw_type.is_backdoor())
                .flat_map(|d| d.outs.iter()),
        )
        .copied()
        .collect::<CardSet>();

    let mut all_outs = all_outs.iter().collect::<Vec<_>>();
    all_outs.reverse();

    Ok(DrawAnalysis {
        hole,
        board: board.to_vec(),
        has_flush,
        has_straight,
        flush_draws,
        straight_draws,
        total_outs: all_outs.len(),
        all_outs,
    })
}

fn flush_draws(
    hole: &[Card; 2],
    cards: &[Card],
    board: &[Card],
    dead: &[Card],
    known: CardSet,
    is_flop: bool,
) -> Vec<FlushDraw> {
    let mut draws = Vec::new();

    for suit in Suit::suits() {
        let cards_held = cards.iter().filter(|c| c.suit() == suit).count();
        let draw_type = match cards_held {
            4 => DrawType::FlushDraw,
            3 if is_flop => DrawType::BackdoorFlush,
            _ => continue,
        };

        let outs = Rank::ranks()
            .rev()
            .map(|r| Card::new(r, suit))
            .filter(|c| !known.contains(*c))
            .collect::<Vec<_>>();

        let is_nut = Rank::ranks()
            .rev()
            .map(|r| Card::new(r, suit))
            .find(|c| !board.contains(c) && !dead.contains(c))
            .is_some_and(|top| hole.contains(&top));

        draws.push(FlushDraw {
            draw_type,
            suit,
            cards_held,
            outs,
            is_nut,
        });
    }

    draws
}

/// Rank bits for straights, bit 0 is the ace playing low and bit `v - 1` is
/// the rank with value `v`.
fn rank_bits(value: u8) -> u16 {
    if value == 14 {
        (1 << 13) | 1
    } else {
        1 << (value - 1)
    }
}

/// The top rank value of the highest straight in a rank mask.
fn straight_high(mask: u16) -> Option<u8> {
    (0..=9u8)
        .rev()
        .find(|&start| (mask >> start) & 0b11111 == 0b11111)
        .map(|start| start + 5)
}

fn straight_draws(cards: &[Card], known: CardSet, is_flop: bool) -> Vec<StraightDraw> {
    let mask = cards
        .iter()
        .fold(0u16, |m, c| m | rank_bits(c.rank().value()));

    let missing = (2..=14u8)
        .rev()
        .filter(|&v| mask & rank_bits(v) == 0)
        .collect::<Vec<_>>();

    // Ranks that complete a straight with one card.
    let completing = missing
        .iter()
        .filter_map(|&v| straight_high(mask | rank_bits(v)).map(|high| (v, high)))
        .collect::<Vec<_>>();

    if !completing.is_empty() {
        let needed = completing.iter().map(|&(v, _)| v).collect::<Vec<_>>();
        let high = completing.iter().map(|&(_, h)| h).max().unwrap_or(5);

        let draw_type = if needed.len() == 1 {
            DrawType::Gutshot
        } else if is_open_ended(mask, &needed) {
            DrawType::OpenEnded
        } else {
            DrawType::DoubleGutshot
        };

        return vec![straight_draw(draw_type, &needed, high, known)];
    }

    if !is_flop {
        return Vec::new();
    }

    // Pairs of ranks that complete a straight with two running cards.
    let mut needed_mask = 0u16;
    let mut high = 0;
    for (idx, &v1) in missing.iter().enumerate() {
        for &v2 in &missing[idx + 1..] {
            if let Some(h) = straight_high(mask | rank_bits(v1) | rank_bits(v2)) {
                needed_mask |= rank_bits(v1) | rank_bits(v2);
                high = high.max(h);
            }
        }
    }

    if needed_mask == 0 {
        return Vec::new();
    }

    let needed = (2..=14u8)
        .rev()
        .filter(|&v| needed_mask & rank_bits(v) != 0)
        .collect::<Vec<_>>();

    vec![straight_draw(DrawType::BackdoorStraight, &needed, high, known)]
}

/// Checks for four consecutive ranks whose rank below and rank above both
/// complete a straight.
fn is_open_ended(mask: u16, needed: &[u8]) -> bool {
    let needed_mask = needed.iter().fold(0u16, |m, &v| m | rank_bits(v));

    (1..=9u8).any(|start| {
        (mask >> start) & 0b1111 == 0b1111
            && needed_mask & (1 << (start - 1)) != 0
            && needed_mask & (1 << (start + 4)) != 0
    })
}

fn straight_draw(draw_type: DrawType, needed: &[u8], high: u8, known: CardSet) -> StraightDraw {
    let needed_ranks = needed
        .iter()
        .filter_map(|&v| Rank::from_value(v))
        .collect::<Vec<_>>();

    let outs = needed_ranks
        .iter()
        .flat_map(|&r| Suit::suits().rev().map(move |s| Card::new(r, s)))
        .filter(|c| !known.contains(*c))
        .collect();

    StraightDraw {
        draw_type,
        needed_ranks,
        outs,
        high_card: Rank::from_value(high).unwrap_or(Rank::Five),
    }
}
