// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker hand evaluator.
//!
//! A five cards hand is classified by counting ranks and checking suits, the
//! resulting [HandRank] holds the hand category and the ranks that break ties
//! within the category, so that comparing two ranks compares the hands.
//!
//! Six and seven cards hands are evaluated by taking the best of their five
//! cards subsets, [evaluate7] goes through the 21 subsets without allocating.
use serde::{Deserialize, Serialize};
use std::fmt;

use holdem_cards::{Card, Rank};

/// A poker hand category, from the weakest to the strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandCategory {
    /// No pair.
    HighCard = 0,
    /// One pair.
    OnePair,
    /// Two pairs.
    TwoPair,
    /// Three cards of the same rank.
    ThreeOfAKind,
    /// Five consecutive ranks.
    Straight,
    /// Five cards of the same suit.
    Flush,
    /// Three of a kind and a pair.
    FullHouse,
    /// Four cards of the same rank.
    FourOfAKind,
    /// A straight with all cards of the same suit.
    StraightFlush,
    /// The ace high straight flush.
    RoyalFlush,
}

impl HandCategory {
    /// All categories from the weakest to the strongest.
    pub const ALL: [HandCategory; 10] = [
        HandCategory::HighCard,
        HandCategory::OnePair,
        HandCategory::TwoPair,
        HandCategory::ThreeOfAKind,
        HandCategory::Straight,
        HandCategory::Flush,
        HandCategory::FullHouse,
        HandCategory::FourOfAKind,
        HandCategory::StraightFlush,
        HandCategory::RoyalFlush,
    ];

    /// The category name.
    pub const fn name(self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "One Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
            HandCategory::RoyalFlush => "Royal Flush",
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The rank of a poker hand.
///
/// Ranks are totally ordered, the category dominates and within the same
/// category the tiebreak ranks compare from the most significant:
///
/// | Category | Tiebreak |
/// |----------|----------|
/// | Four of a kind | quads, kicker |
/// | Full house | trips, pair |
/// | Flush, high card | five ranks descending |
/// | Straight, straight flush | top rank (5 for the wheel) |
/// | Three of a kind | trips, two kickers |
/// | Two pair | high pair, low pair, kicker |
/// | One pair | pair, three kickers |
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawHandRank")]
pub struct HandRank {
    category: HandCategory,
    tiebreak: [u8; 5],
    len: u8,
}

/// Unchecked serialized form of a [HandRank].
#[derive(Deserialize)]
struct RawHandRank {
    category: HandCategory,
    tiebreak: [u8; 5],
    len: u8,
}

impl TryFrom<RawHandRank> for HandRank {
    type Error = String;

    fn try_from(raw: RawHandRank) -> Result<Self, Self::Error> {
        let len = raw.len as usize;
        if len == 0 || len > raw.tiebreak.len() {
            return Err(format!("invalid tiebreak length {len}"));
        }

        let (ranks, padding) = raw.tiebreak.split_at(len);
        if ranks.iter().any(|r| !(2..=14).contains(r)) || padding.iter().any(|&r| r != 0) {
            return Err(format!("invalid tiebreak ranks {:?}", raw.tiebreak));
        }

        Ok(HandRank::new(raw.category, ranks))
    }
}

impl HandRank {
    fn new(category: HandCategory, ranks: &[u8]) -> Self {
        let mut tiebreak = [0; 5];
        tiebreak[..ranks.len()].copy_from_slice(ranks);
        Self {
            category,
            tiebreak,
            len: ranks.len() as u8,
        }
    }

    /// The hand category.
    pub fn category(&self) -> HandCategory {
        self.category
    }

    /// The tiebreak rank values (2..=14) from the most significant.
    pub fn tiebreak(&self) -> &[u8] {
        &self.tiebreak[..self.len as usize]
    }

    /// A human readable description, e.g. "Full House, Kings full of Tens".
    pub fn describe(&self) -> String {
        let r = |idx: usize| Rank::from_value(self.tiebreak[idx]).unwrap_or(Rank::Deuce);

        match self.category {
            HandCategory::HighCard => format!("High Card, {} high", r(0).name()),
            HandCategory::OnePair => format!("One Pair, {}", r(0).plural()),
            HandCategory::TwoPair => {
                format!("Two Pair, {} and {}", r(0).plural(), r(1).plural())
            }
            HandCategory::ThreeOfAKind => format!("Three of a Kind, {}", r(0).plural()),
            HandCategory::Straight => format!("Straight, {} high", r(0).name()),
            HandCategory::Flush => format!("Flush, {} high", r(0).name()),
            HandCategory::FullHouse => {
                format!("Full House, {} full of {}", r(0).plural(), r(1).plural())
            }
            HandCategory::FourOfAKind => format!("Four of a Kind, {}", r(0).plural()),
            HandCategory::StraightFlush => format!("Straight Flush, {} high", r(0).name()),
            HandCategory::RoyalFlush => "Royal Flush".to_string(),
        }
    }
}

impl fmt::Debug for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandRank({:?} {:?})", self.category, self.tiebreak())
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Returns the top rank of the highest straight in a rank mask with bits set
/// at the rank values, the ace also plays low for the wheel.
fn straight_top(mask: u16) -> Option<u8> {
    let mask = if mask & (1 << 14) != 0 {
        mask | (1 << 1)
    } else {
        mask
    };

    (5..=14u8)
        .rev()
        .find(|&top| (mask >> (top - 4)) & 0b11111 == 0b11111)
}

/// Evaluates a five cards hand.
pub fn evaluate5(cards: &[Card; 5]) -> HandRank {
    let mut counts = [0u8; 15];
    let mut mask = 0u16;
    let suit = cards[0].suit();
    let mut is_flush = true;

    for c in cards {
        let v = c.rank().value();
        counts[v as usize] += 1;
        mask |= 1 << v;
        is_flush &= c.suit() == suit;
    }

    // Group ranks by (count, rank) descending, the group ranks in this order
    // are the tiebreak for all categories but straights.
    let mut groups = [(0u8, 0u8); 5];
    let mut n = 0;
    for v in (2..=14u8).rev() {
        let count = counts[v as usize];
        if count > 0 {
            groups[n] = (count, v);
            n += 1;
        }
    }

    let groups = &mut groups[..n];
    groups.sort_unstable_by(|a, b| b.cmp(a));

    let mut ranks = [0u8; 5];
    for (r, g) in ranks.iter_mut().zip(groups.iter()) {
        *r = g.1;
    }

    let ranks = &ranks[..n];
    match (straight_top(mask), is_flush) {
        (Some(14), true) => HandRank::new(HandCategory::RoyalFlush, &[14]),
        (Some(top), true) => HandRank::new(HandCategory::StraightFlush, &[top]),
        (Some(top), false) => HandRank::new(HandCategory::Straight, &[top]),
        (None, true) => HandRank::new(HandCategory::Flush, ranks),
        (None, false) => match (groups[0].0, groups[1].0) {
            (4, _) => HandRank::new(HandCategory::FourOfAKind, ranks),
            (3, 2) => HandRank::new(HandCategory::FullHouse, ranks),
            (3, _) => HandRank::new(HandCategory::ThreeOfAKind, ranks),
            (2, 2) => HandRank::new(HandCategory::TwoPair, ranks),
            (2, _) => HandRank::new(HandCategory::OnePair, ranks),
            _ => HandRank::new(HandCategory::HighCard, ranks),
        },
    }
}

/// Evaluates a seven cards hand taking the best of its 21 five cards subsets.
pub fn evaluate7(cards: &[Card; 7]) -> HandRank {
    let mut best = None;
    let mut hand = [cards[0]; 5];

    // Skip two cards at a time.
    for i in 0..6 {
        for j in (i + 1)..7 {
            let mut k = 0;
            for (idx, c) in cards.iter().enumerate() {
                if idx != i && idx != j {
                    hand[k] = *c;
                    k += 1;
                }
            }

            let rank = evaluate5(&hand);
            if best.is_none_or(|b| rank > b) {
                best = Some(rank);
            }
        }
    }

    best.unwrap_or_else(|| evaluate5(&hand))
}

/// Calls `f` for each five cards subset of 5 to 7 cards.
fn for_each_five<F>(cards: &[Card], mut f: F)
where
    F: FnMut(&[Card; 5]),
{
    let n = cards.len();
    let mut hand = [cards[0]; 5];

    for skip in 0u32..(1 << n) {
        if skip.count_ones() as usize != n - 5 {
            continue;
        }

        let mut k = 0;
        for (idx, c) in cards.iter().enumerate() {
            if skip & (1 << idx) == 0 {
                hand[k] = *c;
                k += 1;
            }
        }

        f(&hand);
    }
}

/// Evaluates a 5, 6 or 7 cards hand.
///
/// # Panics
///
/// Panics if the number of cards is not in 5..=7.
pub fn evaluate(cards: &[Card]) -> HandRank {
    assert!(
        (5..=7).contains(&cards.len()),
        "Cannot evaluate {} cards",
        cards.len()
    );

    if let Ok(hand) = <&[Card; 7]>::try_from(cards) {
        return evaluate7(hand);
    }

    let mut best = None;
    for_each_five(cards, |hand| {
        let rank = evaluate5(hand);
        if best.is_none_or(|b| rank > b) {
            best = Some(rank);
        }
    });

    best.unwrap_or_else(|| unreachable!("at least one subset"))
}

/// Evaluates a 5, 6 or 7 cards hand and returns its rank with the five cards
/// that make the hand.
///
/// The best cards are ordered by rank groups, e.g. `Kh Kd Ks Td Tc`.
///
/// # Panics
///
/// Panics if the number of cards is not in 5..=7.
pub fn evaluate_with_best(cards: &[Card]) -> (HandRank, [Card; 5]) {
    assert!(
        (5..=7).contains(&cards.len()),
        "Cannot evaluate {} cards",
        cards.len()
    );

    let mut best: Option<(HandRank, [Card; 5])> = None;
    for_each_five(cards, |hand| {
        let rank = evaluate5(hand);
        if best.is_none_or(|(b, _)| rank > b) {
            best = Some((rank, *hand));
        }
    });

    let (rank, mut hand) = best.unwrap_or_else(|| unreachable!("at least one subset"));

    let mut counts = [0u8; 15];
    hand.iter().for_each(|c| counts[c.rank().value() as usize] += 1);
    hand.sort_unstable_by(|a, b| {
        let ka = (counts[a.rank().value() as usize], *a);
        let kb = (counts[b.rank().value() as usize], *b);
        kb.cmp(&ka)
    });

    (rank, hand)
}

/// Returns the indices of all the ranks equal to the maximum rank.
pub fn find_winners(ranks: &[HandRank]) -> Vec<usize> {
    match ranks.iter().max() {
        Some(best) => ranks
            .iter()
            .enumerate()
            .filter_map(|(idx, r)| (r == best).then_some(idx))
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_cards::{Deck, parse_cards};
    use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

    fn hand5(s: &str) -> [Card; 5] {
        parse_cards(s).unwrap().try_into().unwrap()
    }

    fn hand7(s: &str) -> [Card; 7] {
        parse_cards(s).unwrap().try_into().unwrap()
    }

    #[test]
    fn categories() {
        let hands = [
            ("2c 5d 9h Js Kc", HandCategory::HighCard),
            ("2c 2d 9h Js Kc", HandCategory::OnePair),
            ("2c 2d 9h 9s Kc", HandCategory::TwoPair),
            ("2c 2d 2h 9s Kc", HandCategory::ThreeOfAKind),
            ("5c 6d 7h 8s 9c", HandCategory::Straight),
            ("2h 5h 9h Jh Kh", HandCategory::Flush),
            ("2c 2d 2h 9s 9c", HandCategory::FullHouse),
            ("2c 2d 2h 2s Kc", HandCategory::FourOfAKind),
            ("5s 6s 7s 8s 9s", HandCategory::StraightFlush),
            ("Th Jh Qh Kh Ah", HandCategory::RoyalFlush),
        ];

        let ranks = hands
            .iter()
            .map(|(h, c)| {
                let rank = evaluate5(&hand5(h));
                assert_eq!(rank.category(), *c, "{h}");
                rank
            })
            .collect::<Vec<_>>();

        assert!(ranks.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn wheel() {
        let wheel = evaluate5(&hand5("Ac 2d 3h 4s 5c"));
        assert_eq!(wheel.category(), HandCategory::Straight);
        assert_eq!(wheel.tiebreak(), &[5]);

        let six_high = evaluate5(&hand5("2d 3h 4s 5c 6d"));
        assert!(wheel < six_high);

        let trips = evaluate5(&hand5("Ac Ad Ah Ks Qc"));
        assert!(wheel > trips);

        let broadway = evaluate5(&hand5("Tc Jd Qh Ks Ac"));
        assert_eq!(broadway.tiebreak(), &[14]);

        let steel_wheel = evaluate5(&hand5("As 2s 3s 4s 5s"));
        assert_eq!(steel_wheel.category(), HandCategory::StraightFlush);
        assert_eq!(steel_wheel.tiebreak(), &[5]);

        // No wrap around.
        let rank = evaluate5(&hand5("Qc Kd Ah 2s 3c"));
        assert_eq!(rank.category(), HandCategory::HighCard);
    }

    #[test]
    fn tiebreaks() {
        let quads = evaluate5(&hand5("9c 9d 9h 9s 2c"));
        assert_eq!(quads.tiebreak(), &[9, 2]);
        assert!(quads < evaluate5(&hand5("9c 9d 9h 9s 3c")));

        let boat = evaluate5(&hand5("3c 3d Kh Ks Kc"));
        assert_eq!(boat.tiebreak(), &[13, 3]);
        assert!(boat > evaluate5(&hand5("Qc Qd Ah As Qh")));

        let two_pair = evaluate5(&hand5("Jc Jd 4h 4s Ac"));
        assert_eq!(two_pair.tiebreak(), &[11, 4, 14]);
        assert!(two_pair > evaluate5(&hand5("Jh Js 4d 4c Kc")));
        assert!(two_pair < evaluate5(&hand5("Jh Js 5d 5c 2c")));

        let pair = evaluate5(&hand5("8c 8d Ah 5s 3c"));
        assert_eq!(pair.tiebreak(), &[8, 14, 5, 3]);

        let flush = evaluate5(&hand5("Ah 9h 7h 4h 2h"));
        assert_eq!(flush.tiebreak(), &[14, 9, 7, 4, 2]);
        assert!(flush < evaluate5(&hand5("Ac 9c 7c 4c 3c")));

        // Suits never break ties.
        assert_eq!(
            evaluate5(&hand5("Ah Kd 7c 5s 2h")),
            evaluate5(&hand5("As Kc 7d 5h 2c"))
        );
    }

    #[test]
    fn evaluate7_is_best_subset() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut deck = Deck::default();

        for _ in 0..2_000 {
            deck.shuffle(&mut rng);
            let mut cards: [Card; 7] = deck.cards()[..7].try_into().unwrap();
            let rank = evaluate7(&cards);

            let mut best = None;
            for_each_five(&cards, |h| {
                let r = evaluate5(h);
                best = best.max(Some(r));
            });
            assert_eq!(Some(rank), best);

            cards.shuffle(&mut rng);
            assert_eq!(evaluate7(&cards), rank);
            assert_eq!(evaluate(&cards), rank);
        }
    }

    #[test]
    fn evaluate_with_best_cards() {
        let cards = hand7("Kh 2c Td Ks 7h Kd Tc");
        let (rank, best) = evaluate_with_best(&cards);
        assert_eq!(rank, evaluate7(&cards));
        assert_eq!(rank.category(), HandCategory::FullHouse);
        assert_eq!(best, hand5("Ks Kh Kd Td Tc"));
        assert_eq!(rank.describe(), "Full House, Kings full of Tens");

        let cards = parse_cards("5c 4d Ah 3s 2c 9d").unwrap();
        let (rank, best) = evaluate_with_best(&cards);
        assert_eq!(rank.to_string(), "Straight, Five high");
        assert!(!best.iter().any(|c| c.rank() == Rank::Nine));
    }

    #[test]
    fn winners() {
        let board = parse_cards("2c 7d 9h Js Kc").unwrap();
        let rank = |hole: &str| {
            let mut cards = parse_cards(hole).unwrap();
            cards.extend_from_slice(&board);
            evaluate(&cards)
        };

        let ranks = [rank("Ah 3d"), rank("Ad 4c"), rank("Qd 3c")];
        assert_eq!(find_winners(&ranks), vec![0, 1]);
        assert_eq!(find_winners(&ranks[..1]), vec![0]);
        assert!(find_winners(&[]).is_empty());

        // Board plays.
        let board = parse_cards("Tc Jd Qh Ks Ac").unwrap();
        let ranks = ["2c 3d", "4h 5s"]
            .iter()
            .map(|h| {
                let mut cards = parse_cards(h).unwrap();
                cards.extend_from_slice(&board);
                evaluate(&cards)
            })
            .collect::<Vec<_>>();
        assert_eq!(find_winners(&ranks), vec![0, 1]);
    }

    #[test]
    fn all_five_cards_hands() {
        let mut counts = [0usize; 10];
        Deck::default().for_each(5, |hand| {
            let hand: &[Card; 5] = hand.try_into().unwrap();
            counts[evaluate5(hand).category() as usize] += 1;
        });

        assert_eq!(
            counts,
            [
                1_302_540, 1_098_240, 123_552, 54_912, 10_200, 5_108, 3_744, 624, 36, 4
            ]
        );
    }

    #[test]
    fn rank_json() {
        let rank = evaluate5(&hand5("Kd Kc Ts Th Kh"));
        let json = serde_json::to_string(&rank).unwrap();
        let decoded: HandRank = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, rank);
        assert_eq!(decoded.tiebreak(), &[13, 10]);

        let bad = [
            r#"{"category":"FullHouse","tiebreak":[13,10,0,0,0],"len":9}"#,
            r#"{"category":"FullHouse","tiebreak":[13,10,0,0,0],"len":0}"#,
            r#"{"category":"FullHouse","tiebreak":[13,1,0,0,0],"len":2}"#,
            r#"{"category":"FullHouse","tiebreak":[13,10,4,0,0],"len":2}"#,
        ];
        for json in bad {
            assert!(serde_json::from_str::<HandRank>(json).is_err(), "{json}");
        }
    }
}
