// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker cards definitions and text parsing.
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{fmt, str::FromStr};

use crate::{CardError, CardSet, Result};

/// A Poker card.
///
/// A card is stored as a single byte id in `0..52` with the following layout:
///
/// ```text
///   id = (rank - 2) * 4 + suit
///   rank = 2 (deuce) .. 14 (ace)
///   suit = 0 (clubs), 1 (diamonds), 2 (hearts), 3 (spades)
/// ```
///
/// so that ordering cards by id orders them by rank first and suit second. The
/// suit only breaks ties for display, it never affects a hand strength.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Card(u8);

impl Card {
    /// Create a card given a rank and a suit.
    pub const fn new(rank: Rank, suit: Suit) -> Card {
        Self((rank as u8 - 2) * 4 + suit as u8)
    }

    /// Creates a card from its id, returns `None` if the id is not in `0..52`.
    pub fn from_id(id: u8) -> Option<Card> {
        (usize::from(id) < crate::Deck::SIZE).then_some(Self(id))
    }

    /// This card unique id in `0..52`.
    #[inline]
    pub fn id(&self) -> u8 {
        self.0
    }

    /// The bit for this card in a 52 bits card mask.
    #[inline]
    pub fn mask(&self) -> u64 {
        1 << self.0
    }

    /// Returns the card suit.
    pub fn suit(&self) -> Suit {
        match self.0 & 0x3 {
            0 => Suit::Clubs,
            1 => Suit::Diamonds,
            2 => Suit::Hearts,
            _ => Suit::Spades,
        }
    }

    /// Returns the card rank.
    pub fn rank(&self) -> Rank {
        Rank::ALL[usize::from(self.0 >> 2)]
    }

    /// Parses a single two characters card token like `Ah` or `td`.
    ///
    /// The `10` rank alias is accepted too, so `10h` parses as `Th`.
    pub fn parse(token: &str) -> Result<Card> {
        let token = token.trim();
        let err = |reason: &str| CardError::Parse {
            text: token.to_string(),
            reason: reason.to_string(),
        };

        let (rank, suit) = match token.len() {
            0 => return Err(err("empty card token")),
            2 => {
                let mut chars = token.chars();
                let r = chars.next().ok_or_else(|| err("missing rank"))?;
                let s = chars.next().ok_or_else(|| err("missing suit"))?;
                (Rank::from_char(r), s)
            }
            3 if token.starts_with("10") => {
                let s = token.chars().nth(2).ok_or_else(|| err("missing suit"))?;
                (Some(Rank::Ten), s)
            }
            _ => return Err(err("a card must be a rank followed by a suit")),
        };

        let rank = rank.ok_or_else(|| err("invalid rank, expected one of 23456789TJQKA"))?;
        let suit = Suit::from_char(suit).ok_or_else(|| err("invalid suit, expected one of shdc"))?;
        Ok(Card::new(rank, suit))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank(), self.suit())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({}{})", self.rank(), self.suit())
    }
}

impl FromStr for Card {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        Card::parse(s)
    }
}

// Cards travel as their text notation so that logs and results stay readable.
impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Card::parse(&text).map_err(de::Error::custom)
    }
}

/// Card rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Deuce
    Deuce = 2,
    /// Trey
    Trey,
    /// Four
    Four,
    /// Five
    Five,
    /// Six
    Six,
    /// Seven
    Seven,
    /// Eight
    Eight,
    /// Nine
    Nine,
    /// Ten
    Ten,
    /// Jack
    Jack,
    /// Queen
    Queen,
    /// King
    King,
    /// Ace
    Ace,
}

impl Rank {
    const ALL: [Rank; 13] = {
        use Rank::*;
        [
            Deuce, Trey, Four, Five, Six, Seven, Eight, Nine, Ten, Jack, Queen, King, Ace,
        ]
    };

    /// Returns all ranks from deuce to ace.
    pub fn ranks() -> impl DoubleEndedIterator<Item = Rank> {
        Self::ALL.into_iter()
    }

    /// The rank numeric value, 2 for a deuce up to 14 for an ace.
    #[inline]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a rank from its numeric value in `2..=14`.
    pub fn from_value(value: u8) -> Option<Rank> {
        (2..=14)
            .contains(&value)
            .then(|| Self::ALL[usize::from(value - 2)])
    }

    /// Parses a rank character, case insensitive.
    pub fn from_char(c: char) -> Option<Rank> {
        let rank = match c.to_ascii_uppercase() {
            '2' => Rank::Deuce,
            '3' => Rank::Trey,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' => Rank::Ten,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            'K' => Rank::King,
            'A' => Rank::Ace,
            _ => return None,
        };

        Some(rank)
    }

    /// The rank notation character.
    pub const fn to_char(self) -> char {
        match self {
            Rank::Deuce => '2',
            Rank::Trey => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    /// The plural rank name, e.g. "Kings".
    pub const fn plural(self) -> &'static str {
        match self {
            Rank::Deuce => "Deuces",
            Rank::Trey => "Treys",
            Rank::Four => "Fours",
            Rank::Five => "Fives",
            Rank::Six => "Sixes",
            Rank::Seven => "Sevens",
            Rank::Eight => "Eights",
            Rank::Nine => "Nines",
            Rank::Ten => "Tens",
            Rank::Jack => "Jacks",
            Rank::Queen => "Queens",
            Rank::King => "Kings",
            Rank::Ace => "Aces",
        }
    }

    /// The singular rank name, e.g. "King".
    pub const fn name(self) -> &'static str {
        match self {
            Rank::Deuce => "Deuce",
            Rank::Trey => "Trey",
            Rank::Four => "Four",
            Rank::Five => "Five",
            Rank::Six => "Six",
            Rank::Seven => "Seven",
            Rank::Eight => "Eight",
            Rank::Nine => "Nine",
            Rank::Ten => "Ten",
            Rank::Jack => "Jack",
            Rank::Queen => "Queen",
            Rank::King => "King",
            Rank::Ace => "Ace",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Card suit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit.
    Clubs = 0,
    /// Diamonds suit.
    Diamonds = 1,
    /// Hearts suit.
    Hearts = 2,
    /// Spades suit.
    Spades = 3,
}

impl Suit {
    /// Returns all suits.
    pub fn suits() -> impl DoubleEndedIterator<Item = Suit> {
        [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades].into_iter()
    }

    /// Parses a suit character, case insensitive.
    pub fn from_char(c: char) -> Option<Suit> {
        match c.to_ascii_lowercase() {
            'c' => Some(Suit::Clubs),
            'd' => Some(Suit::Diamonds),
            'h' => Some(Suit::Hearts),
            's' => Some(Suit::Spades),
            _ => None,
        }
    }

    /// The suit notation character.
    pub const fn to_char(self) -> char {
        match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Parses cards from text.
///
/// Tokens can be separated by spaces or commas (`"Ah Kd, 7c"`) or written
/// back to back (`"AhKd7c"`). Fails on the first malformed token or if a card
/// appears twice.
pub fn parse_cards(text: &str) -> Result<Vec<Card>> {
    parse_cards_excluding(text, CardSet::EMPTY)
}

/// Parses cards from text rejecting any card in the `excluded` set.
pub fn parse_cards_excluding(text: &str, excluded: CardSet) -> Result<Vec<Card>> {
    let mut seen = CardSet::EMPTY;
    let mut cards = Vec::new();

    for token in tokenize(text)? {
        let card = Card::parse(token)?;
        if excluded.contains(card) {
            return Err(CardError::Excluded(card));
        }

        if !seen.insert(card) {
            return Err(CardError::Duplicate(card));
        }

        cards.push(card);
    }

    Ok(cards)
}

/// Formats cards as space separated tokens.
pub fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits text into card tokens.
fn tokenize(text: &str) -> Result<Vec<&str>> {
    let mut tokens = Vec::new();

    for part in text.split(|c: char| c.is_whitespace() || c == ',') {
        if part.is_empty() {
            continue;
        }

        if !part.is_ascii() {
            return Err(CardError::Parse {
                text: part.to_string(),
                reason: "unexpected non ascii character".to_string(),
            });
        }

        // Concatenated tokens, split at rank boundaries.
        let mut rest = part;
        while !rest.is_empty() {
            let len = if rest.starts_with("10") { 3 } else { 2 };
            if rest.len() < len {
                return Err(CardError::Parse {
                    text: rest.to_string(),
                    reason: "incomplete card token".to_string(),
                });
            }

            let (token, tail) = rest.split_at(len);
            tokens.push(token);
            rest = tail;
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Deck;
    use ahash::HashSet;

    #[test]
    fn card_encoding() {
        let mut ids = HashSet::default();
        for card in Deck::default() {
            assert_eq!(Card::new(card.rank(), card.suit()), card);
            assert_eq!(Card::from_id(card.id()), Some(card));
            ids.insert(card.id());
        }

        // Check uniqueness.
        assert_eq!(ids.len(), Deck::SIZE);
        assert_eq!(Card::from_id(52), None);

        // Rank first then suit.
        let kd = Card::new(Rank::King, Suit::Diamonds);
        let ks = Card::new(Rank::King, Suit::Spades);
        let ac = Card::new(Rank::Ace, Suit::Clubs);
        assert!(kd < ks);
        assert!(ks < ac);
    }

    #[test]
    fn card_to_string() {
        let c = Card::new(Rank::King, Suit::Diamonds);
        assert_eq!(c.to_string(), "Kd");

        let c = Card::new(Rank::Five, Suit::Spades);
        assert_eq!(c.to_string(), "5s");

        let c = Card::new(Rank::Ten, Suit::Hearts);
        assert_eq!(c.to_string(), "Th");

        let c = Card::new(Rank::Ace, Suit::Clubs);
        assert_eq!(c.to_string(), "Ac");
    }

    #[test]
    fn rank_values() {
        assert_eq!(Rank::Deuce.value(), 2);
        assert_eq!(Rank::Ace.value(), 14);
        assert_eq!(Rank::from_value(10), Some(Rank::Ten));
        assert_eq!(Rank::from_value(1), None);
        assert_eq!(Rank::from_value(15), None);
        assert_eq!(Rank::ranks().count(), 13);
    }

    #[test]
    fn parse_single_card() {
        assert_eq!(Card::parse("Ah").unwrap(), Card::new(Rank::Ace, Suit::Hearts));
        assert_eq!(Card::parse("tc").unwrap(), Card::new(Rank::Ten, Suit::Clubs));
        assert_eq!(Card::parse("10d").unwrap(), Card::new(Rank::Ten, Suit::Diamonds));
        assert_eq!("qS".parse::<Card>().unwrap(), Card::new(Rank::Queen, Suit::Spades));

        for bad in ["", "A", "Ax", "1h", "Ahh", "ZZ"] {
            match Card::parse(bad) {
                Err(CardError::Parse { text, .. }) => assert_eq!(text, bad),
                res => panic!("Expected parse error for {bad:?} got {res:?}"),
            }
        }
    }

    #[test]
    fn parse_many_cards() {
        let cards = parse_cards("Ah Kd, 7c").unwrap();
        assert_eq!(format_cards(&cards), "Ah Kd 7c");

        let cards = parse_cards("AhKd10c").unwrap();
        assert_eq!(format_cards(&cards), "Ah Kd Tc");

        assert!(parse_cards("").unwrap().is_empty());
        assert!(matches!(parse_cards("AhKdQ"), Err(CardError::Parse { .. })));
        assert!(matches!(parse_cards("Ah ah"), Err(CardError::Duplicate(_))));

        let excluded = CardSet::from_cards(&[Card::new(Rank::King, Suit::Diamonds)]);
        assert!(matches!(
            parse_cards_excluding("Ah Kd", excluded),
            Err(CardError::Excluded(c)) if c.to_string() == "Kd"
        ));
    }

    #[test]
    fn card_serde() {
        let card = Card::new(Rank::Jack, Suit::Spades);
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, "\"Js\"");
        assert_eq!(serde_json::from_str::<Card>(&json).unwrap(), card);
        assert!(serde_json::from_str::<Card>("\"Jx\"").is_err());
    }
}
