// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! A set of cards packed in a 64 bits word.
use std::ops;

use crate::Card;

/// An unordered set of cards.
///
/// Each card sets the bit at its id, so a full deck uses the 52 low bits of a
/// `u64`. Membership checks and unions are single instructions, which is what
/// the equity engine hot loops need to detect card conflicts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CardSet(u64);

impl CardSet {
    /// The empty set.
    pub const EMPTY: CardSet = CardSet(0);

    /// The set with all 52 cards.
    pub const FULL: CardSet = CardSet((1 << 52) - 1);

    /// Creates a set from a slice of cards.
    pub fn from_cards(cards: &[Card]) -> Self {
        cards.iter().fold(Self::EMPTY, |set, c| set | *c)
    }

    /// Adds a card, returns false if the card was already in the set.
    pub fn insert(&mut self, card: Card) -> bool {
        let present = self.contains(card);
        self.0 |= card.mask();
        !present
    }

    /// Removes a card, returns false if the card was not in the set.
    pub fn remove(&mut self, card: Card) -> bool {
        let present = self.contains(card);
        self.0 &= !card.mask();
        present
    }

    /// Checks if a card is in the set.
    #[inline]
    pub fn contains(&self, card: Card) -> bool {
        self.0 & card.mask() != 0
    }

    /// Checks if this set and the other set share any card.
    #[inline]
    pub fn intersects(&self, other: CardSet) -> bool {
        self.0 & other.0 != 0
    }

    /// Number of cards in the set.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Checks if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// The cards not in this set.
    pub fn complement(&self) -> CardSet {
        CardSet(!self.0 & Self::FULL.0)
    }

    /// The raw bits.
    pub fn bits(&self) -> u64 {
        self.0
    }

    /// Iterates the cards in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Card> + use<> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }

            let id = bits.trailing_zeros() as u8;
            bits &= bits - 1;
            Card::from_id(id)
        })
    }
}

impl ops::BitOr for CardSet {
    type Output = CardSet;

    fn bitor(self, rhs: CardSet) -> CardSet {
        CardSet(self.0 | rhs.0)
    }
}

impl ops::BitOr<Card> for CardSet {
    type Output = CardSet;

    fn bitor(self, rhs: Card) -> CardSet {
        CardSet(self.0 | rhs.mask())
    }
}

impl ops::BitOrAssign<Card> for CardSet {
    fn bitor_assign(&mut self, rhs: Card) {
        self.0 |= rhs.mask();
    }
}

impl ops::BitAnd for CardSet {
    type Output = CardSet;

    fn bitand(self, rhs: CardSet) -> CardSet {
        CardSet(self.0 & rhs.0)
    }
}

impl FromIterator<Card> for CardSet {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, |set, c| set | c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Deck, Rank, Suit};

    #[test]
    fn insert_remove() {
        let ah = Card::new(Rank::Ace, Suit::Hearts);
        let kd = Card::new(Rank::King, Suit::Diamonds);

        let mut set = CardSet::EMPTY;
        assert!(set.insert(ah));
        assert!(!set.insert(ah));
        assert!(set.insert(kd));
        assert_eq!(set.len(), 2);
        assert!(set.contains(ah));

        assert!(set.remove(ah));
        assert!(!set.remove(ah));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![kd]);
    }

    #[test]
    fn full_and_complement() {
        let full = Deck::default().into_iter().collect::<CardSet>();
        assert_eq!(full, CardSet::FULL);
        assert_eq!(full.len(), Deck::SIZE);
        assert!(full.complement().is_empty());

        let ah = Card::new(Rank::Ace, Suit::Hearts);
        let set = CardSet::from_cards(&[ah]);
        assert_eq!(set.complement().len(), 51);
        assert!(!set.complement().contains(ah));
        assert!(set.intersects(full));
        assert!(!set.intersects(set.complement()));
    }
}
