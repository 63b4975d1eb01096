// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! A deck of cards.
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{Card, CardError, CardSet, Rank, Result, Suit};

mod parallel;
pub use parallel::combinations;

/// A cards Deck.
///
/// The deck holds the cards still available for dealing, cards removed or
/// dealt never come back unless a new deck is created.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The number of cards in the deck.
    pub const SIZE: usize = 52;

    /// Creates a new shuffled deck.
    pub fn new_and_shuffled<R: Rng>(rng: &mut R) -> Self {
        let mut deck = Self::default();
        deck.cards.shuffle(rng);
        deck
    }

    /// Creates a new deck shuffled with a seeded generator.
    ///
    /// The same seed always produces the same cards order.
    pub fn with_seed(seed: u64) -> Self {
        Self::new_and_shuffled(&mut StdRng::seed_from_u64(seed))
    }

    /// Creates an ordered deck without the `excluded` cards.
    pub fn without(excluded: CardSet) -> Self {
        let cards = Self::default()
            .cards
            .into_iter()
            .filter(|c| !excluded.contains(*c))
            .collect();
        Self { cards }
    }

    /// Shuffles the cards left in the deck.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Deals a card from the deck.
    pub fn deal(&mut self) -> Result<Card> {
        self.cards.pop().ok_or(CardError::DeckExhausted {
            requested: 1,
            available: 0,
        })
    }

    /// Deals `n` cards from the deck, fails without dealing if there are not
    /// enough cards left.
    pub fn deal_n(&mut self, n: usize) -> Result<Vec<Card>> {
        if n > self.cards.len() {
            return Err(CardError::DeckExhausted {
                requested: n,
                available: self.cards.len(),
            });
        }

        let mut dealt = self.cards.split_off(self.cards.len() - n);
        dealt.reverse();
        Ok(dealt)
    }

    /// Checks if the deck is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards in the deck.
    pub fn count(&self) -> usize {
        self.cards.len()
    }

    /// Checks if a card is still in the deck.
    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// The cards left in the deck, the next card dealt is the last one.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The set of cards left in the deck.
    pub fn remaining(&self) -> CardSet {
        CardSet::from_cards(&self.cards)
    }

    /// Removes a card from the deck.
    pub fn remove(&mut self, card: Card) -> Result<()> {
        match self.cards.iter().position(|c| c == &card) {
            Some(pos) => {
                self.cards.remove(pos);
                Ok(())
            }
            None => Err(CardError::NotInDeck(card)),
        }
    }

    /// Removes all cards from the deck, fails on the first card not in the
    /// deck leaving the previous cards removed.
    pub fn remove_all(&mut self, cards: &[Card]) -> Result<()> {
        cards.iter().try_for_each(|c| self.remove(*c))
    }

    /// Calls the `f` closure for each k-cards hand.
    ///
    /// Panics if k is not 0 <= k <= 7.
    pub fn for_each<F>(&self, k: usize, mut f: F)
    where
        F: FnMut(&[Card]),
    {
        assert!(k <= 7, "0 <= k <= 7");

        if k > self.cards.len() {
            return;
        }

        if k == 0 {
            f(&[]);
            return;
        }

        let n = self.cards.len();
        let mut h = [Card::new(Rank::Ace, Suit::Hearts); 7];
        parallel::for_each_ksubset(n, k, 0, combinations(n, k), |p| {
            for (idx, &pos) in p.iter().enumerate() {
                h[idx] = self.cards[pos];
            }

            f(&h[..k]);
        });
    }
}

impl Default for Deck {
    fn default() -> Self {
        let cards = Rank::ranks()
            .flat_map(|r| Suit::suits().map(move |s| Card::new(r, s)))
            .collect::<Vec<_>>();
        Self { cards }
    }
}

impl IntoIterator for Deck {
    type Item = Card;
    type IntoIter = std::vec::IntoIter<Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}
