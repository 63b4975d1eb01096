// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hand state machine.
use log::debug;

use holdem_cards::{Card, Deck};
use holdem_eval::{
    EquityRequest, HandRank, MAX_PLAYERS, PlayerSpec, calculate_equity, evaluate7,
    evaluate_with_best, find_winners,
};

use crate::{
    EventLog, GameError, Result, Stage,
    event_log::EventKind,
    replay::Replayer,
};

/// A single hand dealt from a seeded deck.
///
/// The hand moves through the [Stage]s with [GameState::advance], each
/// transition deals the cards, appends the events to the log and then
/// updates the state. The same seed and number of players always deal the
/// same hand.
#[derive(Debug, Clone)]
pub struct GameState {
    seed: u64,
    num_players: usize,
    deck: Option<Deck>,
    holes: Vec<[Card; 2]>,
    board: Vec<Card>,
    stage: Stage,
    winners: Option<Vec<usize>>,
    winning_rank: Option<HandRank>,
    log: Option<EventLog>,
}

impl GameState {
    /// Creates a new hand that records its events.
    pub fn new(num_players: usize, seed: u64) -> Result<Self> {
        Self::with_log(num_players, seed, true)
    }

    /// Creates a new hand, with `keep_log` false the hand has no log.
    pub fn with_log(num_players: usize, seed: u64, keep_log: bool) -> Result<Self> {
        if !(2..=MAX_PLAYERS).contains(&num_players) {
            return Err(GameError::InvalidPlayers(num_players));
        }

        Ok(Self {
            seed,
            num_players,
            deck: Some(Deck::with_seed(seed)),
            holes: Vec::with_capacity(num_players),
            board: Vec::with_capacity(5),
            stage: Stage::NotStarted,
            winners: None,
            winning_rank: None,
            log: keep_log.then(EventLog::new),
        })
    }

    /// Rebuilds a hand from its event log.
    ///
    /// The replayed hand has no deck, it can be inspected and can take equity
    /// snapshots but cannot deal more cards.
    pub fn replay(log: &EventLog) -> Result<Self> {
        let replayer = Replayer::new(log)?;
        let snapshot = replayer.last();
        let Some(seed) = snapshot.seed else {
            return Err(GameError::InvalidLog {
                index: 0,
                reason: "the log has no events".to_string(),
            });
        };

        debug!(
            "Replayed {} events, hand at {} with {} players",
            log.len(),
            snapshot.stage,
            snapshot.num_players
        );

        Ok(Self {
            seed,
            num_players: snapshot.num_players,
            deck: None,
            holes: snapshot.holes.clone(),
            board: snapshot.board.clone(),
            stage: snapshot.stage,
            winners: snapshot.winners.clone(),
            winning_rank: snapshot.winning_rank,
            log: Some(log.clone()),
        })
    }

    /// Moves the hand to the next stage and returns the new stage.
    pub fn advance(&mut self) -> Result<Stage> {
        if self.stage != Stage::Complete && self.deck.is_none() {
            return Err(GameError::NoDeck);
        }

        match self.stage {
            Stage::NotStarted => self.enter_preflop()?,
            Stage::Preflop => self.enter_board(Stage::Flop)?,
            Stage::Flop => self.enter_board(Stage::Turn)?,
            Stage::Turn => self.enter_board(Stage::River)?,
            Stage::River => self.enter_showdown(),
            Stage::Showdown => self.enter_complete(),
            Stage::Complete => return Err(GameError::HandComplete),
        }

        Ok(self.stage)
    }

    /// Plays all the remaining stages and returns the winners.
    pub fn run_to_showdown(&mut self) -> Result<Vec<usize>> {
        if self.stage == Stage::Complete {
            return Err(GameError::HandComplete);
        }

        while self.stage != Stage::Complete {
            self.advance()?;
        }

        Ok(self.winners.clone().unwrap_or_default())
    }

    /// Computes the players equities at the current stage and records them
    /// in the log.
    ///
    /// Equities are sampled with `trials` trials before the turn and
    /// enumerated exactly from the turn on.
    pub fn equity(&mut self, trials: u64, seed: Option<u64>) -> Result<Vec<f64>> {
        if self.stage == Stage::Complete {
            return Err(GameError::HandComplete);
        }

        if self.stage == Stage::NotStarted || self.holes.len() != self.num_players {
            return Err(GameError::NotStarted);
        }

        let players = self.holes.iter().map(|h| PlayerSpec::Exact(*h)).collect();
        let mut request = EquityRequest::new(players).with_board(self.board.clone());
        if self.board.len() >= 4 {
            request = request.enumerate();
        } else {
            request = request.trials(trials);
            if let Some(seed) = seed {
                request = request.seed(seed);
            }
        }

        let result = calculate_equity(&request)?;
        let equities = result.players.iter().map(|p| p.equity).collect::<Vec<_>>();

        debug!("Equities at {}: {equities:?}", self.stage);

        self.append(
            self.stage,
            EventKind::EquitySnapshot {
                equities: equities.clone(),
            },
        );

        Ok(equities)
    }

    /// The deck seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of players.
    pub fn num_players(&self) -> usize {
        self.num_players
    }

    /// The current stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The board cards.
    pub fn board(&self) -> &[Card] {
        &self.board
    }

    /// All players hole cards, empty before the deal.
    pub fn holes(&self) -> &[[Card; 2]] {
        &self.holes
    }

    /// A player hole cards.
    pub fn hole_cards(&self, player: usize) -> Option<[Card; 2]> {
        self.holes.get(player).copied()
    }

    /// The winners after showdown.
    pub fn winners(&self) -> Option<&[usize]> {
        self.winners.as_deref()
    }

    /// The winning hand rank after showdown.
    pub fn winning_rank(&self) -> Option<HandRank> {
        self.winning_rank
    }

    /// The events log, None if the hand does not keep a log.
    pub fn event_log(&self) -> Option<&EventLog> {
        self.log.as_ref()
    }

    /// Checks if this hand can deal, replayed hands cannot.
    pub fn has_deck(&self) -> bool {
        self.deck.is_some()
    }

    fn deck_mut(&mut self) -> Result<&mut Deck> {
        self.deck.as_mut().ok_or(GameError::NoDeck)
    }

    fn append(&mut self, stage: Stage, kind: EventKind) {
        if let Some(log) = self.log.as_mut() {
            log.append(stage, kind);
        }
    }

    fn enter_preflop(&mut self) -> Result<()> {
        let num_players = self.num_players;
        let deck = self.deck_mut()?;
        let mut holes = Vec::with_capacity(num_players);
        for _ in 0..num_players {
            holes.push([deck.deal()?, deck.deal()?]);
        }

        self.append(
            Stage::Preflop,
            EventKind::HandStarted {
                players: num_players,
                seed: self.seed,
            },
        );

        for (player, cards) in holes.iter().enumerate() {
            self.append(
                Stage::Preflop,
                EventKind::HoleCards {
                    player,
                    cards: *cards,
                },
            );
        }

        debug!("Dealt {num_players} players with seed {}", self.seed);

        self.holes = holes;
        self.stage = Stage::Preflop;
        Ok(())
    }

    fn enter_board(&mut self, stage: Stage) -> Result<()> {
        let cards = self.deck_mut()?.deal_n(stage.board_cards())?;
        self.append(
            stage,
            EventKind::Board {
                cards: cards.clone(),
            },
        );

        debug!("Dealt {} {cards:?}", stage);

        self.board.extend(cards);
        self.stage = stage;
        Ok(())
    }

    fn enter_showdown(&mut self) {
        let (winners, rank, best) = showdown(&self.holes, &self.board);
        self.append(
            Stage::Showdown,
            EventKind::Showdown {
                winners: winners.clone(),
                rank,
                best,
            },
        );

        debug!("Showdown winners {winners:?} with {}", rank.describe());

        self.winners = Some(winners);
        self.winning_rank = Some(rank);
        self.stage = Stage::Showdown;
    }

    fn enter_complete(&mut self) {
        self.append(Stage::Complete, EventKind::HandComplete);
        debug!("Hand {} complete", self.seed);
        self.stage = Stage::Complete;
    }
}

/// Evaluates all players hands on a five cards board, returns the winners,
/// the winning rank and the first winner best five cards.
pub(crate) fn showdown(holes: &[[Card; 2]], board: &[Card]) -> (Vec<usize>, HandRank, [Card; 5]) {
    let seven = |hole: &[Card; 2]| {
        let mut hand = [hole[0]; 7];
        hand[..2].copy_from_slice(hole);
        hand[2..].copy_from_slice(board);
        hand
    };

    let ranks = holes
        .iter()
        .map(|hole| evaluate7(&seven(hole)))
        .collect::<Vec<_>>();

    let winners = find_winners(&ranks);
    let (rank, best) = evaluate_with_best(&seven(&holes[winners[0]]));
    (winners, rank, best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_cards::CardSet;
    use holdem_eval::evaluate;

    fn play(players: usize, seed: u64) -> GameState {
        let mut state = GameState::new(players, seed).unwrap();
        state.run_to_showdown().unwrap();
        state
    }

    #[test]
    fn invalid_players() {
        assert_eq!(
            GameState::new(1, 0).unwrap_err(),
            GameError::InvalidPlayers(1)
        );
        assert_eq!(
            GameState::new(11, 0).unwrap_err(),
            GameError::InvalidPlayers(11)
        );
        assert!(GameState::new(10, 0).is_ok());
    }

    #[test]
    fn stages() {
        let mut state = GameState::new(4, 42).unwrap();
        assert_eq!(state.stage(), Stage::NotStarted);
        assert!(state.holes().is_empty());
        assert!(state.hole_cards(0).is_none());

        let expected = [
            (Stage::Preflop, 0),
            (Stage::Flop, 3),
            (Stage::Turn, 4),
            (Stage::River, 5),
            (Stage::Showdown, 5),
            (Stage::Complete, 5),
        ];

        for (stage, board) in expected {
            assert_eq!(state.advance().unwrap(), stage);
            assert_eq!(state.board().len(), board);
            assert_eq!(state.holes().len(), 4);
            assert_eq!(state.winners().is_some(), stage >= Stage::Showdown);
        }

        assert_eq!(state.advance().unwrap_err(), GameError::HandComplete);
        assert_eq!(state.run_to_showdown().unwrap_err(), GameError::HandComplete);
        assert_eq!(state.equity(100, None).unwrap_err(), GameError::HandComplete);

        // 13 distinct cards dealt.
        let dealt = state
            .holes()
            .iter()
            .flatten()
            .chain(state.board())
            .copied()
            .collect::<CardSet>();
        assert_eq!(dealt.len(), 4 * 2 + 5);

        // Hand started, hole cards, 3 board cards events, showdown, complete.
        let log = state.event_log().unwrap();
        assert_eq!(log.len(), 1 + 4 + 3 + 2);
        assert!(
            log.iter()
                .enumerate()
                .all(|(i, e)| e.sequence == i as u64)
        );
        assert!(matches!(
            log.get(0).map(|e| &e.kind),
            Some(EventKind::HandStarted {
                players: 4,
                seed: 42
            })
        ));
        assert_eq!(
            log.last().map(|e| &e.kind),
            Some(&EventKind::HandComplete)
        );
    }

    #[test]
    fn deterministic() {
        let s1 = play(6, 42);
        let s2 = play(6, 42);
        assert_eq!(s1.board(), s2.board());
        assert_eq!(s1.holes(), s2.holes());
        assert_eq!(s1.winners(), s2.winners());
        assert_eq!(s1.event_log(), s2.event_log());

        let s3 = play(6, 43);
        assert_ne!(s1.event_log(), s3.event_log());
    }

    #[test]
    fn winners_have_the_best_hands() {
        for seed in 0..50 {
            let state = play(5, seed);
            let ranks = state
                .holes()
                .iter()
                .map(|hole| {
                    let mut cards = hole.to_vec();
                    cards.extend_from_slice(state.board());
                    evaluate(&cards)
                })
                .collect::<Vec<_>>();

            let best = ranks.iter().max().copied();
            assert_eq!(state.winning_rank(), best);

            let winners = state.winners().unwrap();
            assert!(!winners.is_empty());
            for (player, rank) in ranks.iter().enumerate() {
                assert_eq!(winners.contains(&player), Some(*rank) == best);
            }
        }
    }

    #[test]
    fn without_log() {
        let mut state = GameState::with_log(3, 5, false).unwrap();
        assert!(state.event_log().is_none());
        let winners = state.run_to_showdown().unwrap();
        assert!(state.event_log().is_none());

        // The log does not change the cards.
        let logged = play(3, 5);
        assert_eq!(logged.board(), state.board());
        assert_eq!(logged.winners(), Some(&winners[..]));

        // A new hand has an empty log.
        let state = GameState::new(3, 5).unwrap();
        assert!(state.event_log().is_some_and(|log| log.is_empty()));
    }

    #[test]
    fn equity_snapshots() {
        let mut state = GameState::new(3, 9).unwrap();
        assert_eq!(state.equity(100, None).unwrap_err(), GameError::NotStarted);

        state.advance().unwrap();
        let preflop = state.equity(2_000, Some(1)).unwrap();
        assert_eq!(preflop.len(), 3);
        assert!((preflop.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert_eq!(state.equity(2_000, Some(1)).unwrap(), preflop);

        state.advance().unwrap();
        state.advance().unwrap();
        let turn = state.equity(0, None).unwrap();
        assert!((turn.iter().sum::<f64>() - 1.0).abs() < 1e-9);

        let log = state.event_log().unwrap();
        let snapshots = log
            .iter()
            .filter(|e| matches!(e.kind, EventKind::EquitySnapshot { .. }))
            .map(|e| e.stage)
            .collect::<Vec<_>>();
        assert_eq!(snapshots, vec![Stage::Preflop, Stage::Preflop, Stage::Turn]);

        // Zero trials are rejected before the turn.
        let mut state = GameState::new(2, 9).unwrap();
        state.advance().unwrap();
        assert!(matches!(
            state.equity(0, None),
            Err(GameError::Eval(holdem_eval::EvalError::NoTrials))
        ));
    }

    #[test]
    fn replay() {
        let mut state = GameState::new(4, 42).unwrap();
        state.advance().unwrap();
        state.equity(500, Some(3)).unwrap();
        state.run_to_showdown().unwrap();

        let replayed = GameState::replay(state.event_log().unwrap()).unwrap();
        assert_eq!(replayed.seed(), 42);
        assert_eq!(replayed.num_players(), 4);
        assert_eq!(replayed.stage(), Stage::Complete);
        assert_eq!(replayed.holes(), state.holes());
        assert_eq!(replayed.board(), state.board());
        assert_eq!(replayed.winners(), state.winners());
        assert_eq!(replayed.winning_rank(), state.winning_rank());
        assert_eq!(replayed.event_log(), state.event_log());
        assert!(!replayed.has_deck());

        // Through JSON.
        let json = serde_json::to_string_pretty(state.event_log().unwrap()).unwrap();
        let log: EventLog = serde_json::from_str(&json).unwrap();
        let replayed = GameState::replay(&log).unwrap();
        assert_eq!(replayed.board(), state.board());
        assert_eq!(replayed.winners(), state.winners());

        assert!(matches!(
            GameState::replay(&EventLog::new()),
            Err(GameError::InvalidLog { index: 0, .. })
        ));
    }

    #[test]
    fn replayed_hand_cannot_deal() {
        let mut state = GameState::new(2, 1).unwrap();
        state.advance().unwrap();
        state.advance().unwrap();

        let mut replayed = GameState::replay(state.event_log().unwrap()).unwrap();
        assert_eq!(replayed.stage(), Stage::Flop);
        assert_eq!(replayed.board(), state.board());
        assert_eq!(replayed.advance().unwrap_err(), GameError::NoDeck);
        assert_eq!(replayed.stage(), Stage::Flop);

        // Equities need no deck.
        let equities = replayed.equity(500, Some(2)).unwrap();
        assert_eq!(equities.len(), 2);
    }
}
