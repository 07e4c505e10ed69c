use alloc::vec::Vec;
use core::num::Saturating;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Playing,
    Won,
    Lost,
}

impl Phase {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Playing
    }
}

/// The whole state of one game, with no knowledge of rendering or timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchEngine {
    cards: Vec<Card>,
    selection: SmallVec<[CardId; 2]>,
    total_pairs: PairCount,
    matched_pairs: Saturating<PairCount>,
    moves: Saturating<u32>,
    remaining_secs: Seconds,
    input_locked: bool,
    phase: Phase,
}

impl MatchEngine {
    pub fn new(deck: Deck, time_limit: Seconds) -> Self {
        let cards = deck
            .iter()
            .enumerate()
            .map(|(id, symbol)| Card::new(id as CardId, symbol))
            .collect();
        Self {
            cards,
            selection: SmallVec::new(),
            total_pairs: deck.pairs(),
            matched_pairs: Saturating(0),
            moves: Saturating(0),
            remaining_secs: time_limit,
            input_locked: false,
            phase: Default::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: CardId) -> Result<&Card> {
        self.cards
            .get(usize::from(id))
            .ok_or(GameError::InvalidCardId)
    }

    pub fn card_ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().map(|card| card.id)
    }

    pub fn selection(&self) -> &[CardId] {
        &self.selection
    }

    pub fn total_pairs(&self) -> PairCount {
        self.total_pairs
    }

    pub fn matched_pairs(&self) -> PairCount {
        self.matched_pairs.0
    }

    pub fn moves(&self) -> u32 {
        self.moves.0
    }

    pub fn remaining_secs(&self) -> Seconds {
        self.remaining_secs
    }

    pub fn is_input_locked(&self) -> bool {
        self.input_locked
    }

    pub fn counters(&self) -> Counters {
        Counters {
            moves: self.moves(),
            matched_pairs: self.matched_pairs(),
            total_pairs: self.total_pairs,
            remaining_secs: self.remaining_secs,
        }
    }

    pub fn can_reveal(&self, id: CardId) -> bool {
        !self.input_locked
            && !self.phase.is_finished()
            && self.selection.len() < 2
            && self
                .card(id)
                .is_ok_and(|card| matches!(card.state, CardState::Hidden))
    }

    pub fn reveal(&mut self, id: CardId) -> Result<RevealOutcome> {
        use RevealOutcome::*;

        let index = self.validate_id(id)?;
        self.check_not_finished()?;

        if !self.can_reveal(id) {
            return Ok(NoChange);
        }

        self.cards[index].state = CardState::Revealed;
        self.selection.push(id);

        if self.selection.len() == 2 {
            self.moves += 1;
            self.input_locked = true;
            Ok(SelectionComplete)
        } else {
            Ok(Revealed)
        }
    }

    pub fn resolve(&mut self) -> Result<ResolveOutcome> {
        use ResolveOutcome::*;

        self.check_not_finished()?;

        let &[first, second] = self.selection.as_slice() else {
            return Ok(NoChange);
        };
        let pair = [first, second];
        self.selection.clear();

        let outcome = if self.cards[usize::from(first)].symbol == self.cards[usize::from(second)].symbol {
            self.set_pair_state(pair, CardState::Matched);
            self.matched_pairs += 1;

            if self.matched_pairs.0 >= self.total_pairs {
                self.end_game(true);
                Won(pair)
            } else {
                Matched(pair)
            }
        } else {
            self.set_pair_state(pair, CardState::Mismatched);
            Mismatched(pair)
        };

        if !self.phase.is_finished() {
            self.input_locked = false;
        }

        Ok(outcome)
    }

    /// Turns a mismatched pair face down again.
    pub fn conceal(&mut self, pair: [CardId; 2]) -> Result<FlipOutcome> {
        for id in pair {
            self.validate_id(id)?;
        }
        self.check_not_finished()?;

        let mut updated = false;
        for id in pair {
            let card = &mut self.cards[usize::from(id)];
            if matches!(card.state, CardState::Mismatched) {
                card.state = CardState::Hidden;
                updated = true;
            }
        }

        Ok(if updated {
            FlipOutcome::Changed
        } else {
            FlipOutcome::NoChange
        })
    }

    pub fn tick(&mut self) -> Result<TickOutcome> {
        self.check_not_finished()?;

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.end_game(false);
            Ok(TickOutcome::Expired)
        } else {
            Ok(TickOutcome::Ticked(self.remaining_secs))
        }
    }

    fn set_pair_state(&mut self, pair: [CardId; 2], state: CardState) {
        for id in pair {
            self.cards[usize::from(id)].state = state;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.phase.is_finished() {
            return;
        }

        self.phase = if won { Phase::Won } else { Phase::Lost };
        self.input_locked = true;
    }

    fn validate_id(&self, id: CardId) -> Result<usize> {
        let index = usize::from(id);
        if index < self.cards.len() {
            Ok(index)
        } else {
            Err(GameError::InvalidCardId)
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.phase.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[test]
    fn second_reveal_completes_selection_and_locks_input() {
        let mut engine = MatchEngine::new(abab(), 120);

        assert_eq!(engine.reveal(0).unwrap(), RevealOutcome::Revealed);
        assert_eq!(engine.card(0).unwrap().state, CardState::Revealed);
        assert_eq!(engine.reveal(1).unwrap(), RevealOutcome::SelectionComplete);

        assert_eq!(engine.moves(), 1);
        assert!(engine.is_input_locked());
        assert_eq!(engine.reveal(2).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.card(2).unwrap().state, CardState::Hidden);
    }

    #[test]
    fn revealing_a_face_up_card_is_a_no_op() {
        let mut engine = MatchEngine::new(abab(), 120);

        engine.reveal(0).unwrap();

        assert_eq!(engine.reveal(0).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.selection(), &[0]);
        assert_eq!(engine.moves(), 0);
    }

    #[test]
    fn unknown_card_is_rejected() {
        let mut engine = MatchEngine::new(abab(), 120);

        assert_eq!(engine.reveal(4), Err(GameError::InvalidCardId));
    }

    #[test]
    fn mismatch_flags_pair_then_conceal_hides_it() {
        let mut engine = MatchEngine::new(abab(), 120);
        engine.reveal(0).unwrap();
        engine.reveal(1).unwrap();

        assert_eq!(engine.resolve().unwrap(), ResolveOutcome::Mismatched([0, 1]));
        assert_eq!(engine.card(0).unwrap().state, CardState::Mismatched);
        assert!(engine.selection().is_empty());
        assert!(!engine.is_input_locked());

        assert_eq!(engine.conceal([0, 1]).unwrap(), FlipOutcome::Changed);
        assert_eq!(engine.card(0).unwrap().state, CardState::Hidden);
        assert_eq!(engine.card(1).unwrap().state, CardState::Hidden);
        assert_eq!(engine.conceal([0, 1]).unwrap(), FlipOutcome::NoChange);
    }

    #[test]
    fn matching_every_pair_wins_and_locks() {
        let mut engine = MatchEngine::new(abab(), 120);

        engine.reveal(0).unwrap();
        engine.reveal(2).unwrap();
        assert_eq!(engine.resolve().unwrap(), ResolveOutcome::Matched([0, 2]));
        assert_eq!(engine.matched_pairs(), 1);

        engine.reveal(1).unwrap();
        engine.reveal(3).unwrap();
        assert_eq!(engine.resolve().unwrap(), ResolveOutcome::Won([1, 3]));

        assert_eq!(engine.phase(), Phase::Won);
        assert_eq!(engine.matched_pairs(), engine.total_pairs());
        assert!(engine.is_input_locked());
        assert!(engine.cards().iter().all(|card| card.state == CardState::Matched));
        assert_eq!(engine.reveal(0), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn resolve_without_full_selection_changes_nothing() {
        let mut engine = MatchEngine::new(abab(), 120);
        engine.reveal(0).unwrap();

        assert_eq!(engine.resolve().unwrap(), ResolveOutcome::NoChange);
        assert_eq!(engine.selection(), &[0]);
    }

    #[test]
    fn countdown_expiry_loses_once() {
        let mut engine = MatchEngine::new(abab(), 2);

        assert_eq!(engine.tick().unwrap(), TickOutcome::Ticked(1));
        assert_eq!(engine.tick().unwrap(), TickOutcome::Expired);
        assert_eq!(engine.phase(), Phase::Lost);
        assert!(engine.is_input_locked());

        assert_eq!(engine.tick(), Err(GameError::AlreadyEnded));
        assert_eq!(engine.remaining_secs(), 0);
    }

    #[test]
    fn pending_resolution_is_dropped_after_loss() {
        let mut engine = MatchEngine::new(abab(), 1);
        engine.reveal(0).unwrap();
        engine.reveal(2).unwrap();

        assert_eq!(engine.tick().unwrap(), TickOutcome::Expired);

        assert_eq!(engine.resolve(), Err(GameError::AlreadyEnded));
        assert_eq!(engine.card(0).unwrap().state, CardState::Revealed);
        assert_eq!(engine.matched_pairs(), 0);
    }
}
