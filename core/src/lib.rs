#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

pub use card::*;
pub use controller::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use render::*;
pub use schedule::*;
pub use types::*;

mod card;
mod controller;
mod engine;
mod error;
mod generator;
mod render;
mod schedule;
mod types;

#[cfg(test)]
mod testing;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub pairs: PairCount,
    pub time_limit: Seconds,
}

impl GameConfig {
    pub const DEFAULT_TIME_LIMIT: Seconds = 120;

    pub const fn new_unchecked(pairs: PairCount, time_limit: Seconds) -> Self {
        Self { pairs, time_limit }
    }

    pub fn new(pairs: PairCount, time_limit: Seconds) -> Self {
        let pairs = pairs.clamp(1, MAX_PAIRS);
        let time_limit = time_limit.max(1);
        Self::new_unchecked(pairs, time_limit)
    }

    pub const fn total_cards(&self) -> usize {
        card_count(self.pairs)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(MAX_PAIRS, Self::DEFAULT_TIME_LIMIT)
    }
}

/// Dealt order of symbols, position `i` becomes the card with id `i`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    symbols: Vec<Symbol>,
}

impl Deck {
    pub fn from_symbols(symbols: &[Symbol]) -> Result<Self> {
        if symbols.is_empty() {
            return Err(GameError::EmptyDeck);
        }
        if symbols.len() > card_count(MAX_PAIRS) {
            return Err(GameError::TooManyPairs);
        }
        if symbols.len() % 2 != 0 {
            return Err(GameError::UnpairedSymbol);
        }

        let pairs = symbols.len() / 2;
        let mut seen = [0u8; MAX_PAIRS as usize];
        for symbol in symbols {
            let index = usize::from(symbol.index());
            if index >= pairs {
                return Err(GameError::UnpairedSymbol);
            }
            seen[index] += 1;
        }
        if seen[..pairs].iter().any(|&count| count != 2) {
            return Err(GameError::UnpairedSymbol);
        }

        Ok(Self {
            symbols: symbols.to_vec(),
        })
    }

    /// Unshuffled deck, each symbol twice in a row.
    pub(crate) fn ordered(pairs: PairCount) -> Self {
        let symbols = Symbol::alphabet(pairs)
            .flat_map(|symbol| [symbol, symbol])
            .collect();
        Self { symbols }
    }

    pub(crate) fn symbols_mut(&mut self) -> &mut [Symbol] {
        &mut self.symbols
    }

    pub fn pairs(&self) -> PairCount {
        // from_symbols caps the length, so this always fits
        (self.symbols.len() / 2) as PairCount
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn get(&self, id: CardId) -> Option<Symbol> {
        self.symbols.get(usize::from(id)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.symbols.iter().copied()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    /// Second card of the selection turned up, a resolution is now due.
    SelectionComplete,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ResolveOutcome {
    NoChange,
    Matched([CardId; 2]),
    Mismatched([CardId; 2]),
    Won([CardId; 2]),
}

impl ResolveOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlipOutcome {
    NoChange,
    Changed,
}

impl FlipOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TickOutcome {
    Ticked(Seconds),
    Expired,
}
