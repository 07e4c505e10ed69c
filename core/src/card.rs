use serde::{Deserialize, Serialize};

use crate::{CardId, MAX_PAIRS, PairCount};

/// Opaque face identifier, the renderer decides what each one looks like.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol(u8);

impl Symbol {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    /// The first `pairs` symbols of the fixed alphabet.
    pub fn alphabet(pairs: PairCount) -> impl Iterator<Item = Symbol> {
        (0..pairs.min(MAX_PAIRS)).map(Symbol)
    }
}

/// Player-visible state of a single card.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardState {
    Hidden,
    Revealed,
    Matched,
    /// Part of a failed pair, waiting to be turned face down again.
    Mismatched,
}

impl CardState {
    pub const fn is_face_up(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

impl Default for CardState {
    fn default() -> Self {
        Self::Hidden
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub symbol: Symbol,
    pub state: CardState,
}

impl Card {
    pub const fn new(id: CardId, symbol: Symbol) -> Self {
        Self {
            id,
            symbol,
            state: CardState::Hidden,
        }
    }

    /// Symbol to show for the current state, `None` while face down.
    pub const fn visible_symbol(&self) -> Option<Symbol> {
        if self.state.is_face_up() {
            Some(self.symbol)
        } else {
            None
        }
    }
}
