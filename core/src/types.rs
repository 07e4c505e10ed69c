use serde::{Deserialize, Serialize};

/// Position of a card in the dealt deck, also its identity for the whole game.
pub type CardId = u8;

/// Count type used for pair counts and alphabet sizes.
pub type PairCount = u8;

/// Whole seconds left on the countdown.
pub type Seconds = u16;

/// Size of the fixed symbol alphabet, the largest supported number of pairs.
pub const MAX_PAIRS: PairCount = 8;

/// Generation counter bumped on every (re)initialization.
///
/// Scheduled events carry the epoch they were created in, the controller drops any event whose epoch is not the
/// current one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Epoch(u32);

impl Epoch {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

pub const fn card_count(pairs: PairCount) -> usize {
    (pairs as usize) * 2
}
