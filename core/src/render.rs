use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub moves: u32,
    pub matched_pairs: PairCount,
    pub total_pairs: PairCount,
    pub remaining_secs: Seconds,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusMessage {
    Welcome,
    Match,
    TryAgain,
    Victory,
    TimeUp,
}

impl StatusMessage {
    pub const fn text(self) -> &'static str {
        use StatusMessage::*;
        match self {
            Welcome => "Find all matching pairs!",
            Match => "Perfect match! 🎉",
            TryAgain => "Try again! 🤔",
            Victory => "🎊 Victory! You won! 🎊",
            TimeUp => "⏰ Time ran out! Try again! ⏰",
        }
    }
}

/// How urgently the countdown should be styled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimerWarning {
    #[default]
    Normal,
    Low,
    Critical,
}

impl TimerWarning {
    pub const LOW_THRESHOLD: Seconds = 60;
    pub const CRITICAL_THRESHOLD: Seconds = 30;

    pub const fn for_remaining(remaining_secs: Seconds) -> Self {
        if remaining_secs <= Self::CRITICAL_THRESHOLD {
            Self::Critical
        } else if remaining_secs <= Self::LOW_THRESHOLD {
            Self::Low
        } else {
            Self::Normal
        }
    }
}

/// Presentation side of the game, told about every visible change.
///
/// Implementations map [`CardId`]s to whatever handle they draw with, the controller never sees those handles.
pub trait Renderer {
    /// Throw away the current grid and lay out `cards` face down, in order.
    fn render_grid(&mut self, cards: &[Card]);

    /// `symbol` is `None` when the card should be shown face down.
    fn set_card_visual(&mut self, id: CardId, state: CardState, symbol: Option<Symbol>);

    fn set_counters(&mut self, counters: Counters);

    fn set_status_message(&mut self, message: StatusMessage);

    fn set_timer_warning_level(&mut self, level: TimerWarning);

    /// Celebrate each card in the given order, one after another.
    fn play_win_animation(&mut self, ids: &[CardId]);

    fn set_dimmed(&mut self, ids: &[CardId]);
}
