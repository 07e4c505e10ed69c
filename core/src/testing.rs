use alloc::vec::Vec;

use crate::*;

pub(crate) const A: Symbol = Symbol::new(0);
pub(crate) const B: Symbol = Symbol::new(1);

/// Two pairs dealt as `[A, B, A, B]`.
pub(crate) fn abab() -> Deck {
    Deck::from_symbols(&[A, B, A, B]).unwrap()
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum RenderCall {
    Grid(Vec<Card>),
    CardVisual(CardId, CardState, Option<Symbol>),
    Counters(Counters),
    Status(StatusMessage),
    Warning(TimerWarning),
    WinAnimation(Vec<CardId>),
    Dimmed(Vec<CardId>),
}

/// Renderer that remembers every call, in order.
#[derive(Debug, Default)]
pub(crate) struct RenderLog {
    pub calls: Vec<RenderCall>,
}

impl RenderLog {
    pub fn take(&mut self) -> Vec<RenderCall> {
        core::mem::take(&mut self.calls)
    }

    pub fn statuses(&self) -> Vec<StatusMessage> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::Status(message) => Some(*message),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<TimerWarning> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::Warning(level) => Some(*level),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RenderLog {
    fn render_grid(&mut self, cards: &[Card]) {
        self.calls.push(RenderCall::Grid(cards.to_vec()));
    }

    fn set_card_visual(&mut self, id: CardId, state: CardState, symbol: Option<Symbol>) {
        self.calls.push(RenderCall::CardVisual(id, state, symbol));
    }

    fn set_counters(&mut self, counters: Counters) {
        self.calls.push(RenderCall::Counters(counters));
    }

    fn set_status_message(&mut self, message: StatusMessage) {
        self.calls.push(RenderCall::Status(message));
    }

    fn set_timer_warning_level(&mut self, level: TimerWarning) {
        self.calls.push(RenderCall::Warning(level));
    }

    fn play_win_animation(&mut self, ids: &[CardId]) {
        self.calls.push(RenderCall::WinAnimation(ids.to_vec()));
    }

    fn set_dimmed(&mut self, ids: &[CardId]) {
        self.calls.push(RenderCall::Dimmed(ids.to_vec()));
    }
}
