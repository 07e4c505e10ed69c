use alloc::collections::BTreeMap;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Everything the controller reacts to, whether it comes from the player or from a timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    CardClicked(CardId),
    RestartClicked,
    Tick(Epoch),
    Resolve(Epoch),
    Conceal(Epoch, [CardId; 2]),
}

impl GameEvent {
    /// Epoch the event was scheduled in, `None` for player input.
    pub const fn epoch(self) -> Option<Epoch> {
        use GameEvent::*;
        match self {
            CardClicked(_) | RestartClicked => None,
            Tick(epoch) | Resolve(epoch) | Conceal(epoch, _) => Some(epoch),
        }
    }
}

/// Deferred delivery of [`GameEvent`]s back to the controller.
///
/// Delivery is fire-and-forget, whatever arrives late is filtered by its epoch.
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration, event: GameEvent);

    /// Deliver `event` every `period` until stopped, replacing any running ticker.
    fn start_ticker(&mut self, period: Duration, event: GameEvent);

    fn stop_ticker(&mut self);

    /// Drop every one-shot event that has not fired yet.
    fn cancel_pending(&mut self);
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Ticker {
    period: Duration,
    next_due: Duration,
    event: GameEvent,
}

/// Scheduler on a virtual clock, nothing happens until the owner asks for due events.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    now: Duration,
    next_seq: u64,
    pending: BTreeMap<(Duration, u64), GameEvent>,
    ticker: Option<Ticker>,
}

impl EventQueue {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Pops the earliest event due no later than `deadline`, moving the clock to its due time.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<GameEvent> {
        let next_pending = self.pending.first_key_value().map(|(&(due, _), _)| due);
        let next_tick = self.ticker.map(|ticker| ticker.next_due);

        let take_tick = match (next_pending, next_tick) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(pending), Some(tick)) => tick < pending,
        };

        if take_tick {
            let ticker = self.ticker.as_mut()?;
            if ticker.next_due > deadline {
                return None;
            }
            self.now = ticker.next_due;
            ticker.next_due += ticker.period;
            Some(ticker.event)
        } else {
            let entry = self.pending.first_entry()?;
            let (due, _) = *entry.key();
            if due > deadline {
                return None;
            }
            self.now = due;
            Some(entry.remove())
        }
    }

    /// Moves the clock forward without delivering anything.
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }
}

impl Scheduler for EventQueue {
    fn schedule(&mut self, delay: Duration, event: GameEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert((self.now + delay, seq), event);
    }

    fn start_ticker(&mut self, period: Duration, event: GameEvent) {
        let period = period.max(Duration::from_millis(1));
        self.ticker = Some(Ticker {
            period,
            next_due: self.now + period,
            event,
        });
    }

    fn stop_ticker(&mut self) {
        self.ticker = None;
    }

    fn cancel_pending(&mut self) {
        self.pending.clear();
    }
}
