use alloc::vec::Vec;
use core::time::Duration;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Delays between a player action and its scheduled follow-up.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    /// How long both selected cards stay visible before they are compared.
    pub reveal_delay: Duration,
    /// How long a mismatched pair is shown before turning face down.
    pub conceal_delay: Duration,
    pub tick_period: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(800),
            conceal_delay: Duration::from_millis(600),
            tick_period: Duration::from_secs(1),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub epoch: Epoch,
    pub phase: Phase,
    pub counters: Counters,
}

/// Owns the game state and drives the renderer and scheduler from incoming events.
#[derive(Debug)]
pub struct GameController<R, S> {
    config: GameConfig,
    timing: Timing,
    renderer: R,
    scheduler: S,
    engine: MatchEngine,
    epoch: Epoch,
    warning: TimerWarning,
    rng: SmallRng,
}

impl<R: Renderer, S: Scheduler> GameController<R, S> {
    /// Creates the controller and starts the first game right away.
    pub fn new(config: GameConfig, timing: Timing, seed: u64, renderer: R, scheduler: S) -> Self {
        let mut controller = Self {
            config,
            timing,
            renderer,
            scheduler,
            engine: MatchEngine::new(Deck::ordered(config.pairs), config.time_limit),
            epoch: Epoch::default(),
            warning: TimerWarning::default(),
            rng: SmallRng::seed_from_u64(seed),
        };
        controller.initialize();
        controller
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            epoch: self.epoch,
            phase: self.engine.phase(),
            counters: self.engine.counters(),
        }
    }

    /// Deals a freshly shuffled deck and starts a new game on it.
    pub fn initialize(&mut self) {
        let seed = self.rng.random();
        let deck = RandomDeckGenerator::new(seed).generate(self.config);
        self.initialize_with(deck);
    }

    /// Starts a new game on a fixed deck.
    ///
    /// Every way of starting a game ends up here, so this is where the
    /// previous game's timers are cancelled.
    pub fn initialize_with(&mut self, deck: Deck) {
        self.scheduler.cancel_pending();
        self.scheduler.stop_ticker();

        self.epoch = self.epoch.next();
        self.engine = MatchEngine::new(deck, self.config.time_limit);
        self.warning = TimerWarning::for_remaining(self.engine.remaining_secs());

        self.renderer.render_grid(self.engine.cards());
        self.renderer.set_counters(self.engine.counters());
        self.renderer.set_timer_warning_level(self.warning);
        self.renderer.set_status_message(StatusMessage::Welcome);

        self.scheduler
            .start_ticker(self.timing.tick_period, GameEvent::Tick(self.epoch));

        log::info!(
            "game {} started with {} pairs and {}s on the clock",
            self.epoch.value(),
            self.engine.total_pairs(),
            self.engine.remaining_secs()
        );
    }

    pub fn restart(&mut self) {
        log::debug!("restart requested in phase {:?}", self.engine.phase());
        self.initialize();
    }

    /// Applies one event, returns whether anything visible changed.
    pub fn handle_event(&mut self, event: GameEvent) -> bool {
        use GameEvent::*;

        match event.epoch() {
            Some(epoch) if epoch != self.epoch => {
                log::debug!(
                    "discarding stale {:?}, current epoch is {}",
                    event,
                    self.epoch.value()
                );
                return false;
            }
            _ => {}
        }

        match event {
            CardClicked(id) => self.handle_card_click(id),
            RestartClicked => {
                self.restart();
                true
            }
            Tick(_) => self.timer_tick(),
            Resolve(_) => self.resolve_selection(),
            Conceal(_, pair) => self.conceal(pair),
        }
    }

    pub fn handle_card_click(&mut self, id: CardId) -> bool {
        use RevealOutcome::*;

        let outcome = match self.engine.reveal(id) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::debug!("ignored click on card {}: {}", id, err);
                return false;
            }
        };

        match outcome {
            NoChange => {
                log::trace!("card {} is not selectable right now", id);
                false
            }
            Revealed => {
                self.show_card(id);
                true
            }
            SelectionComplete => {
                self.show_card(id);
                self.renderer.set_counters(self.engine.counters());
                self.scheduler
                    .schedule(self.timing.reveal_delay, GameEvent::Resolve(self.epoch));
                true
            }
        }
    }

    pub fn resolve_selection(&mut self) -> bool {
        use ResolveOutcome::*;

        let outcome = match self.engine.resolve() {
            Ok(outcome) => outcome,
            Err(err) => {
                log::debug!("resolution skipped: {}", err);
                return false;
            }
        };

        match outcome {
            NoChange => false,
            Matched(pair) | Won(pair) => {
                log::debug!("matched pair {:?}", pair);
                self.show_pair(pair);
                self.renderer.set_counters(self.engine.counters());
                self.renderer.set_status_message(StatusMessage::Match);
                if matches!(outcome, Won(_)) {
                    self.handle_win();
                }
                true
            }
            Mismatched(pair) => {
                log::debug!("mismatched pair {:?}", pair);
                self.show_pair(pair);
                self.renderer.set_status_message(StatusMessage::TryAgain);
                self.scheduler.schedule(
                    self.timing.conceal_delay,
                    GameEvent::Conceal(self.epoch, pair),
                );
                true
            }
        }
    }

    pub fn timer_tick(&mut self) -> bool {
        match self.engine.tick() {
            Ok(TickOutcome::Ticked(remaining)) => {
                self.renderer.set_counters(self.engine.counters());
                self.update_warning(remaining);
                true
            }
            Ok(TickOutcome::Expired) => {
                self.renderer.set_counters(self.engine.counters());
                self.update_warning(0);
                self.handle_game_over();
                true
            }
            Err(err) => {
                log::debug!("tick ignored: {}", err);
                self.scheduler.stop_ticker();
                false
            }
        }
    }

    fn conceal(&mut self, pair: [CardId; 2]) -> bool {
        match self.engine.conceal(pair) {
            Ok(FlipOutcome::Changed) => {
                self.show_pair(pair);
                true
            }
            Ok(FlipOutcome::NoChange) => false,
            Err(err) => {
                log::debug!("conceal of {:?} skipped: {}", pair, err);
                false
            }
        }
    }

    fn handle_win(&mut self) {
        self.scheduler.stop_ticker();
        self.renderer.set_status_message(StatusMessage::Victory);

        let ids: Vec<CardId> = self.engine.card_ids().collect();
        self.renderer.play_win_animation(&ids);

        log::info!(
            "game {} won in {} moves with {}s left",
            self.epoch.value(),
            self.engine.moves(),
            self.engine.remaining_secs()
        );
    }

    fn handle_game_over(&mut self) {
        self.scheduler.stop_ticker();
        self.renderer.set_status_message(StatusMessage::TimeUp);

        let ids: Vec<CardId> = self.engine.card_ids().collect();
        self.renderer.set_dimmed(&ids);

        log::info!(
            "game {} lost with {}/{} pairs matched",
            self.epoch.value(),
            self.engine.matched_pairs(),
            self.engine.total_pairs()
        );
    }

    fn update_warning(&mut self, remaining_secs: Seconds) {
        let level = TimerWarning::for_remaining(remaining_secs);
        if level != self.warning {
            self.warning = level;
            self.renderer.set_timer_warning_level(level);
        }
    }

    fn show_card(&mut self, id: CardId) {
        if let Ok(card) = self.engine.card(id) {
            self.renderer
                .set_card_visual(card.id, card.state, card.visible_symbol());
        }
    }

    fn show_pair(&mut self, pair: [CardId; 2]) {
        for id in pair {
            self.show_card(id);
        }
    }
}

impl<R: Renderer> GameController<R, EventQueue> {
    /// Delivers every event that falls due within `duration` of virtual time.
    pub fn run_for(&mut self, duration: Duration) -> bool {
        let deadline = self.scheduler.now() + duration;
        let mut updated = false;
        while let Some(event) = self.scheduler.pop_due(deadline) {
            updated |= self.handle_event(event);
        }
        self.scheduler.advance_to(deadline);
        updated
    }
}
