use crate::utils::*;
use clap::Args;
use game::{
    CardId, CardState, Counters, GameEvent, PairCount, Seconds, StatusMessage, Symbol,
    TimerWarning,
};
use gloo::timers::callback::{Interval, Timeout};
use pairmatch_core as game;
use std::collections::BTreeMap;
use std::time::Duration;
use yew::html::Scope;
use yew::prelude::*;

const GLYPHS: [&str; game::MAX_PAIRS as usize] = ["🎮", "🎯", "🎪", "🎨", "🎭", "🎰", "🚀", "🌟"];

/// Delay between two consecutive cards of the victory animation.
const CELEBRATE_STAGGER_MS: usize = 100;

fn glyph(symbol: Symbol) -> &'static str {
    GLYPHS[usize::from(symbol.index()) % GLYPHS.len()]
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct CardView {
    state: CardState,
    symbol: Option<Symbol>,
    celebrate_order: Option<usize>,
    dimmed: bool,
}

/// Everything the page shows, kept up to date by the controller.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct BoardView {
    cards: Vec<CardView>,
    counters: Counters,
    status: Option<StatusMessage>,
    // bumped per message so the status line replays its animation
    status_serial: u32,
    warning: TimerWarning,
}

impl BoardView {
    fn card_mut(&mut self, id: CardId) -> Option<&mut CardView> {
        let card = self.cards.get_mut(usize::from(id));
        if card.is_none() {
            log::warn!("no card with id {} on the board", id);
        }
        card
    }
}

impl game::Renderer for BoardView {
    fn render_grid(&mut self, cards: &[game::Card]) {
        self.cards = cards
            .iter()
            .map(|card| CardView {
                state: card.state,
                symbol: card.visible_symbol(),
                celebrate_order: None,
                dimmed: false,
            })
            .collect();
    }

    fn set_card_visual(&mut self, id: CardId, state: CardState, symbol: Option<Symbol>) {
        if let Some(card) = self.card_mut(id) {
            card.state = state;
            card.symbol = symbol;
        }
    }

    fn set_counters(&mut self, counters: Counters) {
        self.counters = counters;
    }

    fn set_status_message(&mut self, message: StatusMessage) {
        self.status = Some(message);
        self.status_serial = self.status_serial.wrapping_add(1);
    }

    fn set_timer_warning_level(&mut self, level: TimerWarning) {
        self.warning = level;
    }

    fn play_win_animation(&mut self, ids: &[CardId]) {
        for (order, &id) in ids.iter().enumerate() {
            if let Some(card) = self.card_mut(id) {
                card.celebrate_order = Some(order);
            }
        }
    }

    fn set_dimmed(&mut self, ids: &[CardId]) {
        for &id in ids {
            if let Some(card) = self.card_mut(id) {
                card.dimmed = true;
            }
        }
    }
}

fn timer_millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

/// One-shot timer handles that have not fired yet.
///
/// Sequence numbers are never reused, so a late notice for a cleared timer
/// cannot release a newer one.
#[derive(Debug)]
struct PendingTimers<H> {
    next_seq: u64,
    handles: BTreeMap<u64, H>,
}

impl<H> Default for PendingTimers<H> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            handles: BTreeMap::new(),
        }
    }
}

impl<H> PendingTimers<H> {
    fn insert(&mut self, make: impl FnOnce(u64) -> H) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.handles.insert(seq, make(seq));
        seq
    }

    fn fired(&mut self, seq: u64) -> Option<H> {
        self.handles.remove(&seq)
    }

    fn clear(&mut self) {
        self.handles.clear();
    }

    fn len(&self) -> usize {
        self.handles.len()
    }
}

/// Delivers scheduled events back to the component through browser timers.
///
/// Dropping a gloo timer cancels it, so cancelling is just forgetting the handle.
pub(crate) struct TimerScheduler {
    link: Scope<GameView>,
    pending: PendingTimers<Timeout>,
    ticker: Option<Interval>,
}

impl TimerScheduler {
    fn new(link: Scope<GameView>) -> Self {
        Self {
            link,
            pending: PendingTimers::default(),
            ticker: None,
        }
    }

    fn fired(&mut self, seq: u64) {
        if self.pending.fired(seq).is_none() {
            log::trace!("timer {} fired after being cancelled", seq);
        }
    }
}

impl game::Scheduler for TimerScheduler {
    fn schedule(&mut self, delay: Duration, event: GameEvent) {
        let link = self.link.clone();
        self.pending.insert(move |seq| {
            Timeout::new(timer_millis(delay), move || {
                link.send_message(Msg::TimerFired(seq, event))
            })
        });
    }

    fn start_ticker(&mut self, period: Duration, event: GameEvent) {
        let link = self.link.clone();
        let interval = Interval::new(timer_millis(period), move || {
            link.send_message(Msg::Game(event))
        });
        self.ticker = Some(interval);
    }

    fn stop_ticker(&mut self) {
        self.ticker.take();
    }

    fn cancel_pending(&mut self) {
        log::trace!("cancelling {} scheduled timers", self.pending.len());
        self.pending.clear();
    }
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    id: CardId,
    card: CardView,
    callback: Callback<CardId>,
}

#[function_component(CardTile)]
fn card_component(props: &CardProps) -> Html {
    use CardState::*;

    let CardProps { id, card, callback } = props.clone();

    let mut class = classes!(
        "memory-card",
        match card.state {
            Hidden => classes!(),
            Revealed => classes!("active"),
            Matched => classes!("success"),
            Mismatched => classes!("active", "wrong"),
        }
    );
    if card.dimmed {
        class.push("dimmed");
    }
    if card.celebrate_order.is_some() {
        class.push("celebrate");
    }
    let style = card
        .celebrate_order
        .map(|order| format!("animation-delay: {}ms", order * CELEBRATE_STAGGER_MS));

    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("card {} clicked", id);
        callback.emit(id);
    });

    html! {
        <div {class} {style} {onclick}>{card.symbol.map_or("", glyph)}</div>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Number of pairs to deal
    #[arg(short, long, default_value_t = game::MAX_PAIRS)]
    pub pairs: PairCount,

    /// Seconds on the countdown
    #[arg(short, long, default_value_t = game::GameConfig::DEFAULT_TIME_LIMIT)]
    pub time_limit: Seconds,
}

#[derive(Copy, Clone, Debug)]
pub(crate) enum Msg {
    Game(GameEvent),
    /// A one-shot timer went off, its handle can be released.
    TimerFired(u64, GameEvent),
}

pub(crate) struct GameView {
    controller: game::GameController<BoardView, TimerScheduler>,
}

impl GameView {
    fn log_summary(&self) {
        match serde_json::to_string(&self.controller.snapshot()) {
            Ok(summary) => log::info!("game finished: {}", summary),
            Err(err) => log::error!("could not serialize game summary: {:?}", err),
        }
    }

    fn timer_class(&self) -> Classes {
        classes!(
            "timer",
            match self.controller.renderer().warning {
                TimerWarning::Normal => None,
                TimerWarning::Low => Some("low"),
                TimerWarning::Critical => Some("critical"),
            }
        )
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let seed = props.seed.unwrap_or_else(js_random_seed);
        log::debug!("seed: {}", seed);

        let config = game::GameConfig::new(props.pairs, props.time_limit);
        let controller = game::GameController::new(
            config,
            game::Timing::default(),
            seed,
            BoardView::default(),
            TimerScheduler::new(ctx.link().clone()),
        );
        Self { controller }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        log::trace!("msg: {:?}", msg);
        let event = match msg {
            Msg::Game(event) => event,
            Msg::TimerFired(seq, event) => {
                self.controller.scheduler_mut().fired(seq);
                event
            }
        };
        let was_finished = self.controller.engine().is_finished();
        let updated = self.controller.handle_event(event);

        if !was_finished && self.controller.engine().is_finished() {
            self.log_summary();
        }
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let board = self.controller.renderer();
        let Counters {
            moves,
            matched_pairs,
            total_pairs,
            remaining_secs,
        } = board.counters;

        let columns = grid_columns(board.cards.len());
        let grid_style = format!("grid-template-columns: repeat({}, 1fr)", columns);
        let status_serial = board.status_serial;
        let status = board.status.map_or("", StatusMessage::text);

        let cb_restart = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Msg::Game(GameEvent::RestartClicked)
        });
        let cb_card = ctx
            .link()
            .callback(|id| Msg::Game(GameEvent::CardClicked(id)));

        html! {
            <div class="pairmatch">
                <nav>
                    <aside class={self.timer_class()}>{format_for_counter(remaining_secs.into())}</aside>
                    <aside class="moves">{format_for_counter(moves)}</aside>
                    <aside class="pairs">{format!("{}/{}", matched_pairs, total_pairs)}</aside>
                </nav>
                <div class="status">
                    <p key={status_serial}>{status}</p>
                </div>
                <section class="grid" style={grid_style}>
                    {
                        for board.cards.iter().enumerate().map(|(index, &card)| {
                            let id = index as CardId;
                            let callback = cb_card.clone();
                            html! {
                                <CardTile key={index} {id} {card} {callback}/>
                            }
                        })
                    }
                </section>
                <button class="restart" onclick={cb_restart}>{"Restart"}</button>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game::{EventQueue, GameConfig, GameController, Phase, Timing};
    use std::cell::Cell;
    use std::rc::Rc;

    type Headless = GameController<BoardView, EventQueue>;

    fn headless(pairs: PairCount, time_limit: Seconds) -> Headless {
        GameController::new(
            GameConfig::new(pairs, time_limit),
            Timing::default(),
            5,
            BoardView::default(),
            EventQueue::new(),
        )
    }

    fn ids_with_symbol(controller: &Headless, symbol: Symbol) -> Vec<CardId> {
        controller
            .engine()
            .cards()
            .iter()
            .filter(|card| card.symbol == symbol)
            .map(|card| card.id)
            .collect()
    }

    #[test]
    fn fresh_board_is_face_down_with_welcome() {
        let controller = headless(8, 120);
        let board = controller.renderer();

        assert_eq!(board.cards.len(), 16);
        assert!(board.cards.iter().all(|card| card.symbol.is_none()));
        assert_eq!(board.status, Some(StatusMessage::Welcome));
        assert_eq!(board.counters.remaining_secs, 120);
        assert_eq!(board.warning, TimerWarning::Normal);
    }

    #[test]
    fn mismatch_is_shown_then_hidden_again() {
        let mut controller = headless(2, 120);
        let first = ids_with_symbol(&controller, Symbol::new(0))[0];
        let second = ids_with_symbol(&controller, Symbol::new(1))[0];

        controller.handle_event(GameEvent::CardClicked(first));
        controller.handle_event(GameEvent::CardClicked(second));
        let board = controller.renderer();
        assert_eq!(board.cards[usize::from(first)].symbol, Some(Symbol::new(0)));
        assert_eq!(board.counters.moves, 1);
        let serial = board.status_serial;

        controller.run_for(Duration::from_millis(800));
        let board = controller.renderer();
        assert_eq!(board.cards[usize::from(first)].state, CardState::Mismatched);
        assert_eq!(board.status, Some(StatusMessage::TryAgain));
        assert_eq!(board.status_serial, serial + 1);

        controller.run_for(Duration::from_millis(600));
        let board = controller.renderer();
        assert_eq!(board.cards[usize::from(first)].state, CardState::Hidden);
        assert_eq!(board.cards[usize::from(second)].symbol, None);
    }

    #[test]
    fn win_celebrates_every_card_in_order() {
        let mut controller = headless(3, 120);

        for symbol in Symbol::alphabet(3) {
            for id in ids_with_symbol(&controller, symbol) {
                controller.handle_event(GameEvent::CardClicked(id));
            }
            controller.run_for(Duration::from_millis(800));
        }

        assert_eq!(controller.engine().phase(), Phase::Won);
        let board = controller.renderer();
        assert_eq!(board.status, Some(StatusMessage::Victory));
        for (order, card) in board.cards.iter().enumerate() {
            assert_eq!(card.celebrate_order, Some(order));
            assert_eq!(card.state, CardState::Matched);
            assert!(!card.dimmed);
        }
    }

    #[test]
    fn time_up_dims_the_board() {
        let mut controller = headless(2, 31);

        controller.run_for(Duration::from_secs(1));
        assert_eq!(controller.renderer().warning, TimerWarning::Critical);

        controller.run_for(Duration::from_secs(30));
        let board = controller.renderer();
        assert_eq!(board.status, Some(StatusMessage::TimeUp));
        assert!(board.cards.iter().all(|card| card.dimmed));
        assert_eq!(board.counters.remaining_secs, 0);
    }

    #[test]
    fn restart_redeals_a_clean_board() {
        let mut controller = headless(2, 5);
        controller.run_for(Duration::from_secs(5));
        assert!(controller.renderer().cards.iter().all(|card| card.dimmed));

        controller.handle_event(GameEvent::RestartClicked);

        let board = controller.renderer();
        assert!(board.cards.iter().all(|card| !card.dimmed && card.symbol.is_none()));
        assert_eq!(board.status, Some(StatusMessage::Welcome));
        assert_eq!(board.counters.remaining_secs, 5);
        assert_eq!(board.warning, TimerWarning::Critical);
    }

    struct DropCounter(Rc<Cell<usize>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn fired_timers_release_their_handle() {
        let mut timers = PendingTimers::default();
        let seqs: Vec<u64> = (0..3).map(|_| timers.insert(|seq| seq * 10)).collect();
        assert_eq!(seqs, vec![0, 1, 2]);

        assert_eq!(timers.fired(1), Some(10));
        assert_eq!(timers.len(), 2);
        assert_eq!(timers.fired(1), None);
        assert_eq!(timers.fired(7), None);
        assert_eq!(timers.len(), 2);
    }

    #[test]
    fn cancelling_drops_every_pending_handle() {
        let dropped = Rc::new(Cell::new(0));
        let mut timers = PendingTimers::default();
        for _ in 0..3 {
            timers.insert(|_| DropCounter(dropped.clone()));
        }

        timers.clear();
        assert_eq!(dropped.get(), 3);
        assert_eq!(timers.len(), 0);

        // a notice from the cleared batch must not release the next game's timer
        let fresh = timers.insert(|_| DropCounter(dropped.clone()));
        assert_eq!(fresh, 3);
        assert!(timers.fired(0).is_none());
        assert_eq!(timers.len(), 1);
        assert_eq!(dropped.get(), 3);
    }

    #[test]
    fn every_symbol_has_its_own_glyph() {
        let glyphs: Vec<_> = Symbol::alphabet(game::MAX_PAIRS).map(glyph).collect();

        for (i, a) in glyphs.iter().enumerate() {
            assert!(!glyphs[i + 1..].contains(a));
        }
    }
}
