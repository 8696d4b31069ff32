// Panel controller - the state machine behind the collapsible event panel
//
// Owns the EventLog and PanelState, applies the expand/collapse policy,
// drives the animation driver, and owns the single pending auto-collapse
// timer. Runs on the TUI event loop task; see command.rs for how calls
// from other tasks reach it.
//
// Invariants:
// - report() appends to the log before any policy decision; log growth and
//   panel visibility are decoupled.
// - At most one animation and one collapse timer are in flight. Both are
//   generation-guarded: stale completions delivered after a cancel or a
//   supersede are dropped on arrival.
// - After dispose() every command is a logged no-op.

use crate::events::{EventItem, EventKind, EventLog};
use crate::panel::animation::{AnimationDriver, AnimationEvent, AnimationHandle, AnimationSink};
use crate::panel::command::PanelCommand;
use crate::panel::state::PanelState;
use crate::panel::view::ViewBinding;
use crate::prefs::PrefStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Preference key for the persisted auto-expand flag
pub const PREF_AUTO_EXPAND: &str = "auto_expand";

/// Auto-expand applies when the preference was never written
const DEFAULT_AUTO_EXPAND: bool = true;

/// Construction-time knobs
#[derive(Debug, Clone)]
pub struct PanelSettings {
    /// Height of the fully expanded panel, in rows
    pub full_height: u16,
    /// Duration of one expand or collapse animation
    pub animation: Duration,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            full_height: 12,
            animation: Duration::from_millis(500),
        }
    }
}

pub struct PanelController {
    log: EventLog,
    state: PanelState,
    view: Box<dyn ViewBinding>,
    driver: Arc<dyn AnimationDriver>,
    prefs: Arc<dyn PrefStore>,
    settings: PanelSettings,

    /// Cached preference, read once at construction
    auto_expand: bool,
    /// Attention cue currently shown
    attention: bool,

    /// Height as of the last animation frame (rows)
    current_height: u16,
    /// Height at the last settle: 0 or full_height
    last_stable_height: u16,

    animation_generation: u64,
    animation: Option<AnimationHandle>,

    collapse_generation: u64,
    collapse_timer: Option<JoinHandle<()>>,

    /// Sender feeding the owning loop; timers and animations report through it
    tx: mpsc::Sender<PanelCommand>,

    disposed: bool,
}

impl PanelController {
    pub fn new(
        view: Box<dyn ViewBinding>,
        driver: Arc<dyn AnimationDriver>,
        prefs: Arc<dyn PrefStore>,
        tx: mpsc::Sender<PanelCommand>,
        settings: PanelSettings,
    ) -> Self {
        // A missing or unreadable preference must not fail construction.
        let auto_expand = prefs.read(PREF_AUTO_EXPAND).unwrap_or(DEFAULT_AUTO_EXPAND);

        Self {
            log: EventLog::new(),
            state: PanelState::Collapsed,
            view,
            driver,
            prefs,
            settings,
            auto_expand,
            attention: false,
            current_height: 0,
            last_stable_height: 0,
            animation_generation: 0,
            animation: None,
            collapse_generation: 0,
            collapse_timer: None,
            tx,
            disposed: false,
        }
    }

    /// Process one command on the owning task
    pub fn handle(&mut self, cmd: PanelCommand) {
        if self.disposed {
            tracing::debug!(?cmd, "panel command ignored after dispose");
            return;
        }

        match cmd {
            PanelCommand::Report { kind, text } => self.report(kind, text),
            PanelCommand::Toggle => self.toggle(),
            PanelCommand::Clear => self.clear(),
            PanelCommand::SetAutoExpand(enabled) => self.set_auto_expand(enabled),
            PanelCommand::ScheduleAutoCollapse { delay } => self.schedule_auto_collapse(delay),
            PanelCommand::CollapseTimerFired { generation } => self.on_collapse_timer(generation),
            PanelCommand::Animation { generation, event } => self.on_animation(generation, event),
            PanelCommand::Dispose => self.dispose(),
        }
    }

    // ── Accessors used by the render loop ────────────────────────────────

    pub fn items(&self) -> Vec<EventItem> {
        self.log.items()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn height(&self) -> u16 {
        self.current_height
    }

    pub fn attention(&self) -> bool {
        self.attention
    }

    pub fn auto_expand(&self) -> bool {
        self.auto_expand
    }

    // ── Operations ───────────────────────────────────────────────────────

    fn report(&mut self, kind: EventKind, text: String) {
        // Append unconditionally, before any visibility decision.
        let len = self.log.append(EventItem::new(kind, text));
        self.view.on_items_changed(len - 1, 1);

        if self.state == PanelState::Expanded {
            self.view.scroll_to_end();
        }

        if self.auto_expand {
            match self.state {
                PanelState::Collapsed | PanelState::Collapsing => self.start_expand(),
                PanelState::Expanding | PanelState::Expanded => {}
            }
        } else if kind == EventKind::Error
            && matches!(self.state, PanelState::Collapsed | PanelState::Expanding)
        {
            self.attention = true;
            self.view.on_attention_cue(true);
        }
    }

    fn toggle(&mut self) {
        // The cue resets on every click, including ones the animation
        // debounce drops.
        self.attention = false;
        self.view.on_attention_cue(false);

        match self.state {
            PanelState::Collapsed => self.start_expand(),
            PanelState::Expanded => self.start_collapse(),
            PanelState::Expanding | PanelState::Collapsing => {
                tracing::debug!(state = self.state.name(), "toggle ignored while animating");
            }
        }
    }

    fn clear(&mut self) {
        if self.log.is_empty() {
            return;
        }
        let removed = self.log.clear();
        self.view.on_items_changed(0, 0);
        tracing::info!(removed, "event log cleared");
    }

    fn set_auto_expand(&mut self, enabled: bool) {
        if enabled == self.auto_expand {
            return;
        }
        self.auto_expand = enabled;
        if let Err(e) = self.prefs.write(PREF_AUTO_EXPAND, enabled) {
            // The cached value stays authoritative for this session.
            tracing::warn!("failed to persist auto-expand preference: {e:#}");
        }
    }

    fn schedule_auto_collapse(&mut self, delay: Duration) {
        // Supersede: at most one pending collapse exists.
        self.collapse_generation += 1;
        if let Some(timer) = self.collapse_timer.take() {
            timer.abort();
        }

        let generation = self.collapse_generation;
        let tx = self.tx.clone();
        self.collapse_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx
                .send(PanelCommand::CollapseTimerFired { generation })
                .await;
        }));
        tracing::debug!(delay_ms = delay.as_millis() as u64, "auto-collapse scheduled");
    }

    fn on_collapse_timer(&mut self, generation: u64) {
        if generation != self.collapse_generation {
            tracing::debug!("superseded auto-collapse timer ignored");
            return;
        }
        self.collapse_timer = None;

        // Re-check state at fire time: the user may have collapsed (or a
        // new event re-expanded) the panel since this was scheduled.
        if self.state == PanelState::Expanded {
            self.start_collapse();
        } else {
            tracing::debug!(state = self.state.name(), "auto-collapse fired but panel not expanded");
        }
    }

    fn on_animation(&mut self, generation: u64, event: AnimationEvent) {
        if generation != self.animation_generation {
            tracing::trace!("stale animation event dropped");
            return;
        }

        match event {
            AnimationEvent::Started => {}
            AnimationEvent::Frame(height) => {
                self.current_height = height;
                self.view.on_height_changed(height);
            }
            AnimationEvent::Completed => {
                self.animation = None;
                match self.state {
                    PanelState::Expanding => {
                        self.settle(PanelState::Expanded, self.settings.full_height);
                        self.view.scroll_to_end();
                    }
                    PanelState::Collapsing => {
                        self.settle(PanelState::Collapsed, 0);
                    }
                    state => {
                        tracing::warn!(state = state.name(), "animation completed in settled state");
                    }
                }
            }
            AnimationEvent::Cancelled => {
                // Driver-originated cancel with no replacement animation:
                // fall back to the state matching the last stable height.
                self.animation = None;
                let state = if self.last_stable_height == 0 {
                    PanelState::Collapsed
                } else {
                    PanelState::Expanded
                };
                self.settle(state, self.last_stable_height);
            }
        }
    }

    fn dispose(&mut self) {
        self.cancel_animation();
        if let Some(timer) = self.collapse_timer.take() {
            timer.abort();
        }
        self.disposed = true;
        tracing::debug!("panel disposed");
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn start_expand(&mut self) {
        self.cancel_animation();
        self.state = PanelState::Expanding;
        self.start_animation(self.current_height, self.settings.full_height);
    }

    fn start_collapse(&mut self) {
        self.cancel_animation();
        self.state = PanelState::Collapsing;
        self.start_animation(self.current_height, 0);
    }

    fn start_animation(&mut self, from: u16, to: u16) {
        self.animation_generation += 1;
        let sink = AnimationSink::new(self.tx.clone(), self.animation_generation);
        self.animation = Some(self.driver.animate(from, to, self.settings.animation, sink));
    }

    /// Abort any in-flight animation. The generation bump makes frames
    /// already sitting in the channel stale.
    fn cancel_animation(&mut self) {
        if let Some(handle) = self.animation.take() {
            handle.cancel();
            self.animation_generation += 1;
        }
    }

    fn settle(&mut self, state: PanelState, height: u16) {
        self.state = state;
        self.current_height = height;
        self.last_stable_height = height;
        self.view.on_height_changed(height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPrefs;
    use std::sync::Mutex;

    /// What the view was told, in order
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum ViewCall {
        Items(usize, usize),
        Height(u16),
        Attention(bool),
        ScrollEnd,
    }

    #[derive(Clone, Default)]
    struct RecordingView {
        calls: Arc<Mutex<Vec<ViewCall>>>,
    }

    impl RecordingView {
        fn calls(&self) -> Vec<ViewCall> {
            self.calls.lock().unwrap().clone()
        }

        fn clear_calls(&self) {
            self.calls.lock().unwrap().clear();
        }
    }

    impl ViewBinding for RecordingView {
        fn on_items_changed(&self, start: usize, count: usize) {
            self.calls.lock().unwrap().push(ViewCall::Items(start, count));
        }

        fn on_height_changed(&self, rows: u16) {
            self.calls.lock().unwrap().push(ViewCall::Height(rows));
        }

        fn on_attention_cue(&self, visible: bool) {
            self.calls.lock().unwrap().push(ViewCall::Attention(visible));
        }

        fn scroll_to_end(&self) {
            self.calls.lock().unwrap().push(ViewCall::ScrollEnd);
        }
    }

    /// Driver that records start/end heights and keeps the sink around so
    /// tests can complete or cancel the animation by hand.
    #[derive(Clone, Default)]
    struct StubDriver {
        started: Arc<Mutex<Vec<(u16, u16)>>>,
        sink: Arc<Mutex<Option<AnimationSink>>>,
    }

    impl StubDriver {
        fn animations(&self) -> Vec<(u16, u16)> {
            self.started.lock().unwrap().clone()
        }

        fn last_sink(&self) -> AnimationSink {
            self.sink.lock().unwrap().clone().expect("no animation started")
        }
    }

    impl AnimationDriver for StubDriver {
        fn animate(
            &self,
            from: u16,
            to: u16,
            _duration: Duration,
            sink: AnimationSink,
        ) -> AnimationHandle {
            self.started.lock().unwrap().push((from, to));
            *self.sink.lock().unwrap() = Some(sink);
            AnimationHandle::detached()
        }
    }

    struct Fixture {
        controller: PanelController,
        view: RecordingView,
        driver: StubDriver,
        rx: mpsc::Receiver<PanelCommand>,
    }

    impl Fixture {
        fn new(auto_expand: Option<bool>) -> Self {
            let prefs = Arc::new(MemoryPrefs::new());
            if let Some(v) = auto_expand {
                prefs.write(PREF_AUTO_EXPAND, v).unwrap();
            }
            Self::with_prefs(prefs)
        }

        fn with_prefs(prefs: Arc<MemoryPrefs>) -> Self {
            let (tx, rx) = mpsc::channel(64);
            let view = RecordingView::default();
            let driver = StubDriver::default();
            let controller = PanelController::new(
                Box::new(view.clone()),
                Arc::new(driver.clone()),
                prefs.clone(),
                tx,
                PanelSettings {
                    full_height: 10,
                    animation: Duration::from_millis(500),
                },
            );
            Self {
                controller,
                view,
                driver,
                rx,
            }
        }

        fn report(&mut self, kind: EventKind, text: &str) {
            self.controller.handle(PanelCommand::Report {
                kind,
                text: text.to_string(),
            });
        }

        /// Deliver the pending animation's completion back to the controller
        fn complete_animation(&mut self) {
            self.driver.last_sink().completed();
            self.pump();
        }

        /// Feed everything queued on the command channel to the controller
        fn pump(&mut self) {
            while let Ok(cmd) = self.rx.try_recv() {
                self.controller.handle(cmd);
            }
        }
    }

    #[test]
    fn log_grows_by_one_per_report_in_call_order() {
        let mut fx = Fixture::new(Some(false));
        for i in 0..10 {
            let kind = if i % 3 == 0 {
                EventKind::Error
            } else {
                EventKind::Info
            };
            fx.report(kind, &format!("event {i}"));
        }

        assert_eq!(fx.controller.len(), 10);
        let texts: Vec<String> = fx.controller.items().iter().map(|e| e.text.clone()).collect();
        let expected: Vec<String> = (0..10).map(|i| format!("event {i}")).collect();
        assert_eq!(texts, expected);
        // Visibility never gated the append.
        assert_eq!(fx.controller.state(), PanelState::Collapsed);
    }

    #[test]
    fn report_auto_expands_from_collapsed_and_settles_expanded() {
        let mut fx = Fixture::new(Some(true));
        fx.report(EventKind::Info, "x");

        assert_eq!(fx.controller.state(), PanelState::Expanding);
        assert_eq!(fx.driver.animations(), vec![(0, 10)]);

        fx.complete_animation();
        assert_eq!(fx.controller.state(), PanelState::Expanded);
        assert_eq!(fx.controller.height(), 10);
        // Settling into Expanded scrolls the newest item into view.
        assert!(fx.view.calls().contains(&ViewCall::ScrollEnd));
    }

    #[test]
    fn report_while_expanded_scrolls_without_restarting_animation() {
        let mut fx = Fixture::new(Some(true));
        fx.report(EventKind::Info, "first");
        fx.complete_animation();
        fx.view.clear_calls();

        fx.report(EventKind::Info, "second");
        assert_eq!(fx.controller.state(), PanelState::Expanded);
        assert_eq!(fx.driver.animations().len(), 1);
        assert_eq!(
            fx.view.calls(),
            vec![ViewCall::Items(1, 1), ViewCall::ScrollEnd]
        );
    }

    #[test]
    fn report_while_expanding_does_not_stack_animations() {
        let mut fx = Fixture::new(Some(true));
        fx.report(EventKind::Info, "a");
        fx.report(EventKind::Info, "b");

        assert_eq!(fx.controller.state(), PanelState::Expanding);
        assert_eq!(fx.driver.animations().len(), 1);
    }

    #[test]
    fn report_while_collapsing_restarts_toward_full_from_current_height() {
        let mut fx = Fixture::new(Some(true));
        fx.report(EventKind::Info, "open");
        fx.complete_animation();
        fx.controller.handle(PanelCommand::Toggle);
        assert_eq!(fx.controller.state(), PanelState::Collapsing);

        // Partway down...
        fx.driver.last_sink().frame(4);
        fx.pump();
        assert_eq!(fx.controller.height(), 4);

        fx.report(EventKind::Info, "more");
        assert_eq!(fx.controller.state(), PanelState::Expanding);
        // 0→10 (initial), 10→0 (toggle), 4→10 (restart from mid-flight)
        assert_eq!(fx.driver.animations(), vec![(0, 10), (10, 0), (4, 10)]);

        // The cancelled collapse's completion must not corrupt the restart.
        fx.complete_animation();
        assert_eq!(fx.controller.state(), PanelState::Expanded);
    }

    #[test]
    fn error_while_collapsed_sets_attention_instead_of_expanding() {
        let mut fx = Fixture::new(Some(false));
        fx.report(EventKind::Error, "boom");

        assert_eq!(fx.controller.state(), PanelState::Collapsed);
        assert!(fx.controller.attention());
        assert!(fx.driver.animations().is_empty());
        assert!(fx.view.calls().contains(&ViewCall::Attention(true)));
    }

    #[test]
    fn info_while_collapsed_without_auto_expand_only_appends() {
        let mut fx = Fixture::new(Some(false));
        fx.report(EventKind::Info, "quiet");

        assert_eq!(fx.controller.state(), PanelState::Collapsed);
        assert!(!fx.controller.attention());
        assert!(fx.driver.animations().is_empty());
        assert_eq!(fx.view.calls(), vec![ViewCall::Items(0, 1)]);
    }

    #[test]
    fn toggle_clears_attention_and_expands() {
        let mut fx = Fixture::new(Some(false));
        fx.report(EventKind::Error, "boom");
        assert!(fx.controller.attention());

        fx.controller.handle(PanelCommand::Toggle);
        assert!(!fx.controller.attention());
        assert_eq!(fx.controller.state(), PanelState::Expanding);
        assert!(fx.view.calls().contains(&ViewCall::Attention(false)));

        fx.complete_animation();
        assert_eq!(fx.controller.state(), PanelState::Expanded);
    }

    #[test]
    fn toggle_during_animation_is_debounced_but_still_resets_cue() {
        let mut fx = Fixture::new(Some(false));
        fx.controller.handle(PanelCommand::Toggle);
        assert_eq!(fx.controller.state(), PanelState::Expanding);
        assert_eq!(fx.driver.animations().len(), 1);
        fx.view.clear_calls();

        // Second click lands mid-animation: dropped, but the cue reset
        // still reaches the view.
        fx.controller.handle(PanelCommand::Toggle);
        assert_eq!(fx.controller.state(), PanelState::Expanding);
        assert_eq!(fx.driver.animations().len(), 1);
        assert_eq!(fx.view.calls(), vec![ViewCall::Attention(false)]);
    }

    #[test]
    fn clear_empties_log_and_leaves_state_alone() {
        let mut fx = Fixture::new(Some(true));
        fx.report(EventKind::Info, "a");
        fx.complete_animation();
        fx.report(EventKind::Info, "b");
        assert_eq!(fx.controller.state(), PanelState::Expanded);

        fx.controller.handle(PanelCommand::Clear);
        assert!(fx.controller.is_empty());
        assert_eq!(fx.controller.state(), PanelState::Expanded);
        assert!(fx.view.calls().contains(&ViewCall::Items(0, 0)));

        // And again while collapsed.
        let mut fx = Fixture::new(Some(false));
        fx.report(EventKind::Info, "a");
        fx.controller.handle(PanelCommand::Clear);
        assert_eq!(fx.controller.len(), 0);
        assert_eq!(fx.controller.state(), PanelState::Collapsed);
    }

    #[test]
    fn cancelled_animation_falls_back_to_last_stable_height() {
        let mut fx = Fixture::new(Some(true));
        fx.report(EventKind::Info, "x");
        assert_eq!(fx.controller.state(), PanelState::Expanding);

        // Driver gives up before reaching full height.
        fx.driver.last_sink().cancelled();
        fx.pump();
        assert_eq!(fx.controller.state(), PanelState::Collapsed);
        assert_eq!(fx.controller.height(), 0);

        // Same from the expanded side.
        fx.controller.handle(PanelCommand::Toggle);
        fx.complete_animation();
        assert_eq!(fx.controller.state(), PanelState::Expanded);
        fx.controller.handle(PanelCommand::Toggle);
        fx.driver.last_sink().cancelled();
        fx.pump();
        assert_eq!(fx.controller.state(), PanelState::Expanded);
        assert_eq!(fx.controller.height(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_collapse_fires_only_when_still_expanded() {
        let mut fx = Fixture::new(Some(true));
        fx.report(EventKind::Info, "x");
        fx.complete_animation();
        assert_eq!(fx.controller.state(), PanelState::Expanded);

        fx.controller.handle(PanelCommand::ScheduleAutoCollapse {
            delay: Duration::from_millis(500),
        });
        tokio::time::sleep(Duration::from_millis(600)).await;
        fx.pump();

        assert_eq!(fx.controller.state(), PanelState::Collapsing);
        fx.complete_animation();
        assert_eq!(fx.controller.state(), PanelState::Collapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_supersedes_the_pending_timer() {
        let mut fx = Fixture::new(Some(true));
        fx.report(EventKind::Info, "x");
        fx.complete_animation();

        fx.controller.handle(PanelCommand::ScheduleAutoCollapse {
            delay: Duration::from_millis(500),
        });
        tokio::time::sleep(Duration::from_millis(200)).await;
        fx.controller.handle(PanelCommand::ScheduleAutoCollapse {
            delay: Duration::from_millis(500),
        });

        // The first timer's deadline passes; the panel must stay expanded.
        tokio::time::sleep(Duration::from_millis(350)).await;
        fx.pump();
        assert_eq!(fx.controller.state(), PanelState::Expanded);

        // The second fires.
        tokio::time::sleep(Duration::from_millis(200)).await;
        fx.pump();
        assert_eq!(fx.controller.state(), PanelState::Collapsing);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_timer_after_manual_collapse_is_a_noop() {
        let mut fx = Fixture::new(Some(true));
        fx.report(EventKind::Info, "x");
        fx.complete_animation();

        fx.controller.handle(PanelCommand::ScheduleAutoCollapse {
            delay: Duration::from_millis(500),
        });

        // User collapses by hand before the timer fires.
        fx.controller.handle(PanelCommand::Toggle);
        fx.complete_animation();
        assert_eq!(fx.controller.state(), PanelState::Collapsed);
        let animations_before = fx.driver.animations().len();

        tokio::time::sleep(Duration::from_millis(600)).await;
        fx.pump();
        assert_eq!(fx.controller.state(), PanelState::Collapsed);
        assert_eq!(fx.driver.animations().len(), animations_before);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_silences_everything() {
        let mut fx = Fixture::new(Some(true));
        fx.report(EventKind::Info, "x");
        fx.controller.handle(PanelCommand::ScheduleAutoCollapse {
            delay: Duration::from_millis(500),
        });

        fx.controller.handle(PanelCommand::Dispose);
        fx.view.clear_calls();

        // Everything after dispose is a no-op: no appends, no view calls,
        // no animations, and the timer never acts.
        fx.report(EventKind::Error, "late");
        fx.controller.handle(PanelCommand::Toggle);
        fx.controller.handle(PanelCommand::Clear);
        tokio::time::sleep(Duration::from_millis(600)).await;
        fx.pump();

        assert_eq!(fx.controller.len(), 1);
        assert!(fx.view.calls().is_empty());
        assert_eq!(fx.driver.animations().len(), 1);
    }

    #[test]
    fn preference_round_trips_across_reconstruction() {
        let prefs = Arc::new(MemoryPrefs::new());
        let mut fx = Fixture::with_prefs(prefs.clone());
        assert!(fx.controller.auto_expand(), "default is on");

        fx.controller.handle(PanelCommand::SetAutoExpand(false));
        drop(fx);

        let fx = Fixture::with_prefs(prefs);
        assert!(!fx.controller.auto_expand());
    }

    #[test]
    fn unchanged_preference_is_not_rewritten() {
        let prefs = Arc::new(MemoryPrefs::new());
        let mut fx = Fixture::with_prefs(prefs.clone());

        fx.controller.handle(PanelCommand::SetAutoExpand(true));
        assert_eq!(prefs.write_count(), 0);

        fx.controller.handle(PanelCommand::SetAutoExpand(false));
        assert_eq!(prefs.write_count(), 1);
    }

    #[test]
    fn empty_pref_store_defaults_to_auto_expand() {
        let fx = Fixture::new(None);
        assert!(fx.controller.auto_expand());
    }
}
