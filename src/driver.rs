//! Frame driver: one update then one draw per display refresh
//!
//! The host owns the refresh callback and reports it through a
//! `FrameScheduler`. Every scheduled frame carries the `SessionId` it was
//! scheduled for, so a callback left over from a previous session is
//! ignored instead of mutating the new world.

use std::collections::VecDeque;

use crate::input::InputState;
use crate::narration::{NarrationRequest, NarrationSink};
use crate::renderer::{RenderFrame, Renderer};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, tick};

/// Number of lines kept in the on-screen game log
pub const LOG_CAPACITY: usize = 5;

const MENU_LOG: &str = "Subject 09 has awakened...";
const START_LOG: &str = "Containment breach initiated...";

/// Identifies one play session; bumped on every start and reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub fn next(self) -> Self {
        SessionId(self.0 + 1)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Host display-refresh hook
pub trait FrameScheduler {
    /// Ask for one `FrameDriver::on_frame(session)` call on the next refresh
    fn schedule(&mut self, session: SessionId);

    /// Drop pending requests for `session`
    fn cancel(&mut self, session: SessionId);
}

/// Scheduler that queues requests until the caller pops them.
/// Used by tests and the headless binary to single-step frames.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: VecDeque<SessionId>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pop(&mut self) -> Option<SessionId> {
        self.pending.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule(&mut self, session: SessionId) {
        self.pending.push_back(session);
    }

    fn cancel(&mut self, session: SessionId) {
        self.pending.retain(|s| *s != session);
    }
}

/// Payload of the stats callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsUpdate {
    /// Current monster radius
    pub size: f32,
    pub eaten: u32,
}

type StatsListener = Box<dyn FnMut(StatsUpdate)>;
type PhaseListener = Box<dyn FnMut(GamePhase)>;

/// Owns the session state and runs it frame by frame
pub struct FrameDriver<S: FrameScheduler> {
    settings: Settings,
    scheduler: S,
    session: SessionId,
    state: Option<GameState>,
    /// Input read at the start of every frame
    pub input: InputState,
    renderer: Option<Box<dyn Renderer>>,
    narration: Option<Box<dyn NarrationSink>>,
    on_stats: Option<StatsListener>,
    on_phase: Option<PhaseListener>,
    log: VecDeque<String>,
    last_narrated_level: u32,
    victory_narrated: bool,
}

impl<S: FrameScheduler> FrameDriver<S> {
    pub fn new(settings: Settings, scheduler: S) -> Self {
        let mut driver = Self {
            settings,
            scheduler,
            session: SessionId::default(),
            state: None,
            input: InputState::new(),
            renderer: None,
            narration: None,
            on_stats: None,
            on_phase: None,
            log: VecDeque::with_capacity(LOG_CAPACITY),
            last_narrated_level: 1,
            victory_narrated: false,
        };
        driver.reset_log(MENU_LOG);
        driver
    }

    pub fn set_renderer(&mut self, renderer: Box<dyn Renderer>) {
        self.renderer = Some(renderer);
    }

    pub fn set_narration(&mut self, sink: Box<dyn NarrationSink>) {
        self.narration = Some(sink);
    }

    pub fn on_stats(&mut self, listener: impl FnMut(StatsUpdate) + 'static) {
        self.on_stats = Some(Box::new(listener));
    }

    pub fn on_phase(&mut self, listener: impl FnMut(GamePhase) + 'static) {
        self.on_phase = Some(Box::new(listener));
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// `Menu` until a session has been started
    pub fn phase(&self) -> GamePhase {
        self.state.as_ref().map_or(GamePhase::Menu, |s| s.phase)
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Game log, oldest first
    pub fn log_lines(&self) -> impl Iterator<Item = &str> {
        self.log.iter().map(String::as_str)
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line.into());
    }

    fn reset_log(&mut self, first: &str) {
        self.log.clear();
        self.log.push_back(first.to_string());
    }

    /// Start a fresh session on a newly generated lab
    pub fn start(&mut self, seed: u64) {
        let state = GameState::new(seed, &self.settings);
        self.start_session(state);
    }

    /// Start a session on a prepared world
    pub fn start_session(&mut self, state: GameState) {
        self.invalidate_session();

        log::info!(
            "Starting session {} (seed {}, {} humans, {} walls)",
            self.session.value(),
            state.seed,
            state.humans.len(),
            state.walls.len()
        );

        let stats = StatsUpdate {
            size: state.monster.radius,
            eaten: state.stats.humans_eaten,
        };
        self.last_narrated_level = state.monster.level;
        self.victory_narrated = false;
        self.state = Some(state);
        self.input.release_all();
        self.reset_log(START_LOG);

        self.emit_phase(GamePhase::Playing);
        self.emit_stats(stats);
        self.scheduler.schedule(self.session);
    }

    /// Tear down the current session and return to the menu
    pub fn reset(&mut self) {
        self.invalidate_session();
        self.state = None;
        self.reset_log(MENU_LOG);
        self.emit_phase(GamePhase::Menu);
    }

    /// Cancel everything scheduled for the current session and move to a new id
    fn invalidate_session(&mut self) {
        self.scheduler.cancel(self.session);
        if let Some(sink) = self.narration.as_mut() {
            sink.cancel_all();
        }
        self.session = self.session.next();
    }

    /// Display-refresh callback. Returns false when the frame was ignored.
    pub fn on_frame(&mut self, session: SessionId) -> bool {
        if session != self.session {
            log::debug!(
                "Ignoring stale frame for session {} (current {})",
                session.value(),
                self.session.value()
            );
            return false;
        }

        let input = self.input.to_tick_input();
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        if state.phase != GamePhase::Playing {
            return false;
        }

        tick(state, &input);

        let events = state.events.clone();
        let snapshot = NarrationRequest {
            level: state.monster.level,
            humans_eaten: state.stats.humans_eaten,
            walls_broken: state.stats.walls_broken,
            is_victory: false,
        };
        let phase = state.phase;

        self.dispatch_events(&events, snapshot);
        self.poll_narration();

        if let (Some(renderer), Some(state)) = (self.renderer.as_mut(), self.state.as_ref()) {
            renderer.draw(&RenderFrame::capture(state));
        }

        if phase == GamePhase::Playing {
            self.scheduler.schedule(session);
        }
        true
    }

    /// Move finished narration lines into the game log
    pub fn poll_narration(&mut self) {
        let lines = match self.narration.as_mut() {
            Some(sink) => sink.drain(),
            None => return,
        };
        for line in lines {
            self.push_log(line);
        }
    }

    fn dispatch_events(&mut self, events: &[GameEvent], snapshot: NarrationRequest) {
        for event in events {
            match event {
                GameEvent::StatsChanged { size, eaten } => {
                    self.emit_stats(StatsUpdate {
                        size: *size,
                        eaten: *eaten,
                    });
                }
                GameEvent::LevelUp { level } => {
                    if *level > self.last_narrated_level {
                        self.last_narrated_level = *level;
                        self.request_narration(NarrationRequest {
                            level: *level,
                            ..snapshot
                        });
                    }
                }
                GameEvent::PhaseChanged(phase) => {
                    self.emit_phase(*phase);
                    if *phase == GamePhase::Victory && !self.victory_narrated {
                        self.victory_narrated = true;
                        self.request_narration(NarrationRequest {
                            is_victory: true,
                            ..snapshot
                        });
                    }
                }
                _ => {}
            }
        }
    }

    fn request_narration(&mut self, request: NarrationRequest) {
        if !self.settings.narration {
            return;
        }
        if let Some(sink) = self.narration.as_mut() {
            sink.submit(request);
        }
    }

    fn emit_stats(&mut self, update: StatsUpdate) {
        if let Some(listener) = self.on_stats.as_mut() {
            listener(update);
        }
    }

    fn emit_phase(&mut self, phase: GamePhase) {
        if let Some(listener) = self.on_phase.as_mut() {
            listener(phase);
        }
    }
}

impl FrameDriver<ManualScheduler> {
    /// Run the next queued frame, if any
    pub fn pump(&mut self) -> bool {
        match self.scheduler.pop() {
            Some(session) => self.on_frame(session),
            None => false,
        }
    }
}
