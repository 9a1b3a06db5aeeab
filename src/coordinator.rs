//! Serializes player input and the game clock into a single consumer loop.
//!
//! Two producers feed a bounded hand-off: a blocking input reader on its own
//! thread and a fixed-period clock task. The consumer applies one event at a
//! time to the [`SnakeGame`] and renders after each one, so the game is only
//! ever touched from one place.

use std::io;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, trace};
use rand::Rng;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::SendTimeoutError};
use tokio::sync::watch;
use tokio::task;
use tokio::time::{self, MissedTickBehavior};

use crate::command::Command;
use crate::error::Result;
use crate::game::{GameState, SnakeGame};

pub const TICK_INTERVAL: Duration = Duration::from_millis(100);
pub const SEND_TIMEOUT: Duration = Duration::from_secs(1);
pub const HANDOFF_CAPACITY: usize = 32;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Input(Command),
    Tick,
}

/// A source of player commands, read from a dedicated thread.
///
/// Implementations should return within a bounded wait, yielding `Ok(None)`
/// when nothing arrived, so the reader can notice a shutdown.
pub trait InputSource: Send + 'static {
    fn next_command(&mut self) -> io::Result<Option<Command>>;
}

/// Draws the game. Only ever called after an event has been fully applied.
pub trait Presenter {
    fn render<R>(&mut self, game: &SnakeGame<R>) -> io::Result<()>;
}

/// One-shot stop signal shared by the producers and the consumer loop.
#[derive(Clone, Debug)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Shutdown { tx: Arc::new(tx) }
    }

    pub fn raise(&self) {
        if !self.tx.send_replace(true) {
            debug!("shutdown raised");
        }
    }

    pub fn is_raised(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the signal has been raised.
    pub async fn raised(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this can't fail
        let _ = rx.wait_for(|raised| *raised).await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Shutdown::new()
    }
}

pub struct Coordinator<R, P> {
    game: SnakeGame<R>,
    presenter: P,
    tick: Duration,
    shutdown: Shutdown,
}

impl<R: Rng, P: Presenter> Coordinator<R, P> {
    pub fn new(game: SnakeGame<R>, presenter: P, shutdown: Shutdown) -> Self {
        Coordinator { game, presenter, tick: TICK_INTERVAL, shutdown }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Applies a single event and renders the result. Breaks once the player
    /// has asked to quit.
    pub fn apply(&mut self, event: Event) -> io::Result<ControlFlow<()>> {
        match event {
            Event::Tick => {
                if self.game.state() == GameState::Playing {
                    self.game.step();
                }
            },
            Event::Input(Command::Turn(dir)) => {
                self.game.request_direction(dir);
            },
            Event::Input(Command::TogglePause) => {
                self.game.toggle_pause();
            },
            Event::Input(Command::Reset) => self.game.reset(),
            Event::Input(Command::Quit) => {
                info!("quit requested");
                self.shutdown.raise();
                return Ok(ControlFlow::Break(()));
            },
        }

        self.presenter.render(&self.game)?;
        Ok(ControlFlow::Continue(()))
    }

    /// Runs until the player quits, the shutdown signal is raised from
    /// elsewhere, or rendering fails. Both producers have stopped by the time
    /// this returns.
    pub async fn run<I: InputSource>(&mut self, input: I) -> Result<()> {
        let (tx, mut rx) = mpsc::channel(HANDOFF_CAPACITY);

        let clock = tokio::spawn(run_clock(tx.clone(), self.tick, self.shutdown.clone()));
        let reader = {
            let shutdown = self.shutdown.clone();
            let handle = Handle::current();
            task::spawn_blocking(move || run_input(input, tx, shutdown, handle))
        };

        let mut outcome = self.presenter.render(&self.game);

        while outcome.is_ok() {
            let event = tokio::select! {
                biased;
                _ = self.shutdown.raised() => break,
                event = rx.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };

            match self.apply(event) {
                Ok(ControlFlow::Continue(())) => {},
                Ok(ControlFlow::Break(())) => break,
                Err(e) => outcome = Err(e),
            }
        }

        self.shutdown.raise();
        drop(rx);

        if let Err(e) = clock.await {
            error!("clock task failed: {}", e);
        }
        if let Err(e) = reader.await {
            error!("input reader failed: {}", e);
        }
        debug!("coordinator stopped");

        outcome.map_err(Into::into)
    }

    pub fn game(&self) -> &SnakeGame<R> {
        &self.game
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }
}

///////////////////////////////////////////////////////////////////////////////

/// Sends `event`, retrying on timeout. Returns false if the event was not
/// delivered because the loop is going away.
async fn hand_off(tx: &mpsc::Sender<Event>, event: Event, shutdown: &Shutdown) -> bool {
    loop {
        if shutdown.is_raised() {
            return false;
        }

        match tx.send_timeout(event, SEND_TIMEOUT).await {
            Ok(()) => return true,
            Err(SendTimeoutError::Timeout(_)) => trace!("hand-off full, retrying {:?}", event),
            Err(SendTimeoutError::Closed(_)) => return false,
        }
    }
}

async fn run_clock(tx: mpsc::Sender<Event>, period: Duration, shutdown: Shutdown) {
    debug!("clock started, period {:?}", period);

    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.raised() => break,
            _ = interval.tick() => {
                if !hand_off(&tx, Event::Tick, &shutdown).await {
                    break;
                }
            },
        }
    }

    debug!("clock stopped");
}

fn run_input<I: InputSource>(mut input: I, tx: mpsc::Sender<Event>, shutdown: Shutdown, handle: Handle) {
    debug!("input reader started");

    while !shutdown.is_raised() {
        match input.next_command() {
            Ok(Some(command)) => {
                if !handle.block_on(hand_off(&tx, Event::Input(command), &shutdown)) {
                    break;
                }
            },
            Ok(None) => {},
            Err(e) => {
                // Without input there is no way to quit, so stop everything
                error!("reading input failed: {}", e);
                shutdown.raise();
                break;
            },
        }
    }

    debug!("input reader stopped");
}
