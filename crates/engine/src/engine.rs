//! Engine module - one match running against a live fall scheduler
//!
//! [`GameEngine`] owns the [`Game`] behind a single mutex (the move lock) and a
//! [`Scheduler`] whose callback runs [`Game::tick`]. Every command and every
//! tick holds the move lock for its whole duration, so a hard drop can never be
//! interleaved with a scheduled fall.
//!
//! Lock order is always move lock, then scheduler lock: the scheduler releases
//! its own lock before firing, and game operations only touch the scheduler
//! through short, non-blocking control calls.
//!
//! Notifications are queued by the game while the lock is held and posted on
//! an unbounded channel; the receiver processes them on its own thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, warn};

use crate::config::EngineConfig;
use crate::core::scoring::base_fall_interval;
use crate::core::{FallTimer, Game, GameSnapshot};
use crate::error::Result;
use crate::scheduler::{Scheduler, SchedulerState};
use crate::types::{Command, GameEvent};

fn lock_game(game: &Mutex<Game>) -> MutexGuard<'_, Game> {
    game.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Deliver queued notifications. A dropped receiver is not an error: the
/// presentation layer may go away before the engine does.
fn post_events(game: &mut Game, events: &Sender<GameEvent>) {
    for event in game.take_events() {
        let _ = events.send(event);
    }
}

/// A running match
pub struct GameEngine {
    game: Arc<Mutex<Game>>,
    scheduler: Scheduler,
    events: Sender<GameEvent>,
    quit: AtomicBool,
}

impl GameEngine {
    /// Start a match and its fall scheduler.
    ///
    /// Returns the engine and the receiving end of its notification channel.
    /// The initial refresh events are already queued on it.
    pub fn start(config: EngineConfig) -> Result<(Self, Receiver<GameEvent>)> {
        let (events, receiver) = crossbeam_channel::unbounded();

        let mut game = Game::new(config.seed);
        post_events(&mut game, &events);
        let game = Arc::new(Mutex::new(game));

        let tick_game = Arc::clone(&game);
        let tick_events = events.clone();
        let scheduler = Scheduler::start(base_fall_interval(), move |timer| {
            let mut game = lock_game(&tick_game);
            game.tick(timer);
            post_events(&mut game, &tick_events);
        })?;

        info!("match started with seed {}", config.seed);
        Ok((
            Self {
                game,
                scheduler,
                events,
                quit: AtomicBool::new(false),
            },
            receiver,
        ))
    }

    /// Apply one command under the move lock.
    ///
    /// Returns whether the command changed anything. `Quit` shuts the
    /// scheduler down; use [`GameEngine::quit`] to observe join errors.
    pub fn apply(&self, command: Command) -> bool {
        if command == Command::Quit {
            return match self.quit() {
                Ok(()) => true,
                Err(err) => {
                    warn!("quit failed: {err}");
                    false
                }
            };
        }
        if self.quit.load(Ordering::SeqCst) {
            warn!("ignoring {} after quit", command.as_str());
            return false;
        }

        debug!("command {}", command.as_str());
        self.with_game(|game, timer| game.apply(command, timer))
    }

    /// Run `f` on the game under the move lock, then post whatever it queued.
    ///
    /// Position setup for tests and tooling; players go through [`apply`].
    ///
    /// [`apply`]: GameEngine::apply
    #[doc(hidden)]
    pub fn with_game<R>(&self, f: impl FnOnce(&mut Game, &dyn FallTimer) -> R) -> R {
        let mut game = lock_game(&self.game);
        let result = f(&mut game, self.scheduler.control());
        post_events(&mut game, &self.events);
        result
    }

    /// Copy the current state for rendering
    pub fn snapshot(&self) -> GameSnapshot {
        lock_game(&self.game).snapshot()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        lock_game(&self.game).snapshot_into(out);
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Current scheduler period; tracks the game's fall interval
    pub fn scheduler_interval(&self) -> Duration {
        self.scheduler.interval()
    }

    pub fn is_quit(&self) -> bool {
        self.quit.load(Ordering::SeqCst)
    }

    /// Cancel the scheduler and join its thread. Idempotent.
    pub fn quit(&self) -> Result<()> {
        if self.quit.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.scheduler.shutdown()?;
        info!("match stopped");
        Ok(())
    }
}

impl Drop for GameEngine {
    fn drop(&mut self) {
        if let Err(err) = self.quit() {
            warn!("engine shutdown failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameStatus;

    #[test]
    fn test_start_queues_initial_refresh() {
        let (engine, events) = GameEngine::start(EngineConfig::with_seed(1)).unwrap();
        let first: Vec<GameEvent> = events.try_iter().collect();
        assert_eq!(first.first(), Some(&GameEvent::Redraw));
        assert!(first.contains(&GameEvent::LevelChanged(0)));
        engine.quit().unwrap();
    }

    #[test]
    fn test_commands_after_quit_are_ignored() {
        let (engine, _events) = GameEngine::start(EngineConfig::with_seed(1)).unwrap();
        assert!(engine.apply(Command::Quit));
        assert!(engine.is_quit());
        assert!(!engine.apply(Command::MoveLeft));
        assert_eq!(engine.scheduler_state(), SchedulerState::Canceled);
        assert_eq!(engine.snapshot().status, GameStatus::Active);
    }
}
