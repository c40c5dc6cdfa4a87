//! Game module - the match state machine
//!
//! [`Game`] ties the board, the falling/next pieces, the bag and the scoring
//! policy together. It is single-threaded and lock-free on purpose: the
//! threaded engine wraps one `Game` in a mutex and calls into it for every
//! command and every scheduler tick.
//!
//! The game never owns its fall timer. Operations that need to speed up,
//! pause or restart automatic falling receive a [`FallTimer`], which the engine
//! backs with its scheduler and tests back with [`ManualTimer`].
//!
//! State changes are reported as [`GameEvent`]s queued inside the game; the
//! owner drains them with [`Game::take_events`] and delivers them elsewhere.

use std::cell::Cell as StdCell;
use std::time::{Duration, Instant};

use log::{debug, info, trace};

use crate::board::Board;
use crate::piece::Piece;
use crate::rng::PieceBag;
use crate::scoring::{base_fall_interval, level_for_lines, line_clear_score, sped_up};
use crate::snapshot::{FallingSnapshot, GameSnapshot};
use crate::types::{Command, GameEvent, GameStatus};

/// Control surface of the automatic-fall heartbeat
pub trait FallTimer {
    /// Change the period, keeping progress toward the pending deadline
    fn reschedule(&self, interval: Duration);
    /// Stop firing until `restart`
    fn pause(&self);
    /// Resume firing, next deadline one full interval from now
    fn restart(&self);
}

/// A [`FallTimer`] that only records what it was told.
///
/// Useful for driving a [`Game`] by hand (tests, benchmarks, replays).
#[derive(Debug)]
pub struct ManualTimer {
    interval: StdCell<Duration>,
    paused: StdCell<bool>,
    restarts: StdCell<u32>,
}

impl ManualTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: StdCell::new(interval),
            paused: StdCell::new(false),
            restarts: StdCell::new(0),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval.get()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }

    pub fn restarts(&self) -> u32 {
        self.restarts.get()
    }
}

impl Default for ManualTimer {
    fn default() -> Self {
        Self::new(base_fall_interval())
    }
}

impl FallTimer for ManualTimer {
    fn reschedule(&self, interval: Duration) {
        self.interval.set(interval);
    }

    fn pause(&self) {
        self.paused.set(true);
    }

    fn restart(&self) {
        self.paused.set(false);
        self.restarts.set(self.restarts.get() + 1);
    }
}

/// Complete state of one match
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    bag: PieceBag,
    falling: Piece,
    next: Piece,
    fall_interval: Duration,
    level: u32,
    score: u32,
    lines: u32,
    status: GameStatus,
    /// One hard drop per fall cycle
    hard_drop_armed: bool,
    events: Vec<GameEvent>,
}

impl Game {
    /// Create an active match drawing pieces from a bag seeded with `seed`
    pub fn new(seed: u32) -> Self {
        let mut bag = PieceBag::new(seed);
        let falling = Piece::spawn(bag.next_kind());
        let next = Piece::spawn(bag.next_kind());

        let mut game = Self {
            board: Board::new(),
            bag,
            falling,
            next,
            fall_interval: base_fall_interval(),
            level: 0,
            score: 0,
            lines: 0,
            status: GameStatus::Active,
            hard_drop_armed: true,
            events: Vec::new(),
        };
        game.post_full_refresh();
        game
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_paused(&self) -> bool {
        self.status == GameStatus::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn fall_interval(&self) -> Duration {
        self.fall_interval
    }

    pub fn hard_drop_armed(&self) -> bool {
        self.hard_drop_armed
    }

    pub fn falling(&self) -> &Piece {
        &self.falling
    }

    pub fn next(&self) -> &Piece {
        &self.next
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for setting up positions. Bypasses scoring.
    #[doc(hidden)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Take the notifications queued since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn post(&mut self, event: GameEvent) {
        if event == GameEvent::Redraw && self.events.contains(&GameEvent::Redraw) {
            return;
        }
        self.events.push(event);
    }

    fn post_full_refresh(&mut self) {
        self.post(GameEvent::Redraw);
        self.post(GameEvent::NextPieceChanged(self.next.kind()));
        self.post(GameEvent::ScoreChanged(self.score));
        self.post(GameEvent::LinesChanged(self.lines));
        self.post(GameEvent::LevelChanged(self.level));
    }

    /// True when every mino of `piece` is inside the walls, above the floor
    /// and on a free cell. Minos above the top edge are always legal.
    pub fn fits(&self, piece: &Piece) -> bool {
        let columns = self.board.columns() as i8;
        let rows = self.board.rows() as i8;
        piece.absolute_cells().all(|(row, col)| {
            col >= 0
                && col < columns
                && row < rows
                && (row < 0 || !self.board.is_occupied(row, col))
        })
    }

    /// Adopt `candidate` as the falling piece if it fits
    pub fn attempt_move(&mut self, candidate: Piece) -> bool {
        if !self.fits(&candidate) {
            return false;
        }
        self.falling = candidate;
        self.post(GameEvent::Redraw);
        true
    }

    /// Player input is only honoured while the match is running
    fn accepts_input(&self) -> bool {
        self.status == GameStatus::Active
    }

    pub fn move_left(&mut self) -> bool {
        self.accepts_input() && self.attempt_move(self.falling.move_left())
    }

    pub fn move_right(&mut self) -> bool {
        self.accepts_input() && self.attempt_move(self.falling.move_right())
    }

    pub fn rotate_left(&mut self) -> bool {
        self.accepts_input() && self.attempt_rotation(self.falling.rotate_left())
    }

    pub fn rotate_right(&mut self) -> bool {
        self.accepts_input() && self.attempt_rotation(self.falling.rotate_right())
    }

    /// Try the rotated piece in place, then kicked one column left, then right
    fn attempt_rotation(&mut self, rotated: Piece) -> bool {
        self.attempt_move(rotated)
            || self.attempt_move(rotated.move_left())
            || self.attempt_move(rotated.move_right())
    }

    /// One immediate fall step. Returns true if the piece moved down, false if
    /// it landed or the command was ignored.
    pub fn soft_drop(&mut self, timer: &dyn FallTimer) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.fall_step(timer)
    }

    /// Drop to the lowest legal position and land immediately.
    ///
    /// Rejected while disarmed; the next scheduler tick re-arms it.
    pub fn hard_drop(&mut self, timer: &dyn FallTimer) -> bool {
        if !self.accepts_input() || !self.hard_drop_armed {
            return false;
        }

        let mut candidate = self.falling.fall();
        while self.attempt_move(candidate) {
            candidate = candidate.fall();
        }
        debug!("hard drop landed at offset {:?}", self.falling.offset());

        self.land(timer);
        self.hard_drop_armed = false;
        if self.status == GameStatus::Active {
            timer.restart();
        }
        true
    }

    /// Scheduler heartbeat: one automatic fall. No-op unless active.
    pub fn tick(&mut self, timer: &dyn FallTimer) {
        if self.status != GameStatus::Active {
            return;
        }
        debug!("fall start, interval: {:?}", self.fall_interval);
        let started = Instant::now();

        self.fall_step(timer);
        self.hard_drop_armed = true;
        self.post(GameEvent::Redraw);

        debug!("fall end, took: {:?}", started.elapsed());
    }

    fn fall_step(&mut self, timer: &dyn FallTimer) -> bool {
        if self.attempt_move(self.falling.fall()) {
            return true;
        }
        self.land(timer);
        false
    }

    /// Lock the falling piece, clear rows, score, promote the next piece and
    /// check for a blocked spawn
    fn land(&mut self, timer: &dyn FallTimer) {
        let landed = self.falling;
        self.board.place(landed.absolute_cells(), landed.color());
        let cleared = self.board.clear_full_rows();
        debug!("{:?} landed, {} rows cleared", landed.kind(), cleared);
        trace!("board after landing:\n{}", self.board);

        if cleared > 0 {
            self.lines += cleared as u32;
            self.score += line_clear_score(cleared, self.level);
            self.post(GameEvent::LinesChanged(self.lines));
            self.post(GameEvent::ScoreChanged(self.score));

            let new_level = level_for_lines(self.lines);
            if new_level != self.level {
                self.level = new_level;
                self.fall_interval = sped_up(self.fall_interval);
                timer.reschedule(self.fall_interval);
                debug!(
                    "level {} reached, fall interval now {:?}",
                    self.level, self.fall_interval
                );
                self.post(GameEvent::LevelChanged(self.level));
            }
        }

        self.falling = self.next;
        self.next = Piece::spawn(self.bag.next_kind());
        self.hard_drop_armed = true;
        self.post(GameEvent::NextPieceChanged(self.next.kind()));

        if !self.fits(&self.falling) {
            info!(
                "game over: score {}, lines {}, level {}",
                self.score, self.lines, self.level
            );
            self.status = GameStatus::GameOver;
            timer.pause();
            self.post(GameEvent::GameOver);
        }
        self.post(GameEvent::Redraw);
    }

    /// Suspend automatic falling. Ignored unless active.
    pub fn pause(&mut self, timer: &dyn FallTimer) -> bool {
        if self.status != GameStatus::Active {
            return false;
        }
        debug!("pause");
        self.status = GameStatus::Paused;
        timer.pause();
        self.post(GameEvent::Redraw);
        true
    }

    /// Resume automatic falling. Ignored unless paused.
    pub fn resume(&mut self, timer: &dyn FallTimer) -> bool {
        if self.status != GameStatus::Paused {
            return false;
        }
        debug!("resume");
        self.status = GameStatus::Active;
        timer.restart();
        self.post(GameEvent::Redraw);
        true
    }

    pub fn toggle_pause(&mut self, timer: &dyn FallTimer) -> bool {
        match self.status {
            GameStatus::Active => self.pause(timer),
            GameStatus::Paused => self.resume(timer),
            GameStatus::GameOver => false,
        }
    }

    /// Start a fresh match in place: empty board, zeroed counters, new pieces,
    /// base fall interval, hard drop armed
    pub fn reset(&mut self, timer: &dyn FallTimer) {
        debug!("reset");
        self.board.reset();
        self.falling = Piece::spawn(self.bag.next_kind());
        self.next = Piece::spawn(self.bag.next_kind());
        self.fall_interval = base_fall_interval();
        self.level = 0;
        self.score = 0;
        self.lines = 0;
        self.status = GameStatus::Active;
        self.hard_drop_armed = true;

        timer.reschedule(self.fall_interval);
        timer.restart();
        self.post_full_refresh();
    }

    /// Dispatch a command. `Quit` is not a game operation and returns false.
    pub fn apply(&mut self, command: Command, timer: &dyn FallTimer) -> bool {
        match command {
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::RotateLeft => self.rotate_left(),
            Command::RotateRight => self.rotate_right(),
            Command::SoftDrop => self.soft_drop(timer),
            Command::HardDrop => self.hard_drop(timer),
            Command::Pause => self.pause(timer),
            Command::Resume => self.resume(timer),
            Command::TogglePause => self.toggle_pause(timer),
            Command::Reset => {
                self.reset(timer);
                true
            }
            Command::Quit => false,
        }
    }

    /// Copy the renderable state into `out`, reusing its allocation
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.rows = self.board.rows();
        out.columns = self.board.columns();
        out.board.clear();
        out.board.extend_from_slice(self.board.cells());
        out.falling = FallingSnapshot::from(&self.falling);
        out.next = self.next.kind();
        out.next_cells = *self.next.cells();
        out.score = self.score;
        out.lines = self.lines;
        out.level = self.level;
        out.status = self.status;
        out.fall_interval = self.fall_interval;
        out.hard_drop_armed = self.hard_drop_armed;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
