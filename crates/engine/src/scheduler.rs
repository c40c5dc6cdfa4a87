//! Scheduler module - the automatic-fall heartbeat
//!
//! A [`Scheduler`] owns one background thread that calls `on_fire` once per
//! interval. Deadlines accumulate from the previous target time (`deadline +=
//! interval`), so a slow callback does not make the period drift.
//!
//! States: `Running` -> `Paused` -> `Running` ... -> `Canceled` (terminal).
//!
//! - [`SchedulerControl::reschedule`] shifts the pending deadline by
//!   `new - old` instead of restarting the wait.
//! - [`SchedulerControl::pause`] stops new firings; [`SchedulerControl::restart`]
//!   resumes with a deadline one full interval from now.
//! - [`SchedulerControl::cancel`] wakes the worker even while paused, so
//!   [`Scheduler::join`] returns promptly.
//!
//! The scheduler lock is never held while `on_fire` runs. The callback can
//! therefore take its own locks and call back into the control handle. A
//! callback already dispatched when `pause` returns still completes; callers
//! that need a hard cut-off check their own paused flag inside the callback.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

use log::trace;

use crate::core::FallTimer;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Paused,
    Canceled,
}

#[derive(Debug)]
struct Timing {
    state: SchedulerState,
    interval: Duration,
    deadline: Instant,
}

#[derive(Debug)]
struct Shared {
    timing: Mutex<Timing>,
    wake: Condvar,
}

/// Cloneable handle to a running scheduler's state
#[derive(Debug, Clone)]
pub struct SchedulerControl {
    shared: Arc<Shared>,
}

impl SchedulerControl {
    fn lock(&self) -> MutexGuard<'_, Timing> {
        self.shared
            .timing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> SchedulerState {
        self.lock().state
    }

    pub fn interval(&self) -> Duration {
        self.lock().interval
    }

    /// Change the period, moving the pending deadline by the difference
    pub fn reschedule(&self, interval: Duration) {
        let mut timing = self.lock();
        if timing.state == SchedulerState::Canceled {
            return;
        }
        let old = timing.interval;
        timing.deadline = if interval >= old {
            timing.deadline + (interval - old)
        } else {
            timing
                .deadline
                .checked_sub(old - interval)
                .unwrap_or(timing.deadline)
        };
        timing.interval = interval;
        trace!("scheduler rescheduled {:?} -> {:?}", old, interval);
        self.shared.wake.notify_all();
    }

    pub fn pause(&self) {
        let mut timing = self.lock();
        if timing.state == SchedulerState::Running {
            timing.state = SchedulerState::Paused;
            trace!("scheduler paused");
            self.shared.wake.notify_all();
        }
    }

    /// Resume firing; the next deadline is one interval from now
    pub fn restart(&self) {
        let mut timing = self.lock();
        if timing.state == SchedulerState::Canceled {
            return;
        }
        timing.state = SchedulerState::Running;
        timing.deadline = Instant::now() + timing.interval;
        trace!("scheduler restarted, next fire in {:?}", timing.interval);
        self.shared.wake.notify_all();
    }

    pub fn cancel(&self) {
        let mut timing = self.lock();
        timing.state = SchedulerState::Canceled;
        trace!("scheduler canceled");
        self.shared.wake.notify_all();
    }
}

impl FallTimer for SchedulerControl {
    fn reschedule(&self, interval: Duration) {
        SchedulerControl::reschedule(self, interval);
    }

    fn pause(&self) {
        SchedulerControl::pause(self);
    }

    fn restart(&self) {
        SchedulerControl::restart(self);
    }
}

/// Background periodic timer with its worker thread
#[derive(Debug)]
pub struct Scheduler {
    control: SchedulerControl,
    worker: Mutex<Option<JoinHandle<()>>>,
    worker_id: ThreadId,
}

impl Scheduler {
    /// Spawn the worker in the `Running` state; the first firing happens one
    /// `interval` from now
    pub fn start<F>(interval: Duration, on_fire: F) -> Result<Self>
    where
        F: FnMut(&SchedulerControl) + Send + 'static,
    {
        let control = SchedulerControl {
            shared: Arc::new(Shared {
                timing: Mutex::new(Timing {
                    state: SchedulerState::Running,
                    interval,
                    deadline: Instant::now() + interval,
                }),
                wake: Condvar::new(),
            }),
        };

        let worker_control = control.clone();
        let handle = thread::Builder::new()
            .name("blocktris-fall".to_string())
            .spawn(move || run(worker_control, on_fire))
            .map_err(EngineError::Spawn)?;

        Ok(Self {
            control,
            worker_id: handle.thread().id(),
            worker: Mutex::new(Some(handle)),
        })
    }

    pub fn control(&self) -> &SchedulerControl {
        &self.control
    }

    pub fn state(&self) -> SchedulerState {
        self.control.state()
    }

    pub fn interval(&self) -> Duration {
        self.control.interval()
    }

    pub fn reschedule(&self, interval: Duration) {
        self.control.reschedule(interval);
    }

    pub fn pause(&self) {
        self.control.pause();
    }

    pub fn restart(&self) {
        self.control.restart();
    }

    pub fn cancel(&self) {
        self.control.cancel();
    }

    /// Wait for the worker to exit. Only returns once the scheduler has been
    /// canceled. Joining twice is a no-op.
    pub fn join(&self) -> Result<()> {
        if thread::current().id() == self.worker_id {
            return Err(EngineError::JoinFromWorker);
        }
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match handle {
            Some(handle) => handle.join().map_err(|_| EngineError::WorkerPanicked),
            None => Ok(()),
        }
    }

    /// Cancel, then join
    pub fn shutdown(&self) -> Result<()> {
        self.cancel();
        self.join()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.control.cancel();
        if thread::current().id() != self.worker_id {
            let _ = self.join();
        }
    }
}

fn run<F>(control: SchedulerControl, mut on_fire: F)
where
    F: FnMut(&SchedulerControl),
{
    let mut timing = control.lock();
    loop {
        match timing.state {
            SchedulerState::Canceled => break,
            SchedulerState::Paused => {
                timing = control
                    .shared
                    .wake
                    .wait(timing)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            SchedulerState::Running => {
                let now = Instant::now();
                if now < timing.deadline {
                    let wait = timing.deadline - now;
                    timing = control
                        .shared
                        .wake
                        .wait_timeout(timing, wait)
                        .map(|(guard, _)| guard)
                        .unwrap_or_else(|poisoned| poisoned.into_inner().0);
                    continue;
                }

                let interval = timing.interval;
                timing.deadline += interval;
                drop(timing);
                on_fire(&control);
                timing = control.lock();
            }
        }
    }
    trace!("scheduler worker exiting");
}
