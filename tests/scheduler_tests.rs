//! Scheduler tests - the fall heartbeat thread in real time

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use blocktris::engine::{Scheduler, SchedulerState};
use crossbeam_channel::RecvTimeoutError;

const PATIENCE: Duration = Duration::from_secs(2);

fn counting(interval: Duration) -> (Scheduler, Arc<AtomicUsize>) {
    let fires = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fires);
    let scheduler = Scheduler::start(interval, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();
    (scheduler, fires)
}

#[test]
fn test_fires_periodically() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let scheduler = Scheduler::start(Duration::from_millis(10), move |_| {
        let _ = tx.send(Instant::now());
    })
    .unwrap();

    for _ in 0..3 {
        assert!(rx.recv_timeout(PATIENCE).is_ok());
    }
    assert_eq!(scheduler.state(), SchedulerState::Running);
    scheduler.shutdown().unwrap();
}

#[test]
fn test_first_fire_waits_one_interval() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let started = Instant::now();
    let scheduler = Scheduler::start(Duration::from_millis(80), move |_| {
        let _ = tx.send(Instant::now());
    })
    .unwrap();

    let fired = rx.recv_timeout(PATIENCE).unwrap();
    assert!(fired - started >= Duration::from_millis(80));
    scheduler.shutdown().unwrap();
}

#[test]
fn test_pause_stops_firing() {
    let (scheduler, fires) = counting(Duration::from_millis(10));
    while fires.load(Ordering::SeqCst) < 2 {
        thread::sleep(Duration::from_millis(5));
    }

    scheduler.pause();
    assert_eq!(scheduler.state(), SchedulerState::Paused);
    // A callback already dispatched may still finish.
    thread::sleep(Duration::from_millis(30));
    let settled = fires.load(Ordering::SeqCst);

    thread::sleep(Duration::from_millis(120));
    assert_eq!(fires.load(Ordering::SeqCst), settled);
    scheduler.shutdown().unwrap();
}

#[test]
fn test_restart_waits_full_interval() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let scheduler = Scheduler::start(Duration::from_millis(100), move |_| {
        let _ = tx.send(Instant::now());
    })
    .unwrap();
    scheduler.pause();
    thread::sleep(Duration::from_millis(150));
    assert!(rx.try_recv().is_err());

    let restarted = Instant::now();
    scheduler.restart();
    assert_eq!(scheduler.state(), SchedulerState::Running);

    let fired = rx.recv_timeout(PATIENCE).unwrap();
    assert!(fired - restarted >= Duration::from_millis(100));
    scheduler.shutdown().unwrap();
}

#[test]
fn test_cancel_while_paused_joins_promptly() {
    let (scheduler, fires) = counting(Duration::from_secs(60));
    scheduler.pause();

    let started = Instant::now();
    scheduler.cancel();
    scheduler.join().unwrap();

    assert!(started.elapsed() < PATIENCE);
    assert_eq!(scheduler.state(), SchedulerState::Canceled);
    assert_eq!(fires.load(Ordering::SeqCst), 0);
}

#[test]
fn test_cancel_is_terminal() {
    let (scheduler, fires) = counting(Duration::from_millis(10));
    scheduler.shutdown().unwrap();
    let after = fires.load(Ordering::SeqCst);

    scheduler.restart();
    scheduler.reschedule(Duration::from_millis(1));
    thread::sleep(Duration::from_millis(50));

    assert_eq!(scheduler.state(), SchedulerState::Canceled);
    assert_eq!(fires.load(Ordering::SeqCst), after);
    // Joining again is harmless.
    scheduler.join().unwrap();
}

#[test]
fn test_shorter_reschedule_wakes_worker() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let scheduler = Scheduler::start(Duration::from_secs(60), move |_| {
        let _ = tx.send(());
    })
    .unwrap();

    scheduler.reschedule(Duration::from_millis(10));
    assert!(rx.recv_timeout(PATIENCE).is_ok());
    assert_eq!(scheduler.interval(), Duration::from_millis(10));
    scheduler.shutdown().unwrap();
}

#[test]
fn test_longer_reschedule_delays_pending_fire() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let started = Instant::now();
    let scheduler = Scheduler::start(Duration::from_millis(50), move |_| {
        let _ = tx.send(Instant::now());
    })
    .unwrap();

    scheduler.reschedule(Duration::from_millis(150));
    let fired = rx.recv_timeout(PATIENCE).unwrap();
    assert!(fired - started >= Duration::from_millis(150));
    scheduler.shutdown().unwrap();
}

#[test]
fn test_slow_callback_does_not_drift() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let started = Instant::now();
    let scheduler = Scheduler::start(Duration::from_millis(50), move |_| {
        thread::sleep(Duration::from_millis(35));
        let _ = tx.send(Instant::now());
    })
    .unwrap();

    let mut last = started;
    for _ in 0..8 {
        last = rx.recv_timeout(PATIENCE).unwrap();
    }
    // Eight periods plus one callback; a drifting timer needs 8 * 85ms.
    assert!(last - started < Duration::from_millis(600));
    scheduler.shutdown().unwrap();
}

#[test]
fn test_callback_can_use_control() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let scheduler = Scheduler::start(Duration::from_millis(10), move |control| {
        control.reschedule(Duration::from_millis(20));
        control.pause();
        let _ = tx.send(control.state());
    })
    .unwrap();

    assert_eq!(rx.recv_timeout(PATIENCE), Ok(SchedulerState::Paused));
    assert_eq!(scheduler.interval(), Duration::from_millis(20));
    scheduler.shutdown().unwrap();
}

#[test]
fn test_drop_joins_worker() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let scheduler = Scheduler::start(Duration::from_millis(5), move |_| {
        let _ = tx.send(());
    })
    .unwrap();
    assert!(rx.recv_timeout(PATIENCE).is_ok());

    drop(scheduler);

    // The callback (and its sender) is gone once the worker has exited.
    while rx.try_recv().is_ok() {}
    assert_eq!(
        rx.recv_timeout(PATIENCE),
        Err(RecvTimeoutError::Disconnected)
    );
}
