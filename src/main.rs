//! Headless demo runner (default binary).
//!
//! Starts a live engine, feeds it a scripted stream of player commands and
//! logs the notifications from a separate consumer thread. When the match ends
//! (game over or `TETRIS_DEMO_MS` elapsed) it quits the engine, joins the fall
//! thread and prints the final board.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use crossbeam_channel::Receiver;
use log::info;

use blocktris::core::{GameSnapshot, SimpleRng};
use blocktris::engine::{EngineConfig, GameEngine};
use blocktris::types::{Command, GameEvent, GameStatus};

/// Demo pacing, read from the environment
#[derive(Debug, Clone, Copy)]
struct DemoSettings {
    run_for: Duration,
    step: Duration,
}

impl DemoSettings {
    fn from_env() -> Self {
        let ms = |name: &str, default: u64| {
            std::env::var(name)
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        };
        Self {
            run_for: Duration::from_millis(ms("TETRIS_DEMO_MS", 20_000)),
            step: Duration::from_millis(ms("TETRIS_DEMO_STEP_MS", 120)),
        }
    }
}

/// What the event consumer saw
#[derive(Debug, Default)]
struct EventTally {
    redraws: u64,
    next_pieces: u64,
    game_over: bool,
}

const SCRIPT: [Command; 8] = [
    Command::MoveLeft,
    Command::MoveRight,
    Command::RotateLeft,
    Command::RotateRight,
    Command::SoftDrop,
    Command::MoveLeft,
    Command::MoveRight,
    Command::HardDrop,
];

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = EngineConfig::from_env();
    let settings = DemoSettings::from_env();
    info!("demo settings: {:?}, seed {}", settings, config.seed);

    let (engine, events) = GameEngine::start(config)?;
    let watcher = thread::Builder::new()
        .name("blocktris-events".to_string())
        .spawn(move || watch(events))?;

    drive(&engine, settings, config.seed);

    let snapshot = engine.snapshot();
    engine.quit()?;
    // Dropping the engine closes the last sender, which ends the watcher.
    drop(engine);
    let tally = watcher
        .join()
        .map_err(|_| anyhow!("event watcher panicked"))?;

    print!("{}", render(&snapshot));
    println!(
        "score {}  lines {}  level {}  ({} redraws, {} pieces{})",
        snapshot.score,
        snapshot.lines,
        snapshot.level,
        tally.redraws,
        tally.next_pieces,
        if tally.game_over { ", game over" } else { "" }
    );
    Ok(())
}

/// Issue pseudo-random scripted commands until time runs out or the game ends
fn drive(engine: &GameEngine, settings: DemoSettings, seed: u32) {
    let started = Instant::now();
    let mut rng = SimpleRng::new(seed);

    while started.elapsed() < settings.run_for {
        if engine.snapshot().status == GameStatus::GameOver {
            break;
        }
        let command = SCRIPT[rng.below(SCRIPT.len() as u32) as usize];
        engine.apply(command);
        thread::sleep(settings.step);
    }
}

fn watch(events: Receiver<GameEvent>) -> EventTally {
    let mut tally = EventTally::default();
    for event in events.iter() {
        match event {
            GameEvent::Redraw => tally.redraws += 1,
            GameEvent::NextPieceChanged(kind) => {
                tally.next_pieces += 1;
                log::debug!("next piece: {}", kind.as_str());
            }
            GameEvent::ScoreChanged(score) => info!("score: {score}"),
            GameEvent::LinesChanged(lines) => info!("lines: {lines}"),
            GameEvent::LevelChanged(level) => info!("level: {level}"),
            GameEvent::GameOver => {
                tally.game_over = true;
                info!("game over");
            }
        }
    }
    tally
}

/// Plain-text board: `#` falling piece, `X` landed cell, `.` empty
fn render(snapshot: &GameSnapshot) -> String {
    let mut out = String::with_capacity((snapshot.columns + 3) * snapshot.rows);
    for row in 0..snapshot.rows {
        out.push('|');
        for col in 0..snapshot.columns {
            // Only the falling piece paints over an empty landed cell.
            out.push(match (snapshot.color_at(row, col), snapshot.cell(row, col)) {
                (Some(_), None) => '#',
                (Some(_), Some(_)) => 'X',
                (None, _) => '.',
            });
        }
        out.push_str("|\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocktris::types::Color;

    #[test]
    fn test_render_marks_falling_and_landed_cells() {
        let mut snapshot = GameSnapshot::default();
        let last = snapshot.rows - 1;
        snapshot.board[last * snapshot.columns] = Some(Color::rgb(1, 2, 3));

        let text = render(&snapshot);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), snapshot.rows);
        assert_eq!(lines[0], "|...####...|");
        assert_eq!(lines[last], "|X.........|");
    }
}
