//! Frame-loop thread: runs the scene engine at a fixed frame rate.
//!
//! The engine is created inside this thread and never leaves it. Commands
//! arrive over an `mpsc` channel and are applied at the next tick boundary.
//! Each snapshot goes to the caller's sink and into shared state for
//! polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use warglobe_core::state::SceneSnapshot;
use warglobe_geo::CountryIndex;
use warglobe_sim::{EngineConfig, WorldEngine};

use crate::state::{LoopCommand, LoopHandle};

pub fn frame_duration(frame_rate: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(frame_rate.max(1)))
}

/// Spawn the frame loop in a new thread.
pub fn spawn_game_loop(
    config: EngineConfig,
    countries: CountryIndex,
    frame_rate: u32,
    on_snapshot: impl FnMut(&SceneSnapshot) + Send + 'static,
) -> std::io::Result<(LoopHandle, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();
    let latest_snapshot = Arc::new(Mutex::new(None));
    let shared = Arc::clone(&latest_snapshot);

    let thread = std::thread::Builder::new()
        .name("warglobe-frame-loop".into())
        .spawn(move || {
            let engine = WorldEngine::new(config, countries);
            run_game_loop(engine, cmd_rx, &shared, frame_rate, on_snapshot);
        })?;

    Ok((LoopHandle::new(cmd_tx, latest_snapshot), thread))
}

/// The frame loop. Runs until Shutdown or channel disconnect.
fn run_game_loop(
    mut engine: WorldEngine,
    cmd_rx: mpsc::Receiver<LoopCommand>,
    latest_snapshot: &Mutex<Option<SceneSnapshot>>,
    frame_rate: u32,
    mut on_snapshot: impl FnMut(&SceneSnapshot),
) {
    let frame = frame_duration(frame_rate);
    let mut last_tick = Instant::now();
    let mut next_tick_time = last_tick;
    tracing::info!(frame_rate, "frame loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::World(command)) => engine.queue_command(command),
                Ok(LoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    tracing::info!("frame loop stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance by the wall-clock time since the previous tick
        let now = Instant::now();
        let dt_ms = now.duration_since(last_tick).as_secs_f64() * 1000.0;
        last_tick = now;
        let snapshot = engine.tick(dt_ms);

        // 3. Hand the snapshot to the sink and store it for polling
        on_snapshot(&snapshot);
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until the next frame
        next_tick_time += frame;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > frame * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warglobe_core::commands::WorldCommand;

    #[test]
    fn test_frame_duration() {
        assert_eq!(frame_duration(60).as_nanos(), 1_000_000_000u128 / 60);
        assert_eq!(frame_duration(0), Duration::from_secs(1));
    }

    #[test]
    fn test_loop_applies_commands_and_stops() {
        let (handle, thread) = spawn_game_loop(
            EngineConfig::default(),
            CountryIndex::default(),
            240,
            |_| {},
        )
        .unwrap();

        assert!(handle.send(WorldCommand::SetSpeed { multiplier: 3.0 }));
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut speed = None;
        while Instant::now() < deadline {
            if let Some(snapshot) = handle.snapshot() {
                if snapshot.speed_multiplier == 3.0 {
                    speed = Some(snapshot.speed_multiplier);
                    break;
                }
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(speed, Some(3.0));

        assert!(handle.shutdown());
        thread.join().unwrap();
    }

    #[test]
    fn test_snapshot_serialization_is_fast() {
        let mut engine = WorldEngine::new(EngineConfig::default(), CountryIndex::default());
        for _ in 0..50 {
            engine.tick(16.0);
        }
        let snapshot = engine.tick(16.0);
        let start = Instant::now();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(start.elapsed() < Duration::from_millis(50));
        assert!(!json.is_empty());
    }
}
