//! State shared between the frame-loop thread and the async runtime.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use warglobe_core::commands::WorldCommand;
use warglobe_core::state::SceneSnapshot;

/// Commands sent to the frame-loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// A command to forward to the scene engine.
    World(WorldCommand),
    /// Shut down the frame loop gracefully.
    Shutdown,
}

/// Handle to a running frame loop.
///
/// `mpsc::Sender` is Send but not Sync, so it sits behind a `Mutex` to let
/// async tasks on any worker thread share one handle.
#[derive(Clone)]
pub struct LoopHandle {
    command_tx: Arc<Mutex<mpsc::Sender<LoopCommand>>>,
    /// Latest snapshot, replaced after every tick.
    pub latest_snapshot: Arc<Mutex<Option<SceneSnapshot>>>,
}

impl LoopHandle {
    pub fn new(
        command_tx: mpsc::Sender<LoopCommand>,
        latest_snapshot: Arc<Mutex<Option<SceneSnapshot>>>,
    ) -> Self {
        Self {
            command_tx: Arc::new(Mutex::new(command_tx)),
            latest_snapshot,
        }
    }

    /// Marshal a command onto the next tick. Returns false once the loop
    /// has stopped.
    pub fn send(&self, command: WorldCommand) -> bool {
        self.send_raw(LoopCommand::World(command))
    }

    pub fn shutdown(&self) -> bool {
        self.send_raw(LoopCommand::Shutdown)
    }

    fn send_raw(&self, command: LoopCommand) -> bool {
        match self.command_tx.lock() {
            Ok(tx) => tx.send(command).is_ok(),
            Err(_) => false,
        }
    }

    pub fn snapshot(&self) -> Option<SceneSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }
}
