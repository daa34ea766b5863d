//! Per-tick status lines and world events, drained into each snapshot.

use warglobe_core::enums::StatusKind;
use warglobe_core::error::WarRoomError;
use warglobe_core::events::{StatusMessage, WorldEvent};

#[derive(Debug, Default)]
pub struct Feedback {
    frame: u64,
    status: Vec<StatusMessage>,
    events: Vec<WorldEvent>,
}

impl Feedback {
    /// Stamp subsequent messages with `frame`.
    pub fn begin_frame(&mut self, frame: u64) {
        self.frame = frame;
    }

    pub fn status(&mut self, kind: StatusKind, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(?kind, "{message}");
        self.status.push(StatusMessage {
            kind,
            message,
            frame: self.frame,
        });
    }

    pub fn error(&mut self, error: &WarRoomError) {
        let kind = match error {
            WarRoomError::BlockedDestination { .. } => StatusKind::Blocked,
            _ => StatusKind::Error,
        };
        self.status(kind, error.to_string());
    }

    pub fn event(&mut self, event: WorldEvent) {
        self.events.push(event);
    }

    pub fn take_status(&mut self) -> Vec<StatusMessage> {
        std::mem::take(&mut self.status)
    }

    pub fn take_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }
}
