//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (UART / USB-CDC in production).  Status reports go out as the
//! fixed-format status line.

use log::info;

use crate::app::events::{AppEvent, STATUS_LINE_CAP};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink {
    last_status: Option<heapless::String<STATUS_LINE_CAP>>,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent status line written.
    pub fn last_status(&self) -> Option<&str> {
        self.last_status.as_deref()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Status(snapshot) => {
                let line = snapshot.status_line();
                info!("{}", line);
                self.last_status = Some(line);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
        }
    }
}
