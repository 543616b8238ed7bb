//! Interrupt-driven event bus.
//!
//! Events are produced by:
//! - the periodic tick timer (one "tick" every control period)
//! - ADC conversion completion (one raw sample per requested conversion)
//!
//! and consumed by the dispatcher, which processes them one at a time.
//! Status snapshots flow the other way, from the dispatcher to the idle loop.
//!
//! ```text
//! ┌─────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ Tick timer  │────▶│ tick   (Signal)   │────▶│              │
//! │ ADC done    │────▶│ sample (Channel 1)│────▶│  Dispatcher  │
//! └─────────────┘     └───────────────────┘     └──────┬───────┘
//!                     ┌───────────────────┐            │
//!   Idle loop ◀───────│ report (Signal)   │◀───────────┘
//!                     └───────────────────┘
//! ```
//!
//! Both inbound slots hold at most one pending item.  A tick raised while
//! one is pending coalesces; a sample arriving while the slot is full is
//! dropped.  Producers never run control logic.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use futures_lite::future;
use log::warn;

use crate::app::events::StatusSnapshot;
use crate::sensors::RawSample;

/// One unit of work for the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A conversion completed with this raw reading.
    Sample(RawSample),
    /// The control period elapsed.
    Tick,
}

/// Single-slot signalling between interrupt-side producers and the tasks.
pub struct EventBus {
    tick: Signal<CriticalSectionRawMutex, ()>,
    sample: Channel<CriticalSectionRawMutex, RawSample, 1>,
    report: Signal<CriticalSectionRawMutex, StatusSnapshot>,
}

/// The firmware's bus.  Timer and ADC callbacks reach it through this static.
pub static BUS: EventBus = EventBus::new();

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub const fn new() -> Self {
        Self {
            tick: Signal::new(),
            sample: Channel::new(),
            report: Signal::new(),
        }
    }

    // ── Producers (timer / ADC context) ──────────────────────

    /// Raise the tick flag.  Safe from any context.
    pub fn signal_tick(&self) {
        self.tick.signal(());
    }

    /// Deliver a completed conversion.  Returns `false` if the slot was
    /// still occupied and the sample was dropped.
    pub fn conversion_complete(&self, raw: RawSample) -> bool {
        if self.sample.try_send(raw).is_err() {
            warn!("EventBus: sample slot full, dropped raw={}", raw);
            return false;
        }
        true
    }

    // ── Dispatcher side ──────────────────────────────────────

    /// Wait for the next event.  A pending sample always wins over a
    /// pending tick.
    pub async fn next_event(&self) -> Event {
        future::or(
            async { Event::Sample(self.sample.receive().await) },
            async {
                self.tick.wait().await;
                Event::Tick
            },
        )
        .await
    }

    /// Non-blocking variant of [`next_event`](Self::next_event).
    #[cfg(test)]
    pub(crate) fn try_next_event(&self) -> Option<Event> {
        if let Ok(raw) = self.sample.try_receive() {
            return Some(Event::Sample(raw));
        }
        self.tick.try_take().map(|()| Event::Tick)
    }

    #[cfg(test)]
    pub(crate) fn tick_pending(&self) -> bool {
        self.tick.signaled()
    }

    #[cfg(test)]
    pub(crate) fn sample_pending(&self) -> bool {
        !self.sample.is_empty()
    }

    // ── Report path ──────────────────────────────────────────

    /// Hand a status snapshot to the idle loop.  An unread snapshot is
    /// replaced by the newer one.
    pub fn publish_report(&self, snapshot: StatusSnapshot) {
        self.report.signal(snapshot);
    }

    pub async fn next_report(&self) -> StatusSnapshot {
        self.report.wait().await
    }

    #[cfg(test)]
    pub(crate) fn try_take_report(&self) -> Option<StatusSnapshot> {
        self.report.try_take()
    }
}
