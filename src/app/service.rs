//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the sampler, the published temperature, the FSM with
//! its context, and the report scheduler.  All I/O flows through port traits
//! injected at call sites, making the entire service testable with mock
//! adapters.
//!
//! ```text
//!  EventBus ──tick/sample──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                            │        AppService         │
//!  AnalogPort + ActuatorPort ◀│ Sampler · FSM · Scheduler │ ──▶ EventBus.report
//!                            └──────────────────────────┘
//! ```

use log::info;

use crate::config::{ActuationKind, FanConfig};
use crate::control::ActuationLevel;
use crate::events::{Event, EventBus};
use crate::fsm::context::ControllerContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::scheduler::ReportScheduler;
use crate::sensors::sampler::TemperatureAccumulator;
use crate::sensors::{RawSample, Sampler, TemperatureCell};

use super::events::{AppEvent, StatusSnapshot};
use super::ports::{ActuatorPort, AnalogPort, EventSink, WatchdogPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    fsm: Fsm,
    ctx: ControllerContext,
    sampler: Sampler,
    temperature: TemperatureCell,
    reports: ReportScheduler,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM: call [`start`](Self::start) next.
    pub fn new(config: FanConfig) -> Self {
        let sampler = Sampler::new(&config);
        let reports = ReportScheduler::new(config.report_interval_ticks);
        let ctx = ControllerContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Startup);

        Self {
            fsm,
            ctx,
            sampler,
            temperature: TemperatureCell::new(),
            reports,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM and drive the fan to its resting output.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        hw.apply(self.ctx.level);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!(
            "AppService started in {:?} ({:?} output)",
            self.fsm.current_state(),
            self.ctx.policy.kind()
        );
    }

    // ── Event handlers ────────────────────────────────────────

    /// Run one control cycle: snapshot temperature → FSM → actuator →
    /// next conversion.  Returns a status snapshot on report ticks.
    ///
    /// The `hw` parameter satisfies **both** [`AnalogPort`] and
    /// [`ActuatorPort`]: this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn on_tick(
        &mut self,
        hw: &mut (impl AnalogPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) -> Option<StatusSnapshot> {
        let prev_state = self.fsm.current_state();

        // 1. One temperature read per evaluation
        self.ctx.temperature = self.temperature.load();

        // 2. FSM tick (pure state logic)
        self.fsm.tick(&mut self.ctx);

        // 3. Apply the output
        hw.apply(self.ctx.level);

        // 4. Emit state change if the FSM moved
        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        }

        // 5. Exactly one conversion per tick, after evaluation
        hw.start_conversion();

        self.reports.tick().then(|| self.snapshot())
    }

    /// Fold a completed conversion into the temperature average.
    pub fn on_sample(&mut self, raw: RawSample) {
        self.sampler.record_sample(raw, &self.temperature);
    }

    // ── Dispatcher ────────────────────────────────────────────

    /// Wait for one event on `bus` and process it.  Report snapshots are
    /// forwarded to the bus for the idle loop.
    pub async fn dispatch_one(
        &mut self,
        bus: &EventBus,
        hw: &mut (impl AnalogPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) -> Event {
        let event = bus.next_event().await;
        match event {
            Event::Sample(raw) => self.on_sample(raw),
            Event::Tick => {
                if let Some(snapshot) = self.on_tick(hw, sink) {
                    bus.publish_report(snapshot);
                }
            }
        }
        event
    }

    /// Dispatcher task.  Never returns.
    pub async fn run(
        &mut self,
        bus: &EventBus,
        hw: &mut (impl AnalogPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        info!("Dispatcher running");
        loop {
            self.dispatch_one(bus, hw, sink).await;
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a status snapshot from the current context.
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            temperature: self.temperature.load(),
            calibration_offset: self.ctx.config.calibration_offset,
            temperature_offset: self.ctx.config.temperature_offset,
            level: self.ctx.level,
            state: self.fsm.current_state(),
            two_stage: self.ctx.policy.kind() == ActuationKind::TwoStage,
        }
    }

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Output level most recently decided by the FSM.
    pub fn level(&self) -> ActuationLevel {
        self.ctx.level
    }

    /// Latest published temperature (zero until the first sample).
    pub fn temperature(&self) -> i16 {
        self.temperature.load()
    }

    pub fn accumulator(&self) -> TemperatureAccumulator {
        self.sampler.accumulator()
    }

}

// ───────────────────────────────────────────────────────────────
// Idle loop
// ───────────────────────────────────────────────────────────────

/// Wait for one report, emit it and acknowledge the watchdog.
pub async fn idle_step(bus: &EventBus, sink: &mut impl EventSink, watchdog: &impl WatchdogPort) {
    let snapshot = bus.next_report().await;
    sink.emit(&AppEvent::Status(snapshot));
    watchdog.feed();
}

/// Background task: status reporting and liveness.  Never returns.
pub async fn idle_loop(bus: &EventBus, sink: &mut impl EventSink, watchdog: &impl WatchdogPort) {
    loop {
        idle_step(bus, sink, watchdog).await;
    }
}
