//! Integration tests for the async dispatcher and idle loop.
//!
//! A local [`EventBus`] stands in for the firmware's static bus; the mock
//! hardware feeds conversion results back through it.  Futures are driven
//! with `futures_lite::future::block_on`.

use futures_lite::future::{self, block_on};

use crate::mock_hw::{MockHardware, MockWatchdog, RecordingSink};

use fanctl::app::events::AppEvent;
use fanctl::app::service::{AppService, idle_step};
use fanctl::config::FanConfig;
use fanctl::control::ActuationLevel;
use fanctl::events::{Event, EventBus};
use fanctl::fsm::StateId;

fn started(bus: &EventBus, adc: u16) -> (AppService, MockHardware<'_>, RecordingSink) {
    let mut app = AppService::new(FanConfig::default());
    let mut hw = MockHardware::on_bus(bus, adc);
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

#[test]
fn tick_then_its_conversion() {
    let bus = EventBus::new();
    let (mut app, mut hw, mut sink) = started(&bus, 301);

    bus.signal_tick();
    assert_eq!(block_on(app.dispatch_one(&bus, &mut hw, &mut sink)), Event::Tick);
    assert_eq!(hw.conversions, 1, "tick must request a conversion");

    assert_eq!(
        block_on(app.dispatch_one(&bus, &mut hw, &mut sink)),
        Event::Sample(301)
    );
    assert_eq!(app.temperature(), 298);
}

#[test]
fn pending_sample_is_recorded_before_pending_tick() {
    let bus = EventBus::new();
    let (mut app, mut hw, mut sink) = started(&bus, 0);

    bus.signal_tick();
    block_on(app.dispatch_one(&bus, &mut hw, &mut sink));
    block_on(app.dispatch_one(&bus, &mut hw, &mut sink));
    assert_eq!(hw.conversions, 1);
    assert_eq!(app.accumulator().count, 1);

    bus.signal_tick();
    assert!(bus.conversion_complete(400));

    let first = block_on(app.dispatch_one(&bus, &mut hw, &mut sink));
    assert_eq!(first, Event::Sample(400));
    assert_eq!(app.accumulator().count, 2);
    assert_eq!(hw.conversions, 1);

    let second = block_on(app.dispatch_one(&bus, &mut hw, &mut sink));
    assert_eq!(second, Event::Tick);
    assert_eq!(hw.conversions, 2);
}

#[test]
fn report_reaches_idle_loop_and_feeds_watchdog() {
    let bus = EventBus::new();
    let (mut app, mut hw, mut sink) = started(&bus, 301);

    for _ in 0..32 {
        bus.signal_tick();
        block_on(app.dispatch_one(&bus, &mut hw, &mut sink));
        block_on(app.dispatch_one(&bus, &mut hw, &mut sink));
    }

    let mut report_sink = RecordingSink::new();
    let wd = MockWatchdog::default();
    block_on(idle_step(&bus, &mut report_sink, &wd));

    assert_eq!(wd.feeds.get(), 1);
    assert_eq!(
        report_sink.status_lines(),
        vec!["ADC:301 ADJ:298 T:25 PWM:100 ST:1".to_owned()]
    );
}

#[test]
fn run_processes_every_tick_without_spinning() {
    let bus = EventBus::new();
    let (mut app, mut hw, mut sink) = started(&bus, 301);

    block_on(future::or(app.run(&bus, &mut hw, &mut sink), async {
        for _ in 0..70 {
            bus.signal_tick();
            future::yield_now().await;
            future::yield_now().await;
        }
    }));

    assert_eq!(hw.conversions, 70);
    assert_eq!(app.state(), StateId::Running);
    assert_eq!(app.level(), ActuationLevel::Duty(102));

    let mut report_sink = RecordingSink::new();
    let wd = MockWatchdog::default();
    block_on(idle_step(&bus, &mut report_sink, &wd));
    assert_eq!(wd.feeds.get(), 1);
    assert_eq!(report_sink.status_lines().len(), 1);
    assert!(
        sink.events
            .iter()
            .any(|e| matches!(e, AppEvent::StateChanged { to: StateId::Running, .. }))
    );
}
