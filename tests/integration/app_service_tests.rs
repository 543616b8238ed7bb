//! Integration tests for the AppService → FSM → actuator pipeline.
//!
//! These run on the host and drive `on_tick` / `on_sample` directly, the
//! way the dispatcher does, checking the output history on the mock.

use crate::mock_hw::{MockHardware, RecordingSink};

use fanctl::app::events::AppEvent;
use fanctl::app::service::AppService;
use fanctl::config::{ActuationKind, FanConfig};
use fanctl::control::{ActuationLevel, FanStage};
use fanctl::fsm::StateId;

fn make_app(config: FanConfig) -> (AppService, MockHardware<'static>, RecordingSink) {
    let mut app = AppService::new(config);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

fn feed(app: &mut AppService, raw: u16, n: usize) {
    for _ in 0..n {
        app.on_sample(raw);
    }
}

fn ticks(app: &mut AppService, hw: &mut MockHardware<'_>, sink: &mut RecordingSink, n: usize) {
    for _ in 0..n {
        app.on_tick(hw, sink);
    }
}

#[test]
fn boot_kick_start_sequence() {
    let (mut app, mut hw, mut sink) = make_app(FanConfig::default());
    feed(&mut app, 310, 20);

    ticks(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(app.state(), StateId::FullSpeed);
    assert_eq!(hw.last_level(), Some(ActuationLevel::Forced));

    ticks(&mut app, &mut hw, &mut sink, 32);
    assert_eq!(app.state(), StateId::FullSpeed, "still kicking after 32 dwell ticks");

    ticks(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(app.state(), StateId::Running);
    assert_eq!(hw.last_level(), Some(ActuationLevel::Duty(255)));

    ticks(&mut app, &mut hw, &mut sink, 1);
    // T = 307: (307 - 298) * 2 + 40 = 58 % → 147
    assert_eq!(hw.last_level(), Some(ActuationLevel::Duty(147)));
}

#[test]
fn state_changes_are_reported_in_order() {
    let (mut app, mut hw, mut sink) = make_app(FanConfig::default());
    feed(&mut app, 250, 20);
    ticks(&mut app, &mut hw, &mut sink, 35);

    let transitions: Vec<(StateId, StateId)> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::StateChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (StateId::Startup, StateId::FullSpeed),
            (StateId::FullSpeed, StateId::Running),
            (StateId::Running, StateId::Off),
        ]
    );
    assert_eq!(sink.events.first(), Some(&AppEvent::Started(StateId::Startup)));
}

#[test]
fn off_holds_through_hysteresis_band() {
    let (mut app, mut hw, mut sink) = make_app(FanConfig::default());
    feed(&mut app, 250, 20);
    ticks(&mut app, &mut hw, &mut sink, 35);
    assert_eq!(app.state(), StateId::Off);

    // 303 - 3 = 300 = low + hysteresis: not enough
    feed(&mut app, 303, 20);
    ticks(&mut app, &mut hw, &mut sink, 10);
    assert_eq!(app.state(), StateId::Off);
    assert_eq!(hw.last_level(), Some(ActuationLevel::Duty(0)));

    feed(&mut app, 304, 20);
    ticks(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(app.state(), StateId::Startup);
}

#[test]
fn one_conversion_per_tick() {
    let (mut app, mut hw, mut sink) = make_app(FanConfig::default());
    ticks(&mut app, &mut hw, &mut sink, 100);
    assert_eq!(hw.conversions, 100);
    // start() applies once, then one apply per tick
    assert_eq!(hw.applied.len(), 101);
}

#[test]
fn status_snapshots_every_32_ticks() {
    let (mut app, mut hw, mut sink) = make_app(FanConfig::default());
    feed(&mut app, 301, 20);
    let mut reports = Vec::new();
    for _ in 0..64 {
        if let Some(s) = app.on_tick(&mut hw, &mut sink) {
            reports.push(s.status_line().as_str().to_owned());
        }
    }
    assert_eq!(
        reports,
        vec![
            "ADC:301 ADJ:298 T:25 PWM:100 ST:1".to_owned(),
            "ADC:301 ADJ:298 T:25 PWM:40 ST:2".to_owned(),
        ]
    );
}

#[test]
fn two_stage_full_then_half_then_sticky_band() {
    let (mut app, mut hw, mut sink) = make_app(FanConfig {
        actuation: ActuationKind::TwoStage,
        ..FanConfig::default()
    });
    assert_eq!(hw.last_level(), Some(ActuationLevel::Stage(FanStage::Stopped)));

    feed(&mut app, 333, 20); // T = 330
    ticks(&mut app, &mut hw, &mut sink, 35);
    assert_eq!(app.state(), StateId::Running);
    assert_eq!(hw.last_level(), Some(ActuationLevel::Stage(FanStage::Full)));

    feed(&mut app, 329, 20); // T = 326, inside the band
    ticks(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(hw.last_level(), Some(ActuationLevel::Stage(FanStage::Full)));

    feed(&mut app, 328, 20); // T = 325, below high - 2
    ticks(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(hw.last_level(), Some(ActuationLevel::Stage(FanStage::Half)));

    feed(&mut app, 330, 20); // T = 327, back in the band
    ticks(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(hw.last_level(), Some(ActuationLevel::Stage(FanStage::Half)));

    feed(&mut app, 200, 20);
    ticks(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(app.state(), StateId::Off);
    assert_eq!(hw.last_level(), Some(ActuationLevel::Stage(FanStage::Stopped)));
}

#[test]
fn two_stage_status_uses_fan_label() {
    let (mut app, mut hw, mut sink) = make_app(FanConfig {
        actuation: ActuationKind::TwoStage,
        ..FanConfig::default()
    });
    feed(&mut app, 301, 1);
    let report = (0..32)
        .filter_map(|_| app.on_tick(&mut hw, &mut sink))
        .last()
        .map(|s| s.status_line().as_str().to_owned());
    assert_eq!(report.as_deref(), Some("ADC:301 ADJ:298 T:25 FAN:100 ST:1"));
}
