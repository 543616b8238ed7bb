//! fanctl firmware: main entry point.
//!
//! Hexagonal architecture with event-driven execution.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter<PwmFan | TwoStageFan>   LogEventSink  Watchdog│
//! │  (Analog + Actuator)                     (EventSink)   (WDT)   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Sampler · FSM · ActuationPolicy · ReportScheduler     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  esp_timer ──▶ EventBus ◀── ADC       LocalExecutor: 2 tasks   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use edge_executor::LocalExecutor;
use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::info;

use fanctl::adapters::hardware::HardwareAdapter;
use fanctl::adapters::log_sink::LogEventSink;
use fanctl::app::ports::ActuatorPort;
use fanctl::app::service::{AppService, idle_loop};
use fanctl::config::{ActuationKind, FanConfig};
use fanctl::drivers::watchdog::Watchdog;
use fanctl::drivers::{PwmFan, TwoStageFan, hw_init, hw_timer};
use fanctl::events::BUS;
use fanctl::pins;
use fanctl::sensors::TemperatureAdc;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  fanctl v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (build-time constants) ───────────────
    let config = FanConfig::default();
    config.validate()?;

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals().map_err(fanctl::error::Error::from)?;
    let peripherals = Peripherals::take()?;
    let adc = TemperatureAdc::new(pins::TEMP_ADC_CHANNEL);
    let watchdog = Watchdog::new(config.watchdog_timeout_ms);

    // ── 4. Fan output variant ─────────────────────────────────
    match config.actuation {
        ActuationKind::LinearDuty => {
            let timer = LedcTimerDriver::new(
                peripherals.ledc.timer0,
                &TimerConfig::default()
                    .frequency(Hertz(pins::FAN_PWM_FREQ_HZ))
                    .resolution(Resolution::Bits8),
            )?;
            let channel = LedcDriver::new(peripherals.ledc.channel0, &timer, peripherals.pins.gpio1)?;
            info!(
                "Fan output: PWM on GPIO{} @ {} Hz",
                pins::FAN_PWM_GPIO,
                pins::FAN_PWM_FREQ_HZ
            );
            run(config, HardwareAdapter::new(adc, PwmFan::new(channel), &BUS), &watchdog)
        }
        ActuationKind::TwoStage => {
            let half = PinDriver::output(peripherals.pins.gpio2)?;
            let full = PinDriver::output(peripherals.pins.gpio3)?;
            info!(
                "Fan output: two-stage on GPIO{} (half) / GPIO{} (full)",
                pins::FAN_HALF_GPIO,
                pins::FAN_FULL_GPIO
            );
            run(
                config,
                HardwareAdapter::new(adc, TwoStageFan::new(half, full), &BUS),
                &watchdog,
            )
        }
    }
}

/// Start the service, the tick timer and both tasks.  Only returns on a
/// bring-up error.
fn run<F: ActuatorPort>(
    config: FanConfig,
    mut hw: HardwareAdapter<'_, F>,
    watchdog: &Watchdog,
) -> Result<()> {
    let tick_period = config.tick_period();
    let mut app = AppService::new(config);
    let mut dispatch_sink = LogEventSink::new();
    let mut report_sink = LogEventSink::new();

    app.start(&mut hw, &mut dispatch_sink);
    hw_timer::start_tick_timer(tick_period)?;

    let executor: LocalExecutor<'_, 4> = LocalExecutor::new();
    executor
        .spawn(app.run(&BUS, &mut hw, &mut dispatch_sink))
        .detach();
    executor
        .spawn(idle_loop(&BUS, &mut report_sink, watchdog))
        .detach();

    info!("System ready. Entering event loop.");
    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
    Ok(())
}
