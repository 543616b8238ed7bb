//! Task Watchdog Timer (TWDT) driver.
//!
//! Wraps the ESP-IDF TWDT API to reset the device if the idle loop stops
//! acknowledging it.  The idle loop feeds it once per status report, so the
//! timeout must exceed one report period.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::app::ports::WatchdogPort;

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
    #[cfg(not(target_os = "espidf"))]
    feeds: core::sync::atomic::AtomicU32,
}

impl Watchdog {
    /// Initialise and subscribe the current task to the TWDT.
    pub fn new(timeout_ms: u32) -> Self {
        #[cfg(target_os = "espidf")]
        {
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    log::warn!(
                        "TWDT reconfigure returned {} (may already be configured)",
                        ret
                    );
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK;
                if subscribed {
                    info!("Watchdog: subscribed ({} ms timeout, panic on trigger)", timeout_ms);
                } else {
                    log::warn!("Watchdog: failed to subscribe ({})", ret);
                }

                Self { subscribed }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("Watchdog(sim): {} ms, no-op", timeout_ms);
            Self {
                feeds: core::sync::atomic::AtomicU32::new(0),
            }
        }
    }

    /// Number of acknowledgements so far (host builds).
    #[cfg(not(target_os = "espidf"))]
    pub fn feeds(&self) -> u32 {
        self.feeds.load(core::sync::atomic::Ordering::Relaxed)
    }
}

impl WatchdogPort for Watchdog {
    fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            self.feeds
                .fetch_add(1, core::sync::atomic::Ordering::Relaxed);
        }
    }
}
