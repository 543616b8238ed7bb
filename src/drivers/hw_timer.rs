//! Control tick timer using ESP-IDF's esp_timer API.
//!
//! A periodic timer raises [`EventBus::signal_tick`](crate::events::EventBus::signal_tick)
//! on the shared bus every control period.  The callback executes in the
//! ESP timer task context (not ISR) and does nothing else.
//!
//! On simulation targets no timer exists; tests raise ticks directly.

use embassy_time::Duration;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use crate::events::BUS;

#[cfg(target_os = "espidf")]
static mut TICK_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: TICK_TIMER is written once in `start_tick_timer()` before any
/// timer callback fires.  Only called from the main task.
#[cfg(target_os = "espidf")]
unsafe fn tick_timer() -> esp_timer_handle_t {
    unsafe { TICK_TIMER }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(_arg: *mut core::ffi::c_void) {
    BUS.signal_tick();
}

/// Start the periodic control tick.
#[cfg(target_os = "espidf")]
pub fn start_tick_timer(period: Duration) -> Result<(), crate::error::Error> {
    // SAFETY: TICK_TIMER is written here once at boot from the main task,
    // before the callback can fire.  The callback only touches the bus.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"fan_tick".as_ptr(),
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&args, &raw mut TICK_TIMER);
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer create failed (rc={})", ret);
            return Err(crate::error::Error::Init("tick timer create"));
        }
        let ret = esp_timer_start_periodic(tick_timer(), period.as_micros());
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer start failed (rc={})", ret);
            return Err(crate::error::Error::Init("tick timer start"));
        }
    }
    log::info!("hw_timer: control tick every {} ms", period.as_millis());
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn start_tick_timer(period: Duration) -> Result<(), crate::error::Error> {
    log::info!(
        "hw_timer(sim): {} ms tick not started (ticks driven by caller)",
        period.as_millis()
    );
    Ok(())
}
