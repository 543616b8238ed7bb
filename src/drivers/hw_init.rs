//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC1 oneshot unit and the temperature channel using raw
//! ESP-IDF sys calls.  Called once from `main()` before the tasks start.
//! The fan outputs are owned by typed `esp-idf-hal` drivers instead.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::error::Error;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    AdcChannelFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::AdcChannelFailed(rc) => write!(f, "ADC1 channel config failed (rc={})", rc),
        }
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        match e {
            HwInitError::AdcInitFailed(_) => Error::Init("ADC1 unit"),
            HwInitError::AdcChannelFailed(_) => Error::Init("ADC1 temperature channel"),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the executor starts; single-threaded.
    unsafe {
        init_adc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the init path or the dispatcher's
/// conversion path.  `init_adc()` completes before the executor starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), pins::TEMP_ADC_CHANNEL, &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcChannelFailed(ret));
    }

    info!("hw_init: ADC1 configured (CH{}=temperature)", pins::TEMP_ADC_CHANNEL);
    Ok(())
}

/// One blocking 12-bit conversion.  A failed read yields zero, which the
/// controller treats like any other low reading.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract: written once in init_adc(), read from
    // the dispatcher task only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        log::warn!("hw_init: ADC1 read failed (rc={})", ret);
        return 0;
    }
    raw.max(0) as u16
}
