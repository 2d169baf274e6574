//! System configuration parameters.
//!
//! Tunables that survive reboot. The blob lives in the parameter store
//! (unit [`units::SYSTEM_CONFIG`]) as postcard; absent or undecodable
//! blobs fall back to defaults so a blank device always boots.

use serde::{Deserialize, Serialize};

use crate::console::ports::{units, ParamStore, StoreError};

/// Core system configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Console UART baud rate.
    pub uart_baud: u32,
    /// Periodic tick service interval (milliseconds).
    pub tick_interval_ms: u32,
    /// Wakeup clock period (seconds).
    pub rtc_wakeup_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            uart_baud: 115_200,
            tick_interval_ms: 1000, // 1 Hz heartbeat
            rtc_wakeup_secs: 1,
        }
    }
}

impl SystemConfig {
    /// Range-check every field. Rejected configs are never persisted.
    pub fn validate(&self) -> Result<(), &'static str> {
        const BAUDS: [u32; 5] = [9_600, 19_200, 38_400, 57_600, 115_200];
        if !BAUDS.contains(&self.uart_baud) {
            return Err("uart_baud must be a standard rate up to 115200");
        }
        if !(10..=60_000).contains(&self.tick_interval_ms) {
            return Err("tick_interval_ms must be 10–60000");
        }
        if !(1..=3600).contains(&self.rtc_wakeup_secs) {
            return Err("rtc_wakeup_secs must be 1–3600");
        }
        Ok(())
    }
}

/// Load the stored configuration, falling back to defaults when the unit
/// is absent or does not decode.
pub fn load(store: &impl ParamStore) -> SystemConfig {
    let mut buf = [0u8; 64];
    match store.read_unit(units::SYSTEM_CONFIG, &mut buf) {
        Ok(len) => match postcard::from_bytes(&buf[..len]) {
            Ok(cfg) => {
                log::info!("configuration loaded from store");
                cfg
            }
            Err(_) => {
                log::warn!("stored configuration undecodable, using defaults");
                SystemConfig::default()
            }
        },
        Err(_) => {
            log::info!("no stored configuration, using defaults");
            SystemConfig::default()
        }
    }
}

/// Validate and persist the configuration.
pub fn save(store: &mut impl ParamStore, cfg: &SystemConfig) -> Result<(), StoreError> {
    if let Err(reason) = cfg.validate() {
        log::warn!("configuration rejected: {}", reason);
        return Err(StoreError::WriteFailed);
    }
    let bytes = postcard::to_allocvec(cfg).map_err(|_| StoreError::WriteFailed)?;
    store.write_unit(units::SYSTEM_CONFIG, &bytes)
}
