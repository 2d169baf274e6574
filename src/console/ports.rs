//! Port traits — the boundary between the console core and the peripherals
//! it drives.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Shell (console core)
//! ```
//!
//! Driven adapters (parameter store, radio, sensor, flash, clock) implement
//! these traits. The [`Shell`](super::shell::Shell) consumes them via
//! generics, so the console core never touches hardware directly.
//!
//! All port errors are typed — handlers must handle every variant
//! explicitly before the formatter renders them for the operator.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Parameter store port
// ───────────────────────────────────────────────────────────────

/// Identifier of one stored configuration record.
pub type UnitId = u8;

/// Well-known unit ids consumed by this firmware.
pub mod units {
    use super::UnitId;

    /// Radio node address.
    pub const RADIO_NODE_ID: UnitId = 1;
    /// Radio network id.
    pub const RADIO_NETWORK_ID: UnitId = 2;
    /// Gateway node address frames are routed to.
    pub const RADIO_GATEWAY_ID: UnitId = 3;
    /// Maximum transmit power in dBm.
    pub const RADIO_MAX_POWER: UnitId = 4;
    /// 16-byte AES frame key.
    pub const RADIO_AES_KEY: UnitId = 5;
    /// Postcard-encoded [`SystemConfig`](crate::config::SystemConfig).
    pub const SYSTEM_CONFIG: UnitId = 6;
}

/// A raw storage block exposed for diagnostics.
///
/// `origin` is the absolute address the block lives at, used only for
/// display; `bytes` bounds every access.
#[derive(Debug, Clone, Copy)]
pub struct RawBlock<'a> {
    pub origin: u32,
    pub bytes: &'a [u8],
}

/// Errors from [`ParamStore`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Neither storage block carries a valid header.
    Corrupt,
    /// No live record exists for the requested unit.
    NotFound,
    /// No room left for the record, even after compaction.
    Full,
    /// The backing medium rejected the write.
    WriteFailed,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupt => write!(f, "storage corrupt"),
            Self::NotFound => write!(f, "unit not found"),
            Self::Full => write!(f, "storage full"),
            Self::WriteFailed => write!(f, "write failed"),
        }
    }
}

/// Persistent key/value store holding numbered opaque units.
///
/// The console core never interprets unit contents beyond passing byte
/// slices through; layout and wear strategy belong to the implementation.
pub trait ParamStore {
    /// Reset the storage to empty (both blocks reformatted).
    fn format(&mut self) -> Result<(), StoreError>;

    /// Validate and open the storage. Fails with [`StoreError::Corrupt`]
    /// when no block carries a valid header.
    fn init(&mut self) -> Result<(), StoreError>;

    /// Copy the latest contents of `id` into `buf`; returns the unit length.
    fn read_unit(&self, id: UnitId, buf: &mut [u8]) -> Result<usize, StoreError>;

    /// Write (or supersede) the contents of `id`.
    fn write_unit(&mut self, id: UnitId, data: &[u8]) -> Result<(), StoreError>;

    /// Remove `id`. Erasing an absent unit is not an error.
    fn erase_unit(&mut self, id: UnitId) -> Result<(), StoreError>;

    /// Both raw storage blocks, for diagnostic dumps only.
    fn raw_blocks(&self) -> [RawBlock<'_>; 2];
}

// ───────────────────────────────────────────────────────────────
// Radio link port
// ───────────────────────────────────────────────────────────────

/// Errors from [`RadioPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    /// No transceiver answered on the bus.
    NotFound,
    /// The frame was sent but never acknowledged.
    NoAck,
    /// Payload exceeds the link-layer frame size.
    Oversize,
    /// SPI transaction failed.
    Bus,
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "no transceiver found"),
            Self::NoAck => write!(f, "no response"),
            Self::Oversize => write!(f, "payload too long"),
            Self::Bus => write!(f, "bus error"),
        }
    }
}

/// Delivery report for one transmitted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Link-layer status code (non-zero means delivered).
    pub status: u8,
    /// RSSI observed during the exchange, in dBm.
    pub rssi: i16,
}

/// Sub-GHz packet radio behind the SPI bus.
pub trait RadioPort {
    /// Pulse the hardware reset line.
    fn reset(&mut self);

    /// Probe and initialise the transceiver.
    fn init(&mut self) -> Result<(), RadioError>;

    /// Put the transceiver into its lowest-power mode.
    fn sleep(&mut self);

    /// Set the transmit power in dBm.
    fn set_power_dbm(&mut self, dbm: u8);

    /// Enable or disable channel-clear assessment before transmit.
    fn set_csma(&mut self, on: bool);

    /// Latch RSSI automatically on every received frame.
    fn set_auto_rssi(&mut self, on: bool);

    /// Install the 16-byte AES frame key.
    fn set_aes_key(&mut self, key: &[u8; 16]);

    /// Set this node's link-layer address.
    fn set_node_id(&mut self, id: u8);

    /// Set the network id frames are filtered on.
    fn set_network_id(&mut self, id: u8);

    /// Send one frame and wait for the delivery report.
    fn send_frame(&mut self, dest: u8, payload: &[u8]) -> Result<Delivery, RadioError>;
}

// ───────────────────────────────────────────────────────────────
// Temperature sensor port
// ───────────────────────────────────────────────────────────────

/// Errors from [`TempSensorPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The sensor did not answer on the bus.
    Absent,
    /// I2C transaction failed.
    Bus,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "sensor absent"),
            Self::Bus => write!(f, "bus error"),
        }
    }
}

/// Digital temperature sensor with an alert comparator.
pub trait TempSensorPort {
    /// Probe the sensor; fails with [`SensorError::Absent`] when missing.
    fn init(&mut self) -> Result<(), SensorError>;

    /// Current temperature in millidegrees Celsius (fixed point).
    fn read_millicelsius(&mut self) -> Result<i32, SensorError>;

    /// Level of the alert comparator output pin.
    fn alert_pin_level(&self) -> bool;

    /// Program the alert comparator window, in whole degrees Celsius.
    fn set_alert_limits(&mut self, low_c: i16, high_c: i16) -> Result<(), SensorError>;
}

// ───────────────────────────────────────────────────────────────
// SPI flash port
// ───────────────────────────────────────────────────────────────

/// External SPI NOR flash, probed at boot for its identity only.
pub trait SpiFlashPort {
    /// Whether a known flash chip answers the JEDEC id command.
    fn probe(&mut self) -> bool;

    /// Human-readable description of the probed chip.
    fn description(&self) -> &str;
}

// ───────────────────────────────────────────────────────────────
// Wakeup clock port
// ───────────────────────────────────────────────────────────────

/// Decoded time-of-day fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

/// Always-on clock providing time-of-day and the periodic-wakeup counter.
pub trait ClockPort {
    /// Current time of day.
    fn time_of_day(&self) -> TimeOfDay;

    /// Monotonic count of periodic wakeups since power-on.
    fn wakeup_count(&self) -> u32;
}
