//! TMP102 digital temperature sensor adapter.
//!
//! 12-bit reading, 0.0625 °C per LSB, alert comparator with programmable
//! low/high limits on registers 2 and 3.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: I2C at address 0x48 plus a GPIO for the alert pin.
//! On host/test: readings come from injection statics, mirroring the
//! simulation backends of the other sensors.

use crate::console::ports::{SensorError, TempSensorPort};

/// Fixed TMP102 bus address (ADD0 strapped low).
pub const TMP102_ADDR: u8 = 0x48;

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};

    pub static MILLICELSIUS: AtomicI32 = AtomicI32::new(23_500);
    pub static ALERT: AtomicBool = AtomicBool::new(false);
    pub static PRESENT: AtomicBool = AtomicBool::new(true);

    /// Inject the simulated temperature, in millidegrees Celsius.
    pub fn set_millicelsius(mc: i32) {
        MILLICELSIUS.store(mc, Ordering::Relaxed);
    }

    /// Inject the simulated alert pin level.
    pub fn set_alert(level: bool) {
        ALERT.store(level, Ordering::Relaxed);
    }

    /// Simulate an absent sensor.
    pub fn set_present(present: bool) {
        PRESENT.store(present, Ordering::Relaxed);
    }
}

#[cfg(not(target_os = "espidf"))]
pub use sim::{set_alert as sim_set_alert, set_millicelsius as sim_set_millicelsius,
    set_present as sim_set_present};

// ───────────────────────────────────────────────────────────────
// Host simulation backend
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub struct Tmp102 {
    limits: Option<(i16, i16)>,
}

#[cfg(not(target_os = "espidf"))]
impl Tmp102 {
    pub fn new() -> Self {
        Self { limits: None }
    }

    /// Last programmed alert window, if any.
    pub fn alert_limits(&self) -> Option<(i16, i16)> {
        self.limits
    }
}

#[cfg(not(target_os = "espidf"))]
impl TempSensorPort for Tmp102 {
    fn init(&mut self) -> Result<(), SensorError> {
        if sim::PRESENT.load(core::sync::atomic::Ordering::Relaxed) {
            Ok(())
        } else {
            Err(SensorError::Absent)
        }
    }

    fn read_millicelsius(&mut self) -> Result<i32, SensorError> {
        if !sim::PRESENT.load(core::sync::atomic::Ordering::Relaxed) {
            return Err(SensorError::Absent);
        }
        Ok(sim::MILLICELSIUS.load(core::sync::atomic::Ordering::Relaxed))
    }

    fn alert_pin_level(&self) -> bool {
        sim::ALERT.load(core::sync::atomic::Ordering::Relaxed)
    }

    fn set_alert_limits(&mut self, low_c: i16, high_c: i16) -> Result<(), SensorError> {
        if !sim::PRESENT.load(core::sync::atomic::Ordering::Relaxed) {
            return Err(SensorError::Absent);
        }
        self.limits = Some((low_c, high_c));
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF backend
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct Tmp102 {
    i2c: esp_idf_hal::i2c::I2cDriver<'static>,
    alert: esp_idf_hal::gpio::PinDriver<'static, esp_idf_hal::gpio::AnyIOPin,
        esp_idf_hal::gpio::Input>,
}

#[cfg(target_os = "espidf")]
impl Tmp102 {
    const REG_TEMPERATURE: u8 = 0x00;
    const REG_CONFIG: u8 = 0x01;
    const REG_T_LOW: u8 = 0x02;
    const REG_T_HIGH: u8 = 0x03;

    pub fn new(
        i2c: esp_idf_hal::i2c::I2cDriver<'static>,
        alert: esp_idf_hal::gpio::PinDriver<'static, esp_idf_hal::gpio::AnyIOPin,
            esp_idf_hal::gpio::Input>,
    ) -> Self {
        Self { i2c, alert }
    }

    fn read_reg(&mut self, reg: u8) -> Result<[u8; 2], SensorError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(TMP102_ADDR, &[reg], &mut buf, esp_idf_hal::delay::BLOCK)
            .map_err(|_| SensorError::Bus)?;
        Ok(buf)
    }

    fn write_reg(&mut self, reg: u8, value: [u8; 2]) -> Result<(), SensorError> {
        self.i2c
            .write(TMP102_ADDR, &[reg, value[0], value[1]], esp_idf_hal::delay::BLOCK)
            .map_err(|_| SensorError::Bus)
    }

    /// Whole degrees to the 12-bit register layout (1 LSB = 0.0625 °C).
    fn degrees_to_reg(c: i16) -> [u8; 2] {
        let raw = i32::from(c) * 16;
        [(raw >> 4) as u8, ((raw << 4) & 0xF0) as u8]
    }
}

#[cfg(target_os = "espidf")]
impl TempSensorPort for Tmp102 {
    fn init(&mut self) -> Result<(), SensorError> {
        self.read_reg(Self::REG_CONFIG)
            .map(|_| ())
            .map_err(|_| SensorError::Absent)
    }

    fn read_millicelsius(&mut self) -> Result<i32, SensorError> {
        let raw = self.read_reg(Self::REG_TEMPERATURE)?;
        let mut value = (i32::from(raw[0]) << 4) | (i32::from(raw[1]) >> 4);
        if value & 0x800 != 0 {
            value -= 4096; // 12-bit two's complement
        }
        Ok(value * 625 / 10)
    }

    fn alert_pin_level(&self) -> bool {
        self.alert.is_high()
    }

    fn set_alert_limits(&mut self, low_c: i16, high_c: i16) -> Result<(), SensorError> {
        self.write_reg(Self::REG_T_LOW, Self::degrees_to_reg(low_c))?;
        self.write_reg(Self::REG_T_HIGH, Self::degrees_to_reg(high_c))
    }
}
