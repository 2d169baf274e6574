//! RFM69CW transceiver adapter.
//!
//! On ESP-IDF this is a register-level SPI driver for the SX1231-based
//! RFM69CW module (PA0 output stage, −18…+13 dBm). The host backend is a
//! stateful simulation that records configuration and transmitted frames
//! so the full console runs off-target.

use crate::console::ports::{Delivery, RadioError, RadioPort};

/// Link-layer frame payload limit (66-byte FIFO minus framing).
pub const MAX_PAYLOAD: usize = 61;

// ───────────────────────────────────────────────────────────────
// Host simulation backend
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub struct Rfm69 {
    present: bool,
    awake: bool,
    power_dbm: u8,
    csma: bool,
    auto_rssi: bool,
    aes_key: Option<[u8; 16]>,
    node_id: u8,
    network_id: u8,
    sent: Vec<(u8, Vec<u8>)>,
}

#[cfg(not(target_os = "espidf"))]
impl Rfm69 {
    pub fn new(present: bool) -> Self {
        Self {
            present,
            awake: false,
            power_dbm: 0,
            csma: false,
            auto_rssi: false,
            aes_key: None,
            node_id: 0,
            network_id: 0,
            sent: Vec::new(),
        }
    }

    pub fn node_id(&self) -> u8 {
        self.node_id
    }

    pub fn network_id(&self) -> u8 {
        self.network_id
    }

    pub fn power_dbm(&self) -> u8 {
        self.power_dbm
    }

    pub fn aes_key(&self) -> Option<[u8; 16]> {
        self.aes_key
    }

    pub fn csma(&self) -> bool {
        self.csma
    }

    pub fn auto_rssi(&self) -> bool {
        self.auto_rssi
    }

    pub fn awake(&self) -> bool {
        self.awake
    }

    /// Frames "transmitted" so far, as `(dest, payload)` pairs.
    pub fn sent(&self) -> &[(u8, Vec<u8>)] {
        &self.sent
    }
}

#[cfg(not(target_os = "espidf"))]
impl RadioPort for Rfm69 {
    fn reset(&mut self) {
        self.awake = false;
    }

    fn init(&mut self) -> Result<(), RadioError> {
        if self.present {
            self.awake = true;
            Ok(())
        } else {
            Err(RadioError::NotFound)
        }
    }

    fn sleep(&mut self) {
        self.awake = false;
    }

    fn set_power_dbm(&mut self, dbm: u8) {
        self.power_dbm = dbm;
    }

    fn set_csma(&mut self, on: bool) {
        self.csma = on;
    }

    fn set_auto_rssi(&mut self, on: bool) {
        self.auto_rssi = on;
    }

    fn set_aes_key(&mut self, key: &[u8; 16]) {
        self.aes_key = Some(*key);
    }

    fn set_node_id(&mut self, id: u8) {
        self.node_id = id;
    }

    fn set_network_id(&mut self, id: u8) {
        self.network_id = id;
    }

    fn send_frame(&mut self, dest: u8, payload: &[u8]) -> Result<Delivery, RadioError> {
        if !self.present {
            return Err(RadioError::NotFound);
        }
        if payload.len() > MAX_PAYLOAD {
            return Err(RadioError::Oversize);
        }
        self.sent.push((dest, payload.to_vec()));
        Ok(Delivery {
            status: 1,
            rssi: -42,
        })
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF backend
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod regs {
    pub const FIFO: u8 = 0x00;
    pub const OPMODE: u8 = 0x01;
    pub const PALEVEL: u8 = 0x11;
    pub const VERSION: u8 = 0x10;
    pub const RSSIVALUE: u8 = 0x24;
    pub const IRQFLAGS1: u8 = 0x27;
    pub const IRQFLAGS2: u8 = 0x28;
    pub const SYNCVALUE2: u8 = 0x30;
    pub const PACKETCONFIG2: u8 = 0x3D;
    pub const NODEADRS: u8 = 0x39;
    pub const AESKEY1: u8 = 0x3E;

    pub const VERSION_RFM69: u8 = 0x24;
    pub const MODE_SLEEP: u8 = 0x00;
    pub const MODE_STANDBY: u8 = 0x04;
    pub const MODE_TX: u8 = 0x0C;
    pub const IRQ1_MODE_READY: u8 = 0x80;
    pub const IRQ2_PACKET_SENT: u8 = 0x08;
    pub const PACKET2_AES_ON: u8 = 0x01;
    pub const PA0_ON: u8 = 0x80;
}

#[cfg(target_os = "espidf")]
pub struct Rfm69 {
    spi: esp_idf_hal::spi::SpiDeviceDriver<'static, esp_idf_hal::spi::SpiDriver<'static>>,
    reset: esp_idf_hal::gpio::PinDriver<'static, esp_idf_hal::gpio::AnyOutputPin,
        esp_idf_hal::gpio::Output>,
    csma: bool,
}

#[cfg(target_os = "espidf")]
impl Rfm69 {
    pub fn new(
        spi: esp_idf_hal::spi::SpiDeviceDriver<'static, esp_idf_hal::spi::SpiDriver<'static>>,
        reset: esp_idf_hal::gpio::PinDriver<'static, esp_idf_hal::gpio::AnyOutputPin,
            esp_idf_hal::gpio::Output>,
    ) -> Self {
        Self {
            spi,
            reset,
            csma: false,
        }
    }

    fn write_reg(&mut self, reg: u8, value: u8) {
        let mut read = [0u8; 2];
        if self.spi.transfer(&mut read, &[reg | 0x80, value]).is_err() {
            log::warn!("rfm69 write 0x{:02x} failed", reg);
        }
    }

    fn read_reg(&mut self, reg: u8) -> u8 {
        let mut read = [0u8; 2];
        if self.spi.transfer(&mut read, &[reg & 0x7F, 0]).is_err() {
            log::warn!("rfm69 read 0x{:02x} failed", reg);
        }
        read[1]
    }

    fn set_mode(&mut self, mode: u8) {
        self.write_reg(regs::OPMODE, mode);
    }

    fn wait_mode_ready(&mut self) -> Result<(), RadioError> {
        for _ in 0..100 {
            if self.read_reg(regs::IRQFLAGS1) & regs::IRQ1_MODE_READY != 0 {
                return Ok(());
            }
            crate::drivers::delay_ms(1);
        }
        Err(RadioError::Bus)
    }
}

#[cfg(target_os = "espidf")]
impl RadioPort for Rfm69 {
    fn reset(&mut self) {
        let _ = self.reset.set_high();
        crate::drivers::delay_ms(1);
        let _ = self.reset.set_low();
        crate::drivers::delay_ms(5);
    }

    fn init(&mut self) -> Result<(), RadioError> {
        if self.read_reg(regs::VERSION) != regs::VERSION_RFM69 {
            return Err(RadioError::NotFound);
        }
        self.set_mode(regs::MODE_STANDBY);
        self.wait_mode_ready()
    }

    fn sleep(&mut self) {
        self.set_mode(regs::MODE_SLEEP);
    }

    fn set_power_dbm(&mut self, dbm: u8) {
        // PA0 covers −18…+13 dBm; the register holds dBm + 18.
        let level = dbm.min(13) + 18;
        self.write_reg(regs::PALEVEL, regs::PA0_ON | (level & 0x1F));
    }

    fn set_csma(&mut self, on: bool) {
        self.csma = on;
    }

    fn set_auto_rssi(&mut self, _on: bool) {
        // RSSI is sampled explicitly after each transmission below.
    }

    fn set_aes_key(&mut self, key: &[u8; 16]) {
        for (i, byte) in key.iter().enumerate() {
            self.write_reg(regs::AESKEY1 + i as u8, *byte);
        }
        let packet2 = self.read_reg(regs::PACKETCONFIG2);
        self.write_reg(regs::PACKETCONFIG2, packet2 | regs::PACKET2_AES_ON);
    }

    fn set_node_id(&mut self, id: u8) {
        self.write_reg(regs::NODEADRS, id);
    }

    fn set_network_id(&mut self, id: u8) {
        self.write_reg(regs::SYNCVALUE2, id);
    }

    fn send_frame(&mut self, dest: u8, payload: &[u8]) -> Result<Delivery, RadioError> {
        if payload.len() > MAX_PAYLOAD {
            return Err(RadioError::Oversize);
        }
        self.set_mode(regs::MODE_STANDBY);
        self.wait_mode_ready()?;

        if self.csma {
            // Crude channel-clear wait: give a busy channel time to drain.
            for _ in 0..10 {
                if (-(i16::from(self.read_reg(regs::RSSIVALUE)) / 2)) < -90 {
                    break;
                }
                crate::drivers::delay_ms(1);
            }
        }

        // length byte counts the address byte plus the payload
        self.write_reg(regs::FIFO, payload.len() as u8 + 1);
        self.write_reg(regs::FIFO, dest);
        for byte in payload {
            self.write_reg(regs::FIFO, *byte);
        }

        self.set_mode(regs::MODE_TX);
        let mut sent = false;
        for _ in 0..100 {
            if self.read_reg(regs::IRQFLAGS2) & regs::IRQ2_PACKET_SENT != 0 {
                sent = true;
                break;
            }
            crate::drivers::delay_ms(1);
        }
        let rssi = -(i16::from(self.read_reg(regs::RSSIVALUE)) / 2);
        self.set_mode(regs::MODE_STANDBY);

        if sent {
            Ok(Delivery { status: 1, rssi })
        } else {
            Err(RadioError::NoAck)
        }
    }
}
