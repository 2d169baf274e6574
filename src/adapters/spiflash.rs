//! External SPI NOR flash probe.
//!
//! Boot-time identity check only: read the JEDEC id and map the
//! manufacturer byte to a description. The host backend reports a
//! simulated Winbond part.

use crate::console::ports::SpiFlashPort;

#[cfg(not(target_os = "espidf"))]
pub struct SpiFlash {
    present: bool,
}

#[cfg(not(target_os = "espidf"))]
impl SpiFlash {
    pub fn new() -> Self {
        Self { present: true }
    }

    /// Simulate a board without the flash fitted.
    pub fn set_present(&mut self, present: bool) {
        self.present = present;
    }
}

#[cfg(not(target_os = "espidf"))]
impl SpiFlashPort for SpiFlash {
    fn probe(&mut self) -> bool {
        self.present
    }

    fn description(&self) -> &str {
        "W25Q32 4MiB (simulated)"
    }
}

#[cfg(target_os = "espidf")]
pub struct SpiFlash {
    spi: esp_idf_hal::spi::SpiDeviceDriver<'static, esp_idf_hal::spi::SpiDriver<'static>>,
    description: &'static str,
}

#[cfg(target_os = "espidf")]
impl SpiFlash {
    const CMD_JEDEC_ID: u8 = 0x9F;

    pub fn new(
        spi: esp_idf_hal::spi::SpiDeviceDriver<'static, esp_idf_hal::spi::SpiDriver<'static>>,
    ) -> Self {
        Self {
            spi,
            description: "",
        }
    }
}

#[cfg(target_os = "espidf")]
impl SpiFlashPort for SpiFlash {
    fn probe(&mut self) -> bool {
        let mut read = [0u8; 4];
        if self
            .spi
            .transfer(&mut read, &[Self::CMD_JEDEC_ID, 0, 0, 0])
            .is_err()
        {
            return false;
        }
        let manufacturer = read[1];
        self.description = match manufacturer {
            0xEF => "Winbond W25Q series",
            0xC2 => "Macronix MX25 series",
            0x20 => "Micron M25P series",
            0x1F => "Adesto AT25 series",
            0x00 | 0xFF => return false, // bus floating, nothing fitted
            _ => "unrecognized JEDEC id",
        };
        true
    }

    fn description(&self) -> &str {
        self.description
    }
}
