//! RadioMote firmware — main entry point.
//!
//! One cooperative foreground loop plus one receive interrupt:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  Rfm69        Tmp102        SpiFlash      WakeClock          │
//! │  (RadioPort)  (TempSensor)  (SpiFlash)    (ClockPort)        │
//! │  BlockStore   Ticker        Transcript / reader              │
//! │  (ParamStore) (PowerPort)   (UART)                           │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │            Shell (console core)                      │    │
//! │  │  ring · line · tokenize · dispatch · power mode      │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use core::fmt::Write;

use anyhow::Result;
use log::info;

use radiomote::adapters::rfm69::Rfm69;
use radiomote::adapters::rtc::WakeClock;
use radiomote::adapters::serial::{self, Transcript};
use radiomote::adapters::spiflash::SpiFlash;
use radiomote::adapters::tick::Ticker;
use radiomote::adapters::tmp102::Tmp102;
use radiomote::config;
use radiomote::console::ports::{ParamStore, SpiFlashPort, TempSensorPort};
use radiomote::console::{hexdump, Flow, LineAssembler, LineStatus, RxRing, Shell};
use radiomote::drivers::status_led::{blink_halt, StatusLed};
use radiomote::power::PowerModeController;
use radiomote::store::BlockStore;

/// Receive ring shared between the reader and the foreground loop. Small
/// on purpose: a human types far slower than the loop drains.
static RX_RING: RxRing<32> = RxRing::new();

fn main() -> Result<()> {
    // ── 1. Target bootstrap ───────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    // ── 2. Board peripherals ──────────────────────────────────
    #[cfg(not(target_os = "espidf"))]
    let (led_pin, radio, mut temp, mut flash) = (
        radiomote::drivers::status_led::SimLed::new(),
        Rfm69::new(true),
        Tmp102::new(),
        SpiFlash::new(),
    );

    #[cfg(target_os = "espidf")]
    let (led_pin, radio, mut temp, mut flash) = {
        use esp_idf_hal::gpio::PinDriver;
        use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
        use esp_idf_hal::peripherals::Peripherals;
        use esp_idf_hal::prelude::*;
        use esp_idf_hal::spi::config::Config as SpiConfig;
        use esp_idf_hal::spi::{SpiDeviceDriver, SpiDriverConfig};

        let p = Peripherals::take()?;
        let led_pin = PinDriver::output(p.pins.gpio2.downgrade_output())?;
        let radio_reset = PinDriver::output(p.pins.gpio4.downgrade_output())?;
        let radio_spi = SpiDeviceDriver::new_single(
            p.spi2,
            p.pins.gpio6,        // sclk
            p.pins.gpio7,        // mosi
            Some(p.pins.gpio8),  // miso
            Some(p.pins.gpio10), // cs
            &SpiDriverConfig::new(),
            &SpiConfig::new().baudrate(4.MHz().into()),
        )?;
        let flash_spi = SpiDeviceDriver::new_single(
            p.spi3,
            p.pins.gpio12,
            p.pins.gpio11,
            Some(p.pins.gpio13),
            Some(p.pins.gpio14),
            &SpiDriverConfig::new(),
            &SpiConfig::new().baudrate(10.MHz().into()),
        )?;
        let i2c = I2cDriver::new(
            p.i2c0,
            p.pins.gpio17,
            p.pins.gpio18,
            &I2cConfig::new().baudrate(100.kHz().into()),
        )?;
        let alert = PinDriver::input(p.pins.gpio5.downgrade())?;
        (
            led_pin,
            Rfm69::new(radio_spi, radio_reset),
            Tmp102::new(i2c, alert),
            SpiFlash::new(flash_spi),
        )
    };

    let mut led = StatusLed::new(led_pin);
    let mut out = Transcript;

    // ── 3. Parameter store ────────────────────────────────────
    // The simulation boots formatted; the target restores its flash
    // image and must find a valid header.
    #[cfg(not(target_os = "espidf"))]
    let mut store = BlockStore::new_formatted();
    #[cfg(target_os = "espidf")]
    let mut store = BlockStore::new();

    if let Err(e) = store.init() {
        let _ = writeln!(out, "Error: parameter store init failed! ({})", e);
        for (i, block) in store.raw_blocks().iter().enumerate() {
            let _ = writeln!(out, "Past block {}:", i);
            hexdump::dump(&mut out, block.origin, &block.bytes[..64]);
        }
        blink_halt(&mut led, 3);
    }

    // ── 4. Configuration + services ───────────────────────────
    let cfg = config::load(&store);
    serial::apply_baud(cfg.uart_baud);
    serial::spawn_reader(&RX_RING);

    let clock = WakeClock::new(cfg.rtc_wakeup_secs);
    let mut ticker = Ticker::new(cfg.tick_interval_ms);
    ticker.start();

    // ── 5. Banner ─────────────────────────────────────────────
    let _ = writeln!(out, "\n\nWelcome to the RadioMote console");
    if flash.probe() {
        let _ = writeln!(out, "Found SPI flash {}", flash.description());
    } else {
        let _ = writeln!(out, "No SPI flash found");
    }
    if temp.init().is_ok() {
        if let Ok(mc) = temp.read_millicelsius() {
            let _ = writeln!(
                out,
                "Temperature is {}.{}°C",
                mc / 1000,
                (mc % 1000).abs() / 100
            );
        }
    }
    let _ = writeln!(out, "Try 'help <return>' for, well, help.");
    let _ = write!(out, "% ");
    info!("console ready");

    // ── 6. Foreground loop ────────────────────────────────────
    let mut shell = Shell::new(store, radio, temp, clock, PowerModeController::new(ticker));
    let mut assembler = LineAssembler::new();

    loop {
        let mut serviced = false;
        while let Some(byte) = RX_RING.get() {
            serviced = true;
            if assembler.feed(byte, &mut out) == LineStatus::Complete {
                if !assembler.is_empty()
                    && shell.run_line(assembler.as_str(), &mut out) == Flow::Halt
                {
                    blink_halt(&mut led, 2);
                }
                assembler.clear();
                let _ = write!(out, "% ");
            }
        }
        if !serviced {
            shell.idle_poll(&mut out);
            // Pace the active-mode poll: the host has no interrupt to
            // park on, and on target the yield lets the idle task feed
            // the watchdog.
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
    }
}
