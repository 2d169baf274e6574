//! Status LED and the terminal blink-halt loop.
//!
//! Generic over [`OutputPin`] so the target hands in a GPIO driver and
//! the host a recording pin.

use embedded_hal::digital::OutputPin;

use super::delay_ms;

pub struct StatusLed<L: OutputPin> {
    pin: L,
}

impl<L: OutputPin> StatusLed<L> {
    pub fn new(pin: L) -> Self {
        Self { pin }
    }

    pub fn set(&mut self, on: bool) {
        // GPIO writes are infallible on every fitted pin driver
        let _ = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
    }
}

/// Terminal halt state: blink `blinks` times, pause, forever. No return
/// path — reached only from the halt command and fatal boot errors.
pub fn blink_halt<L: OutputPin>(led: &mut StatusLed<L>, blinks: u32) -> ! {
    delay_ms(1);
    loop {
        for _ in 0..blinks {
            led.set(true);
            delay_ms(100);
            led.set(false);
            delay_ms(100);
        }
        delay_ms(1000);
    }
}

/// Recording pin for host builds and tests.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct SimLed {
    pub lit: bool,
}

#[cfg(not(target_os = "espidf"))]
impl SimLed {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::digital::ErrorType for SimLed {
    type Error = core::convert::Infallible;
}

#[cfg(not(target_os = "espidf"))]
impl OutputPin for SimLed {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.lit = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.lit = true;
        Ok(())
    }
}
