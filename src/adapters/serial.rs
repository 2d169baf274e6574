//! Console serial transport.
//!
//! The transcript goes through stdout, which the target runtime routes to
//! the console UART. The receive path is a detached reader pushing every
//! byte into the shared ring: on the target the UART driver services RX
//! on its own task, which is the producer side of the SPSC contract; the
//! host uses a stdin thread the same way.

use std::io::{Read, Write as _};

use crate::console::ring::RxRing;

/// Transcript sink for everything the operator sees.
///
/// Flushes on every write so prompts and echoes appear immediately.
pub struct Transcript;

impl core::fmt::Write for Transcript {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let mut stdout = std::io::stdout();
        stdout.write_all(s.as_bytes()).map_err(|_| core::fmt::Error)?;
        stdout.flush().map_err(|_| core::fmt::Error)
    }
}

/// Start the receive reader feeding `ring`.
///
/// Unlike a true ISR the reader may back-pressure instead of dropping, so
/// pasted input survives even a tiny ring.
pub fn spawn_reader<const N: usize>(ring: &'static RxRing<N>) {
    // detached: the reader lives for the rest of the process
    let _ = std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut handle = stdin.lock();
        let mut byte = [0u8; 1];
        loop {
            match handle.read(&mut byte) {
                Ok(0) | Err(_) => break, // console input closed
                Ok(_) => {
                    while !ring.put(byte[0]) {
                        std::thread::sleep(std::time::Duration::from_millis(1));
                    }
                }
            }
        }
        log::info!("console reader stopped");
    });
}

/// Apply the configured baud rate to the console UART.
#[cfg(target_os = "espidf")]
pub fn apply_baud(baud: u32) {
    use esp_idf_svc::sys::{uart_set_baudrate, ESP_OK};
    // SAFETY: UART0 is the console port set up by the runtime; changing
    // its baud rate is an atomic driver call.
    let ret = unsafe { uart_set_baudrate(0, baud) };
    if ret != ESP_OK {
        log::warn!("uart_set_baudrate({}) failed: {}", baud, ret);
    }
}

/// Host builds keep whatever the terminal uses.
#[cfg(not(target_os = "espidf"))]
pub fn apply_baud(baud: u32) {
    log::debug!("simulated console, baud {} ignored", baud);
}
