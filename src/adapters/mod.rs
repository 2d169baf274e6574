//! Peripheral adapters.
//!
//! Each adapter implements one console port. On the target the real bus
//! drivers live behind `#[cfg(target_os = "espidf")]`; host builds get a
//! simulation backend with the same type name, so `main` and the tests
//! construct them identically.

pub mod rfm69;
pub mod rtc;
pub mod serial;
pub mod spiflash;
pub mod tick;
pub mod tmp102;
