//! Small board drivers shared by the adapters and the halt paths.

pub mod status_led;

/// Blocking delay. On the target a sleeping task yields to FreeRTOS; host
/// builds sleep the thread.
pub fn delay_ms(ms: u32) {
    std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
}
