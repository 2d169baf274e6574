//! Integration test driver for `tests/integration/`.
//!
//! Each `mod` below maps to a file that exercises the console against
//! mock ports. All tests run on the host with no real hardware.

mod dispatch_tests;
mod mock_ports;
mod scenario_tests;
