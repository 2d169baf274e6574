//! Recording mock ports for integration tests.
//!
//! Every mock counts its calls so tests can assert on the full port
//! history without real peripherals.

use std::collections::HashMap;

use radiomote::console::ports::{
    ClockPort, Delivery, ParamStore, RadioError, RadioPort, RawBlock, SensorError, StoreError,
    TempSensorPort, TimeOfDay, UnitId,
};
use radiomote::console::{Flow, Shell};
use radiomote::power::{PowerModeController, PowerPort};

// ── MockStore ─────────────────────────────────────────────────

pub struct MockStore {
    pub units: HashMap<UnitId, Vec<u8>>,
    pub blocks: [[u8; 64]; 2],
    pub write_calls: usize,
    pub erase_calls: usize,
    pub format_calls: usize,
    pub fail_writes: bool,
}

impl Default for MockStore {
    fn default() -> Self {
        Self {
            units: HashMap::new(),
            blocks: [[0u8; 64]; 2],
            write_calls: 0,
            erase_calls: 0,
            format_calls: 0,
            fail_writes: false,
        }
    }
}

impl ParamStore for MockStore {
    fn format(&mut self) -> Result<(), StoreError> {
        self.format_calls += 1;
        self.units.clear();
        Ok(())
    }

    fn init(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn read_unit(&self, id: UnitId, buf: &mut [u8]) -> Result<usize, StoreError> {
        let data = self.units.get(&id).ok_or(StoreError::NotFound)?;
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        Ok(n)
    }

    fn write_unit(&mut self, id: UnitId, data: &[u8]) -> Result<(), StoreError> {
        self.write_calls += 1;
        if self.fail_writes {
            return Err(StoreError::WriteFailed);
        }
        self.units.insert(id, data.to_vec());
        Ok(())
    }

    fn erase_unit(&mut self, id: UnitId) -> Result<(), StoreError> {
        self.erase_calls += 1;
        self.units.remove(&id);
        Ok(())
    }

    fn raw_blocks(&self) -> [RawBlock<'_>; 2] {
        [
            RawBlock {
                origin: 0x1000,
                bytes: &self.blocks[0],
            },
            RawBlock {
                origin: 0x1040,
                bytes: &self.blocks[1],
            },
        ]
    }
}

// ── MockRadio ─────────────────────────────────────────────────

pub struct MockRadio {
    pub present: bool,
    pub fail_send: bool,
    pub resets: usize,
    pub init_calls: usize,
    pub sleeps: usize,
    pub power_dbm: u8,
    pub csma: bool,
    pub auto_rssi: bool,
    pub aes_key: Option<[u8; 16]>,
    pub node_id: u8,
    pub network_id: u8,
    pub sent: Vec<(u8, Vec<u8>)>,
}

impl Default for MockRadio {
    fn default() -> Self {
        Self {
            present: true,
            fail_send: false,
            resets: 0,
            init_calls: 0,
            sleeps: 0,
            power_dbm: 0,
            csma: false,
            auto_rssi: false,
            aes_key: None,
            node_id: 0,
            network_id: 0,
            sent: Vec::new(),
        }
    }
}

impl RadioPort for MockRadio {
    fn reset(&mut self) {
        self.resets += 1;
    }

    fn init(&mut self) -> Result<(), RadioError> {
        self.init_calls += 1;
        if self.present {
            Ok(())
        } else {
            Err(RadioError::NotFound)
        }
    }

    fn sleep(&mut self) {
        self.sleeps += 1;
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
        if self.fail_send {
            return Err(RadioError::NoAck);
        }
        self.sent.push((dest, payload.to_vec()));
        Ok(Delivery {
            status: 2,
            rssi: -61,
        })
    }
}

// ── MockTemp ──────────────────────────────────────────────────

pub struct MockTemp {
    pub present: bool,
    pub millicelsius: i32,
    pub alert: bool,
    pub limits: Option<(i16, i16)>,
    pub read_calls: usize,
}

impl Default for MockTemp {
    fn default() -> Self {
        Self {
            present: true,
            millicelsius: 23_500,
            alert: false,
            limits: None,
            read_calls: 0,
        }
    }
}

impl TempSensorPort for MockTemp {
    fn init(&mut self) -> Result<(), SensorError> {
        if self.present {
            Ok(())
        } else {
            Err(SensorError::Absent)
        }
    }

    fn read_millicelsius(&mut self) -> Result<i32, SensorError> {
        self.read_calls += 1;
        if self.present {
            Ok(self.millicelsius)
        } else {
            Err(SensorError::Absent)
        }
    }

    fn alert_pin_level(&self) -> bool {
        self.alert
    }

    fn set_alert_limits(&mut self, low_c: i16, high_c: i16) -> Result<(), SensorError> {
        self.limits = Some((low_c, high_c));
        Ok(())
    }
}

// ── MockClock / MockPower ─────────────────────────────────────

pub struct MockClock {
    pub tod: TimeOfDay,
    pub wakes: u32,
}

impl Default for MockClock {
    fn default() -> Self {
        Self {
            tod: TimeOfDay {
                hours: 12,
                minutes: 34,
                seconds: 56,
            },
            wakes: 99,
        }
    }
}

impl ClockPort for MockClock {
    fn time_of_day(&self) -> TimeOfDay {
        self.tod
    }

    fn wakeup_count(&self) -> u32 {
        self.wakes
    }
}

#[derive(Default)]
pub struct MockPower {
    pub starts: usize,
    pub stops: usize,
    pub waits: usize,
}

impl PowerPort for MockPower {
    fn tick_start(&mut self) {
        self.starts += 1;
    }

    fn tick_stop(&mut self) {
        self.stops += 1;
    }

    fn wait_for_interrupt(&mut self) {
        self.waits += 1;
    }
}

// ── Harness ───────────────────────────────────────────────────

pub type TestShell = Shell<MockStore, MockRadio, MockTemp, MockClock, MockPower>;

/// Shell over default mocks.
pub fn shell() -> TestShell {
    shell_with(
        MockStore::default(),
        MockRadio::default(),
        MockTemp::default(),
    )
}

/// Shell over caller-prepared mocks.
pub fn shell_with(store: MockStore, radio: MockRadio, temp: MockTemp) -> TestShell {
    Shell::new(
        store,
        radio,
        temp,
        MockClock::default(),
        PowerModeController::new(MockPower::default()),
    )
}

/// Run one line and capture the transcript.
pub fn run(shell: &mut TestShell, line: &str) -> (Flow, String) {
    let mut out = String::new();
    let flow = shell.run_line(line, &mut out);
    (flow, out)
}
