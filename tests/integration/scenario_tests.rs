//! Operator scenarios: storage round-trips, power transitions, radio
//! provisioning, halt, and collaborator failures.

use radiomote::console::ports::units;
use radiomote::console::Flow;
use radiomote::power::PowerMode;

use crate::mock_ports::{run, shell, shell_with, MockRadio, MockStore, MockTemp};

// ── Parameter store commands ──────────────────────────────────

#[test]
fn pastwrite_then_pastread_round_trips_with_terminator() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "pastwrite 5 hello");
    assert_eq!(out, "Wrote unit 5 (6 bytes)\n");

    let (_, out) = run(&mut sh, "pastread 5");
    assert!(out.starts_with("'hello' (6 bytes)\n"));
    // the dump shows the bytes of "hello" plus the NUL
    assert!(out.contains("68 65 6c 6c 6f 00"));
}

#[test]
fn pastread_missing_unit_reports_not_found_without_a_dump() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "pastread 9");
    assert_eq!(out, "Unit 9 not found\n");
}

#[test]
fn pasterase_removes_the_unit() {
    let mut sh = shell();
    let _ = run(&mut sh, "pastwrite 4 gone");
    let (_, out) = run(&mut sh, "pasterase 4");
    assert_eq!(out, "Erased unit 4\n");
    let (_, out) = run(&mut sh, "pastread 4");
    assert_eq!(out, "Unit 4 not found\n");
}

#[test]
fn pastformat_wipes_and_reopens() {
    let mut sh = shell();
    let _ = run(&mut sh, "pastwrite 1 data");
    let (_, out) = run(&mut sh, "pastformat");
    assert_eq!(out, "OK\n");
    assert_eq!(sh.store().format_calls, 1);
    let (_, out) = run(&mut sh, "pastread 1");
    assert_eq!(out, "Unit 1 not found\n");
}

#[test]
fn pastdump_dumps_both_blocks_at_their_origins() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "pastdump");
    assert!(out.contains("Past block 0:"));
    assert!(out.contains("Past block 1:"));
    assert!(out.contains("00001000"));
    assert!(out.contains("00001040"));
}

#[test]
fn pastdump_size_argument_limits_the_dump() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "pastdump 8");
    // 8 bytes per block: a single row each, range ...07
    assert!(out.contains("00001000...00001007:"));
    assert!(out.contains("00001040...00001047:"));
}

#[test]
fn pastdump_oversize_request_is_clamped_to_the_block() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "pastdump 100000");
    // mock blocks are 64 bytes; the dump must stop at their end
    assert!(out.contains("00001000...0000103f:"));
}

#[test]
fn store_write_failure_reaches_the_operator() {
    let store = MockStore {
        fail_writes: true,
        ..Default::default()
    };
    let mut sh = shell_with(store, MockRadio::default(), MockTemp::default());
    let (_, out) = run(&mut sh, "pastwrite 2 x");
    assert_eq!(out, "ERROR: store: write failed\n");
}

// ── Power mode ────────────────────────────────────────────────

#[test]
fn power_low_stops_the_tick_and_flips_the_mode() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "power low");
    assert_eq!(out, "OK\n");
    assert_eq!(sh.power_mode(), PowerMode::LowPower);
    assert_eq!(sh.power().port().stops, 1);
}

#[test]
fn power_normal_restarts_the_tick() {
    let mut sh = shell();
    let _ = run(&mut sh, "power low");
    let (_, out) = run(&mut sh, "power normal");
    assert_eq!(out, "OK\n");
    assert_eq!(sh.power_mode(), PowerMode::Active);
    assert_eq!(sh.power().port().starts, 1);
}

#[test]
fn power_sideways_is_rejected_and_mode_is_unchanged() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "power sideways");
    assert_eq!(out, "Error: illegal argument\n");
    assert_eq!(sh.power_mode(), PowerMode::Active);
    assert_eq!(sh.power().port().stops, 0);
}

#[test]
fn idle_poll_suspends_only_in_low_power() {
    let mut sh = shell();
    let mut out = String::new();
    sh.idle_poll(&mut out);
    assert!(out.is_empty());
    assert_eq!(sh.power().port().waits, 0);

    let _ = run(&mut sh, "power low");
    sh.idle_poll(&mut out);
    assert_eq!(out, ".");
    assert_eq!(sh.power().port().waits, 1);
}

// ── Halt ──────────────────────────────────────────────────────

#[test]
fn halt_echoes_every_token_and_enters_the_terminal_state() {
    let mut sh = shell();
    let (flow, out) = run(&mut sh, "halt one two");
    assert_eq!(flow, Flow::Halt);
    assert_eq!(out, "0 'halt'\n1 'one'\n2 'two'\nHalted\n");
}

#[test]
fn bare_halt_still_halts() {
    let mut sh = shell();
    let (flow, out) = run(&mut sh, "halt");
    assert_eq!(flow, Flow::Halt);
    assert_eq!(out, "0 'halt'\nHalted\n");
}

// ── Temperature ───────────────────────────────────────────────

#[test]
fn temp_prints_fixed_point_celsius() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "temp");
    assert_eq!(out, "23.5°C\n");
}

#[test]
fn temp_with_absent_sensor_reports_the_failure() {
    let temp = MockTemp {
        present: false,
        ..Default::default()
    };
    let mut sh = shell_with(MockStore::default(), MockRadio::default(), temp);
    let (_, out) = run(&mut sh, "temp");
    assert_eq!(out, "ERROR: sensor: sensor absent\n");
}

#[test]
fn tempalert_without_args_prints_the_pin_level() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "tempalert");
    assert_eq!(out, "0\n");

    let temp = MockTemp {
        alert: true,
        ..Default::default()
    };
    let mut sh = shell_with(MockStore::default(), MockRadio::default(), temp);
    let (_, out) = run(&mut sh, "tempalert");
    assert_eq!(out, "1\n");
}

#[test]
fn tempalert_with_two_args_programs_the_window() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "tempalert 10 60");
    assert_eq!(out, "low:10 high:60\n");
    assert_eq!(sh.temp().limits, Some((10, 60)));
}

#[test]
fn tempalert_with_one_arg_reports_usage() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "tempalert 40");
    assert_eq!(out, "Usage: tempalert [<low> <high>]\n");
    assert_eq!(sh.temp().limits, None);
}

#[test]
fn tempalert_rejects_an_inverted_window() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "tempalert 60 10");
    assert_eq!(out, "Error: low must not exceed high\n");
    assert_eq!(sh.temp().limits, None);
}

// ── Clock ─────────────────────────────────────────────────────

#[test]
fn rtc_prints_time_and_wake_counter() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "rtc");
    assert_eq!(out, "Time: 12:34:56\nRTC counter: 99\n");
}

// ── Radio ─────────────────────────────────────────────────────

#[test]
fn rfm_id_writes_the_node_unit_and_reports_success() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "rfm id 7");
    assert_eq!(out, "1:7\nOK\n");
    assert_eq!(
        sh.store().units.get(&units::RADIO_NODE_ID),
        Some(&7u32.to_le_bytes().to_vec())
    );
}

#[test]
fn bare_rfm_prints_all_settings_with_na_for_missing() {
    let mut sh = shell();
    let _ = run(&mut sh, "rfm id 7");
    let (_, out) = run(&mut sh, "rfm");
    assert_eq!(
        out,
        "Node id    : 7\nNetwork id : NA\nGateway id : NA\nMax power  : NA\nAES key    : NA\n"
    );
}

#[test]
fn rfm_settings_show_every_stored_value() {
    let mut sh = shell();
    let _ = run(&mut sh, "rfm id 7");
    let _ = run(&mut sh, "rfm net 42");
    let _ = run(&mut sh, "rfm gw 1");
    let _ = run(&mut sh, "rfm pwr 13");
    let (_, out) = run(&mut sh, "rfm key 0123456789abcdef");
    assert_eq!(out, "OK\n");

    let (_, out) = run(&mut sh, "rfm");
    assert!(out.contains("Node id    : 7"));
    assert!(out.contains("Network id : 42"));
    assert!(out.contains("Gateway id : 1"));
    assert!(out.contains("Max power  : 13"));
    assert!(out.contains("AES key    : 0123456789abcdef"));
}

#[test]
fn rfm_key_of_wrong_length_is_rejected_and_unwritten() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "rfm key short");
    assert_eq!(out, "ERROR: key must be 16 bytes\n");
    assert!(!sh.store().units.contains_key(&units::RADIO_AES_KEY));
}

#[test]
fn rfm_init_demands_every_setting() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "rfm init");
    assert_eq!(out, "ERROR: RFM node id missing\n");
    assert_eq!(sh.radio().init_calls, 0);

    let _ = run(&mut sh, "rfm id 7");
    let (_, out) = run(&mut sh, "rfm init");
    assert_eq!(out, "ERROR: RFM network id missing\n");
}

#[test]
fn rfm_init_with_full_settings_configures_the_radio() {
    let mut sh = shell();
    let _ = run(&mut sh, "rfm id 7");
    let _ = run(&mut sh, "rfm net 42");
    let _ = run(&mut sh, "rfm gw 1");
    let _ = run(&mut sh, "rfm pwr 13");
    let _ = run(&mut sh, "rfm key 0123456789abcdef");

    let (_, out) = run(&mut sh, "rfm init");
    assert_eq!(out, "OK\n");

    let radio = sh.radio();
    assert_eq!(radio.resets, 1);
    assert_eq!(radio.init_calls, 1);
    assert_eq!(radio.sleeps, 1);
    assert_eq!(radio.node_id, 7);
    assert_eq!(radio.network_id, 42);
    assert_eq!(radio.power_dbm, 13);
    assert!(radio.csma);
    assert!(radio.auto_rssi);
    assert_eq!(radio.aes_key, Some(*b"0123456789abcdef"));
}

#[test]
fn rfm_init_with_absent_radio_reports_not_found() {
    let radio = MockRadio {
        present: false,
        ..Default::default()
    };
    let mut sh = shell_with(MockStore::default(), radio, MockTemp::default());
    let _ = run(&mut sh, "rfm id 7");
    let _ = run(&mut sh, "rfm net 42");
    let _ = run(&mut sh, "rfm gw 1");
    let _ = run(&mut sh, "rfm pwr 13");
    let _ = run(&mut sh, "rfm key 0123456789abcdef");

    let (_, out) = run(&mut sh, "rfm init");
    assert_eq!(out, "ERROR: No RFM69CW found\n");
}

#[test]
fn rfm_tx_sends_the_frame_and_reports_delivery() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "rfm tx 9 ping");
    assert_eq!(out, "OK:2:-61\n");
    assert_eq!(sh.radio().sent, vec![(9, b"ping".to_vec())]);
}

#[test]
fn rfm_tx_without_a_response_reports_the_failure() {
    let radio = MockRadio {
        fail_send: true,
        ..Default::default()
    };
    let mut sh = shell_with(MockStore::default(), radio, MockTemp::default());
    let (_, out) = run(&mut sh, "rfm tx 9 ping");
    assert_eq!(out, "ERROR:No response\n");
}

#[test]
fn rfm_unknown_subcommand_is_illegal() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "rfm bogus");
    assert_eq!(out, "Error: illegal command\n");
    let (_, out) = run(&mut sh, "rfm bogus 1");
    assert_eq!(out, "Error: illegal command\n");
    let (_, out) = run(&mut sh, "rfm bogus 1 2");
    assert_eq!(out, "Error: illegal command\n");
}
