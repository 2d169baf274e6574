//! Dispatcher contract: lookup, arity gating, usage reporting, help.

use radiomote::console::{Flow, COMMANDS};

use crate::mock_ports::{run, shell};

#[test]
fn empty_and_whitespace_lines_are_no_ops() {
    let mut sh = shell();
    let (flow, out) = run(&mut sh, "");
    assert_eq!(flow, Flow::Continue);
    assert!(out.is_empty());

    let (flow, out) = run(&mut sh, "   \t  ");
    assert_eq!(flow, Flow::Continue);
    assert!(out.is_empty());
}

#[test]
fn unknown_command_names_the_offending_token() {
    let mut sh = shell();
    let (flow, out) = run(&mut sh, "frobnicate 1 2 3");
    assert_eq!(flow, Flow::Continue);
    assert_eq!(out, "Unknown command 'frobnicate'\n");
}

#[test]
fn unknown_first_token_wins_over_valid_later_tokens() {
    let mut sh = shell();
    // later tokens are real command names; only token 0 is looked up
    let (_, out) = run(&mut sh, "hlep help temp");
    assert_eq!(out, "Unknown command 'hlep'\n");
}

#[test]
fn matching_is_case_sensitive() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "HELP");
    assert_eq!(out, "Unknown command 'HELP'\n");
}

#[test]
fn in_range_arity_invokes_the_handler_exactly_once() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "pasterase 3");
    assert_eq!(sh.store().erase_calls, 1);
    assert_eq!(out, "Erased unit 3\n");
}

#[test]
fn under_arity_reports_usage_and_skips_the_handler() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "pasterase");
    assert_eq!(sh.store().erase_calls, 0);
    assert_eq!(out, "Usage: pasterase <unit>\n");
}

#[test]
fn over_arity_reports_usage_and_skips_the_handler() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "pasterase 1 2");
    assert_eq!(sh.store().erase_calls, 0);
    assert_eq!(out, "Usage: pasterase <unit>\n");
}

#[test]
fn zero_arg_command_rejects_any_argument() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "temp now");
    assert_eq!(sh.temp().read_calls, 0);
    assert_eq!(out, "Usage: temp\n");

    let (_, out) = run(&mut sh, "temp");
    assert_eq!(sh.temp().read_calls, 1);
    assert!(out.contains("°C"));
}

#[test]
fn arity_bounds_are_inclusive_at_both_ends() {
    // pastdump takes 0 or 1 argument
    let mut sh = shell();
    let (_, out) = run(&mut sh, "pastdump");
    assert!(out.contains("Past block 0:"));
    let (_, out) = run(&mut sh, "pastdump 16");
    assert!(out.contains("Past block 1:"));
    let (_, out) = run(&mut sh, "pastdump 16 32");
    assert_eq!(out, "Usage: pastdump [<size>]\n");
}

#[test]
fn help_lists_every_command_in_registration_order() {
    let mut sh = shell();
    let (flow, out) = run(&mut sh, "help");
    assert_eq!(flow, Flow::Continue);

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), COMMANDS.len());
    for (line, spec) in lines.iter().zip(COMMANDS) {
        assert_eq!(*line, format!("{}    {}", spec.name, spec.help));
    }
}

#[test]
fn numeric_argument_validation_reports_the_token() {
    let mut sh = shell();
    let (_, out) = run(&mut sh, "pastread five");
    assert_eq!(out, "Error: illegal number 'five'\n");
}

#[test]
fn every_command_with_min_arity_dispatches() {
    // Smoke-run each table entry at its minimum arity; none may hit the
    // unknown-command or usage paths.
    for spec in COMMANDS {
        let mut sh = shell();
        let mut line = String::from(spec.name);
        for i in 0..spec.min_args {
            // numeric filler keeps the parsers happy
            line.push_str(&format!(" {}", i + 1));
        }
        // "power 1" would be an illegal sub-argument; use its real form
        let line = if spec.name == "power" {
            String::from("power normal")
        } else {
            line
        };
        let (_, out) = run(&mut sh, &line);
        assert!(
            !out.starts_with("Unknown command") && !out.starts_with("Usage:"),
            "{} dispatched wrong: {}",
            spec.name,
            out
        );
    }
}
