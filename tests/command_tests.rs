//! Command Table Tests
//!
//! These tests verify:
//! - Unknown-name and arity validation
//! - The deployed jig command set and its reply types
//! - Handler errors turning into `-` replies

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use jigctl::commands::{jig_commands, Command, CommandTable, JIG_COMMANDS};
use jigctl::hardware::{self, SimulatedJig};
use jigctl::protocol::{Reply, Request};

// =============================================================================
// Helper Functions
// =============================================================================

fn jig_table() -> CommandTable {
    jig_commands(hardware::shared(SimulatedJig::new()))
}

fn dispatch(table: &CommandTable, line: &str) -> Reply {
    table.dispatch(&Request::from_line(line))
}

/// A command line with `tokens` tokens for `name`, filled with zeros
fn line_with_tokens(name: &str, tokens: usize) -> String {
    let mut parts = vec![name.to_string()];
    parts.extend(std::iter::repeat("0".to_string()).take(tokens.saturating_sub(1)));
    parts.join(" ")
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_unknown_command() {
    let table = jig_table();
    assert_eq!(
        dispatch(&table, "frobnicate"),
        Reply::Error("unknown command: 'frobnicate'".to_string())
    );
}

#[test]
fn test_unknown_name_wins_over_arity() {
    let table = jig_table();
    // Four tokens matches tec_write's arity, but the name is unregistered
    assert_eq!(
        dispatch(&table, "tec_writ 0 0 1.0"),
        Reply::Error("unknown command: 'tec_writ'".to_string())
    );
}

#[test]
fn test_empty_request_is_unknown_command() {
    let table = jig_table();
    assert_eq!(dispatch(&table, "   "), Reply::Error("unknown command: ''".to_string()));
}

#[test]
fn test_arity_mismatch() {
    let table = jig_table();
    assert_eq!(
        dispatch(&table, "bias_vread extra"),
        Reply::Error("wrong number of arguments for command: 'bias_vread'".to_string())
    );
}

#[test]
fn test_arity_off_by_one_either_side() {
    let table = jig_table();
    for (name, arity) in JIG_COMMANDS {
        let expected =
            Reply::Error(format!("wrong number of arguments for command: '{}'", name));

        if arity > 1 {
            assert_eq!(dispatch(&table, &line_with_tokens(name, arity - 1)), expected);
        }
        assert_eq!(dispatch(&table, &line_with_tokens(name, arity + 1)), expected);
    }
}

#[test]
fn test_handler_not_called_on_arity_mismatch() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let table = CommandTable::builder()
        .register_fn("count", 2, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Reply::Int(1))
        })
        .build();

    dispatch(&table, "count");
    dispatch(&table, "count 1 2");
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(dispatch(&table, "count 1"), Reply::Int(1));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Jig Command Set Tests
// =============================================================================

#[test]
fn test_jig_table_has_all_commands() {
    let table = jig_table();
    assert_eq!(table.len(), 14);
    for (name, arity) in JIG_COMMANDS {
        let command = table.get(name).expect(name);
        assert_eq!(command.arity(), arity, "{}", name);
    }
}

#[test]
fn test_ok_commands() {
    let table = jig_table();
    for line in [
        "reset",
        "poll 1",
        "tec_write 0 1 1.5",
        "hv_write 1 2 38.0",
        "set_active_bitmask 0xf",
        "debug 0",
        "set_attenuation 12",
        "step_home",
        "step -200",
    ] {
        assert_eq!(dispatch(&table, line), Reply::ok(), "{}", line);
    }
}

#[test]
fn test_float_commands() {
    let table = jig_table();
    for line in [
        "thermistor_read 0 0",
        "tec_sense_read 1",
        "tec_check 0 3",
        "bias_iread",
        "bias_vread",
    ] {
        assert!(matches!(dispatch(&table, line), Reply::Float(_)), "{}", line);
    }
}

#[test]
fn test_tec_check_near_nominal_resistance() {
    let table = jig_table();
    match dispatch(&table, "tec_check 0 0") {
        Reply::Float(ohms) => assert!((14.0..15.0).contains(&ohms)),
        other => panic!("Expected float reply, got {:?}", other),
    }
}

#[test]
fn test_writes_are_visible_to_reads() {
    let table = jig_table();
    assert_eq!(dispatch(&table, "hv_write 0 0 40"), Reply::ok());
    assert_eq!(dispatch(&table, "bias_vread"), Reply::Float(40.0));
    assert_eq!(dispatch(&table, "reset"), Reply::ok());
    assert_eq!(dispatch(&table, "bias_vread"), Reply::Float(0.0));
}

#[test]
fn test_bad_argument_is_error_reply() {
    let table = jig_table();
    assert_eq!(
        dispatch(&table, "step forward"),
        Reply::Error("invalid argument: 'forward'".to_string())
    );
    assert!(dispatch(&table, "poll maybe").is_error());
}

#[test]
fn test_hardware_fault_is_error_reply() {
    let table = jig_table();
    match dispatch(&table, "tec_write 9 0 1.0") {
        Reply::Error(msg) => assert!(msg.starts_with("hardware error:"), "{}", msg),
        other => panic!("Expected error reply, got {:?}", other),
    }
}
