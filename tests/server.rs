// Driving the volume from the outside, one line at a time.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use test_log::test; // We want to see logs while testing.

use crate::test_common::open_medium;
use crate::test_common::scratch_dir;
use crate::test_common::start_server;
use crate::test_common::test_config;
use crate::test_common::Client;

#[test]
fn a_full_session() {
    let dir = scratch_dir();
    let volume = Arc::new(open_medium(&dir));
    let address = start_server(volume, test_config());

    let mut client = Client::connect(address);
    assert!(client.line().starts_with("OK "), "the greeting leads with OK");

    assert!(client.roundtrip("HELP").starts_with("OK CREATE"), "HELP lists the verbs");

    assert_eq!(client.roundtrip("CREATE notes"), "OK");
    assert_eq!(client.roundtrip("WRITE notes 0102030405"), "OK");
    assert_eq!(client.roundtrip("READ notes"), "OK 0102030405");
    assert_eq!(client.roundtrip("LIST"), "OK notes");

    assert_eq!(client.roundtrip("READ missing"), "ERROR file not found");
    assert_eq!(client.roundtrip("CREATE notes"), "ERROR file already exists");

    assert_eq!(client.roundtrip("DELETE notes"), "OK");
    assert_eq!(client.roundtrip("LIST"), "OK");

    assert_eq!(client.roundtrip("QUIT"), "OK bye");
    assert!(client.at_eof(), "QUIT closes the connection");
}

#[test]
fn the_verb_is_case_insensitive_on_the_wire() {
    let dir = scratch_dir();
    let volume = Arc::new(open_medium(&dir));
    let address = start_server(volume, test_config());

    let mut client = Client::connect(address);
    let _greeting = client.line();

    assert_eq!(client.roundtrip("create MiXeD"), "OK");
    assert_eq!(client.roundtrip("write MiXeD ff00"), "OK");
    assert_eq!(client.roundtrip("read MiXeD"), "OK ff00");
    assert_eq!(client.roundtrip("list"), "OK MiXeD");
}

#[test]
fn mistakes_keep_the_connection_open() {
    let dir = scratch_dir();
    let volume = Arc::new(open_medium(&dir));
    let address = start_server(volume, test_config());

    let mut client = Client::connect(address);
    let _greeting = client.line();

    assert_eq!(client.roundtrip("MOUNT /dev/fd0"), "ERROR unknown command");
    assert_eq!(client.roundtrip(""), "ERROR empty command");
    assert_eq!(client.roundtrip("CREATE"), "ERROR usage: CREATE <filename>");
    assert_eq!(
        client.roundtrip("WRITE lonely"),
        "ERROR usage: WRITE <filename> <hexpayload>"
    );
    assert_eq!(client.roundtrip("CREATE f"), "OK");
    assert_eq!(client.roundtrip("WRITE f abc"), "ERROR hex must have even length");
    assert_eq!(
        client.roundtrip("WRITE f 0g"),
        "ERROR 'g' is not a hexadecimal digit"
    );
    assert_eq!(
        client.roundtrip("CREATE twelve-chars"),
        "ERROR invalid filename: name is longer than 11 bytes"
    );

    // After all that abuse, the session still works.
    assert_eq!(client.roundtrip("WRITE f 2a"), "OK");
    assert_eq!(client.roundtrip("READ f"), "OK 2a");
}

#[test]
fn an_oversized_payload_is_refused() {
    let dir = scratch_dir();
    let volume = Arc::new(open_medium(&dir));
    let mut config = test_config();
    config.max_payload_bytes = 4;
    let address = start_server(volume, config);

    let mut client = Client::connect(address);
    let _greeting = client.line();

    assert_eq!(client.roundtrip("CREATE f"), "OK");
    assert_eq!(
        client.roundtrip("WRITE f 0102030405"),
        "ERROR payload exceeds 4 bytes"
    );
    assert_eq!(client.roundtrip("READ f"), "OK", "the refused write changed nothing");
}

#[test]
fn an_endless_line_closes_the_connection() {
    let dir = scratch_dir();
    let volume = Arc::new(open_medium(&dir));
    let mut config = test_config();
    config.max_line_bytes = 64;
    let address = start_server(volume, config);

    let mut client = Client::connect(address);
    let _greeting = client.line();

    let long_line = "WRITE f ".to_string() + &"ab".repeat(100);
    assert_eq!(
        client.roundtrip(&long_line),
        "ERROR line exceeds 64 bytes"
    );
    assert!(client.at_eof(), "a bounds violation hangs up");
}

#[test]
fn a_command_budget_closes_the_connection() {
    let dir = scratch_dir();
    let volume = Arc::new(open_medium(&dir));
    let mut config = test_config();
    config.max_commands = 3;
    let address = start_server(volume, config);

    let mut client = Client::connect(address);
    let _greeting = client.line();

    assert_eq!(client.roundtrip("LIST"), "OK");
    assert_eq!(client.roundtrip("LIST"), "OK");
    assert_eq!(client.roundtrip("LIST"), "OK");
    assert_eq!(
        client.roundtrip("LIST"),
        "ERROR too many commands on this connection"
    );
    assert!(client.at_eof(), "the budget is the budget");
}

#[test]
fn two_clients_share_one_volume() {
    let dir = scratch_dir();
    let volume = Arc::new(open_medium(&dir));
    let address = start_server(volume, test_config());

    let mut first = Client::connect(address);
    let _greeting = first.line();
    let mut second = Client::connect(address);
    let _greeting = second.line();

    assert_eq!(first.roundtrip("CREATE shared"), "OK");
    assert_eq!(first.roundtrip("WRITE shared cafe"), "OK");
    assert_eq!(
        second.roundtrip("READ shared"),
        "OK cafe",
        "what one client writes, the other reads"
    );
}
