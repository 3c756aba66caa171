// One client at a time: read a line, do the thing, say OK or ERROR.

// Imports

use std::io::BufRead;
use std::io::BufReader;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;
use std::net::TcpStream;

use log::debug;
use log::trace;
use log::warn;

use crate::error_types::protocol::ProtocolError;
use crate::helpers::hex::bytes_to_hex;
use crate::server::config_struct::ServerConfig;
use crate::server::protocol::protocol_struct::Command;
use crate::server::protocol::protocol_struct::GREETING;
use crate::server::protocol::protocol_struct::USAGE;
use crate::volume::manager::manager_struct::Volume;

// Implementations

/// Run one connection to completion.
pub(crate) fn handle_connection(stream: TcpStream, volume: &Volume, config: &ServerConfig) {
    let peer = stream
        .peer_addr()
        .map(|address| address.to_string())
        .unwrap_or_else(|_| "unknown peer".to_string());
    trace!("Connection from {peer}");

    if let Err(failed) = stream.set_read_timeout(Some(config.client_read_timeout)) {
        warn!("Could not arm the read timeout for {peer}: {failed}");
        return;
    }
    let reader = match stream.try_clone() {
        Ok(clone) => BufReader::new(clone),
        Err(failed) => {
            warn!("Could not clone the socket for {peer}: {failed}");
            return;
        }
    };

    session(reader, stream, volume, config);
    debug!("Client disconnected: {peer}");
}

/// Answer one line and hang up. The saturation path uses this before a
/// connection ever reaches a worker.
pub(crate) fn respond_and_close(mut stream: TcpStream, message: &str) {
    if let Err(failed) = writeln!(stream, "{message}") {
        trace!("Could not deliver the parting message: {failed}");
    }
}

// Functions

enum LineFault {
    TooLong,
    Io(std::io::Error),
}

fn session(
    mut reader: BufReader<TcpStream>,
    mut stream: TcpStream,
    volume: &Volume,
    config: &ServerConfig,
) {
    if writeln!(stream, "{GREETING}").is_err() {
        return;
    }

    let mut commands = 0usize;
    loop {
        let line = match read_line_bounded(&mut reader, config.max_line_bytes) {
            Ok(Some(line)) => line,
            // Clean hang-up.
            Ok(None) => return,
            Err(LineFault::TooLong) => {
                let refusal = ProtocolError::LineTooLong(config.max_line_bytes);
                let _ = writeln!(stream, "ERROR {refusal}");
                return;
            }
            Err(LineFault::Io(failed)) => {
                if matches!(failed.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) {
                    let _ = writeln!(stream, "ERROR client read timed out");
                } else {
                    trace!("Socket read failed: {failed}");
                }
                return;
            }
        };

        commands += 1;
        if commands > config.max_commands {
            let refusal = ProtocolError::TooManyCommands;
            let _ = writeln!(stream, "ERROR {refusal}");
            return;
        }

        let command = match Command::parse(&line, config.max_payload_bytes) {
            Ok(command) => command,
            Err(mistake) => {
                if writeln!(stream, "ERROR {mistake}").is_err() {
                    return;
                }
                if mistake.is_fatal() {
                    return;
                }
                continue;
            }
        };

        if command == Command::Quit {
            let _ = writeln!(stream, "OK bye");
            return;
        }
        let reply = respond(volume, command);
        if writeln!(stream, "{reply}").is_err() {
            return;
        }
    }
}

/// Run one command against the volume and render the reply line.
fn respond(volume: &Volume, command: Command) -> String {
    match command {
        Command::Create { name } => render(volume.create_file(&name).map(|()| String::new())),
        Command::Write { name, payload } => {
            render(volume.write_file(&name, &payload).map(|()| String::new()))
        }
        Command::Read { name } => render(volume.read_file(&name).map(|bytes| bytes_to_hex(&bytes))),
        Command::Delete { name } => render(volume.delete_file(&name).map(|()| String::new())),
        Command::List => render(Ok(volume.list_files().join(","))),
        Command::Help => format!("OK {USAGE}"),
        Command::Quit => unreachable!("QUIT never reaches the volume"),
    }
}

fn render(outcome: Result<String, crate::error_types::volume::VolumeError>) -> String {
    match outcome {
        Ok(payload) if payload.is_empty() => "OK".to_string(),
        Ok(payload) => format!("OK {payload}"),
        Err(failed) => format!("ERROR {failed}"),
    }
}

/// Read one `\n`-terminated line, refusing anything longer than `max`
/// bytes of content. `None` at a clean end of stream.
fn read_line_bounded(
    reader: &mut BufReader<TcpStream>,
    max: usize,
) -> Result<Option<String>, LineFault> {
    let mut line = String::new();
    let taken = reader
        .by_ref()
        .take(max as u64 + 1)
        .read_line(&mut line)
        .map_err(LineFault::Io)?;

    if taken == 0 {
        return Ok(None);
    }
    if taken > max && !line.ends_with('\n') {
        // The limit was hit before any newline showed up. Whatever the
        // rest of this line was, it is not worth buffering.
        return Err(LineFault::TooLong);
    }
    Ok(Some(line))
}
