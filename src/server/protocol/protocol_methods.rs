// Turning lines into commands.

// Imports

use crate::error_types::protocol::ProtocolError;
use crate::helpers::hex::hex_to_bytes;

use super::protocol_struct::Command;

// Implementations

impl Command {
    /// Parse one client line. The verb is case-insensitive; after it come
    /// at most a name and a payload, and anything further is ignored the
    /// way the wire protocol always has.
    pub(crate) fn parse(line: &str, max_payload_bytes: usize) -> Result<Command, ProtocolError> {
        parse_command(line, max_payload_bytes)
    }
}

// Functions

fn parse_command(line: &str, max_payload_bytes: usize) -> Result<Command, ProtocolError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ProtocolError::EmptyCommand);
    }

    let (verb, rest) = split_token(trimmed);
    match verb.to_ascii_uppercase().as_str() {
        "CREATE" => Ok(Command::Create {
            name: required_name(rest, "CREATE <filename>")?,
        }),
        "WRITE" => parse_write(rest, max_payload_bytes),
        "READ" => Ok(Command::Read {
            name: required_name(rest, "READ <filename>")?,
        }),
        "DELETE" => Ok(Command::Delete {
            name: required_name(rest, "DELETE <filename>")?,
        }),
        "LIST" => Ok(Command::List),
        "HELP" => Ok(Command::Help),
        "QUIT" => Ok(Command::Quit),
        _ => Err(ProtocolError::UnknownCommand),
    }
}

/// Split off the first whitespace-separated token.
fn split_token(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(at) => (&text[..at], text[at..].trim_start()),
        None => (text, ""),
    }
}

fn required_name(rest: &str, usage: &'static str) -> Result<String, ProtocolError> {
    let (name, _ignored) = split_token(rest);
    if name.is_empty() {
        return Err(ProtocolError::Usage(usage));
    }
    Ok(name.to_string())
}

fn parse_write(rest: &str, max_payload_bytes: usize) -> Result<Command, ProtocolError> {
    let (name, payload_text) = split_token(rest);
    if name.is_empty() || payload_text.is_empty() {
        return Err(ProtocolError::Usage("WRITE <filename> <hexpayload>"));
    }

    let payload = hex_to_bytes(payload_text)?;
    if payload.len() > max_payload_bytes {
        return Err(ProtocolError::PayloadTooLarge(max_payload_bytes));
    }
    Ok(Command::Write {
        name: name.to_string(),
        payload,
    })
}
