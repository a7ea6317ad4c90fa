//! Translation between commands and the ASCII strings exchanged with the supply.
//!
//! Nothing in here touches the transport. Framing (the trailing `\r`) is added by the driver.

use core::fmt::Write as _;

use thiserror::Error;

use crate::{
    command::Command,
    scaling::FixedField,
    types::{DisplayReading, OperatingMode, SettingReading},
};

/// Longest encoded command, `VOLT999`, with room to spare.
pub const COMMAND_CAPACITY: usize = 8;

/// How much of a bad line we keep around for diagnostics.
pub const RAW_LINE_CAPACITY: usize = 32;

/// An encoded command, without terminator.
pub type CommandString = heapless::String<COMMAND_CAPACITY>;

/// A copy of a received line, kept for error reports. Truncated if the line was longer.
pub type RawLine = heapless::String<RAW_LINE_CAPACITY>;

/// Inclusive setpoint range accepted by the supplies, in volts or amps.
pub const SETPOINT_MIN: f32 = 0.0;
pub const SETPOINT_MAX: f32 = 99.9;

/// Length of a `GETS` payload.
pub const SETTING_PAYLOAD_LEN: usize = 2 * FixedField::SETPOINT.width;
/// Length of a `GETD` payload.
pub const DISPLAY_PAYLOAD_LEN: usize = 2 * FixedField::DISPLAY.width + 1;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    #[error("Setpoint {value} is outside of [0.0, 99.9]")]
    OutOfRange { value: f32 },
    #[error("{0:?} requires a setpoint")]
    MissingSetpoint(Command),
    #[error("{0:?} does not take a setpoint")]
    UnexpectedSetpoint(Command),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Malformed payload: {0:?}")]
    MalformedPayload(RawLine),
    #[error("Unknown operating mode {status:?} in payload {payload:?}")]
    UnknownMode { status: char, payload: RawLine },
}

/// Copy a line into a [`RawLine`], replacing anything that isn't printable ASCII with `?`.
pub fn capture(line: &[u8]) -> RawLine {
    let mut raw = RawLine::new();
    for &byte in line.iter().take(RAW_LINE_CAPACITY) {
        let c = if byte.is_ascii_graphic() || byte == b' ' {
            byte as char
        } else {
            '?'
        };
        // Can't overflow, we take at most the capacity in single byte chars.
        let _ = raw.push(c);
    }
    raw
}

/// Encode a command and its optional setpoint.
///
/// Setpoints are checked against `[0.0, 99.9]` and rendered as `round(value * 10)` zero padded to 3 digits, so
/// `(SetVoltage, Some(1.0))` becomes `VOLT010`.
pub fn encode(command: Command, value: Option<f32>) -> Result<CommandString, EncodeError> {
    let mut message = CommandString::new();
    // Mnemonics are at most 5 chars.
    let _ = message.push_str(command.mnemonic());

    match (command.takes_setpoint(), value) {
        (true, Some(value)) => {
            let raw = setpoint_to_raw(value)?;
            let _ = write!(message, "{:03}", raw);
        }
        (true, None) => return Err(EncodeError::MissingSetpoint(command)),
        (false, Some(_)) => return Err(EncodeError::UnexpectedSetpoint(command)),
        (false, None) => {}
    }

    Ok(message)
}

/// Range check a setpoint and convert it to tenths.
pub fn setpoint_to_raw(value: f32) -> Result<u32, EncodeError> {
    // NaN fails both comparisons.
    if !(SETPOINT_MIN..=SETPOINT_MAX).contains(&value) {
        return Err(EncodeError::OutOfRange { value });
    }
    FixedField::SETPOINT
        .to_raw(value)
        .ok_or(EncodeError::OutOfRange { value })
}

/// Decode a `GETS` payload, `VVVCCC`.
pub fn decode_setting(payload: &str) -> Result<SettingReading, DecodeError> {
    let bytes = payload.as_bytes();
    let malformed = || DecodeError::MalformedPayload(capture(bytes));

    if bytes.len() != SETTING_PAYLOAD_LEN {
        return Err(malformed());
    }
    let (voltage, current) = bytes.split_at(FixedField::SETPOINT.width);

    Ok(SettingReading {
        voltage: FixedField::SETPOINT.decode(voltage).ok_or_else(malformed)?,
        current: FixedField::SETPOINT.decode(current).ok_or_else(malformed)?,
    })
}

/// Decode a `GETD` payload, `VVVVCCCCS`.
///
/// The status digit must be `0` (CV) or `1` (CC).
pub fn decode_display(payload: &str) -> Result<DisplayReading, DecodeError> {
    let bytes = payload.as_bytes();
    let malformed = || DecodeError::MalformedPayload(capture(bytes));

    if bytes.len() != DISPLAY_PAYLOAD_LEN {
        return Err(malformed());
    }
    let width = FixedField::DISPLAY.width;
    let voltage = &bytes[..width];
    let current = &bytes[width..2 * width];
    let status = bytes[2 * width];

    let voltage = FixedField::DISPLAY.decode(voltage).ok_or_else(malformed)?;
    let current = FixedField::DISPLAY.decode(current).ok_or_else(malformed)?;
    let mode = OperatingMode::try_from(status).map_err(|_| DecodeError::UnknownMode {
        status: status as char,
        payload: capture(bytes),
    })?;

    Ok(DisplayReading {
        voltage,
        current,
        mode,
    })
}
