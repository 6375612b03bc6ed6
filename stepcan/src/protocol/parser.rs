// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Message parser for the motion command protocol.
//!
//! Each known prefix is tried in a fixed priority order; the first match owns the rest of the
//! text. Anything that matches no prefix is reported as unrecognized.

use core::fmt;

use crate::config::SPEED_LIMIT;
use crate::protocol::messages::*;

/// Reasons a command text is rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParseError {
    /// Bytes are not valid UTF-8.
    NotText,
    /// No known command prefix.
    Unrecognized,
    /// Argument is missing or not a finite decimal number.
    InvalidNumber,
    /// `SP` argument outside `(0, SPEED_LIMIT]`.
    SpeedOutOfRange(f32),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NotText => f.write_str("command is not text"),
            ParseError::Unrecognized => {
                write!(f, "unrecognized command, use {}<speed> or {} <degrees>", SPEED_PREFIX, MOVE_PREFIX)
            }
            ParseError::InvalidNumber => f.write_str("invalid numeric argument"),
            ParseError::SpeedOutOfRange(v) => {
                write!(f, "speed out of range: {} (must be > 0 and <= {})", v, SPEED_LIMIT)
            }
        }
    }
}

type Rule = fn(&str) -> Result<Command, ParseError>;

/// Prefix table, highest priority first.
const RULES: [(&str, Rule); 2] = [(SPEED_PREFIX, parse_speed), (MOVE_PREFIX, parse_move)];

/// Parse a command text. Surrounding whitespace is ignored.
pub fn parse(text: &str) -> Result<Command, ParseError> {
    let text = text.trim();
    for &(prefix, rule) in RULES.iter() {
        if let Some(rest) = text.strip_prefix(prefix) {
            return rule(rest);
        }
    }
    Err(ParseError::Unrecognized)
}

/// Parse a reassembled byte buffer.
pub fn parse_bytes(bytes: &[u8]) -> Result<Command, ParseError> {
    let text = core::str::from_utf8(bytes).map_err(|_| ParseError::NotText)?;
    parse(text)
}

fn parse_speed(arg: &str) -> Result<Command, ParseError> {
    let v = parse_number(arg)?;
    if v > 0.0 && v <= SPEED_LIMIT {
        Ok(Command::SetSpeed(v))
    } else {
        Err(ParseError::SpeedOutOfRange(v))
    }
}

fn parse_move(arg: &str) -> Result<Command, ParseError> {
    parse_number(arg).map(Command::MoveRelative)
}

fn parse_number(arg: &str) -> Result<f32, ParseError> {
    match arg.trim().parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::InvalidNumber),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_bounds() {
        assert_eq!(parse("SP 1000"), Ok(Command::SetSpeed(1000.0)));
        assert_eq!(parse("SP 0"), Err(ParseError::SpeedOutOfRange(0.0)));
        assert_eq!(
            parse("SP 1000.0001"),
            Err(ParseError::SpeedOutOfRange(1000.0001))
        );
        assert_eq!(parse("SP -5"), Err(ParseError::SpeedOutOfRange(-5.0)));
        assert_eq!(parse("SP 0.5"), Ok(Command::SetSpeed(0.5)));
    }

    #[test]
    fn move_accepts_optional_space_and_sign() {
        assert_eq!(parse("MV 90"), Ok(Command::MoveRelative(90.0)));
        assert_eq!(parse("MV-90"), Ok(Command::MoveRelative(-90.0)));
        assert_eq!(parse("MV +12.5"), Ok(Command::MoveRelative(12.5)));
        assert_eq!(parse("  MV -180 \r\n"), Ok(Command::MoveRelative(-180.0)));
    }

    #[test]
    fn move_to_steps() {
        let Ok(Command::MoveRelative(deg)) = parse("MV-90") else {
            panic!("not a move");
        };
        assert_eq!(degrees_to_steps(deg, 4.4444), -400);
    }

    #[test]
    fn rejects_unknown_and_malformed() {
        assert_eq!(parse("XY 5"), Err(ParseError::Unrecognized));
        assert_eq!(parse(""), Err(ParseError::Unrecognized));
        // Prefixes are case-sensitive and `SP` needs its space.
        assert_eq!(parse("sp 100"), Err(ParseError::Unrecognized));
        assert_eq!(parse("SP100"), Err(ParseError::Unrecognized));
        assert_eq!(parse("MV"), Err(ParseError::InvalidNumber));
        assert_eq!(parse("MV abc"), Err(ParseError::InvalidNumber));
        assert_eq!(parse("SP inf"), Err(ParseError::InvalidNumber));
        assert_eq!(parse("MV NaN"), Err(ParseError::InvalidNumber));
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert_eq!(parse_bytes(&[0x4D, 0x56, 0xFF]), Err(ParseError::NotText));
        assert_eq!(parse_bytes(b"SP 250"), Ok(Command::SetSpeed(250.0)));
    }
}
