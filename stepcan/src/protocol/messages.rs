// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command grammar used to drive the stepper.
//!
//! Two forms exist, both plain ASCII:
//!
//! - `SP <steps/s>` sets the stepping speed
//! - `MV <degrees>` moves relative to the current position (`MV-90` is accepted too)

use core::fmt::{self, Write};

use micromath::F32Ext;

/// Prefix of the speed command. The trailing space is part of the prefix.
pub const SPEED_PREFIX: &str = "SP ";
/// Prefix of the relative move command.
pub const MOVE_PREFIX: &str = "MV";

/// Largest payload of a single CAN data frame.
pub const MAX_FRAME_LEN: usize = 8;
/// Two frames' worth of bytes; the most a message may span.
pub const MESSAGE_CAPACITY: usize = 2 * MAX_FRAME_LEN;
/// Longest command text on the wire, padding included.
///
/// The last segment of a message is always shorter than [`MAX_FRAME_LEN`], so a 16-byte text
/// cannot be sent.
pub const MAX_COMMAND_LEN: usize = MESSAGE_CAPACITY - 1;

/// Command text as it is put on the wire.
pub type CommandText = heapless::String<MESSAGE_CAPACITY>;

/// Parsed motion commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Stepping speed in steps per second.
    SetSpeed(f32),
    /// Relative move in degrees; negative values turn the other way.
    MoveRelative(f32),
}

impl Command {
    /// Render the command as wire text.
    ///
    /// A text whose length is a multiple of [`MAX_FRAME_LEN`] gets one trailing space, so the
    /// receiver sees a short final segment and never has to guess where the message ends. The
    /// parser trims it. Fails if the result would exceed [`MAX_COMMAND_LEN`] bytes.
    pub fn to_text(&self) -> Result<CommandText, fmt::Error> {
        let mut text = CommandText::new();
        write!(text, "{}", self)?;
        if text.len() % MAX_FRAME_LEN == 0 {
            text.push(' ').map_err(|_| fmt::Error)?;
        }
        Ok(text)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetSpeed(v) => write!(f, "{}{}", SPEED_PREFIX, v),
            Command::MoveRelative(deg) => write!(f, "{} {}", MOVE_PREFIX, deg),
        }
    }
}

/// Convert an angular displacement into a whole number of motor steps.
#[inline]
pub fn degrees_to_steps(degrees: f32, steps_per_degree: f32) -> i32 {
    F32Ext::round(degrees * steps_per_degree) as i32
}
