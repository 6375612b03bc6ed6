// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Motion Command Protocol
//!
//! ASCII commands travel over CAN split into 8-byte segments with consecutive identifiers.
//!
//! - [`messages`] - command grammar and the [`Command`] type
//! - [`parser`] - text to [`Command`]
//! - [`frame`] - identifier window and sender-side segmentation
//! - [`reassembly`] - receiver-side segment accumulation
//! - [`bus`] - transport interface and an in-memory loopback bus

pub mod bus;
pub mod frame;
pub mod messages;
pub mod parser;
pub mod reassembly;

pub use bus::{LoopbackBus, LoopbackError, Transport};
pub use frame::{segment, FrameWindow, SegmentError, Segments};
pub use messages::{
    degrees_to_steps, Command, CommandText, MAX_COMMAND_LEN, MAX_FRAME_LEN, MESSAGE_CAPACITY,
};
pub use parser::{parse, parse_bytes, ParseError};
pub use reassembly::{Message, ReassemblyError, Reassembler};
