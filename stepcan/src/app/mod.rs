// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Node Applications
//!
//! Hardware-independent logic of the two bus nodes. The firmware binaries only wire these up to
//! the peripherals in [`crate::hw`] (feature `stm32`); tests drive them over a
//! [`crate::protocol::LoopbackBus`].
//!
//! - [`receiver`] - reassembles commands and drives the stepper
//! - [`sender`] - generates test commands and transmits them

pub mod receiver;
pub mod sender;

pub use receiver::{ReceiverContext, ReceiverStats};
pub use sender::{SendError, SendReport, Sender};
