// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # StepCAN
//!
//! This crate implements a small ASCII motion command protocol carried over CAN, plus the
//! receiver-side state machine that turns received commands into stepper motion. Everything except
//! the [`hw`] layer is `no_std`, allocation-free and runs on the host for testing.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`protocol`] | Command grammar, frame segmentation, window filtering and reassembly |
//! | [`control`] | Non-blocking motion state machine on top of a [`motors::Stepper`] |
//! | [`motors`] | Motion primitive interface and a simulated stepper |
//! | [`drivers`] | STEP/DIR pulse driver with a trapezoidal ramp |
//! | [`app`] | Receiver tick loop and sender test-command generator |
//! | [`config`] | Device constants and node configuration |
//! | `hw` | MCU-level wrappers around CAN, USART and the cycle counter (feature `stm32`) |
//!
//! ## Getting Started
//!
//! Run the host test-suite:
//!
//! ```bash
//! cargo test -p stepcan
//! ```
//!
//! Flash a board (from `receiver/` or `sender/`):
//!
//! ```bash
//! cargo run --release
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod diag;

pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod motors;
pub mod protocol;

#[cfg(feature = "stm32")]
pub mod hw;
