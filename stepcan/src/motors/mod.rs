// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Actuator Abstractions
//!
//! This module contains the motion primitive interface that sits between device-level drivers in
//! `drivers` and the motion state machine in `control`.
//!
//! ## Modules
//!
//! - [`stepper`] - [`Stepper`] trait: relative moves, speed limits and a non-blocking `run`.
//! - [`sim`] - Simulated stepper for host tests and bench runs without a motor.

pub mod sim;
pub mod stepper;

pub use sim::SimStepper;
pub use stepper::Stepper;
