// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the raw `hw/` layer and implement
//! the [`crate::motors::Stepper`] motion primitive.
//!
//! ## Existing drivers
//!
//! - [`step_dir`] – generic STEP/DIR stepper driver with a trapezoidal speed ramp

pub mod step_dir;

pub use step_dir::{Monotonic, StepDir};
