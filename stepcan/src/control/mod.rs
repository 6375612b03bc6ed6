// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! This module provides the motion state machine driven by the receiver's control loop.
//!
//! ## Modules
//!
//! - [`motion_controller`] - Idle/moving state machine on top of a [`crate::motors::Stepper`].

pub mod motion_controller;

pub use motion_controller::{MotionController, MotionEvent, MotionState};
