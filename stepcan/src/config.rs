// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Device constants and node configuration.
//!
//! The constants describe the reference setup (NEMA17 stepper, 1/8 microstepping, CAN base id
//! `0x123`). `ReceiverConfig` and `SenderConfig` bundle them so tests and other boards can override
//! individual values.

use crate::protocol::FrameWindow;

// Bus
pub const BASE_ID: u16 = 0x123;
pub const WINDOW_SIZE: u8 = 4;

// Motor
pub const STEPS_PER_REV: f32 = 200.0; // 1.8° motor
pub const MICROSTEPS: f32 = 8.0;
pub const STEPS_PER_DEGREE: f32 = STEPS_PER_REV * MICROSTEPS / 360.0;

/// Speed applied at startup, in steps per second.
pub const DEFAULT_SPEED: f32 = 100.0;
/// Upper bound accepted by `SP` (inclusive), in steps per second.
pub const SPEED_LIMIT: f32 = 1000.0;
/// Velocity ceiling programmed into the motion primitive, in steps per second.
pub const MAX_SPEED: f32 = 1000.0;
/// Steps per second squared.
pub const ACCELERATION: f32 = 500.0;

/// How long a message that ended on a full 8-byte segment waits for a continuation before it is
/// dropped.
pub const FLUSH_TIMEOUT_MS: u32 = 10;

// Sender
pub const SEND_INTERVAL_MS: u32 = 2000;
pub const MOVE_RANGE_DEG: (i32, i32) = (-180, 180);
pub const SPEED_RANGE: (i32, i32) = (50, 500);

/// What the sender does when one segment of a multi-frame message fails to transmit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SendPolicy {
    /// Drop the remaining segments so no partial command reaches the bus.
    AbortMessage,
    /// Keep transmitting the remaining segments.
    BestEffort,
}

/// Receiver node settings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ReceiverConfig {
    pub window: FrameWindow,
    pub steps_per_degree: f32,
    pub default_speed: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub flush_timeout_ms: u32,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            window: FrameWindow::DEFAULT,
            steps_per_degree: STEPS_PER_DEGREE,
            default_speed: DEFAULT_SPEED,
            max_speed: MAX_SPEED,
            acceleration: ACCELERATION,
            flush_timeout_ms: FLUSH_TIMEOUT_MS,
        }
    }
}

/// Sender node settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SenderConfig {
    pub window: FrameWindow,
    pub send_interval_ms: u32,
    pub policy: SendPolicy,
    pub move_range_deg: (i32, i32),
    pub speed_range: (i32, i32),
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            window: FrameWindow::DEFAULT,
            send_interval_ms: SEND_INTERVAL_MS,
            policy: SendPolicy::AbortMessage,
            move_range_deg: MOVE_RANGE_DEG,
            speed_range: SPEED_RANGE,
        }
    }
}
