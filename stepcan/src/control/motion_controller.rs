// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Non-blocking motion state machine.
//!
//! This controller wraps a [`Stepper`] and provides a periodic `advance()` function that issues at
//! most one step-generation call per control-loop tick.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! controller.begin_move(400);
//!
//! loop {
//!     if let Some(MotionEvent::MoveCompleted { position }) = controller.advance() {
//!         // ...
//!     }
//! }
//! ```

use crate::config::ReceiverConfig;
use crate::motors::Stepper;

/// Operating state of the motion controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MotionState {
    /// No move in progress.
    Idle,
    /// A relative move is being executed.
    Moving,
}

/// Edges reported by [`MotionController::advance`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MotionEvent {
    /// The target was reached; `position` is the absolute step position.
    MoveCompleted { position: i32 },
}

/// Controller state and configuration.
pub struct MotionController<S: Stepper> {
    stepper: S,
    state: MotionState,

    /// Commanded speed (steps/s)
    speed: f32,
}

impl<S: Stepper> MotionController<S> {
    /// Create a controller and program the stepper's limits and initial speed.
    pub fn new(mut stepper: S, max_speed: f32, acceleration: f32, speed: f32) -> Self {
        stepper.set_max_speed(max_speed);
        stepper.set_acceleration(acceleration);
        stepper.set_speed(speed);
        Self {
            stepper,
            state: MotionState::Idle,
            speed,
        }
    }

    pub fn from_config(stepper: S, config: &ReceiverConfig) -> Self {
        Self::new(
            stepper,
            config.max_speed,
            config.acceleration,
            config.default_speed,
        )
    }

    /// Start a move of `steps` relative to the current position.
    pub fn begin_move(&mut self, steps: i32) {
        self.stepper.move_by(steps);
        self.state = MotionState::Moving;
    }

    /// Change the stepping speed. Applies in either state, from the next tick on.
    pub fn set_speed(&mut self, steps_per_sec: f32) {
        self.speed = steps_per_sec;
        self.stepper.set_speed(steps_per_sec);
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn state(&self) -> MotionState {
        self.state
    }

    #[inline]
    pub fn distance_to_go(&self) -> i32 {
        self.stepper.distance_to_go()
    }

    #[inline]
    pub fn position(&self) -> i32 {
        self.stepper.current_position()
    }

    /// Access the underlying stepper.
    #[inline]
    pub fn stepper(&self) -> &S {
        &self.stepper
    }

    /// Run one control tick.
    ///
    /// While moving this calls `Stepper::run` exactly once. The tick on which `run` reports the move
    /// over switches back to idle and returns the completion event; later ticks return `None` until
    /// the next move.
    pub fn advance(&mut self) -> Option<MotionEvent> {
        match self.state {
            MotionState::Idle => None,

            MotionState::Moving => {
                if self.stepper.run() {
                    return None;
                }
                self.state = MotionState::Idle;
                Some(MotionEvent::MoveCompleted {
                    position: self.stepper.current_position(),
                })
            }
        }
    }
}
