// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Motion primitive interface.
//!
//! Positions and distances are in motor steps; speeds in steps per second; acceleration in steps
//! per second squared. The acceleration profile is up to the implementation.

pub trait Stepper {
    /// Velocity ceiling.
    fn set_max_speed(&mut self, steps_per_sec: f32);

    fn set_acceleration(&mut self, steps_per_sec2: f32);

    /// Cruise speed for subsequent stepping, clamped to the velocity ceiling.
    fn set_speed(&mut self, steps_per_sec: f32);

    /// Retarget to `steps` away from the current position, replacing any unfinished move.
    ///
    /// The absolute position is never reset.
    fn move_by(&mut self, steps: i32);

    /// Signed steps left until the target is reached.
    fn distance_to_go(&self) -> i32;

    /// Absolute position in steps.
    fn current_position(&self) -> i32;

    /// Issue at most one step if one is due. Must return immediately.
    ///
    /// Returns `true` while the motor still has distance to go or its last step is still being
    /// output. `false` means the move is over.
    fn run(&mut self) -> bool;
}
