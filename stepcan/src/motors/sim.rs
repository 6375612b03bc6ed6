// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Simulated stepper.
//!
//! Every `run()` call with distance left issues exactly one step, so tests can count ticks instead
//! of waiting on a clock.

use crate::motors::Stepper;

#[derive(Debug, Default, Clone)]
pub struct SimStepper {
    position: i32,
    target: i32,
    speed: f32,
    max_speed: f32,
    acceleration: f32,
    /// Total steps issued since creation.
    pub steps_issued: u32,
}

impl SimStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cruise speed.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    #[inline]
    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }
}

impl Stepper for SimStepper {
    fn set_max_speed(&mut self, steps_per_sec: f32) {
        self.max_speed = steps_per_sec;
        self.speed = self.speed.min(steps_per_sec);
    }

    fn set_acceleration(&mut self, steps_per_sec2: f32) {
        self.acceleration = steps_per_sec2;
    }

    fn set_speed(&mut self, steps_per_sec: f32) {
        self.speed = steps_per_sec.min(self.max_speed);
    }

    fn move_by(&mut self, steps: i32) {
        self.target = self.position.saturating_add(steps);
    }

    fn distance_to_go(&self) -> i32 {
        self.target - self.position
    }

    fn current_position(&self) -> i32 {
        self.position
    }

    fn run(&mut self) -> bool {
        let remaining = self.distance_to_go();
        if remaining == 0 {
            return false;
        }
        self.position += remaining.signum();
        self.steps_issued += 1;
        self.distance_to_go() != 0
    }
}
