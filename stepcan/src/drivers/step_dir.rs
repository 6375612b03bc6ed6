// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! STEP/DIR stepper driver (A4988, DRV8825, TMC2208 in legacy mode, ...).
//!
//! Pulses are generated from `run()` by comparing a microsecond clock against the current step
//! interval, so the call never waits. A STEP pulse spans calls: one `run()` raises the pin and a
//! later one lowers it once [`MIN_PULSE_US`] has passed, and the pin then stays low for at least
//! as long before the next rising edge. The speed follows a trapezoidal ramp: it starts from the
//! speed reachable in the first step, accelerates towards the cruise speed and decelerates once
//! the remaining distance is within the stopping distance `v² / 2a`.

use embedded_hal::digital::v2::OutputPin;
use micromath::F32Ext;

use crate::motors::Stepper;

/// Slowest speed the ramp will drop to before the target, in steps per second.
const MIN_SPEED: f32 = 1.0;

/// Minimum STEP high and low time in microseconds (DRV8825: 1.9 µs, A4988: 1 µs).
pub const MIN_PULSE_US: u64 = 2;

/// Free-running microsecond clock.
pub trait Monotonic {
    fn now_us(&mut self) -> u64;
}

pub struct StepDir<STEP, DIR, CLK> {
    step: STEP,
    dir: DIR,
    clock: CLK,

    position: i32,
    target: i32,

    max_speed: f32,
    acceleration: f32,
    /// Requested cruise speed (steps/s)
    cruise: f32,

    /// Current speed magnitude, 0 while at rest
    speed: f32,
    forward: bool,
    last_step_us: u64,

    step_high: bool,
    /// Time of the last STEP transition, `None` before the first pulse
    last_edge_us: Option<u64>,
}

impl<STEP, DIR, CLK> StepDir<STEP, DIR, CLK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    CLK: Monotonic,
{
    /// Create a driver at position 0. Both pins are driven low.
    pub fn new(mut step: STEP, mut dir: DIR, clock: CLK) -> Self {
        step.set_low().ok();
        dir.set_low().ok();
        Self {
            step,
            dir,
            clock,
            position: 0,
            target: 0,
            max_speed: MIN_SPEED,
            acceleration: 0.0,
            cruise: MIN_SPEED,
            speed: 0.0,
            forward: true,
            last_step_us: 0,
            step_high: false,
            last_edge_us: None,
        }
    }

    /// Current speed magnitude in steps per second.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Consume the driver and return the pins and clock.
    pub fn free(self) -> (STEP, DIR, CLK) {
        (self.step, self.dir, self.clock)
    }

    fn ceiling(&self) -> f32 {
        self.cruise.min(self.max_speed).max(MIN_SPEED)
    }

    /// Speed after the first step from rest.
    fn start_speed(&self) -> f32 {
        if self.acceleration <= 0.0 {
            return self.ceiling();
        }
        // First step period c0 = 0.676 * sqrt(2 / a) (Austin's approximation).
        let v0 = 1.0 / (0.676 * F32Ext::sqrt(2.0 / self.acceleration));
        v0.clamp(MIN_SPEED, self.ceiling())
    }

    fn interval_us(&self) -> u64 {
        (1_000_000.0 / self.speed) as u64
    }

    /// Whether STEP changed level less than [`MIN_PULSE_US`] before `now`.
    fn edge_too_recent(&self, now: u64) -> bool {
        self.last_edge_us
            .is_some_and(|t| now.wrapping_sub(t) < MIN_PULSE_US)
    }

    fn raise_step(&mut self, now: u64) {
        self.step.set_high().ok();
        self.step_high = true;
        self.last_edge_us = Some(now);
    }

    fn lower_step(&mut self, now: u64) {
        self.step.set_low().ok();
        self.step_high = false;
        self.last_edge_us = Some(now);
    }

    fn set_direction(&mut self, forward: bool) {
        if forward {
            self.dir.set_high().ok();
        } else {
            self.dir.set_low().ok();
        }
        self.forward = forward;
    }

    /// Adjust the speed after a step for the remaining distance.
    fn update_speed(&mut self) {
        let remaining = self.distance_to_go().unsigned_abs() as f32;
        let ceiling = self.ceiling();
        if self.acceleration <= 0.0 {
            self.speed = ceiling;
            return;
        }
        let dv = self.acceleration / self.speed;
        let stopping = self.speed * self.speed / (2.0 * self.acceleration);

        self.speed = if remaining <= stopping || self.speed > ceiling {
            (self.speed - dv).max(MIN_SPEED)
        } else {
            (self.speed + dv).min(ceiling)
        };
    }
}

impl<STEP, DIR, CLK> Stepper for StepDir<STEP, DIR, CLK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    CLK: Monotonic,
{
    fn set_max_speed(&mut self, steps_per_sec: f32) {
        self.max_speed = steps_per_sec.max(MIN_SPEED);
    }

    fn set_acceleration(&mut self, steps_per_sec2: f32) {
        self.acceleration = steps_per_sec2.max(0.0);
    }

    fn set_speed(&mut self, steps_per_sec: f32) {
        self.cruise = steps_per_sec.max(MIN_SPEED);
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
        let now = self.clock.now_us();
        if self.step_high {
            if self.edge_too_recent(now) {
                return true;
            }
            self.lower_step(now);
        }

        let remaining = self.distance_to_go();
        if remaining == 0 {
            self.speed = 0.0;
            return false;
        }
        if self.edge_too_recent(now) {
            return true;
        }

        let forward = remaining > 0;
        if self.speed == 0.0 || forward != self.forward {
            // Starting from rest, or the new target is behind us.
            self.speed = self.start_speed();
            self.set_direction(forward);
        } else if now.wrapping_sub(self.last_step_us) < self.interval_us() {
            return true;
        }

        self.raise_step(now);
        self.position += if forward { 1 } else { -1 };
        self.last_step_us = now;

        // Stay `true` until the final pulse has been lowered.
        if self.distance_to_go() == 0 {
            self.speed = 0.0;
        } else {
            self.update_speed();
        }
        true
    }
}
