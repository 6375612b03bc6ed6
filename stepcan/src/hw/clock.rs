// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Monotonic time from the Cortex-M DWT cycle counter.
//!
//! The 32-bit counter wraps every few seconds at full core speed, so `CycleClock` must be polled
//! at least once per wrap period. Copies track wraps independently, so one copy can live inside a
//! driver while the control loop keeps another.

use cortex_m::peripheral::{DCB, DWT};

use crate::drivers::Monotonic;

#[derive(Clone, Copy)]
pub struct CycleClock {
    cycles_per_us: u32,
    last: u32,
    /// Cycles accumulated across counter wraps.
    total: u64,
}

impl CycleClock {
    /// Enable the cycle counter and start counting from zero.
    pub fn new(dcb: &mut DCB, dwt: &mut DWT, sysclk_hz: u32) -> Self {
        dcb.enable_trace();
        dwt.enable_cycle_counter();
        dwt.set_cycle_count(0);
        Self {
            cycles_per_us: (sysclk_hz / 1_000_000).max(1),
            last: 0,
            total: 0,
        }
    }

    fn cycles(&mut self) -> u64 {
        let now = DWT::cycle_count();
        self.total += now.wrapping_sub(self.last) as u64;
        self.last = now;
        self.total
    }

    /// Milliseconds since start, wrapping after ~49 days.
    pub fn now_ms(&mut self) -> u32 {
        (self.now_us() / 1000) as u32
    }
}

impl Monotonic for CycleClock {
    fn now_us(&mut self) -> u64 {
        self.cycles() / self.cycles_per_us as u64
    }
}
