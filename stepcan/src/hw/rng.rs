// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pseudo-random source for the sender's test commands.
//!
//! A xorshift32 generator that stirs in the DWT cycle counter on every draw, so the sequence also
//! depends on loop timing. Not suitable for anything security related. Requires the cycle counter
//! to be running (see [`super::CycleClock::new`]).

use cortex_m::peripheral::DWT;
use rand_core::{impls, RngCore};

pub struct CycleRng {
    state: u32,
}

impl CycleRng {
    pub fn new(seed: u32) -> Self {
        // xorshift has a fixed point at zero
        Self {
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }
}

impl RngCore for CycleRng {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state ^ DWT::cycle_count().rotate_left(16);
        if x == 0 {
            x = 0x9E37_79B9;
        }
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst)
    }
}
