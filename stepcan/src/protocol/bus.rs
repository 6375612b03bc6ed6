// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Bus transport interface.
//!
//! Reception is a non-blocking poll using `nb` semantics:
//!
//! - `Ok(frame)` - a frame was pending
//! - `Err(nb::Error::WouldBlock)` - nothing pending, not an error
//! - `Err(nb::Error::Other(e))` - transport error

use core::fmt;

use bxcan::Frame;
use heapless::Deque;

/// A broadcast bus carrying standard CAN data frames.
pub trait Transport {
    type Error: fmt::Debug;

    /// Queue one frame for transmission.
    fn transmit(&mut self, frame: &Frame) -> Result<(), Self::Error>;

    /// Poll for one received frame.
    fn receive(&mut self) -> nb::Result<Frame, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopbackError {
    /// No room left in the queue.
    Full,
}

/// In-memory bus: every transmitted frame is received back in order.
///
/// Used for host tests and for wiring a sender straight into a receiver.
pub struct LoopbackBus<const N: usize> {
    queue: Deque<Frame, N>,
}

impl<const N: usize> LoopbackBus<N> {
    pub fn new() -> Self {
        Self {
            queue: Deque::new(),
        }
    }

    /// Number of frames waiting to be received.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<const N: usize> Default for LoopbackBus<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Transport for LoopbackBus<N> {
    type Error = LoopbackError;

    fn transmit(&mut self, frame: &Frame) -> Result<(), LoopbackError> {
        self.queue
            .push_back(frame.clone())
            .map_err(|_| LoopbackError::Full)
    }

    fn receive(&mut self) -> nb::Result<Frame, LoopbackError> {
        self.queue.pop_front().ok_or(nb::Error::WouldBlock)
    }
}
