// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Receiver-side reassembly of segmented commands.
//!
//! A segment shorter than 8 bytes ends the message; senders pad text so this always holds. After a
//! full segment the reassembler waits for segment `i + 1`. If a new segment 0 arrives instead, or
//! `flush_timeout_ms` passes without a continuation, the message was cut off and is dropped, never
//! executed.
//!
//! Completed messages are queued and taken with [`Reassembler::pop`].

use core::fmt;

use heapless::{Deque, Vec};

use crate::protocol::messages::{MAX_COMMAND_LEN, MAX_FRAME_LEN, MESSAGE_CAPACITY};

/// Reassembled command bytes.
pub type Message = Vec<u8, MESSAGE_CAPACITY>;

/// Reasons a pending message is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReassemblyError {
    /// Continuation segment with no message in progress.
    Orphan(u8),
    /// Continuation segment skipped or repeated an index.
    OutOfSequence { expected: u8, got: u8 },
    /// Message grew past [`MAX_COMMAND_LEN`].
    TooLong,
    /// Message ended on a full segment and its continuation never came; `received` bytes dropped.
    Incomplete { received: usize },
}

impl fmt::Display for ReassemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReassemblyError::Orphan(i) => write!(f, "segment {} without a message start", i),
            ReassemblyError::OutOfSequence { expected, got } => {
                write!(f, "expected segment {}, got {}", expected, got)
            }
            ReassemblyError::TooLong => {
                write!(f, "command longer than {} bytes", MAX_COMMAND_LEN)
            }
            ReassemblyError::Incomplete { received } => {
                write!(f, "command cut off after {} bytes", received)
            }
        }
    }
}

pub struct Reassembler {
    buf: Message,
    /// Index of the segment that would extend `buf`; 0 while nothing is pending.
    next_index: u8,
    last_segment_ms: u32,
    flush_timeout_ms: u32,
    completed: Deque<Message, 2>,
}

impl Reassembler {
    pub fn new(flush_timeout_ms: u32) -> Self {
        Self {
            buf: Message::new(),
            next_index: 0,
            last_segment_ms: 0,
            flush_timeout_ms,
            completed: Deque::new(),
        }
    }

    /// Feed one accepted segment.
    ///
    /// On error the pending message (if any) is dropped. The segment is ignored too, except for
    /// [`ReassemblyError::Incomplete`]: that reports the message interrupted by this segment 0,
    /// which still starts a new one.
    pub fn push(&mut self, index: u8, payload: &[u8], now_ms: u32) -> Result<(), ReassemblyError> {
        let mut interrupted = None;
        if index == 0 {
            if self.is_pending() {
                interrupted = Some(self.cut_off());
            }
        } else if !self.is_pending() {
            return Err(ReassemblyError::Orphan(index));
        } else if index != self.next_index {
            let expected = self.next_index;
            self.discard();
            return Err(ReassemblyError::OutOfSequence {
                expected,
                got: index,
            });
        }

        if self.buf.extend_from_slice(payload).is_err() || self.buf.len() > MAX_COMMAND_LEN {
            self.discard();
            return Err(ReassemblyError::TooLong);
        }

        if payload.len() < MAX_FRAME_LEN {
            self.finish();
        } else {
            self.next_index = index.saturating_add(1);
            self.last_segment_ms = now_ms;
        }

        match interrupted {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Drop a pending message whose continuation did not arrive within the flush timeout.
    pub fn poll_timeout(&mut self, now_ms: u32) -> Result<(), ReassemblyError> {
        if self.is_pending() && now_ms.wrapping_sub(self.last_segment_ms) >= self.flush_timeout_ms {
            return Err(self.cut_off());
        }
        Ok(())
    }

    /// Take the oldest completed message.
    pub fn pop(&mut self) -> Option<Message> {
        self.completed.pop_front()
    }

    /// Whether a message is waiting for a continuation segment.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.next_index != 0
    }

    /// Bytes of the message in progress.
    #[inline]
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    fn finish(&mut self) {
        self.next_index = 0;
        let msg = core::mem::take(&mut self.buf);
        if !msg.is_empty() {
            // At most two messages complete per push, and the receiver drains after every push.
            let _ = self.completed.push_back(msg);
        }
    }

    fn discard(&mut self) {
        self.next_index = 0;
        self.buf.clear();
    }

    fn cut_off(&mut self) -> ReassemblyError {
        let received = self.buf.len();
        self.discard();
        ReassemblyError::Incomplete { received }
    }
}
