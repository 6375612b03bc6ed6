// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Identifier window and sender-side segmentation.
//!
//! A command of `L` bytes is carried by `ceil(L / 8)` standard data frames. Segment `i` uses
//! identifier `base + i` and carries bytes `i*8 .. min(L, i*8 + 8)`. The receiver accepts
//! identifiers `base .. base + size` and ignores everything else on the bus.
//!
//! The final segment is always shorter than 8 bytes; that is how the receiver knows the message
//! is complete.

use core::fmt;
use core::slice::Chunks;

use bxcan::{Data, Frame, Id, StandardId};

use crate::config::{BASE_ID, WINDOW_SIZE};
use crate::protocol::messages::{MAX_COMMAND_LEN, MAX_FRAME_LEN};

/// Largest 11-bit identifier.
const MAX_STANDARD_ID: u16 = 0x7FF;

/// Range of consecutive standard identifiers owned by one logical message stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameWindow {
    base: u16,
    size: u8,
}

impl FrameWindow {
    /// `0x123`, four identifiers.
    pub const DEFAULT: Self = Self {
        base: BASE_ID,
        size: WINDOW_SIZE,
    };

    /// Create a window. Returns `None` if it is empty or leaves the 11-bit identifier space.
    pub const fn new(base: u16, size: u8) -> Option<Self> {
        if size == 0 || base as u32 + size as u32 - 1 > MAX_STANDARD_ID as u32 {
            return None;
        }
        Some(Self { base, size })
    }

    #[inline]
    pub fn base(&self) -> u16 {
        self.base
    }

    /// Number of identifiers, i.e. the maximum number of segments per message.
    #[inline]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Identifier of segment `index`, if it lies inside the window.
    pub fn id(&self, index: u8) -> Option<StandardId> {
        if index >= self.size {
            return None;
        }
        StandardId::new(self.base + index as u16)
    }

    /// Segment index of a received frame, or `None` if the frame is not ours.
    ///
    /// Extended identifiers and remote frames are never accepted.
    pub fn segment_index(&self, frame: &Frame) -> Option<u8> {
        if frame.is_remote_frame() {
            return None;
        }
        let raw = match frame.id() {
            Id::Standard(id) => id.as_raw(),
            Id::Extended(_) => return None,
        };
        let offset = raw.checked_sub(self.base)?;
        if offset < self.size as u16 {
            Some(offset as u8)
        } else {
            None
        }
    }
}

/// Reasons a command cannot be segmented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentError {
    /// Nothing to send.
    Empty,
    /// Longer than [`MAX_COMMAND_LEN`].
    TooLong(usize),
    /// Length is a multiple of the frame size, so the last segment would be full and the receiver
    /// could not tell the message had ended. [`Command::to_text`](crate::protocol::Command::to_text)
    /// pads such text.
    Unterminated(usize),
    /// Needs more segments than the window has identifiers.
    ExceedsWindow { segments: usize, window: u8 },
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentError::Empty => f.write_str("empty command"),
            SegmentError::TooLong(len) => {
                write!(f, "command is {} bytes, limit is {}", len, MAX_COMMAND_LEN)
            }
            SegmentError::Unterminated(len) => {
                write!(f, "command of {} bytes would end on a full frame", len)
            }
            SegmentError::ExceedsWindow { segments, window } => {
                write!(f, "command needs {} frames, window holds {}", segments, window)
            }
        }
    }
}

/// Iterator over the frames of one command, in transmission order.
pub struct Segments<'a> {
    chunks: Chunks<'a, u8>,
    window: FrameWindow,
    index: u8,
}

impl Iterator for Segments<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let chunk = self.chunks.next()?;
        let id = self.window.id(self.index)?;
        let data = Data::new(chunk)?;
        self.index += 1;
        Some(Frame::new_data(id, data))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

/// Split `text` into frames with identifiers starting at the window base.
pub fn segment(text: &[u8], window: FrameWindow) -> Result<Segments<'_>, SegmentError> {
    if text.is_empty() {
        return Err(SegmentError::Empty);
    }
    if text.len() > MAX_COMMAND_LEN {
        return Err(SegmentError::TooLong(text.len()));
    }
    if text.len() % MAX_FRAME_LEN == 0 {
        return Err(SegmentError::Unterminated(text.len()));
    }
    let segments = text.len().div_ceil(MAX_FRAME_LEN);
    if segments > window.size as usize {
        return Err(SegmentError::ExceedsWindow {
            segments,
            window: window.size,
        });
    }
    Ok(Segments {
        chunks: text.chunks(MAX_FRAME_LEN),
        window,
        index: 0,
    })
}
