// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Receiver node: bus frames in, stepper motion out.
//!
//! All receiver state lives in one [`ReceiverContext`] which the control loop passes to
//! [`ReceiverContext::tick`] on every iteration:
//!
//! ```ignore
//! let mut rx = ReceiverContext::new(stepper, &ReceiverConfig::default());
//! loop {
//!     rx.tick(clock.now_ms(), &mut can, &mut usart);
//! }
//! ```
//!
//! A tick handles at most one frame and then advances the motion controller once, so a busy bus
//! never starves the stepper.

use core::fmt::Write;

use bxcan::Frame;

use crate::config::ReceiverConfig;
use crate::control::{MotionController, MotionEvent};
use crate::motors::Stepper;
use crate::protocol::{
    degrees_to_steps, parse_bytes, Command, FrameWindow, ParseError, Reassembler, Transport,
};

/// Counters for bench diagnostics.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    /// Frames inside the identifier window.
    pub frames_accepted: u32,
    /// Frames for other nodes.
    pub frames_ignored: u32,
    pub transport_errors: u32,
    /// Segments dropped by the reassembler.
    pub reassembly_errors: u32,
    pub commands_applied: u32,
    pub commands_rejected: u32,
    pub moves_completed: u32,
}

/// Advance a diagnostic counter, wrapping at `u32::MAX`.
#[inline]
fn bump(counter: &mut u32) {
    *counter = counter.wrapping_add(1);
}

pub struct ReceiverContext<S: Stepper> {
    window: FrameWindow,
    steps_per_degree: f32,
    reassembler: Reassembler,
    motion: MotionController<S>,
    stats: ReceiverStats,
}

impl<S: Stepper> ReceiverContext<S> {
    pub fn new(stepper: S, config: &ReceiverConfig) -> Self {
        Self {
            window: config.window,
            steps_per_degree: config.steps_per_degree,
            reassembler: Reassembler::new(config.flush_timeout_ms),
            motion: MotionController::from_config(stepper, config),
            stats: ReceiverStats::default(),
        }
    }

    /// Print the startup banner.
    pub fn banner<W: Write>(&self, log: &mut W) {
        diag!(
            log,
            "Listening on CAN IDs 0x{:03X}..0x{:03X}",
            self.window.base(),
            self.window.base() + self.window.size() as u16 - 1
        );
        diag!(log, "Commands: SP <speed> (set speed), MV <degrees> (move degrees)");
    }

    /// One control-loop iteration: poll one frame, dispatch completed commands, advance motion.
    pub fn tick<T, W>(&mut self, now_ms: u32, bus: &mut T, log: &mut W) -> Option<MotionEvent>
    where
        T: Transport,
        W: Write,
    {
        match bus.receive() {
            Ok(frame) => self.handle_frame(&frame, now_ms, log),
            Err(nb::Error::WouldBlock) => {}
            Err(nb::Error::Other(e)) => {
                bump(&mut self.stats.transport_errors);
                diag!(log, "CAN receive error: {:?}", e);
            }
        }

        if let Err(e) = self.reassembler.poll_timeout(now_ms) {
            bump(&mut self.stats.reassembly_errors);
            diag!(log, "Dropped message: {}", e);
        }
        while let Some(msg) = self.reassembler.pop() {
            // Rejections are already logged and counted.
            let _ = self.handle_text(&msg, log);
        }

        let event = self.motion.advance();
        if let Some(MotionEvent::MoveCompleted { position }) = event {
            bump(&mut self.stats.moves_completed);
            diag!(log, "Move completed (position {} steps)", position);
        }
        event
    }

    /// Filter a received frame and feed it to the reassembler.
    pub fn handle_frame<W: Write>(&mut self, frame: &Frame, now_ms: u32, log: &mut W) {
        let (Some(index), Some(data)) = (self.window.segment_index(frame), frame.data()) else {
            bump(&mut self.stats.frames_ignored);
            return;
        };
        bump(&mut self.stats.frames_accepted);

        if let Err(e) = self.reassembler.push(index, data, now_ms) {
            bump(&mut self.stats.reassembly_errors);
            diag!(log, "Dropped message: {}", e);
        }
    }

    /// Parse and dispatch one complete command text.
    pub fn handle_text<W: Write>(&mut self, bytes: &[u8], log: &mut W) -> Result<Command, ParseError> {
        match core::str::from_utf8(bytes) {
            Ok(text) => diag!(log, "Received: {}", text),
            Err(_) => diag!(log, "Received {} non-text bytes", bytes.len()),
        }

        match parse_bytes(bytes) {
            Ok(cmd) => {
                self.dispatch(cmd, log);
                Ok(cmd)
            }
            Err(e) => {
                bump(&mut self.stats.commands_rejected);
                diag!(log, "Error: {}", e);
                Err(e)
            }
        }
    }

    /// Apply a parsed command to the motion controller.
    pub fn dispatch<W: Write>(&mut self, cmd: Command, log: &mut W) {
        bump(&mut self.stats.commands_applied);
        match cmd {
            Command::SetSpeed(v) => {
                self.motion.set_speed(v);
                diag!(log, "Speed set to: {} steps/sec", v);
            }
            Command::MoveRelative(degrees) => {
                let steps = degrees_to_steps(degrees, self.steps_per_degree);
                self.motion.begin_move(steps);
                diag!(log, "Moving {} degrees ({} steps)", degrees, steps);
            }
        }
    }

    #[inline]
    pub fn motion(&self) -> &MotionController<S> {
        &self.motion
    }

    #[inline]
    pub fn reassembler(&self) -> &Reassembler {
        &self.reassembler
    }

    #[inline]
    pub fn stats(&self) -> &ReceiverStats {
        &self.stats
    }
}
