// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Sender node: periodically emits random test commands onto the bus.
//!
//! Each period one command is generated, half the time a relative move and half the time a speed
//! change, rendered as text, split into frames and transmitted. The sender never hears back from
//! the receiver, so it keeps its own estimate of the shaft angle.

use core::fmt::{self, Write};

use rand_core::RngCore;

use crate::config::{SendPolicy, SenderConfig};
use crate::protocol::{segment, Command, SegmentError, Transport, MAX_COMMAND_LEN};

#[derive(Debug, PartialEq)]
pub enum SendError<E> {
    /// The rendered command exceeds [`MAX_COMMAND_LEN`] bytes.
    Format,
    Segment(SegmentError),
    /// Transmission of segment `index` failed and the rest of the message was abandoned.
    Transport { index: u8, error: E },
}

impl<E> From<SegmentError> for SendError<E> {
    fn from(e: SegmentError) -> Self {
        SendError::Segment(e)
    }
}

impl<E: fmt::Debug> fmt::Display for SendError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Format => write!(f, "command text longer than {} bytes", MAX_COMMAND_LEN),
            SendError::Segment(e) => write!(f, "{}", e),
            SendError::Transport { index, error } => {
                write!(f, "frame {} not sent: {:?}", index, error)
            }
        }
    }
}

/// Outcome of one message that was not aborted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SendReport {
    pub frames_sent: u8,
    /// Only non-zero under [`SendPolicy::BestEffort`].
    pub frames_failed: u8,
}

impl SendReport {
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.frames_failed == 0
    }
}

pub struct Sender {
    config: SenderConfig,
    /// Estimated shaft angle in degrees, kept in (-180, 180].
    expected_position: i32,
    last_send_ms: u32,
    messages_sent: u32,
    messages_failed: u32,
}

impl Sender {
    pub fn new(config: SenderConfig) -> Self {
        Self {
            config,
            expected_position: 0,
            last_send_ms: 0,
            messages_sent: 0,
            messages_failed: 0,
        }
    }

    #[inline]
    pub fn expected_position(&self) -> i32 {
        self.expected_position
    }

    /// Messages whose every frame was accepted by the transport.
    #[inline]
    pub fn messages_sent(&self) -> u32 {
        self.messages_sent
    }

    #[inline]
    pub fn messages_failed(&self) -> u32 {
        self.messages_failed
    }

    /// Pick the next test command.
    ///
    /// Moves update the expected position as soon as they are generated.
    pub fn generate<R: RngCore, W: Write>(&mut self, rng: &mut R, log: &mut W) -> Command {
        if rng.next_u32() % 2 == 0 {
            let degrees = pick(rng, self.config.move_range_deg);
            self.expected_position = normalize_degrees(self.expected_position + degrees);
            diag!(
                log,
                "Command type: MOVE (expected position {} degrees)",
                self.expected_position
            );
            Command::MoveRelative(degrees as f32)
        } else {
            diag!(log, "Command type: SPEED");
            Command::SetSpeed(pick(rng, self.config.speed_range) as f32)
        }
    }

    /// Render, segment and transmit one command.
    pub fn send_command<T, W>(
        &mut self,
        bus: &mut T,
        cmd: &Command,
        log: &mut W,
    ) -> Result<SendReport, SendError<T::Error>>
    where
        T: Transport,
        W: Write,
    {
        let text = cmd.to_text().map_err(|_| SendError::Format)?;
        let frames = segment(text.as_bytes(), self.config.window)?;
        diag!(log, "Generated command: {}", text);

        let base = self.config.window.base();
        let mut report = SendReport::default();
        for (index, frame) in frames.enumerate() {
            let index = index as u8;
            let id = base + index as u16;
            let payload = frame
                .data()
                .and_then(|d| core::str::from_utf8(d).ok())
                .unwrap_or("");
            match bus.transmit(&frame) {
                Ok(()) => {
                    report.frames_sent += 1;
                    diag!(log, "Sent CAN frame {} (ID 0x{:03X}): {}", index, id, payload);
                }
                Err(error) => {
                    report.frames_failed += 1;
                    diag!(
                        log,
                        "CAN transmit failed for frame {} (ID 0x{:03X}) \"{}\": {:?}",
                        index,
                        id,
                        payload,
                        error
                    );
                    if self.config.policy == SendPolicy::AbortMessage {
                        self.messages_failed += 1;
                        diag!(log, "Message abandoned");
                        return Err(SendError::Transport { index, error });
                    }
                }
            }
        }

        if report.is_complete() {
            self.messages_sent += 1;
        } else {
            self.messages_failed += 1;
        }
        diag!(log, "Total messages sent: {}", self.messages_sent);
        Ok(report)
    }

    /// Send a fresh command once `send_interval_ms` has passed since the previous one.
    ///
    /// Returns `None` when it is not yet time. The interval is measured from the last send
    /// attempt whatever its outcome, with wrapping arithmetic on `now_ms`.
    pub fn poll<R, T, W>(
        &mut self,
        now_ms: u32,
        rng: &mut R,
        bus: &mut T,
        log: &mut W,
    ) -> Option<Result<SendReport, SendError<T::Error>>>
    where
        R: RngCore,
        T: Transport,
        W: Write,
    {
        if now_ms.wrapping_sub(self.last_send_ms) < self.config.send_interval_ms {
            return None;
        }
        self.last_send_ms = now_ms;

        let cmd = self.generate(rng, log);
        let result = self.send_command(bus, &cmd, log);
        if let Err(e) = &result {
            diag!(log, "Send failed: {}", e);
        }
        diag!(log, "---");
        Some(result)
    }
}

/// Uniform-ish integer in the inclusive range `(lo, hi)`.
fn pick<R: RngCore>(rng: &mut R, (lo, hi): (i32, i32)) -> i32 {
    let span = hi.abs_diff(lo).saturating_add(1);
    lo.min(hi).wrapping_add((rng.next_u32() % span) as i32)
}

/// Wrap an angle into (-180, 180].
fn normalize_degrees(degrees: i32) -> i32 {
    let d = degrees.rem_euclid(360);
    if d > 180 {
        d - 360
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bxcan::Frame;

    /// Replays a fixed sequence of values.
    struct ScriptedRng {
        values: Vec<u32>,
        next: usize,
    }

    impl ScriptedRng {
        fn new(values: &[u32]) -> Self {
            Self {
                values: values.to_vec(),
                next: 0,
            }
        }
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            let v = self.values[self.next % self.values.len()];
            self.next += 1;
            v
        }

        fn next_u64(&mut self) -> u64 {
            self.next_u32() as u64
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            rand_core::impls::fill_bytes_via_next(self, dst)
        }
    }

    /// Records frames and fails the transmissions listed in `fail_on` (by call number).
    #[derive(Default)]
    struct FlakyBus {
        sent: Vec<Frame>,
        calls: usize,
        fail_on: Vec<usize>,
    }

    impl Transport for FlakyBus {
        type Error = &'static str;

        fn transmit(&mut self, frame: &Frame) -> Result<(), Self::Error> {
            let call = self.calls;
            self.calls += 1;
            if self.fail_on.contains(&call) {
                return Err("mailbox full");
            }
            self.sent.push(frame.clone());
            Ok(())
        }

        fn receive(&mut self) -> nb::Result<Frame, Self::Error> {
            Err(nb::Error::WouldBlock)
        }
    }

    fn sender(policy: SendPolicy) -> Sender {
        Sender::new(SenderConfig {
            policy,
            ..SenderConfig::default()
        })
    }

    #[test]
    fn normalizes_into_half_open_range() {
        assert_eq!(normalize_degrees(180), 180);
        assert_eq!(normalize_degrees(-180), 180);
        assert_eq!(normalize_degrees(181), -179);
        assert_eq!(normalize_degrees(270), -90);
        assert_eq!(normalize_degrees(-360), 0);
        assert_eq!(normalize_degrees(0), 0);
    }

    #[test]
    fn generates_moves_and_tracks_position() {
        let mut s = sender(SendPolicy::AbortMessage);
        let mut log = String::new();
        let mut rng = ScriptedRng::new(&[0, 270, 0, 360]);

        assert_eq!(s.generate(&mut rng, &mut log), Command::MoveRelative(90.0));
        assert_eq!(s.expected_position(), 90);
        assert_eq!(s.generate(&mut rng, &mut log), Command::MoveRelative(180.0));
        assert_eq!(s.expected_position(), -90);
        assert!(log.contains("expected position -90 degrees"));
    }

    #[test]
    fn generates_speeds_within_range() {
        let mut s = sender(SendPolicy::AbortMessage);
        let mut log = String::new();
        let mut rng = ScriptedRng::new(&[1, 150, 3, 450, 5, 451]);

        assert_eq!(s.generate(&mut rng, &mut log), Command::SetSpeed(200.0));
        assert_eq!(s.generate(&mut rng, &mut log), Command::SetSpeed(500.0));
        assert_eq!(s.generate(&mut rng, &mut log), Command::SetSpeed(50.0));
        assert_eq!(s.expected_position(), 0);
    }

    #[test]
    fn sends_short_command_in_one_frame() {
        let mut s = sender(SendPolicy::AbortMessage);
        let mut bus = FlakyBus::default();
        let mut log = String::new();

        let report = s.send_command(&mut bus, &Command::MoveRelative(-45.0), &mut log).unwrap();
        assert_eq!(report, SendReport { frames_sent: 1, frames_failed: 0 });
        assert_eq!(bus.sent.len(), 1);
        assert_eq!(&bus.sent[0].data().unwrap()[..], b"MV -45");
        assert_eq!(s.messages_sent(), 1);
        assert!(log.contains("Sent CAN frame 0 (ID 0x123)"));
    }

    #[test]
    fn long_command_spans_consecutive_ids() {
        let mut s = sender(SendPolicy::AbortMessage);
        let mut bus = FlakyBus::default();
        let mut log = String::new();

        let report = s.send_command(&mut bus, &Command::SetSpeed(123.456), &mut log).unwrap();
        assert_eq!(report.frames_sent, 2);
        assert_eq!(&bus.sent[0].data().unwrap()[..], b"SP 123.4");
        assert_eq!(&bus.sent[1].data().unwrap()[..], b"56");
        assert!(log.contains("Sent CAN frame 1 (ID 0x124)"));
    }

    #[test]
    fn eight_byte_text_gets_a_terminating_frame() {
        let mut s = sender(SendPolicy::AbortMessage);
        let mut bus = FlakyBus::default();
        let mut log = String::new();

        let report = s.send_command(&mut bus, &Command::MoveRelative(-22.5), &mut log).unwrap();
        assert_eq!(report.frames_sent, 2);
        assert_eq!(&bus.sent[0].data().unwrap()[..], b"MV -22.5");
        assert_eq!(&bus.sent[1].data().unwrap()[..], b" ");
    }

    #[test]
    fn abort_policy_stops_at_first_failure() {
        let mut s = sender(SendPolicy::AbortMessage);
        let mut bus = FlakyBus {
            fail_on: vec![0],
            ..FlakyBus::default()
        };
        let mut log = String::new();

        let err = s.send_command(&mut bus, &Command::SetSpeed(123.456), &mut log).unwrap_err();
        assert_eq!(err, SendError::Transport { index: 0, error: "mailbox full" });
        assert_eq!(bus.calls, 1);
        assert!(bus.sent.is_empty());
        assert_eq!(s.messages_sent(), 0);
        assert_eq!(s.messages_failed(), 1);
        assert!(log.contains("CAN transmit failed for frame 0 (ID 0x123)"));
    }

    #[test]
    fn best_effort_policy_sends_remaining_frames() {
        let mut s = sender(SendPolicy::BestEffort);
        let mut bus = FlakyBus {
            fail_on: vec![0],
            ..FlakyBus::default()
        };
        let mut log = String::new();

        let report = s.send_command(&mut bus, &Command::SetSpeed(123.456), &mut log).unwrap();
        assert_eq!(report, SendReport { frames_sent: 1, frames_failed: 1 });
        assert!(!report.is_complete());
        assert_eq!(bus.calls, 2);
        assert_eq!(&bus.sent[0].data().unwrap()[..], b"56");
        assert_eq!(s.messages_failed(), 1);
    }

    #[test]
    fn oversized_command_is_not_sent() {
        let mut s = sender(SendPolicy::AbortMessage);
        let mut bus = FlakyBus::default();
        let mut log = String::new();

        let err = s.send_command(&mut bus, &Command::SetSpeed(1.0e20), &mut log).unwrap_err();
        assert_eq!(err, SendError::Format);
        assert_eq!(bus.calls, 0);
    }

    #[test]
    fn poll_waits_for_interval() {
        let mut s = sender(SendPolicy::AbortMessage);
        let mut bus = FlakyBus::default();
        let mut rng = ScriptedRng::new(&[1, 50]);
        let mut log = String::new();

        assert!(s.poll(0, &mut rng, &mut bus, &mut log).is_none());
        assert!(s.poll(1999, &mut rng, &mut bus, &mut log).is_none());
        assert!(s.poll(2000, &mut rng, &mut bus, &mut log).is_some());
        assert!(s.poll(3999, &mut rng, &mut bus, &mut log).is_none());
        assert!(s.poll(4100, &mut rng, &mut bus, &mut log).is_some());
        assert_eq!(s.messages_sent(), 2);
        assert_eq!(&bus.sent[0].data().unwrap()[..], b"SP 100");
    }

    #[test]
    fn poll_interval_survives_clock_wrap() {
        let mut s = sender(SendPolicy::AbortMessage);
        let mut bus = FlakyBus::default();
        let mut rng = ScriptedRng::new(&[1, 0]);
        let mut log = String::new();

        assert!(s.poll(u32::MAX - 500, &mut rng, &mut bus, &mut log).is_some());
        assert!(s.poll(1000, &mut rng, &mut bus, &mut log).is_none());
        assert!(s.poll(1500, &mut rng, &mut bus, &mut log).is_some());
    }
}
