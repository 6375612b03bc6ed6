// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Sender and receiver talking over a loopback bus.

use rand_core::{impls, RngCore};

use stepcan::app::{ReceiverContext, Sender};
use stepcan::config::{ReceiverConfig, SenderConfig};
use stepcan::control::{MotionEvent, MotionState};
use stepcan::motors::SimStepper;
use stepcan::protocol::{Command, LoopbackBus, Transport};

struct ScriptedRng {
    values: Vec<u32>,
    next: usize,
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let v = self.values[self.next % self.values.len()];
        self.next += 1;
        v
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst)
    }
}

fn run_until_idle(rx: &mut ReceiverContext<SimStepper>, bus: &mut LoopbackBus<16>, log: &mut String, start: u32) -> u32 {
    let mut t = start;
    loop {
        let event = rx.tick(t, bus, log);
        t += 1;
        if matches!(event, Some(MotionEvent::MoveCompleted { .. })) || t - start > 10_000 {
            return t;
        }
    }
}

#[test]
fn generated_commands_drive_the_receiver() {
    let mut sender = Sender::new(SenderConfig::default());
    let mut rx = ReceiverContext::new(SimStepper::new(), &ReceiverConfig::default());
    let mut bus: LoopbackBus<16> = LoopbackBus::new();
    let mut tx_log = String::new();
    let mut rx_log = String::new();

    // MV 90, SP 300, MV -135
    let mut rng = ScriptedRng {
        values: vec![0, 270, 1, 250, 0, 45],
        next: 0,
    };

    assert!(sender.poll(2000, &mut rng, &mut bus, &mut tx_log).unwrap().is_ok());
    let t = run_until_idle(&mut rx, &mut bus, &mut rx_log, 2000);
    assert_eq!(rx.motion().position(), 400);
    assert_eq!(sender.expected_position(), 90);

    assert!(sender.poll(4000, &mut rng, &mut bus, &mut tx_log).unwrap().is_ok());
    rx.tick(t.max(4000), &mut bus, &mut rx_log);
    assert_eq!(rx.motion().speed(), 300.0);
    assert_eq!(rx.motion().state(), MotionState::Idle);

    assert!(sender.poll(6000, &mut rng, &mut bus, &mut tx_log).unwrap().is_ok());
    run_until_idle(&mut rx, &mut bus, &mut rx_log, 6000);
    assert_eq!(rx.motion().position(), -200);
    assert_eq!(sender.expected_position(), -45);

    assert_eq!(sender.messages_sent(), 3);
    assert_eq!(rx.stats().commands_applied, 3);
    assert_eq!(rx.stats().moves_completed, 2);
    assert!(tx_log.contains("Generated command: MV 90"));
    assert!(rx_log.contains("Speed set to: 300 steps/sec"));
}

#[test]
fn two_frame_command_survives_the_round_trip() {
    let mut sender = Sender::new(SenderConfig::default());
    let mut rx = ReceiverContext::new(SimStepper::new(), &ReceiverConfig::default());
    let mut bus: LoopbackBus<16> = LoopbackBus::new();
    let mut log = String::new();

    // "MV -22.5" is eight bytes; the padding space travels in a second frame.
    let report = sender.send_command(&mut bus, &Command::MoveRelative(-22.5), &mut log).unwrap();
    assert_eq!(report.frames_sent, 2);
    assert_eq!(bus.len(), 2);

    rx.tick(0, &mut bus, &mut log);
    assert_eq!(rx.motion().state(), MotionState::Idle);
    rx.tick(1, &mut bus, &mut log);
    assert_eq!(rx.motion().state(), MotionState::Moving);
    assert_eq!(rx.motion().distance_to_go(), -99);

    let report = sender.send_command(&mut bus, &Command::SetSpeed(123.456), &mut log).unwrap();
    assert_eq!(report.frames_sent, 2);
    rx.tick(20, &mut bus, &mut log);
    rx.tick(20, &mut bus, &mut log);
    assert_eq!(rx.motion().speed(), 123.456);
}

/// Loopback bus whose second transmission fails.
struct SecondFrameLost {
    inner: LoopbackBus<16>,
    calls: usize,
}

impl Transport for SecondFrameLost {
    type Error = &'static str;

    fn transmit(&mut self, frame: &bxcan::Frame) -> Result<(), Self::Error> {
        self.calls += 1;
        if self.calls == 2 {
            return Err("mailbox full");
        }
        self.inner.transmit(frame).map_err(|_| "loopback full")
    }

    fn receive(&mut self) -> nb::Result<bxcan::Frame, Self::Error> {
        self.inner.receive().map_err(|e| e.map(|_| "loopback error"))
    }
}

#[test]
fn aborted_message_does_not_move_the_motor() {
    let mut sender = Sender::new(SenderConfig::default());
    let mut rx = ReceiverContext::new(SimStepper::new(), &ReceiverConfig::default());
    let mut bus = SecondFrameLost {
        inner: LoopbackBus::new(),
        calls: 0,
    };
    let mut log = String::new();

    // "MV -1000" goes out, ".5" does not.
    assert!(sender
        .send_command(&mut bus, &Command::MoveRelative(-1000.5), &mut log)
        .is_err());
    assert_eq!(bus.inner.len(), 1);

    for t in 0..50 {
        rx.tick(t, &mut bus, &mut log);
    }
    assert_eq!(rx.stats().commands_applied, 0);
    assert_eq!(rx.stats().reassembly_errors, 1);
    assert_eq!(rx.motion().state(), MotionState::Idle);
    assert_eq!(rx.motion().position(), 0);
}

#[test]
fn interleaved_foreign_traffic_is_ignored() {
    let mut sender = Sender::new(SenderConfig::default());
    let mut rx = ReceiverContext::new(SimStepper::new(), &ReceiverConfig::default());
    let mut bus: LoopbackBus<16> = LoopbackBus::new();
    let mut log = String::new();

    let foreign = bxcan::Frame::new_data(
        bxcan::StandardId::new(0x200).unwrap(),
        bxcan::Data::new(b"MV 10").unwrap(),
    );
    bus.transmit(&foreign).unwrap();
    sender.send_command(&mut bus, &Command::MoveRelative(9.0), &mut log).unwrap();

    rx.tick(0, &mut bus, &mut log);
    rx.tick(1, &mut bus, &mut log);
    assert_eq!(rx.stats().frames_ignored, 1);
    assert_eq!(rx.motion().distance_to_go(), 39);
}
