// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Controller Area Network (CAN) abstraction layer.
//!
//! - `CanBus` wraps a HAL `can::Can` instance in `bxcan::Can`.
//! - Implements [`Transport`] so the node logic can run on it unchanged.
//!
//! Both calls are non-blocking. Identifier filtering is left to the receiver, so the hardware
//! filter is opened up completely by [`CanBus::accept_all`].

use bxcan::{self, filter::Mask32, Fifo, Frame};
use stm32f7xx_hal::can as hal_can;

use crate::protocol::Transport;

/// Bit timing for 500 kbit/s with a 16 MHz APB1 clock (sample point 87.5%).
pub const BTR_500K_16MHZ: u32 = 0x001C_0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanError {
    /// All three transmit mailboxes are busy.
    MailboxFull,
    /// A queued frame of lower priority was pulled out of its mailbox to make room.
    Displaced,
    /// The receive FIFO overflowed and at least one frame was lost.
    Overrun,
}

/// Wrapper around a bxcan CAN instance built from a HAL CAN peripheral.
pub struct CanBus<I>
where
    hal_can::Can<I>: bxcan::Instance,
{
    can: bxcan::Can<hal_can::Can<I>>,
}

impl<I> CanBus<I>
where
    hal_can::Can<I>: bxcan::Instance,
{
    /// Create and enable a bxcan instance from a HAL CAN peripheral.
    ///
    /// * `hal_can` – the HAL CAN wrapper
    /// * `btr` – value for the CAN_BTR register (bit timing), e.g. [`BTR_500K_16MHZ`]
    pub fn new(hal_can: hal_can::Can<I>, btr: u32) -> Self {
        let can = bxcan::Can::builder(hal_can)
            .set_bit_timing(btr)
            .enable();

        Self { can }
    }
}

/// Filter setup for the instance that owns the filter banks (CAN1 on STM32F7).
impl<I> CanBus<I>
where
    hal_can::Can<I>: bxcan::Instance + bxcan::FilterOwner,
{
    /// Route every frame on the bus to FIFO0.
    pub fn accept_all(&mut self) {
        self.can
            .modify_filters()
            .enable_bank(0, Fifo::Fifo0, Mask32::accept_all());
    }
}

impl<I> Transport for CanBus<I>
where
    hal_can::Can<I>: bxcan::Instance,
{
    type Error = CanError;

    fn transmit(&mut self, frame: &Frame) -> Result<(), CanError> {
        match self.can.transmit(frame) {
            Ok(status) if status.dequeued_frame().is_some() => Err(CanError::Displaced),
            Ok(_) => Ok(()),
            Err(nb::Error::WouldBlock) => Err(CanError::MailboxFull),
            Err(nb::Error::Other(never)) => match never {},
        }
    }

    fn receive(&mut self) -> nb::Result<Frame, CanError> {
        self.can.receive().map_err(|e| e.map(|_overrun| CanError::Overrun))
    }
}
