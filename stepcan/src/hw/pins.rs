// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for a StepCAN node on the NUCLEO-F767ZI board.
//!
//! Sender and receiver share one pinout; the sender simply leaves the stepper pins idle.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, gpiod, gpioe, Alternate, Output, PushPull},
    pac,
    prelude::*,
};

/// All node pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = NodePins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD, dp.GPIOE);
/// ```
pub struct NodePins {
    pub led: gpiob::PB7<Output<PushPull>>,
    pub usart3: Usart3Pins,
    pub can1: Can1Pins,
    pub stepper: StepperPins,
}

/// USART3, routed to the ST-LINK virtual COM port
pub struct Usart3Pins {
    pub tx: gpiod::PD8<Alternate<7>>,
    pub rx: gpiod::PD9<Alternate<7>>,
}

/// CAN1 bus pins
pub struct Can1Pins {
    pub tx: gpioa::PA12<Alternate<9>>,
    pub rx: gpioa::PA11<Alternate<9>>,
}

/// STEP/DIR driver inputs
pub struct StepperPins {
    pub step: gpioe::PE9<Output<PushPull>>,
    pub dir: gpioe::PE11<Output<PushPull>>,
}

impl NodePins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpiod: pac::GPIOD, gpioe: pac::GPIOE) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();

        Self {
            led: gpiob.pb7.into_push_pull_output(),

            usart3: Usart3Pins {
                tx: gpiod.pd8.into_alternate::<7>(),
                rx: gpiod.pd9.into_alternate::<7>(),
            },

            can1: Can1Pins {
                tx: gpioa.pa12.into_alternate::<9>(),
                rx: gpioa.pa11.into_alternate::<9>().internal_pull_up(true),
            },

            stepper: StepperPins {
                step: gpioe.pe9.into_push_pull_output(),
                dir: gpioe.pe11.into_push_pull_output(),
            },
        }
    }
}
