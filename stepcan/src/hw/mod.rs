// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! MCU-level peripheral wrappers (STM32F767, feature `stm32`).

pub mod can;
pub mod clock;
pub mod pins;
pub mod rng;
pub mod usart;

pub use can::{CanBus, CanError};
pub use clock::CycleClock;
pub use pins::NodePins;
pub use rng::CycleRng;
pub use usart::Usart;
