// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Sender node: puts a random `SP`/`MV` test command on the bus every two seconds.

#![no_main]
#![no_std]

use cortex_m::peripheral::DWT;
use cortex_m_rt::entry;
use panic_halt as _;

use hal::{
    can::Can,
    pac,
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use stepcan::app::Sender;
use stepcan::config::SenderConfig;
use stepcan::hw::{can::BTR_500K_16MHZ, usart::BAUD_RATE, CanBus, CycleClock, CycleRng, NodePins, Usart};

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let mut cp = cortex_m::Peripherals::take().unwrap();

    // Clocks (HSI, 16 MHz)
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    let pins = NodePins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD, dp.GPIOE);
    let mut led = pins.led;

    // USART3 (ST-LINK VCP)
    let usart_cfg = Config {
        baud_rate: BAUD_RATE.bps(),
        ..Default::default()
    };
    let serial = Serial::new(dp.USART3, (pins.usart3.tx, pins.usart3.rx), &clocks, usart_cfg);
    let mut usart = Usart::new(serial);

    let mut clock = CycleClock::new(&mut cp.DCB, &mut cp.DWT, clocks.sysclk().raw());

    // CAN1, 500 kbit/s
    let can1 = Can::new(dp.CAN1, &mut rcc.apb1, (pins.can1.tx, pins.can1.rx));
    let mut can = CanBus::new(can1, BTR_500K_16MHZ);

    let mut sender = Sender::new(SenderConfig::default());

    usart.println("StepCAN sender ready");
    let mut rng = CycleRng::new(DWT::cycle_count());

    loop {
        let now = clock.now_ms();
        if let Some(Ok(_)) = sender.poll(now, &mut rng, &mut can, &mut usart) {
            led.toggle();
        }
    }
}
