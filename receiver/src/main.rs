// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Receiver node: executes `SP`/`MV` commands from the bus on a STEP/DIR stepper driver.

#![no_main]
#![no_std]

use cortex_m_rt::entry;
use panic_halt as _;

use hal::{
    can::Can,
    pac,
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use stepcan::app::ReceiverContext;
use stepcan::config::ReceiverConfig;
use stepcan::drivers::StepDir;
use stepcan::hw::{can::BTR_500K_16MHZ, usart::BAUD_RATE, CanBus, CycleClock, NodePins, Usart};

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
    can.accept_all();

    let stepper = StepDir::new(pins.stepper.step, pins.stepper.dir, clock);
    let mut rx = ReceiverContext::new(stepper, &ReceiverConfig::default());

    usart.println("StepCAN receiver ready");
    rx.banner(&mut usart);

    loop {
        let now = clock.now_ms();
        if rx.tick(now, &mut can, &mut usart).is_some() {
            led.toggle();
        }
    }
}
