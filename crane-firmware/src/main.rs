//! Crane - Three-node crane controller firmware
//!
//! One image per node. The role (coordinator, motion or display) is chosen
//! by cargo feature; all three share the bus handling, the mailbox and the
//! verification protocol from `crane-core`.
//!
//! Two executors run: the thread executor owns the node task, which blocks
//! while it steps motors or waits out verification timings, and a
//! higher-priority interrupt executor owns the bus receive task so inbound
//! messages are never starved.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output, Pin};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::i2c_slave::{self, I2cSlave};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::I2C1;
use embassy_rp::Peri;
use {defmt_rtt as _, panic_probe as _};

use crane_hal_rp2040::{RpI2c, RpOutput};

mod channels;
mod config;
mod roles;
mod tasks;

#[cfg(feature = "coordinator")]
bind_interrupts!(struct Irqs {
    I2C1_IRQ => i2c::InterruptHandler<I2C1>;
    UART0_IRQ => embassy_rp::uart::BufferedInterruptHandler<embassy_rp::peripherals::UART0>;
});

#[cfg(not(feature = "coordinator"))]
bind_interrupts!(struct Irqs {
    I2C1_IRQ => i2c::InterruptHandler<I2C1>;
});

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Crane firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();
    let address = roles::address();

    // Bus controller for sends
    let bus: roles::Bus = RpI2c::new(I2c::new_blocking(
        p.I2C0,
        p.PIN_5,
        p.PIN_4,
        i2c::Config::default(),
    ));

    // Bus target for receives, on the same wires
    let mut target_config = i2c_slave::Config::default();
    target_config.addr = address.get() as u16;
    let target = I2cSlave::new(p.I2C1, p.PIN_7, p.PIN_6, Irqs, target_config);

    info!("I2C bus initialized, node address {}", address.get());

    #[cfg(feature = "coordinator")]
    let node = {
        use embassy_rp::pwm::Pwm;
        use embassy_rp::uart::{Config as UartConfig, Uart};
        use static_cell::StaticCell;

        // Static cells for UART buffers (must live forever)
        static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
        static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

        let mut uart_config = UartConfig::default();
        uart_config.baudrate = config.link.baudrate;
        let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config).into_buffered(
            Irqs,
            TX_BUF.init([0u8; 64]),
            RX_BUF.init([0u8; 64]),
        );

        let servo = Pwm::new_output_a(p.PWM_SLICE6, p.PIN_12, Default::default());

        roles::build(
            bus,
            &config,
            roles::CoordinatorHw {
                relay: output(p.PIN_8),
                green_led: output(p.PIN_9),
                red_led: output(p.PIN_10),
                uart: crane_hal_rp2040::RpUart::new(uart),
                servo: crane_hal_rp2040::ServoPwm::new(servo),
            },
        )
    };

    #[cfg(feature = "motion")]
    let node = {
        use crane_drivers::stepper::StepperPins;

        roles::build(
            bus,
            &config,
            [
                StepperPins {
                    step: output(p.PIN_10),
                    dir: output(p.PIN_11),
                    enable: output(p.PIN_12),
                },
                StepperPins {
                    step: output(p.PIN_13),
                    dir: output(p.PIN_14),
                    enable: output(p.PIN_15),
                },
                StepperPins {
                    step: output(p.PIN_16),
                    dir: output(p.PIN_17),
                    enable: output(p.PIN_18),
                },
            ],
        )
    };

    #[cfg(feature = "display")]
    let node = {
        use crane_drivers::display::LcdPins;

        roles::build(
            bus,
            &config,
            LcdPins {
                rs: output(p.PIN_8),
                en: output(p.PIN_9),
                data: [
                    output(p.PIN_10),
                    output(p.PIN_11),
                    output(p.PIN_12),
                    output(p.PIN_13),
                ],
            },
            [output(p.PIN_14), output(p.PIN_15), output(p.PIN_16)],
        )
    };

    // Bus receive on the high-priority executor
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high_spawner.spawn(tasks::bus_rx_task(target)).unwrap();

    spawner.spawn(tasks::node_task(node)).unwrap();

    info!("All tasks spawned, firmware running");
}

/// Push-pull output, initially low
fn output(pin: Peri<'static, impl Pin>) -> RpOutput {
    RpOutput::new(Output::new(pin, Level::Low))
}
