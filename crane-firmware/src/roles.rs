//! Node role selection
//!
//! The role is fixed per image by cargo feature. Each builder takes the
//! already-configured peripherals its role drives.
//!
//! Pin map (RP2040):
//!
//! | Function            | Pins                                  |
//! |---------------------|---------------------------------------|
//! | Bus controller I2C0 | SDA 4, SCL 5                          |
//! | Bus target I2C1     | SDA 6, SCL 7 (wired to 4/5)           |
//! | Coordinator         | HC-06 UART0 TX 0 / RX 1, relay 8, green 9, red 10, servo 12 |
//! | Motion              | motor n: step 10+3(n-1), dir +1, enable +2 |
//! | Display             | LCD RS 8, E 9, D4-D7 10-13; LED R 14, G 15, B 16 |

use embassy_rp::peripherals::I2C0;

use crane_core::node::Node;
use crane_hal_rp2040::{EmbassyTimer, RpI2c};
use crane_protocol::NodeAddress;

#[cfg(not(any(feature = "coordinator", feature = "motion", feature = "display")))]
compile_error!("enable one of the `coordinator`, `motion` or `display` features");

#[cfg(any(
    all(feature = "coordinator", feature = "motion"),
    all(feature = "coordinator", feature = "display"),
    all(feature = "motion", feature = "display"),
))]
compile_error!("only one node role feature may be enabled");

/// Mailbox slots per node
pub const MAILBOX_CAPACITY: usize = 16;

/// Bus controller shared by every role
pub type Bus = RpI2c<I2C0>;

#[cfg(feature = "coordinator")]
pub use coordinator::*;
#[cfg(feature = "display")]
pub use display::*;
#[cfg(feature = "motion")]
pub use motion::*;

/// The node this image runs
pub type CraneNode = Node<ActiveRole, Bus, EmbassyTimer, MAILBOX_CAPACITY>;

/// Bus address of the active role
pub fn address() -> NodeAddress {
    use crane_core::node::RoleBehavior;
    <ActiveRole as RoleBehavior>::ADDRESS
}

#[cfg(feature = "coordinator")]
mod coordinator {
    use crane_core::config::CraneConfig;
    use crane_core::node::{CoordinatorIo, CoordinatorRole, Node};
    use crane_drivers::gripper::ServoGripper;
    use crane_drivers::link::Hc06;
    use crane_hal_rp2040::{EmbassyTimer, RpOutput, RpUart, ServoPwm};

    use super::{Bus, CraneNode};

    pub type ActiveRole = CoordinatorRole<RpOutput, Hc06<RpUart>, ServoGripper<ServoPwm>>;

    pub struct CoordinatorHw {
        pub relay: RpOutput,
        pub green_led: RpOutput,
        pub red_led: RpOutput,
        pub uart: RpUart,
        pub servo: ServoPwm,
    }

    pub fn build(bus: Bus, config: &CraneConfig, hw: CoordinatorHw) -> CraneNode {
        let io = CoordinatorIo {
            relay: hw.relay,
            green_led: hw.green_led,
            red_led: hw.red_led,
            link: Hc06::new(hw.uart),
            gripper: ServoGripper::new(hw.servo),
        };
        let role = CoordinatorRole::new(
            io,
            config.handshake.clone(),
            config.link.clone(),
            config.gripper.clone(),
        );
        Node::new(role, bus, EmbassyTimer)
    }
}

#[cfg(feature = "motion")]
mod motion {
    use crane_core::config::CraneConfig;
    use crane_core::node::{MotionRole, Node};
    use crane_drivers::stepper::{GpioStepperBank, StepperPins};
    use crane_hal_rp2040::{EmbassyTimer, RpOutput};

    use super::{Bus, CraneNode};

    pub type ActiveRole = MotionRole<GpioStepperBank<RpOutput, EmbassyTimer>>;

    pub fn build(bus: Bus, config: &CraneConfig, motors: [StepperPins<RpOutput>; 3]) -> CraneNode {
        let outputs = GpioStepperBank::new(motors, EmbassyTimer);
        let role = MotionRole::new(outputs, config.scheduler.clone(), config.motion.clone());
        Node::new(role, bus, EmbassyTimer)
    }
}

#[cfg(feature = "display")]
mod display {
    use crane_core::config::CraneConfig;
    use crane_core::node::{DisplayRole, Node};
    use crane_drivers::display::{CharLcd, LcdPins};
    use crane_drivers::indicator::RgbIndicator;
    use crane_hal_rp2040::{EmbassyTimer, RpOutput};

    use super::{Bus, CraneNode};

    pub type ActiveRole = DisplayRole<CharLcd<RpOutput, EmbassyTimer>, RgbIndicator<RpOutput>>;

    pub fn build(
        bus: Bus,
        config: &CraneConfig,
        lcd: LcdPins<RpOutput>,
        led: [RpOutput; 3],
    ) -> CraneNode {
        let mut lcd = CharLcd::new(lcd, EmbassyTimer);
        lcd.init();
        let [red, green, blue] = led;
        let role = DisplayRole::new(lcd, RgbIndicator::new(red, green, blue), config.display.clone());
        Node::new(role, bus, EmbassyTimer)
    }
}
