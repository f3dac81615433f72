//! Configuration type definitions
//!
//! Every `Default` reproduces the timing and constants the crane was
//! commissioned with, so a node runs correctly with no `crane.toml` at all.

use heapless::String;

/// Maximum length of configurable serial strings
pub const MAX_LINK_TEXT_LEN: usize = 24;

/// Stepper synchronisation settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SchedulerConfig {
    /// Delay numerator: `delay_ms = pulse_constant / |rps|`
    pub pulse_constant: f32,
    /// Rates with magnitude at or below this are treated as stopped (rps)
    pub epsilon: f32,
    /// Delay assumed for a stopped channel when sizing the cycle (ms)
    pub disabled_stand_in_ms: u16,
    /// Largest multiplier tried when searching for a common cycle
    pub search_factors: u8,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            pulse_constant: 5.0,
            epsilon: 0.02,
            disabled_stand_in_ms: 10,
            search_factors: 15,
        }
    }
}

/// Coordinator handshake timing
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandshakeConfig {
    /// How long acknowledgements are collected after the pings (ms)
    pub ack_window_ms: u32,
    /// How long the verdict LED stays lit (ms)
    pub report_hold_ms: u32,
    /// Finish as soon as both acks are in instead of waiting out the window
    pub complete_early: bool,
    /// Sleep between verification polls (ms)
    pub poll_interval_ms: u32,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            ack_window_ms: 7750,
            report_hold_ms: 5000,
            complete_early: false,
            poll_interval_ms: 10,
        }
    }
}

/// Bluetooth module identification
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    /// Identification request written at init
    pub request: String<MAX_LINK_TEXT_LEN>,
    /// Exact reply expected from a healthy module
    pub signature: String<MAX_LINK_TEXT_LEN>,
    /// UART baudrate
    pub baudrate: u32,
    /// How long to wait for any reply before declaring the module dead (ms)
    pub response_timeout_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        let mut request = String::new();
        let _ = request.push_str("AT+VERSION");
        let mut signature = String::new();
        let _ = signature.push_str("OKlinvorV1.8");
        Self {
            request,
            signature,
            baudrate: 9600,
            response_timeout_ms: 1000,
        }
    }
}

/// Gripper check performed after a successful verification
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GripperConfig {
    /// Angles visited in order (degrees)
    pub sweep: [u8; 3],
    /// Time spent at each angle (ms)
    pub step_ms: u32,
}

impl Default for GripperConfig {
    fn default() -> Self {
        Self {
            sweep: [10, 160, 0],
            step_ms: 1000,
        }
    }
}

/// Motion node verification
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionConfig {
    /// Run every motor both ways during verification
    ///
    /// The full test takes about 8.5 s, longer than the default ack
    /// window, so enabling it requires a wider `ack_window_ms` on the
    /// coordinator.
    pub self_test: bool,
    /// Duration of each self-test run (ms)
    pub run_ms: u32,
    /// Pause between self-test runs (ms)
    pub pause_ms: u32,
    /// Wait after resetting the rates, before acknowledging (ms)
    pub settle_ms: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            self_test: false,
            run_ms: 1000,
            pause_ms: 500,
            settle_ms: 1000,
        }
    }
}

/// Display node verification and status presentation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// All LEDs on at the start of verification (ms)
    pub starting_ms: u32,
    /// Number of progress bar ticks
    pub progress_ticks: u8,
    /// Time per progress tick (ms)
    pub tick_ms: u32,
    /// Tick after which the acknowledgement is pushed to the coordinator
    pub ack_tick: u8,
    /// Wait after the progress bar before reading the verdict (ms)
    pub settle_ms: u32,
    /// Verdict screen hold before the LED test (ms)
    pub verdict_hold_ms: u32,
    /// Time per colour in the LED test (ms)
    pub led_step_ms: u32,
    /// Supply voltage below which the status LED turns amber (V)
    pub low_voltage: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            starting_ms: 400,
            progress_ticks: 16,
            tick_ms: 600,
            ack_tick: 8,
            settle_ms: 4500,
            verdict_hold_ms: 2000,
            led_step_ms: 1000,
            low_voltage: 10.75,
        }
    }
}

/// Complete node configuration
///
/// All three nodes load the same file; each uses the sections for its role.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CraneConfig {
    pub scheduler: SchedulerConfig,
    pub handshake: HandshakeConfig,
    pub link: LinkConfig,
    pub gripper: GripperConfig,
    pub motion: MotionConfig,
    pub display: DisplayConfig,
}

impl CraneConfig {
    /// Create a configuration with the commissioned defaults
    pub fn new() -> Self {
        Self::default()
    }
}
