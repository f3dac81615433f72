//! HD44780 16x2 character LCD in 4-bit mode
//!
//! Register select, enable and data lines 4-7 are plain GPIO outputs. The
//! status layout follows the display node's screen:
//!
//! ```text
//!  col 0         3           14
//! row 0 [battery]  [law]       [link]
//! row 1 [status text]      [h] [v]
//! ```

use crane_core::state::{ControlLaw, MotionIndicator, StatusSnapshot};
use crane_core::traits::{DisplayError, StatusDisplay};
use crane_hal::{Delay, OutputPin};

/// Visible columns
pub const COLUMNS: u8 = 16;

/// Visible rows
pub const ROWS: u8 = 2;

/// DDRAM address of the first column of each row
const ROW_OFFSETS: [u8; ROWS as usize] = [0x00, 0x40];

/// Full block in the character ROM
const BLOCK: u8 = 0xFF;

/// Link animation frames while not connected
const LINK_FRAMES: [u8; 4] = [b'.', b'o', b'O', b'o'];

/// HD44780 instructions
mod cmd {
    pub const CLEAR: u8 = 0x01;
    /// Increment cursor, no shift
    pub const ENTRY_MODE: u8 = 0x06;
    /// Display on, cursor off, blink off
    pub const DISPLAY_ON: u8 = 0x0C;
    /// 4-bit bus, 2 lines, 5x8 font
    pub const FUNCTION_SET: u8 = 0x28;
    pub const SET_DDRAM: u8 = 0x80;
}

/// Pins of a 4-bit LCD interface
pub struct LcdPins<P> {
    pub rs: P,
    pub en: P,
    /// D4..D7
    pub data: [P; 4],
}

/// HD44780 driver
pub struct CharLcd<P, W> {
    pins: LcdPins<P>,
    delay: W,
}

impl<P: OutputPin, W: Delay> CharLcd<P, W> {
    pub fn new(pins: LcdPins<P>, delay: W) -> Self {
        Self { pins, delay }
    }

    /// Power-on initialisation into 4-bit, two-line mode
    pub fn init(&mut self) {
        self.delay.delay_ms(50);
        self.pins.rs.set_low();
        self.pins.en.set_low();

        // Three 8-bit function sets resynchronise the nibble phase
        self.write_nibble(0x03);
        self.delay.delay_ms(5);
        self.write_nibble(0x03);
        self.delay.delay_ms(5);
        self.write_nibble(0x03);
        self.delay.delay_us(150);
        self.write_nibble(0x02);

        self.command(cmd::FUNCTION_SET);
        self.command(cmd::DISPLAY_ON);
        self.clear();
        self.command(cmd::ENTRY_MODE);
    }

    pub fn clear(&mut self) {
        self.command(cmd::CLEAR);
    }

    /// Move the cursor; positions off the screen are clamped
    pub fn set_cursor(&mut self, col: u8, row: u8) {
        let row = row.min(ROWS - 1) as usize;
        let col = col.min(COLUMNS - 1);
        self.command(cmd::SET_DDRAM | (ROW_OFFSETS[row] + col));
    }

    /// Write text at the cursor
    pub fn write_str(&mut self, text: &str) {
        for byte in text.bytes() {
            self.write_byte(byte, true);
        }
    }

    /// Write one character code at the cursor
    pub fn write_char(&mut self, code: u8) {
        self.write_byte(code, true);
    }

    fn command(&mut self, instruction: u8) {
        self.write_byte(instruction, false);
        // Clear needs 1.52 ms, the rest finish within the nibble timing
        if instruction == cmd::CLEAR {
            self.delay.delay_ms(2);
        }
    }

    fn write_byte(&mut self, byte: u8, data: bool) {
        self.pins.rs.set_state(data);
        self.write_nibble(byte >> 4);
        self.write_nibble(byte & 0x0F);
    }

    fn write_nibble(&mut self, nibble: u8) {
        for (bit, pin) in self.pins.data.iter_mut().enumerate() {
            pin.set_state(nibble & (1 << bit) != 0);
        }
        self.pins.en.set_high();
        self.delay.delay_us(1);
        self.pins.en.set_low();
        self.delay.delay_us(50);
    }

    /// Write at most `width` bytes of `text` from the start of `row`
    fn write_row(&mut self, row: u8, text: &str, width: u8) {
        self.set_cursor(0, row);
        let end = text.len().min(width as usize);
        for &byte in &text.as_bytes()[..end] {
            self.write_char(byte);
        }
    }
}

/// Battery gauge digit for a supply voltage (0 at 10 V, 9 from 14.5 V)
pub fn battery_level(voltage: f32) -> u8 {
    let half_volts = (voltage * 2.0) as i32;
    (half_volts - 20).clamp(0, 9) as u8
}

/// Horizontal motion glyph
pub fn horizontal_glyph(indicator: MotionIndicator) -> u8 {
    match indicator {
        MotionIndicator::FarNegative => b'<',
        MotionIndicator::Negative => b'(',
        MotionIndicator::Neutral => b'|',
        MotionIndicator::Positive => b')',
        MotionIndicator::FarPositive => b'>',
    }
}

/// Vertical motion glyph
pub fn vertical_glyph(indicator: MotionIndicator) -> u8 {
    match indicator {
        MotionIndicator::FarNegative => b'_',
        MotionIndicator::Negative => b',',
        MotionIndicator::Neutral => b'-',
        MotionIndicator::Positive => b'\'',
        MotionIndicator::FarPositive => b'^',
    }
}

fn law_label(law: ControlLaw) -> &'static str {
    match law {
        ControlLaw::Direct => "Direct",
        ControlLaw::Normal => "",
        ControlLaw::Precision => "Prec.",
    }
}

impl<P: OutputPin, W: Delay> StatusDisplay for CharLcd<P, W> {
    fn show_message(&mut self, top: &str, bottom: &str) -> Result<(), DisplayError> {
        self.clear();
        self.write_row(0, top, COLUMNS);
        self.write_row(1, bottom, COLUMNS);
        Ok(())
    }

    fn show_progress(&mut self, tick: u8) -> Result<(), DisplayError> {
        if tick < COLUMNS {
            self.set_cursor(tick, 1);
            self.write_char(BLOCK);
        }
        Ok(())
    }

    fn render(&mut self, snapshot: &StatusSnapshot, frame: u8) -> Result<(), DisplayError> {
        self.clear();

        self.set_cursor(0, 0);
        self.write_char(b'0' + battery_level(snapshot.voltage));

        self.set_cursor(3, 0);
        self.write_str(law_label(snapshot.law));

        self.set_cursor(14, 0);
        if snapshot.link_connected {
            self.write_str("BT");
        } else {
            self.write_char(LINK_FRAMES[frame as usize % LINK_FRAMES.len()]);
        }

        // Columns 13-15 hold the motion glyphs
        self.write_row(1, &snapshot.text, 13);

        self.set_cursor(13, 1);
        self.write_char(horizontal_glyph(snapshot.horizontal));
        self.set_cursor(15, 1);
        self.write_char(vertical_glyph(snapshot.vertical));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::string::String;
    use std::vec::Vec;

    #[derive(Clone, Copy)]
    enum Line {
        Rs,
        En,
        Data(usize),
    }

    /// Decodes pin activity back into LCD contents
    #[derive(Default)]
    struct Panel {
        rs: bool,
        en: bool,
        data: [bool; 4],
        nibbles: Vec<(bool, u8)>,
    }

    impl Panel {
        fn latch(&mut self) {
            let nibble = self
                .data
                .iter()
                .enumerate()
                .fold(0, |acc, (bit, &high)| acc | ((high as u8) << bit));
            self.nibbles.push((self.rs, nibble));
        }

        /// Screen rows after replaying every byte after the init nibbles
        fn rows(&self) -> [String; 2] {
            let mut ddram = [b' '; 0x80];
            let mut cursor = 0usize;
            for pair in self.nibbles[4..].chunks(2) {
                let (rs, high) = pair[0];
                let byte = (high << 4) | pair[1].1;
                if rs {
                    ddram[cursor] = byte;
                    cursor += 1;
                } else if byte == cmd::CLEAR {
                    ddram = [b' '; 0x80];
                    cursor = 0;
                } else if byte & cmd::SET_DDRAM != 0 {
                    cursor = (byte & 0x7F) as usize;
                }
            }
            let row = |offset: usize| {
                ddram[offset..offset + COLUMNS as usize]
                    .iter()
                    .map(|&b| if b == BLOCK { '#' } else { b as char })
                    .collect()
            };
            [row(0x00), row(0x40)]
        }
    }

    struct PanelPin {
        line: Line,
        high: bool,
        panel: Rc<RefCell<Panel>>,
    }

    impl OutputPin for PanelPin {
        fn set_high(&mut self) {
            self.high = true;
            let mut panel = self.panel.borrow_mut();
            match self.line {
                Line::Rs => panel.rs = true,
                Line::En => panel.en = true,
                Line::Data(i) => panel.data[i] = true,
            }
        }

        fn set_low(&mut self) {
            self.high = false;
            let mut panel = self.panel.borrow_mut();
            match self.line {
                Line::Rs => panel.rs = false,
                Line::En => {
                    if panel.en {
                        panel.latch();
                    }
                    panel.en = false;
                }
                Line::Data(i) => panel.data[i] = false,
            }
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    struct NoDelay;

    impl Delay for NoDelay {
        fn delay_ms(&mut self, _ms: u32) {}
        fn delay_us(&mut self, _us: u32) {}
    }

    fn lcd() -> (CharLcd<PanelPin, NoDelay>, Rc<RefCell<Panel>>) {
        let panel = Rc::new(RefCell::new(Panel::default()));
        let pin = |line| PanelPin {
            line,
            high: false,
            panel: panel.clone(),
        };
        let pins = LcdPins {
            rs: pin(Line::Rs),
            en: pin(Line::En),
            data: [
                pin(Line::Data(0)),
                pin(Line::Data(1)),
                pin(Line::Data(2)),
                pin(Line::Data(3)),
            ],
        };
        let mut lcd = CharLcd::new(pins, NoDelay);
        lcd.init();
        (lcd, panel)
    }

    #[test]
    fn test_init_sequence() {
        let (_, panel) = lcd();
        let panel = panel.borrow();
        let init: Vec<u8> = panel.nibbles[..4].iter().map(|&(_, n)| n).collect();
        assert_eq!(init, [0x03, 0x03, 0x03, 0x02]);
        // FUNCTION_SET split into nibbles
        assert_eq!(panel.nibbles[4], (false, 0x2));
        assert_eq!(panel.nibbles[5], (false, 0x8));
    }

    #[test]
    fn test_message_and_progress() {
        let (mut lcd, panel) = lcd();
        lcd.show_message("I2C: PASS", "HC-06: OK").unwrap();
        assert_eq!(panel.borrow().rows(), ["I2C: PASS       ", "HC-06: OK       "]);

        lcd.show_message("Starting...", "").unwrap();
        lcd.show_progress(0).unwrap();
        lcd.show_progress(1).unwrap();
        lcd.show_progress(16).unwrap();
        assert_eq!(panel.borrow().rows()[1], "##              ");
    }

    #[test]
    fn test_long_rows_are_cut() {
        let (mut lcd, panel) = lcd();
        lcd.show_message("0123456789abcdefXYZ", "").unwrap();
        assert_eq!(panel.borrow().rows()[0], "0123456789abcdef");
    }

    #[test]
    fn test_render_status_layout() {
        let (mut lcd, panel) = lcd();
        let mut snapshot = StatusSnapshot::default();
        snapshot.voltage = 11.6;
        snapshot.law = ControlLaw::Precision;
        snapshot.horizontal = MotionIndicator::FarNegative;
        snapshot.vertical = MotionIndicator::Positive;
        snapshot.text.push_str("Standby").unwrap();

        lcd.render(&snapshot, 2).unwrap();
        assert_eq!(panel.borrow().rows(), ["3  Prec.      O ", "Standby      < '"]);

        snapshot.link_connected = true;
        lcd.render(&snapshot, 2).unwrap();
        assert_eq!(panel.borrow().rows()[0], "3  Prec.      BT");
    }

    #[test]
    fn test_battery_level_clamps() {
        assert_eq!(battery_level(9.0), 0);
        assert_eq!(battery_level(10.75), 1);
        assert_eq!(battery_level(12.4), 4);
        assert_eq!(battery_level(14.0), 8);
        assert_eq!(battery_level(14.5), 9);
        assert_eq!(battery_level(24.0), 9);
    }
}
