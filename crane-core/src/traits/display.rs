//! Character display trait for the display node

use crate::state::StatusSnapshot;

/// Errors that can occur with display communication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Controller did not respond
    Timeout,
    /// Bus error while writing
    Communication,
}

/// The display collaborator
///
/// Glyph design and screen layout stay in the implementation; the node
/// logic only decides *what* to show.
pub trait StatusDisplay {
    /// Replace the screen with two lines of text
    fn show_message(&mut self, top: &str, bottom: &str) -> Result<(), DisplayError>;

    /// Draw one tick of the verification progress bar
    ///
    /// - `tick`: position of the tick (0-15)
    fn show_progress(&mut self, tick: u8) -> Result<(), DisplayError>;

    /// Draw the operating screen from a status snapshot
    ///
    /// - `frame`: connection animation frame (0-3), used while the
    ///   bluetooth link is not connected
    fn render(&mut self, snapshot: &StatusSnapshot, frame: u8) -> Result<(), DisplayError>;
}
