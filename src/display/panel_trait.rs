//! Trait abstraction for the status panel to enable testing

use crate::error::Result;

/// Text-cell drawing surface for the operator status panel.
///
/// Drawing is buffered: `clear` and `draw_text` mutate an off-screen image
/// and nothing reaches the hardware until `flush`. Coordinates are character
/// cells, column 0-20 and row 0-7 on the 128x64 panel.
pub trait DisplayPanel: Send {
    /// Blank the off-screen buffer.
    fn clear(&mut self);

    /// Write a text run starting at the given character cell.
    ///
    /// Text running past the right edge is cut off; unsupported characters
    /// render as blank cells.
    fn draw_text(&mut self, col: u8, row: u8, text: &str);

    /// Push the buffer to the hardware.
    ///
    /// # Errors
    ///
    /// Returns an error when the bus write fails. The buffer is left
    /// intact, so a later flush can still succeed.
    fn flush(&mut self) -> Result<()>;

    /// Replace the whole screen with an error banner.
    fn show_error(&mut self, message: &str) -> Result<()> {
        self.clear();
        self.draw_text(0, 0, "ERROR");
        self.draw_text(0, 2, message);
        self.flush()
    }
}
