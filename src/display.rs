//! The text-mode display surface: a character-cell cursor mapped onto the SSD1306's
//! pixel-addressed display RAM.
//!
//! The text grid is derived from the pixel geometry: each character cell is the font's glyph
//! width plus one padding column, cells are laid out after a one-pixel left margin, and each
//! RAM page holds one text row. For the built-in 5x7 font on a 128x64 module this comes to 21
//! columns by 8 rows, with one unused pixel column before the cells and two after them.

use core::fmt;

use crate::command::consts::*;
use crate::command::{AddressMode, Command};
use crate::config::Config;
use crate::font::Font;
use crate::interface;

/// Pixel columns of margin before the first glyph cell of each row.
pub const LEFT_MARGIN_COLS: u8 = 1;

/// A text-mode driver for the display.
///
/// Owns the logical text cursor. Every operation leaves the controller's auto-incrementing
/// RAM address pointer positioned at the cursor's cell, so that consecutive glyph writes need
/// no re-addressing; keeping the logical cursor and the hardware pointer in lockstep is the
/// load-bearing invariant of this type.
pub struct TextDisplay<DI, F> {
    iface: DI,
    font: F,
    cursor_col: u8,
    cursor_row: u8,
}

impl<DI, F> TextDisplay<DI, F>
where
    DI: interface::DisplayInterface,
    F: Font,
{
    /// Width of one character cell in pixel columns: the glyph plus its padding column.
    const CELL_COLS: u8 = F::GLYPH_COLS + 1;
    /// Number of character columns that fit in a row after the left margin.
    const CHAR_COLS: u8 = (NUM_PIXEL_COLS - LEFT_MARGIN_COLS) / Self::CELL_COLS;
    /// Pixel columns left unused at the right edge of each row.
    const ROW_TRAILING_COLS: u8 =
        NUM_PIXEL_COLS - LEFT_MARGIN_COLS - Self::CHAR_COLS * Self::CELL_COLS;

    /// Maximum addressable character column.
    pub const CHAR_COL_MAX: u8 = Self::CHAR_COLS - 1;
    /// Maximum addressable character row. Rows map 1:1 to RAM pages.
    pub const CHAR_ROW_MAX: u8 = PAGE_MAX;

    /// Construct a new text display over the interface `iface`, rendering with `font`. The
    /// display is not touched until `init` is called.
    pub fn new(iface: DI, font: F) -> Self {
        TextDisplay {
            iface: iface,
            font: font,
            cursor_col: 0,
            cursor_row: 0,
        }
    }

    /// Bring up the display: turn it off, blank the entire display RAM, transmit the
    /// initialization sequence encoded in `config`, and turn it back on. On return the
    /// display is active and blank and the cursor is at (0, 0).
    ///
    /// Bus faults are not detected beyond the transport's own reporting; a display that
    /// ignores the sequence cannot be distinguished from one that applied it.
    pub fn init(&mut self, config: Config) -> Result<(), ()> {
        self.cursor_col = 0;
        self.cursor_row = 0;
        Command::SetDisplayOn(false).send(&mut self.iface)?;
        self.clear()?;
        Command::SetMuxRatio(NUM_PIXEL_ROWS).send(&mut self.iface)?;
        Command::SetDisplayOffset(0).send(&mut self.iface)?;
        Command::SetStartLine(0).send(&mut self.iface)?;
        Command::SetAddressMode(AddressMode::Horizontal).send(&mut self.iface)?;
        config.send(&mut self.iface)?;
        Command::SetDisplayOn(true).send(&mut self.iface)
    }

    /// Zero the entire display RAM.
    ///
    /// The RAM address pointer is reset to the origin and one margin's worth of bytes beyond
    /// a full RAM of zeroes is written: the auto-incrementing pointer wraps back to the
    /// origin, and the remainder parks it on the first glyph cell boundary. The logical
    /// cursor does not move; callers that rely on it afterwards should follow up with
    /// `set_cursor`.
    pub fn clear(&mut self) -> Result<(), ()> {
        Command::SetColumnStartLow(0).send(&mut self.iface)?;
        Command::SetColumnStartHigh(0).send(&mut self.iface)?;
        Command::SetPageStart(0).send(&mut self.iface)?;

        let zeros = [0u8; 32];
        let mut remaining = NUM_GDDRAM_BYTES as usize + LEFT_MARGIN_COLS as usize;
        while remaining > 0 {
            let chunk = remaining.min(zeros.len());
            self.iface.send_data(&zeros[..chunk])?;
            remaining -= chunk;
        }
        Ok(())
    }

    /// Move the text cursor to character cell (`col`, `row`), setting the RAM address
    /// pointer to the cell's first pixel column.
    ///
    /// Out-of-range coordinates are silently ignored: nothing is sent and the cursor stays
    /// where it was.
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), ()> {
        if col > Self::CHAR_COL_MAX || row > Self::CHAR_ROW_MAX {
            return Ok(());
        }
        let pixel_col = LEFT_MARGIN_COLS + Self::CELL_COLS * col;
        Command::SetColumnStartLow(pixel_col & 0x0F).send(&mut self.iface)?;
        Command::SetColumnStartHigh(pixel_col >> 4).send(&mut self.iface)?;
        Command::SetPageStart(row).send(&mut self.iface)?;
        self.cursor_col = col;
        self.cursor_row = row;
        Ok(())
    }

    /// Character column the cursor is on.
    pub fn cursor_col(&self) -> u8 {
        self.cursor_col
    }

    /// Character row the cursor is on.
    pub fn cursor_row(&self) -> u8 {
        self.cursor_row
    }

    /// Write one byte to the display at the cursor and advance it.
    ///
    /// Carriage return moves the cursor to the start of the current row and line feed moves
    /// it down one row (wrapping from the bottom row back to the top); neither writes any
    /// pixels. Codes the font does not cover render as its blank replacement glyph.
    /// Everything else renders as its glyph followed by the cell's padding column. Writing
    /// the last column of a row wraps the cursor to the start of the next row, zeroing the
    /// intervening margin pixels.
    ///
    /// Returns the number of bytes consumed, which is always 1.
    pub fn write_byte(&mut self, byte: u8) -> Result<usize, ()> {
        match byte {
            b'\r' => self.set_cursor(0, self.cursor_row)?,
            b'\n' => self.set_cursor(self.cursor_col, (self.cursor_row + 1) % NUM_PAGES)?,
            _ => self.write_glyph(byte)?,
        }
        Ok(1)
    }

    /// Write a buffer of bytes, applying `write_byte`'s interpretation to each in turn.
    /// Returns the number of bytes consumed, which is always the whole buffer.
    pub fn write_bytes(&mut self, buf: &[u8]) -> Result<usize, ()> {
        let mut consumed = 0;
        for &byte in buf {
            consumed += self.write_byte(byte)?;
        }
        Ok(consumed)
    }

    /// Control sleep mode.
    pub fn sleep(&mut self, enabled: bool) -> Result<(), ()> {
        Command::SetDisplayOn(!enabled).send(&mut self.iface)
    }

    /// Set the display contrast.
    pub fn contrast(&mut self, contrast: u8) -> Result<(), ()> {
        Command::SetContrast(contrast).send(&mut self.iface)
    }

    /// Control display polarity inversion.
    pub fn invert(&mut self, enabled: bool) -> Result<(), ()> {
        Command::SetInvert(enabled).send(&mut self.iface)
    }

    fn write_glyph(&mut self, code: u8) -> Result<(), ()> {
        let code = if code < F::FIRST_CODE || code > F::LAST_CODE {
            F::REPLACEMENT_CODE
        } else {
            code
        };
        let glyph = self.font.glyph(code);
        self.iface.send_data(glyph)?;
        // The padding column closes the cell.
        self.iface.send_data(&[0x00])?;

        self.cursor_col += 1;
        if self.cursor_col > Self::CHAR_COL_MAX {
            // Zero out the trailing right margin and the next row's left margin. The
            // auto-incrementing pointer crosses the page boundary within this run and lands
            // on the next row's first cell, so no re-addressing command is needed for the
            // hardware to stay in lockstep with the wrap below.
            for _ in 0..Self::ROW_TRAILING_COLS + LEFT_MARGIN_COLS {
                self.iface.send_data(&[0x00])?;
            }
            self.cursor_col = 0;
            self.cursor_row = (self.cursor_row + 1) % NUM_PAGES;
        }
        Ok(())
    }
}

/// Formatted output onto the display at the cursor. Each byte of the formatted text is
/// interpreted by `write_byte`, so the bytes of a multi-byte UTF-8 sequence each render as
/// one blank cell.
impl<DI, F> fmt::Write for TextDisplay<DI, F>
where
    DI: interface::DisplayInterface,
    F: Font,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes())
            .map(|_| ())
            .map_err(|_| fmt::Error)
    }
}
