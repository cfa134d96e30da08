//! The command set for the SSD1306.
//!
//! Note 1: The display RAM (GDDRAM) of the SSD1306 is arranged in 8 pages of 128 columns,
//! where each byte drives a column of 8 vertically adjacent pixels within its page, least
//! significant bit topmost. Anywhere a "column" appears in an address pointer command it is
//! one of these byte columns.
//!
//! Note 2: The SSD1306 consumes the argument bytes of multi-byte commands with the D/C select
//! signal still in the command state, so `send` transmits arguments via
//! `DisplayInterface::send_commands` rather than as data.

use crate::interface::DisplayInterface;

pub mod consts {
    //! Geometry of the SSD1306 display RAM, and the limits derived from it.

    /// Number of pixel columns in the display RAM.
    pub const NUM_PIXEL_COLS: u8 = 128;
    /// Number of pixel rows in the display RAM.
    pub const NUM_PIXEL_ROWS: u8 = 64;
    /// Number of pixel rows addressed by one RAM page.
    pub const PAGE_HEIGHT: u8 = 8;
    /// Number of RAM pages.
    pub const NUM_PAGES: u8 = NUM_PIXEL_ROWS / PAGE_HEIGHT;
    /// Total size of the display RAM in bytes.
    pub const NUM_GDDRAM_BYTES: u16 = NUM_PIXEL_COLS as u16 * NUM_PAGES as u16;
    pub const PIXEL_COL_MAX: u8 = NUM_PIXEL_COLS - 1;
    pub const PIXEL_ROW_MAX: u8 = NUM_PIXEL_ROWS - 1;
    pub const PAGE_MAX: u8 = NUM_PAGES - 1;
}

use self::consts::*;

/// The direction the RAM address pointer auto-increments after each data byte is written.
#[derive(Clone, Copy)]
pub enum AddressMode {
    /// The column address increments left to right, wrapping to the next page at the end of
    /// each page and back to page 0 at the end of RAM.
    Horizontal,
    /// The page address increments top to bottom, wrapping to the next column at the last
    /// page.
    Vertical,
    /// The column address increments and wraps within the current page only; the page must be
    /// changed explicitly. This is the chip's reset state.
    Page,
}

/// Setting of segment remapping. Changing this setting will flip the image horizontally.
/// Which value is correct depends on how the display module wires the OLED matrix to the
/// driver chip; see the module datasheet.
#[derive(Clone, Copy)]
pub enum SegmentRemap {
    /// Column address 0 maps to segment driver 0.
    Col0Seg0,
    /// Column address 0 maps to segment driver 127, mirroring the image.
    Col0Seg127,
}

/// Setting of the COM line scanning of rows. Changing this setting will flip the image
/// vertically.
#[derive(Clone, Copy)]
pub enum ComScanDirection {
    /// COM lines scan row addresses top to bottom, so that row address 0 is the first row of
    /// the display.
    RowZeroFirst,
    /// COM lines scan row addresses bottom to top, so that row address 0 is the last row of
    /// the display.
    RowZeroLast,
}

#[derive(Clone, Copy)]
pub enum Command {
    /// Set the low nibble of the RAM column address pointer. Combined with
    /// `SetColumnStartHigh`, this positions writes within the current page. Range is 0-15.
    SetColumnStartLow(u8),
    /// Set the high nibble of the RAM column address pointer. Range is 0-7. (Note 1)
    SetColumnStartHigh(u8),
    /// Set the RAM page the address pointer is on. Range is 0-7.
    SetPageStart(u8),
    /// Set the direction of address pointer auto-increment. See the enum for details.
    SetAddressMode(AddressMode),
    /// Set the column start and end address window for `Horizontal` and `Vertical` addressing
    /// modes, resetting the column pointer to the start. Range is 0-127.
    SetColumnAddress(u8, u8),
    /// Set the page start and end address window for `Horizontal` and `Vertical` addressing
    /// modes, resetting the page pointer to the start. Range is 0-7.
    SetPageAddress(u8, u8),
    /// Set the display start line: the RAM row displayed on the first COM line. Setting this
    /// to e.g. 40 rolls the displayed image upwards by 40 rows, wrapping rows 0-39 to the
    /// bottom. Range is 0-63.
    SetStartLine(u8),
    /// Set the display COM line offset: a vertical shift applied between COM scanning and the
    /// display rows. Range is 0-63.
    SetDisplayOffset(u8),
    /// Set the MUX ratio, which controls how many COM lines are active and thus how many
    /// display pixel rows are driven. Range is 16-64.
    SetMuxRatio(u8),
    /// Set segment remapping. See the enum for details.
    SetSegmentRemap(SegmentRemap),
    /// Set the COM scan direction. See the enum for details.
    SetComScanDirection(ComScanDirection),
    /// Set the COM pins hardware configuration: whether the module uses the alternative COM
    /// pin layout, and whether left and right COM lines are remapped. Both are dictated by the
    /// module wiring; see the module datasheet.
    SetComPinConfig(bool, bool),
    /// Set the contrast current. Range is 0-255.
    SetContrast(u8),
    /// Force every pixel on regardless of RAM contents (true), or resume displaying the RAM
    /// (false).
    SetAllOn(bool),
    /// Display the RAM with inverted polarity (true) or normally (false).
    SetInvert(bool),
    /// Set the pre-charge period for phases 1 and 2, in DCLKs. Range is 1-15 for each phase.
    SetPrechargePeriod(u8, u8),
    /// Set the Vcomh deselect voltage level as a fraction of Vcc. The three-bit level code is
    /// placed in bits 6:4 of the argument; the datasheet documents codes 0, 2 and 3, though
    /// common module init sequences use others. Range is 0-7.
    SetVcomhDeselect(u8),
    /// Set the oscillator frequency setting Fosc (0-15, higher is faster, the relationship is
    /// otherwise undocumented) and the display clock divide ratio DCLK = Fosc / divide
    /// (1-16). These indirectly determine the refresh rate.
    SetClockFoscDivset(u8, u8),
    /// Enable or disable the internal charge pump regulator that generates the OLED drive
    /// voltage from Vcc. Modules without an external Vpp supply require it enabled.
    SetChargePump(bool),
    /// Turn the display on, or put it to sleep.
    SetDisplayOn(bool),
}

macro_rules! ok_command {
    ($buf:ident, $cmd:expr,[]) => {
        Ok(($cmd, &$buf[..0]))
    };
    ($buf:ident, $cmd:expr,[$arg0:expr]) => {{
        $buf[0] = $arg0;
        Ok(($cmd, &$buf[..1]))
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr]) => {{
        $buf[0] = $arg0;
        $buf[1] = $arg1;
        Ok(($cmd, &$buf[..2]))
    }};
}

impl Command {
    /// Transmit the command encoded by `self` to the display via `iface`. Commands carrying
    /// an out-of-range argument return `Err(())` without touching the bus.
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), ()>
    where
        DI: DisplayInterface,
    {
        let mut arg_buf = [0u8; 2];
        let (cmd, data) = match self {
            Command::SetColumnStartLow(low) => match low {
                0..=0x0F => ok_command!(arg_buf, 0x00 | low, []),
                _ => Err(()),
            },
            Command::SetColumnStartHigh(high) => match high {
                0..=0x07 => ok_command!(arg_buf, 0x10 | high, []),
                _ => Err(()),
            },
            Command::SetPageStart(page) => match page {
                0..=PAGE_MAX => ok_command!(arg_buf, 0xB0 | page, []),
                _ => Err(()),
            },
            Command::SetAddressMode(mode) => {
                let am = match mode {
                    AddressMode::Horizontal => 0x00,
                    AddressMode::Vertical => 0x01,
                    AddressMode::Page => 0x02,
                };
                ok_command!(arg_buf, 0x20, [am])
            }
            Command::SetColumnAddress(start, end) => match (start, end) {
                (0..=PIXEL_COL_MAX, 0..=PIXEL_COL_MAX) => ok_command!(arg_buf, 0x21, [start, end]),
                _ => Err(()),
            },
            Command::SetPageAddress(start, end) => match (start, end) {
                (0..=PAGE_MAX, 0..=PAGE_MAX) => ok_command!(arg_buf, 0x22, [start, end]),
                _ => Err(()),
            },
            Command::SetStartLine(line) => match line {
                0..=PIXEL_ROW_MAX => ok_command!(arg_buf, 0x40 | line, []),
                _ => Err(()),
            },
            Command::SetDisplayOffset(line) => match line {
                0..=PIXEL_ROW_MAX => ok_command!(arg_buf, 0xD3, [line]),
                _ => Err(()),
            },
            Command::SetMuxRatio(ratio) => match ratio {
                16..=NUM_PIXEL_ROWS => ok_command!(arg_buf, 0xA8, [ratio - 1]),
                _ => Err(()),
            },
            Command::SetSegmentRemap(remap) => ok_command!(
                arg_buf,
                match remap {
                    SegmentRemap::Col0Seg0 => 0xA0,
                    SegmentRemap::Col0Seg127 => 0xA1,
                },
                []
            ),
            Command::SetComScanDirection(direction) => ok_command!(
                arg_buf,
                match direction {
                    ComScanDirection::RowZeroFirst => 0xC0,
                    ComScanDirection::RowZeroLast => 0xC8,
                },
                []
            ),
            Command::SetComPinConfig(alternative, remap_left_right) => {
                let alt = match alternative {
                    true => 0x10,
                    false => 0x00,
                };
                let lr = match remap_left_right {
                    true => 0x20,
                    false => 0x00,
                };
                ok_command!(arg_buf, 0xDA, [0x02 | alt | lr])
            }
            Command::SetContrast(contrast) => ok_command!(arg_buf, 0x81, [contrast]),
            Command::SetAllOn(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => 0xA5,
                    false => 0xA4,
                },
                []
            ),
            Command::SetInvert(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => 0xA7,
                    false => 0xA6,
                },
                []
            ),
            Command::SetPrechargePeriod(phase_1, phase_2) => match (phase_1, phase_2) {
                (1..=15, 1..=15) => ok_command!(arg_buf, 0xD9, [phase_2 << 4 | phase_1]),
                _ => Err(()),
            },
            Command::SetVcomhDeselect(level) => match level {
                0..=7 => ok_command!(arg_buf, 0xDB, [level << 4]),
                _ => Err(()),
            },
            Command::SetClockFoscDivset(fosc, divide) => match (fosc, divide) {
                (0..=15, 1..=16) => ok_command!(arg_buf, 0xD5, [fosc << 4 | (divide - 1)]),
                _ => Err(()),
            },
            Command::SetChargePump(ena) => {
                let e = match ena {
                    true => 0x14,
                    false => 0x10,
                };
                ok_command!(arg_buf, 0x8D, [e])
            }
            Command::SetDisplayOn(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => 0xAF,
                    false => 0xAE,
                },
                []
            ),
        }?;
        iface.send_command(cmd)?;
        if data.len() == 0 {
            Ok(())
        } else {
            iface.send_commands(data)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::test_spy::TestSpyInterface;

    #[test]
    fn set_column_start_low() {
        let mut di = TestSpyInterface::new();
        Command::SetColumnStartLow(0x0F).send(&mut di).unwrap();
        di.check(0x0F, &[]);
        di.clear();
        Command::SetColumnStartLow(0).send(&mut di).unwrap();
        di.check(0x00, &[]);
        assert_eq!(Command::SetColumnStartLow(16).send(&mut di), Err(()));
    }

    #[test]
    fn set_column_start_high() {
        let mut di = TestSpyInterface::new();
        Command::SetColumnStartHigh(0x07).send(&mut di).unwrap();
        di.check(0x17, &[]);
        assert_eq!(Command::SetColumnStartHigh(8).send(&mut di), Err(()));
    }

    #[test]
    fn set_page_start() {
        let mut di = TestSpyInterface::new();
        Command::SetPageStart(5).send(&mut di).unwrap();
        di.check(0xB5, &[]);
        assert_eq!(Command::SetPageStart(8).send(&mut di), Err(()));
    }

    #[test]
    fn set_address_mode() {
        let mut di = TestSpyInterface::new();
        Command::SetAddressMode(AddressMode::Horizontal)
            .send(&mut di)
            .unwrap();
        di.check(0x20, &[0x00]);
        di.clear();
        Command::SetAddressMode(AddressMode::Vertical)
            .send(&mut di)
            .unwrap();
        di.check(0x20, &[0x01]);
        di.clear();
        Command::SetAddressMode(AddressMode::Page)
            .send(&mut di)
            .unwrap();
        di.check(0x20, &[0x02]);
    }

    #[test]
    fn set_column_address() {
        let mut di = TestSpyInterface::new();
        Command::SetColumnAddress(23, 42).send(&mut di).unwrap();
        di.check(0x21, &[23, 42]);
        assert_eq!(Command::SetColumnAddress(128, 42).send(&mut di), Err(()));
        assert_eq!(Command::SetColumnAddress(23, 255).send(&mut di), Err(()));
    }

    #[test]
    fn set_page_address() {
        let mut di = TestSpyInterface::new();
        Command::SetPageAddress(0, 7).send(&mut di).unwrap();
        di.check(0x22, &[0, 7]);
        assert_eq!(Command::SetPageAddress(8, 7).send(&mut di), Err(()));
        assert_eq!(Command::SetPageAddress(0, 8).send(&mut di), Err(()));
    }

    #[test]
    fn set_start_line() {
        let mut di = TestSpyInterface::new();
        Command::SetStartLine(23).send(&mut di).unwrap();
        di.check(0x57, &[]);
        assert_eq!(Command::SetStartLine(64).send(&mut di), Err(()));
    }

    #[test]
    fn set_display_offset() {
        let mut di = TestSpyInterface::new();
        Command::SetDisplayOffset(23).send(&mut di).unwrap();
        di.check(0xD3, &[23]);
        assert_eq!(Command::SetDisplayOffset(64).send(&mut di), Err(()));
    }

    #[test]
    fn set_mux_ratio() {
        let mut di = TestSpyInterface::new();
        Command::SetMuxRatio(64).send(&mut di).unwrap();
        di.check(0xA8, &[63]);
        di.clear();
        Command::SetMuxRatio(16).send(&mut di).unwrap();
        di.check(0xA8, &[15]);
        assert_eq!(Command::SetMuxRatio(15).send(&mut di), Err(()));
        assert_eq!(Command::SetMuxRatio(65).send(&mut di), Err(()));
    }

    #[test]
    fn set_segment_remap() {
        let mut di = TestSpyInterface::new();
        Command::SetSegmentRemap(SegmentRemap::Col0Seg0)
            .send(&mut di)
            .unwrap();
        di.check(0xA0, &[]);
        di.clear();
        Command::SetSegmentRemap(SegmentRemap::Col0Seg127)
            .send(&mut di)
            .unwrap();
        di.check(0xA1, &[]);
    }

    #[test]
    fn set_com_scan_direction() {
        let mut di = TestSpyInterface::new();
        Command::SetComScanDirection(ComScanDirection::RowZeroFirst)
            .send(&mut di)
            .unwrap();
        di.check(0xC0, &[]);
        di.clear();
        Command::SetComScanDirection(ComScanDirection::RowZeroLast)
            .send(&mut di)
            .unwrap();
        di.check(0xC8, &[]);
    }

    #[test]
    fn set_com_pin_config() {
        let mut di = TestSpyInterface::new();
        Command::SetComPinConfig(false, false).send(&mut di).unwrap();
        di.check(0xDA, &[0x02]);
        di.clear();
        Command::SetComPinConfig(true, false).send(&mut di).unwrap();
        di.check(0xDA, &[0x12]);
        di.clear();
        Command::SetComPinConfig(false, true).send(&mut di).unwrap();
        di.check(0xDA, &[0x22]);
        di.clear();
        Command::SetComPinConfig(true, true).send(&mut di).unwrap();
        di.check(0xDA, &[0x32]);
    }

    #[test]
    fn set_contrast() {
        let mut di = TestSpyInterface::new();
        Command::SetContrast(0xCF).send(&mut di).unwrap();
        di.check(0x81, &[0xCF]);
    }

    #[test]
    fn set_all_on() {
        let mut di = TestSpyInterface::new();
        Command::SetAllOn(true).send(&mut di).unwrap();
        di.check(0xA5, &[]);
        di.clear();
        Command::SetAllOn(false).send(&mut di).unwrap();
        di.check(0xA4, &[]);
    }

    #[test]
    fn set_invert() {
        let mut di = TestSpyInterface::new();
        Command::SetInvert(true).send(&mut di).unwrap();
        di.check(0xA7, &[]);
        di.clear();
        Command::SetInvert(false).send(&mut di).unwrap();
        di.check(0xA6, &[]);
    }

    #[test]
    fn set_precharge_period() {
        let mut di = TestSpyInterface::new();
        Command::SetPrechargePeriod(1, 15).send(&mut di).unwrap();
        di.check(0xD9, &[0xF1]);
        di.clear();
        Command::SetPrechargePeriod(2, 2).send(&mut di).unwrap();
        di.check(0xD9, &[0x22]);
        assert_eq!(Command::SetPrechargePeriod(0, 15).send(&mut di), Err(()));
        assert_eq!(Command::SetPrechargePeriod(1, 0).send(&mut di), Err(()));
        assert_eq!(Command::SetPrechargePeriod(16, 1).send(&mut di), Err(()));
        assert_eq!(Command::SetPrechargePeriod(1, 16).send(&mut di), Err(()));
    }

    #[test]
    fn set_vcomh_deselect() {
        let mut di = TestSpyInterface::new();
        Command::SetVcomhDeselect(4).send(&mut di).unwrap();
        di.check(0xDB, &[0x40]);
        di.clear();
        Command::SetVcomhDeselect(7).send(&mut di).unwrap();
        di.check(0xDB, &[0x70]);
        assert_eq!(Command::SetVcomhDeselect(8).send(&mut di), Err(()));
    }

    #[test]
    fn set_clock_fosc_divset() {
        let mut di = TestSpyInterface::new();
        Command::SetClockFoscDivset(8, 1).send(&mut di).unwrap();
        di.check(0xD5, &[0x80]);
        di.clear();
        Command::SetClockFoscDivset(15, 16).send(&mut di).unwrap();
        di.check(0xD5, &[0xFF]);
        assert_eq!(Command::SetClockFoscDivset(16, 1).send(&mut di), Err(()));
        assert_eq!(Command::SetClockFoscDivset(0, 0).send(&mut di), Err(()));
        assert_eq!(Command::SetClockFoscDivset(0, 17).send(&mut di), Err(()));
    }

    #[test]
    fn set_charge_pump() {
        let mut di = TestSpyInterface::new();
        Command::SetChargePump(true).send(&mut di).unwrap();
        di.check(0x8D, &[0x14]);
        di.clear();
        Command::SetChargePump(false).send(&mut di).unwrap();
        di.check(0x8D, &[0x10]);
    }

    #[test]
    fn set_display_on() {
        let mut di = TestSpyInterface::new();
        Command::SetDisplayOn(true).send(&mut di).unwrap();
        di.check(0xAF, &[]);
        di.clear();
        Command::SetDisplayOn(false).send(&mut di).unwrap();
        di.check(0xAE, &[]);
    }
}
