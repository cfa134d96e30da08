//! Defines a builder for the register values the display is given at initialization time.

use crate::command::{Command, ComScanDirection, SegmentRemap};
use crate::interface;

/// A configuration for the display, transmitted once by `TextDisplay::init`.
///
/// Segment remap and COM scan direction are mandatory because they depend on how the display
/// module wires the OLED matrix to the driver chip, and the image will be mirrored or flipped
/// unless they are correct for your module, so they must be provided in the constructor. The
/// drive tunables are optional builder methods; any left unset are transmitted with the values
/// common 128x64 module datasheets recommend, so initialization always sends the complete
/// sequence.
pub struct Config {
    segment_remap_cmd: Command,
    com_scan_direction_cmd: Command,
    precharge_period_cmd: Option<Command>,
    vcomh_deselect_cmd: Option<Command>,
    com_pin_config_cmd: Option<Command>,
    contrast_cmd: Option<Command>,
    clock_fosc_divset_cmd: Option<Command>,
    charge_pump_cmd: Option<Command>,
}

impl Config {
    /// Create a new configuration for a module with the given matrix wiring.
    pub fn new(segment_remap: SegmentRemap, com_scan_direction: ComScanDirection) -> Self {
        Config {
            segment_remap_cmd: Command::SetSegmentRemap(segment_remap),
            com_scan_direction_cmd: Command::SetComScanDirection(com_scan_direction),
            precharge_period_cmd: None,
            vcomh_deselect_cmd: None,
            com_pin_config_cmd: None,
            contrast_cmd: None,
            clock_fosc_divset_cmd: None,
            charge_pump_cmd: None,
        }
    }

    /// Extend this `Config` to explicitly configure the OLED drive pre-charge period. See
    /// `Command::SetPrechargePeriod`.
    pub fn precharge_period(self, phase_1: u8, phase_2: u8) -> Self {
        Self {
            precharge_period_cmd: Some(Command::SetPrechargePeriod(phase_1, phase_2)),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure the Vcomh deselect voltage level. See
    /// `Command::SetVcomhDeselect`.
    pub fn vcomh_deselect(self, level: u8) -> Self {
        Self {
            vcomh_deselect_cmd: Some(Command::SetVcomhDeselect(level)),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure the COM pins hardware layout. See
    /// `Command::SetComPinConfig`.
    pub fn com_pin_config(self, alternative: bool, remap_left_right: bool) -> Self {
        Self {
            com_pin_config_cmd: Some(Command::SetComPinConfig(alternative, remap_left_right)),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure display contrast. See
    /// `Command::SetContrast`.
    pub fn contrast(self, contrast: u8) -> Self {
        Self {
            contrast_cmd: Some(Command::SetContrast(contrast)),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure the display clock frequency and divider.
    /// See `Command::SetClockFoscDivset`.
    pub fn clock_fosc_divset(self, fosc: u8, divide: u8) -> Self {
        Self {
            clock_fosc_divset_cmd: Some(Command::SetClockFoscDivset(fosc, divide)),
            ..self
        }
    }

    /// Extend this `Config` to explicitly enable or disable the internal charge pump. See
    /// `Command::SetChargePump`.
    pub fn charge_pump(self, ena: bool) -> Self {
        Self {
            charge_pump_cmd: Some(Command::SetChargePump(ena)),
            ..self
        }
    }

    /// Transmit commands to the display at `iface` necessary to put that display into the
    /// configuration encoded in `self`.
    pub(crate) fn send<DI>(&self, iface: &mut DI) -> Result<(), ()>
    where
        DI: interface::DisplayInterface,
    {
        self.segment_remap_cmd.send(iface)?;
        self.com_scan_direction_cmd.send(iface)?;
        self.precharge_period_cmd
            .unwrap_or(Command::SetPrechargePeriod(1, 15))
            .send(iface)?;
        self.vcomh_deselect_cmd
            .unwrap_or(Command::SetVcomhDeselect(4))
            .send(iface)?;
        self.com_pin_config_cmd
            .unwrap_or(Command::SetComPinConfig(true, false))
            .send(iface)?;
        self.contrast_cmd
            .unwrap_or(Command::SetContrast(0xCF))
            .send(iface)?;
        // Display-from-RAM and normal polarity are always re-established at init.
        Command::SetAllOn(false).send(iface)?;
        Command::SetInvert(false).send(iface)?;
        self.clock_fosc_divset_cmd
            .unwrap_or(Command::SetClockFoscDivset(8, 1))
            .send(iface)?;
        self.charge_pump_cmd
            .unwrap_or(Command::SetChargePump(true))
            .send(iface)
    }
}
