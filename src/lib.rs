//! Text-mode driver library for the Solomon Systech SSD1306 dot matrix OLED display driver.
//!
//! The SSD1306's display RAM is pixel-addressed, but this driver exposes it as a grid of
//! fixed-width character cells: bytes written to a [`TextDisplay`](display::TextDisplay) are
//! rendered as font glyphs at a (column, row) text cursor, with `\r` and `\n` interpreted as
//! cursor motion. The cursor advances and wraps by letting the controller's auto-incrementing
//! RAM pointer walk in lockstep with the logical position, so steady-state text output costs
//! only data transfers.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod command;
pub mod config;
pub mod display;
pub mod font;
pub mod interface;

// Re-exports for primary API.
pub use command::{consts, ComScanDirection, SegmentRemap};
pub use config::Config;
pub use display::TextDisplay;
pub use font::{Font, Font5x7};
pub use interface::spi::SpiInterface;
pub use interface::{ActiveLowChipSelect, ChipSelect, NoChipSelect};
