//! The bus transport used to reach the display controller, and a 4-wire SPI implementation
//! of it.

use embedded_hal::digital::v2::OutputPin;

/// An interface for submitting bytes to the display controller.
///
/// The controller consumes two framings of byte, distinguished by the level of the D/C select
/// signal during the transfer: command bytes (including the argument bytes of multi-byte
/// commands) and display RAM data bytes. Implementations must deliver bytes in submission
/// order.
pub trait DisplayInterface {
    /// Send a single command byte.
    fn send_command(&mut self, cmd: u8) -> Result<(), ()>;
    /// Send a block of command bytes, such as a command followed by its arguments.
    fn send_commands(&mut self, cmds: &[u8]) -> Result<(), ()>;
    /// Send a block of display RAM data bytes.
    fn send_data(&mut self, buf: &[u8]) -> Result<(), ()>;
}

/// Control of the chip select line, for displays that share their bus with other devices.
///
/// The SPI interface selects the chip immediately before every transfer and deselects it
/// before returning, on every path, so that the bus is free to address other devices between
/// calls.
pub trait ChipSelect {
    fn select(&mut self) -> Result<(), ()>;
    fn deselect(&mut self) -> Result<(), ()>;
}

/// Chip select control for a display whose /CS pin is tied active or absent; all operations
/// compile to nothing.
pub struct NoChipSelect;

impl ChipSelect for NoChipSelect {
    fn select(&mut self) -> Result<(), ()> {
        Ok(())
    }
    fn deselect(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

/// Chip select control driving an active-low /CS GPIO pin.
pub struct ActiveLowChipSelect<CS>(CS);

impl<CS> ActiveLowChipSelect<CS>
where
    CS: OutputPin,
{
    pub fn new(cs: CS) -> Self {
        ActiveLowChipSelect(cs)
    }
}

impl<CS> ChipSelect for ActiveLowChipSelect<CS>
where
    CS: OutputPin,
{
    fn select(&mut self) -> Result<(), ()> {
        self.0.set_low().map_err(|_| ())
    }
    fn deselect(&mut self) -> Result<(), ()> {
        self.0.set_high().map_err(|_| ())
    }
}

pub mod spi {
    //! The SPI interface supports the "4-wire" interface of the driver, such that each word on the
    //! SPI bus is 8 bits. The "3-wire" mode replaces the D/C GPIO with a 9th bit on each word,
    //! which seems really awkward to implement with embedded_hal SPI.

    use embedded_hal::blocking::spi::Write;
    use embedded_hal::digital::v2::OutputPin;

    use super::{ActiveLowChipSelect, ChipSelect, DisplayInterface, NoChipSelect};

    pub struct SpiInterface<SPI, DC, CS = NoChipSelect> {
        /// The SPI master device connected to the SSD1306.
        spi: SPI,
        /// A GPIO output pin connected to the D/C (data/command) pin of the SSD1306 (the fourth
        /// "wire" of "4-wire" mode).
        dc: DC,
        /// Chip select control, bracketing every transfer.
        cs: CS,
    }

    impl<SPI, DC> SpiInterface<SPI, DC>
    where
        SPI: Write<u8>,
        DC: OutputPin,
    {
        /// Create a new SPI interface to communicate with the display driver, for wirings where
        /// the display's /CS pin is tied active. `spi` is the SPI master device, and `dc` is the
        /// GPIO output pin connected to the D/C pin of the SSD1306.
        pub fn new(spi: SPI, dc: DC) -> Self {
            Self {
                spi: spi,
                dc: dc,
                cs: NoChipSelect,
            }
        }
    }

    impl<SPI, DC, CS> SpiInterface<SPI, DC, ActiveLowChipSelect<CS>>
    where
        SPI: Write<u8>,
        DC: OutputPin,
        CS: OutputPin,
    {
        /// Create a new SPI interface which additionally drives an active-low chip select pin
        /// `cs`, for displays sharing the SPI bus with other devices.
        pub fn with_chip_select(spi: SPI, dc: DC, cs: CS) -> Self {
            Self {
                spi: spi,
                dc: dc,
                cs: ActiveLowChipSelect::new(cs),
            }
        }
    }

    impl<SPI, DC, CS> SpiInterface<SPI, DC, CS>
    where
        SPI: Write<u8>,
        DC: OutputPin,
        CS: ChipSelect,
    {
        fn transfer(&mut self, dc_high: bool, words: &[u8]) -> Result<(), ()> {
            self.cs.select()?;
            let framed = match dc_high {
                true => self.dc.set_high().map_err(|_| ()),
                false => self.dc.set_low().map_err(|_| ()),
            };
            let res = framed.and_then(|_| self.spi.write(words).map_err(|_| ()));
            // Deselect even when the transfer failed.
            self.cs.deselect()?;
            res
        }
    }

    impl<SPI, DC, CS> DisplayInterface for SpiInterface<SPI, DC, CS>
    where
        SPI: Write<u8>,
        DC: OutputPin,
        CS: ChipSelect,
    {
        fn send_command(&mut self, cmd: u8) -> Result<(), ()> {
            self.transfer(false, &[cmd])
        }

        fn send_commands(&mut self, cmds: &[u8]) -> Result<(), ()> {
            self.transfer(false, cmds)
        }

        fn send_data(&mut self, buf: &[u8]) -> Result<(), ()> {
            self.transfer(true, buf)
        }
    }
}


#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    use embedded_hal::blocking::spi::Write as SpiWrite;
    use embedded_hal::digital::v2::OutputPin;

    use super::spi::SpiInterface;
    use super::DisplayInterface;

    #[derive(Clone, Debug, PartialEq)]
    enum Event {
        CsSelect,
        CsDeselect,
        DcLow,
        DcHigh,
        Spi(Vec<u8>),
    }

    #[derive(Clone)]
    struct Log(Rc<RefCell<Vec<Event>>>);

    impl Log {
        fn new() -> Self {
            Log(Rc::new(RefCell::new(Vec::new())))
        }
        fn push(&self, ev: Event) {
            self.0.borrow_mut().push(ev)
        }
        fn take(&self) -> Vec<Event> {
            self.0.borrow_mut().split_off(0)
        }
    }

    struct DcPin(Log);

    impl OutputPin for DcPin {
        type Error = ();
        fn set_low(&mut self) -> Result<(), ()> {
            self.0.push(Event::DcLow);
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), ()> {
            self.0.push(Event::DcHigh);
            Ok(())
        }
    }

    struct CsPin(Log);

    impl OutputPin for CsPin {
        type Error = ();
        fn set_low(&mut self) -> Result<(), ()> {
            self.0.push(Event::CsSelect);
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), ()> {
            self.0.push(Event::CsDeselect);
            Ok(())
        }
    }

    struct GoodSpi(Log);

    impl SpiWrite<u8> for GoodSpi {
        type Error = ();
        fn write(&mut self, words: &[u8]) -> Result<(), ()> {
            self.0.push(Event::Spi(words.to_vec()));
            Ok(())
        }
    }

    /// An SPI bus on which every transfer fails.
    struct BrokenSpi;

    impl SpiWrite<u8> for BrokenSpi {
        type Error = ();
        fn write(&mut self, _words: &[u8]) -> Result<(), ()> {
            Err(())
        }
    }

    #[test]
    fn command_and_data_framing() {
        let log = Log::new();
        let mut di = SpiInterface::new(GoodSpi(log.clone()), DcPin(log.clone()));

        di.send_command(0xAF).unwrap();
        assert_eq!(log.take(), vec![Event::DcLow, Event::Spi(vec![0xAF])]);

        di.send_commands(&[0x81, 0xCF]).unwrap();
        assert_eq!(log.take(), vec![Event::DcLow, Event::Spi(vec![0x81, 0xCF])]);

        di.send_data(&[1, 2, 3]).unwrap();
        assert_eq!(log.take(), vec![Event::DcHigh, Event::Spi(vec![1, 2, 3])]);
    }

    #[test]
    fn chip_select_brackets_every_transfer() {
        let log = Log::new();
        let mut di = SpiInterface::with_chip_select(
            GoodSpi(log.clone()),
            DcPin(log.clone()),
            CsPin(log.clone()),
        );

        di.send_command(0xAE).unwrap();
        assert_eq!(
            log.take(),
            vec![
                Event::CsSelect,
                Event::DcLow,
                Event::Spi(vec![0xAE]),
                Event::CsDeselect,
            ]
        );

        di.send_data(&[0]).unwrap();
        assert_eq!(
            log.take(),
            vec![
                Event::CsSelect,
                Event::DcHigh,
                Event::Spi(vec![0]),
                Event::CsDeselect,
            ]
        );
    }

    #[test]
    fn chip_select_deselected_when_transfer_fails() {
        let log = Log::new();
        let mut di =
            SpiInterface::with_chip_select(BrokenSpi, DcPin(log.clone()), CsPin(log.clone()));

        assert_eq!(di.send_data(&[0xFF]), Err(()));
        assert_eq!(
            log.take(),
            vec![Event::CsSelect, Event::DcHigh, Event::CsDeselect]
        );
    }

    #[test]
    fn no_chip_select_generates_no_pin_traffic() {
        let log = Log::new();
        let mut di = SpiInterface::new(GoodSpi(log.clone()), DcPin(log.clone()));

        di.send_data(&[0xAA]).unwrap();
        // Only the D/C framing and the transfer itself; nothing touches a select line.
        assert_eq!(log.take(), vec![Event::DcHigh, Event::Spi(vec![0xAA])]);
    }
}
