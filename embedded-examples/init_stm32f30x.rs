//! Full example code for setting up an SSD1306 text display. This runs on an STM32F303RE,
//! using a generic 128x64 SSD1306 SPI module connected to SPI1, PA8 for D/C, PA9 for /RESET,
//! and PB6 for /CS.

#![deny(unsafe_code)]
#![no_main]
#![no_std]

extern crate cortex_m;
extern crate embedded_hal as hal_api;
extern crate stm32f30x;
extern crate stm32f30x_hal as hal;
#[macro_use]
extern crate cortex_m_rt;
extern crate panic_abort;
extern crate ssd1306_text;

use core::fmt::Write;
use cortex_m::asm;
use cortex_m_rt::ExceptionFrame;
use hal::prelude::*;
use hal::spi;
use ssd1306_text as oled;

entry!(main);

exception!(*, default_handler);
exception!(HardFault, hard_fault);

fn hard_fault(_ef: &ExceptionFrame) -> ! {
    asm::bkpt();
    loop {}
}

fn default_handler(_irqn: i16) {
    loop {}
}

fn main() -> ! {
    // Get peripherals and set up RCC.
    let cp = cortex_m::Peripherals::take().unwrap();
    let dp = stm32f30x::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze(&mut flash.acr);
    let mut delay = hal::delay::Delay::new(cp.SYST, clocks);

    // Get GPIO banks A and B where the display is connected.
    let mut gpioa = dp.GPIOA.split(&mut rcc.ahb);
    let mut gpiob = dp.GPIOB.split(&mut rcc.ahb);

    // Set up SPI1, which is Alternate Function 5 for GPIOs PA5,6,7.
    let disp_sck = gpioa.pa5.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let disp_miso = gpioa.pa6.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let disp_mosi = gpioa.pa7.into_af5(&mut gpioa.moder, &mut gpioa.afrl);

    let disp_spi = spi::Spi::spi1(
        dp.SPI1,
        (disp_sck, disp_miso, disp_mosi),
        hal_api::spi::Mode {
            polarity: hal_api::spi::Polarity::IdleLow,
            phase: hal_api::spi::Phase::CaptureOnFirstTransition,
        },
        8.mhz(),
        clocks,
        &mut rcc.apb2,
    );

    // PA8 will be the D/C push-pull output for the 4th wire.
    let disp_dc = gpioa
        .pa8
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);

    // PA9 is the display's /RESET pin. This library does not control this pin; we will assert
    // reset separately.
    let mut disp_rst = gpioa
        .pa9
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);

    // PB6 is the display's /CS pin. The driver asserts it around every transfer, so other
    // devices can share SPI1 between calls.
    let disp_cs = gpiob
        .pb6
        .into_push_pull_output(&mut gpiob.moder, &mut gpiob.otyper);

    // Create the SpiInterface and TextDisplay.
    let mut disp = oled::TextDisplay::new(
        oled::SpiInterface::with_chip_select(disp_spi, disp_dc, disp_cs),
        oled::Font5x7,
    );

    // Assert the display's /RESET for 10ms.
    disp_rst.set_low();
    delay.delay_ms(10_u16);
    disp_rst.set_high();

    // Initialize the display. The orientation parameters put (0, 0) at the top left for the
    // common 128x64 module wiring; the drive tunables are left at their reference values.
    disp.init(oled::Config::new(
        oled::SegmentRemap::Col0Seg127,
        oled::ComScanDirection::RowZeroLast,
    )).unwrap();

    // The display comes up blank with the cursor at (0, 0); write a couple of lines of text.
    writeln!(disp, "hello from SPI1\r").unwrap();
    writeln!(disp, "21 columns x 8 rows\r").unwrap();

    loop {
        asm::wfi();
    }
}
