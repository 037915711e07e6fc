//! Full example code for setting up an SSD1331 display. This runs on an STM32F303RE, using a
//! common 0.95" 96x64 RGB OLED module connected to SPI1, PA4 for C/S, PA8 for D/C and PA9 for
//! /RESET.

#![deny(unsafe_code)]
#![no_main]
#![no_std]

extern crate cortex_m;
extern crate embedded_hal as hal_api;
extern crate stm32f30x;
extern crate stm32f30x_hal as hal;
#[macro_use]
extern crate cortex_m_rt;
extern crate embedded_graphics;
extern crate panic_abort;
extern crate ssd1331;

use core::fmt::Write;
use cortex_m::asm;
use cortex_m_rt::ExceptionFrame;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use hal::prelude::*;
use hal::spi;
use ssd1331 as oled;

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

    // Get GPIO A where the display is connected.
    let mut gpioa = dp.GPIOA.split(&mut rcc.ahb);

    // Set up SPI1, which is Alternate Function 5 for GPIOs PA5,6,7. The SSD1331 samples on the
    // rising edge with the clock idling high.
    let disp_sck = gpioa.pa5.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let disp_miso = gpioa.pa6.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let disp_mosi = gpioa.pa7.into_af5(&mut gpioa.moder, &mut gpioa.afrl);

    let disp_spi = spi::Spi::spi1(
        dp.SPI1,
        (disp_sck, disp_miso, disp_mosi),
        hal_api::spi::Mode {
            polarity: hal_api::spi::Polarity::IdleHigh,
            phase: hal_api::spi::Phase::CaptureOnSecondTransition,
        },
        8.mhz(),
        clocks,
        &mut rcc.apb2,
    );

    let disp_cs = gpioa
        .pa4
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);
    let disp_dc = gpioa
        .pa8
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);

    // PA9 is the display's /RESET pin. The ssd1331 library does not control this pin; we will
    // assert reset separately, before handing the delay to the driver.
    let mut disp_rst = gpioa
        .pa9
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);
    disp_rst.set_low();
    delay.delay_ms(10_u16);
    disp_rst.set_high();
    delay.delay_ms(10_u16);

    // Create the SpiInterface and Display. The driver keeps the delay to wait out area fills.
    let mut disp = oled::Display::new(
        oled::SpiInterface::new(disp_spi, disp_dc, disp_cs),
        delay,
        oled::ColorOrder::Rgb,
    );

    // The default configuration suits the common modules; dim them a little.
    disp.init(&oled::Config::new().master_current(4)).unwrap();
    disp.set_rotation(oled::Rotation::Rotate180).unwrap();

    let mut canvas = oled::Canvas::new(disp);
    canvas.clear(Rgb565::BLACK).unwrap();
    Rectangle::new(Point::new(0, 0), Size::new(96, 12))
        .into_styled(PrimitiveStyle::with_fill(Rgb565::BLUE))
        .draw(&mut canvas)
        .unwrap();
    canvas.set_text_color(Rgb565::WHITE, Some(Rgb565::BLUE));
    canvas.set_cursor(Point::new(2, 1));
    write!(canvas, "SSD1331").unwrap();

    // Print a counter below the title, scrolling the screen once it fills up.
    canvas.set_text_color(Rgb565::GREEN, Some(Rgb565::BLACK));
    canvas.set_cursor(Point::new(0, 14));
    canvas.set_scroll(true);
    let mut count = 0u32;
    loop {
        writeln!(canvas, "tick {}", count).unwrap();
        count = count.wrapping_add(1);
        asm::delay(8_000_000);
    }
}
