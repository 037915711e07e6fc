//! The transport between the driver and the SSD1331.
//!
//! The SSD1331 takes both opcodes *and their operands* with D/C held low, so a command frame is
//! an arbitrary run of bytes sent in command mode. D/C is only raised for pixel data streamed
//! into the addressing window.

pub trait DisplayInterface {
    type Error;

    /// Open a session on the bus (assert chip select). Sessions bracket each public drawing call.
    fn start_write(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Close the session opened by `start_write`.
    fn end_write(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Send one command frame: D/C low, the bytes, then D/C back high.
    fn send_command(&mut self, frame: &[u8]) -> Result<(), Self::Error>;

    /// Send pixel data with D/C high.
    fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error>;
}

/// Failure of one of the hardware resources behind `SpiInterface`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterfaceError<SpiE, PinE> {
    /// The SPI master failed to write.
    Spi(SpiE),
    /// The D/C or C/S GPIO failed to switch.
    Pin(PinE),
}

pub mod spi {
    //! The SPI interface supports the "4-wire" interface of the controller: 8-bit words on the
    //! SPI bus, with a separate D/C GPIO, plus a chip select GPIO which frames each session.

    use embedded_hal::blocking::spi::Write;
    use embedded_hal::digital::v2::OutputPin;

    use super::{DisplayInterface, InterfaceError};

    pub struct SpiInterface<SPI, DC, CS> {
        /// The SPI master device connected to the SSD1331.
        spi: SPI,
        /// A GPIO output pin connected to the D/C (data/command) pin of the SSD1331.
        dc: DC,
        /// A GPIO output pin connected to the active-low C/S pin of the SSD1331.
        cs: CS,
    }

    impl<SPI, DC, CS> SpiInterface<SPI, DC, CS>
    where
        SPI: Write<u8>,
        DC: OutputPin,
        CS: OutputPin<Error = DC::Error>,
    {
        /// Create a new SPI interface to communicate with the display controller. `spi` is the SPI
        /// master device, `dc` is the GPIO output pin connected to the D/C pin and `cs` the one
        /// connected to C/S.
        pub fn new(spi: SPI, dc: DC, cs: CS) -> Self {
            Self { spi, dc, cs }
        }

        /// Give back the bus and pins.
        pub fn release(self) -> (SPI, DC, CS) {
            (self.spi, self.dc, self.cs)
        }
    }

    impl<SPI, DC, CS> DisplayInterface for SpiInterface<SPI, DC, CS>
    where
        SPI: Write<u8>,
        DC: OutputPin,
        CS: OutputPin<Error = DC::Error>,
    {
        type Error = InterfaceError<SPI::Error, DC::Error>;

        fn start_write(&mut self) -> Result<(), Self::Error> {
            self.cs.set_low().map_err(InterfaceError::Pin)
        }

        fn end_write(&mut self) -> Result<(), Self::Error> {
            self.cs.set_high().map_err(InterfaceError::Pin)
        }

        fn send_command(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
            self.dc.set_low().map_err(InterfaceError::Pin)?;
            self.spi.write(frame).map_err(InterfaceError::Spi)?;
            self.dc.set_high().map_err(InterfaceError::Pin)
        }

        fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
            self.dc.set_high().map_err(InterfaceError::Pin)?;
            self.spi.write(buf).map_err(InterfaceError::Spi)
        }
    }
}
