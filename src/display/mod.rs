//! The main API to the display driver. It owns the device state (rotation, logical size, display
//! mode), initializes the controller, and turns drawing requests into acceleration commands.

pub mod shapes;
pub mod window;

use embedded_hal::blocking::delay::DelayUs;
use log::debug;

use crate::command::consts::*;
use crate::command::*;
use crate::config::Config;
use crate::error::Error;
use crate::interface;
use crate::timing;

/// A pixel coordinate pair of `column` and `row` in logical (rotated) screen space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelCoord(pub i16, pub i16);

/// Everything the driver remembers about the controller. Width and height are derived from the
/// rotation and are only ever updated together with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceState {
    rotation: Rotation,
    color_order: ColorOrder,
    width: i16,
    height: i16,
    enabled: bool,
    inverted: bool,
}

impl DeviceState {
    fn new(color_order: ColorOrder) -> Self {
        DeviceState {
            rotation: Rotation::Rotate0,
            color_order,
            width: NUM_PIXEL_COLS as i16,
            height: NUM_PIXEL_ROWS as i16,
            enabled: false,
            inverted: false,
        }
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        let (cols, rows) = (NUM_PIXEL_COLS as i16, NUM_PIXEL_ROWS as i16);
        let (width, height) = if rotation.swaps_axes() {
            (rows, cols)
        } else {
            (cols, rows)
        };
        self.rotation = rotation;
        self.width = width;
        self.height = height;
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn color_order(&self) -> ColorOrder {
        self.color_order
    }

    /// Logical width, after the rotation's axis swap.
    pub fn width(&self) -> i16 {
        self.width
    }

    /// Logical height, after the rotation's axis swap.
    pub fn height(&self) -> i16 {
        self.height
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Whether `coord` lies within the logical bounds.
    pub fn contains(&self, coord: PixelCoord) -> bool {
        coord.0 >= 0 && coord.0 < self.width && coord.1 >= 0 && coord.1 < self.height
    }
}

/// A driver for an SSD1331 display.
pub struct Display<DI, D>
where
    DI: interface::DisplayInterface,
    D: DelayUs<u32>,
{
    iface: DI,
    delay: D,
    state: DeviceState,
}

impl<DI, D> Display<DI, D>
where
    DI: interface::DisplayInterface,
    D: DelayUs<u32>,
{
    /// Construct a new display driver connected to `iface`. `delay` is used to let the
    /// controller finish area fills and copies. `color_order` is how the module wires its color
    /// channels and cannot change afterwards.
    pub fn new(iface: DI, delay: D, color_order: ColorOrder) -> Self {
        Display {
            iface,
            delay,
            state: DeviceState::new(color_order),
        }
    }

    /// Give back the interface and delay provider.
    pub fn release(self) -> (DI, D) {
        (self.iface, self.delay)
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn width(&self) -> i16 {
        self.state.width
    }

    pub fn height(&self) -> i16 {
        self.state.height
    }

    pub fn rotation(&self) -> Rotation {
        self.state.rotation
    }

    /// Initialize the display with a config message. The display comes up unrotated, in normal
    /// mode, and switched on.
    pub fn init(&mut self, config: &Config) -> Result<(), Error<DI::Error>> {
        debug!("initializing SSD1331, {:?} color order", self.state.color_order);
        let color_order = self.state.color_order;
        self.session(|d| {
            let iface = &mut d.iface;
            Command::SetDisplayOn(false).send(iface)?;
            Command::SetRemap(color_order, Rotation::Rotate0).send(iface)?;
            Command::SetStartLine(0).send(iface)?;
            Command::SetDisplayOffset(0).send(iface)?;
            Command::SetDisplayMode(DisplayMode::Normal).send(iface)?;
            config.send(iface)?;
            Command::SetDisplayOn(true).send(iface)
        })?;
        self.state.set_rotation(Rotation::Rotate0);
        self.state.enabled = true;
        self.state.inverted = false;
        Ok(())
    }

    /// Rotate the display. Only the low two bits of a `u8` rotation are used. The logical
    /// width and height follow the rotation, and the remap register is rewritten, which takes
    /// effect for everything drawn afterwards.
    pub fn set_rotation<R>(&mut self, rotation: R) -> Result<(), Error<DI::Error>>
    where
        R: Into<Rotation>,
    {
        let rotation = rotation.into();
        let color_order = self.state.color_order;
        self.session(|d| Command::SetRemap(color_order, rotation).send(&mut d.iface))?;
        self.state.set_rotation(rotation);
        debug!(
            "rotation {:?}, logical size {}x{}",
            rotation, self.state.width, self.state.height
        );
        Ok(())
    }

    /// Switch the panel on or off. Display RAM is retained while off.
    pub fn enable_display(&mut self, enable: bool) -> Result<(), Error<DI::Error>> {
        debug!("display {}", if enable { "on" } else { "off" });
        self.session(|d| Command::SetDisplayOn(enable).send(&mut d.iface))?;
        self.state.enabled = enable;
        Ok(())
    }

    /// Invert all colors in hardware, or go back to normal.
    pub fn invert_display(&mut self, invert: bool) -> Result<(), Error<DI::Error>> {
        let mode = if invert {
            DisplayMode::Inverse
        } else {
            DisplayMode::Normal
        };
        debug!("display mode {:?}", mode);
        self.session(|d| Command::SetDisplayMode(mode).send(&mut d.iface))?;
        self.state.inverted = invert;
        Ok(())
    }

    /// Control the contrast current of the three color channels.
    pub fn set_contrast(&mut self, a: u8, b: u8, c: u8) -> Result<(), Error<DI::Error>> {
        self.session(|d| {
            Command::SetContrast(ColorChannel::A, a).send(&mut d.iface)?;
            Command::SetContrast(ColorChannel::B, b).send(&mut d.iface)?;
            Command::SetContrast(ColorChannel::C, c).send(&mut d.iface)
        })
    }

    /// Set the vertical pan.
    ///
    /// This uses the `Command::SetStartLine` feature to roll the display RAM rows upwards by
    /// `offset`, wrapping the top rows around to the bottom.
    pub fn vertical_pan(&mut self, offset: u8) -> Result<(), Error<DI::Error>> {
        self.session(|d| Command::SetStartLine(offset).send(&mut d.iface))
    }

    /// Run `f` inside one bus session. The session is closed even if `f` fails.
    fn session<T, F>(&mut self, f: F) -> Result<T, Error<DI::Error>>
    where
        F: FnOnce(&mut Self) -> Result<T, Error<DI::Error>>,
    {
        self.iface.start_write().map_err(Error::Interface)?;
        let result = f(self);
        let closed = self.iface.end_write().map_err(Error::Interface);
        let value = result?;
        closed?;
        Ok(value)
    }

    /// Block until the acceleration engine is done with an area of `pixels` pixels.
    fn settle(&mut self, pixels: u32) {
        let us = timing::settle_delay_us(pixels);
        if us > 0 {
            self.delay.delay_us(us);
        }
    }
}
