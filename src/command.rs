//! The command set for the SSD1331.
//!
//! Unlike most controllers, the SSD1331 expects command operands with D/C held low, so a
//! command and its operands travel together in one command-mode [`Frame`]. The drawing commands
//! of the graphic acceleration engine take coordinates in the order the controller scans, which
//! depends on the rotation; a frame built with [`Frame::rotated`] performs that axis swap when
//! coordinates are appended.

use crate::display::PixelCoord;
use crate::error::{Error, OutOfRange};
use crate::interface::DisplayInterface;

pub mod consts {
    //! Opcodes and panel geometry.

    pub const NUM_PIXEL_COLS: u8 = 96;
    pub const NUM_PIXEL_ROWS: u8 = 64;
    pub const PIXEL_COL_MAX: u8 = NUM_PIXEL_COLS - 1;
    pub const PIXEL_ROW_MAX: u8 = NUM_PIXEL_ROWS - 1;

    pub const CMD_DRAWLINE: u8 = 0x21;
    pub const CMD_DRAWRECT: u8 = 0x22;
    pub const CMD_COPY: u8 = 0x23;
    pub const CMD_CLEAR: u8 = 0x25;
    pub const CMD_FILL: u8 = 0x26;
    pub const CMD_SETCOLUMN: u8 = 0x15;
    pub const CMD_SETROW: u8 = 0x75;
    pub const CMD_CONTRASTA: u8 = 0x81;
    pub const CMD_CONTRASTB: u8 = 0x82;
    pub const CMD_CONTRASTC: u8 = 0x83;
    pub const CMD_MASTERCURRENT: u8 = 0x87;
    pub const CMD_PRECHARGEA: u8 = 0x8A;
    pub const CMD_PRECHARGEB: u8 = 0x8B;
    pub const CMD_PRECHARGEC: u8 = 0x8C;
    pub const CMD_SETREMAP: u8 = 0xA0;
    pub const CMD_STARTLINE: u8 = 0xA1;
    pub const CMD_DISPLAYOFFSET: u8 = 0xA2;
    pub const CMD_NORMALDISPLAY: u8 = 0xA4;
    pub const CMD_DISPLAYALLON: u8 = 0xA5;
    pub const CMD_DISPLAYALLOFF: u8 = 0xA6;
    pub const CMD_INVERTDISPLAY: u8 = 0xA7;
    pub const CMD_SETMULTIPLEX: u8 = 0xA8;
    pub const CMD_SETMASTER: u8 = 0xAD;
    pub const CMD_DISPLAYOFF: u8 = 0xAE;
    pub const CMD_DISPLAYON: u8 = 0xAF;
    pub const CMD_POWERMODE: u8 = 0xB0;
    pub const CMD_PRECHARGE: u8 = 0xB1;
    pub const CMD_CLOCKDIV: u8 = 0xB3;
    pub const CMD_PRECHARGELEVEL: u8 = 0xBB;
    pub const CMD_VCOMH: u8 = 0xBE;
}

use self::consts::*;

/// Order of the color channels in the panel wiring. This is a property of the module and is
/// chosen once, when the driver is constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorOrder {
    Rgb,
    Bgr,
}

impl ColorOrder {
    fn remap_bits(self) -> u8 {
        match self {
            ColorOrder::Rgb => 0b0110_0000,
            ColorOrder::Bgr => 0b0110_0100,
        }
    }
}

/// Display rotation, clockwise. Odd rotations swap the logical width and height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    Rotate0,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl Rotation {
    /// Whether logical x maps onto controller rows rather than columns.
    pub fn swaps_axes(self) -> bool {
        match self {
            Rotation::Rotate90 | Rotation::Rotate270 => true,
            Rotation::Rotate0 | Rotation::Rotate180 => false,
        }
    }

    /// Scan direction and column/row mapping bits of the remap register.
    fn remap_bits(self) -> u8 {
        match self {
            Rotation::Rotate0 => 0b0001_0010,
            Rotation::Rotate90 => 0b0000_0011,
            Rotation::Rotate180 => 0b0000_0000,
            Rotation::Rotate270 => 0b0001_0001,
        }
    }
}

/// Only the low two bits are significant, so `4` is `Rotate0` again.
impl From<u8> for Rotation {
    fn from(r: u8) -> Self {
        match r & 0x03 {
            0 => Rotation::Rotate0,
            1 => Rotation::Rotate90,
            2 => Rotation::Rotate180,
            _ => Rotation::Rotate270,
        }
    }
}

/// One of the three color channels, which have separate contrast and precharge registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorChannel {
    A,
    B,
    C,
}

/// Setting of the display mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    /// The display shows the image in the display RAM.
    Normal,
    /// All pixels on at full brightness, regardless of display RAM.
    AllOn,
    /// All pixels off, regardless of display RAM.
    AllOff,
    /// The display shows the image in the display RAM with every color inverted.
    Inverse,
}

/// Largest frame any driver operation builds: fill mode + draw rectangle with two colors.
pub const FRAME_CAPACITY: usize = 16;

/// A run of bytes sent in a single command-mode bracket.
pub struct Frame {
    buf: [u8; FRAME_CAPACITY],
    len: usize,
    swap_axes: bool,
}

impl Frame {
    /// An empty frame whose coordinates are sent in (x, y) order.
    pub fn new() -> Self {
        Frame {
            buf: [0; FRAME_CAPACITY],
            len: 0,
            swap_axes: false,
        }
    }

    /// An empty frame whose coordinates are swapped to (y, x) when `rotation` is odd.
    pub fn rotated(rotation: Rotation) -> Self {
        Frame {
            swap_axes: rotation.swaps_axes(),
            ..Frame::new()
        }
    }

    pub fn swaps_axes(&self) -> bool {
        self.swap_axes
    }

    pub(crate) fn push(&mut self, byte: u8) {
        self.buf[self.len] = byte;
        self.len += 1;
    }

    /// Append a coordinate pair. The coordinate must already be clipped to the screen.
    pub(crate) fn push_coord(&mut self, coord: PixelCoord) {
        let (first, second) = if self.swap_axes {
            (coord.1, coord.0)
        } else {
            (coord.0, coord.1)
        };
        self.push(first as u8);
        self.push(second as u8);
    }

    /// Append a 5-6-5 packed color re-split into the three 6-bit channel operands the
    /// acceleration commands take.
    pub(crate) fn push_color(&mut self, color: u16) {
        self.push(((color >> 10) & 0x3E) as u8);
        self.push(((color >> 5) & 0x3F) as u8);
        self.push(((color << 1) & 0x3E) as u8);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn send<DI>(&self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        if self.is_empty() {
            return Ok(());
        }
        iface.send_command(self.as_bytes()).map_err(Error::Interface)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Set the column start and end address of the addressing window. Range is 0-95.
    SetColumnAddress(u8, u8),
    /// Set the row start and end address of the addressing window. Range is 0-63.
    SetRowAddress(u8, u8),
    /// Set the contrast current of one color channel. Range 0-255.
    SetContrast(ColorChannel, u8),
    /// Set the master current attenuation, scaling all three channels by (n+1)/16. Range 0-15.
    SetMasterCurrent(u8),
    /// Set the second precharge speed of one color channel. Range 0-255.
    SetSecondPrecharge(ColorChannel, u8),
    /// Set the remap register, which controls both the color channel order and the scan
    /// direction and column/row mapping for a rotation.
    SetRemap(ColorOrder, Rotation),
    /// Set the display RAM row shown on the first display row, rolling the image upwards.
    /// Range is 0-63.
    SetStartLine(u8),
    /// Set the COM line offset of the display. Range is 0-63.
    SetDisplayOffset(u8),
    /// Set the display operating mode. See enum for details.
    SetDisplayMode(DisplayMode),
    /// Set the MUX ratio, the number of active COM lines. Range 16-64.
    SetMuxRatio(u8),
    /// Select the external VCC supply in the master configuration register.
    SetMasterConfiguration,
    /// Turn the panel on or off. Display RAM is kept while off.
    SetDisplayOn(bool),
    /// Enable or disable the power save mode.
    SetPowerSave(bool),
    /// Set the phase 1 and phase 2 periods. Both range from 1-15 DCLKs.
    SetPhaseLengths(u8, u8),
    /// Set the oscillator frequency Fosc (0-15) and the display clock divide ratio, where the
    /// divider is DIVSET+1 (DIVSET 0-15).
    SetClockFoscDivset(u8, u8),
    /// Set the precharge voltage level. Range 0-62.
    SetPrechargeLevel(u8),
    /// Set the COM deselect voltage level. Range 0-62.
    SetVcomh(u8),
    /// Draw a line between two points in the given 5-6-5 color.
    DrawLine(PixelCoord, PixelCoord, u16),
    /// Draw a rectangle between two corners with an outline and a fill color. The fill is only
    /// drawn when enabled with `SetFillMode`.
    DrawRect(PixelCoord, PixelCoord, u16, u16),
    /// Copy the rectangle between two corners to a destination origin.
    Copy(PixelCoord, PixelCoord, PixelCoord),
    /// Clear the rectangle between two corners to black.
    Clear(PixelCoord, PixelCoord),
    /// Enable filling for `DrawRect`, and color reversal for `Copy`.
    SetFillMode(bool, bool),
}

macro_rules! ok_command {
    ($frame:ident, $cmd:expr, [$($arg:expr),*]) => {{
        $frame.push($cmd);
        $($frame.push($arg);)*
        Ok(())
    }};
}

impl Command {
    /// Append the opcode and operands of this command to `frame`. Configuration commands check
    /// their operand ranges and append nothing if a check fails. Drawing commands are not
    /// checked: their coordinates must already lie on the screen.
    pub fn append_to(self, frame: &mut Frame) -> Result<(), OutOfRange> {
        match self {
            Command::SetColumnAddress(start, end) => match (start, end) {
                (0..=PIXEL_COL_MAX, 0..=PIXEL_COL_MAX) => {
                    ok_command!(frame, CMD_SETCOLUMN, [start, end])
                }
                _ => Err(OutOfRange),
            },
            Command::SetRowAddress(start, end) => match (start, end) {
                (0..=PIXEL_ROW_MAX, 0..=PIXEL_ROW_MAX) => {
                    ok_command!(frame, CMD_SETROW, [start, end])
                }
                _ => Err(OutOfRange),
            },
            Command::SetContrast(channel, contrast) => ok_command!(
                frame,
                match channel {
                    ColorChannel::A => CMD_CONTRASTA,
                    ColorChannel::B => CMD_CONTRASTB,
                    ColorChannel::C => CMD_CONTRASTC,
                },
                [contrast]
            ),
            Command::SetMasterCurrent(current) => match current {
                0..=15 => ok_command!(frame, CMD_MASTERCURRENT, [current]),
                _ => Err(OutOfRange),
            },
            Command::SetSecondPrecharge(channel, speed) => ok_command!(
                frame,
                match channel {
                    ColorChannel::A => CMD_PRECHARGEA,
                    ColorChannel::B => CMD_PRECHARGEB,
                    ColorChannel::C => CMD_PRECHARGEC,
                },
                [speed]
            ),
            Command::SetRemap(color_order, rotation) => ok_command!(
                frame,
                CMD_SETREMAP,
                [color_order.remap_bits() | rotation.remap_bits()]
            ),
            Command::SetStartLine(line) => match line {
                0..=PIXEL_ROW_MAX => ok_command!(frame, CMD_STARTLINE, [line]),
                _ => Err(OutOfRange),
            },
            Command::SetDisplayOffset(line) => match line {
                0..=PIXEL_ROW_MAX => ok_command!(frame, CMD_DISPLAYOFFSET, [line]),
                _ => Err(OutOfRange),
            },
            Command::SetDisplayMode(mode) => ok_command!(
                frame,
                match mode {
                    DisplayMode::Normal => CMD_NORMALDISPLAY,
                    DisplayMode::AllOn => CMD_DISPLAYALLON,
                    DisplayMode::AllOff => CMD_DISPLAYALLOFF,
                    DisplayMode::Inverse => CMD_INVERTDISPLAY,
                },
                []
            ),
            Command::SetMuxRatio(ratio) => match ratio {
                16..=NUM_PIXEL_ROWS => ok_command!(frame, CMD_SETMULTIPLEX, [ratio - 1]),
                _ => Err(OutOfRange),
            },
            Command::SetMasterConfiguration => ok_command!(frame, CMD_SETMASTER, [0x8E]),
            Command::SetDisplayOn(on) => ok_command!(
                frame,
                match on {
                    true => CMD_DISPLAYON,
                    false => CMD_DISPLAYOFF,
                },
                []
            ),
            Command::SetPowerSave(ena) => ok_command!(
                frame,
                CMD_POWERMODE,
                [match ena {
                    true => 0x1A,
                    false => 0x0B,
                }]
            ),
            Command::SetPhaseLengths(phase_1, phase_2) => match (phase_1, phase_2) {
                (1..=15, 1..=15) => ok_command!(frame, CMD_PRECHARGE, [phase_2 << 4 | phase_1]),
                _ => Err(OutOfRange),
            },
            Command::SetClockFoscDivset(fosc, divset) => match (fosc, divset) {
                (0..=15, 0..=15) => ok_command!(frame, CMD_CLOCKDIV, [fosc << 4 | divset]),
                _ => Err(OutOfRange),
            },
            Command::SetPrechargeLevel(level) => match level {
                0..=0x3E => ok_command!(frame, CMD_PRECHARGELEVEL, [level]),
                _ => Err(OutOfRange),
            },
            Command::SetVcomh(level) => match level {
                0..=0x3E => ok_command!(frame, CMD_VCOMH, [level]),
                _ => Err(OutOfRange),
            },
            Command::DrawLine(start, end, color) => {
                frame.push(CMD_DRAWLINE);
                frame.push_coord(start);
                frame.push_coord(end);
                frame.push_color(color);
                Ok(())
            }
            Command::DrawRect(start, end, outline, fill) => {
                frame.push(CMD_DRAWRECT);
                frame.push_coord(start);
                frame.push_coord(end);
                frame.push_color(outline);
                frame.push_color(fill);
                Ok(())
            }
            Command::Copy(start, end, dest) => {
                frame.push(CMD_COPY);
                frame.push_coord(start);
                frame.push_coord(end);
                frame.push_coord(dest);
                Ok(())
            }
            Command::Clear(start, end) => {
                frame.push(CMD_CLEAR);
                frame.push_coord(start);
                frame.push_coord(end);
                Ok(())
            }
            Command::SetFillMode(fill, reverse_copy) => {
                let f = if fill { 0x01 } else { 0x00 };
                let r = if reverse_copy { 0x10 } else { 0x00 };
                ok_command!(frame, CMD_FILL, [f | r])
            }
        }
    }

    /// Send this command in a frame of its own, with coordinates in unrotated order.
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let mut frame = Frame::new();
        self.append_to(&mut frame)?;
        frame.send(iface)
    }
}
