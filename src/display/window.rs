//! The addressing window, and streaming pixel data through it.
//!
//! Pixel data written in data mode lands in the window set by the column and row address
//! commands, left to right and top to bottom. Requests may overscan the screen: pixels that fall
//! outside the logical bounds are dropped from the stream before it reaches the bus.

use core::convert::TryFrom;

use embedded_hal::blocking::delay::DelayUs;
use itertools::iproduct;
use log::trace;

use crate::command::{Command, Frame};
use crate::display::{Display, PixelCoord};
use crate::error::{Error, OutOfRange};
use crate::interface::DisplayInterface;

/// Bytes of pixel data buffered per `send_data` call.
const CHUNK_BYTES: usize = 32;

/// First and last address of a run of `len` pixels from `start`, if both fit an address register.
fn span(start: i16, len: i16) -> Result<(u8, u8), OutOfRange> {
    if len <= 0 {
        return Err(OutOfRange);
    }
    let end = i32::from(start) + i32::from(len) - 1;
    match (u8::try_from(start), u8::try_from(end)) {
        (Ok(first), Ok(last)) => Ok((first, last)),
        _ => Err(OutOfRange),
    }
}

impl<DI, D> Display<DI, D>
where
    DI: DisplayInterface,
    D: DelayUs<u32>,
{
    /// Set the addressing window to the `w` by `h` rectangle at (`x`, `y`).
    ///
    /// The rectangle must already be clipped to the screen; one that does not fit the address
    /// registers is rejected with `Error::OutOfRange`. The column and row ranges are emitted in
    /// swapped order when the rotation is odd.
    pub fn set_window(&mut self, x: i16, y: i16, w: i16, h: i16) -> Result<(), Error<DI::Error>> {
        self.session(|d| d.emit_window(x, y, w, h))
    }

    /// `set_window` within the caller's session.
    pub(super) fn emit_window(
        &mut self,
        x: i16,
        y: i16,
        w: i16,
        h: i16,
    ) -> Result<(), Error<DI::Error>> {
        let xs = span(x, w)?;
        let ys = span(y, h)?;
        let mut frame = Frame::new();
        if self.state.rotation.swaps_axes() {
            Command::SetRowAddress(xs.0, xs.1).append_to(&mut frame)?;
            Command::SetColumnAddress(ys.0, ys.1).append_to(&mut frame)?;
        } else {
            Command::SetColumnAddress(xs.0, xs.1).append_to(&mut frame)?;
            Command::SetRowAddress(ys.0, ys.1).append_to(&mut frame)?;
        }
        frame.send(&mut self.iface)
    }

    /// Draw a single pixel through a 1x1 addressing window. Off-screen pixels are dropped.
    pub fn draw_pixel(&mut self, x: i16, y: i16, color: u16) -> Result<(), Error<DI::Error>> {
        if !self.state.contains(PixelCoord(x, y)) {
            trace!("pixel ({}, {}) off-screen, dropped", x, y);
            return Ok(());
        }
        self.session(|d| {
            d.emit_window(x, y, 1, 1)?;
            d.iface
                .send_data(&color.to_be_bytes())
                .map_err(Error::Interface)
        })
    }

    /// Stream 5-6-5 colors into the `w` by `h` rectangle at (`x`, `y`), left to right and top
    /// to bottom. The rectangle may overscan the screen; colors for pixels outside it are
    /// consumed but not sent. Streaming stops when the rectangle is full or `colors` runs out.
    pub fn write_pixels<I>(
        &mut self,
        x: i16,
        y: i16,
        w: i16,
        h: i16,
        colors: I,
    ) -> Result<(), Error<DI::Error>>
    where
        I: IntoIterator<Item = u16>,
    {
        if w <= 0 || h <= 0 {
            return Ok(());
        }
        let (left, top) = (i32::from(x), i32::from(y));
        let (right, bottom) = (left + i32::from(w), top + i32::from(h));
        let (width, height) = (i32::from(self.state.width), i32::from(self.state.height));
        let visible = (
            left.max(0),
            top.max(0),
            right.min(width),
            bottom.min(height),
        );
        if visible.0 >= visible.2 || visible.1 >= visible.3 {
            trace!("pixel block at ({}, {}) off-screen, dropped", x, y);
            return Ok(());
        }

        let only_visible = iproduct!(top..bottom, left..right)
            .zip(colors)
            .filter(|((r, c), _)| {
                *c >= visible.0 && *c < visible.2 && *r >= visible.1 && *r < visible.3
            })
            .map(|(_, color)| color);

        self.session(|d| {
            d.emit_window(
                visible.0 as i16,
                visible.1 as i16,
                (visible.2 - visible.0) as i16,
                (visible.3 - visible.1) as i16,
            )?;
            d.stream(only_visible)
        })
    }

    /// Send colors as big-endian data in constant memory, alternately filling a chunk buffer
    /// from the iterator and writing it to the display.
    fn stream<I>(&mut self, mut colors: I) -> Result<(), Error<DI::Error>>
    where
        I: Iterator<Item = u16>,
    {
        let mut buf = [0u8; CHUNK_BYTES];
        loop {
            let mut chunk_len = 0;
            for slot in buf.chunks_exact_mut(2) {
                match colors.next() {
                    Some(color) => {
                        slot.copy_from_slice(&color.to_be_bytes());
                        chunk_len += 2;
                    }
                    None => break,
                }
            }
            if chunk_len > 0 {
                self.iface
                    .send_data(&buf[..chunk_len])
                    .map_err(Error::Interface)?;
            }
            if chunk_len != buf.len() {
                return Ok(());
            }
        }
    }
}
