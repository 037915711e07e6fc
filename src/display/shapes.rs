//! Shapes drawn by the graphic acceleration engine.
//!
//! Every request is clipped against the logical screen first. Requests that clip to nothing
//! return without touching the bus. The surviving corners are encoded in a frame built for the
//! current rotation, so the axis swap happens once, in `Frame::push_coord`.

use embedded_hal::blocking::delay::DelayUs;
use log::trace;

use crate::command::{Command, Frame};
use crate::display::{Display, PixelCoord};
use crate::error::Error;
use crate::interface::DisplayInterface;

impl<DI, D> Display<DI, D>
where
    DI: DisplayInterface,
    D: DelayUs<u32>,
{
    /// Fill the `w` by `h` rectangle at (`x`, `y`) with a 5-6-5 `color`, clipped to the screen.
    ///
    /// Black is drawn with the clear command, and a rectangle one pixel wide or tall with the
    /// line command, since both are shorter on the wire than a filled rectangle. The call
    /// blocks afterwards for a time proportional to the area drawn.
    pub fn fill_rect(
        &mut self,
        x: i16,
        y: i16,
        w: i16,
        h: i16,
        color: u16,
    ) -> Result<(), Error<DI::Error>> {
        let (x0, y0) = (i32::from(x), i32::from(y));
        let (mut x1, mut y1) = (x0 + i32::from(w), y0 + i32::from(h));
        let (width, height) = (i32::from(self.state.width), i32::from(self.state.height));
        if x1 < 0 || x0 >= width || y1 < 0 || y0 >= height {
            trace!("fill ({}, {}) {}x{} off-screen, dropped", x, y, w, h);
            return Ok(());
        }
        let (x0, y0) = (x0.max(0), y0.max(0));
        x1 = x1.min(width);
        y1 = y1.min(height);
        if x1 - 1 < x0 || y1 - 1 < y0 {
            trace!("fill ({}, {}) {}x{} empty, dropped", x, y, w, h);
            return Ok(());
        }

        let start = PixelCoord(x0 as i16, y0 as i16);
        let end = PixelCoord((x1 - 1) as i16, (y1 - 1) as i16);
        let mut frame = Frame::rotated(self.state.rotation);
        if color == 0 {
            Command::Clear(start, end).append_to(&mut frame)?;
        } else if start.0 == end.0 || start.1 == end.1 {
            Command::DrawLine(start, end, color).append_to(&mut frame)?;
        } else {
            Command::SetFillMode(true, false).append_to(&mut frame)?;
            Command::DrawRect(start, end, color, color).append_to(&mut frame)?;
        }
        self.session(|d| frame.send(&mut d.iface))?;
        self.settle(((x1 - x0) * (y1 - y0)) as u32);
        Ok(())
    }

    /// Fill the whole screen with `color`.
    pub fn fill_screen(&mut self, color: u16) -> Result<(), Error<DI::Error>> {
        let (w, h) = (self.state.width, self.state.height);
        self.fill_rect(0, 0, w, h, color)
    }

    /// Draw a line from (`x0`, `y0`) to (`x1`, `y1`), both ends included.
    ///
    /// The line is drawn only if both ends lie on the screen; a line running off the edge is
    /// dropped whole rather than trimmed.
    pub fn draw_line(
        &mut self,
        x0: i16,
        y0: i16,
        x1: i16,
        y1: i16,
        color: u16,
    ) -> Result<(), Error<DI::Error>> {
        let (start, end) = (PixelCoord(x0, y0), PixelCoord(x1, y1));
        if !self.state.contains(start) || !self.state.contains(end) {
            trace!("line {:?} to {:?} leaves the screen, dropped", start, end);
            return Ok(());
        }
        let mut frame = Frame::rotated(self.state.rotation);
        Command::DrawLine(start, end, color).append_to(&mut frame)?;
        self.session(|d| frame.send(&mut d.iface))
    }

    /// Horizontal line of `w` pixels starting at (`x`, `y`).
    pub fn draw_fast_hline(
        &mut self,
        x: i16,
        y: i16,
        w: i16,
        color: u16,
    ) -> Result<(), Error<DI::Error>> {
        if w <= 0 {
            return Ok(());
        }
        // Both line ends are inclusive, so `w` pixels end at `x + w - 1`.
        self.draw_line(x, y, x.saturating_add(w - 1), y, color)
    }

    /// Vertical line of `h` pixels starting at (`x`, `y`).
    pub fn draw_fast_vline(
        &mut self,
        x: i16,
        y: i16,
        h: i16,
        color: u16,
    ) -> Result<(), Error<DI::Error>> {
        if h <= 0 {
            return Ok(());
        }
        // Inclusive end, as in `draw_fast_hline`.
        self.draw_line(x, y, x, y.saturating_add(h - 1), color)
    }

    /// Outline the `w` by `h` rectangle at (`x`, `y`).
    ///
    /// Unlike `fill_rect`, the origin is not clipped: a rectangle whose top left corner is off
    /// the screen is not drawn at all. Only the far edges are pulled in to the screen.
    pub fn draw_rect(
        &mut self,
        x: i16,
        y: i16,
        w: i16,
        h: i16,
        color: u16,
    ) -> Result<(), Error<DI::Error>> {
        let start = PixelCoord(x, y);
        if !self.state.contains(start) || w <= 0 || h <= 0 {
            trace!("outline ({}, {}) {}x{} dropped", x, y, w, h);
            return Ok(());
        }
        let x1 = (i32::from(x) + i32::from(w)).min(i32::from(self.state.width));
        let y1 = (i32::from(y) + i32::from(h)).min(i32::from(self.state.height));
        let end = PixelCoord((x1 - 1) as i16, (y1 - 1) as i16);

        let mut frame = Frame::rotated(self.state.rotation);
        Command::SetFillMode(false, false).append_to(&mut frame)?;
        Command::DrawRect(start, end, color, color).append_to(&mut frame)?;
        self.session(|d| frame.send(&mut d.iface))
    }

    /// Copy the `w` by `h` rectangle at (`x`, `y`) so its top left corner lands on (`dx`, `dy`),
    /// optionally inverting the colors on the way.
    ///
    /// Source and destination are clipped together so both stay on the screen, which lets `dx`
    /// and `dy` go negative: a destination above the screen drops the top rows of the source.
    #[cfg(feature = "extras")]
    #[allow(clippy::too_many_arguments)]
    pub fn copy_bits(
        &mut self,
        x: i16,
        y: i16,
        w: i16,
        h: i16,
        dx: i16,
        dy: i16,
        invert: bool,
    ) -> Result<(), Error<DI::Error>> {
        let width = i32::from(self.state.width);
        let height = i32::from(self.state.height);
        let (x, dx, w) = clip_copy_axis(x.into(), dx.into(), w.into(), width);
        let (y, dy, h) = clip_copy_axis(y.into(), dy.into(), h.into(), height);
        if w <= 0 || h <= 0 {
            trace!("copy to ({}, {}) clipped away", dx, dy);
            return Ok(());
        }

        let coord = |c: i32, r: i32| PixelCoord(c as i16, r as i16);
        let mut frame = Frame::rotated(self.state.rotation);
        Command::SetFillMode(false, invert).append_to(&mut frame)?;
        Command::Copy(coord(x, y), coord(x + w - 1, y + h - 1), coord(dx, dy))
            .append_to(&mut frame)?;
        self.session(|d| frame.send(&mut d.iface))?;
        self.settle((w * h) as u32);
        Ok(())
    }

    /// Move the whole screen up by `line_height` rows and clear the band left at the bottom.
    #[cfg(feature = "extras")]
    pub fn scroll_up(&mut self, line_height: i16) -> Result<(), Error<DI::Error>> {
        let (w, h) = (self.state.width, self.state.height);
        self.copy_bits(0, 0, w, h, 0, line_height.saturating_neg(), false)?;
        self.fill_rect(0, h.saturating_sub(line_height), w, line_height, 0)
    }
}

/// Clip one axis of a copy so that both the source run starting at `src` and the destination
/// run starting at `dst`, each `len` long, lie within `0..limit`.
#[cfg(feature = "extras")]
fn clip_copy_axis(mut src: i32, mut dst: i32, mut len: i32, limit: i32) -> (i32, i32, i32) {
    let low = src.min(dst);
    let high = src.max(dst) + len;
    if low < 0 {
        src -= low;
        dst -= low;
        len += low;
    }
    if high > limit {
        len -= high - limit;
    }
    (src, dst, len)
}
