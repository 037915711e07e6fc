//! Drawing primitives as a capability set, and a front-end built on them.
//!
//! A [`PrimitiveBackend`] draws the handful of shapes a controller can accelerate. [`Canvas`]
//! turns any backend into an embedded-graphics `DrawTarget` with a text cursor, and only ever
//! talks to the backend through these traits. Block copy is optional: the front-end asks for it
//! with [`PrimitiveBackend::as_block_copy`] and does without when it is missing.

use core::convert::TryFrom;

use embedded_hal::blocking::delay::DelayUs;
use itertools::iproduct;

use crate::display::Display;
use crate::error::Error;
use crate::interface::DisplayInterface;

pub mod canvas;

pub use self::canvas::Canvas;

/// Pixel-level drawing operations. Coordinates are logical, colors are 5-6-5 packed. Requests
/// reaching past the screen are clipped by the backend.
pub trait PrimitiveBackend {
    type Error;

    /// Logical width and height.
    fn size(&self) -> (i16, i16);

    fn draw_pixel(&mut self, x: i16, y: i16, color: u16) -> Result<(), Self::Error>;

    fn draw_fast_hline(&mut self, x: i16, y: i16, w: i16, color: u16)
        -> Result<(), Self::Error>;

    fn draw_fast_vline(&mut self, x: i16, y: i16, h: i16, color: u16)
        -> Result<(), Self::Error>;

    fn fill_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: u16)
        -> Result<(), Self::Error>;

    fn draw_line(&mut self, x0: i16, y0: i16, x1: i16, y1: i16, color: u16)
        -> Result<(), Self::Error>;

    fn draw_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: u16)
        -> Result<(), Self::Error>;

    /// Fill the `w` by `h` rectangle at (`x`, `y`) row by row from `colors`. Draws one pixel at a
    /// time unless the backend has something better.
    fn fill_contiguous<I>(
        &mut self,
        x: i16,
        y: i16,
        w: i16,
        h: i16,
        colors: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = u16>,
    {
        let (x, y) = (i32::from(x), i32::from(y));
        let rows = y..y + i32::from(h);
        let cols = x..x + i32::from(w);
        for ((row, col), color) in iproduct!(rows, cols).zip(colors) {
            if let (Ok(col), Ok(row)) = (i16::try_from(col), i16::try_from(row)) {
                self.draw_pixel(col, row, color)?;
            }
        }
        Ok(())
    }

    /// The block copy capability, if the backend has one.
    fn as_block_copy(&mut self) -> Option<&mut dyn BlockCopy<Error = Self::Error>> {
        None
    }
}

/// Moving rectangles of pixels around on the screen.
pub trait BlockCopy {
    type Error;

    /// Copy the `w` by `h` rectangle at (`x`, `y`) to (`dx`, `dy`), optionally inverting colors.
    #[allow(clippy::too_many_arguments)]
    fn copy_bits(
        &mut self,
        x: i16,
        y: i16,
        w: i16,
        h: i16,
        dx: i16,
        dy: i16,
        invert: bool,
    ) -> Result<(), Self::Error>;

    /// Move the screen contents up by `line_height` rows, clearing the bottom band.
    fn scroll_up(&mut self, line_height: i16) -> Result<(), Self::Error>;
}

impl<DI, D> PrimitiveBackend for Display<DI, D>
where
    DI: DisplayInterface,
    D: DelayUs<u32>,
{
    type Error = Error<DI::Error>;

    fn size(&self) -> (i16, i16) {
        (self.width(), self.height())
    }

    fn draw_pixel(&mut self, x: i16, y: i16, color: u16) -> Result<(), Self::Error> {
        Display::draw_pixel(self, x, y, color)
    }

    fn draw_fast_hline(&mut self, x: i16, y: i16, w: i16, color: u16) -> Result<(), Self::Error> {
        Display::draw_fast_hline(self, x, y, w, color)
    }

    fn draw_fast_vline(&mut self, x: i16, y: i16, h: i16, color: u16) -> Result<(), Self::Error> {
        Display::draw_fast_vline(self, x, y, h, color)
    }

    fn fill_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: u16) -> Result<(), Self::Error> {
        Display::fill_rect(self, x, y, w, h, color)
    }

    fn draw_line(
        &mut self,
        x0: i16,
        y0: i16,
        x1: i16,
        y1: i16,
        color: u16,
    ) -> Result<(), Self::Error> {
        Display::draw_line(self, x0, y0, x1, y1, color)
    }

    fn draw_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: u16) -> Result<(), Self::Error> {
        Display::draw_rect(self, x, y, w, h, color)
    }

    fn fill_contiguous<I>(
        &mut self,
        x: i16,
        y: i16,
        w: i16,
        h: i16,
        colors: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = u16>,
    {
        self.write_pixels(x, y, w, h, colors)
    }

    #[cfg(feature = "extras")]
    fn as_block_copy(&mut self) -> Option<&mut dyn BlockCopy<Error = Self::Error>> {
        Some(self)
    }
}

#[cfg(feature = "extras")]
impl<DI, D> BlockCopy for Display<DI, D>
where
    DI: DisplayInterface,
    D: DelayUs<u32>,
{
    type Error = Error<DI::Error>;

    fn copy_bits(
        &mut self,
        x: i16,
        y: i16,
        w: i16,
        h: i16,
        dx: i16,
        dy: i16,
        invert: bool,
    ) -> Result<(), Self::Error> {
        Display::copy_bits(self, x, y, w, h, dx, dy, invert)
    }

    fn scroll_up(&mut self, line_height: i16) -> Result<(), Self::Error> {
        Display::scroll_up(self, line_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ColorOrder;
    use crate::interface::test_spy::{TestSpyDelay, TestSpyInterface};

    fn display(di: &TestSpyInterface) -> Display<TestSpyInterface, TestSpyDelay> {
        Display::new(di.split(), di.delay(), ColorOrder::Rgb)
    }

    /// Draw a 2x2 block through the trait, the way a generic front-end would.
    fn block<B: PrimitiveBackend>(backend: &mut B) -> Result<(), B::Error> {
        backend.fill_contiguous(4, 4, 2, 2, vec![1, 2, 3, 4])
    }

    #[test]
    fn display_routes_through_trait() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        assert_eq!(PrimitiveBackend::size(&disp), (96, 64));
        PrimitiveBackend::fill_rect(&mut disp, 0, 0, 4, 4, 0).unwrap();
        PrimitiveBackend::draw_fast_hline(&mut disp, 0, 1, 4, 0xFFFF).unwrap();
        block(&mut disp).unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(sends!(
            [0x25, 0, 0, 3, 3], (delay 4),
            [0x21, 0, 1, 3, 1, 0x3E, 0x3F, 0x3E],
            [0x15, 4, 5, 0x75, 4, 5], (data [0, 1, 0, 2, 0, 3, 0, 4])
        ));
    }

    #[cfg(feature = "extras")]
    #[test]
    fn display_offers_block_copy() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        let copier = disp.as_block_copy().expect("display supports block copy");
        copier.scroll_up(8).unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(sends!(
            [0x26, 0x00, 0x23, 0, 8, 95, 63, 0, 0], (delay 1344),
            [0x25, 0, 56, 95, 63], (delay 192)
        ));
    }

    /// Records pixels only, to exercise the per-pixel default.
    struct Pixels(Vec<(i16, i16, u16)>);

    impl PrimitiveBackend for Pixels {
        type Error = ();

        fn size(&self) -> (i16, i16) {
            (8, 8)
        }

        fn draw_pixel(&mut self, x: i16, y: i16, color: u16) -> Result<(), ()> {
            self.0.push((x, y, color));
            Ok(())
        }

        fn draw_fast_hline(&mut self, _: i16, _: i16, _: i16, _: u16) -> Result<(), ()> {
            Ok(())
        }

        fn draw_fast_vline(&mut self, _: i16, _: i16, _: i16, _: u16) -> Result<(), ()> {
            Ok(())
        }

        fn fill_rect(&mut self, _: i16, _: i16, _: i16, _: i16, _: u16) -> Result<(), ()> {
            Ok(())
        }

        fn draw_line(&mut self, _: i16, _: i16, _: i16, _: i16, _: u16) -> Result<(), ()> {
            Ok(())
        }

        fn draw_rect(&mut self, _: i16, _: i16, _: i16, _: i16, _: u16) -> Result<(), ()> {
            Ok(())
        }
    }

    #[test]
    fn default_fill_contiguous_draws_pixels() {
        let mut px = Pixels(Vec::new());
        block(&mut px).unwrap();
        assert_eq!(px.0, vec![(4, 4, 1), (5, 4, 2), (4, 5, 3), (5, 5, 4)]);
        assert!(px.as_block_copy().is_none());
    }

    #[test]
    fn default_fill_contiguous_stops_with_colors() {
        let mut px = Pixels(Vec::new());
        px.fill_contiguous(0, 0, 3, 3, vec![7, 8]).unwrap();
        assert_eq!(px.0, vec![(0, 0, 7), (1, 0, 8)]);
    }
}
