//! An embedded-graphics front-end over a [`PrimitiveBackend`], with a text cursor.

use core::convert::TryFrom;
use core::fmt;

use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::raw::{RawData, RawU16};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};

use super::PrimitiveBackend;

fn raw(color: Rgb565) -> u16 {
    RawU16::from(color).into_inner()
}

/// A point in backend coordinates, or `None` if it is too far out to be on any screen.
fn coord(point: Point) -> Option<(i16, i16)> {
    match (i16::try_from(point.x), i16::try_from(point.y)) {
        (Ok(x), Ok(y)) => Some((x, y)),
        _ => None,
    }
}

/// A length in backend units. Anything longer than an `i16` reaches past every screen edge.
fn length(len: u32) -> i16 {
    i16::try_from(len).unwrap_or(i16::MAX)
}

/// Draws embedded-graphics primitives and text on a backend.
///
/// Solid fills become a single `fill_rect`, so rectangles and clears are accelerated on
/// backends that can. Styled lines and outlines drawn as embedded-graphics primitives arrive
/// as pixels; [`draw_line`](Canvas::draw_line) and [`draw_rect`](Canvas::draw_rect) hand them
/// to the backend whole instead.
///
/// Text is written at a cursor which advances one cell per character and wraps at the right
/// edge. With scrolling on, the screen contents move up when the next line would not fit.
/// Scrolling needs block copy from the backend; without it the cursor just runs off the bottom.
pub struct Canvas<B> {
    backend: B,
    cursor: Point,
    font: &'static MonoFont<'static>,
    text_color: Rgb565,
    background: Option<Rgb565>,
    wrap: bool,
    scroll: bool,
}

impl<B> Canvas<B>
where
    B: PrimitiveBackend,
{
    /// A canvas with the cursor at the origin, white 6x10 text on a transparent background,
    /// wrapping on and scrolling off.
    pub fn new(backend: B) -> Self {
        Canvas {
            backend,
            cursor: Point::zero(),
            font: &FONT_6X10,
            text_color: Rgb565::WHITE,
            background: None,
            wrap: true,
            scroll: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_inner(self) -> B {
        self.backend
    }

    /// Top left corner of the next character cell.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Point) {
        self.cursor = cursor;
    }

    pub fn set_font(&mut self, font: &'static MonoFont<'static>) {
        self.font = font;
    }

    /// Set the text color and, if `background` is given, the color the rest of each cell is
    /// painted in.
    pub fn set_text_color(&mut self, color: Rgb565, background: Option<Rgb565>) {
        self.text_color = color;
        self.background = background;
    }

    pub fn set_text_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    pub fn set_scroll(&mut self, scroll: bool) {
        self.scroll = scroll;
    }

    /// Draw a one pixel wide line between two points, both included. Horizontal and vertical
    /// lines go to the backend's fast line primitives.
    pub fn draw_line(&mut self, start: Point, end: Point, color: Rgb565) -> Result<(), B::Error> {
        if start.y == end.y {
            let left = start.x.min(end.x);
            let width = end.x.abs_diff(start.x).saturating_add(1);
            return self.draw_fast_hline(Point::new(left, start.y), width, color);
        }
        if start.x == end.x {
            let top = start.y.min(end.y);
            let height = end.y.abs_diff(start.y).saturating_add(1);
            return self.draw_fast_vline(Point::new(start.x, top), height, color);
        }
        match (coord(start), coord(end)) {
            (Some((x0, y0)), Some((x1, y1))) => {
                self.backend.draw_line(x0, y0, x1, y1, raw(color))
            }
            _ => Ok(()),
        }
    }

    /// Draw `width` pixels to the right of `start`, starting with `start` itself.
    pub fn draw_fast_hline(
        &mut self,
        start: Point,
        width: u32,
        color: Rgb565,
    ) -> Result<(), B::Error> {
        match coord(start) {
            Some((x, y)) => self.backend.draw_fast_hline(x, y, length(width), raw(color)),
            None => Ok(()),
        }
    }

    /// Draw `height` pixels downwards from `start`, starting with `start` itself.
    pub fn draw_fast_vline(
        &mut self,
        start: Point,
        height: u32,
        color: Rgb565,
    ) -> Result<(), B::Error> {
        match coord(start) {
            Some((x, y)) => self.backend.draw_fast_vline(x, y, length(height), raw(color)),
            None => Ok(()),
        }
    }

    /// Outline `rect` with a one pixel border.
    pub fn draw_rect(&mut self, rect: &Rectangle, color: Rgb565) -> Result<(), B::Error> {
        match coord(rect.top_left) {
            Some((x, y)) => self.backend.draw_rect(
                x,
                y,
                length(rect.size.width),
                length(rect.size.height),
                raw(color),
            ),
            None => Ok(()),
        }
    }

    /// Height of one text line in the current font.
    pub fn line_height(&self) -> i32 {
        self.font.character_size.height as i32
    }

    fn advance(&self) -> i32 {
        (self.font.character_size.width + self.font.character_spacing) as i32
    }

    /// Write one character at the cursor. `\n` starts a new line and `\r` is ignored.
    pub fn write_char(&mut self, c: char) -> Result<(), B::Error> {
        match c {
            '\n' => {
                self.scroll_if_needed()?;
                self.cursor = Point::new(0, self.cursor.y + self.line_height());
            }
            '\r' => {}
            _ => {
                let width = i32::from(self.backend.size().0);
                if self.wrap && self.cursor.x + self.advance() > width {
                    self.cursor = Point::new(0, self.cursor.y + self.line_height());
                }
                self.scroll_if_needed()?;

                let mut style = MonoTextStyle::new(self.font, self.text_color);
                style.background_color = self.background;
                let mut buf = [0u8; 4];
                let glyph = c.encode_utf8(&mut buf);
                Text::with_baseline(glyph, self.cursor, style, Baseline::Top).draw(self)?;
                self.cursor.x += self.advance();
            }
        }
        Ok(())
    }

    pub fn write_text(&mut self, text: &str) -> Result<(), B::Error> {
        text.chars().try_for_each(|c| self.write_char(c))
    }

    /// Make room for one more line at the bottom, if scrolling is on and the backend can copy.
    fn scroll_if_needed(&mut self) -> Result<(), B::Error> {
        let line_height = self.line_height();
        let height = i32::from(self.backend.size().1);
        if !self.scroll || self.cursor.y + line_height < height {
            return Ok(());
        }
        if let Some(copier) = self.backend.as_block_copy() {
            let lines = i16::try_from(line_height).unwrap_or(i16::MAX);
            copier.scroll_up(lines)?;
            self.cursor.y -= line_height;
        }
        Ok(())
    }
}

impl<B> OriginDimensions for Canvas<B>
where
    B: PrimitiveBackend,
{
    fn size(&self) -> Size {
        let (w, h) = self.backend.size();
        Size::new(w.max(0) as u32, h.max(0) as u32)
    }
}

impl<B> DrawTarget for Canvas<B>
where
    B: PrimitiveBackend,
{
    type Color = Rgb565;
    type Error = B::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some((x, y)) = coord(point) {
                self.backend.draw_pixel(x, y, raw(color))?;
            }
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        let geometry = (
            i16::try_from(area.top_left.x),
            i16::try_from(area.top_left.y),
            i16::try_from(area.size.width),
            i16::try_from(area.size.height),
        );
        match geometry {
            (Ok(x), Ok(y), Ok(w), Ok(h)) => {
                self.backend
                    .fill_contiguous(x, y, w, h, colors.into_iter().map(raw))
            }
            _ => self.draw_iter(
                area.points()
                    .zip(colors)
                    .map(|(point, color)| Pixel(point, color)),
            ),
        }
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if area.size.width == 0 || area.size.height == 0 {
            return Ok(());
        }
        self.backend.fill_rect(
            area.top_left.x as i16,
            area.top_left.y as i16,
            area.size.width as i16,
            area.size.height as i16,
            raw(color),
        )
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let (w, h) = self.backend.size();
        self.backend.fill_rect(0, 0, w, h, raw(color))
    }
}

impl<B> fmt::Write for Canvas<B>
where
    B: PrimitiveBackend,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_text(s).map_err(|_| fmt::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ColorOrder;
    use crate::display::Display;
    use crate::gfx::BlockCopy;
    use crate::interface::test_spy::TestSpyInterface;
    use core::fmt::Write;
    use embedded_graphics::primitives::{Line, PrimitiveStyle};

    #[derive(Clone, Debug, PartialEq)]
    enum Op {
        Pixel(i16, i16, u16),
        HLine(i16, i16, i16, u16),
        VLine(i16, i16, i16, u16),
        Line(i16, i16, i16, i16, u16),
        Rect(i16, i16, i16, i16, u16),
        FillRect(i16, i16, i16, i16, u16),
        ScrollUp(i16),
    }

    /// A 96x64 backend which records the operations it is asked for.
    struct Recorder {
        ops: Vec<Op>,
        block_copy: bool,
    }

    impl Recorder {
        fn new(block_copy: bool) -> Self {
            Recorder {
                ops: Vec::new(),
                block_copy,
            }
        }

        fn scrolls(&self) -> Vec<&Op> {
            self.ops
                .iter()
                .filter(|op| matches!(op, Op::ScrollUp(_)))
                .collect()
        }
    }

    impl PrimitiveBackend for Recorder {
        type Error = ();

        fn size(&self) -> (i16, i16) {
            (96, 64)
        }

        fn draw_pixel(&mut self, x: i16, y: i16, color: u16) -> Result<(), ()> {
            self.ops.push(Op::Pixel(x, y, color));
            Ok(())
        }

        fn draw_fast_hline(&mut self, x: i16, y: i16, w: i16, color: u16) -> Result<(), ()> {
            self.ops.push(Op::HLine(x, y, w, color));
            Ok(())
        }

        fn draw_fast_vline(&mut self, x: i16, y: i16, h: i16, color: u16) -> Result<(), ()> {
            self.ops.push(Op::VLine(x, y, h, color));
            Ok(())
        }

        fn fill_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: u16) -> Result<(), ()> {
            self.ops.push(Op::FillRect(x, y, w, h, color));
            Ok(())
        }

        fn draw_line(&mut self, x0: i16, y0: i16, x1: i16, y1: i16, c: u16) -> Result<(), ()> {
            self.ops.push(Op::Line(x0, y0, x1, y1, c));
            Ok(())
        }

        fn draw_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: u16) -> Result<(), ()> {
            self.ops.push(Op::Rect(x, y, w, h, color));
            Ok(())
        }

        fn as_block_copy(&mut self) -> Option<&mut dyn BlockCopy<Error = ()>> {
            if self.block_copy {
                Some(self)
            } else {
                None
            }
        }
    }

    impl BlockCopy for Recorder {
        type Error = ();

        fn copy_bits(
            &mut self,
            _: i16,
            _: i16,
            _: i16,
            _: i16,
            _: i16,
            _: i16,
            _: bool,
        ) -> Result<(), ()> {
            Ok(())
        }

        fn scroll_up(&mut self, line_height: i16) -> Result<(), ()> {
            self.ops.push(Op::ScrollUp(line_height));
            Ok(())
        }
    }

    #[test]
    fn filled_rectangle_is_one_fill() {
        let mut canvas = Canvas::new(Recorder::new(false));
        Rectangle::new(Point::new(2, 3), Size::new(10, 5))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
            .draw(&mut canvas)
            .unwrap();
        assert_eq!(canvas.backend().ops, vec![Op::FillRect(2, 3, 10, 5, 0xF800)]);
    }

    #[test]
    fn fill_solid_clips_to_screen() {
        let mut canvas = Canvas::new(Recorder::new(false));
        canvas
            .fill_solid(
                &Rectangle::new(Point::new(-4, 60), Size::new(10, 10)),
                Rgb565::BLUE,
            )
            .unwrap();
        canvas
            .fill_solid(
                &Rectangle::new(Point::new(100, 0), Size::new(10, 10)),
                Rgb565::BLUE,
            )
            .unwrap();
        assert_eq!(canvas.backend().ops, vec![Op::FillRect(0, 60, 6, 4, 0x001F)]);
    }

    #[test]
    fn clear_fills_screen() {
        let mut canvas = Canvas::new(Recorder::new(false));
        canvas.clear(Rgb565::BLACK).unwrap();
        assert_eq!(canvas.backend().ops, vec![Op::FillRect(0, 0, 96, 64, 0)]);
        assert_eq!(canvas.size(), Size::new(96, 64));
    }

    #[test]
    fn outlined_shapes_draw_pixels() {
        let mut canvas = Canvas::new(Recorder::new(false));
        Line::new(Point::new(0, 0), Point::new(2, 0))
            .into_styled(PrimitiveStyle::with_stroke(Rgb565::GREEN, 1))
            .draw(&mut canvas)
            .unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        assert_eq!(canvas.backend().ops, vec![
            Op::Pixel(0, 0, 0x07E0),
            Op::Pixel(1, 0, 0x07E0),
            Op::Pixel(2, 0, 0x07E0),
        ]);
    }

    #[test]
    fn lines_use_backend_primitives() {
        let mut canvas = Canvas::new(Recorder::new(false));
        canvas
            .draw_line(Point::new(9, 4), Point::new(2, 4), Rgb565::RED)
            .unwrap();
        canvas
            .draw_line(Point::new(3, 1), Point::new(3, 6), Rgb565::RED)
            .unwrap();
        canvas
            .draw_line(Point::new(0, 0), Point::new(5, 7), Rgb565::RED)
            .unwrap();
        canvas
            .draw_line(Point::new(0, 0), Point::new(70_000, 7), Rgb565::RED)
            .unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        assert_eq!(canvas.backend().ops, vec![
            Op::HLine(2, 4, 8, 0xF800),
            Op::VLine(3, 1, 6, 0xF800),
            Op::Line(0, 0, 5, 7, 0xF800),
        ]);
    }

    #[test]
    fn fast_lines_and_outline() {
        let mut canvas = Canvas::new(Recorder::new(false));
        canvas
            .draw_fast_hline(Point::new(1, 2), 10, Rgb565::BLUE)
            .unwrap();
        canvas
            .draw_fast_vline(Point::new(1, 2), 100_000, Rgb565::BLUE)
            .unwrap();
        canvas
            .draw_rect(
                &Rectangle::new(Point::new(4, 5), Size::new(6, 7)),
                Rgb565::BLUE,
            )
            .unwrap();
        canvas
            .draw_rect(
                &Rectangle::new(Point::new(-40_000, 5), Size::new(6, 7)),
                Rgb565::BLUE,
            )
            .unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        assert_eq!(canvas.backend().ops, vec![
            Op::HLine(1, 2, 10, 0x001F),
            Op::VLine(1, 2, i16::MAX, 0x001F),
            Op::Rect(4, 5, 6, 7, 0x001F),
        ]);
    }

    #[test]
    fn text_advances_cursor() {
        let mut canvas = Canvas::new(Recorder::new(false));
        canvas.write_text("ab").unwrap();
        assert_eq!(canvas.cursor(), Point::new(12, 0));
        assert!(canvas
            .backend()
            .ops
            .iter()
            .all(|op| matches!(op, Op::Pixel(x, y, 0xFFFF) if *x < 12 && *y < 10)));
    }

    #[test]
    fn text_background_paints_cell() {
        let mut canvas = Canvas::new(Recorder::new(false));
        canvas.set_text_color(Rgb565::WHITE, Some(Rgb565::BLACK));
        canvas.write_char(' ').unwrap();
        let painted: usize = canvas
            .backend()
            .ops
            .iter()
            .map(|op| match op {
                Op::Pixel(..) => 1,
                Op::FillRect(_, _, w, h, _) => (*w as usize) * (*h as usize),
                _ => 0,
            })
            .sum();
        assert_eq!(painted, 60);
    }

    #[test]
    fn newline_and_carriage_return() {
        let mut canvas = Canvas::new(Recorder::new(false));
        canvas.set_cursor(Point::new(30, 0));
        canvas.write_text("\r\n").unwrap();
        assert_eq!(canvas.cursor(), Point::new(0, 10));
        assert!(canvas.backend().ops.is_empty());
    }

    #[test]
    fn text_wraps_at_right_edge() {
        let mut canvas = Canvas::new(Recorder::new(false));
        canvas.set_cursor(Point::new(92, 0));
        canvas.write_char('x').unwrap();
        assert_eq!(canvas.cursor(), Point::new(6, 10));

        canvas.set_text_wrap(false);
        canvas.set_cursor(Point::new(92, 0));
        canvas.write_char('x').unwrap();
        assert_eq!(canvas.cursor(), Point::new(98, 0));
    }

    #[test]
    fn scrolls_when_line_does_not_fit() {
        let mut canvas = Canvas::new(Recorder::new(true));
        canvas.set_scroll(true);
        canvas.set_cursor(Point::new(0, 50));
        canvas.write_text("A\nB").unwrap();
        assert_eq!(canvas.backend().scrolls(), vec![&Op::ScrollUp(10)]);
        assert_eq!(canvas.cursor(), Point::new(6, 50));
    }

    #[test]
    fn no_scroll_without_block_copy() {
        let mut canvas = Canvas::new(Recorder::new(false));
        canvas.set_scroll(true);
        canvas.set_cursor(Point::new(0, 50));
        canvas.write_text("A\nB").unwrap();
        assert!(canvas.backend().scrolls().is_empty());
        assert_eq!(canvas.cursor(), Point::new(6, 60));
    }

    #[test]
    fn no_scroll_when_disabled() {
        let mut canvas = Canvas::new(Recorder::new(true));
        canvas.set_cursor(Point::new(0, 50));
        canvas.write_text("A\nB").unwrap();
        assert!(canvas.backend().scrolls().is_empty());
    }

    #[test]
    fn fmt_write() {
        let mut canvas = Canvas::new(Recorder::new(false));
        writeln!(canvas, "{}", 42).unwrap();
        assert_eq!(canvas.cursor(), Point::new(0, 10));
    }

    #[test]
    fn contiguous_fill_streams_to_display() {
        let di = TestSpyInterface::new();
        let disp = Display::new(di.split(), di.delay(), ColorOrder::Rgb);
        let mut canvas = Canvas::new(disp);
        let colors = [Rgb565::RED, Rgb565::GREEN, Rgb565::BLUE, Rgb565::WHITE];
        canvas
            .fill_contiguous(
                &Rectangle::new(Point::new(95, 0), Size::new(2, 2)),
                colors.iter().cloned(),
            )
            .unwrap();
        di.check_multi(sends!([0x15, 95, 95, 0x75, 0, 1], (data [0xF8, 0x00, 0x00, 0x1F])));
    }

    #[test]
    fn line_on_display_is_one_frame() {
        let di = TestSpyInterface::new();
        let disp = Display::new(di.split(), di.delay(), ColorOrder::Rgb);
        let mut canvas = Canvas::new(disp);
        canvas
            .draw_line(Point::new(0, 0), Point::new(95, 0), Rgb565::RED)
            .unwrap();
        canvas
            .draw_line(Point::new(0, 0), Point::new(95, 63), Rgb565::RED)
            .unwrap();
        canvas
            .draw_rect(
                &Rectangle::new(Point::new(1, 2), Size::new(4, 4)),
                Rgb565::BLUE,
            )
            .unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(sends!(
            [0x21, 0, 0, 95, 0, 0x3E, 0x00, 0x00],
            [0x21, 0, 0, 95, 63, 0x3E, 0x00, 0x00],
            [0x26, 0x00, 0x22, 1, 2, 4, 5, 0x00, 0x00, 0x3E, 0x00, 0x00, 0x3E]
        ));
        assert_eq!(di.sessions(), 3);
    }

    #[cfg(feature = "extras")]
    #[test]
    fn display_scrolls_with_block_copy() {
        let di = TestSpyInterface::new();
        let disp = Display::new(di.split(), di.delay(), ColorOrder::Rgb);
        let mut canvas = Canvas::new(disp);
        canvas.set_scroll(true);
        canvas.set_cursor(Point::new(0, 60));
        canvas.write_char('\n').unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(sends!(
            [0x26, 0x00, 0x23, 0, 10, 95, 63, 0, 0], (delay 1296),
            [0x25, 0, 54, 95, 63], (delay 240)
        ));
        assert_eq!(canvas.cursor(), Point::new(0, 60));
    }
}
