use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

/// A translated, clipped drawing area. Coordinates are relative to the
/// surface's own origin; anything outside the clip is dropped.
pub trait Surface {
    fn width(&self) -> u16;
    fn height(&self) -> u16;
    fn put_str(&mut self, x: i32, y: i32, text: &str, style: Style);
    /// Paint a whole line with `style`, clearing its text.
    fn fill_row(&mut self, y: i32, style: Style);
}

/// [`Surface`] over a region of a ratatui [`Buffer`].
pub struct BufferSurface<'a> {
    buf: &'a mut Buffer,
    origin_x: i32,
    origin_y: i32,
    width: u16,
    height: u16,
    clip: Rect,
}

impl<'a> BufferSurface<'a> {
    /// Surface at `(x, y)` of size `width` x `height` in buffer coordinates,
    /// clipped to `area`. The origin may lie outside the buffer.
    pub fn new(buf: &'a mut Buffer, area: Rect, x: i32, y: i32, width: u16, height: u16) -> Self {
        let clip = intersect(area.intersection(buf.area), x, y, width, height);
        Self {
            buf,
            origin_x: x,
            origin_y: y,
            width,
            height,
            clip,
        }
    }

    /// Nested surface at `(dx, dy)` of this one, clipped to this one.
    pub fn child(&mut self, dx: i32, dy: i32, width: u16, height: u16) -> BufferSurface<'_> {
        let x = self.origin_x + dx;
        let y = self.origin_y + dy;
        let clip = intersect(self.clip, x, y, width, height);
        BufferSurface {
            buf: &mut *self.buf,
            origin_x: x,
            origin_y: y,
            width,
            height,
            clip,
        }
    }

    /// Blank the whole surface.
    pub fn clear(&mut self) {
        for y in 0..i32::from(self.height) {
            self.fill_row(y, Style::default());
        }
    }

    fn position(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        let px = u16::try_from(self.origin_x + x).ok()?;
        let py = u16::try_from(self.origin_y + y).ok()?;
        let inside = px >= self.clip.x
            && px < self.clip.right()
            && py >= self.clip.y
            && py < self.clip.bottom();
        inside.then_some((px, py))
    }
}

impl Surface for BufferSurface<'_> {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn put_str(&mut self, x: i32, y: i32, text: &str, style: Style) {
        for (offset, ch) in text.chars().enumerate() {
            let Some(position) = self.position(x + offset as i32, y) else {
                continue;
            };
            if let Some(cell) = self.buf.cell_mut(position) {
                cell.set_char(ch).set_style(style);
            }
        }
    }

    fn fill_row(&mut self, y: i32, style: Style) {
        for x in 0..i32::from(self.width) {
            let Some(position) = self.position(x, y) else {
                continue;
            };
            if let Some(cell) = self.buf.cell_mut(position) {
                cell.reset();
                cell.set_style(style);
            }
        }
    }
}

/// Part of `clip` covered by the rectangle at `(x, y)`, which may start at
/// negative coordinates.
fn intersect(clip: Rect, x: i32, y: i32, width: u16, height: u16) -> Rect {
    let left = x.max(i32::from(clip.x));
    let top = y.max(i32::from(clip.y));
    let right = (x + i32::from(width)).min(i32::from(clip.right()));
    let bottom = (y + i32::from(height)).min(i32::from(clip.bottom()));
    if right <= left || bottom <= top {
        return Rect::new(clip.x, clip.y, 0, 0);
    }
    Rect::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_text_is_translated() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);
        let mut surface = BufferSurface::new(&mut buf, area, 2, 1, 5, 2);
        surface.put_str(1, 0, "ab", Style::default());
        assert_eq!(line(&buf, 1), "   ab     ");
    }

    #[test]
    fn test_text_is_clipped_to_bounds() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);
        let mut surface = BufferSurface::new(&mut buf, area, 0, 0, 4, 1);
        surface.put_str(2, 0, "abcdef", Style::default());
        surface.put_str(0, 1, "zz", Style::default());
        assert_eq!(line(&buf, 0), "  ab      ");
        assert_eq!(line(&buf, 1), "          ");
    }

    #[test]
    fn test_negative_origin_clips_left_edge() {
        let area = Rect::new(0, 0, 6, 1);
        let mut buf = Buffer::empty(area);
        let mut surface = BufferSurface::new(&mut buf, area, -2, 0, 6, 1);
        surface.put_str(0, 0, "hello", Style::default());
        assert_eq!(line(&buf, 0), "llo   ");
    }

    #[test]
    fn test_child_is_clipped_by_parent() {
        let area = Rect::new(0, 0, 8, 2);
        let mut buf = Buffer::empty(area);
        let mut surface = BufferSurface::new(&mut buf, area, 1, 0, 4, 2);
        let mut body = surface.child(0, 1, 10, 1);
        assert_eq!(body.width(), 10);
        body.put_str(0, 0, "abcdefg", Style::default());
        assert_eq!(line(&buf, 1), " abcd   ");
    }
}
