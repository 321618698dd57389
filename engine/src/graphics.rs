use crate::{surface::SurfaceSize, ui::Rect};

pub type Color = [u8; 4];

// A tiny block font (no external deps). Kept deliberately simple.
const GLYPH_W: u32 = 3;
const GLYPH_H: u32 = 5;

pub fn glyph_advance_x(scale: u32) -> u32 {
    (GLYPH_W + 1) * scale.max(1)
}

pub fn line_advance_y(scale: u32) -> u32 {
    (GLYPH_H + 1) * scale.max(1)
}

/// Pixel width of `text` (single line) at `scale`.
pub fn text_width(text: &str, scale: u32) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 {
        return 0;
    }
    n * glyph_advance_x(scale) - scale.max(1)
}

/// A disc in surface coordinates. Centres may sit between pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
}

impl Circle {
    pub const fn new(cx: f32, cy: f32, radius: f32) -> Self {
        Self { cx, cy, radius }
    }

    /// A pixel belongs to the disc when its centre lies inside or on the circle.
    pub fn covers_pixel(&self, x: u32, y: u32) -> bool {
        let dx = x as f32 + 0.5 - self.cx;
        let dy = y as f32 + 0.5 - self.cy;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    /// Pixel bounds `(x0, y0, x1, y1)` (exclusive end) clamped to `size`.
    fn pixel_bounds(&self, size: SurfaceSize) -> Option<(u32, u32, u32, u32)> {
        if self.radius <= 0.0 {
            return None;
        }
        let x0 = (self.cx - self.radius).floor().max(0.0) as u32;
        let y0 = (self.cy - self.radius).floor().max(0.0) as u32;
        let x1 = ((self.cx + self.radius).ceil().max(0.0) as u32).min(size.width);
        let y1 = ((self.cy + self.radius).ceil().max(0.0) as u32).min(size.height);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, y0, x1, y1))
    }
}

/// Unified 2D rendering interface.
///
/// Scene code only talks to this trait, so the same drawing routine feeds a window or an
/// in-memory buffer.
pub trait Renderer2d {
    fn begin_frame(&mut self, size: SurfaceSize);
    fn size(&self) -> SurfaceSize;

    /// Opaque fill.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Opaque filled disc.
    fn fill_circle(&mut self, circle: Circle, color: Color);

    fn rect_outline(&mut self, rect: Rect, color: Color);
    fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32);

    /// Restricts all later drawing to the union of `circles` until [`Renderer2d::reset_clip`].
    fn clip_to_circles(&mut self, circles: &[Circle]);
    fn reset_clip(&mut self);

    fn clear(&mut self, color: Color) {
        let s = self.size();
        self.fill_rect(Rect::from_size(s.width, s.height), color);
    }
}

/// CPU renderer that draws into an RGBA frame buffer.
pub struct CpuRenderer<'a> {
    frame: &'a mut [u8],
    size: SurfaceSize,
    clip: Option<Vec<bool>>,
}

impl<'a> CpuRenderer<'a> {
    pub fn new(frame: &'a mut [u8], size: SurfaceSize) -> Self {
        Self {
            frame,
            size,
            clip: None,
        }
    }

    pub fn is_clipped(&self) -> bool {
        self.clip.is_some()
    }

    fn buffer_ok(&self) -> bool {
        let expected = self.size.rgba_len();
        expected != 0 && self.frame.len() >= expected
    }

    #[inline]
    fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.size.width || y >= self.size.height {
            return;
        }
        let i = (y as usize) * (self.size.width as usize) + x as usize;
        if let Some(mask) = &self.clip {
            if !mask.get(i).copied().unwrap_or(false) {
                return;
            }
        }
        let idx = i * 4;
        if let Some(px) = self.frame.get_mut(idx..idx + 4) {
            px.copy_from_slice(&color);
        }
    }

    fn draw_char(&mut self, x: u32, y: u32, ch: char, color: Color, scale: u32) {
        let rows = glyph_rows(ch);
        for (row, bits) in rows.into_iter().enumerate() {
            let py0 = y.saturating_add((row as u32).saturating_mul(scale));
            for col in 0..GLYPH_W {
                let mask = 1u8 << (GLYPH_W - 1 - col);
                if (bits & mask) == 0 {
                    continue;
                }
                let px0 = x.saturating_add(col.saturating_mul(scale));
                for dy in 0..scale {
                    for dx in 0..scale {
                        self.put_pixel(px0 + dx, py0 + dy, color);
                    }
                }
            }
        }
    }
}

impl Renderer2d for CpuRenderer<'_> {
    fn begin_frame(&mut self, size: SurfaceSize) {
        self.size = size;
        self.clip = None;
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if !self.buffer_ok() {
            return;
        }
        let max_x = rect.right().min(self.size.width);
        let max_y = rect.bottom().min(self.size.height);
        if rect.x >= max_x || rect.y >= max_y {
            return;
        }

        if self.clip.is_some() {
            for y in rect.y..max_y {
                for x in rect.x..max_x {
                    self.put_pixel(x, y, color);
                }
            }
            return;
        }

        let stride = self.size.width as usize * 4;
        let row_bytes = (max_x - rect.x) as usize * 4;
        let mut row_start = rect.y as usize * stride + rect.x as usize * 4;
        for _ in rect.y..max_y {
            let row = &mut self.frame[row_start..row_start + row_bytes];
            for px in row.chunks_exact_mut(4) {
                px.copy_from_slice(&color);
            }
            row_start += stride;
        }
    }

    fn fill_circle(&mut self, circle: Circle, color: Color) {
        if !self.buffer_ok() {
            return;
        }
        let Some((x0, y0, x1, y1)) = circle.pixel_bounds(self.size) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                if circle.covers_pixel(x, y) {
                    self.put_pixel(x, y, color);
                }
            }
        }
    }

    fn rect_outline(&mut self, rect: Rect, color: Color) {
        if rect.w == 0 || rect.h == 0 {
            return;
        }
        let (x1, y1) = (rect.right(), rect.bottom());

        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, 1), color);
        self.fill_rect(Rect::new(rect.x, y1 - 1, rect.w, 1), color);
        self.fill_rect(Rect::new(rect.x, rect.y, 1, rect.h), color);
        self.fill_rect(Rect::new(x1 - 1, rect.y, 1, rect.h), color);
    }

    fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32) {
        if !self.buffer_ok() {
            return;
        }
        let scale = scale.max(1);
        let adv_x = glyph_advance_x(scale);
        let adv_y = line_advance_y(scale);

        let mut cursor_x = x;
        let mut cursor_y = y;
        for ch in text.chars() {
            match ch {
                '\n' => {
                    cursor_x = x;
                    cursor_y = cursor_y.saturating_add(adv_y);
                    if cursor_y >= self.size.height {
                        break;
                    }
                    continue;
                }
                ' ' => {}
                _ => self.draw_char(cursor_x, cursor_y, ch, color, scale),
            }
            cursor_x = cursor_x.saturating_add(adv_x);
        }
    }

    fn clip_to_circles(&mut self, circles: &[Circle]) {
        let mut mask = vec![false; self.size.pixel_count()];
        let width = self.size.width as usize;
        for circle in circles {
            let Some((x0, y0, x1, y1)) = circle.pixel_bounds(self.size) else {
                continue;
            };
            for y in y0..y1 {
                for x in x0..x1 {
                    if circle.covers_pixel(x, y) {
                        mask[y as usize * width + x as usize] = true;
                    }
                }
            }
        }
        self.clip = Some(mask);
    }

    fn reset_clip(&mut self) {
        self.clip = None;
    }
}

fn glyph_rows(ch: char) -> [u8; GLYPH_H as usize] {
    let c = ch.to_ascii_uppercase();
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],

        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b111, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b101, 0b111, 0b111, 0b111, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b111, 0b101, 0b111, 0b110, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],

        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '<' => [0b001, 0b010, 0b100, 0b010, 0b001],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],

        _ => [0b111, 0b001, 0b010, 0b000, 0b010], // '?'
    }
}
