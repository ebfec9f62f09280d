use crate::geometry::{Color, Rect, Size};
use crate::surface::BackingSurface;

/// Clipped drawing handle into a backing surface.
///
/// All writes land inside the surface's clip rectangle, which the owning
/// buffer manager keeps equal to the current logical size. Writes outside
/// the clip are dropped; reads outside return `None`.
pub struct Drawable<'a> {
    surface: &'a mut BackingSurface,
}

impl<'a> Drawable<'a> {
    pub(crate) fn new(surface: &'a mut BackingSurface) -> Self {
        Self { surface }
    }

    /// Drawable extent (the clip rectangle's size)
    pub fn size(&self) -> Size {
        self.surface.clip().size()
    }

    /// Fill the entire drawable region with `color`
    pub fn clear(&mut self, color: Color) {
        let clip = self.surface.clip();
        self.fill_rect(clip, color);
    }

    /// Fill `rect` (clipped) with `color`
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let clip = self.surface.clip();
        let Some(rect) = rect.intersect(&clip) else {
            return;
        };

        let stride = self.surface.stride() as usize;
        let bytes = color.to_bytes();
        let pixels = self.surface.pixels_mut();

        for row in 0..rect.height as usize {
            let y = rect.y as usize + row;
            let start = (y * stride + rect.x as usize) * 4;
            for px in pixels[start..start + rect.width as usize * 4].chunks_exact_mut(4) {
                px.copy_from_slice(&bytes);
            }
        }
    }

    /// Set a single pixel; no effect outside the clip
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if !self.surface.clip().contains(x, y) {
            return;
        }
        let stride = self.surface.stride() as usize;
        let idx = (y as usize * stride + x as usize) * 4;
        self.surface.pixels_mut()[idx..idx + 4].copy_from_slice(&color.to_bytes());
    }

    /// Read a pixel inside the clip, `None` outside
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if !self.surface.clip().contains(x, y) {
            return None;
        }
        let stride = self.surface.stride() as usize;
        let idx = (y as usize * stride + x as usize) * 4;
        let px = &self.surface.pixels()[idx..idx + 4];
        Some(Color::from_bytes([px[0], px[1], px[2], px[3]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{PixelFormat, SurfaceAllocator};

    fn surface(capacity: Size, logical: Size) -> BackingSurface {
        let mut allocator = SurfaceAllocator::new();
        let mut surface = allocator.allocate(PixelFormat::Rgba8, capacity).unwrap();
        surface.set_clip(logical);
        surface
    }

    #[test]
    fn test_fill_respects_clip() {
        // Capacity larger than logical size: fill must stop at the clip
        let mut s = surface(Size::new(16, 16), Size::new(8, 8));
        {
            let mut drawable = Drawable::new(&mut s);
            drawable.clear(Color::RED);
        }
        let drawable = Drawable::new(&mut s);
        assert_eq!(drawable.pixel(7, 7), Some(Color::RED));
        assert_eq!(drawable.pixel(8, 8), None);

        // Raw store: pixel (8, 0) lies outside the clip and must be untouched
        let stride = s.stride() as usize;
        assert_eq!(&s.pixels()[8 * 4..8 * 4 + 4], &[0, 0, 0, 0]);
        assert_eq!(&s.pixels()[(8 * stride) * 4..(8 * stride) * 4 + 4], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_set_pixel_outside_clip_is_dropped() {
        let mut s = surface(Size::new(8, 8), Size::new(4, 4));
        let mut drawable = Drawable::new(&mut s);
        drawable.set_pixel(5, 5, Color::WHITE);
        drawable.set_pixel(-1, 0, Color::WHITE);
        drawable.set_pixel(2, 2, Color::WHITE);
        assert_eq!(drawable.pixel(2, 2), Some(Color::WHITE));
        assert_eq!(drawable.pixel(5, 5), None);
    }

    #[test]
    fn test_fill_rect_partial_overlap() {
        let mut s = surface(Size::new(8, 8), Size::new(8, 8));
        let mut drawable = Drawable::new(&mut s);
        drawable.fill_rect(Rect::new(6, 6, 10, 10), Color::rgb(9, 9, 9));
        assert_eq!(drawable.pixel(6, 6), Some(Color::rgb(9, 9, 9)));
        assert_eq!(drawable.pixel(5, 6), Some(Color::TRANSPARENT));
        assert_eq!(drawable.pixel(7, 7), Some(Color::rgb(9, 9, 9)));
    }
}
