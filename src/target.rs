use log::trace;

use crate::error::{codes, BufferError, Result};
use crate::geometry::{Color, Size};
use crate::raster::StretchQuality;

/// A destination surface that blit operations can copy into.
///
/// Implementations hand out a [`DeviceContext`] for the duration of one
/// transfer; the context is released when it goes out of scope, on every
/// exit path.
pub trait RenderTarget {
    /// Addressable dimensions of the target
    fn size(&self) -> Size;

    /// Acquire a transient device context over the target's pixels
    fn device_context(&mut self) -> Result<DeviceContext<'_>>;
}

/// Transient, scoped handle over a raw RGBA8 pixel store.
///
/// Acquired immediately before a blit and released on drop. Carries the
/// stretch-quality setting that a scaled copy into this context will use.
pub struct DeviceContext<'a> {
    label: &'static str,
    pixels: &'a mut [u8],
    size: Size,
    stride: u32,
    quality: StretchQuality,
}

impl<'a> DeviceContext<'a> {
    /// Wrap a pixel store, validating its geometry.
    ///
    /// `stride` is the row pitch in pixels and may exceed `size.width` when
    /// the store is capacity-sized. Fails with a
    /// [`codes::BAD_CONTEXT_GEOMETRY`] native error when the store does not
    /// match the claimed geometry.
    pub fn new(
        label: &'static str,
        pixels: &'a mut [u8],
        size: Size,
        stride: u32,
    ) -> Result<Self> {
        let expected = stride as usize * size.height as usize * 4;
        if stride < size.width || pixels.len() != expected {
            return Err(BufferError::NativeOperation {
                op: "device context acquisition",
                code: codes::BAD_CONTEXT_GEOMETRY,
            });
        }
        trace!("acquired {} device context ({}x{})", label, size.width, size.height);
        Ok(Self {
            label,
            pixels,
            size,
            stride,
            quality: StretchQuality::Fast,
        })
    }

    /// Addressable dimensions
    pub fn size(&self) -> Size {
        self.size
    }

    /// Row pitch in pixels
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Quality applied by scaled copies into this context
    pub fn stretch_quality(&self) -> StretchQuality {
        self.quality
    }

    /// Configure the quality for subsequent scaled copies
    pub fn set_stretch_quality(&mut self, quality: StretchQuality) {
        self.quality = quality;
    }

    pub(crate) fn pixels(&self) -> &[u8] {
        self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u8] {
        self.pixels
    }
}

impl Drop for DeviceContext<'_> {
    fn drop(&mut self) {
        trace!("released {} device context", self.label);
    }
}

/// Owned in-memory RGBA8 render target.
///
/// The concrete destination used by the demos and tests; a windowing
/// integration would implement [`RenderTarget`] over its own pixel store
/// the same way.
#[derive(Debug, Clone)]
pub struct PixelTarget {
    size: Size,
    pixels: Vec<u8>,
}

impl PixelTarget {
    /// Create a zeroed target of the given size
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![0; size.byte_len()],
        }
    }

    /// Read a pixel, `None` outside the target
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x as u32 >= self.size.width || y as u32 >= self.size.height {
            return None;
        }
        let idx = (y as usize * self.size.width as usize + x as usize) * 4;
        let px = &self.pixels[idx..idx + 4];
        Some(Color::from_bytes([px[0], px[1], px[2], px[3]]))
    }

    /// Raw pixel bytes, row-major RGBA8
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

impl RenderTarget for PixelTarget {
    fn size(&self) -> Size {
        self.size
    }

    fn device_context(&mut self) -> Result<DeviceContext<'_>> {
        DeviceContext::new("target", &mut self.pixels, self.size, self.size.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_context_rejects_bad_geometry() {
        let mut pixels = vec![0u8; 10];
        let result = DeviceContext::new("test", &mut pixels, Size::new(4, 4), 4);
        assert!(matches!(
            result,
            Err(BufferError::NativeOperation { code, .. }) if code == codes::BAD_CONTEXT_GEOMETRY
        ));
    }

    #[test]
    fn test_device_context_rejects_stride_below_width() {
        let mut pixels = vec![0u8; 4 * 4 * 4];
        let result = DeviceContext::new("test", &mut pixels, Size::new(8, 2), 4);
        assert!(result.is_err());
    }

    #[test]
    fn test_pixel_target_round_trip() {
        let mut target = PixelTarget::new(Size::new(4, 4));
        {
            let mut ctx = target.device_context().unwrap();
            ctx.pixels_mut()[0..4].copy_from_slice(&[255, 0, 0, 255]);
        }
        assert_eq!(target.pixel(0, 0), Some(Color::RED));
        assert_eq!(target.pixel(4, 0), None);
    }
}
