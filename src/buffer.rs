use log::debug;

use crate::draw::Drawable;
use crate::error::{BufferError, Result};
use crate::geometry::{Point, Rect, Size};
use crate::raster::{self, InterpolationMode};
use crate::surface::{BackingSurface, PixelFormat, SurfaceAllocator};
use crate::target::{DeviceContext, RenderTarget};

/// Per-axis growth factor applied when a resize exceeds capacity.
///
/// √2 per axis doubles the addressable area per growth step, so dragging a
/// window larger one pixel at a time reallocates logarithmically often
/// instead of on every resize.
const GROWTH_FACTOR: f32 = std::f32::consts::SQRT_2;

fn grow_axis(current: u32, requested: u32) -> u32 {
    requested.max((current as f32 * GROWTH_FACTOR) as u32)
}

/// Reusable off-screen buffer with flicker-free transfer to render targets.
///
/// Owns one capacity-sized [`BackingSurface`] at a time and keeps a logical
/// size within it. Shrinking or re-requesting a fitting size is O(1) and
/// never touches memory; only a size exceeding capacity on either axis
/// reallocates, growing each axis independently by at least √2.
///
/// Drawing happens through [`BufferManager::drawable`], whose clip is always
/// exactly the logical size. The `render*` family copies buffer contents onto
/// any [`RenderTarget`], 1:1 or scaled.
///
/// Not thread-safe: the type assumes a single UI/event-loop thread drives
/// resizes, drawing, and rendering. Concurrent use from multiple threads is
/// not supported and is not guarded against.
pub struct BufferManager {
    allocator: SurfaceAllocator,
    surface: Option<BackingSurface>,
    logical: Size,
    reallocations: u64,
}

impl BufferManager {
    /// Create a manager whose initial capacity is `initial`.
    ///
    /// Fails with [`BufferError::Configuration`] for a zero-area size and
    /// [`BufferError::Allocation`] when the surface cannot be allocated.
    pub fn new(initial: Size) -> Result<Self> {
        if initial.is_empty() {
            return Err(BufferError::Configuration(initial));
        }
        let mut allocator = SurfaceAllocator::new();
        let mut surface = allocator.allocate(PixelFormat::default(), initial)?;
        surface.set_clip(initial);
        Ok(Self {
            allocator,
            surface: Some(surface),
            logical: initial,
            reallocations: 0,
        })
    }

    /// Create a manager sized to a reference target.
    ///
    /// The target is only read during construction; it is not retained.
    pub fn for_target(reference: &dyn RenderTarget) -> Result<Self> {
        Self::new(reference.size())
    }

    fn surface_ref(&self) -> Result<&BackingSurface> {
        self.surface.as_ref().ok_or(BufferError::Disposed)
    }

    /// Current logical (drawable) size
    pub fn size(&self) -> Result<Size> {
        self.surface_ref()?;
        Ok(self.logical)
    }

    /// Current maximum addressable size of the backing surface
    pub fn capacity(&self) -> Result<Size> {
        Ok(self.surface_ref()?.capacity())
    }

    /// Number of backing-surface reallocations since construction
    pub fn reallocations(&self) -> Result<u64> {
        self.surface_ref()?;
        Ok(self.reallocations)
    }

    /// Resize the logical buffer.
    ///
    /// A size fitting the current capacity on both axes only moves the clip;
    /// no memory is touched. A size exceeding capacity on either axis
    /// reallocates at `max(floor(capacity * √2), requested)` per axis and
    /// releases the old surface. Pixel content is not preserved across a
    /// growing reallocation; the buffer comes back zeroed and callers are
    /// expected to repaint, as they would on any resize.
    ///
    /// On failure the previous size, capacity, and content are untouched.
    pub fn set_size(&mut self, new: Size) -> Result<()> {
        let surface = self.surface.as_mut().ok_or(BufferError::Disposed)?;
        if new.is_empty() {
            return Err(BufferError::Configuration(new));
        }

        let capacity = surface.capacity();
        if !new.fits_within(capacity) {
            let grown = Size::new(
                grow_axis(capacity.width, new.width),
                grow_axis(capacity.height, new.height),
            );
            debug!(
                "growing backing surface {}x{} -> {}x{} for requested {}x{}",
                capacity.width, capacity.height,
                grown.width, grown.height,
                new.width, new.height
            );
            let replacement = self.allocator.allocate(surface.format(), grown)?;
            let mut old = std::mem::replace(surface, replacement);
            self.allocator.release(&mut old);
            self.reallocations += 1;
        }

        self.logical = new;
        if let Some(surface) = self.surface.as_mut() {
            surface.set_clip(new);
        }
        Ok(())
    }

    /// Drawing handle into the buffer, clipped to the logical size.
    ///
    /// Reflects the most recent successful [`set_size`](Self::set_size).
    pub fn drawable(&mut self) -> Result<Drawable<'_>> {
        let surface = self.surface.as_mut().ok_or(BufferError::Disposed)?;
        Ok(Drawable::new(surface))
    }

    /// Copy the whole logical buffer onto `target` at `offset`, 1:1
    pub fn render(&mut self, target: &mut dyn RenderTarget, offset: Point) -> Result<()> {
        let logical = self.size()?;
        self.render_scaled(
            target,
            Rect::at(offset, logical),
            Rect::of_size(logical),
            InterpolationMode::Default,
        )
    }

    /// Copy `source` (buffer-local, clipped to the logical size) onto
    /// `target` at `offset`, 1:1
    pub fn render_region(
        &mut self,
        target: &mut dyn RenderTarget,
        offset: Point,
        source: Rect,
    ) -> Result<()> {
        let logical = self.size()?;
        let Some(clipped) = source.intersect(&Rect::of_size(logical)) else {
            return Ok(());
        };
        let shifted = Point::new(
            offset.x + (clipped.x - source.x),
            offset.y + (clipped.y - source.y),
        );
        self.render_scaled(
            target,
            Rect::at(shifted, clipped.size()),
            clipped,
            InterpolationMode::Default,
        )
    }

    /// Copy `source_rect` of the buffer into `target_rect` of `target`,
    /// scaling when the two rectangles differ in size.
    ///
    /// Equal-size rectangles always take the direct blit path, which is
    /// cheaper and lossless, regardless of `mode`. Unequal rectangles
    /// stretch-blit with `mode` collapsed to the coarse quality the kernel
    /// supports. `source_rect` must lie within the logical bounds; the
    /// destination is clipped against the target.
    pub fn render_scaled(
        &mut self,
        target: &mut dyn RenderTarget,
        target_rect: Rect,
        source_rect: Rect,
        mode: InterpolationMode,
    ) -> Result<()> {
        let logical = self.logical;
        let surface = self.surface.as_mut().ok_or(BufferError::Disposed)?;
        if target.size().is_empty() {
            return Err(BufferError::InvalidArgument(
                "render target has zero area".into(),
            ));
        }

        // Target context first, then source; locals drop in reverse order,
        // releasing source then target on every exit path below.
        let mut dst = target.device_context()?;
        let stride = surface.stride();
        let visible = stride as usize * logical.height as usize * 4;
        let src = DeviceContext::new(
            "buffer",
            &mut surface.pixels_mut()[..visible],
            logical,
            stride,
        )?;

        if source_rect.size() == target_rect.size() {
            raster::blit(
                &mut dst,
                target_rect.origin(),
                &src,
                source_rect.origin(),
                source_rect.size(),
            )
        } else {
            dst.set_stretch_quality(mode.stretch_quality());
            raster::stretch_blit(&mut dst, target_rect, &src, source_rect)
        }
    }

    /// True once [`dispose`](Self::dispose) has run
    pub fn is_disposed(&self) -> bool {
        self.surface.is_none()
    }

    /// Release the backing surface.
    ///
    /// Idempotent: the first call releases, later calls are no-ops. Every
    /// other operation on a disposed manager fails with
    /// [`BufferError::Disposed`].
    pub fn dispose(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            self.allocator.release(&mut surface);
        }
    }
}

impl Drop for BufferManager {
    fn drop(&mut self) {
        // Same idempotent path as an explicit dispose
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grow_axis_takes_larger_of_factor_and_request() {
        // 100 * sqrt2 = 141.42 -> floor 141
        assert_eq!(grow_axis(100, 101), 141);
        // Request beyond the factor wins
        assert_eq!(grow_axis(100, 300), 300);
        assert_eq!(grow_axis(1, 2), 2);
    }

    #[test]
    fn test_for_target_reads_reference_geometry() {
        let reference = crate::target::PixelTarget::new(Size::new(320, 200));
        let manager = BufferManager::for_target(&reference).unwrap();
        assert_eq!(manager.size().unwrap(), Size::new(320, 200));
        assert_eq!(manager.capacity().unwrap(), Size::new(320, 200));
    }
}
