use log::debug;

use crate::error::{BufferError, Result};
use crate::geometry::{Rect, Size};

/// Largest backing store the allocator will hand out, in bytes (256 MiB).
/// Keeps a runaway resize loop from exhausting the process.
const MAX_SURFACE_BYTES: u64 = 256 * 1024 * 1024;

/// Pixel layout of a backing surface.
///
/// Allocation compatibility is checked against this: a surface reallocated
/// during growth inherits the format of the surface it replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// 8-bit RGBA, 4 bytes per pixel, row-major
    #[default]
    Rgba8,
}

impl PixelFormat {
    /// Bytes occupied by one pixel
    pub const fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// Capacity-sized pixel store plus the clip rectangle drawing is bound to.
///
/// The surface is addressable up to `capacity`; the owning buffer manager
/// keeps the clip at its current logical size so pixels outside it are never
/// drawn into or read back.
#[derive(Debug)]
pub struct BackingSurface {
    capacity: Size,
    format: PixelFormat,
    clip: Rect,
    pixels: Vec<u8>,
    released: bool,
}

impl BackingSurface {
    /// Maximum addressable dimensions
    pub fn capacity(&self) -> Size {
        self.capacity
    }

    /// Pixel layout of the store
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Current clip rectangle
    pub fn clip(&self) -> Rect {
        self.clip
    }

    /// Bind drawing to exactly `[0,0,size.width,size.height)`
    pub(crate) fn set_clip(&mut self, size: Size) {
        self.clip = Rect::of_size(size);
    }

    /// Row pitch in pixels (capacity width, not clip width)
    pub fn stride(&self) -> u32 {
        self.capacity.width
    }

    /// True once the allocator has released the store
    pub fn is_released(&self) -> bool {
        self.released
    }

    pub(crate) fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}

/// Allocates and releases backing surfaces.
///
/// Knows nothing about blitting or sizing policy; the buffer manager decides
/// when and how large, the allocator only satisfies or refuses the request.
#[derive(Debug, Default)]
pub struct SurfaceAllocator {
    allocations: u64,
}

impl SurfaceAllocator {
    /// Create new allocator
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of surfaces handed out so far
    pub fn allocations(&self) -> u64 {
        self.allocations
    }

    /// Allocate a zero-initialized surface addressable up to `capacity`.
    ///
    /// The new surface is format-compatible with `format` (the reference
    /// surface's layout during growth). Fails with
    /// [`BufferError::Allocation`] for degenerate or oversized capacities.
    pub fn allocate(&mut self, format: PixelFormat, capacity: Size) -> Result<BackingSurface> {
        if capacity.is_empty() {
            return Err(BufferError::Allocation {
                capacity,
                reason: "capacity has zero area",
            });
        }

        let bytes = capacity.area() * format.bytes_per_pixel() as u64;
        if bytes > MAX_SURFACE_BYTES {
            return Err(BufferError::Allocation {
                capacity,
                reason: "capacity exceeds maximum surface size",
            });
        }

        self.allocations += 1;
        debug!(
            "allocating {}x{} backing surface ({} bytes)",
            capacity.width, capacity.height, bytes
        );

        Ok(BackingSurface {
            capacity,
            format,
            clip: Rect::of_size(capacity),
            pixels: vec![0; bytes as usize],
            released: false,
        })
    }

    /// Free the surface's pixel store.
    ///
    /// No-op on an already-released surface; never fails.
    pub fn release(&self, surface: &mut BackingSurface) {
        if surface.released {
            return;
        }
        debug!(
            "releasing {}x{} backing surface",
            surface.capacity.width, surface.capacity.height
        );
        surface.pixels = Vec::new();
        surface.released = true;
    }
}
