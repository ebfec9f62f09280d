//! Off-screen pixel buffer management with flicker-free blitting.
//!
//! A [`BufferManager`] owns a reusable backing surface, grows it with a
//! reuse-biased √2-per-axis policy across resizes, and copies its contents
//! onto any [`RenderTarget`] either 1:1 or scaled.

pub mod buffer;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod raster;
pub mod surface;
pub mod target;

pub use buffer::BufferManager;
pub use draw::Drawable;
pub use error::{BufferError, Result};
pub use geometry::{Color, Point, Rect, Size};
pub use raster::{InterpolationMode, StretchQuality};
pub use surface::{BackingSurface, PixelFormat, SurfaceAllocator};
pub use target::{DeviceContext, PixelTarget, RenderTarget};
