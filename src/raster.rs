//! Software blit and stretch-blit kernels.
//!
//! The kernels are strict about source geometry (a source rectangle must lie
//! inside the addressable source surface) and forgiving about destination
//! geometry (the destination rectangle is clipped against the target, with
//! the scaling map computed from the unclipped rectangle so partial
//! visibility never distorts the image).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{codes, BufferError, Result};
use crate::geometry::{Point, Rect, Size};
use crate::target::DeviceContext;

/// Externally supplied interpolation mode for scaled transfers.
///
/// Numeric values follow the conventional drawing-API encoding, so modes
/// arriving as raw integers can be validated with `TryFrom<u32>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum InterpolationMode {
    Default = 0,
    Low = 1,
    High = 2,
    Bilinear = 3,
    Bicubic = 4,
    NearestNeighbor = 5,
    HighQualityBilinear = 6,
    HighQualityBicubic = 7,
}

impl InterpolationMode {
    /// Collapse the mode into the coarse quality the stretch kernel supports
    pub fn stretch_quality(self) -> StretchQuality {
        match self {
            InterpolationMode::Default
            | InterpolationMode::Low
            | InterpolationMode::NearestNeighbor => StretchQuality::Fast,
            InterpolationMode::High
            | InterpolationMode::Bilinear
            | InterpolationMode::Bicubic
            | InterpolationMode::HighQualityBilinear
            | InterpolationMode::HighQualityBicubic => StretchQuality::Smooth,
        }
    }
}

impl TryFrom<u32> for InterpolationMode {
    type Error = BufferError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(InterpolationMode::Default),
            1 => Ok(InterpolationMode::Low),
            2 => Ok(InterpolationMode::High),
            3 => Ok(InterpolationMode::Bilinear),
            4 => Ok(InterpolationMode::Bicubic),
            5 => Ok(InterpolationMode::NearestNeighbor),
            6 => Ok(InterpolationMode::HighQualityBilinear),
            7 => Ok(InterpolationMode::HighQualityBicubic),
            other => Err(BufferError::InvalidArgument(format!(
                "unrecognized interpolation mode {other}"
            ))),
        }
    }
}

impl FromStr for InterpolationMode {
    type Err = BufferError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Default" => Ok(InterpolationMode::Default),
            "Low" => Ok(InterpolationMode::Low),
            "High" => Ok(InterpolationMode::High),
            "Bilinear" => Ok(InterpolationMode::Bilinear),
            "Bicubic" => Ok(InterpolationMode::Bicubic),
            "NearestNeighbor" => Ok(InterpolationMode::NearestNeighbor),
            "HighQualityBilinear" => Ok(InterpolationMode::HighQualityBilinear),
            "HighQualityBicubic" => Ok(InterpolationMode::HighQualityBicubic),
            other => Err(BufferError::InvalidArgument(format!(
                "unrecognized interpolation mode \"{other}\""
            ))),
        }
    }
}

/// Coarse quality setting a device context applies to scaled copies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StretchQuality {
    /// Nearest-neighbor sampling, no smoothing
    #[default]
    Fast,
    /// Bilinear sampling
    Smooth,
}

fn source_in_range(src: &DeviceContext<'_>, rect: &Rect) -> Result<()> {
    let bounds = Rect::of_size(src.size());
    let inside = rect.x >= 0
        && rect.y >= 0
        && rect.right() <= bounds.right()
        && rect.bottom() <= bounds.bottom();
    if !inside {
        return Err(BufferError::NativeOperation {
            op: "blit",
            code: codes::SOURCE_OUT_OF_RANGE,
        });
    }
    Ok(())
}

/// Direct, unscaled block copy.
///
/// Copies `extent` pixels from `src_origin` in the source to `dst_origin`
/// in the destination. The destination is clipped against the target
/// bounds; the source rectangle must be fully addressable.
pub fn blit(
    dst: &mut DeviceContext<'_>,
    dst_origin: Point,
    src: &DeviceContext<'_>,
    src_origin: Point,
    extent: Size,
) -> Result<()> {
    if extent.is_empty() {
        return Ok(());
    }
    source_in_range(src, &Rect::at(src_origin, extent))?;

    let Some(visible) = Rect::at(dst_origin, extent).intersect(&Rect::of_size(dst.size())) else {
        return Ok(());
    };

    // Shift the source origin by however much the destination was clipped
    let sx = src_origin.x + (visible.x - dst_origin.x);
    let sy = src_origin.y + (visible.y - dst_origin.y);

    let dst_stride = dst.stride() as usize;
    let src_stride = src.stride() as usize;
    let row_bytes = visible.width as usize * 4;
    let src_pixels = src.pixels();
    let dst_pixels = dst.pixels_mut();

    for row in 0..visible.height as usize {
        let s = ((sy as usize + row) * src_stride + sx as usize) * 4;
        let d = ((visible.y as usize + row) * dst_stride + visible.x as usize) * 4;
        dst_pixels[d..d + row_bytes].copy_from_slice(&src_pixels[s..s + row_bytes]);
    }

    Ok(())
}

/// Scaled block copy from `src_rect` onto `dst_rect`.
///
/// Sampling follows the destination context's configured
/// [`StretchQuality`]. Callers wanting the lossless path for equal-size
/// rectangles use [`blit`] instead; this kernel always resamples.
pub fn stretch_blit(
    dst: &mut DeviceContext<'_>,
    dst_rect: Rect,
    src: &DeviceContext<'_>,
    src_rect: Rect,
) -> Result<()> {
    if dst_rect.is_empty() || src_rect.is_empty() {
        return Ok(());
    }
    source_in_range(src, &src_rect)?;

    let Some(visible) = dst_rect.intersect(&Rect::of_size(dst.size())) else {
        return Ok(());
    };

    let quality = dst.stretch_quality();
    let src_stride = src.stride() as usize;
    let dst_stride = dst.stride() as usize;

    // The map is computed from the unclipped destination rectangle
    let x_scale = src_rect.width as f32 / dst_rect.width as f32;
    let y_scale = src_rect.height as f32 / dst_rect.height as f32;

    let src_pixels = src.pixels();
    let dst_pixels = dst.pixels_mut();

    for y in visible.y..(visible.y + visible.height as i32) {
        let dy = (y - dst_rect.y) as f32;
        for x in visible.x..(visible.x + visible.width as i32) {
            let dx = (x - dst_rect.x) as f32;
            let sample = match quality {
                StretchQuality::Fast => sample_nearest(
                    src_pixels, src_stride, src_rect, dx * x_scale, dy * y_scale,
                ),
                StretchQuality::Smooth => sample_bilinear(
                    src_pixels,
                    src_stride,
                    src_rect,
                    (dx + 0.5) * x_scale - 0.5,
                    (dy + 0.5) * y_scale - 0.5,
                ),
            };
            let d = (y as usize * dst_stride + x as usize) * 4;
            dst_pixels[d..d + 4].copy_from_slice(&sample);
        }
    }

    Ok(())
}

fn read_px(pixels: &[u8], stride: usize, x: i32, y: i32) -> [u8; 4] {
    let idx = (y as usize * stride + x as usize) * 4;
    [pixels[idx], pixels[idx + 1], pixels[idx + 2], pixels[idx + 3]]
}

fn sample_nearest(pixels: &[u8], stride: usize, src_rect: Rect, u: f32, v: f32) -> [u8; 4] {
    let max_x = src_rect.x + src_rect.width as i32 - 1;
    let max_y = src_rect.y + src_rect.height as i32 - 1;
    let x = (src_rect.x + u as i32).clamp(src_rect.x, max_x);
    let y = (src_rect.y + v as i32).clamp(src_rect.y, max_y);
    read_px(pixels, stride, x, y)
}

fn sample_bilinear(pixels: &[u8], stride: usize, src_rect: Rect, u: f32, v: f32) -> [u8; 4] {
    let max_x = src_rect.x + src_rect.width as i32 - 1;
    let max_y = src_rect.y + src_rect.height as i32 - 1;

    let fu = u.max(0.0);
    let fv = v.max(0.0);
    let x0 = (src_rect.x + fu as i32).clamp(src_rect.x, max_x);
    let y0 = (src_rect.y + fv as i32).clamp(src_rect.y, max_y);
    let x1 = (x0 + 1).min(max_x);
    let y1 = (y0 + 1).min(max_y);
    let tx = fu.fract();
    let ty = fv.fract();

    let p00 = read_px(pixels, stride, x0, y0);
    let p10 = read_px(pixels, stride, x1, y0);
    let p01 = read_px(pixels, stride, x0, y1);
    let p11 = read_px(pixels, stride, x1, y1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] as f32 * (1.0 - tx) + p10[c] as f32 * tx;
        let bottom = p01[c] as f32 * (1.0 - tx) + p11[c] as f32 * tx;
        out[c] = (top * (1.0 - ty) + bottom * ty).round() as u8;
    }
    out
}
