use thiserror::Error;

use crate::geometry::Size;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, BufferError>;

/// Stable numeric codes carried by [`BufferError::NativeOperation`].
///
/// The software raster layer plays the role of "the platform" here, so the
/// codes are crate-defined rather than read back from an OS.
pub mod codes {
    /// Device context geometry is inconsistent (length/stride mismatch)
    pub const BAD_CONTEXT_GEOMETRY: u32 = 0x01;
    /// Source rectangle escapes the addressable source surface
    pub const SOURCE_OUT_OF_RANGE: u32 = 0x02;
    /// Destination rectangle escapes the addressable target surface
    pub const DEST_OUT_OF_RANGE: u32 = 0x03;
}

/// Errors surfaced by buffer management and blit operations
#[derive(Debug, Error)]
pub enum BufferError {
    /// Operation invoked on a disposed buffer manager
    #[error("buffer manager has been disposed")]
    Disposed,

    /// Degenerate size requested for the logical buffer
    #[error("invalid buffer size {width}x{height}: zero area", width = .0.width, height = .0.height)]
    Configuration(Size),

    /// Invalid caller-supplied argument (degenerate target, unrecognized mode)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Backing surface allocation could not be satisfied
    #[error("cannot allocate {width}x{height} backing surface: {reason}", width = .capacity.width, height = .capacity.height)]
    Allocation {
        capacity: Size,
        reason: &'static str,
    },

    /// A blit or stretch-blit kernel failed; `code` is one of [`codes`]
    #[error("{op} failed with code {code:#04x}")]
    NativeOperation { op: &'static str, code: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_code() {
        let err = BufferError::NativeOperation {
            op: "blit",
            code: codes::SOURCE_OUT_OF_RANGE,
        };
        assert_eq!(err.to_string(), "blit failed with code 0x02");
    }

    #[test]
    fn test_display_configuration_size() {
        let err = BufferError::Configuration(Size::new(0, 32));
        assert!(err.to_string().contains("0x32"));
    }
}
