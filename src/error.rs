// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Error types.
//!
//! There are two kinds of failure in this crate, and they are deliberately separate types.
//!
//! * [`Error`] is an ordinary, recoverable error.  It only occurs at the edges of the crate,
//!   for example while decoding a PNG into a pixel buffer, and is returned through [`Result`].
//! * [`FatalError`] describes a programming error (a texture unit out of range, a texture target
//!   the backend cannot handle) or an error reported by the backend itself.  These are never
//!   returned.  They are logged and then raised as a panic whose payload is the [`FatalError`],
//!   because the backend context may be in an indeterminate state afterwards.
//!
//! Only top-level harnesses are expected to catch fatal errors, for diagnostics:
//!
//! ```
//! use texture_units::error::FatalError;
//!
//! let caught: std::thread::Result<()> = std::panic::catch_unwind(|| {
//!     FatalError::UnitOutOfRange { unit: 99, unit_count: 8 }.raise()
//! });
//! let payload = caught.unwrap_err();
//! assert!(payload.downcast_ref::<FatalError>().is_some());
//! ```

use crate::backend::{BackendError, Format, Target};

/// A recoverable error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("png decoding failed: {0}")]
    Png(#[from] png::DecodingError),
    #[error("can't read image file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported png layout: {color_type:?} at {bit_depth:?}")]
    UnsupportedPng {
        color_type: png::ColorType,
        bit_depth: png::BitDepth,
    },
    #[error("pixel data is {actual} bytes but the layout requires {expected}")]
    DataLength { expected: usize, actual: usize },
    #[error("a {0:?} pixel layout is too large to address")]
    LayoutOverflow([u32; 3]),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A non-recoverable error.  See the module documentation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FatalError {
    #[error("texture unit {unit} is out of range (backend has {unit_count} units)")]
    UnitOutOfRange { unit: usize, unit_count: usize },
    #[error("invalid texture target {0}")]
    InvalidTarget(Target),
    #[error("pixel layout has no format on this backend")]
    UntranslatableFormat,
    #[error("{0} is not a legal storage format on this backend")]
    IllegalInternalFormat(Format),
    #[error("pixel buffer holds {actual} bytes but its layout requires {expected}")]
    ShortPixelData { expected: usize, actual: usize },
    #[error("a {0:?} pixel layout is too large to address")]
    LayoutOverflow([u32; 3]),
    #[error("backend could not mint texture handles")]
    OutOfHandles,
    #[error("backend reported {0}")]
    Backend(#[from] BackendError),
}

impl FatalError {
    /// Logs the error and panics with `self` as the payload.
    #[track_caller]
    pub fn raise(self) -> ! {
        logwise::error_sync!(
            "fatal texture error: {err}",
            err = logwise::privacy::LogIt(&self)
        );
        std::panic::panic_any(self)
    }
}
