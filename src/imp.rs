// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Backend implementations.  The recording backend is always available; real GPU backends are
//! selected by feature.

mod recording;
pub use recording::*;

#[cfg(feature = "backend_glow")]
mod opengl;

#[cfg(feature = "backend_glow")]
pub use opengl::*;
