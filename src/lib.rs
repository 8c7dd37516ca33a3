/*! texture_units manages textures on graphics backends that bind through numbered texture units.

Unit-indexed APIs such as OpenGL and OpenGL ES keep a fixed number of texture units, each holding
at most one bound texture, and every bind or parameter change is a call into the driver.
texture_units sits between your renderer and that API:

* Texture handles are minted in batches and kept in a pool.
* Each texture owns its handle and deletes it when dropped.
* The manager remembers what each unit holds, so binding a texture that is already in place
  costs nothing.
* Pixel layouts are translated to the formats the backend actually has.  Reduced-capability
  (mobile) backends and full (desktop) backends disagree about single-channel and
  luminance formats, and the translation hides that.
* Uploads of 1D, 2D and 3D data, with mipmap generation when asked for.

# Quick start

```
use texture_units::backend::{share, RecordingBackend};
use texture_units::bindings::{Quality, TextureBinding, TextureManager, TextureParameters};
use texture_units::pixel_formats::{ChannelLayout, ElementType, OwnedPixelBuffer};

let mut manager = TextureManager::new(share(RecordingBackend::mobile()));

let albedo = OwnedPixelBuffer::zeroed(ChannelLayout::RGBA, ElementType::Byte, vec![64, 64]);
let albedo = manager.allocate(TextureParameters::new(Quality::Filtered), Some(&albedo));

let mask = OwnedPixelBuffer::zeroed(ChannelLayout::R, ElementType::Byte, vec![64, 64]);
let mask = manager.allocate(TextureParameters::new(Quality::Nearest), Some(&mask));

manager.bind_all(&[TextureBinding::new(0, &albedo), TextureBinding::new(1, &mask)]);
```

# Backends

[`backend::RecordingBackend`] is always available.  It does no GPU work, simulates the unit state
of a real context and records every call, which makes it useful for tests.

With the `backend_glow` feature, `backend::GlowBackend` drives a real OpenGL or OpenGL ES context
through [glow](https://docs.rs/glow).  Creating the context is up to you.

# Errors

Misuse, such as binding past the last unit or uploading with a target the backend lacks, is
fatal; see [`error`] for how fatal errors are raised and what is recoverable.

Everything in this crate runs on the thread that owns the graphics context.
*/

pub mod backend;
pub mod bindings;
pub mod error;
mod imp;
pub mod pixel_formats;
