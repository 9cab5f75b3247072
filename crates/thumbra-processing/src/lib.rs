//! Raster pipeline for thumbra: decode, orient, resize, encode.
//!
//! Pure CPU work over in-memory buffers; no I/O and no async. Callers on an
//! async runtime should run [`ThumbnailRenderer::render`] on a blocking
//! thread.

pub mod orientation;
pub mod thumbnail;

pub use orientation::ImageOrientation;
pub use thumbnail::{RenderError, ThumbnailRenderer};
