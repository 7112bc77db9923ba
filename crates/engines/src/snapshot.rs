//! PNG output of a rendered [`PixelBuffer`].
//!
//! Feature-gated behind `png` (default on) so the WASM build can depend on
//! this crate without pulling in the `image` crate.

use pointer_field_core::error::FieldError;
use std::path::Path;

use crate::pixel::PixelBuffer;

/// Writes the buffer as an RGBA PNG.
///
/// Returns `FieldError::Io` on write failure.
pub fn write_png(buffer: &PixelBuffer, path: &Path) -> Result<(), FieldError> {
    let img = image::RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.data().to_vec())
        .ok_or_else(|| FieldError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FieldError::Io(e.to_string()))?;
    log::debug!("wrote {}x{} snapshot to {}", buffer.width(), buffer.height(), path.display());
    Ok(())
}
