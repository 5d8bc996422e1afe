//! Bridges uploaded image files into the same encoded representation the
//! drawing surface exports, so both input paths feed one solve pipeline.

use crate::solve::error::SolveError;
use base64::{engine::general_purpose, Engine as _};
use std::path::Path;

/// Read an image file and encode it as a `data:<mime>;base64,` URI.
pub fn image_file_to_data_uri(path: &Path) -> Result<String, SolveError> {
    let bytes = std::fs::read(path).map_err(|err| {
        tracing::warn!(path = %path.display(), error = %err, "failed to read uploaded image");
        SolveError::UnreadableFile
    })?;
    if bytes.is_empty() {
        return Err(SolveError::UnreadableFile);
    }
    let mime = sniff_mime(path, &bytes);
    Ok(format!(
        "data:{mime};base64,{}",
        general_purpose::STANDARD.encode(&bytes)
    ))
}

/// Prefer content sniffing, fall back to the extension, then to PNG. The
/// solver accepts any common raster format, so this never rejects a file.
fn sniff_mime(path: &Path, bytes: &[u8]) -> &'static str {
    let format = image::guess_format(bytes)
        .ok()
        .or_else(|| image::ImageFormat::from_path(path).ok());
    match format {
        Some(image::ImageFormat::Png) => "image/png",
        Some(image::ImageFormat::Jpeg) => "image/jpeg",
        Some(image::ImageFormat::Gif) => "image/gif",
        Some(image::ImageFormat::WebP) => "image/webp",
        Some(image::ImageFormat::Bmp) => "image/bmp",
        _ => "image/png",
    }
}
