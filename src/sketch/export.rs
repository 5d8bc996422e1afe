use crate::sketch::raster::RasterBuffer;
use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::Local;
use std::path::Path;

pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Encode the raster losslessly as PNG.
pub fn encode_png(raster: &RasterBuffer) -> Result<Vec<u8>> {
    let image =
        image::RgbaImage::from_raw(raster.width(), raster.height(), raster.pixels().to_vec())
            .ok_or_else(|| anyhow!("raster dimensions do not match the pixel buffer"))?;
    let mut bytes = Vec::new();
    image
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageOutputFormat::Png,
        )
        .context("encode canvas as PNG")?;
    Ok(bytes)
}

/// Serialize the raster to the `data:image/png;base64,` form consumed by the
/// solve client.
pub fn to_data_uri(raster: &RasterBuffer) -> Result<String> {
    let png = encode_png(raster)?;
    Ok(format!(
        "{PNG_DATA_URI_PREFIX}{}",
        general_purpose::STANDARD.encode(png)
    ))
}

pub fn save_png(raster: &RasterBuffer, path: &Path) -> Result<()> {
    let png = encode_png(raster)?;
    std::fs::write(path, png).with_context(|| format!("write drawing to {}", path.display()))?;
    Ok(())
}

pub fn timestamped_filename(now: chrono::DateTime<Local>) -> String {
    format!("mathscribe_{}.png", now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch::raster::Rgba;
    use chrono::TimeZone;

    #[test]
    fn data_uri_round_trips_through_the_png_decoder() {
        let mut raster = RasterBuffer::new(8, 6, Rgba::WHITE);
        raster.set_pixel(3, 2, Rgba::INK);

        let uri = to_data_uri(&raster).expect("data uri");
        let payload = uri.strip_prefix(PNG_DATA_URI_PREFIX).expect("png prefix");
        let bytes = general_purpose::STANDARD.decode(payload).expect("base64");
        let decoded = image::load_from_memory(&bytes).expect("decode png").to_rgba8();

        assert_eq!(decoded.dimensions(), (8, 6));
        assert_eq!(decoded.get_pixel(3, 2).0, [0x1e, 0x29, 0x3b, 255]);
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn export_filename_embeds_the_timestamp() {
        let dt = Local
            .with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
            .single()
            .expect("date time");
        assert_eq!(timestamped_filename(dt), "mathscribe_20260102_030405.png");
    }
}
