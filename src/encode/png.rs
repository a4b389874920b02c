use image::{
    ExtendedColorType, ImageEncoder as _,
    codecs::png::{CompressionType, FilterType, PngEncoder},
};

use crate::{
    foundation::error::{CardError, CardResult},
    render::raster::RasterImage,
};

/// Lossless PNG at the best compression level.
pub fn encode_png(img: &RasterImage) -> CardResult<Vec<u8>> {
    let expected = (img.width as usize) * (img.height as usize) * 4;
    if img.rgba.len() != expected {
        return Err(CardError::encode(format!(
            "rgba buffer is {} bytes, expected {expected} for {}x{}",
            img.rgba.len(),
            img.width,
            img.height
        )));
    }

    let mut out = Vec::new();
    PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive)
        .write_image(&img.rgba, img.width, img.height, ExtendedColorType::Rgba8)
        .map_err(|e| CardError::encode(format!("png encode: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
