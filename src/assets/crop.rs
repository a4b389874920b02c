use std::io::Cursor;

use kurbo::{Circle, Point, Shape as _};

use crate::{
    assets::source::{PNG_MIME, encode_data_uri, sniff_mime},
    foundation::error::{CardError, CardResult},
};

/// Largest square surface the cropper will allocate.
pub const MAX_SURFACE_DIM: u32 = 16_384;

/// Result of [`crop_to_circle`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CropOutput {
    /// Square `size x size` PNG, transparent outside the inscribed circle.
    Cropped {
        /// Side length in pixels.
        size: u32,
        /// Encoded PNG bytes.
        png: Vec<u8>,
    },
    /// No surface could be allocated; the original bytes are handed back untouched.
    Passthrough {
        /// The input bytes, unchanged.
        bytes: Vec<u8>,
    },
}

impl CropOutput {
    /// Encoded image bytes, whichever branch produced them.
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Cropped { png, .. } => png,
            Self::Passthrough { bytes } => bytes,
        }
    }

    /// MIME type of [`CropOutput::bytes`].
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Cropped { .. } => PNG_MIME,
            Self::Passthrough { bytes } => sniff_mime(bytes),
        }
    }

    /// The output as a base64 `data:` URI.
    pub fn to_data_uri(&self) -> String {
        encode_data_uri(self.mime(), self.bytes())
    }
}

/// An avatar that went through [`crop_to_circle`].
///
/// Only built from a [`CropOutput`], so a stored avatar is always cropper output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileImage {
    data_uri: String,
    size: Option<u32>,
}

impl ProfileImage {
    /// Crop `bytes` and keep the result.
    pub fn from_bytes(bytes: &[u8]) -> CardResult<Self> {
        Ok(Self::from_crop(&crop_to_circle(bytes)?))
    }

    /// Wrap an existing crop result.
    pub fn from_crop(out: &CropOutput) -> Self {
        let size = match out {
            CropOutput::Cropped { size, .. } => Some(*size),
            CropOutput::Passthrough { .. } => None,
        };
        Self {
            data_uri: out.to_data_uri(),
            size,
        }
    }

    /// The avatar as a `data:` URI, ready to embed.
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    /// Side length of the circular crop, `None` when the passthrough fallback fired.
    pub fn size(&self) -> Option<u32> {
        self.size
    }
}

/// Crop an arbitrary image to its centered square and mask everything outside the inscribed
/// circle to full transparency.
///
/// A pixel belongs to the circle when its center lies inside it, so re-cropping an already
/// cropped image leaves it unchanged.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn crop_to_circle(bytes: &[u8]) -> CardResult<CropOutput> {
    let src = image::load_from_memory(bytes)
        .map_err(|e| CardError::decode(format!("decode uploaded image: {e}")))?
        .to_rgba8();
    let (w, h) = src.dimensions();
    let size = w.min(h);

    let Some(mut surface) = allocate_surface(size) else {
        tracing::warn!(width = w, height = h, "no crop surface available, keeping original");
        return Ok(CropOutput::Passthrough {
            bytes: bytes.to_vec(),
        });
    };

    let left = (w - size) / 2;
    let top = (h - size) / 2;
    let half = f64::from(size) / 2.0;
    let clip = Circle::new(Point::new(half, half), half);

    for (x, y, px) in surface.enumerate_pixels_mut() {
        let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        if clip.contains(center) {
            *px = *src.get_pixel(left + x, top + y);
        }
    }

    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(surface)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| CardError::encode(format!("encode cropped png: {e}")))?;

    tracing::debug!(size, "cropped avatar to circle");
    Ok(CropOutput::Cropped { size, png })
}

fn allocate_surface(size: u32) -> Option<image::RgbaImage> {
    if size == 0 || size > MAX_SURFACE_DIM {
        return None;
    }
    Some(image::RgbaImage::new(size, size))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/crop.rs"]
mod tests;
