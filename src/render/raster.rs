use std::{
    path::{Path, PathBuf},
    sync::{Arc, OnceLock},
};

use resvg::tiny_skia;
use usvg::fontdb;

use crate::{
    foundation::{
        core::Rgba8,
        error::{CardError, CardResult},
    },
    render::{fonts, svg::write_svg},
    scene::model::CardFrame,
};

/// Largest raster edge we are willing to allocate.
pub const MAX_DIM: u32 = 16_384;

/// Rasterized frame in straight (non-premultiplied) RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
    /// Row-major pixels, four bytes each.
    pub rgba: Vec<u8>,
}

impl RasterImage {
    /// Pixel at `(x, y)`, `None` out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        Some([
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ])
    }
}

/// Turns [`CardFrame`]s into pixels.
///
/// The font database is built on first use and reused, so repeated renders skip the system
/// font scan.
pub struct Rasterizer {
    fonts_dir: Option<PathBuf>,
    fontdb: OnceLock<Arc<fontdb::Database>>,
}

impl Rasterizer {
    /// Rasterizer that adds the fonts in `fonts_dir` to the system fonts.
    pub fn new(fonts_dir: Option<&Path>) -> Self {
        Self {
            fonts_dir: fonts_dir.map(Path::to_path_buf),
            fontdb: OnceLock::new(),
        }
    }

    fn fontdb(&self) -> Arc<fontdb::Database> {
        self.fontdb
            .get_or_init(|| fonts::build_fontdb(self.fonts_dir.as_deref()))
            .clone()
    }

    /// Render `frame` at `scale` device pixels per frame pixel over an opaque `background`.
    #[tracing::instrument(skip(self, frame), fields(w = frame.size.width, h = frame.size.height))]
    pub fn rasterize(
        &self,
        frame: &CardFrame,
        scale: f32,
        background: Rgba8,
    ) -> CardResult<RasterImage> {
        frame.size.validate()?;
        let (width, height) = frame.size.scaled(scale)?;
        if width > MAX_DIM || height > MAX_DIM {
            return Err(CardError::render(format!(
                "raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
            )));
        }

        let svg = write_svg(frame);
        let opts = usvg::Options {
            fontdb: self.fontdb(),
            font_resolver: fonts::font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts)
            .map_err(|e| CardError::render(format!("parse card svg: {e}")))?;

        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| CardError::render("failed to allocate raster pixmap"))?;
        pixmap.fill(tiny_skia::Color::from_rgba8(
            background.r,
            background.g,
            background.b,
            background.a,
        ));

        let sx = (width as f32) / tree.size().width();
        let sy = (height as f32) / tree.size().height();
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(sx, sy),
            &mut pixmap.as_mut(),
        );

        let mut rgba = Vec::with_capacity(pixmap.data().len());
        for px in pixmap.pixels() {
            let c = px.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        tracing::debug!(width, height, "frame rasterized");
        Ok(RasterImage {
            width,
            height,
            rgba,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
