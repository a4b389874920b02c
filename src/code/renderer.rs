use std::sync::atomic::{AtomicU64, Ordering};

use kurbo::Rect;
use qrcode::{Color, QrCode};

use crate::{
    assets::source::{image_dimensions, is_data_uri, parse_data_uri},
    code::{
        geometry::{HiddenArea, ModuleGrid, QrShape, dot_shape, finder_shapes},
        style::QrStyle,
    },
    foundation::{
        core::Rgba8,
        error::{CardError, CardResult},
    },
};

/// Destination encoded when the configured URL is empty.
pub const PLACEHOLDER_URL: &str = "https://example.com";

/// Substitute the placeholder for an empty destination. Any other string is encoded as is.
pub fn destination_or_placeholder(url: &str) -> &str {
    if url.is_empty() {
        PLACEHOLDER_URL
    } else {
        url
    }
}

/// Image drawn over the center of the code.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QrOverlay {
    /// Image source, usually a `data:` URI.
    pub href: String,
    /// Placement inside the graphic, aspect preserved.
    pub rect: Rect,
}

/// Vector rendering of one encoded QR matrix.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QrGraphic {
    /// Side length of the square graphic.
    pub size: f64,
    /// Encoded destination.
    pub data: String,
    /// Modules per side.
    pub modules: usize,
    /// Fill behind the modules.
    pub background: Rgba8,
    /// Filled modules and finder patterns, in paint order.
    pub shapes: Vec<QrShape>,
    /// Center image, when one fits.
    pub overlay: Option<QrOverlay>,
}

/// Identity of a [`QrMount`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct MountId(pub u64);

static NEXT_MOUNT_ID: AtomicU64 = AtomicU64::new(1);

/// Container a [`QrRenderer`] draws into. Its identity survives every redraw.
#[derive(Debug)]
pub struct QrMount {
    id: MountId,
    content: Option<QrGraphic>,
    draws: u64,
}

impl QrMount {
    /// Fresh, empty container with a process-unique id.
    pub fn new() -> Self {
        Self {
            id: MountId(NEXT_MOUNT_ID.fetch_add(1, Ordering::Relaxed)),
            content: None,
            draws: 0,
        }
    }

    /// Identity of this container.
    pub fn id(&self) -> MountId {
        self.id
    }

    /// Graphic currently drawn, if any.
    pub fn content(&self) -> Option<&QrGraphic> {
        self.content.as_ref()
    }

    /// Number of times content was drawn into this container.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    fn clear(&mut self) {
        self.content = None;
    }

    fn draw(&mut self, graphic: &QrGraphic) {
        self.content = Some(graphic.clone());
        self.draws += 1;
    }
}

impl Default for QrMount {
    fn default() -> Self {
        Self::new()
    }
}

/// Long-lived QR renderer: constructed once with static styling, then redrawn in place.
pub struct QrRenderer {
    style: QrStyle,
    image: Option<String>,
    graphic: QrGraphic,
    mount: Option<QrMount>,
}

impl QrRenderer {
    /// Encode `data` (or the placeholder) with `style`, optionally under `image`.
    pub fn new(style: QrStyle, data: &str, image: Option<&str>) -> CardResult<Self> {
        style.validate()?;
        let image = normalize_image(image);
        let graphic = build_graphic(&style, destination_or_placeholder(data), image.as_deref())?;
        Ok(Self {
            style,
            image,
            graphic,
            mount: None,
        })
    }

    /// Attach to `mount`, discarding whatever the container held before.
    pub fn initialize(&mut self, mut mount: QrMount) {
        mount.clear();
        mount.draw(&self.graphic);
        tracing::debug!(mount = mount.id().0, "qr renderer attached");
        self.mount = Some(mount);
    }

    /// Re-encode for new data and overlay, redrawing into the attached container.
    #[tracing::instrument(skip(self, image), fields(has_image = image.is_some()))]
    pub fn update(&mut self, data: &str, image: Option<&str>) -> CardResult<()> {
        let data = destination_or_placeholder(data);
        let image = normalize_image(image);
        if data == self.graphic.data && image == self.image {
            return Ok(());
        }

        self.graphic = build_graphic(&self.style, data, image.as_deref())?;
        self.image = image;
        if let Some(mount) = self.mount.as_mut() {
            mount.draw(&self.graphic);
        }
        Ok(())
    }

    /// Fail the way [`QrRenderer::update`] would for `data`, without redrawing anything.
    pub fn check(&self, data: &str) -> CardResult<()> {
        encode(&self.style, destination_or_placeholder(data)).map(|_| ())
    }

    /// Release the container, keeping the renderer and its graphic alive.
    pub fn detach(&mut self) -> Option<QrMount> {
        self.mount.take()
    }

    /// Styling fixed at construction.
    pub fn style(&self) -> &QrStyle {
        &self.style
    }

    /// Most recently built graphic.
    pub fn graphic(&self) -> &QrGraphic {
        &self.graphic
    }

    /// Attached container, if any.
    pub fn mount(&self) -> Option<&QrMount> {
        self.mount.as_ref()
    }

    /// Destination currently encoded.
    pub fn data(&self) -> &str {
        &self.graphic.data
    }
}

fn normalize_image(image: Option<&str>) -> Option<String> {
    image
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Height over width of the overlay; remote or undecodable images are treated as square.
fn overlay_aspect(href: &str) -> f64 {
    if !is_data_uri(href) {
        return 1.0;
    }
    match parse_data_uri(href).and_then(|uri| image_dimensions(&uri.bytes)) {
        Ok((w, h)) if w > 0 && h > 0 => f64::from(h) / f64::from(w),
        Ok(_) => 1.0,
        Err(err) => {
            tracing::warn!(%err, "overlay image unreadable, assuming square");
            1.0
        }
    }
}

fn encode(style: &QrStyle, data: &str) -> CardResult<QrCode> {
    let level = style.error_correction.ec_level();
    QrCode::with_error_correction_level(data.as_bytes(), level)
        .map_err(|e| CardError::encode(format!("qr encode ({} bytes): {e}", data.len())))
}

fn build_graphic(style: &QrStyle, data: &str, image: Option<&str>) -> CardResult<QrGraphic> {
    let code = encode(style, data)?;
    let grid = ModuleGrid::new(code.width(), style.size)?;

    let overlay = image.and_then(|href| {
        let area = HiddenArea::for_image(
            grid.count,
            style.image_size,
            style.error_correction.recoverable_fraction(),
            overlay_aspect(href),
        )?;
        let rect = area.image_rect(&grid, style.image_margin)?;
        let overlay = QrOverlay {
            href: href.to_string(),
            rect,
        };
        Some((area, overlay))
    });

    let mut shapes = Vec::new();
    for row in 0..grid.count {
        for col in 0..grid.count {
            if code[(col, row)] != Color::Dark || grid.is_finder(col, row) {
                continue;
            }
            if let Some((area, _)) = &overlay
                && area.contains(grid.count, col, row)
            {
                continue;
            }
            shapes.push(dot_shape(style, &grid, col, row));
        }
    }
    for (col, row) in grid.finder_origins() {
        shapes.extend(finder_shapes(style, &grid, col, row));
    }

    Ok(QrGraphic {
        size: f64::from(style.size),
        data: data.to_string(),
        modules: grid.count,
        background: style.background,
        shapes,
        overlay: overlay.map(|(_, o)| o),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/code/renderer.rs"]
mod tests;
