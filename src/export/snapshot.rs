use std::{
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
};

use crate::{
    assets::{
        fetch::{HttpFetcher, ImageFetcher, OfflineFetcher},
        source::{encode_data_uri, is_remote, sniff_mime},
    },
    code::renderer::QrOverlay,
    encode::{png::encode_png, sink::FileSink},
    export::filename::export_filename,
    foundation::{
        core::{FrameSize, Rgba8},
        error::CardResult,
    },
    render::raster::{RasterImage, Rasterizer},
    scene::model::{CardFrame, NodeStyle},
};

/// Logical capture region.
pub const EXPORT_SIZE: FrameSize = FrameSize::new(450, 720);
/// Device pixels per logical pixel in the exported image.
pub const DEFAULT_SCALE: f32 = 3.0;

/// Options for snapshot export.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOptions {
    /// Capture region, in frame pixels.
    pub size: FrameSize,
    /// Super-sampling factor.
    pub scale: f32,
    /// Opaque fill behind the card.
    pub background: Rgba8,
    /// Load cross-origin images so they appear in the export. When off they are left blank.
    pub use_cors: bool,
    /// Extra font files to make available to text rendering.
    pub fonts_dir: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            size: EXPORT_SIZE,
            scale: DEFAULT_SCALE,
            background: Rgba8::BLACK,
            use_cors: true,
            fonts_dir: None,
        }
    }
}

impl ExportOptions {
    /// Defaults overridden by `LINKCARD_EXPORT_SCALE`, `LINKCARD_FONTS_DIR` and
    /// `LINKCARD_USE_CORS`. Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut opts = Self::default();
        if let Some(raw) = lookup("LINKCARD_EXPORT_SCALE") {
            match raw.trim().parse::<f32>() {
                Ok(scale) if scale.is_finite() && scale > 0.0 => opts.scale = scale,
                _ => tracing::warn!(value = %raw, "ignoring invalid LINKCARD_EXPORT_SCALE"),
            }
        }
        if let Some(dir) = lookup("LINKCARD_FONTS_DIR").filter(|d| !d.trim().is_empty()) {
            opts.fonts_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = lookup("LINKCARD_USE_CORS") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => opts.use_cors = true,
                "0" | "false" | "no" | "off" => opts.use_cors = false,
                _ => tracing::warn!(value = %raw, "ignoring invalid LINKCARD_USE_CORS"),
            }
        }
        opts
    }
}

/// Why an export produced no file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// No frame is mounted.
    Unmounted,
    /// Another export on the same exporter has not finished.
    Busy,
}

/// Result of one [`Exporter::export`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// One PNG was handed to the sink.
    Saved {
        /// Name the file was saved under.
        filename: String,
        /// Pixel width of the image.
        width: u32,
        /// Pixel height of the image.
        height: u32,
    },
    /// Nothing was captured or saved.
    Skipped(SkipReason),
}

/// Remove entrance transition state from every animated node: classes dropped, opacity 1,
/// identity transform. Returns how many nodes were touched.
pub fn sanitize_transitions(frame: &mut CardFrame) -> usize {
    let mut touched = 0;
    frame.root.walk_mut(&mut |node| {
        if node.has_transition_class() {
            node.classes.clear();
            node.style = NodeStyle::default();
            touched += 1;
        }
    });
    touched
}

/// Replace a remote overlay href with an inlined data URI, or drop the overlay when no fetcher
/// is given or the fetch fails.
pub fn inline_remote_images(frame: &mut CardFrame, fetcher: Option<&dyn ImageFetcher>) {
    let Some(code) = frame.code_mut() else {
        return;
    };
    let Some(overlay) = code.graphic.overlay.take() else {
        return;
    };
    if !is_remote(&overlay.href) {
        code.graphic.overlay = Some(overlay);
        return;
    }

    code.graphic.overlay = fetcher.and_then(|f| match f.fetch(&overlay.href) {
        Ok(bytes) => Some(QrOverlay {
            href: encode_data_uri(sniff_mime(&bytes), &bytes),
            rect: overlay.rect,
        }),
        Err(err) => {
            tracing::warn!(href = %overlay.href, %err, "overlay image left blank");
            None
        }
    });
}

/// Deep-clone `root`, let `on_clone` adjust the clone, and rasterize it.
///
/// `root` itself is never modified.
pub fn capture(
    rasterizer: &Rasterizer,
    root: &CardFrame,
    options: &ExportOptions,
    on_clone: impl FnOnce(&mut CardFrame),
) -> CardResult<RasterImage> {
    let mut clone = root.clone();
    clone.size = options.size;
    on_clone(&mut clone);
    rasterizer.rasterize(&clone, options.scale, options.background)
}

struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Produces the downloadable PNG of a mounted card.
pub struct Exporter {
    options: ExportOptions,
    rasterizer: Rasterizer,
    fetcher: Box<dyn ImageFetcher>,
    in_flight: AtomicBool,
}

impl Exporter {
    /// Uses an HTTP fetcher when `use_cors` is set.
    pub fn new(options: ExportOptions) -> CardResult<Self> {
        let fetcher: Box<dyn ImageFetcher> = if options.use_cors {
            Box::new(HttpFetcher::new()?)
        } else {
            Box::new(OfflineFetcher)
        };
        Ok(Self::with_fetcher(options, fetcher))
    }

    /// Exporter that loads cross-origin images through `fetcher`.
    pub fn with_fetcher(options: ExportOptions, fetcher: Box<dyn ImageFetcher>) -> Self {
        let rasterizer = Rasterizer::new(options.fonts_dir.as_deref());
        Self {
            options,
            rasterizer,
            fetcher,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Options this exporter was built with.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// True while an export is in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Capture `root` and hand one PNG named after `name` to `sink`.
    ///
    /// With no root this does nothing. Errors leave the sink untouched.
    #[tracing::instrument(skip(self, root, sink), fields(mounted = root.is_some()))]
    pub fn export(
        &self,
        root: Option<&CardFrame>,
        name: &str,
        sink: &mut dyn FileSink,
    ) -> CardResult<ExportOutcome> {
        let Some(root) = root else {
            tracing::debug!("no frame mounted, export skipped");
            return Ok(ExportOutcome::Skipped(SkipReason::Unmounted));
        };
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            tracing::warn!("export already in progress");
            return Ok(ExportOutcome::Skipped(SkipReason::Busy));
        };

        let fetcher = self.options.use_cors.then_some(&*self.fetcher);
        let image = capture(&self.rasterizer, root, &self.options, |clone| {
            let touched = sanitize_transitions(clone);
            tracing::debug!(touched, "transitions neutralized in clone");
            inline_remote_images(clone, fetcher);
        })?;
        let png = encode_png(&image)?;

        let filename = export_filename(name);
        sink.save(&filename, &png)?;
        tracing::info!(%filename, width = image.width, height = image.height, "card exported");
        Ok(ExportOutcome::Saved {
            filename,
            width: image.width,
            height: image.height,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/snapshot.rs"]
mod tests;
