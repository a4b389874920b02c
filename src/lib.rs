//! linkcard composes personalized QR "link cards" and exports them as high-resolution PNGs.
//!
//! A card is a fixed 450x720 frame: a name heading flanked by hearts, a category subtitle, a
//! styled QR code that points at the card's URL (with the owner's avatar cropped to a circle in
//! its center), and a short footer.
//!
//! # Pipeline overview
//!
//! 1. **Crop**: uploaded image bytes -> circular PNG ([`crop_to_circle`], [`ProfileImage`])
//! 2. **Encode**: URL + avatar -> styled vector QR graphic ([`QrRenderer`])
//! 3. **Compose**: [`CardConfig`] + on-screen time -> [`CardFrame`] scene tree ([`CardComposer`])
//! 4. **Export**: clone the frame, neutralize entrance transitions in the clone, rasterize at 3x
//!    over black and hand one PNG to a [`FileSink`] ([`Exporter`])
//!
//! [`CardSession`] ties these together behind a single edit/mount/export controller.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: layout and QR geometry are pure functions of the configuration.
//! - **Straight RGBA8** at the edges: rasters handed out are demultiplied.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod assets;
mod card;
mod code;
mod encode;
mod export;
mod foundation;
mod render;
mod scene;
mod session;

pub use animation::entrance::{Entrance, TransitionClass};
pub use assets::crop::{CropOutput, MAX_SURFACE_DIM, ProfileImage, crop_to_circle};
pub use assets::fetch::{HttpFetcher, ImageFetcher, OfflineFetcher};
pub use assets::source::{
    DataUri, PNG_MIME, encode_data_uri, image_dimensions, is_data_uri, is_remote,
    parse_data_uri, resolve_bytes, sniff_mime,
};
pub use card::composer::{BRANDING_CLASSES, CardComposer, FOOTER_CLASSES};
pub use card::config::{
    CardConfig, CardFile, CategoryPreset, DEFAULT_NAME, DEFAULT_SUBTITLE, DEFAULT_URL,
};
pub use card::layout::{
    CardLayout, FOOTER_TEXT, FRAME_SIZE, NAME_PLACEHOLDER, SUBTITLE_PLACEHOLDER, wrap_words,
};
pub use code::geometry::{HiddenArea, ModuleGrid, QrShape};
pub use code::renderer::{
    MountId, PLACEHOLDER_URL, QrGraphic, QrMount, QrOverlay, QrRenderer,
    destination_or_placeholder,
};
pub use code::style::{CornerDotShape, CornerSquareShape, DotShape, ErrorCorrection, QrStyle};
pub use encode::png::encode_png;
pub use encode::sink::{DirSink, FileSink, InMemorySink};
pub use export::filename::export_filename;
pub use export::snapshot::{
    DEFAULT_SCALE, EXPORT_SIZE, ExportOptions, ExportOutcome, Exporter, SkipReason, capture,
    inline_remote_images, sanitize_transitions,
};
pub use foundation::core::{Affine, FrameSize, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{CardError, CardResult};
pub use render::raster::{MAX_DIM, RasterImage, Rasterizer};
pub use render::svg::write_svg;
pub use scene::model::{
    BoxSpec, CardFrame, CodeSpec, Fill, IconSpec, Node, NodeKind, NodeStyle, TextAnchor, TextSpec,
};
pub use session::card_session::{CardEdit, CardSession, SessionSettings};
