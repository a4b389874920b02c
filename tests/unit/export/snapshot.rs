use std::{collections::HashMap, time::Duration};

use super::*;
use crate::{
    card::{composer::CardComposer, config::CardConfig},
    code::style::QrStyle,
    encode::sink::InMemorySink,
    foundation::error::CardError,
};

fn small_options() -> ExportOptions {
    ExportOptions {
        scale: 1.0,
        use_cors: false,
        ..ExportOptions::default()
    }
}

fn exporter(options: ExportOptions, fetcher: impl ImageFetcher + 'static) -> Exporter {
    Exporter::with_fetcher(options, Box::new(fetcher))
}

fn frame_at(elapsed: Duration, config: &CardConfig) -> CardFrame {
    CardComposer::new(QrStyle::default())
        .unwrap()
        .compose(config, elapsed)
        .unwrap()
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([255, 0, 0, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

struct MapFetcher(HashMap<String, Vec<u8>>);

impl ImageFetcher for MapFetcher {
    fn fetch(&self, url: &str) -> CardResult<Vec<u8>> {
        self.0
            .get(url)
            .cloned()
            .ok_or_else(|| CardError::fetch(format!("404 {url}")))
    }
}

#[test]
fn no_root_means_no_sink_calls() {
    let ex = exporter(small_options(), OfflineFetcher);
    let mut sink = InMemorySink::new();
    let out = ex.export(None, "Anyone", &mut sink).unwrap();
    assert_eq!(out, ExportOutcome::Skipped(SkipReason::Unmounted));
    assert!(sink.files().is_empty());
    assert!(!ex.is_busy());
}

#[test]
fn sanitize_resolves_every_animated_node() {
    let mut frame = frame_at(Duration::ZERO, &CardConfig::default());
    assert!(!frame.is_settled());
    assert_eq!(sanitize_transitions(&mut frame), 2);
    assert!(frame.is_settled());
    let mut classes = 0;
    frame.root.walk(&mut |n| classes += n.classes.len());
    assert_eq!(classes, 0);
}

#[test]
fn capture_hook_sees_only_the_clone() {
    let live = frame_at(Duration::from_millis(150), &CardConfig::default());
    let snapshot = live.clone();
    let rasterizer = Rasterizer::new(None);

    let mut seen_settled = false;
    let img = capture(&rasterizer, &live, &small_options(), |clone| {
        sanitize_transitions(clone);
        seen_settled = clone.is_settled();
    })
    .unwrap();

    assert!(seen_settled);
    assert_eq!(live, snapshot);
    assert!(!live.is_settled());
    assert_eq!((img.width, img.height), (450, 720));
}

#[test]
fn mid_transition_export_matches_settled_export() {
    let config = CardConfig::default();
    let ex = exporter(small_options(), OfflineFetcher);

    let mut early = InMemorySink::new();
    ex.export(Some(&frame_at(Duration::ZERO, &config)), config.name(), &mut early)
        .unwrap();
    let mut late = InMemorySink::new();
    ex.export(Some(&frame_at(Duration::from_secs(5), &config)), config.name(), &mut late)
        .unwrap();

    assert_eq!(early.files()[0].0, "MATHAN_KUMAR_Memories.png");
    assert_eq!(early.files(), late.files());
}

struct ReentrantSink<'a> {
    exporter: &'a Exporter,
    frame: &'a CardFrame,
    nested: Option<ExportOutcome>,
    nested_files: usize,
}

impl FileSink for ReentrantSink<'_> {
    fn save(&mut self, _filename: &str, _bytes: &[u8]) -> CardResult<()> {
        let mut inner = InMemorySink::new();
        self.nested = Some(self.exporter.export(Some(self.frame), "again", &mut inner)?);
        self.nested_files = inner.files().len();
        Ok(())
    }
}

#[test]
fn overlapping_export_is_rejected() {
    let ex = exporter(small_options(), OfflineFetcher);
    let frame = frame_at(Duration::from_secs(2), &CardConfig::default());
    let mut sink = ReentrantSink {
        exporter: &ex,
        frame: &frame,
        nested: None,
        nested_files: 0,
    };

    let out = ex.export(Some(&frame), "first", &mut sink).unwrap();
    assert!(matches!(out, ExportOutcome::Saved { .. }));
    assert_eq!(sink.nested, Some(ExportOutcome::Skipped(SkipReason::Busy)));
    assert_eq!(sink.nested_files, 0);

    assert!(!ex.is_busy());
    let mut again = InMemorySink::new();
    assert!(matches!(
        ex.export(Some(&frame), "second", &mut again).unwrap(),
        ExportOutcome::Saved { .. }
    ));
}

fn remote_frame(href: &str) -> CardFrame {
    let mut c = CardComposer::new(QrStyle::default()).unwrap();
    let mut frame = c.compose_settled(&CardConfig::default()).unwrap();
    let rect = kurbo::Rect::new(100.0, 100.0, 180.0, 180.0);
    frame.code_mut().unwrap().graphic.overlay = Some(QrOverlay {
        href: href.to_string(),
        rect,
    });
    frame
}

#[test]
fn remote_overlay_is_inlined_when_fetchable() {
    let href = "https://images.example.com/me.png";
    let fetcher = MapFetcher(HashMap::from([(href.to_string(), png_bytes())]));
    let mut frame = remote_frame(href);
    inline_remote_images(&mut frame, Some(&fetcher));

    let overlay = frame.code().unwrap().graphic.overlay.as_ref().unwrap();
    assert!(overlay.href.starts_with("data:image/png;base64,"));
    assert_eq!(overlay.rect, kurbo::Rect::new(100.0, 100.0, 180.0, 180.0));
}

#[test]
fn remote_overlay_is_blank_without_cors_or_on_failure() {
    let href = "https://images.example.com/me.png";

    let mut frame = remote_frame(href);
    inline_remote_images(&mut frame, None);
    assert!(frame.code().unwrap().graphic.overlay.is_none());

    let mut frame = remote_frame(href);
    inline_remote_images(&mut frame, Some(&MapFetcher(HashMap::new())));
    assert!(frame.code().unwrap().graphic.overlay.is_none());
}

#[test]
fn inline_overlay_is_left_alone() {
    let href = "data:image/png;base64,AAAA";
    let mut frame = remote_frame(href);
    inline_remote_images(&mut frame, None);
    assert_eq!(frame.code().unwrap().graphic.overlay.as_ref().unwrap().href, href);
}

#[test]
fn options_from_lookup() {
    let env = HashMap::from([
        ("LINKCARD_EXPORT_SCALE", "2"),
        ("LINKCARD_FONTS_DIR", "/opt/fonts"),
        ("LINKCARD_USE_CORS", "off"),
    ]);
    let opts = ExportOptions::from_lookup(|k| env.get(k).map(|v| v.to_string()));
    assert_eq!(opts.scale, 2.0);
    assert_eq!(opts.fonts_dir.as_deref(), Some(std::path::Path::new("/opt/fonts")));
    assert!(!opts.use_cors);
    assert_eq!(opts.size, EXPORT_SIZE);

    let bad = HashMap::from([("LINKCARD_EXPORT_SCALE", "-1"), ("LINKCARD_USE_CORS", "maybe")]);
    let opts = ExportOptions::from_lookup(|k| bad.get(k).map(|v| v.to_string()));
    assert_eq!(opts, ExportOptions::default());
}
