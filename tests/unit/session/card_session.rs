use super::*;
use crate::{
    assets::fetch::OfflineFetcher,
    code::renderer::PLACEHOLDER_URL,
    encode::sink::InMemorySink,
    export::snapshot::SkipReason,
    foundation::error::CardError,
    scene::model::NodeKind,
};

fn session() -> CardSession {
    let options = ExportOptions {
        scale: 1.0,
        use_cors: false,
        ..ExportOptions::default()
    };
    let exporter = Exporter::with_fetcher(options, Box::new(OfflineFetcher));
    CardSession::with_exporter(QrStyle::default(), exporter).unwrap()
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(10, 16, image::Rgba([250, 250, 0, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn name_lines(s: &CardSession) -> Vec<String> {
    match &s.frame().unwrap().node("name").unwrap().kind {
        NodeKind::Text(t) => t.lines.clone(),
        _ => unreachable!(),
    }
}

#[test]
fn export_before_mount_is_a_no_op() {
    let s = session();
    let mut sink = InMemorySink::new();
    let out = s.export(&mut sink).unwrap();
    assert_eq!(out, ExportOutcome::Skipped(SkipReason::Unmounted));
    assert!(sink.files().is_empty());
}

#[test]
fn export_mid_transition_leaves_live_frame_alone() {
    let mut s = session();
    s.mount(Duration::from_millis(100)).unwrap();
    let before = s.frame().unwrap().clone();
    assert!(!before.is_settled());

    let mut sink = InMemorySink::new();
    let out = s.export(&mut sink).unwrap();
    assert_eq!(
        out,
        ExportOutcome::Saved {
            filename: "MATHAN_KUMAR_Memories.png".into(),
            width: 450,
            height: 720,
        }
    );
    assert_eq!(sink.files().len(), 1);
    assert_eq!(s.frame().unwrap(), &before);
}

#[test]
fn edits_rerender_the_mounted_frame() {
    let mut s = session();
    s.mount_settled().unwrap();
    s.apply(CardEdit::Name("ada lovelace".into())).unwrap();
    assert_eq!(s.config().name(), "ADA LOVELACE");
    assert_eq!(name_lines(&s), ["ADA", "LOVELACE"]);
    assert!(s.frame().unwrap().is_settled());

    s.apply(CardEdit::Url(String::new())).unwrap();
    assert_eq!(s.config().url(), "");
    assert_eq!(s.frame().unwrap().code().unwrap().graphic.data, PLACEHOLDER_URL);

    s.apply(CardEdit::Category(CategoryPreset::GooglePhotos)).unwrap();
    assert_eq!(s.config().subtitle(), "GOOGLE PHOTOS");
    assert_eq!(
        s.frame().unwrap().code().unwrap().graphic.data,
        "https://photos.app.goo.gl/"
    );
}

#[test]
fn edits_while_unmounted_only_change_config() {
    let mut s = session();
    s.apply(CardEdit::Subtitle("trips".into())).unwrap();
    assert_eq!(s.config().subtitle(), "TRIPS");
    assert!(s.frame().is_none());
    s.advance(Duration::from_secs(2)).unwrap();
    assert!(s.frame().is_none());
}

#[test]
fn avatar_upload_is_cropped_and_removable() {
    let mut s = session();
    s.mount_settled().unwrap();
    s.apply(CardEdit::UploadAvatar(png_bytes())).unwrap();
    assert_eq!(s.config().profile_image().unwrap().size(), Some(10));
    assert!(s.frame().unwrap().code().unwrap().graphic.overlay.is_some());

    s.apply(CardEdit::RemoveAvatar).unwrap();
    assert!(s.config().profile_image().is_none());
    assert!(s.frame().unwrap().code().unwrap().graphic.overlay.is_none());
}

#[test]
fn failed_edits_keep_previous_state() {
    let mut s = session();
    s.mount_settled().unwrap();
    let config = s.config().clone();
    let frame = s.frame().unwrap().clone();

    let err = s.apply(CardEdit::UploadAvatar(b"not an image".to_vec())).unwrap_err();
    assert!(matches!(err, CardError::Decode(_)));
    let err = s.apply(CardEdit::Url("x".repeat(4000))).unwrap_err();
    assert!(matches!(err, CardError::Encode(_)));

    assert_eq!(s.config(), &config);
    assert_eq!(s.frame().unwrap(), &frame);
}

#[test]
fn failed_edits_while_unmounted_keep_previous_state() {
    let mut s = session();
    let config = s.config().clone();

    let err = s.apply(CardEdit::Url("x".repeat(4000))).unwrap_err();
    assert!(matches!(err, CardError::Encode(_)));
    assert_eq!(s.config(), &config);
    assert!(s.frame().is_none());

    s.mount_settled().unwrap();
    assert_eq!(
        s.frame().unwrap().code().unwrap().graphic.data,
        config.url()
    );
}

#[test]
fn unmount_disables_export() {
    let mut s = session();
    s.mount_settled().unwrap();
    s.unmount();
    assert!(s.frame().is_none());
    let mut sink = InMemorySink::new();
    assert_eq!(
        s.export(&mut sink).unwrap(),
        ExportOutcome::Skipped(SkipReason::Unmounted)
    );
}
