use super::*;
use crate::assets::fetch::OfflineFetcher;

fn tiny_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn data_uri_encode_then_parse() {
    let png = tiny_png();
    let uri = encode_data_uri(PNG_MIME, &png);
    assert!(uri.starts_with("data:image/png;base64,"));
    let parsed = parse_data_uri(&uri).unwrap();
    assert_eq!(parsed.mime, "image/png");
    assert_eq!(parsed.bytes, png);
}

#[test]
fn data_uri_rejects_non_base64_and_garbage() {
    assert!(parse_data_uri("data:text/plain,hello").is_err());
    assert!(parse_data_uri("https://example.com/a.png").is_err());
    assert!(parse_data_uri("data:image/png;base64,@@@").is_err());
}

#[test]
fn remote_detection_is_scheme_based() {
    assert!(is_remote("https://images.example.com/a.png"));
    assert!(is_remote("HTTP://x"));
    assert!(!is_remote("data:image/png;base64,AAAA"));
    assert!(!is_remote("./avatar.png"));
}

#[test]
fn sniff_and_dimensions() {
    let png = tiny_png();
    assert_eq!(sniff_mime(&png), "image/png");
    assert_eq!(sniff_mime(b"not an image"), "application/octet-stream");
    assert_eq!(image_dimensions(&png).unwrap(), (3, 2));
    assert!(image_dimensions(b"nope").is_err());
}

#[test]
fn resolve_bytes_handles_data_uri_and_refuses_remote_offline() {
    let png = tiny_png();
    let uri = encode_data_uri(PNG_MIME, &png);
    assert_eq!(resolve_bytes(&uri, &OfflineFetcher).unwrap(), png);
    let err = resolve_bytes("https://example.com/a.png", &OfflineFetcher).unwrap_err();
    assert!(err.to_string().contains("fetch error"));
    assert!(resolve_bytes("  ", &OfflineFetcher).is_err());
}
