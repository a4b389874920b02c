use super::*;
use crate::{
    animation::entrance::TransitionClass,
    code::{renderer::QrRenderer, style::QrStyle},
    foundation::core::FrameSize,
    scene::model::NodeStyle,
};
use kurbo::{Point, Vec2};

fn frame_with(root: Node) -> CardFrame {
    CardFrame {
        size: FrameSize::new(450, 720),
        background: Rgba8::BLACK,
        root,
    }
}

fn label(id: &str, text: &str) -> Node {
    Node::new(
        id,
        NodeKind::Text(TextSpec {
            lines: vec![text.to_string()],
            origin: Point::new(225.0, 100.0),
            anchor: TextAnchor::Middle,
            font_family: "sans-serif".into(),
            font_size: 20.0,
            font_weight: 700,
            line_height: 20.0,
            letter_spacing: -0.5,
            color: Rgba8::WHITE,
        }),
    )
}

#[test]
fn document_has_frame_dimensions_and_background() {
    let svg = write_svg(&frame_with(Node::group("root")));
    assert!(svg.starts_with("<svg "));
    assert!(svg.contains(r#"width="450" height="720" viewBox="0 0 450 720""#));
    assert!(svg.contains(r##"<rect width="450" height="720" fill="#000000"/>"##));
    assert!(svg.ends_with("</svg>"));
}

#[test]
fn transition_state_is_written_on_groups() {
    let root = Node::group("root").with_child(
        Node::group("branding")
            .with_classes(&[TransitionClass::AnimateIn, TransitionClass::FadeIn])
            .with_style(NodeStyle {
                opacity: 0.25,
                transform: Affine::translate(Vec2::new(0.0, -12.5)),
            }),
    );
    let svg = write_svg(&frame_with(root));
    assert!(svg.contains(
        r#"<g id="branding" class="animate-in fade-in" opacity="0.25" transform="matrix(1 0 0 1 0 -12.5)">"#
    ));
    assert!(svg.contains(r#"<g id="root">"#));
}

#[test]
fn text_is_escaped_and_anchored() {
    let svg = write_svg(&frame_with(label("name", "R&D <LAB>")));
    assert!(svg.contains(">R&amp;D &lt;LAB&gt;</text>"));
    assert!(svg.contains(r#"text-anchor="middle""#));
    assert!(svg.contains(r#"letter-spacing="-0.5""#));
    assert!(svg.contains(r#"y="117.2""#));
}

#[test]
fn fade_edges_emit_a_gradient() {
    let edge = Rgba8 {
        a: 0,
        ..Rgba8::opaque(0x33, 0x33, 0x33)
    };
    let divider = Node::new(
        "divider",
        NodeKind::Box(BoxSpec {
            rect: Rect::new(105.0, 10.0, 345.0, 11.0),
            radius: 0.0,
            fill: Fill::FadeEdges {
                edge,
                center: Rgba8::opaque(0x33, 0x33, 0x33),
            },
        }),
    );
    let svg = write_svg(&frame_with(divider));
    assert!(svg.contains(r#"<linearGradient id="fade1""#));
    assert!(svg.contains(r##"<stop offset="0.5" stop-color="#333333" stop-opacity="1"/>"##));
    assert!(svg.contains(r#"fill="url(#fade1)""#));
    assert!(svg.contains(r#"width="240" height="1""#));
}

#[test]
fn code_is_clipped_and_carries_overlay() {
    let href = "https://images.example.com/a.png?x=1&y=2";
    let r = QrRenderer::new(QrStyle::default(), "https://a.example", Some(href)).unwrap();
    let code = Node::new(
        "code",
        NodeKind::Code(CodeSpec {
            origin: Point::new(85.0, 300.0),
            clip_radius: 44.0,
            graphic: r.graphic().clone(),
        }),
    );
    let svg = write_svg(&frame_with(code));
    assert!(svg.contains(r#"<g transform="translate(85 300)">"#));
    assert!(svg.contains(r#"<clipPath id="qrclip1"><rect x="0" y="0" width="280" height="280" rx="44"/>"#));
    assert!(svg.contains(r#"clip-path="url(#qrclip1)""#));
    assert_eq!(svg.matches(r#"fill-rule="evenodd""#).count(), 3);
    assert!(svg.contains("<circle "));
    assert!(svg.contains(r#"xlink:href="https://images.example.com/a.png?x=1&amp;y=2""#));
}

#[test]
fn output_parses_as_svg() {
    let r = QrRenderer::new(QrStyle::default(), "https://a.example", None).unwrap();
    let root = Node::group("root").with_child(label("t", "HELLO")).with_child(Node::new(
        "code",
        NodeKind::Code(CodeSpec {
            origin: Point::new(10.0, 10.0),
            clip_radius: 44.0,
            graphic: r.graphic().clone(),
        }),
    ));
    let svg = write_svg(&frame_with(root));
    let tree = usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
    assert_eq!(tree.size().width(), 450.0);
    assert_eq!(tree.size().height(), 720.0);
}

#[test]
fn numbers_are_trimmed() {
    assert_eq!(num(1.0), "1");
    assert_eq!(num(0.5), "0.5");
    assert_eq!(num(-0.0001), "0");
    assert_eq!(num(12.3456), "12.346");
}
