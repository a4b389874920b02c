use super::*;
use kurbo::Vec2;

fn text(id: &str) -> Node {
    Node::new(
        id,
        NodeKind::Text(TextSpec {
            lines: vec!["A".into(), "B".into()],
            origin: Point::new(10.0, 20.0),
            anchor: TextAnchor::Middle,
            font_family: "sans-serif".into(),
            font_size: 10.0,
            font_weight: 400,
            line_height: 12.0,
            letter_spacing: 0.0,
            color: Rgba8::WHITE,
        }),
    )
}

fn tree() -> Node {
    Node::group("root")
        .with_child(
            Node::group("branding")
                .with_classes(&[TransitionClass::AnimateIn, TransitionClass::FadeIn])
                .with_style(NodeStyle {
                    opacity: 0.3,
                    transform: Affine::translate(Vec2::new(0.0, -8.0)),
                })
                .with_child(text("name")),
        )
        .with_child(text("footer"))
}

#[test]
fn walk_is_preorder() {
    let mut ids = Vec::new();
    tree().walk(&mut |n| ids.push(n.id.clone()));
    assert_eq!(ids, ["root", "branding", "name", "footer"]);
}

#[test]
fn walk_mut_reaches_every_node() {
    let mut root = tree();
    root.walk_mut(&mut |n| n.style = NodeStyle::default());
    let mut all = true;
    root.walk(&mut |n| all &= n.style.is_resolved());
    assert!(all);
}

#[test]
fn find_and_settled() {
    let frame = CardFrame {
        size: FrameSize::new(100, 100),
        background: Rgba8::BLACK,
        root: tree(),
    };
    assert!(frame.node("name").is_some());
    assert!(frame.node("missing").is_none());
    assert!(!frame.is_settled());
    assert!(frame.code().is_none());
    assert!(frame.node("branding").unwrap().has_transition_class());
}

#[test]
fn text_block_height_counts_lines() {
    let Node {
        kind: NodeKind::Text(spec),
        ..
    } = text("t")
    else {
        unreachable!()
    };
    assert_eq!(spec.block_height(), 24.0);
}

#[test]
fn classes_serialize_as_markup_names() {
    let json = serde_json::to_value(tree()).unwrap();
    assert_eq!(
        json["children"][0]["classes"],
        serde_json::json!(["animate-in", "fade-in"])
    );
    assert!(json["children"][1].get("classes").is_none());
}
