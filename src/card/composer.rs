use std::time::Duration;

use kurbo::Point;

use crate::{
    animation::entrance::{Entrance, TransitionClass},
    assets::crop::ProfileImage,
    card::{
        config::CardConfig,
        layout::{self, CardLayout},
    },
    code::{
        renderer::{PLACEHOLDER_URL, QrMount, QrRenderer},
        style::QrStyle,
    },
    foundation::{core::Rgba8, error::CardResult},
    scene::model::{
        BoxSpec, CardFrame, CodeSpec, Fill, IconSpec, Node, NodeKind, TextAnchor, TextSpec,
    },
};

const HEART_PATH: &str = "M12 21.35l-1.45-1.32C5.4 15.36 2 12.28 2 8.5 2 5.42 4.42 3 7.5 3c1.74 0 3.41.81 4.5 2.09C13.09 3.81 14.76 3 16.5 3 19.58 3 22 5.42 22 8.5c0 3.78-3.4 6.86-8.55 11.54L12 21.35z";
const HEART_VIEWBOX: f64 = 24.0;
const HEART_COLOR: Rgba8 = Rgba8::opaque(0xe8, 0x31, 0x4a);
const MUTED: Rgba8 = Rgba8::opaque(0x8a, 0x8a, 0x8e);
const DIVIDER: Rgba8 = Rgba8::opaque(0x33, 0x33, 0x33);

/// Entrance classes on the branding block.
pub const BRANDING_CLASSES: [TransitionClass; 3] = [
    TransitionClass::AnimateIn,
    TransitionClass::FadeIn,
    TransitionClass::SlideInFromTop,
];
/// Entrance classes on the footer.
pub const FOOTER_CLASSES: [TransitionClass; 3] = [
    TransitionClass::AnimateIn,
    TransitionClass::FadeIn,
    TransitionClass::SlideInFromBottom,
];

/// Builds the card frame from a configuration.
///
/// Owns the one QR renderer for the card's lifetime; each compose only updates it.
pub struct CardComposer {
    renderer: QrRenderer,
    branding: Entrance,
    footer: Entrance,
}

impl CardComposer {
    /// Composer whose renderer is already attached to its container.
    pub fn new(style: QrStyle) -> CardResult<Self> {
        let mut renderer = QrRenderer::new(style, PLACEHOLDER_URL, None)?;
        renderer.initialize(QrMount::new());
        Ok(Self {
            renderer,
            branding: Entrance::new(&BRANDING_CLASSES, Duration::from_millis(700)),
            footer: Entrance::new(&FOOTER_CLASSES, Duration::from_millis(1000)),
        })
    }

    /// The card's QR renderer.
    pub fn renderer(&self) -> &QrRenderer {
        &self.renderer
    }

    /// Check that `config` can be composed without drawing it.
    pub fn check(&self, config: &CardConfig) -> CardResult<()> {
        self.renderer.check(config.url())
    }

    /// Time after which every entrance transition has finished.
    pub fn settle_time(&self) -> Duration {
        self.branding.duration.max(self.footer.duration)
    }

    /// Lay out `config` as it appears `elapsed` after the card was mounted.
    #[tracing::instrument(skip(self, config), fields(name = %config.name()))]
    pub fn compose(&mut self, config: &CardConfig, elapsed: Duration) -> CardResult<CardFrame> {
        let image = config.profile_image().map(ProfileImage::data_uri);
        self.renderer.update(config.url(), image)?;
        let graphic = self
            .renderer
            .mount()
            .and_then(QrMount::content)
            .unwrap_or_else(|| self.renderer.graphic())
            .clone();

        let name = non_empty_or(config.name(), layout::NAME_PLACEHOLDER);
        let subtitle = non_empty_or(config.subtitle(), layout::SUBTITLE_PLACEHOLDER);
        let l = CardLayout::compute(name, graphic.size);

        let branding = Node::group("branding")
            .with_classes(&self.branding.classes)
            .with_style(self.branding.sample(elapsed, l.branding.height()))
            .with_child(heart("heart-left", l.hearts[0]))
            .with_child(Node::new(
                "name",
                NodeKind::Text(TextSpec {
                    lines: l.name_lines.clone(),
                    origin: l.name_origin,
                    anchor: TextAnchor::Middle,
                    font_family: layout::FONT_FAMILY.to_string(),
                    font_size: layout::NAME_FONT_SIZE,
                    font_weight: 900,
                    line_height: layout::NAME_LINE_HEIGHT,
                    letter_spacing: -0.025 * layout::NAME_FONT_SIZE,
                    color: Rgba8::WHITE,
                }),
            ))
            .with_child(heart("heart-right", l.hearts[1]))
            .with_child(Node::new(
                "divider",
                NodeKind::Box(BoxSpec {
                    rect: l.divider,
                    radius: 0.0,
                    fill: Fill::FadeEdges {
                        edge: Rgba8 { a: 0, ..DIVIDER },
                        center: DIVIDER,
                    },
                }),
            ))
            .with_child(Node::new(
                "subtitle",
                NodeKind::Text(TextSpec {
                    lines: vec![subtitle.to_string()],
                    origin: l.subtitle_origin,
                    anchor: TextAnchor::Middle,
                    font_family: layout::FONT_FAMILY.to_string(),
                    font_size: layout::SUBTITLE_FONT_SIZE,
                    font_weight: 900,
                    line_height: layout::SUBTITLE_LINE_HEIGHT,
                    letter_spacing: layout::SUBTITLE_TRACKING,
                    color: Rgba8 { a: 230, ..MUTED },
                }),
            ));

        let panel = Node::new(
            "panel",
            NodeKind::Box(BoxSpec {
                rect: l.panel,
                radius: layout::PANEL_RADIUS,
                fill: Fill::Solid(Rgba8::WHITE),
            }),
        )
        .with_child(Node::new(
            "code",
            NodeKind::Code(CodeSpec {
                origin: l.code_origin,
                clip_radius: layout::CODE_CLIP_RADIUS,
                graphic,
            }),
        ));

        let footer = Node::group("footer")
            .with_classes(&self.footer.classes)
            .with_style(self.footer.sample(elapsed, l.footer.height()))
            .with_child(Node::new(
                "footer-text",
                NodeKind::Text(TextSpec {
                    lines: l.footer_lines.clone(),
                    origin: Point::new(l.footer.center().x, l.footer.y0),
                    anchor: TextAnchor::Middle,
                    font_family: layout::FONT_FAMILY.to_string(),
                    font_size: layout::FOOTER_FONT_SIZE,
                    font_weight: 700,
                    line_height: layout::FOOTER_LINE_HEIGHT,
                    letter_spacing: -0.025 * layout::FOOTER_FONT_SIZE,
                    color: MUTED,
                }),
            ));

        Ok(CardFrame {
            size: layout::FRAME_SIZE,
            background: Rgba8::BLACK,
            root: Node::group("card")
                .with_child(branding)
                .with_child(panel)
                .with_child(footer),
        })
    }

    /// [`compose`](Self::compose) with every transition finished.
    pub fn compose_settled(&mut self, config: &CardConfig) -> CardResult<CardFrame> {
        let settled = self.settle_time();
        self.compose(config, settled)
    }
}

fn non_empty_or<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}

fn heart(id: &str, rect: kurbo::Rect) -> Node {
    Node::new(
        id,
        NodeKind::Icon(IconSpec {
            path_d: HEART_PATH.to_string(),
            viewbox: HEART_VIEWBOX,
            rect,
            fill: HEART_COLOR,
        }),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/card/composer.rs"]
mod tests;
