use kurbo::{Affine, Rect};

use crate::{
    code::{geometry::QrShape, renderer::QrGraphic},
    foundation::core::Rgba8,
    scene::model::{BoxSpec, CardFrame, CodeSpec, Fill, IconSpec, Node, NodeKind, TextAnchor, TextSpec},
};

/// Distance from a line box's vertical center to the baseline, in ems.
const CAP_HALF_EM: f64 = 0.36;

/// Serialize a frame to a standalone SVG document in frame pixel units.
pub fn write_svg(frame: &CardFrame) -> String {
    let w = frame.size.width;
    let h = frame.size.height;
    let mut out = SvgWriter::default();
    out.push(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    ));
    out.push(&format!(
        r#"<rect width="{w}" height="{h}"{}/>"#,
        paint("fill", frame.background)
    ));
    out.node(&frame.root);
    out.push("</svg>");
    out.buf
}

#[derive(Default)]
struct SvgWriter {
    buf: String,
    next_def: u32,
}

impl SvgWriter {
    fn push(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    fn def_id(&mut self, prefix: &str) -> String {
        self.next_def += 1;
        format!("{prefix}{}", self.next_def)
    }

    fn node(&mut self, node: &Node) {
        let mut open = format!(r#"<g id="{}""#, escape(&node.id));
        if !node.classes.is_empty() {
            let classes: Vec<&str> = node.classes.iter().map(|c| c.as_str()).collect();
            open.push_str(&format!(r#" class="{}""#, classes.join(" ")));
        }
        if node.style.opacity != 1.0 {
            open.push_str(&format!(r#" opacity="{}""#, num(node.style.opacity.clamp(0.0, 1.0))));
        }
        if node.style.transform != Affine::IDENTITY {
            open.push_str(&format!(r#" transform="{}""#, matrix(node.style.transform)));
        }
        open.push('>');
        self.push(&open);

        match &node.kind {
            NodeKind::Group => {}
            NodeKind::Text(spec) => self.text(spec),
            NodeKind::Box(spec) => self.rect_box(spec),
            NodeKind::Icon(spec) => self.icon(spec),
            NodeKind::Code(spec) => self.code(spec),
        }
        for child in &node.children {
            self.node(child);
        }
        self.push("</g>");
    }

    fn text(&mut self, spec: &TextSpec) {
        let anchor = match spec.anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
        };
        for (i, line) in spec.lines.iter().enumerate() {
            let top = spec.origin.y + spec.line_height * i as f64;
            let baseline = top + spec.line_height / 2.0 + spec.font_size * CAP_HALF_EM;
            let mut el = format!(
                r#"<text x="{}" y="{}" text-anchor="{anchor}" font-family="{}" font-size="{}" font-weight="{}""#,
                num(spec.origin.x),
                num(baseline),
                escape(&spec.font_family),
                num(spec.font_size),
                spec.font_weight,
            );
            if spec.letter_spacing != 0.0 {
                el.push_str(&format!(r#" letter-spacing="{}""#, num(spec.letter_spacing)));
            }
            el.push_str(&paint("fill", spec.color));
            el.push_str(&format!(">{}</text>", escape(line)));
            self.push(&el);
        }
    }

    fn rect_box(&mut self, spec: &BoxSpec) {
        let fill = match spec.fill {
            Fill::Solid(color) => paint("fill", color),
            Fill::FadeEdges { edge, center } => {
                let id = self.def_id("fade");
                self.push(&format!(
                    r#"<defs><linearGradient id="{id}" x1="0" y1="0" x2="1" y2="0">{}{}{}</linearGradient></defs>"#,
                    stop(0.0, edge),
                    stop(0.5, center),
                    stop(1.0, edge)
                ));
                format!(r#" fill="url(#{id})""#)
            }
        };
        self.push(&format!("<rect{}{fill}/>", rect_attrs(spec.rect, spec.radius)));
    }

    fn icon(&mut self, spec: &IconSpec) {
        let s = if spec.viewbox > 0.0 {
            spec.rect.width() / spec.viewbox
        } else {
            1.0
        };
        let xf = Affine::new([s, 0.0, 0.0, s, spec.rect.x0, spec.rect.y0]);
        self.push(&format!(
            r#"<path d="{}" transform="{}"{}/>"#,
            escape(&spec.path_d),
            matrix(xf),
            paint("fill", spec.fill)
        ));
    }

    fn code(&mut self, spec: &CodeSpec) {
        let g: &QrGraphic = &spec.graphic;
        let clip = self.def_id("qrclip");
        let bounds = Rect::new(0.0, 0.0, g.size, g.size);
        self.push(&format!(
            r#"<g transform="translate({} {})"><defs><clipPath id="{clip}"><rect{}/></clipPath></defs><g clip-path="url(#{clip})">"#,
            num(spec.origin.x),
            num(spec.origin.y),
            rect_attrs(bounds, spec.clip_radius)
        ));
        self.push(&format!(
            "<rect{}{}/>",
            rect_attrs(bounds, 0.0),
            paint("fill", g.background)
        ));
        for shape in &g.shapes {
            let el = match shape {
                QrShape::Circle {
                    center,
                    radius,
                    fill,
                } => format!(
                    r#"<circle cx="{}" cy="{}" r="{}"{}/>"#,
                    num(center.x),
                    num(center.y),
                    num(*radius),
                    paint("fill", *fill)
                ),
                QrShape::Rect { rect, fill } => {
                    format!("<rect{}{}/>", rect_attrs(*rect, 0.0), paint("fill", *fill))
                }
                QrShape::Path { d, fill } => format!(
                    r#"<path d="{}" fill-rule="evenodd"{}/>"#,
                    escape(d),
                    paint("fill", *fill)
                ),
            };
            self.push(&el);
        }
        if let Some(overlay) = &g.overlay {
            self.push(&format!(
                r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid meet" xlink:href="{}"/>"#,
                num(overlay.rect.x0),
                num(overlay.rect.y0),
                num(overlay.rect.width()),
                num(overlay.rect.height()),
                escape(&overlay.href)
            ));
        }
        self.push("</g></g>");
    }
}

fn rect_attrs(rect: Rect, radius: f64) -> String {
    let mut s = format!(
        r#" x="{}" y="{}" width="{}" height="{}""#,
        num(rect.x0),
        num(rect.y0),
        num(rect.width()),
        num(rect.height())
    );
    if radius > 0.0 {
        s.push_str(&format!(r#" rx="{}""#, num(radius)));
    }
    s
}

fn paint(attr: &str, color: Rgba8) -> String {
    let mut s = format!(r#" {attr}="{}""#, color.to_hex_rgb());
    if color.a != 255 {
        s.push_str(&format!(r#" {attr}-opacity="{}""#, num(f64::from(color.alpha_f32()))));
    }
    s
}

fn stop(offset: f64, color: Rgba8) -> String {
    format!(
        r#"<stop offset="{}" stop-color="{}" stop-opacity="{}"/>"#,
        num(offset),
        color.to_hex_rgb(),
        num(f64::from(color.alpha_f32()))
    )
}

fn matrix(xf: Affine) -> String {
    let c = xf.as_coeffs();
    format!(
        "matrix({} {} {} {} {} {})",
        num(c[0]),
        num(c[1]),
        num(c[2]),
        num(c[3]),
        num(c[4]),
        num(c[5])
    )
}

fn num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "" | "-" | "-0" => "0".to_string(),
        _ => s.to_string(),
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
