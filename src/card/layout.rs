//! Fixed card geometry.
//!
//! Everything here is a pure function of the name text; positions are in frame pixels.

use kurbo::{Point, Rect};

use crate::foundation::core::FrameSize;

/// Logical size of every card.
pub const FRAME_SIZE: FrameSize = FrameSize::new(450, 720);
pub const PADDING_Y: f64 = 48.0;
pub const PADDING_X: f64 = 24.0;

/// Heading shown while the name is empty.
pub const NAME_PLACEHOLDER: &str = "YOUR NAME";
/// Subtitle shown while it is empty.
pub const SUBTITLE_PLACEHOLDER: &str = "MEMORIES HUB";
/// Call to action under the code.
pub const FOOTER_TEXT: &str = "Scan to see your memories";

pub const FONT_FAMILY: &str = "Inter, Helvetica Neue, Arial, sans-serif";

pub const NAME_FONT_SIZE: f64 = 44.0;
pub const NAME_LINE_HEIGHT: f64 = 48.4;
pub const NAME_MAX_WIDTH: f64 = 300.0;
/// Average advance of an upper-case black-weight glyph, in ems.
const NAME_GLYPH_EM: f64 = 0.68;

pub const HEART_SIZE: f64 = 36.0;
const HEART_GAP: f64 = 20.0;
const ROW_INSET: f64 = 16.0;

pub const DIVIDER_WIDTH: f64 = 240.0;
const DIVIDER_GAP: f64 = 24.0;

pub const SUBTITLE_FONT_SIZE: f64 = 12.0;
pub const SUBTITLE_LINE_HEIGHT: f64 = 16.0;
pub const SUBTITLE_TRACKING: f64 = 6.0;
const SUBTITLE_GAP: f64 = 20.0;

const BRANDING_GAP: f64 = 64.0;
pub const PANEL_PADDING: f64 = 28.0;
pub const PANEL_RADIUS: f64 = 64.0;
pub const CODE_CLIP_RADIUS: f64 = 44.0;
const PANEL_GAP: f64 = 48.0;

pub const FOOTER_FONT_SIZE: f64 = 24.0;
pub const FOOTER_LINE_HEIGHT: f64 = 39.0;
const FOOTER_MAX_WIDTH: f64 = 360.0;
const FOOTER_GLYPH_EM: f64 = 0.5;

/// Greedy word wrap to at most `budget` characters per line. Words longer than the budget are
/// broken across lines.
pub fn wrap_words(text: &str, budget: usize) -> Vec<String> {
    let budget = budget.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for piece in chars.chunks(budget) {
            let len = piece.len();
            if current_len > 0 && current_len + 1 + len > budget {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(piece);
            current_len += len;
        }
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

fn char_budget(width: f64, font_size: f64, glyph_em: f64) -> usize {
    ((width / (font_size * glyph_em)).floor() as usize).max(1)
}

/// Positions of every card element for one name.
#[derive(Clone, Debug, PartialEq)]
pub struct CardLayout {
    /// Wrapped name, or empty for the placeholder.
    pub name_lines: Vec<String>,
    /// Bounds of the whole branding block.
    pub branding: Rect,
    /// Top center of the name block.
    pub name_origin: Point,
    /// Left and right heart icons.
    pub hearts: [Rect; 2],
    /// Gradient rule under the name.
    pub divider: Rect,
    /// Top center of the subtitle line.
    pub subtitle_origin: Point,
    /// White panel behind the code.
    pub panel: Rect,
    /// Top-left of the QR graphic.
    pub code_origin: Point,
    /// Bounds of the footer block.
    pub footer: Rect,
    /// Wrapped footer text.
    pub footer_lines: Vec<String>,
}

impl CardLayout {
    /// Width available to the name between the two hearts.
    pub fn name_width() -> f64 {
        let row = f64::from(FRAME_SIZE.width) - 2.0 * PADDING_X - 2.0 * ROW_INSET;
        (row - 2.0 * (HEART_SIZE + HEART_GAP)).min(NAME_MAX_WIDTH)
    }

    /// Characters per name line.
    pub fn name_budget() -> usize {
        char_budget(Self::name_width(), NAME_FONT_SIZE, NAME_GLYPH_EM)
    }

    /// Lay out a card for `name` around a `code_size` pixel QR graphic.
    pub fn compute(name: &str, code_size: f64) -> Self {
        let w = f64::from(FRAME_SIZE.width);
        let cx = w / 2.0;

        let name_lines = wrap_words(name, Self::name_budget());
        let name_h = NAME_LINE_HEIGHT * name_lines.len().max(1) as f64;
        let row_h = name_h.max(HEART_SIZE);
        let branding_h = row_h + DIVIDER_GAP + 1.0 + SUBTITLE_GAP + SUBTITLE_LINE_HEIGHT;

        let panel_side = code_size + 2.0 * PANEL_PADDING;
        let footer_lines = wrap_words(
            FOOTER_TEXT,
            char_budget(FOOTER_MAX_WIDTH, FOOTER_FONT_SIZE, FOOTER_GLYPH_EM),
        );
        let footer_h = FOOTER_LINE_HEIGHT * footer_lines.len().max(1) as f64;

        let content_h = branding_h + BRANDING_GAP + panel_side + PANEL_GAP + footer_h;
        let inner_h = f64::from(FRAME_SIZE.height) - 2.0 * PADDING_Y;
        // Centered; content taller than the frame overflows evenly at both edges.
        let top = PADDING_Y + (inner_h - content_h) / 2.0;

        let branding = Rect::new(PADDING_X, top, w - PADDING_X, top + branding_h);
        let name_top = top + (row_h - name_h) / 2.0;
        let heart_top = top + (row_h - HEART_SIZE) / 2.0;
        let half = Self::name_width() / 2.0 + HEART_GAP;
        let hearts = [
            Rect::new(cx - half - HEART_SIZE, heart_top, cx - half, heart_top + HEART_SIZE),
            Rect::new(cx + half, heart_top, cx + half + HEART_SIZE, heart_top + HEART_SIZE),
        ];

        let divider_top = top + row_h + DIVIDER_GAP;
        let divider = Rect::new(
            cx - DIVIDER_WIDTH / 2.0,
            divider_top,
            cx + DIVIDER_WIDTH / 2.0,
            divider_top + 1.0,
        );
        let subtitle_origin = Point::new(cx, divider.y1 + SUBTITLE_GAP);

        let panel_top = branding.y1 + BRANDING_GAP;
        let panel = Rect::new(
            cx - panel_side / 2.0,
            panel_top,
            cx + panel_side / 2.0,
            panel_top + panel_side,
        );
        let code_origin = Point::new(panel.x0 + PANEL_PADDING, panel.y0 + PANEL_PADDING);

        let footer_top = panel.y1 + PANEL_GAP;
        let footer = Rect::new(PADDING_X, footer_top, w - PADDING_X, footer_top + footer_h);

        Self {
            name_lines,
            branding,
            name_origin: Point::new(cx, name_top),
            hearts,
            divider,
            subtitle_origin,
            panel,
            code_origin,
            footer,
            footer_lines,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/card/layout.rs"]
mod tests;
