use kurbo::{Point, Rect, RoundedRect, Shape as _};

use crate::{
    code::style::{CornerDotShape, CornerSquareShape, DotShape, QrStyle},
    foundation::{
        core::Rgba8,
        error::{CardError, CardResult},
    },
};

const FINDER_MODULES: usize = 7;
const PATH_TOLERANCE: f64 = 0.05;

/// A filled primitive of the QR graphic, in graphic-local coordinates.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum QrShape {
    /// Round module or finder dot.
    Circle {
        /// Circle center.
        center: Point,
        /// Circle radius.
        radius: f64,
        /// Fill color.
        fill: Rgba8,
    },
    /// Square module or finder part.
    Rect {
        /// Bounds.
        rect: Rect,
        /// Fill color.
        fill: Rgba8,
    },
    /// SVG path data filled with the even-odd rule.
    Path {
        /// Path data.
        d: String,
        /// Fill color.
        fill: Rgba8,
    },
}

/// Pixel placement of the module matrix inside the square graphic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModuleGrid {
    /// Modules per side.
    pub count: usize,
    /// Module edge length in whole pixels.
    pub dot: f64,
    /// Offset that centers the matrix in the graphic.
    pub origin: f64,
}

impl ModuleGrid {
    /// Fit `count` modules into a `size`-pixel square.
    pub fn new(count: usize, size: u32) -> CardResult<Self> {
        if count == 0 {
            return Err(CardError::encode("qr matrix is empty"));
        }
        let dot = (f64::from(size) / count as f64).floor();
        if dot < 1.0 {
            return Err(CardError::validation(format!(
                "qr size {size}px cannot fit {count} modules"
            )));
        }
        let origin = ((f64::from(size) - count as f64 * dot) / 2.0).floor();
        Ok(Self { count, dot, origin })
    }

    /// Pixel bounds of one module.
    pub fn cell(&self, col: usize, row: usize) -> Rect {
        let x = self.origin + col as f64 * self.dot;
        let y = self.origin + row as f64 * self.dot;
        Rect::new(x, y, x + self.dot, y + self.dot)
    }

    /// Top-left module of each finder pattern.
    pub fn finder_origins(&self) -> [(usize, usize); 3] {
        let far = self.count - FINDER_MODULES;
        [(0, 0), (far, 0), (0, far)]
    }

    /// True inside one of the three 7x7 finder patterns.
    pub fn is_finder(&self, col: usize, row: usize) -> bool {
        let far = self.count.saturating_sub(FINDER_MODULES);
        let near_col = col < FINDER_MODULES;
        let near_row = row < FINDER_MODULES;
        (near_col && near_row) || (col >= far && near_row) || (near_col && row >= far)
    }
}

/// Central block of modules cleared for the overlay image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HiddenArea {
    /// Hidden columns, always odd.
    pub hide_x: usize,
    /// Hidden rows, always odd.
    pub hide_y: usize,
}

impl HiddenArea {
    /// Size the cleared block for an image with aspect `h / w`.
    ///
    /// At most `image_size * recoverable * count^2` modules are hidden and neither side may
    /// reach into the finder patterns. Both sides are odd so the block stays centered.
    pub fn for_image(
        count: usize,
        image_size: f64,
        recoverable: f64,
        aspect: f64,
    ) -> Option<Self> {
        let max_hidden = (image_size * recoverable * (count * count) as f64).floor() as i64;
        let max_axis = count as i64 - 2 * FINDER_MODULES as i64;
        if max_hidden <= 0 || max_axis <= 0 || !aspect.is_finite() || aspect <= 0.0 {
            return None;
        }

        let span_y = |x: i64| 1 + 2 * (((x as f64 * aspect) - 1.0) / 2.0).ceil().max(0.0) as i64;

        let mut hide_x = ((max_hidden as f64 / aspect).sqrt().floor() as i64).max(1);
        hide_x = hide_x.min(max_axis);
        if hide_x % 2 == 0 {
            hide_x -= 1;
        }
        let mut hide_y = span_y(hide_x);
        while hide_y > max_axis || hide_x * hide_y > max_hidden {
            hide_x -= 2;
            if hide_x < 1 {
                return None;
            }
            hide_y = span_y(hide_x);
        }

        Some(Self {
            hide_x: hide_x as usize,
            hide_y: hide_y as usize,
        })
    }

    fn start(count: usize, span: usize) -> usize {
        (count - span) / 2
    }

    /// True when module `(col, row)` is cleared for the overlay.
    pub fn contains(&self, count: usize, col: usize, row: usize) -> bool {
        let x0 = Self::start(count, self.hide_x);
        let y0 = Self::start(count, self.hide_y);
        (x0..x0 + self.hide_x).contains(&col) && (y0..y0 + self.hide_y).contains(&row)
    }

    /// Where the overlay image is drawn, `None` when the margin swallows the whole block.
    pub fn image_rect(&self, grid: &ModuleGrid, margin: f64) -> Option<Rect> {
        let x0 = grid.origin + Self::start(grid.count, self.hide_x) as f64 * grid.dot;
        let y0 = grid.origin + Self::start(grid.count, self.hide_y) as f64 * grid.dot;
        let w = self.hide_x as f64 * grid.dot - 2.0 * margin;
        let h = self.hide_y as f64 * grid.dot - 2.0 * margin;
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        Some(Rect::new(x0 + margin, y0 + margin, x0 + margin + w, y0 + margin + h))
    }
}

/// Shape for one data module in the configured dot style.
pub fn dot_shape(style: &QrStyle, grid: &ModuleGrid, col: usize, row: usize) -> QrShape {
    let cell = grid.cell(col, row);
    match style.dots {
        DotShape::Square => QrShape::Rect {
            rect: cell,
            fill: style.dot_color,
        },
        DotShape::Dots => QrShape::Circle {
            center: cell.center(),
            radius: grid.dot / 2.0,
            fill: style.dot_color,
        },
    }
}

/// Outer ring and inner dot of one finder pattern.
pub fn finder_shapes(style: &QrStyle, grid: &ModuleGrid, col: usize, row: usize) -> [QrShape; 2] {
    let dot = grid.dot;
    let outer = Rect::from_origin_size(
        grid.cell(col, row).origin(),
        (FINDER_MODULES as f64 * dot, FINDER_MODULES as f64 * dot),
    );
    let inner = outer.inset(-dot);
    let ring_d = match style.corner_square {
        CornerSquareShape::Square => {
            format!(
                "{} {}",
                outer.to_path(PATH_TOLERANCE).to_svg(),
                inner.to_path(PATH_TOLERANCE).to_svg()
            )
        }
        CornerSquareShape::ExtraRounded => {
            let outer = RoundedRect::from_rect(outer, 2.5 * dot);
            let inner = RoundedRect::from_rect(inner, 1.5 * dot);
            format!(
                "{} {}",
                outer.to_path(PATH_TOLERANCE).to_svg(),
                inner.to_path(PATH_TOLERANCE).to_svg()
            )
        }
    };

    let eye = outer.inset(-2.0 * dot);
    let eye_shape = match style.corner_dot {
        CornerDotShape::Square => QrShape::Rect {
            rect: eye,
            fill: style.corner_dot_color,
        },
        CornerDotShape::Dot => QrShape::Circle {
            center: eye.center(),
            radius: eye.width() / 2.0,
            fill: style.corner_dot_color,
        },
    };

    [
        QrShape::Path {
            d: ring_d,
            fill: style.corner_square_color,
        },
        eye_shape,
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/code/geometry.rs"]
mod tests;
