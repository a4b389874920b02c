use kurbo::{Affine, Point, Rect};

use crate::{
    animation::entrance::TransitionClass,
    code::renderer::QrGraphic,
    foundation::core::{FrameSize, Rgba8},
};

/// Visual state a transition can move a node away from.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeStyle {
    /// Group opacity in `[0, 1]`.
    pub opacity: f64,
    /// Transform applied on top of the node's layout position.
    pub transform: Affine,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            transform: Affine::IDENTITY,
        }
    }
}

impl NodeStyle {
    /// Fully opaque and untransformed.
    pub fn is_resolved(&self) -> bool {
        self.opacity == 1.0 && self.transform == Affine::IDENTITY
    }
}

/// Horizontal alignment of text lines relative to their origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TextAnchor {
    /// Lines start at the origin.
    Start,
    /// Lines are centered on the origin.
    Middle,
}

/// One or more lines of text. `origin` is the anchor point of the first line box's top edge.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextSpec {
    /// Pre-wrapped lines, top to bottom.
    pub lines: Vec<String>,
    /// Anchor point of the first line box's top edge.
    pub origin: Point,
    /// Horizontal alignment around `origin`.
    pub anchor: TextAnchor,
    /// CSS-style font family list.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Numeric weight, 400 regular and 700 bold.
    pub font_weight: u16,
    /// Distance between consecutive line tops.
    pub line_height: f64,
    /// Extra space between glyphs.
    pub letter_spacing: f64,
    /// Text fill.
    pub color: Rgba8,
}

impl TextSpec {
    /// Total height of the line boxes; an empty block still takes one line.
    pub fn block_height(&self) -> f64 {
        self.line_height * self.lines.len().max(1) as f64
    }
}

/// Paint for a [`BoxSpec`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Fill {
    /// Single flat color.
    Solid(Rgba8),
    /// Horizontal gradient: `edge` at both ends, `center` in the middle.
    FadeEdges {
        /// Color at the left and right ends.
        edge: Rgba8,
        /// Color at the horizontal midpoint.
        center: Rgba8,
    },
}

/// Rounded rectangle.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoxSpec {
    /// Bounds in frame coordinates.
    pub rect: Rect,
    /// Corner radius.
    pub radius: f64,
    /// Interior paint.
    pub fill: Fill,
}

/// Vector icon from a square `viewbox`-sized path, scaled into `rect`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IconSpec {
    /// SVG path data in viewbox units.
    pub path_d: String,
    /// Edge length of the square viewbox `path_d` is drawn in.
    pub viewbox: f64,
    /// Target bounds in frame coordinates.
    pub rect: Rect,
    /// Icon color.
    pub fill: Rgba8,
}

/// QR graphic placed in the frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CodeSpec {
    /// Top-left corner of the graphic.
    pub origin: Point,
    /// Corner radius of the clip around the code.
    pub clip_radius: f64,
    /// Encoded code and its overlay.
    pub graphic: QrGraphic,
}

/// What a [`Node`] draws.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum NodeKind {
    /// Draws nothing itself, only its children.
    Group,
    /// Text block.
    Text(TextSpec),
    /// Rounded rectangle.
    Box(BoxSpec),
    /// Vector icon.
    Icon(IconSpec),
    /// QR code.
    Code(CodeSpec),
}

/// Element of the card's render tree.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    /// Stable identifier, unique within a frame.
    pub id: String,
    /// Content drawn by this node.
    pub kind: NodeKind,
    /// Entrance transition markers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<TransitionClass>,
    /// Current opacity and transform.
    pub style: NodeStyle,
    /// Children, drawn in order after the node itself.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Node with default style and no classes or children.
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            classes: Vec::new(),
            style: NodeStyle::default(),
            children: Vec::new(),
        }
    }

    /// Empty group node.
    pub fn group(id: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Group)
    }

    /// Append a child.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Replace the transition classes.
    pub fn with_classes(mut self, classes: &[TransitionClass]) -> Self {
        self.classes = classes.to_vec();
        self
    }

    /// Replace the style.
    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = style;
        self
    }

    /// True when any entrance transition is attached.
    pub fn has_transition_class(&self) -> bool {
        !self.classes.is_empty()
    }

    /// Pre-order traversal.
    pub fn walk(&self, f: &mut dyn FnMut(&Node)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// Mutable pre-order traversal.
    pub fn walk_mut(&mut self, f: &mut dyn FnMut(&mut Node)) {
        f(self);
        for child in &mut self.children {
            child.walk_mut(f);
        }
    }

    /// First node in this subtree with `id`.
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}

/// A fully laid out card, ready to be written as SVG and rasterized.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CardFrame {
    /// Logical size of the frame.
    pub size: FrameSize,
    /// Card background.
    pub background: Rgba8,
    /// Root of the render tree.
    pub root: Node,
}

impl CardFrame {
    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.root.find(id)
    }

    /// True when no node is mid-transition.
    pub fn is_settled(&self) -> bool {
        let mut settled = true;
        self.root.walk(&mut |n| settled &= n.style.is_resolved());
        settled
    }

    /// The QR code node's content, if any.
    pub fn code(&self) -> Option<&CodeSpec> {
        find_code(&self.root)
    }

    /// Mutable access to the QR code node's content.
    pub fn code_mut(&mut self) -> Option<&mut CodeSpec> {
        find_code_mut(&mut self.root)
    }
}

fn find_code(node: &Node) -> Option<&CodeSpec> {
    if let NodeKind::Code(spec) = &node.kind {
        return Some(spec);
    }
    node.children.iter().find_map(find_code)
}

fn find_code_mut(node: &mut Node) -> Option<&mut CodeSpec> {
    if let NodeKind::Code(spec) = &mut node.kind {
        return Some(spec);
    }
    node.children.iter_mut().find_map(find_code_mut)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
