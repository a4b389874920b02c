use std::time::Duration;

use kurbo::{Affine, Vec2};

use crate::{animation::ease, scene::model::NodeStyle};

/// Marker classes for entrance transitions on a node.
///
/// `AnimateIn` enables the entrance; the other classes choose which properties start away
/// from their resting value.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionClass {
    /// Enables the entrance.
    AnimateIn,
    /// Start fully transparent.
    FadeIn,
    /// Start one node height above the resting position.
    SlideInFromTop,
    /// Start one node height below the resting position.
    SlideInFromBottom,
}

impl TransitionClass {
    /// Class name as written in markup.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AnimateIn => "animate-in",
            Self::FadeIn => "fade-in",
            Self::SlideInFromTop => "slide-in-from-top",
            Self::SlideInFromBottom => "slide-in-from-bottom",
        }
    }
}

/// Timing for one entrance transition.
#[derive(Clone, Debug, PartialEq)]
pub struct Entrance {
    /// Classes the transition is driven by.
    pub classes: Vec<TransitionClass>,
    /// Time from mount to the resting state.
    pub duration: Duration,
}

impl Entrance {
    /// Cubic ease-out entrance over `duration`.
    pub fn new(classes: &[TransitionClass], duration: Duration) -> Self {
        Self {
            classes: classes.to_vec(),
            duration,
        }
    }

    fn has(&self, class: TransitionClass) -> bool {
        self.classes.contains(&class)
    }

    /// Eased (cubic out) progress in `[0, 1]` after `elapsed` on screen.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        ease::out_cubic(t)
    }

    /// True once the node has reached its resting style, or when it never animates.
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        !self.has(TransitionClass::AnimateIn) || elapsed >= self.duration
    }

    /// Sample the node style at `elapsed`. Slides travel the node's own height (`extent`).
    pub fn sample(&self, elapsed: Duration, extent: f64) -> NodeStyle {
        if self.is_finished(elapsed) {
            return NodeStyle::default();
        }
        let p = self.progress(elapsed);
        let remaining = 1.0 - p;

        let opacity = if self.has(TransitionClass::FadeIn) {
            p
        } else {
            1.0
        };
        let dy = if self.has(TransitionClass::SlideInFromTop) {
            -extent * remaining
        } else if self.has(TransitionClass::SlideInFromBottom) {
            extent * remaining
        } else {
            0.0
        };

        NodeStyle {
            opacity,
            transform: if dy == 0.0 {
                Affine::IDENTITY
            } else {
                Affine::translate(Vec2::new(0.0, dy))
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/entrance.rs"]
mod tests;
