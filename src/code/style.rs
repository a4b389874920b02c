use crate::foundation::{
    core::Rgba8,
    error::{CardError, CardResult},
};

/// How data modules are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotShape {
    /// Filled squares.
    Square,
    /// Circles inscribed in each module.
    Dots,
}

/// Outer ring of each finder pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerSquareShape {
    /// Square ring.
    Square,
    /// Ring with heavily rounded corners.
    ExtraRounded,
}

/// Inner 3x3 dot of each finder pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerDotShape {
    /// Filled square.
    Square,
    /// Filled circle.
    Dot,
}

/// QR error correction level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorCorrection {
    /// About 7% recovery.
    L,
    /// About 15% recovery.
    M,
    /// About 25% recovery.
    Q,
    /// About 30% recovery.
    H,
}

impl ErrorCorrection {
    /// Matching `qrcode` level.
    pub fn ec_level(self) -> qrcode::EcLevel {
        match self {
            Self::L => qrcode::EcLevel::L,
            Self::M => qrcode::EcLevel::M,
            Self::Q => qrcode::EcLevel::Q,
            Self::H => qrcode::EcLevel::H,
        }
    }

    /// Share of codewords the level can recover; bounds how many modules an overlay may hide.
    pub fn recoverable_fraction(self) -> f64 {
        match self {
            Self::L => 0.07,
            Self::M => 0.15,
            Self::Q => 0.25,
            Self::H => 0.30,
        }
    }
}

/// Static styling a [`crate::QrRenderer`] is constructed with.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QrStyle {
    /// Side length of the square graphic in logical pixels.
    pub size: u32,
    /// Data module shape.
    pub dots: DotShape,
    /// Data module color.
    pub dot_color: Rgba8,
    /// Fill behind the modules.
    pub background: Rgba8,
    /// Finder ring shape.
    pub corner_square: CornerSquareShape,
    /// Finder ring color.
    pub corner_square_color: Rgba8,
    /// Finder center shape.
    pub corner_dot: CornerDotShape,
    /// Finder center color.
    pub corner_dot_color: Rgba8,
    /// Encoding error correction level.
    pub error_correction: ErrorCorrection,
    /// Upper bound of the overlay relative to the code area, in `(0, 1]`.
    pub image_size: f64,
    /// Inset of the overlay inside the area cleared for it.
    pub image_margin: f64,
    /// Allow remote overlay images to be loaded at capture time.
    pub cross_origin: bool,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            size: 280,
            dots: DotShape::Dots,
            dot_color: Rgba8::BLACK,
            background: Rgba8::WHITE,
            corner_square: CornerSquareShape::ExtraRounded,
            corner_square_color: Rgba8::opaque(0x1a, 0x1a, 0x1a),
            corner_dot: CornerDotShape::Dot,
            corner_dot_color: Rgba8::opaque(0x1a, 0x1a, 0x1a),
            error_correction: ErrorCorrection::H,
            image_size: 0.45,
            image_margin: 10.0,
            cross_origin: true,
        }
    }
}

impl QrStyle {
    /// Check size and overlay parameters.
    pub fn validate(&self) -> CardResult<()> {
        if self.size == 0 {
            return Err(CardError::validation("qr size must be > 0"));
        }
        if !self.image_size.is_finite() || self.image_size <= 0.0 || self.image_size > 1.0 {
            return Err(CardError::validation("qr image_size must be in (0, 1]"));
        }
        if !self.image_margin.is_finite() || self.image_margin < 0.0 {
            return Err(CardError::validation("qr image_margin must be >= 0"));
        }
        Ok(())
    }
}
