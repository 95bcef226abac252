/// Replaces a non-finite coordinate with zero.
pub(crate) fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// A plain quad, used for the derived physical-space rect on [`Rect`].
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Margin {
    pub left: f64,
    pub top: f64,
}

/// Physical/logical size ratio per axis.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScaleRatio {
    pub x: f64,
    pub y: f64,
}

impl Default for ScaleRatio {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

/// Extra space a component requires beyond its own box, encroaching toward a
/// container edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EdgeBleed {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl EdgeBleed {
    /// Widens this envelope to cover `other` (per-side max).
    pub fn expand(&mut self, other: &EdgeBleed) {
        self.left = self.left.max(other.left);
        self.right = self.right.max(other.right);
        self.top = self.top.max(other.top);
        self.bottom = self.bottom.max(other.bottom);
    }

    /// Drops non-finite or negative sides to zero.
    pub(crate) fn sanitized(&self) -> Self {
        let side = |v: f64| finite_or_zero(v).max(0.0);
        Self {
            left: side(self.left),
            right: side(self.right),
            top: side(self.top),
            bottom: side(self.bottom),
        }
    }
}

/// Canonical rectangle value.
///
/// `x/y/width/height` live in the logical coordinate space; `margin`,
/// `scale_ratio`, `edge_bleed` and `computed` are stamped by the positioner
/// when a layout pass places the rect. `computed` is the physical-space quad
/// (margin, scale and origin translation applied).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub scale_ratio: ScaleRatio,
    pub edge_bleed: EdgeBleed,
    pub computed: Bounds,
}

impl Rect {
    /// Builds a rect, normalizing degenerate input: non-finite coordinates
    /// become zero and negative sizes are clamped to zero.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: finite_or_zero(x),
            y: finite_or_zero(y),
            width: finite_or_zero(width).max(0.0),
            height: finite_or_zero(height).max(0.0),
            ..Self::default()
        }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Bounding box of `self` and `other`. Stamped fields are not carried over.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}
