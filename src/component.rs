use crate::{
    config::{Dock, DockConfig},
    geom::{EdgeBleed, Rect, finite_or_zero},
};

/// Arguments to a component's size query.
///
/// `inner` is the current working center rect at the time the component is
/// granted space (later components see a smaller working area); `outer` is the
/// full logical container rect.
#[derive(Clone, Debug)]
pub struct SizeRequest {
    pub inner: Rect,
    pub outer: Rect,
    pub dock: Dock,
}

/// A component's answer to a size query.
///
/// The legacy bare-scalar shape ("this much, whichever way I dock") is
/// [`SizeHint::splat`]; the dock side picks the relevant dimension.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SizeHint {
    pub width: f64,
    pub height: f64,
    pub edge_bleed: EdgeBleed,
}

impl SizeHint {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            edge_bleed: EdgeBleed::default(),
        }
    }

    /// One scalar applied to both dimensions.
    pub fn splat(size: f64) -> Self {
        Self::new(size, size)
    }

    pub fn with_edge_bleed(mut self, edge_bleed: EdgeBleed) -> Self {
        self.edge_bleed = edge_bleed;
        self
    }

    /// The scalar the reduction engine allocates for a given dock side, rounded
    /// up. `top`/`bottom` consume height, `left`/`right` consume width, center
    /// and reference docks use the larger of the two.
    pub(crate) fn relevant(&self, dock: &Dock) -> f64 {
        let v = match dock {
            Dock::Top | Dock::Bottom => self.height,
            Dock::Left | Dock::Right => self.width,
            Dock::Center | Dock::At(_) => self.width.max(self.height),
        };
        finite_or_zero(v).max(0.0).ceil()
    }
}

impl From<f64> for SizeHint {
    fn from(size: f64) -> Self {
        Self::splat(size)
    }
}

/// The contract a layout participant must fulfil.
///
/// A component returning `None` from [`layout_config`](DockItem::layout_config)
/// is a programming-contract violation and fails the pass; it is not a runtime
/// condition the engine recovers from.
pub trait DockItem {
    fn layout_config(&self) -> Option<&DockConfig>;

    /// Queried lazily, exactly once per pass, in priority order.
    fn preferred_size(&mut self, request: &SizeRequest) -> SizeHint;

    /// The sole side effect of a layout pass. Hidden components receive two
    /// zero rects.
    fn resize(&mut self, inner: &Rect, outer: &Rect);

    /// Key for reference-dock resolution.
    fn key(&self) -> Option<&str> {
        None
    }
}
