use std::collections::BTreeMap;

use crate::geom::{Rect, finite_or_zero};

/// Caller-supplied layout settings. Every field has a usable default, and all
/// numeric values are clamped during resolution rather than rejected.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub center: CenterSettings,
    pub logical: Option<LogicalSizeSettings>,
    pub layout_modes: BTreeMap<String, LayoutModeSize>,
}

/// Minimum-size contract for the central content area.
///
/// The reduction engine requires the remaining center rect to satisfy, per axis,
/// `max(min(absolute_minimum, logical_dimension), logical_dimension * ratio)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CenterSettings {
    pub min_width_ratio: f64,
    pub min_height_ratio: f64,
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for CenterSettings {
    fn default() -> Self {
        Self {
            min_width_ratio: 0.5,
            min_height_ratio: 0.5,
            min_width: 0.0,
            min_height: 0.0,
        }
    }
}

/// An abstract coordinate space distinct from physical pixels. Layout math runs
/// in logical coordinates; the positioner maps results back through the
/// physical/logical scale ratio.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LogicalSizeSettings {
    /// Logical width; non-finite or missing falls back to the physical width.
    pub width: Option<f64>,
    /// Logical height; non-finite or missing falls back to the physical height.
    pub height: Option<f64>,
    pub preserve_aspect_ratio: bool,
    /// Distribution of leftover physical space on the non-limiting axis when
    /// the aspect ratio is preserved: 0 = flush to start, 1 = flush to end.
    pub align: f64,
}

impl Default for LogicalSizeSettings {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            preserve_aspect_ratio: false,
            align: 0.5,
        }
    }
}

/// A named minimum logical size a component can require in order to be shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayoutModeSize {
    pub width: f64,
    pub height: f64,
}

/// Fully-defaulted, clamped settings for one layout pass.
#[derive(Clone, Debug)]
pub(crate) struct ResolvedSettings {
    /// Physical container, floored to integers, origin at zero.
    pub container: Rect,
    /// The coordinate space all layout math operates in, origin at zero.
    pub logical: Rect,
    /// The caller rect's origin; placed rects are translated by it.
    pub origin: (f64, f64),
    pub preserve_aspect_ratio: bool,
    pub align: f64,
    pub center: CenterSettings,
    pub layout_modes: BTreeMap<String, LayoutModeSize>,
}

fn clamp01(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { fallback }
}

fn clamp_non_negative(v: f64) -> f64 {
    finite_or_zero(v).max(0.0)
}

pub(crate) fn resolve(settings: &LayoutSettings, rect: &Rect) -> ResolvedSettings {
    let container = Rect::new(
        0.0,
        0.0,
        finite_or_zero(rect.width).floor(),
        finite_or_zero(rect.height).floor(),
    );

    let mut logical = container.clone();
    let mut preserve_aspect_ratio = false;
    let mut align = 0.5;
    if let Some(ls) = &settings.logical {
        logical.width = ls
            .width
            .filter(|v| v.is_finite())
            .map_or(container.width, |v| v.max(0.0));
        logical.height = ls
            .height
            .filter(|v| v.is_finite())
            .map_or(container.height, |v| v.max(0.0));
        preserve_aspect_ratio = ls.preserve_aspect_ratio;
        align = clamp01(ls.align, 0.5);
    }

    let center = CenterSettings {
        min_width_ratio: clamp01(settings.center.min_width_ratio, 0.5),
        min_height_ratio: clamp01(settings.center.min_height_ratio, 0.5),
        min_width: clamp_non_negative(settings.center.min_width),
        min_height: clamp_non_negative(settings.center.min_height),
    };

    ResolvedSettings {
        container,
        logical,
        origin: (
            finite_or_zero(rect.x).floor(),
            finite_or_zero(rect.y).floor(),
        ),
        preserve_aspect_ratio,
        align,
        center,
        layout_modes: settings.layout_modes.clone(),
    }
}
