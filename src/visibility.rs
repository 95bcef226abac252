use std::collections::BTreeMap;

use crate::{
    config::{MinimumLayoutMode, ResolvedConfig},
    geom::Rect,
    settings::LayoutModeSize,
};

/// Whether the logical container satisfies a component's named minimum layout
/// mode(s). A mode name that does not exist in the settings fails the check.
pub(crate) fn satisfies_layout_mode(
    mode: Option<&MinimumLayoutMode>,
    modes: &BTreeMap<String, LayoutModeSize>,
    logical: &Rect,
) -> bool {
    let Some(mode) = mode else {
        return true;
    };
    match mode {
        MinimumLayoutMode::Single(name) => modes
            .get(name)
            .is_some_and(|m| logical.width >= m.width && logical.height >= m.height),
        MinimumLayoutMode::PerAxis { width, height } => {
            let width_ok = width.as_ref().is_none_or(|name| {
                modes.get(name).is_some_and(|m| logical.width >= m.width)
            });
            let height_ok = height.as_ref().is_none_or(|name| {
                modes.get(name).is_some_and(|m| logical.height >= m.height)
            });
            width_ok && height_ok
        }
    }
}

/// Whether a component participates in this layout pass at all. Components
/// failing this check go straight to `hidden`, before size reduction.
pub(crate) fn is_visible(
    cfg: &ResolvedConfig,
    modes: &BTreeMap<String, LayoutModeSize>,
    logical: &Rect,
) -> bool {
    cfg.show && satisfies_layout_mode(cfg.minimum_layout_mode.as_ref(), modes, logical)
}
