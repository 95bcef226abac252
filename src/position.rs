use std::collections::BTreeMap;

use crate::{
    component::DockItem,
    config::Dock,
    error::{BerthError, BerthResult},
    geom::{Bounds, EdgeBleed, Margin, Rect, ScaleRatio},
    layout::PassSlot,
    settings::ResolvedSettings,
};

/// Places every surviving component around the final reduced rect, stamps
/// logical-to-physical scaling onto each placed rect and invokes the resize
/// callbacks (zero rects for hidden components).
///
/// Returns the render-order permutation: entry `i` is the position, within the
/// render sequence, of the i-th visible component in original input order.
pub(crate) fn position(
    items: &mut [Box<dyn DockItem>],
    slots: &mut [PassSlot],
    visible: &[usize],
    hidden: &[usize],
    keys: &[Option<String>],
    reduced: &Rect,
    settings: &ResolvedSettings,
) -> BerthResult<Vec<usize>> {
    let sequence = render_sequence(slots, keys, visible)?;
    let (scale, margin) = scale_and_margin(settings);
    let logical = &settings.logical;

    // Key lookup for reference docks, over visible components only; hidden
    // components never contribute to a bounding box.
    let key_to_visible: BTreeMap<&str, usize> = visible
        .iter()
        .filter_map(|&i| keys[i].as_deref().map(|k| (k, i)))
        .collect();

    // Two cursors track consumed space, both seeded at the reduced rect: the
    // vertical one grows as top/bottom components are placed, the horizontal
    // one as left/right components are placed.
    let mut v_rect = reduced.clone();
    let mut h_rect = reduced.clone();

    for &idx in &sequence {
        let size = slots[idx].size;
        let (mut inner, mut outer) = match &slots[idx].cfg.dock {
            Dock::Top => {
                let y = v_rect.y - size;
                let inner = Rect::new(v_rect.x, y, v_rect.width, size);
                let outer = Rect::new(0.0, y, logical.width, size);
                v_rect.y -= size;
                v_rect.height += size;
                (inner, outer)
            }
            Dock::Bottom => {
                let y = v_rect.bottom();
                let inner = Rect::new(v_rect.x, y, v_rect.width, size);
                let outer = Rect::new(0.0, y, logical.width, size);
                v_rect.height += size;
                (inner, outer)
            }
            Dock::Left => {
                let x = h_rect.x - size;
                let inner = Rect::new(x, h_rect.y, size, h_rect.height);
                let outer = Rect::new(x, 0.0, size, logical.height);
                h_rect.x -= size;
                h_rect.width += size;
                (inner, outer)
            }
            Dock::Right => {
                let x = h_rect.right();
                let inner = Rect::new(x, h_rect.y, size, h_rect.height);
                let outer = Rect::new(x, 0.0, size, logical.height);
                h_rect.width += size;
                (inner, outer)
            }
            Dock::Center => (reduced.clone(), reduced.clone()),
            Dock::At(refs) => reference_bounds(refs, &key_to_visible, slots),
        };

        stamp(&mut inner, scale, margin, slots[idx].bleed, settings.origin);
        stamp(&mut outer, scale, margin, slots[idx].bleed, settings.origin);
        slots[idx].inner = Some(inner);
        slots[idx].outer = Some(outer);
    }

    for &idx in &sequence {
        if let (Some(inner), Some(outer)) = (slots[idx].inner.clone(), slots[idx].outer.clone()) {
            items[idx].resize(&inner, &outer);
        }
    }
    let zero = Rect::zero();
    for &idx in hidden {
        items[idx].resize(&zero, &zero);
    }

    let mut position_of = vec![0usize; slots.len()];
    for (pos, &idx) in sequence.iter().enumerate() {
        position_of[idx] = pos;
    }
    Ok(visible.iter().map(|&i| position_of[i]).collect())
}

/// Reference-docked components always come after directional/center components
/// because their geometry depends on the latter. Within each group, ascending
/// `display_order` (stable); reference-to-reference dependencies additionally
/// order the tail topologically. A dependency cycle fails the pass.
fn render_sequence(
    slots: &[PassSlot],
    keys: &[Option<String>],
    visible: &[usize],
) -> BerthResult<Vec<usize>> {
    let mut sequence: Vec<usize> = visible
        .iter()
        .copied()
        .filter(|&i| !slots[i].cfg.dock.is_reference())
        .collect();
    sequence.sort_by(|a, b| {
        slots[*a]
            .cfg
            .display_order
            .total_cmp(&slots[*b].cfg.display_order)
    });

    let mut remaining: Vec<usize> = visible
        .iter()
        .copied()
        .filter(|&i| slots[i].cfg.dock.is_reference())
        .collect();
    remaining.sort_by(|a, b| {
        slots[*a]
            .cfg
            .display_order
            .total_cmp(&slots[*b].cfg.display_order)
    });

    let key_to_reference: BTreeMap<&str, usize> = remaining
        .iter()
        .filter_map(|&i| keys[i].as_deref().map(|k| (k, i)))
        .collect();

    let mut placed: Vec<usize> = Vec::with_capacity(remaining.len());
    while !remaining.is_empty() {
        let next = remaining.iter().position(|&i| {
            slots[i]
                .cfg
                .dock
                .referenced_keys()
                .iter()
                .all(|key| match key_to_reference.get(key.as_str()) {
                    Some(&dep) if dep == i => false,
                    Some(&dep) => placed.contains(&dep),
                    None => true,
                })
        });
        match next {
            Some(pos) => placed.push(remaining.remove(pos)),
            None => {
                let names: Vec<&str> = remaining
                    .iter()
                    .filter_map(|&i| keys[i].as_deref())
                    .collect();
                return Err(BerthError::reference_cycle(format!(
                    "reference-docked components depend on each other: [{}]",
                    names.join(", ")
                )));
            }
        }
    }

    sequence.extend(placed);
    Ok(sequence)
}

/// Bounding boxes (inner and outer) of the already-placed components a
/// reference dock names. Names that do not resolve to a placed component are
/// skipped; an empty union is the zero rect.
fn reference_bounds(
    refs: &[String],
    key_to_visible: &BTreeMap<&str, usize>,
    slots: &[PassSlot],
) -> (Rect, Rect) {
    let mut inner: Option<Rect> = None;
    let mut outer: Option<Rect> = None;
    for key in refs {
        let Some(&idx) = key_to_visible.get(key.as_str()) else {
            continue;
        };
        let (Some(ref_inner), Some(ref_outer)) = (&slots[idx].inner, &slots[idx].outer) else {
            continue;
        };
        inner = Some(match inner {
            Some(acc) => acc.union(ref_inner),
            None => ref_inner.clone(),
        });
        outer = Some(match outer {
            Some(acc) => acc.union(ref_outer),
            None => ref_outer.clone(),
        });
    }
    (
        inner.unwrap_or_else(Rect::zero),
        outer.unwrap_or_else(Rect::zero),
    )
}

/// Physical/logical scale per axis. Preserving the aspect ratio locks both
/// axes to the smaller ratio and converts the leftover physical space on the
/// non-limiting axis into a margin positioned by `align`.
fn scale_and_margin(settings: &ResolvedSettings) -> (ScaleRatio, Margin) {
    let sx = if settings.logical.width > 0.0 {
        settings.container.width / settings.logical.width
    } else {
        1.0
    };
    let sy = if settings.logical.height > 0.0 {
        settings.container.height / settings.logical.height
    } else {
        1.0
    };

    if settings.preserve_aspect_ratio {
        let s = sx.min(sy);
        let margin = Margin {
            left: (settings.container.width - settings.logical.width * s) * settings.align,
            top: (settings.container.height - settings.logical.height * s) * settings.align,
        };
        (ScaleRatio { x: s, y: s }, margin)
    } else {
        (ScaleRatio { x: sx, y: sy }, Margin::default())
    }
}

fn stamp(rect: &mut Rect, scale: ScaleRatio, margin: Margin, bleed: EdgeBleed, origin: (f64, f64)) {
    rect.scale_ratio = scale;
    rect.margin = margin;
    rect.edge_bleed = bleed;
    rect.computed = Bounds {
        x: origin.0 + margin.left + rect.x * scale.x,
        y: origin.1 + margin.top + rect.y * scale.y,
        width: rect.width * scale.x,
        height: rect.height * scale.y,
    };
}
