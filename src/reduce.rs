use std::collections::BTreeSet;

use crate::{
    component::{DockItem, SizeRequest},
    config::Dock,
    geom::{EdgeBleed, Rect},
    layout::PassSlot,
    settings::{CenterSettings, ResolvedSettings},
};

/// Outcome of the reduction phase.
pub(crate) struct Reduction {
    /// The maximal center rect remaining after all granted allocations.
    pub rect: Rect,
    /// Candidates that fit, in their original relative order.
    pub survivors: Vec<usize>,
    /// Candidates evicted for violating the center minimum, plus components
    /// whose referenced docks all ended up hidden.
    pub evicted: Vec<usize>,
}

/// Iteratively shrinks a working center rect by the measured size of each
/// docked candidate, in priority order (lower `prio_order` is granted space
/// first), evicting candidates that would violate the center's minimum-size
/// contract.
///
/// Each step is tentative-then-commit: an evicted candidate has zero effect on
/// the working rect and the edge-bleed envelope seen by later candidates.
pub(crate) fn reduce(
    items: &mut [Box<dyn DockItem>],
    slots: &mut [PassSlot],
    candidates: &[usize],
    pre_hidden: &[usize],
    keys: &[Option<String>],
    settings: &ResolvedSettings,
) -> Reduction {
    let logical = &settings.logical;

    let mut ordered: Vec<usize> = candidates.to_vec();
    ordered.sort_by(|a, b| slots[*a].cfg.prio_order.total_cmp(&slots[*b].cfg.prio_order));

    let mut rect = Rect::new(0.0, 0.0, logical.width, logical.height);
    let mut bleed = EdgeBleed::default();
    let mut kept: Vec<usize> = Vec::new();
    let mut evicted: Vec<usize> = Vec::new();

    for &idx in &ordered {
        // Measured once per pass, against the current working rect, so later
        // candidates see a smaller inner area.
        let hint = items[idx].preferred_size(&SizeRequest {
            inner: rect.clone(),
            outer: logical.clone(),
            dock: slots[idx].cfg.dock.clone(),
        });
        let size = hint.relevant(&slots[idx].cfg.dock);
        slots[idx].size = size;
        slots[idx].bleed = hint.edge_bleed.sanitized();

        let mut tentative = rect.clone();
        shrink(&mut tentative, &slots[idx].cfg.dock, size);
        let mut tentative_bleed = bleed;
        tentative_bleed.expand(&slots[idx].bleed);
        clamp_to_bleed(logical, &mut tentative, &tentative_bleed);

        if fits(logical, &tentative, &settings.center) {
            tracing::debug!(
                index = idx,
                size,
                dock = ?slots[idx].cfg.dock,
                width = tentative.width,
                height = tentative.height,
                "granted dock space"
            );
            rect = tentative;
            bleed = tentative_bleed;
            kept.push(idx);
        } else {
            tracing::warn!(
                index = idx,
                key = keys[idx].as_deref(),
                size,
                "center minimum violated, hiding component"
            );
            evicted.push(idx);
        }
    }

    // Eviction propagation: a component whose referenced docks are all hidden
    // is itself hidden. Evaluated against the hidden set as finalized above, in
    // a single pass.
    let hidden_keys: BTreeSet<&str> = pre_hidden
        .iter()
        .chain(evicted.iter())
        .filter_map(|&i| keys[i].as_deref())
        .collect();
    let mut survivors: Vec<usize> = Vec::with_capacity(kept.len());
    for &idx in &kept {
        let refs = slots[idx].cfg.dock.referenced_keys();
        let orphaned = !refs.is_empty()
            && refs.iter().all(|key| hidden_keys.contains(key.as_str()));
        if orphaned {
            tracing::warn!(
                index = idx,
                key = keys[idx].as_deref(),
                "all referenced docks hidden, hiding component"
            );
            evicted.push(idx);
        } else {
            survivors.push(idx);
        }
    }

    // Back to original relative input order.
    survivors.sort_unstable();

    Reduction {
        rect,
        survivors,
        evicted,
    }
}

fn shrink(rect: &mut Rect, dock: &Dock, size: f64) {
    match dock {
        Dock::Top => {
            rect.y += size;
            rect.height -= size;
        }
        Dock::Bottom => rect.height -= size,
        Dock::Left => {
            rect.x += size;
            rect.width -= size;
        }
        Dock::Right => rect.width -= size,
        Dock::Center | Dock::At(_) => {}
    }
}

/// Clips the working rect so it never extends past the logical rect's bleed
/// envelope. Bleed overlapping space already consumed by a same-side dock
/// costs nothing; bleed encroaching on the opposite side reduces the rect.
fn clamp_to_bleed(logical: &Rect, rect: &mut Rect, bleed: &EdgeBleed) {
    if rect.x < bleed.left {
        rect.width -= bleed.left - rect.x;
        rect.x = bleed.left;
    }
    let right_boundary = logical.width - bleed.right;
    if rect.x + rect.width > right_boundary {
        rect.width -= rect.x + rect.width - right_boundary;
    }
    if rect.y < bleed.top {
        rect.height -= bleed.top - rect.y;
        rect.y = bleed.top;
    }
    let bottom_boundary = logical.height - bleed.bottom;
    if rect.y + rect.height > bottom_boundary {
        rect.height -= rect.y + rect.height - bottom_boundary;
    }
}

fn fits(logical: &Rect, rect: &Rect, center: &CenterSettings) -> bool {
    let min_width = f64::max(
        center.min_width.min(logical.width),
        logical.width * center.min_width_ratio,
    );
    let min_height = f64::max(
        center.min_height.min(logical.height),
        logical.height * center.min_height_ratio,
    );
    rect.width >= min_width && rect.height >= min_height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        component::{DockItem, SizeHint, SizeRequest},
        config::{BindContext, DockConfig},
        settings::{CenterSettings, LayoutSettings, resolve},
    };

    struct Fixed {
        config: DockConfig,
        hint: SizeHint,
    }

    impl Fixed {
        fn boxed(dock: &str, size: f64) -> Box<dyn DockItem> {
            Box::new(Self {
                config: DockConfig::new().dock(dock),
                hint: SizeHint::splat(size),
            })
        }
    }

    impl DockItem for Fixed {
        fn layout_config(&self) -> Option<&DockConfig> {
            Some(&self.config)
        }

        fn preferred_size(&mut self, _request: &SizeRequest) -> SizeHint {
            self.hint.clone()
        }

        fn resize(&mut self, _inner: &Rect, _outer: &Rect) {}
    }

    fn run(
        items: &mut [Box<dyn DockItem>],
        center: CenterSettings,
        side: f64,
    ) -> (Reduction, Vec<PassSlot>) {
        let settings = resolve(
            &LayoutSettings {
                center,
                ..LayoutSettings::default()
            },
            &Rect::new(0.0, 0.0, side, side),
        );
        let ctx = BindContext::default();
        let mut slots: Vec<PassSlot> = items
            .iter()
            .map(|c| {
                PassSlot::new(
                    c.layout_config()
                        .map(|cfg| cfg.resolve(&ctx))
                        .unwrap_or_else(|| DockConfig::new().resolve(&ctx)),
                )
            })
            .collect();
        let candidates: Vec<usize> = (0..items.len()).collect();
        let keys: Vec<Option<String>> = vec![None; items.len()];
        let reduction = reduce(items, &mut slots, &candidates, &[], &keys, &settings);
        (reduction, slots)
    }

    fn loose_center() -> CenterSettings {
        CenterSettings {
            min_width_ratio: 0.0,
            min_height_ratio: 0.0,
            ..CenterSettings::default()
        }
    }

    #[test]
    fn shrinks_per_dock_side() {
        let mut items = vec![
            Fixed::boxed("left", 50.0),
            Fixed::boxed("right", 100.0),
            Fixed::boxed("top", 150.0),
            Fixed::boxed("bottom", 200.0),
        ];
        let (reduction, _) = run(&mut items, loose_center(), 1000.0);
        assert_eq!(reduction.rect, Rect::new(50.0, 150.0, 850.0, 650.0));
        assert_eq!(reduction.survivors, vec![0, 1, 2, 3]);
        assert!(reduction.evicted.is_empty());
    }

    #[test]
    fn lower_prio_order_wins_contested_space() {
        let mut items: Vec<Box<dyn DockItem>> = vec![
            Box::new(Fixed {
                config: DockConfig::new().dock("left").prio_order(2.0),
                hint: SizeHint::splat(30.0),
            }),
            Box::new(Fixed {
                config: DockConfig::new().dock("left").prio_order(1.0),
                hint: SizeHint::splat(30.0),
            }),
        ];
        let center = CenterSettings {
            min_width_ratio: 0.5,
            min_height_ratio: 0.0,
            ..CenterSettings::default()
        };
        // 100 wide, min 50: only one 30-wide dock fits, and prio 1 gets it.
        let (reduction, _) = run(&mut items, center, 100.0);
        assert_eq!(reduction.survivors, vec![1]);
        assert_eq!(reduction.evicted, vec![0]);
        assert_eq!(reduction.rect.width, 70.0);
    }

    #[test]
    fn evicted_component_has_zero_effect_on_later_sizing() {
        let mut items = vec![Fixed::boxed("left", 60.0), Fixed::boxed("left", 5.0)];
        let center = CenterSettings {
            min_width_ratio: 0.9,
            min_height_ratio: 0.0,
            ..CenterSettings::default()
        };
        let (reduction, _) = run(&mut items, center, 100.0);
        // The 60-wide dock is evicted; the 5-wide dock reduces the pristine rect.
        assert_eq!(reduction.survivors, vec![1]);
        assert_eq!(reduction.rect, Rect::new(5.0, 0.0, 95.0, 100.0));
    }

    #[test]
    fn each_candidate_is_measured_exactly_once() {
        use std::cell::Cell;
        use std::rc::Rc;

        struct Counting {
            config: DockConfig,
            counter: Rc<Cell<usize>>,
        }

        impl DockItem for Counting {
            fn layout_config(&self) -> Option<&DockConfig> {
                Some(&self.config)
            }

            fn preferred_size(&mut self, _request: &SizeRequest) -> SizeHint {
                self.counter.set(self.counter.get() + 1);
                SizeHint::splat(10.0)
            }

            fn resize(&mut self, _inner: &Rect, _outer: &Rect) {}
        }

        let counter = Rc::new(Cell::new(0));
        let mut items: Vec<Box<dyn DockItem>> = vec![
            Box::new(Counting {
                config: DockConfig::new().dock("left"),
                counter: Rc::clone(&counter),
            }),
            Box::new(Counting {
                config: DockConfig::new().dock("right"),
                counter: Rc::clone(&counter),
            }),
        ];
        let _ = run(&mut items, loose_center(), 100.0);
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn bleed_exceeding_opposite_space_evicts() {
        let mut items: Vec<Box<dyn DockItem>> = vec![Box::new(Fixed {
            config: DockConfig::new().dock("left"),
            hint: SizeHint::splat(10.0).with_edge_bleed(EdgeBleed {
                right: 95.0,
                ..EdgeBleed::default()
            }),
        })];
        let center = CenterSettings {
            min_width_ratio: 0.5,
            min_height_ratio: 0.0,
            ..CenterSettings::default()
        };
        let (reduction, _) = run(&mut items, center, 100.0);
        assert_eq!(reduction.evicted, vec![0]);
        assert_eq!(reduction.rect.width, 100.0);
    }

    #[test]
    fn bleed_into_same_side_dock_space_is_free() {
        let mut items: Vec<Box<dyn DockItem>> = vec![
            Fixed::boxed("left", 30.0),
            Box::new(Fixed {
                config: DockConfig::new().dock("bottom"),
                hint: SizeHint::splat(10.0).with_edge_bleed(EdgeBleed {
                    left: 25.0,
                    ..EdgeBleed::default()
                }),
            }),
        ];
        let center = CenterSettings {
            min_width_ratio: 0.7,
            min_height_ratio: 0.0,
            ..CenterSettings::default()
        };
        // Left dock moves x to 30; bleed.left 25 is already covered, so the
        // bottom dock costs only its own height.
        let (reduction, _) = run(&mut items, center, 100.0);
        assert_eq!(reduction.survivors, vec![0, 1]);
        assert_eq!(reduction.rect, Rect::new(30.0, 0.0, 70.0, 90.0));
    }

    #[test]
    fn reference_component_hidden_when_all_referenced_hidden() {
        let settings = resolve(
            &LayoutSettings {
                center: CenterSettings {
                    min_width_ratio: 1.0,
                    min_height_ratio: 0.0,
                    ..CenterSettings::default()
                },
                ..LayoutSettings::default()
            },
            &Rect::new(0.0, 0.0, 100.0, 100.0),
        );
        let mut items: Vec<Box<dyn DockItem>> = vec![
            Fixed::boxed("left", 20.0),
            Fixed::boxed("@a", 10.0),
        ];
        let ctx = BindContext::default();
        let mut slots: Vec<PassSlot> = items
            .iter()
            .map(|c| PassSlot::new(c.layout_config().map(|cfg| cfg.resolve(&ctx)).unwrap()))
            .collect();
        let keys = vec![Some("a".to_string()), None];
        let reduction = reduce(&mut items, &mut slots, &[0, 1], &[], &keys, &settings);
        // "a" cannot fit (full-width center), so the component docked at it
        // follows it into hiding even though it fits on its own.
        assert_eq!(reduction.survivors, Vec::<usize>::new());
        assert_eq!(reduction.evicted, vec![0, 1]);
    }
}
