use crate::{
    component::DockItem,
    config::{BindContext, ResolvedConfig},
    error::{BerthError, BerthResult},
    geom::{EdgeBleed, Rect},
    position, reduce, settings,
    settings::LayoutSettings,
    visibility,
};

/// Per-component, pass-scoped state. Created fresh each pass and discarded;
/// components stay plain data between passes.
pub(crate) struct PassSlot {
    pub(crate) cfg: ResolvedConfig,
    /// Relevant scalar of the component's size hint, cached by the reduction
    /// engine (ceiling applied).
    pub(crate) size: f64,
    pub(crate) bleed: EdgeBleed,
    pub(crate) inner: Option<Rect>,
    pub(crate) outer: Option<Rect>,
}

impl PassSlot {
    pub(crate) fn new(cfg: ResolvedConfig) -> Self {
        Self {
            cfg,
            size: 0.0,
            bleed: EdgeBleed::default(),
            inner: None,
            outer: None,
        }
    }
}

/// Summary of one layout pass. All three vectors hold indices into the
/// caller's component slice.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct LayoutResult {
    /// Components that were granted space, in original relative order.
    pub visible: Vec<usize>,
    /// Components hidden by the visibility filter or evicted during reduction.
    pub hidden: Vec<usize>,
    /// `order[i]` is the render-order position of the i-th visible component;
    /// callers use it for z-ordering/paint order.
    pub order: Vec<usize>,
}

/// The docking layout facade.
///
/// Holds the caller's settings between passes; everything else is recomputed
/// from scratch on every [`layout`](DockLayout::layout) call. A pass is
/// synchronous and must be treated as atomic: the component list and settings
/// may not change while it is in flight.
#[derive(Clone, Debug, Default)]
pub struct DockLayout {
    settings: LayoutSettings,
}

impl DockLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: LayoutSettings) -> Self {
        Self { settings }
    }

    /// Replaces the settings used by subsequent passes.
    pub fn set_settings(&mut self, settings: LayoutSettings) {
        self.settings = settings;
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    /// Runs a layout pass with an empty callback context.
    pub fn layout(
        &self,
        rect: &Rect,
        items: &mut [Box<dyn DockItem>],
    ) -> BerthResult<LayoutResult> {
        self.layout_with_context(rect, items, &BindContext::default())
    }

    /// Runs a layout pass, resolving computed configuration fields against
    /// `ctx`. The only side effect is the resize callback invoked on every
    /// component (zero rects for hidden ones).
    #[tracing::instrument(skip_all, fields(components = items.len()))]
    pub fn layout_with_context(
        &self,
        rect: &Rect,
        items: &mut [Box<dyn DockItem>],
        ctx: &BindContext,
    ) -> BerthResult<LayoutResult> {
        if !(rect.x.is_finite()
            && rect.y.is_finite()
            && rect.width.is_finite()
            && rect.height.is_finite())
        {
            return Err(BerthError::invalid_rect(format!(
                "container rect has a non-finite dimension: \
                 x={} y={} width={} height={}",
                rect.x, rect.y, rect.width, rect.height
            )));
        }

        let resolved = settings::resolve(&self.settings, rect);

        let mut slots: Vec<PassSlot> = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let config = item.layout_config().ok_or_else(|| {
                BerthError::invalid_component(format!(
                    "component {i} has no layout configuration"
                ))
            })?;
            slots.push(PassSlot::new(config.resolve(ctx)));
        }
        let keys: Vec<Option<String>> =
            items.iter().map(|c| c.key().map(str::to_string)).collect();

        let mut candidates: Vec<usize> = Vec::with_capacity(items.len());
        let mut hidden: Vec<usize> = Vec::new();
        for i in 0..items.len() {
            if visibility::is_visible(&slots[i].cfg, &resolved.layout_modes, &resolved.logical) {
                candidates.push(i);
            } else {
                hidden.push(i);
            }
        }

        let reduction = reduce::reduce(items, &mut slots, &candidates, &hidden, &keys, &resolved);
        hidden.extend(reduction.evicted);
        hidden.sort_unstable();

        let order = position::position(
            items,
            &mut slots,
            &reduction.survivors,
            &hidden,
            &keys,
            &reduction.rect,
            &resolved,
        )?;

        tracing::debug!(
            visible = reduction.survivors.len(),
            hidden = hidden.len(),
            "layout pass complete"
        );

        Ok(LayoutResult {
            visible: reduction.survivors,
            hidden,
            order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{SizeHint, SizeRequest};
    use crate::config::DockConfig;

    struct Plain {
        config: Option<DockConfig>,
        size: f64,
    }

    impl DockItem for Plain {
        fn layout_config(&self) -> Option<&DockConfig> {
            self.config.as_ref()
        }

        fn preferred_size(&mut self, _request: &SizeRequest) -> SizeHint {
            SizeHint::splat(self.size)
        }

        fn resize(&mut self, _inner: &Rect, _outer: &Rect) {}
    }

    fn plain(dock: &str, size: f64) -> Box<dyn DockItem> {
        Box::new(Plain {
            config: Some(DockConfig::new().dock(dock)),
            size,
        })
    }

    #[test]
    fn empty_component_list_is_ok() {
        let result = DockLayout::new()
            .layout(&Rect::new(0.0, 0.0, 100.0, 100.0), &mut [])
            .unwrap();
        assert_eq!(result, LayoutResult::default());
    }

    #[test]
    fn non_finite_container_rect_is_rejected() {
        let rect = Rect {
            x: 0.0,
            y: 0.0,
            width: f64::NAN,
            height: 100.0,
            ..Rect::default()
        };
        let err = DockLayout::new().layout(&rect, &mut []).unwrap_err();
        assert!(matches!(err, BerthError::InvalidRect(_)));
    }

    #[test]
    fn component_without_configuration_is_rejected() {
        let mut items: Vec<Box<dyn DockItem>> = vec![Box::new(Plain {
            config: None,
            size: 10.0,
        })];
        let err = DockLayout::new()
            .layout(&Rect::new(0.0, 0.0, 100.0, 100.0), &mut items)
            .unwrap_err();
        assert!(matches!(err, BerthError::InvalidComponent(_)));
    }

    #[test]
    fn order_maps_original_position_to_render_position() {
        let mut items: Vec<Box<dyn DockItem>> = vec![
            Box::new(Plain {
                config: Some(DockConfig::new().dock("left").display_order(2.0)),
                size: 10.0,
            }),
            Box::new(Plain {
                config: Some(DockConfig::new().dock("right").display_order(1.0)),
                size: 10.0,
            }),
            Box::new(Plain {
                config: Some(DockConfig::new().dock("top").display_order(0.0)),
                size: 10.0,
            }),
        ];
        let result = DockLayout::new()
            .layout(&Rect::new(0.0, 0.0, 1000.0, 1000.0), &mut items)
            .unwrap();
        assert_eq!(result.visible, vec![0, 1, 2]);
        // Render sequence is [2, 1, 0], so original index 0 renders last.
        assert_eq!(result.order, vec![2, 1, 0]);
    }

    #[test]
    fn settings_can_be_replaced_between_passes() {
        let mut engine = DockLayout::new();
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut items = vec![plain("left", 40.0)];
        assert_eq!(engine.layout(&rect, &mut items).unwrap().visible, vec![0]);

        engine.set_settings(LayoutSettings {
            center: crate::settings::CenterSettings {
                min_width_ratio: 1.0,
                ..Default::default()
            },
            ..LayoutSettings::default()
        });
        assert_eq!(engine.layout(&rect, &mut items).unwrap().hidden, vec![0]);
    }
}
