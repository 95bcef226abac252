use std::fmt;
use std::sync::Arc;

use crate::geom::finite_or_zero;

/// Shared callback context handed to computed configuration fields, re-evaluated
/// once per layout pass. The payload is caller-defined.
#[derive(Clone, Debug, Default)]
pub struct BindContext {
    pub data: serde_json::Value,
}

impl BindContext {
    pub fn new(data: serde_json::Value) -> Self {
        Self { data }
    }
}

/// A configuration field that is either a constant or a function of the shared
/// [`BindContext`]. This is the mechanism for data-driven/responsive
/// configuration: computed fields are resolved fresh every layout pass.
pub enum Binding<T> {
    Value(T),
    Computed(Arc<dyn Fn(&BindContext) -> T + Send + Sync>),
}

impl<T: Clone> Binding<T> {
    pub fn value(v: T) -> Self {
        Self::Value(v)
    }

    pub fn computed(f: impl Fn(&BindContext) -> T + Send + Sync + 'static) -> Self {
        Self::Computed(Arc::new(f))
    }

    pub fn resolve(&self, ctx: &BindContext) -> T {
        match self {
            Self::Value(v) => v.clone(),
            Self::Computed(f) => f(ctx),
        }
    }
}

impl<T: Clone> Clone for Binding<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Value(v) => Self::Value(v.clone()),
            Self::Computed(f) => Self::Computed(Arc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<T> From<T> for Binding<T> {
    fn from(v: T) -> Self {
        Self::Value(v)
    }
}

impl From<&str> for Binding<Dock> {
    fn from(raw: &str) -> Self {
        Self::Value(Dock::parse(raw))
    }
}

impl From<MinimumLayoutMode> for Binding<Option<MinimumLayoutMode>> {
    fn from(mode: MinimumLayoutMode) -> Self {
        Self::Value(Some(mode))
    }
}

/// The edge or area a component is anchored to. `At` positions the component at
/// the bounding box of the named components instead of a fixed side.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Dock {
    Left,
    Right,
    Top,
    Bottom,
    #[default]
    Center,
    At(Vec<String>),
}

impl Dock {
    /// Parses a dock string. Empty and unrecognized values normalize to
    /// `center`; `@a,@b` becomes a reference dock on keys `a` and `b`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with('@') {
            let keys: Vec<String> = raw
                .split(',')
                .map(|part| part.trim().trim_start_matches('@').to_string())
                .filter(|key| !key.is_empty())
                .collect();
            if keys.is_empty() {
                return Self::Center;
            }
            return Self::At(keys);
        }
        match raw {
            "left" => Self::Left,
            "right" => Self::Right,
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            _ => Self::Center,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::At(_))
    }

    pub fn referenced_keys(&self) -> &[String] {
        match self {
            Self::At(keys) => keys,
            _ => &[],
        }
    }
}

impl From<&str> for Dock {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// A named minimum logical size threshold. The single-name form constrains both
/// dimensions against one mode; the per-axis form constrains each dimension
/// against its own named mode independently.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum MinimumLayoutMode {
    Single(String),
    PerAxis {
        width: Option<String>,
        height: Option<String>,
    },
}

/// Per-component declarative layout state. Setters chain; every field accepts a
/// constant or a computed [`Binding`].
#[derive(Clone, Debug)]
pub struct DockConfig {
    dock: Binding<Dock>,
    display_order: Binding<f64>,
    prio_order: Binding<f64>,
    minimum_layout_mode: Binding<Option<MinimumLayoutMode>>,
    show: Binding<bool>,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            dock: Binding::Value(Dock::Center),
            display_order: Binding::Value(0.0),
            prio_order: Binding::Value(0.0),
            minimum_layout_mode: Binding::Value(None),
            show: Binding::Value(true),
        }
    }
}

impl DockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dock(mut self, dock: impl Into<Binding<Dock>>) -> Self {
        self.dock = dock.into();
        self
    }

    /// Paint/positioning order among visible components; lower draws first.
    pub fn display_order(mut self, order: impl Into<Binding<f64>>) -> Self {
        self.display_order = order.into();
        self
    }

    /// Space-allocation order during reduction; lower wins contested space.
    pub fn prio_order(mut self, order: impl Into<Binding<f64>>) -> Self {
        self.prio_order = order.into();
        self
    }

    pub fn minimum_layout_mode(
        mut self,
        mode: impl Into<Binding<Option<MinimumLayoutMode>>>,
    ) -> Self {
        self.minimum_layout_mode = mode.into();
        self
    }

    pub fn show(mut self, show: impl Into<Binding<bool>>) -> Self {
        self.show = show.into();
        self
    }

    /// Evaluates every field against `ctx`. Non-finite order values normalize
    /// to zero.
    pub fn resolve(&self, ctx: &BindContext) -> ResolvedConfig {
        ResolvedConfig {
            dock: self.dock.resolve(ctx),
            display_order: finite_or_zero(self.display_order.resolve(ctx)),
            prio_order: finite_or_zero(self.prio_order.resolve(ctx)),
            minimum_layout_mode: self.minimum_layout_mode.resolve(ctx),
            show: self.show.resolve(ctx),
        }
    }
}

/// A [`DockConfig`] with all bindings evaluated for one pass.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
    pub dock: Dock,
    pub display_order: f64,
    pub prio_order: f64,
    pub minimum_layout_mode: Option<MinimumLayoutMode>,
    pub show: bool,
}
