#![forbid(unsafe_code)]

//! `berth` lays out rectangular, independently-sized regions ("components")
//! around a central content area inside a container rectangle.
//!
//! The pipeline is explicitly staged:
//!
//! 1. Resolve settings into a physical container rect and a logical layout rect
//! 2. Filter components by visibility ([`config::DockConfig`] show flag and
//!    minimum layout modes)
//! 3. Reduce the working center rect by each docked component, in priority
//!    order, evicting components that would violate the center's minimum-size
//!    contract
//! 4. Position the survivors, resolve reference docks, apply logical-to-physical
//!    scaling, and invoke each component's resize callback
//!
//! The facade is [`DockLayout`]; components implement [`DockItem`].

pub mod component;
pub mod config;
pub mod error;
pub mod geom;
pub mod layout;
pub mod settings;

mod position;
mod reduce;
mod visibility;

pub use component::{DockItem, SizeHint, SizeRequest};
pub use config::{BindContext, Binding, Dock, DockConfig, MinimumLayoutMode, ResolvedConfig};
pub use error::{BerthError, BerthResult};
pub use geom::{Bounds, EdgeBleed, Margin, Rect, ScaleRatio};
pub use layout::{DockLayout, LayoutResult};
pub use settings::{CenterSettings, LayoutModeSize, LayoutSettings, LogicalSizeSettings};
