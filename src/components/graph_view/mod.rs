//! Directed graph view component.
//!
//! Lays out a directed graph in ranks and draws it as SVG inside a shadow
//! root, with:
//! - Incremental updates: node and edge records are upserted by key
//! - Animated transitions between successive layouts
//! - Pan and zoom of the nested drawing group
//! - Themeable styling through CSS custom properties and the `svg` part
//!
//! # Example
//!
//! ```ignore
//! use graph_view::{EdgeSpec, GraphSpec, GraphViewElement, NodeSpec};
//!
//! let data = GraphSpec::new(
//!     vec![NodeSpec::new("a"), NodeSpec::new("b").with_label("Node B")],
//!     vec![EdgeSpec::new("a", "b")],
//! );
//!
//! view! { <GraphViewElement data=Signal::derive(move || Some(data.clone())) /> }
//! ```

mod component;
/// Error type and result alias.
pub mod error;
/// Layered layout.
pub mod layout;
/// Element identity and readiness.
pub mod lifecycle;
/// Graph model and configuration.
pub mod model;
mod registry;
/// Layout and transition driver.
pub mod render;
/// Drawable primitives.
pub mod scene;
/// Themes and style sheet generation.
pub mod theme;
mod types;
mod view;
/// Pan and zoom.
pub mod zoom;

pub use component::GraphViewElement;
pub use error::{GraphError, Result};
pub use lifecycle::{ElementLifecycle, TAG_NAME, VERSION};
pub use model::{GraphConfig, GraphModel, RankDir};
pub use registry::{ElementFactory, ElementRegistry, register, validate_tag_name};
pub use scene::Scene;
pub use theme::{Theme, Theming};
pub use types::{Arrowhead, EdgeSpec, GraphSpec, NodeSpec, Shape};
pub use view::{GraphView, RenderSurface};
pub use zoom::{ViewTransform, WheelDeltaMode, ZoomConfig};
