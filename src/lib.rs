//! Proximity map of a professional network: graph model, degree-of-separation
//! paths, radial and cluster layouts, viewport interaction and a painter-backed
//! renderer, tied together by [`scene::NetworkScene`].

pub mod error;
pub mod graph;
pub mod layout;
pub mod people;
pub mod render;
pub mod scene;
pub mod search;
pub mod util;
pub mod view;

pub use error::DataError;
pub use graph::{Edge, Graph, Node, NodeIndex};
pub use layout::{Layout, LayoutConfig, LayoutMode};
pub use people::{Category, Dataset, PersonRecord, RelationKind, RelationRecord};
pub use scene::{NetworkScene, SceneConfig};
pub use view::{GraphEvent, GraphObserver, ViewportController};
