use crate::graph::{Node, NodeIndex};

use super::Transform;

/// Host-facing notifications from the viewport. Every method defaults to a no-op.
pub trait GraphObserver {
    fn node_selected(&mut self, _index: NodeIndex, _node: &Node) {}

    fn node_hovered(&mut self, _index: Option<NodeIndex>) {}

    fn background_clicked(&mut self) {}

    fn viewport_changed(&mut self, _transform: Transform) {}
}

impl GraphObserver for () {}

#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
    NodeSelected { index: NodeIndex, id: String },
    NodeHovered(Option<NodeIndex>),
    BackgroundClicked,
    ViewportChanged(Transform),
}

/// Queues events so a host can drain them after input handling.
impl GraphObserver for Vec<GraphEvent> {
    fn node_selected(&mut self, index: NodeIndex, node: &Node) {
        self.push(GraphEvent::NodeSelected {
            index,
            id: node.id.clone(),
        });
    }

    fn node_hovered(&mut self, index: Option<NodeIndex>) {
        self.push(GraphEvent::NodeHovered(index));
    }

    fn background_clicked(&mut self) {
        self.push(GraphEvent::BackgroundClicked);
    }

    fn viewport_changed(&mut self, transform: Transform) {
        self.push(GraphEvent::ViewportChanged(transform));
    }
}
