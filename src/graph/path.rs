use std::collections::VecDeque;

use super::{Graph, NodeIndex};

/// Breadth-first search tree over direct relations.
#[derive(Clone, Debug)]
pub struct BfsTree {
    root: NodeIndex,
    distance: Vec<Option<u32>>,
    parent: Vec<Option<NodeIndex>>,
    order: Vec<NodeIndex>,
}

impl BfsTree {
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn distance(&self, index: NodeIndex) -> Option<u32> {
        self.distance.get(index).copied().flatten()
    }

    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.parent.get(index).copied().flatten()
    }

    /// Reachable nodes in discovery order, root first.
    pub fn order(&self) -> &[NodeIndex] {
        &self.order
    }

    /// Root-to-`target` path, or empty when `target` was never reached.
    pub fn path_to(&self, target: NodeIndex) -> Vec<NodeIndex> {
        if self.distance(target).is_none() {
            return Vec::new();
        }

        let mut path = vec![target];
        let mut cursor = target;
        while let Some(prev) = self.parent(cursor) {
            path.push(prev);
            cursor = prev;
        }
        path.reverse();
        path
    }
}

fn search(graph: &Graph, root: NodeIndex, target: Option<NodeIndex>) -> BfsTree {
    let len = graph.len();
    let mut tree = BfsTree {
        root,
        distance: vec![None; len],
        parent: vec![None; len],
        order: Vec::new(),
    };
    if root >= len {
        return tree;
    }

    let mut queue = VecDeque::from([root]);
    tree.distance[root] = Some(0);
    tree.order.push(root);

    while let Some(node) = queue.pop_front() {
        if Some(node) == target {
            break;
        }

        let next_distance = tree.distance[node].unwrap_or(0) + 1;
        for &next in graph.neighbors(node) {
            if tree.distance[next].is_none() {
                tree.distance[next] = Some(next_distance);
                tree.parent[next] = Some(node);
                tree.order.push(next);
                queue.push_back(next);
            }
        }
    }

    tree
}

/// Full traversal from `root`.
pub fn bfs(graph: &Graph, root: NodeIndex) -> BfsTree {
    search(graph, root, None)
}

/// Fewest-hop path over direct relations, endpoints included.
///
/// Ties resolve toward neighbours inserted first, so the result is stable for
/// a given graph. Unreachable or unknown endpoints give an empty path.
pub fn shortest_path(graph: &Graph, from: NodeIndex, to: NodeIndex) -> Vec<NodeIndex> {
    if to >= graph.len() {
        return Vec::new();
    }
    search(graph, from, Some(to)).path_to(to)
}

/// Intermediaries between `from` and `to`: 1 for a direct neighbour, 0 for
/// the same person, `None` when unreachable.
pub fn degrees_of_separation(graph: &Graph, from: NodeIndex, to: NodeIndex) -> Option<u32> {
    if from == to && from < graph.len() {
        return Some(0);
    }
    let path = shortest_path(graph, from, to);
    (!path.is_empty()).then(|| path.len() as u32 - 1)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::people::{PersonRecord, RelationKind, RelationRecord};

    fn graph(ids: &[&str], pairs: &[(&str, &str)]) -> Graph {
        let people = ids
            .iter()
            .map(|id| PersonRecord::new(*id, *id))
            .collect::<Vec<_>>();
        let relations = pairs
            .iter()
            .map(|(a, b)| RelationRecord::direct(*a, *b))
            .collect::<Vec<_>>();
        Graph::build(&people, &relations).expect("graph builds")
    }

    #[test]
    fn second_degree_path_runs_through_the_bridge() {
        let graph = graph(
            &["ego", "b", "c", "d"],
            &[("ego", "b"), ("ego", "c"), ("b", "d")],
        );

        assert_eq!(graph.shortest_path_ids("ego", "d"), vec!["ego", "b", "d"]);
        assert_eq!(graph.degrees_between("ego", "d"), Some(2));
        assert_eq!(graph.degrees_between("ego", "b"), Some(1));
    }

    #[test]
    fn path_to_self_is_a_single_node() {
        let graph = graph(&["x"], &[]);
        assert_eq!(shortest_path(&graph, 0, 0), vec![0]);
        assert_eq!(degrees_of_separation(&graph, 0, 0), Some(0));
    }

    #[test]
    fn disconnected_people_have_no_path() {
        let graph = graph(&["a", "b", "c"], &[("a", "b")]);
        assert!(shortest_path(&graph, 0, 2).is_empty());
        assert_eq!(degrees_of_separation(&graph, 0, 2), None);
        assert!(shortest_path(&graph, 0, 99).is_empty());
        assert!(graph.shortest_path_ids("a", "ghost").is_empty());
    }

    #[test]
    fn ties_prefer_earlier_neighbours() {
        let graph = graph(
            &["s", "left", "right", "t"],
            &[("s", "right"), ("s", "left"), ("left", "t"), ("right", "t")],
        );
        assert_eq!(graph.shortest_path_ids("s", "t"), vec!["s", "right", "t"]);
    }

    #[test]
    fn derived_relations_do_not_shorten_paths() {
        let people = ["a", "b", "c"]
            .iter()
            .map(|id| PersonRecord::new(*id, *id))
            .collect::<Vec<_>>();
        let relations = vec![
            RelationRecord::direct("a", "b"),
            RelationRecord::direct("b", "c"),
            RelationRecord::new("a", "c", RelationKind::SharedAffiliation),
        ];
        let graph = Graph::build(&people, &relations).expect("graph builds");
        assert_eq!(graph.degrees_between("a", "c"), Some(2));
    }

    #[test]
    fn bfs_records_discovery_order() {
        let graph = graph(
            &["root", "a", "b", "c"],
            &[("root", "b"), ("root", "a"), ("a", "c")],
        );
        let tree = bfs(&graph, 0);
        assert_eq!(tree.order(), &[0, 2, 1, 3]);
        assert_eq!(tree.distance(3), Some(2));
        assert_eq!(tree.path_to(3), vec![0, 1, 3]);
    }

    fn random_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
        (1usize..16).prop_flat_map(|n| {
            (
                Just(n),
                prop::collection::vec((0..n, 0..n), 0..32),
            )
        })
    }

    proptest! {
        #[test]
        fn degree_is_path_length_minus_one((n, pairs) in random_graph()) {
            let people = (0..n)
                .map(|i| PersonRecord::new(format!("p{i}"), format!("Person {i}")))
                .collect::<Vec<_>>();
            let relations = pairs
                .iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| RelationRecord::direct(format!("p{a}"), format!("p{b}")))
                .collect::<Vec<_>>();
            let graph = Graph::build(&people, &relations).expect("graph builds");

            for to in 0..n {
                let path = shortest_path(&graph, 0, to);
                match degrees_of_separation(&graph, 0, to) {
                    Some(degree) => {
                        prop_assert_eq!(path.len() as u32, degree + 1);
                        prop_assert_eq!(path.first().copied(), Some(0));
                        prop_assert_eq!(path.last().copied(), Some(to));
                        for step in path.windows(2) {
                            prop_assert!(graph.neighbors(step[0]).contains(&step[1]));
                        }
                    }
                    None => prop_assert!(path.is_empty()),
                }
            }
        }
    }
}
