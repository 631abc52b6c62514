use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::error::DataError;
use crate::people::{Category, PersonRecord, RelationKind, RelationRecord};

pub mod path;

pub use path::{BfsTree, bfs, degrees_of_separation, shortest_path};

pub type NodeIndex = usize;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub company: String,
    pub role: String,
    pub photo_ref: Option<String>,
    pub keywords: Vec<String>,
    pub category: Category,
    /// Hops from the viewing ego; `None` until annotated or when unreachable.
    pub degree: Option<u32>,
    /// Size of the direct adjacency list in the full graph.
    pub connection_count: usize,
    /// Number of colleagues sharing this person's affiliation.
    pub hub_score: usize,
    /// Affiliation colleagues span at least two categories.
    pub is_hub: bool,
}

impl Node {
    fn from_record(record: &PersonRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.trim().to_owned(),
            company: record.company.trim().to_owned(),
            role: record.role.trim().to_owned(),
            photo_ref: record.photo_ref.clone().filter(|photo| !photo.is_empty()),
            keywords: record.keywords.clone(),
            category: Category::resolve(record),
            degree: None,
            connection_count: 0,
            hub_score: 0,
            is_hub: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub a: NodeIndex,
    pub b: NodeIndex,
    pub kind: RelationKind,
    /// Strongest weight seen for this pair and kind. Layout ignores it;
    /// it is carried for hosts that want to style or filter by strength.
    pub weight: f32,
}

impl Edge {
    pub fn touches(&self, index: NodeIndex) -> bool {
        self.a == index || self.b == index
    }

    pub fn other(&self, index: NodeIndex) -> Option<NodeIndex> {
        if self.a == index {
            Some(self.b)
        } else if self.b == index {
            Some(self.a)
        } else {
            None
        }
    }

    fn pair(&self) -> (NodeIndex, NodeIndex) {
        (self.a.min(self.b), self.a.max(self.b))
    }
}

/// Adjacency-list view of people and their relationships.
///
/// Rebuilt from scratch whenever the upstream lists change; never patched.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index_by_id: HashMap<String, NodeIndex>,
    /// Direct neighbours only, in edge insertion order.
    adjacency: Vec<Vec<NodeIndex>>,
    incident: Vec<Vec<usize>>,
    ego: Option<NodeIndex>,
}

impl Graph {
    pub fn build(people: &[PersonRecord], relations: &[RelationRecord]) -> Result<Self, DataError> {
        let mut index_by_id = HashMap::with_capacity(people.len());
        let mut nodes = Vec::with_capacity(people.len());

        for (position, record) in people.iter().enumerate() {
            if record.id.trim().is_empty() {
                return Err(DataError::MissingField {
                    position,
                    field: "id",
                });
            }
            if record.name.trim().is_empty() {
                return Err(DataError::MissingField {
                    position,
                    field: "name",
                });
            }
            if index_by_id.insert(record.id.clone(), nodes.len()).is_some() {
                return Err(DataError::DuplicatePerson {
                    id: record.id.clone(),
                });
            }
            nodes.push(Node::from_record(record));
        }

        let mut edges: Vec<Edge> = Vec::with_capacity(relations.len());
        let mut edges_by_pair: HashMap<(NodeIndex, NodeIndex), Vec<usize>> = HashMap::new();

        for relation in relations {
            let lookup = |id: &str| {
                index_by_id
                    .get(id)
                    .copied()
                    .ok_or_else(|| DataError::UnknownPerson { id: id.to_owned() })
            };
            let a = lookup(&relation.person_id_a)?;
            let b = lookup(&relation.person_id_b)?;
            if a == b {
                return Err(DataError::SelfRelation {
                    id: relation.person_id_a.clone(),
                });
            }

            let kind = relation.kind;
            let weight = relation.effective_weight();
            let pair = (a.min(b), a.max(b));
            let existing = edges_by_pair.entry(pair).or_default();

            if let Some(&same_kind) = existing.iter().find(|&&edge| edges[edge].kind == kind) {
                let edge = &mut edges[same_kind];
                edge.weight = edge.weight.max(weight);
                continue;
            }

            if kind.is_weak()
                && existing
                    .iter()
                    .any(|&edge| edges[edge].kind.strength() > kind.strength())
            {
                trace!(a = %relation.person_id_a, b = %relation.person_id_b, "weak relation shadowed");
                continue;
            }

            if !kind.is_weak()
                && let Some(&weaker) = existing.iter().find(|&&edge| {
                    edges[edge].kind.is_weak() && edges[edge].kind.strength() < kind.strength()
                })
            {
                let edge = &mut edges[weaker];
                edge.kind = kind;
                edge.weight = weight;
                continue;
            }

            existing.push(edges.len());
            edges.push(Edge { a, b, kind, weight });
        }

        let graph = Self::assemble(nodes, edges, None, true);
        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "built social graph"
        );
        Ok(graph)
    }

    fn assemble(
        mut nodes: Vec<Node>,
        edges: Vec<Edge>,
        ego: Option<NodeIndex>,
        derive_counts: bool,
    ) -> Self {
        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            index_by_id.insert(node.id.clone(), index);
        }

        let mut adjacency = vec![Vec::new(); nodes.len()];
        let mut incident = vec![Vec::new(); nodes.len()];
        for (edge_index, edge) in edges.iter().enumerate() {
            incident[edge.a].push(edge_index);
            incident[edge.b].push(edge_index);
            if edge.kind == RelationKind::Direct {
                adjacency[edge.a].push(edge.b);
                adjacency[edge.b].push(edge.a);
            }
        }

        if derive_counts {
            for (index, node) in nodes.iter_mut().enumerate() {
                node.connection_count = adjacency[index].len();
            }

            let categories = nodes.iter().map(|node| node.category).collect::<Vec<_>>();
            for (index, node) in nodes.iter_mut().enumerate() {
                let colleagues = incident[index]
                    .iter()
                    .map(|&edge_index| edges[edge_index])
                    .filter(|edge| edge.kind == RelationKind::SharedAffiliation)
                    .filter_map(|edge| edge.other(index))
                    .collect::<Vec<_>>();

                let mut spanned = colleagues
                    .iter()
                    .map(|&colleague| categories[colleague])
                    .collect::<HashSet<_>>();
                spanned.insert(categories[index]);

                node.hub_score = colleagues.len();
                node.is_hub = !colleagues.is_empty() && spanned.len() >= 2;
            }
        }

        Self {
            nodes,
            edges,
            index_by_id,
            adjacency,
            incident,
            ego,
        }
    }

    /// Restriction to the people reachable from `ego_id`, with degrees set.
    pub fn ego_view(&self, ego_id: &str) -> Result<Self, DataError> {
        let ego = self
            .index_of(ego_id)
            .ok_or_else(|| DataError::UnknownPerson {
                id: ego_id.to_owned(),
            })?;
        let tree = bfs(self, ego);

        let mut remap = vec![None; self.nodes.len()];
        let mut nodes = Vec::with_capacity(tree.order().len());
        for (index, node) in self.nodes.iter().enumerate() {
            let Some(distance) = tree.distance(index) else {
                continue;
            };
            remap[index] = Some(nodes.len());
            let mut node = node.clone();
            node.degree = Some(distance);
            nodes.push(node);
        }

        let edges = self
            .edges
            .iter()
            .filter_map(|edge| {
                Some(Edge {
                    a: remap[edge.a]?,
                    b: remap[edge.b]?,
                    ..*edge
                })
            })
            .collect::<Vec<_>>();

        debug!(
            ego = ego_id,
            kept = nodes.len(),
            dropped = self.nodes.len() - nodes.len(),
            "built ego view"
        );
        Ok(Self::assemble(nodes, edges, remap[ego], false))
    }

    /// Degree of every node reachable from `ego_id`; unreachable nodes are omitted.
    pub fn annotate_degrees(&self, ego_id: &str) -> Result<HashMap<NodeIndex, u32>, DataError> {
        let ego = self
            .index_of(ego_id)
            .ok_or_else(|| DataError::UnknownPerson {
                id: ego_id.to_owned(),
            })?;
        let tree = bfs(self, ego);
        Ok(tree
            .order()
            .iter()
            .filter_map(|&index| tree.distance(index).map(|distance| (index, distance)))
            .collect())
    }

    /// Copy of this graph with `degree` filled from `ego_id`; unreachable nodes keep `None`.
    pub fn with_degrees(&self, ego_id: &str) -> Result<Self, DataError> {
        let degrees = self.annotate_degrees(ego_id)?;
        let mut graph = self.clone();
        for (index, node) in graph.nodes.iter_mut().enumerate() {
            node.degree = degrees.get(&index).copied();
        }
        graph.ego = self.index_of(ego_id);
        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index_by_id.get(id).copied()
    }

    pub fn ego(&self) -> Option<NodeIndex> {
        self.ego
    }

    /// Direct neighbours in insertion order.
    pub fn neighbors(&self, index: NodeIndex) -> &[NodeIndex] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn neighbors_of(&self, id: &str) -> Option<&[NodeIndex]> {
        self.index_of(id).map(|index| self.neighbors(index))
    }

    /// Every edge touching `index`, of any kind.
    pub fn edges_of(&self, index: NodeIndex) -> impl Iterator<Item = &Edge> + '_ {
        self.incident
            .get(index)
            .into_iter()
            .flatten()
            .map(|&edge_index| &self.edges[edge_index])
    }

    pub fn edges_between(&self, a: NodeIndex, b: NodeIndex) -> impl Iterator<Item = &Edge> + '_ {
        let pair = (a.min(b), a.max(b));
        self.edges_of(a).filter(move |edge| edge.pair() == pair)
    }

    /// Strongest relation on the pair, if any.
    pub fn edge_between(&self, a: NodeIndex, b: NodeIndex) -> Option<&Edge> {
        self.edges_between(a, b)
            .max_by_key(|edge| edge.kind.strength())
    }

    /// Populated categories, largest first; ties keep category order.
    pub fn categories(&self) -> Vec<(Category, usize)> {
        let mut counts: HashMap<Category, usize> = HashMap::new();
        for node in &self.nodes {
            *counts.entry(node.category).or_default() += 1;
        }

        let mut categories = counts.into_iter().collect::<Vec<_>>();
        categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        categories
    }

    pub fn shortest_path_ids(&self, from_id: &str, to_id: &str) -> Vec<String> {
        let (Some(from), Some(to)) = (self.index_of(from_id), self.index_of(to_id)) else {
            return Vec::new();
        };
        shortest_path(self, from, to)
            .into_iter()
            .map(|index| self.nodes[index].id.clone())
            .collect()
    }

    pub fn degrees_between(&self, from_id: &str, to_id: &str) -> Option<u32> {
        let from = self.index_of(from_id)?;
        let to = self.index_of(to_id)?;
        degrees_of_separation(self, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people(ids: &[&str]) -> Vec<PersonRecord> {
        ids.iter().map(|id| PersonRecord::new(*id, *id)).collect()
    }

    #[test]
    fn duplicate_relations_collapse_to_one_edge() {
        let graph = Graph::build(
            &people(&["a", "b"]),
            &[
                RelationRecord::direct("a", "b"),
                RelationRecord::direct("b", "a").with_weight(2.0),
            ],
        )
        .expect("graph builds");

        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.edges()[0].weight, 2.0);
        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(1), &[0]);
    }

    #[test]
    fn unknown_person_is_a_data_error() {
        let error = Graph::build(&people(&["a"]), &[RelationRecord::direct("a", "ghost")])
            .unwrap_err();
        assert_eq!(
            error,
            DataError::UnknownPerson {
                id: "ghost".to_owned()
            }
        );
    }

    #[test]
    fn self_relation_is_rejected() {
        let error = Graph::build(&people(&["a"]), &[RelationRecord::direct("a", "a")]).unwrap_err();
        assert!(matches!(error, DataError::SelfRelation { .. }));
    }

    #[test]
    fn duplicate_people_and_blank_names_are_rejected() {
        let error = Graph::build(&people(&["a", "a"]), &[]).unwrap_err();
        assert!(matches!(error, DataError::DuplicatePerson { .. }));

        let blank = vec![PersonRecord::new("a", "  ")];
        let error = Graph::build(&blank, &[]).unwrap_err();
        assert_eq!(
            error,
            DataError::MissingField {
                position: 0,
                field: "name"
            }
        );
    }

    #[test]
    fn weak_relation_does_not_duplicate_a_stronger_one() {
        let graph = Graph::build(
            &people(&["a", "b"]),
            &[
                RelationRecord::direct("a", "b"),
                RelationRecord::new("a", "b", RelationKind::SharedKeyword),
            ],
        )
        .expect("graph builds");

        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.edges()[0].kind, RelationKind::Direct);
    }

    #[test]
    fn stronger_relation_upgrades_an_earlier_weak_edge() {
        let graph = Graph::build(
            &people(&["a", "b"]),
            &[
                RelationRecord::new("a", "b", RelationKind::SharedKeyword),
                RelationRecord::direct("b", "a"),
            ],
        )
        .expect("graph builds");

        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.edges()[0].kind, RelationKind::Direct);
        assert_eq!(graph.neighbors(0), &[1]);
    }

    #[test]
    fn direct_and_affiliation_edges_coexist() {
        let graph = Graph::build(
            &people(&["a", "b"]),
            &[
                RelationRecord::direct("a", "b"),
                RelationRecord::new("a", "b", RelationKind::SharedAffiliation),
            ],
        )
        .expect("graph builds");

        assert_eq!(graph.edges_between(0, 1).count(), 2);
        assert_eq!(
            graph.edge_between(1, 0).map(|edge| edge.kind),
            Some(RelationKind::Direct)
        );
        assert_eq!(graph.neighbors(0).len(), 1);
    }

    #[test]
    fn neighbors_keep_insertion_order_and_counts() {
        let graph = Graph::build(
            &people(&["ego", "c", "b", "d"]),
            &[
                RelationRecord::direct("ego", "d"),
                RelationRecord::direct("ego", "b"),
                RelationRecord::direct("c", "ego"),
            ],
        )
        .expect("graph builds");

        let ids = graph
            .neighbors_of("ego")
            .expect("ego exists")
            .iter()
            .map(|&index| graph.nodes()[index].id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["d", "b", "c"]);
        assert_eq!(graph.nodes()[0].connection_count, 3);
        assert_eq!(graph.nodes()[1].connection_count, 1);
    }

    #[test]
    fn affiliation_across_categories_marks_hubs() {
        let records = vec![
            PersonRecord::new("a", "A").with_category("investment"),
            PersonRecord::new("b", "B").with_category("healthcare"),
            PersonRecord::new("c", "C").with_category("healthcare"),
            PersonRecord::new("d", "D").with_category("healthcare"),
        ];
        let graph = Graph::build(
            &records,
            &[
                RelationRecord::new("a", "b", RelationKind::SharedAffiliation),
                RelationRecord::new("c", "d", RelationKind::SharedAffiliation),
            ],
        )
        .expect("graph builds");

        assert!(graph.nodes()[0].is_hub);
        assert!(graph.nodes()[1].is_hub);
        assert!(!graph.nodes()[2].is_hub);
        assert_eq!(graph.nodes()[2].hub_score, 1);
    }

    #[test]
    fn annotate_degrees_omits_unreachable_nodes() {
        let graph = Graph::build(
            &people(&["ego", "b", "c", "island"]),
            &[
                RelationRecord::direct("ego", "b"),
                RelationRecord::direct("b", "c"),
            ],
        )
        .expect("graph builds");

        let degrees = graph.annotate_degrees("ego").expect("ego exists");
        assert_eq!(degrees.get(&0), Some(&0));
        assert_eq!(degrees.get(&1), Some(&1));
        assert_eq!(degrees.get(&2), Some(&2));
        assert!(!degrees.contains_key(&3));
        assert!(graph.annotate_degrees("nobody").is_err());
    }

    #[test]
    fn ego_view_keeps_only_reachable_people() {
        let graph = Graph::build(
            &people(&["ego", "b", "island", "c"]),
            &[
                RelationRecord::direct("ego", "b"),
                RelationRecord::direct("b", "c"),
                RelationRecord::new("island", "c", RelationKind::SharedKeyword),
            ],
        )
        .expect("graph builds");

        let view = graph.ego_view("ego").expect("ego exists");
        let ids = view
            .nodes()
            .iter()
            .map(|node| (node.id.as_str(), node.degree))
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![("ego", Some(0)), ("b", Some(1)), ("c", Some(2))]);
        assert_eq!(view.edges().len(), 2);
        assert_eq!(view.ego(), Some(0));
        assert_eq!(view.nodes()[1].connection_count, 2);
    }

    #[test]
    fn categories_are_sorted_by_population() {
        let records = vec![
            PersonRecord::new("a", "A").with_category("media"),
            PersonRecord::new("b", "B").with_category("legal"),
            PersonRecord::new("c", "C").with_category("legal"),
        ];
        let graph = Graph::build(&records, &[]).expect("graph builds");
        assert_eq!(
            graph.categories(),
            vec![(Category::Legal, 2), (Category::Media, 1)]
        );
    }
}
