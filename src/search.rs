use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use tracing::trace;

use crate::graph::{Graph, NodeIndex, bfs};

#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    pub limit: usize,
    pub suggestion_limit: usize,
    pub recommendation_count: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: 8,
            suggestion_limit: 6,
            recommendation_count: 5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
    pub index: NodeIndex,
    pub degree: u32,
    /// Ego-to-hit introduction chain, endpoints included.
    pub path: Vec<NodeIndex>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Recommendation {
    pub index: NodeIndex,
    pub score: f32,
    /// Direct contacts shared with the ego.
    pub mutual: usize,
    pub path: Vec<NodeIndex>,
}

struct KeywordEntry {
    display: String,
    folded: String,
    holders: usize,
}

/// Lowercased text per person plus the keyword vocabulary of one graph.
pub struct SearchIndex {
    config: SearchConfig,
    haystacks: Vec<String>,
    keywords: Vec<KeywordEntry>,
}

impl SearchIndex {
    pub fn build(graph: &Graph) -> Self {
        Self::with_config(graph, SearchConfig::default())
    }

    pub fn with_config(graph: &Graph, config: SearchConfig) -> Self {
        let haystacks = graph
            .nodes()
            .iter()
            .map(|node| {
                let mut haystack = format!("{}\n{}\n{}", node.name, node.company, node.role);
                for keyword in &node.keywords {
                    haystack.push('\n');
                    haystack.push_str(keyword);
                }
                haystack.to_lowercase()
            })
            .collect();

        let mut keywords: Vec<KeywordEntry> = Vec::new();
        let mut slot_by_keyword: HashMap<String, usize> = HashMap::new();
        for node in graph.nodes() {
            let mut seen = HashSet::new();
            for keyword in &node.keywords {
                let display = keyword.trim();
                let folded = display.to_lowercase();
                if folded.is_empty() || !seen.insert(folded.clone()) {
                    continue;
                }

                match slot_by_keyword.get(&folded) {
                    Some(&slot) => keywords[slot].holders += 1,
                    None => {
                        slot_by_keyword.insert(folded.clone(), keywords.len());
                        keywords.push(KeywordEntry {
                            display: display.to_owned(),
                            folded,
                            holders: 1,
                        });
                    }
                }
            }
        }

        Self {
            config,
            haystacks,
            keywords,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// People reachable from `ego` whose text contains `query`, nearest first.
    pub fn search(&self, graph: &Graph, ego: NodeIndex, query: &str) -> Vec<SearchHit> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let tree = bfs(graph, ego);
        let hits = tree
            .order()
            .iter()
            .copied()
            .filter(|&index| index != ego)
            .filter(|&index| {
                self.haystacks
                    .get(index)
                    .is_some_and(|haystack| haystack.contains(&query))
            })
            .filter_map(|index| {
                Some(SearchHit {
                    index,
                    degree: tree.distance(index)?,
                    path: tree.path_to(index),
                })
            })
            .take(self.config.limit)
            .collect::<Vec<_>>();

        trace!(query = %query, hits = hits.len(), "searched network");
        hits
    }

    /// Known keywords containing `query`, best fuzzy match first.
    pub fn keyword_suggestions(&self, query: &str) -> Vec<String> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored = self
            .keywords
            .iter()
            .filter(|entry| entry.folded.contains(&query))
            .map(|entry| {
                let score = matcher.fuzzy_match(&entry.folded, &query).unwrap_or(0);
                (score, entry)
            })
            .collect::<Vec<_>>();

        scored.sort_by(|(score_a, a), (score_b, b)| {
            score_b
                .cmp(score_a)
                .then_with(|| b.holders.cmp(&a.holders))
                .then_with(|| a.folded.cmp(&b.folded))
        });

        scored
            .into_iter()
            .take(self.config.suggestion_limit)
            .map(|(_, entry)| entry.display.clone())
            .collect()
    }

    /// Number of people holding `keyword`, ignoring case.
    pub fn keyword_holders(&self, keyword: &str) -> usize {
        let folded = keyword.trim().to_lowercase();
        self.keywords
            .iter()
            .find(|entry| entry.folded == folded)
            .map_or(0, |entry| entry.holders)
    }

    /// Second-degree people worth an introduction, scored by keyword overlap
    /// with the ego and closeness.
    pub fn recommend(&self, graph: &Graph, ego: NodeIndex, count: usize) -> Vec<Recommendation> {
        let Some(ego_node) = graph.node(ego) else {
            return Vec::new();
        };

        let ego_keywords = folded_keywords(&ego_node.keywords);
        let ego_contacts = graph.neighbors(ego).iter().copied().collect::<HashSet<_>>();
        let tree = bfs(graph, ego);

        let mut recommendations = tree
            .order()
            .iter()
            .copied()
            .filter(|&index| tree.distance(index) == Some(2))
            .filter_map(|index| {
                let node = graph.node(index)?;
                let keywords = folded_keywords(&node.keywords);
                let union = ego_keywords.union(&keywords).count();
                let jaccard = if union == 0 {
                    0.0
                } else {
                    ego_keywords.intersection(&keywords).count() as f32 / union as f32
                };

                Some(Recommendation {
                    index,
                    score: 0.6 * jaccard + 0.4 / 2.0,
                    mutual: graph
                        .neighbors(index)
                        .iter()
                        .filter(|contact| ego_contacts.contains(contact))
                        .count(),
                    path: tree.path_to(index),
                })
            })
            .collect::<Vec<_>>();

        // Stable sort keeps discovery order among equals.
        recommendations.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.mutual.cmp(&a.mutual))
        });
        recommendations.truncate(count);
        recommendations
    }
}

fn folded_keywords(keywords: &[String]) -> HashSet<String> {
    keywords
        .iter()
        .map(|keyword| keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::people::{PersonRecord, RelationRecord};

    fn network() -> Graph {
        let people = vec![
            PersonRecord::new("ego", "Evelyn").with_keywords(["fintech", "payments"]),
            PersonRecord::new("b", "Bora Han").with_company("Acme Capital"),
            PersonRecord::new("c", "Chris Oh").with_role("Designer"),
            PersonRecord::new("d", "Dana Lee").with_keywords(["FinTech", "lending"]),
            PersonRecord::new("e", "Eun Park").with_keywords(["design"]),
            PersonRecord::new("island", "Fin Solo").with_keywords(["fintech"]),
        ];
        let relations = vec![
            RelationRecord::direct("ego", "b"),
            RelationRecord::direct("ego", "c"),
            RelationRecord::direct("b", "d"),
            RelationRecord::direct("c", "d"),
            RelationRecord::direct("c", "e"),
        ];
        Graph::build(&people, &relations).expect("graph builds")
    }

    #[test]
    fn hits_are_ranked_by_degree_and_carry_paths() {
        let graph = network();
        let index = SearchIndex::build(&graph);

        let hits = index.search(&graph, 0, "  FIN ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 3);
        assert_eq!(hits[0].degree, 2);
        assert_eq!(hits[0].path, vec![0, 1, 3]);

        let hits = index.search(&graph, 0, "e");
        let degrees = hits.iter().map(|hit| hit.degree).collect::<Vec<_>>();
        assert!(degrees.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(hits.iter().all(|hit| hit.index != 0 && hit.index != 5));
    }

    #[test]
    fn company_and_role_are_searchable() {
        let graph = network();
        let index = SearchIndex::build(&graph);
        assert_eq!(index.search(&graph, 0, "capital")[0].index, 1);
        assert_eq!(index.search(&graph, 0, "designer")[0].index, 2);
        assert!(index.search(&graph, 0, "   ").is_empty());
    }

    #[test]
    fn results_are_capped() {
        let mut people = vec![PersonRecord::new("ego", "Ego")];
        let mut relations = Vec::new();
        for i in 0..20 {
            people.push(PersonRecord::new(format!("p{i}"), format!("Kim {i}")));
            relations.push(RelationRecord::direct("ego", format!("p{i}")));
        }
        let graph = Graph::build(&people, &relations).expect("graph builds");
        let index = SearchIndex::build(&graph);
        assert_eq!(index.search(&graph, 0, "kim").len(), 8);
    }

    #[test]
    fn keyword_suggestions_are_distinct_and_matching() {
        let graph = network();
        let index = SearchIndex::build(&graph);

        let suggestions = index.keyword_suggestions("fin");
        assert_eq!(suggestions, vec!["fintech".to_owned()]);
        assert_eq!(index.keyword_holders("FINTECH"), 3);

        let suggestions = index.keyword_suggestions("n");
        assert!(suggestions.len() <= 6);
        assert!(suggestions.iter().all(|keyword| keyword.to_lowercase().contains('n')));
        assert!(index.keyword_suggestions("").is_empty());
    }

    #[test]
    fn recommendations_prefer_shared_interests() {
        let graph = network();
        let index = SearchIndex::build(&graph);

        let recommendations = index.recommend(&graph, 0, 5);
        let order = recommendations.iter().map(|rec| rec.index).collect::<Vec<_>>();
        assert_eq!(order, vec![3, 4]);
        assert_eq!(recommendations[0].mutual, 2);
        assert_eq!(recommendations[0].path, vec![0, 1, 3]);
        assert!(recommendations[0].score > recommendations[1].score);
        assert_eq!(index.recommend(&graph, 0, 1).len(), 1);
    }
}
