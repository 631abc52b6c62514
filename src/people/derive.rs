use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::util::normalize_company;

use super::record::{PersonRecord, RelationKind, RelationRecord};

const MIN_COMPANY_KEY_CHARS: usize = 3;
const KEYWORD_WEIGHT_PER_SHARED: f32 = 0.1;

/// One relation per pair of people whose normalized company matches.
pub fn derive_affiliation_relations(people: &[PersonRecord]) -> Vec<RelationRecord> {
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    let mut group_by_key: HashMap<String, usize> = HashMap::new();

    for (index, person) in people.iter().enumerate() {
        let key = normalize_company(&person.company);
        if key.chars().count() < MIN_COMPANY_KEY_CHARS {
            continue;
        }

        let slot = *group_by_key.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(index);
    }

    let mut relations = Vec::new();
    for (_key, members) in &groups {
        for (offset, &from) in members.iter().enumerate() {
            for &to in &members[offset + 1..] {
                relations.push(RelationRecord::new(
                    people[from].id.clone(),
                    people[to].id.clone(),
                    RelationKind::SharedAffiliation,
                ));
            }
        }
    }

    debug!(
        companies = groups.len(),
        relations = relations.len(),
        "derived affiliation relations"
    );
    relations
}

/// One relation per pair sharing at least one keyword, weighted by overlap.
pub fn derive_keyword_relations(people: &[PersonRecord]) -> Vec<RelationRecord> {
    let keyword_sets = people
        .iter()
        .map(|person| {
            person
                .keywords
                .iter()
                .map(|keyword| keyword.trim().to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect::<HashSet<_>>()
        })
        .collect::<Vec<_>>();

    let mut relations = Vec::new();
    for from in 0..people.len() {
        if keyword_sets[from].is_empty() {
            continue;
        }
        for to in (from + 1)..people.len() {
            let shared = keyword_sets[from].intersection(&keyword_sets[to]).count();
            if shared == 0 {
                continue;
            }

            let weight = (shared as f32 * KEYWORD_WEIGHT_PER_SHARED).min(1.0);
            relations.push(
                RelationRecord::new(
                    people[from].id.clone(),
                    people[to].id.clone(),
                    RelationKind::SharedKeyword,
                )
                .with_weight(weight),
            );
        }
    }

    debug!(relations = relations.len(), "derived keyword relations");
    relations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str, company: &str, keywords: &[&str]) -> PersonRecord {
        PersonRecord::new(id, id)
            .with_company(company)
            .with_keywords(keywords.iter().copied())
    }

    #[test]
    fn affiliation_groups_use_normalized_company() {
        let people = vec![
            person("a", "Acme Corp.", &[]),
            person("b", "acme", &[]),
            person("c", "Globex", &[]),
            person("d", "ACME", &[]),
        ];

        let relations = derive_affiliation_relations(&people);
        let pairs = relations
            .iter()
            .map(|relation| (relation.person_id_a.as_str(), relation.person_id_b.as_str()))
            .collect::<Vec<_>>();

        assert_eq!(pairs, vec![("a", "b"), ("a", "d"), ("b", "d")]);
        assert!(
            relations
                .iter()
                .all(|relation| relation.kind == RelationKind::SharedAffiliation)
        );
    }

    #[test]
    fn short_company_names_are_ignored() {
        let people = vec![person("a", "X", &[]), person("b", "x", &[])];
        assert!(derive_affiliation_relations(&people).is_empty());
    }

    #[test]
    fn keyword_weight_grows_with_overlap() {
        let people = vec![
            person("a", "", &["AI", "SaaS", "B2B"]),
            person("b", "", &["ai", "saas"]),
            person("c", "", &["design"]),
        ];

        let relations = derive_keyword_relations(&people);
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].kind, RelationKind::SharedKeyword);
        assert!((relations[0].effective_weight() - 0.2).abs() < 1e-6);
    }
}
