use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use super::derive::{derive_affiliation_relations, derive_keyword_relations};
use super::record::Dataset;

pub fn parse_dataset(raw: &str) -> Result<Dataset> {
    let dataset: Dataset = serde_json::from_str(raw).context("invalid network dataset JSON")?;
    if dataset.people.is_empty() {
        return Err(anyhow!("network dataset contains no people"));
    }
    Ok(dataset)
}

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read network dataset {}", path.display()))?;
    let dataset = parse_dataset(&raw)
        .with_context(|| format!("failed to parse network dataset {}", path.display()))?;

    info!(
        people = dataset.people.len(),
        relations = dataset.relations.len(),
        path = %path.display(),
        "loaded network dataset"
    );
    Ok(dataset)
}

/// Appends affiliation and keyword relations derived from person attributes.
pub fn with_derived_relations(mut dataset: Dataset) -> Dataset {
    let affiliation = derive_affiliation_relations(&dataset.people);
    let keyword = derive_keyword_relations(&dataset.people);
    dataset.relations.extend(affiliation);
    dataset.relations.extend(keyword);
    dataset
}
