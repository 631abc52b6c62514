use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const LABEL_MAX_CHARS: usize = 8;

/// Deterministic pair in `[-1, 1]` derived from an id, used for layout jitter.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

pub fn truncate_label(name: &str) -> String {
    if name.chars().count() > LABEL_MAX_CHARS {
        let head = name.chars().take(LABEL_MAX_CHARS).collect::<String>();
        format!("{head}...")
    } else {
        name.to_owned()
    }
}

/// Placeholder glyph for people without a photo.
pub fn initial_letter(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map(|ch| ch.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_owned())
}

/// Lowercased company name with legal-form suffixes and whitespace removed.
pub fn normalize_company(company: &str) -> String {
    const LEGAL_FORMS: [&str; 9] = [
        "(주)", "(유)", "주식회사", "㈜", "inc.", "corp.", "co.,ltd.", "co.,ltd", "llc",
    ];

    let mut normalized = company.to_lowercase();
    for form in LEGAL_FORMS {
        normalized = normalized.replace(form, "");
    }
    normalized.retain(|ch| !ch.is_whitespace());
    normalized
}
