use tracing::trace;

use super::record::PersonRecord;

/// Industry bucket used by the address-book layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Healthcare,
    Investment,
    Startup,
    Legal,
    Media,
    Academia,
    Government,
    Corporate,
    Uncategorized,
}

/// Matching order; the first category with a hit wins.
const PRIORITY: [Category; 8] = [
    Category::Investment,
    Category::Healthcare,
    Category::Legal,
    Category::Media,
    Category::Government,
    Category::Academia,
    Category::Corporate,
    Category::Startup,
];

const FOUNDER_HINTS: [&str; 4] = ["ceo", "cto", "founder", "대표이사"];

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Healthcare,
        Category::Investment,
        Category::Startup,
        Category::Legal,
        Category::Media,
        Category::Academia,
        Category::Government,
        Category::Corporate,
        Category::Uncategorized,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Healthcare => "Healthcare",
            Self::Investment => "Investment",
            Self::Startup => "Startup/IT",
            Self::Legal => "Legal/Consulting",
            Self::Media => "Media",
            Self::Academia => "Academia",
            Self::Government => "Government",
            Self::Corporate => "Corporate",
            Self::Uncategorized => "Uncategorized",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        let key = label.trim().to_ascii_lowercase();
        match key.as_str() {
            "healthcare" | "medical" => Some(Self::Healthcare),
            "investment" | "vc" => Some(Self::Investment),
            "startup" | "startup/it" | "it" => Some(Self::Startup),
            "legal" | "legal/consulting" | "consulting" => Some(Self::Legal),
            "media" => Some(Self::Media),
            "academia" | "research" => Some(Self::Academia),
            "government" | "public" => Some(Self::Government),
            "corporate" => Some(Self::Corporate),
            "other" | "uncategorized" => Some(Self::Uncategorized),
            _ => None,
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Healthcare => &[
                "hospital", "clinic", "medical", "healthcare", "bio", "pharma", "diagnostic",
                "physician", "md", "병원", "의원", "의료", "제약",
            ],
            Self::Investment => &[
                "investment", "venture", "vc", "capital", "partners", "fund", "equity", "투자",
                "벤처", "캐피탈",
            ],
            Self::Startup => &[
                "startup", "founder", "co-founder", "developer", "software", "platform", "tech",
                "lab", "ai", "스타트업", "개발",
            ],
            Self::Legal => &[
                "law firm", "lawyer", "attorney", "patent", "consulting", "accounting", "cpa",
                "법무법인", "변호사", "특허",
            ],
            Self::Media => &[
                "journalist", "editor", "media", "news", "press", "broadcast", "기자", "언론",
            ],
            Self::Academia => &[
                "university", "professor", "research", "institute", "phd", "대학", "교수",
            ],
            Self::Government => &[
                "government", "ministry", "public", "association", "agency", "assembly", "정부",
                "국회", "공공",
            ],
            Self::Corporate => &[
                "samsung", "lg", "hyundai", "kakao", "naver", "google", "lotte", "삼성", "현대",
            ],
            Self::Uncategorized => &[],
        }
    }

    /// Infers the bucket from free text; unmatched text is `Uncategorized`.
    pub fn infer(company: &str, role: &str, name: &str) -> Self {
        let haystack = format!("{company} {role} {name}").to_lowercase();
        let words = haystack
            .split(|ch: char| !ch.is_alphanumeric() && ch != '-')
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>();

        let matches = |keyword: &str| {
            if keyword.is_ascii() && keyword.len() <= 3 {
                words.contains(&keyword)
            } else {
                haystack.contains(keyword)
            }
        };

        for category in PRIORITY {
            if category.keywords().iter().any(|keyword| matches(keyword)) {
                return category;
            }
        }

        if FOUNDER_HINTS.iter().any(|hint| matches(hint)) {
            return Self::Startup;
        }

        Self::Uncategorized
    }

    /// Explicit label when it parses, inference otherwise.
    pub fn resolve(record: &PersonRecord) -> Self {
        if let Some(label) = record.category.as_deref()
            && let Some(category) = Self::parse(label)
        {
            return category;
        }

        let inferred = Self::infer(&record.company, &record.role, &record.name);
        trace!(person = %record.id, category = inferred.label(), "inferred category");
        inferred
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_label_wins_over_inference() {
        let record = PersonRecord::new("p1", "Dana")
            .with_company("Seoul Capital Partners")
            .with_category("media");
        assert_eq!(Category::resolve(&record), Category::Media);
    }

    #[test]
    fn unknown_label_falls_back_to_inference() {
        let record = PersonRecord::new("p1", "Dana")
            .with_company("Seoul Capital Partners")
            .with_category("space mining");
        assert_eq!(Category::resolve(&record), Category::Investment);
    }

    #[test]
    fn priority_order_breaks_overlaps() {
        // "capital" (investment) outranks "tech" (startup).
        assert_eq!(
            Category::infer("Tech Capital", "Principal", "Kim"),
            Category::Investment
        );
        assert_eq!(
            Category::infer("City Hospital", "Professor", "Lee"),
            Category::Healthcare
        );
    }

    #[test]
    fn short_ascii_keywords_match_whole_words_only() {
        // "lg" must not match inside "algorithm", "ai" not inside "maintenance".
        assert_eq!(
            Category::infer("Algorithm Maintenance", "", "Park"),
            Category::Uncategorized
        );
        assert_eq!(Category::infer("LG Display", "", "Park"), Category::Corporate);
    }

    #[test]
    fn founders_without_other_hints_are_startups() {
        assert_eq!(Category::infer("Moonbeam", "CEO", "Choi"), Category::Startup);
    }

    #[test]
    fn missing_data_is_uncategorized() {
        assert_eq!(Category::infer("", "", "Anonymous"), Category::Uncategorized);
    }
}
