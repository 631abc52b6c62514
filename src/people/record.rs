use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    #[default]
    Direct,
    SharedAffiliation,
    SharedKeyword,
}

impl RelationKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::SharedAffiliation => "shared affiliation",
            Self::SharedKeyword => "shared keyword",
        }
    }

    /// Higher wins when two relations compete for the same pair.
    pub fn strength(self) -> u8 {
        match self {
            Self::Direct => 3,
            Self::SharedAffiliation => 2,
            Self::SharedKeyword => 1,
        }
    }

    pub fn is_derived(self) -> bool {
        !matches!(self, Self::Direct)
    }

    /// Weak relations never sit next to a stronger one on the same pair.
    pub fn is_weak(self) -> bool {
        matches!(self, Self::SharedKeyword)
    }

    pub fn default_weight(self) -> f32 {
        match self {
            Self::Direct => 1.0,
            Self::SharedAffiliation => 0.5,
            Self::SharedKeyword => 0.1,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default, alias = "position")]
    pub role: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, alias = "profileImage")]
    pub photo_ref: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl PersonRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationRecord {
    #[serde(alias = "source", alias = "fromUserId")]
    pub person_id_a: String,
    #[serde(alias = "target", alias = "toUserId")]
    pub person_id_b: String,
    #[serde(default)]
    pub kind: RelationKind,
    #[serde(default)]
    pub weight: Option<f32>,
}

impl RelationRecord {
    pub fn new(a: impl Into<String>, b: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            person_id_a: a.into(),
            person_id_b: b.into(),
            kind,
            weight: None,
        }
    }

    pub fn direct(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::new(a, b, RelationKind::Direct)
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn effective_weight(&self) -> f32 {
        self.weight
            .filter(|weight| weight.is_finite() && *weight > 0.0)
            .unwrap_or_else(|| self.kind.default_weight())
    }
}

/// Everything the engine needs from the persistence layer for one refresh.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub ego: Option<String>,
    pub people: Vec<PersonRecord>,
    #[serde(default)]
    pub relations: Vec<RelationRecord>,
}
