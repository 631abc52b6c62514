mod category;
mod derive;
mod load;
mod record;

pub use category::Category;
pub use derive::{derive_affiliation_relations, derive_keyword_relations};
pub use load::{load_dataset, parse_dataset, with_derived_relations};
pub use record::{Dataset, PersonRecord, RelationKind, RelationRecord};
