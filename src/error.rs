/// Malformed input handed to [`crate::graph::Graph::build`].
///
/// Rendering never produces one of these; they only surface while the graph
/// is being (re)built so that upstream data bugs stay visible.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    #[error("relation references unknown person `{id}`")]
    UnknownPerson { id: String },

    #[error("person `{id}` is related to itself")]
    SelfRelation { id: String },

    #[error("person id `{id}` appears more than once")]
    DuplicatePerson { id: String },

    #[error("person record #{position} is missing `{field}`")]
    MissingField {
        position: usize,
        field: &'static str,
    },
}
