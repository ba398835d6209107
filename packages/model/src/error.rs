//! Error types for the component tree model

use crate::node::Kind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Tree root must be a Page, found {0}")]
    RootNotPage(Kind),

    #[error("Unknown {kind} value: {value:?}")]
    UnknownValue { kind: &'static str, value: String },

    #[error("Node of kind {0} has an empty id")]
    MissingId(Kind),

    #[error("Duplicate node id: {0}")]
    DuplicateId(String),

    #[error("{parent} cannot contain {child} (node {child_id})")]
    IllegalChild {
        parent: Kind,
        child: Kind,
        child_id: String,
    },
}
