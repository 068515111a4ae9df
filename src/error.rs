//! Typed failures raised while flattening documents and writing records.

use thiserror::Error;

/// Why a detail document could not be turned into a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("missing key `{0}`")]
    MissingKey(String),
    #[error("key `{key}` is not {expected}")]
    WrongType { key: String, expected: &'static str },
    #[error("no stat entry named `{0}`")]
    MissingStat(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    /// The record carries a field the endpoint header does not declare.
    #[error("record field `{0}` is not part of the header")]
    UnknownField(String),
}
