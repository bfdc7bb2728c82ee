pub mod fixture;
pub mod id;
pub mod markup;
pub mod provider;
pub mod registry;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("the field definition \"{0}\" is not defined")]
    FieldUndefined(String),
    #[error("the fixture definition has no class schema")]
    ClassUndefined,
    #[error("the fixture for class name \"{0}\" not found")]
    FixtureNotFound(String),
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        expected: &'static str,
        got: serde_json::Value,
    },
    #[error("failed to fetch video metadata ({reference}): {source}")]
    Metadata {
        reference: String,
        source: provider::Error,
    },
    #[error("failed to serialize asset record: {0}")]
    Serialize(#[from] serde_json::Error),
}
