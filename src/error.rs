use thiserror::Error;

/// Rejection of a schema operation. The store is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Table name cannot be empty")]
    EmptyName,
    #[error("A table named \"{0}\" already exists")]
    DuplicateTableName(String),
    #[error("A table needs at least one field")]
    NoFields,
    #[error("Field name cannot be empty")]
    EmptyFieldName,
    #[error("A table needs at least one primary key field")]
    NoPrimaryKey,
    #[error("Duplicate field name: \"{0}\"")]
    DuplicateFieldName(String),
    #[error("Parent and child table must be different")]
    InvalidEndpoints,
    #[error("Table not found: {0}")]
    MissingTable(String),
}
