//! Database error types.

use thiserror::Error;

/// Errors that can occur when using the database.
#[derive(Error, Debug)]
pub enum DbError {
    /// Failed to open the database.
    #[error("Failed to open database: {0}")]
    OpenError(String),

    /// Failed to execute a query.
    #[error("Query execution failed: {0}")]
    QueryError(String),

    /// Failed to deserialize a row into a domain type.
    #[error("Deserialization error: {0}")]
    DeserializeError(String),

    /// No rows returned when one was expected.
    #[error("No rows returned")]
    NotFound,
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        DbError::DeserializeError(e.to_string())
    }
}

impl From<DbError> for safegear_commerce::CommerceError {
    fn from(e: DbError) -> Self {
        safegear_commerce::CommerceError::DatabaseError(e.to_string())
    }
}
