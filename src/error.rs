//! Error types for rendering and gating migrations.

use thiserror::Error;

use crate::dialect::EngineId;

/// Errors raised by a [`SchemaExecutor`](crate::executor::SchemaExecutor).
///
/// These come from the live database connection and are never treated as a
/// negative answer to an introspection query.
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// PostgreSQL error from `may_postgres`
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] may_postgres::Error),

    /// Invalid connection string or failure to connect
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(String),
}

/// Main error type for migration rendering and condition evaluation.
#[derive(Error, Debug)]
pub enum MigrationError {
    /// A migration has no statement for the requested engine.
    #[error("migration '{migration}' has no SQL for database engine '{engine}'")]
    UnsupportedDialect { migration: String, engine: EngineId },

    /// The dialect cannot express the requested schema shape.
    #[error("{engine} does not support {feature}")]
    UnsupportedFeature { engine: EngineId, feature: String },

    /// A descriptor is incomplete (empty column list, mismatched copy columns, ...).
    #[error("Invalid schema descriptor: {0}")]
    InvalidSchema(String),

    /// The introspection query behind a condition could not be run.
    #[error("failed to evaluate condition {condition}: {source}")]
    ConditionEvaluation {
        condition: String,
        #[source]
        source: ExecutorError,
    },

    /// Rendered SQL no longer matches what was recorded when the migration was applied.
    #[error("Migration '{id}' renders differently than when it was applied (stored checksum {stored}, current {current})")]
    ChecksumMismatch {
        id: String,
        stored: String,
        current: String,
    },

    /// Configuration error (unknown engine name, unreadable config, ...)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MigrationError {
    /// Create an `UnsupportedFeature` error
    pub fn unsupported(engine: EngineId, feature: impl Into<String>) -> Self {
        MigrationError::UnsupportedFeature {
            engine,
            feature: feature.into(),
        }
    }

    /// Create an `InvalidSchema` error
    pub fn invalid(message: impl Into<String>) -> Self {
        MigrationError::InvalidSchema(message.into())
    }

    /// Whether this error means the engine cannot render the migration at all,
    /// as opposed to a connectivity or configuration problem.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            MigrationError::UnsupportedDialect { .. } | MigrationError::UnsupportedFeature { .. }
        )
    }
}

impl From<config::ConfigError> for MigrationError {
    fn from(error: config::ConfigError) -> Self {
        MigrationError::Config(error.to_string())
    }
}

/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, MigrationError>;
