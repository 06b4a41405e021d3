//! Hand-written statements, one per engine.

use super::{migration_builder, Migration, MigrationBase};
use crate::dialect::{Dialect, EngineId};
use crate::error::{MigrationError, Result};

/// Literal SQL chosen by the dialect's engine id.
///
/// An engine without a literal is an `UnsupportedDialect` error; an empty
/// statement is never returned.
#[derive(Debug, Default)]
pub struct RawSqlMigration {
    base: MigrationBase,
    sqlite: Option<String>,
    mysql: Option<String>,
    postgres: Option<String>,
}

migration_builder!(RawSqlMigration);

impl RawSqlMigration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sqlite(mut self, sql: impl Into<String>) -> Self {
        self.sqlite = Some(sql.into());
        self
    }

    pub fn mysql(mut self, sql: impl Into<String>) -> Self {
        self.mysql = Some(sql.into());
        self
    }

    pub fn postgres(mut self, sql: impl Into<String>) -> Self {
        self.postgres = Some(sql.into());
        self
    }

    /// Literal configured for `engine`, if any
    pub fn statement_for(&self, engine: EngineId) -> Option<&str> {
        let sql = match engine {
            EngineId::Sqlite => &self.sqlite,
            EngineId::Mysql => &self.mysql,
            EngineId::Postgres => &self.postgres,
        };
        sql.as_deref().filter(|s| !s.trim().is_empty())
    }
}

impl Migration for RawSqlMigration {
    fn base(&self) -> &MigrationBase {
        &self.base
    }

    fn sql(&self, dialect: &dyn Dialect) -> Result<String> {
        let engine = dialect.driver_name();
        self.statement_for(engine)
            .map(str::to_string)
            .ok_or_else(|| MigrationError::UnsupportedDialect {
                migration: self.id().to_string(),
                engine,
            })
    }
}
