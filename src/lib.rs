//! # sqlmigrator
//!
//! Dialect-aware schema migration steps for MySQL, SQLite and PostgreSQL.
//!
//! Migrations describe one schema or data change each (add a table, add an
//! index, copy data, ...) and render themselves to SQL through a [`Dialect`].
//! A [`Condition`] can gate a migration on the live schema; evaluating it
//! goes through a [`SchemaExecutor`]. Applying migrations in order and
//! recording what ran is left to the caller.

pub mod condition;
pub mod config;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod metrics;
pub mod migration;
pub mod schema;

pub use condition::{
    Condition, IfColumnNotExistsCondition, IfIndexExistsCondition, IfTableExistsCondition,
};
pub use crate::config::MigratorConfig;
pub use dialect::{
    dialect_for, Dialect, EngineId, IntrospectionQuery, MysqlDialect, PostgresDialect,
    SqliteDialect,
};
pub use error::{ExecutorError, MigrationError, Result};
pub use executor::{connection_format, ConnectionFormat, MayPostgresExecutor, SchemaExecutor};
pub use migration::{
    checksum, render, should_run, validate_checksum, AddColumnMigration, AddIndexMigration,
    AddTableMigration, CopyTableDataMigration, DropIndexMigration, DropTableMigration, Migration,
    MigrationBase, RawSqlMigration, RenameTableMigration,
};
pub use schema::{Column, ColumnType, Index, IndexKind, Table};
