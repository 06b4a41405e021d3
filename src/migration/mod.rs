//! Migration steps and their rendering to SQL.
//!
//! Each variant owns only the data its statement needs and renders itself
//! through a [`Dialect`]. A migration carries a string id (used by the runner
//! for ordering and tracking) and an optional [`Condition`]. The core never
//! applies or skips anything on its own; [`should_run`] only reports.
//!
//! # Example
//!
//! ```
//! use sqlmigrator::{
//!     render, AddTableMigration, Column, ColumnType, Migration, SqliteDialect,
//! };
//!
//! let migration = AddTableMigration::new("star")
//!     .with_id("create star table")
//!     .with_column(Column::new("id", ColumnType::BigInt).primary_key().auto_increment())
//!     .with_column(Column::new("user_id", ColumnType::BigInt));
//!
//! let sql = render(&migration, &SqliteDialect::new())?;
//! assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"star\""));
//! assert_eq!(migration.id(), "create star table");
//! # Ok::<(), sqlmigrator::MigrationError>(())
//! ```

pub mod checksum;
mod column;
mod index;
mod raw_sql;
mod table;

pub use checksum::{checksum, validate_checksum};
pub use column::AddColumnMigration;
pub use index::{AddIndexMigration, DropIndexMigration};
pub use raw_sql::RawSqlMigration;
pub use table::{
    AddTableMigration, CopyTableDataMigration, DropTableMigration, RenameTableMigration,
};

use crate::condition::Condition;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::executor::SchemaExecutor;
#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// One schema or data change step.
///
/// Builders are consumed while configuring a migration; once it is handed to
/// a runner (typically as `Box<dyn Migration>`) it is only ever read.
pub trait Migration: Send + Sync {
    /// Shared id and condition
    fn base(&self) -> &MigrationBase;

    /// Render the statement for `dialect`.
    ///
    /// Calling this twice with the same dialect yields identical text.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedDialect` or `UnsupportedFeature` when the engine
    /// cannot express the step, `InvalidSchema` for incomplete descriptors.
    fn sql(&self, dialect: &dyn Dialect) -> Result<String>;

    /// Id used by the runner for ordering and tracking
    fn id(&self) -> &str {
        &self.base().id
    }

    /// Condition gating this migration, if any
    fn condition(&self) -> Option<&dyn Condition> {
        self.base().condition.as_deref()
    }
}

/// Id and optional condition shared by every migration variant
#[derive(Debug, Default)]
pub struct MigrationBase {
    id: String,
    condition: Option<Box<dyn Condition>>,
    // condition was built from the migration's own table/index/column
    derived: bool,
}

impl MigrationBase {
    pub(crate) fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub(crate) fn set_condition(&mut self, condition: Box<dyn Condition>) {
        self.condition = Some(condition);
        self.derived = false;
    }

    /// Attach a condition that must follow later builder calls
    pub(crate) fn set_derived_condition(&mut self, condition: Box<dyn Condition>) {
        self.condition = Some(condition);
        self.derived = true;
    }

    pub(crate) fn has_derived_condition(&self) -> bool {
        self.derived
    }
}

/// Builder setters shared by every variant
macro_rules! migration_builder {
    ($ty:ty) => {
        impl $ty {
            /// Set the id the runner tracks this migration by
            pub fn with_id(mut self, id: impl Into<String>) -> Self {
                self.base.set_id(id);
                self
            }

            /// Gate the migration on `condition`
            pub fn with_condition<C: $crate::condition::Condition + 'static>(
                mut self,
                condition: C,
            ) -> Self {
                self.base.set_condition(Box::new(condition));
                self
            }
        }
    };
}
pub(crate) use migration_builder;

/// Render `migration` for `dialect`, with logging and instrumentation.
pub fn render(migration: &dyn Migration, dialect: &dyn Dialect) -> Result<String> {
    let engine = dialect.driver_name();
    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::render_span(migration.id(), engine.as_str()).entered();

    match migration.sql(dialect) {
        Ok(sql) => {
            #[cfg(feature = "metrics")]
            METRICS.record_render(engine);
            log::debug!("rendered migration '{}' for {}: {}", migration.id(), engine, sql);
            Ok(sql)
        }
        Err(err) => {
            #[cfg(feature = "metrics")]
            METRICS.record_render_error(engine);
            if err.is_unsupported() {
                log::warn!("migration '{}' cannot run on {}: {}", migration.id(), engine, err);
            }
            Err(err)
        }
    }
}

/// Report whether `migration` is eligible to run.
///
/// A migration without a condition is always eligible. Nothing is executed
/// here; the caller decides what to do with the answer.
///
/// # Errors
///
/// Returns `ConditionEvaluation` if the condition's introspection query fails.
pub fn should_run(
    migration: &dyn Migration,
    dialect: &dyn Dialect,
    executor: &dyn SchemaExecutor,
) -> Result<bool> {
    match migration.condition() {
        Some(condition) => {
            let eligible = condition.evaluate(dialect, executor)?;
            if !eligible {
                log::debug!(
                    "migration '{}' not eligible: {} is false",
                    migration.id(),
                    condition.describe()
                );
            }
            Ok(eligible)
        }
        None => Ok(true),
    }
}
