//! Runtime gates deciding whether a migration should run.
//!
//! A condition is a stateless predicate. It asks the dialect for an
//! introspection query, runs it through a [`SchemaExecutor`], and reports the
//! answer. Failing to run the query is an error, never a `false`.

use std::fmt;
#[cfg(feature = "metrics")]
use std::time::Instant;

use crate::dialect::{Dialect, IntrospectionQuery};
use crate::error::{MigrationError, Result};
use crate::executor::SchemaExecutor;
#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// Predicate evaluated against the live database before a migration runs
pub trait Condition: fmt::Debug + Send + Sync {
    /// Introspection query this condition runs for `dialect`
    fn query(&self, dialect: &dyn Dialect) -> IntrospectionQuery;

    /// Map "the query returned a row" to the condition's answer
    fn holds(&self, found: bool) -> bool {
        found
    }

    /// Human-readable description used in logs and errors
    fn describe(&self) -> String;

    /// Run the introspection query and decide.
    ///
    /// # Errors
    ///
    /// Returns `ConditionEvaluation` when the executor fails.
    fn evaluate(&self, dialect: &dyn Dialect, executor: &dyn SchemaExecutor) -> Result<bool> {
        let description = self.describe();
        #[cfg(feature = "tracing")]
        let _span =
            tracing_helpers::condition_span(&description, dialect.driver_name().as_str()).entered();
        #[cfg(feature = "metrics")]
        let start = Instant::now();

        let query = self.query(dialect);
        let found = executor.query_exists(&query.sql, &query.args).map_err(|source| {
            #[cfg(feature = "metrics")]
            METRICS.record_condition_error(dialect.driver_name());
            log::warn!("condition {} could not be evaluated: {}", description, source);
            MigrationError::ConditionEvaluation {
                condition: description.clone(),
                source,
            }
        })?;

        #[cfg(feature = "metrics")]
        METRICS.record_condition(dialect.driver_name(), start.elapsed());

        let holds = self.holds(found);
        log::debug!("condition {} evaluated to {}", description, holds);
        Ok(holds)
    }
}

/// Holds when the table exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfTableExistsCondition {
    table_name: String,
}

impl IfTableExistsCondition {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

impl Condition for IfTableExistsCondition {
    fn query(&self, dialect: &dyn Dialect) -> IntrospectionQuery {
        dialect.table_exists_query(&self.table_name)
    }

    fn describe(&self) -> String {
        format!("table '{}' exists", self.table_name)
    }
}

/// Holds when the named index exists on the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfIndexExistsCondition {
    table_name: String,
    index_name: String,
}

impl IfIndexExistsCondition {
    /// `index_name` is the name as it appears in the database (e.g. `IDX_user_login`)
    pub fn new(table_name: impl Into<String>, index_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            index_name: index_name.into(),
        }
    }
}

impl Condition for IfIndexExistsCondition {
    fn query(&self, dialect: &dyn Dialect) -> IntrospectionQuery {
        dialect.index_exists_query(&self.table_name, &self.index_name)
    }

    fn describe(&self) -> String {
        format!("index '{}' exists on '{}'", self.index_name, self.table_name)
    }
}

/// Holds when the column is absent from the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfColumnNotExistsCondition {
    table_name: String,
    column_name: String,
}

impl IfColumnNotExistsCondition {
    pub fn new(table_name: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
        }
    }
}

impl Condition for IfColumnNotExistsCondition {
    fn query(&self, dialect: &dyn Dialect) -> IntrospectionQuery {
        dialect.column_exists_query(&self.table_name, &self.column_name)
    }

    fn holds(&self, found: bool) -> bool {
        !found
    }

    fn describe(&self) -> String {
        format!(
            "column '{}' does not exist on '{}'",
            self.column_name, self.table_name
        )
    }
}
