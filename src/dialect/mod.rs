//! SQL dialects (Strategy pattern).
//!
//! A [`Dialect`] turns schema descriptors into SQL text for exactly one
//! database engine. Every rendering method is a pure function of its inputs,
//! so re-rendering a migration (for example on retry) yields identical text.
//!
//! The trait carries default implementations for the statements whose shape
//! is shared across engines; each engine overrides what differs:
//!
//! - [`MysqlDialect`]: backtick quoting, `RENAME TABLE`, `DROP INDEX .. ON ..`
//! - [`SqliteDialect`]: type affinities, `AUTOINCREMENT` rules
//! - [`PostgresDialect`]: `SERIAL` types, boolean defaults, `DROP INDEX .. CASCADE`

mod mysql;
mod postgres;
mod sqlite;

pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{MigrationError, Result};
use crate::schema::{Column, ColumnType, Index, Table};

/// Identifier of a supported database engine.
///
/// Deserializes through [`FromStr`], so config accepts the same spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum EngineId {
    Mysql,
    Sqlite,
    Postgres,
}

impl EngineId {
    /// Every supported engine
    pub const ALL: [EngineId; 3] = [EngineId::Mysql, EngineId::Sqlite, EngineId::Postgres];

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineId::Mysql => "mysql",
            EngineId::Sqlite => "sqlite",
            EngineId::Postgres => "postgres",
        }
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineId {
    type Err = MigrationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(EngineId::Mysql),
            "sqlite" | "sqlite3" => Ok(EngineId::Sqlite),
            "postgres" | "postgresql" => Ok(EngineId::Postgres),
            _ => Err(MigrationError::Config(format!(
                "Unsupported database engine: {}",
                s
            ))),
        }
    }
}

impl TryFrom<String> for EngineId {
    type Error = MigrationError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.trim().parse()
    }
}

/// Construct the dialect for an engine.
pub fn dialect_for(engine: EngineId) -> Box<dyn Dialect> {
    match engine {
        EngineId::Mysql => Box::new(MysqlDialect::new()),
        EngineId::Sqlite => Box::new(SqliteDialect::new()),
        EngineId::Postgres => Box::new(PostgresDialect::new()),
    }
}

/// Read-only query answering "does this schema object exist?".
///
/// The query returns at least one row when the object exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrospectionQuery {
    /// SQL text using the engine's placeholder syntax
    pub sql: String,
    /// Positional arguments bound to the placeholders
    pub args: Vec<String>,
}

impl IntrospectionQuery {
    pub fn new(sql: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }
}

/// SQL syntax strategy for one database engine.
pub trait Dialect: Send + Sync {
    /// Engine this dialect renders for. Fixed for the lifetime of the instance.
    fn driver_name(&self) -> EngineId;

    /// Quote an identifier, doubling any embedded quote characters.
    fn quote(&self, name: &str) -> String;

    /// Engine type name for a column.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFeature` if the engine has no faithful equivalent.
    fn sql_type(&self, column: &Column) -> Result<String>;

    /// Auto-increment keyword for `column`, placed after an inline `PRIMARY KEY`.
    ///
    /// `inline_primary_key` is true when the column is the table's only
    /// primary-key column and the key is declared on the column itself.
    fn auto_increment_sql(&self, column: &Column, inline_primary_key: bool)
        -> Result<Option<&'static str>>;

    /// `DROP INDEX` statement, using the index's qualified name.
    fn drop_index_sql(&self, table_name: &str, index: &Index) -> Result<String>;

    /// Query returning a row when `table_name` exists.
    fn table_exists_query(&self, table_name: &str) -> IntrospectionQuery;

    /// Query returning a row when an index named `index_name` exists on `table_name`.
    fn index_exists_query(&self, table_name: &str, index_name: &str) -> IntrospectionQuery;

    /// Query returning a row when `column_name` exists on `table_name`.
    fn column_exists_query(&self, table_name: &str, column_name: &str) -> IntrospectionQuery;

    /// Rendered default value for a column, if it has one
    fn default_value(&self, column: &Column) -> Option<String> {
        column.default_sql().map(str::to_string)
    }

    /// Trailing table options appended after the closing parenthesis of `CREATE TABLE`
    fn create_table_suffix(&self) -> &'static str {
        ""
    }

    /// Column fragment used by `CREATE TABLE` and `ADD COLUMN`.
    fn column_sql(&self, column: &Column, inline_primary_key: bool) -> Result<String> {
        if column.is_auto_increment() && !column.column_type().is_integer() {
            return Err(MigrationError::unsupported(
                self.driver_name(),
                format!("auto-increment on non-integer column '{}'", column.name()),
            ));
        }

        let mut sql = format!("{} {}", self.quote(column.name()), self.sql_type(column)?);

        if inline_primary_key {
            sql.push_str(" PRIMARY KEY");
        }
        if column.is_auto_increment() {
            if let Some(keyword) = self.auto_increment_sql(column, inline_primary_key)? {
                sql.push(' ');
                sql.push_str(keyword);
            }
        }

        if column.is_nullable() {
            sql.push_str(" NULL");
        } else {
            sql.push_str(" NOT NULL");
        }

        if let Some(default) = self.default_value(column) {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default);
        }

        Ok(sql)
    }

    /// One complete `CREATE TABLE` statement.
    ///
    /// A single primary-key column is declared inline; a composite key is a
    /// trailing `PRIMARY KEY (..)` clause in column-append order.
    fn create_table_sql(&self, table: &Table) -> Result<String> {
        if table.columns().is_empty() {
            return Err(MigrationError::invalid(format!(
                "table '{}' has no columns",
                table.name()
            )));
        }
        let mut seen = HashSet::with_capacity(table.columns().len());
        if let Some(dup) = table.columns().iter().find(|c| !seen.insert(c.name())) {
            return Err(MigrationError::invalid(format!(
                "table '{}' declares column '{}' more than once",
                table.name(),
                dup.name()
            )));
        }

        let inline = table.primary_keys().len() == 1;
        let mut parts = Vec::with_capacity(table.columns().len() + 1);
        for column in table.columns() {
            parts.push(self.column_sql(column, inline && column.is_primary_key())?);
        }

        if table.primary_keys().len() > 1 {
            parts.push(format!("PRIMARY KEY ({})", self.quote_list(table.primary_keys())));
        }

        Ok(format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n){}",
            self.quote(table.name()),
            parts.join(",\n    "),
            self.create_table_suffix()
        ))
    }

    /// `ALTER TABLE .. ADD COLUMN ..`
    fn add_column_sql(&self, table_name: &str, column: &Column) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.quote(table_name),
            self.column_sql(column, false)?
        ))
    }

    /// `CREATE [UNIQUE] INDEX`, columns in index key order.
    fn create_index_sql(&self, table_name: &str, index: &Index) -> Result<String> {
        if index.columns().is_empty() {
            return Err(MigrationError::invalid(format!(
                "index on '{}' has no columns",
                table_name
            )));
        }

        let unique = if index.is_unique() { "UNIQUE " } else { "" };
        Ok(format!(
            "CREATE {}INDEX {} ON {} ({})",
            unique,
            self.quote(&index.qualified_name(table_name)),
            self.quote(table_name),
            self.quote_list(index.columns())
        ))
    }

    fn drop_table_sql(&self, table_name: &str) -> String {
        format!("DROP TABLE IF EXISTS {}", self.quote(table_name))
    }

    fn rename_table_sql(&self, old_name: &str, new_name: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME TO {}",
            self.quote(old_name),
            self.quote(new_name)
        )
    }

    /// `INSERT INTO target (..) SELECT .. FROM source`, pairing columns by position.
    fn copy_table_data_sql(
        &self,
        source_table: &str,
        target_table: &str,
        source_columns: &[String],
        target_columns: &[String],
    ) -> Result<String> {
        if source_columns.is_empty() || source_columns.len() != target_columns.len() {
            return Err(MigrationError::invalid(format!(
                "copy from '{}' to '{}' needs matching non-empty column lists ({} source, {} target)",
                source_table,
                target_table,
                source_columns.len(),
                target_columns.len()
            )));
        }

        Ok(format!(
            "INSERT INTO {} ({}) SELECT {} FROM {}",
            self.quote(target_table),
            self.quote_list(target_columns),
            self.quote_list(source_columns),
            self.quote(source_table)
        ))
    }

    /// Quote and comma-join a list of identifiers
    fn quote_list(&self, names: &[String]) -> String {
        names
            .iter()
            .map(|n| self.quote(n))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Quote `name` with `quote`, doubling embedded quote characters.
pub(crate) fn quote_with(name: &str, quote: char) -> String {
    let escaped = name.replace(quote, &format!("{quote}{quote}"));
    format!("{quote}{escaped}{quote}")
}

/// An index needs either an explicit name or columns to derive one from.
pub(crate) fn check_index_name(table_name: &str, index: &Index) -> Result<()> {
    if index.name().is_none() && index.columns().is_empty() {
        return Err(MigrationError::invalid(format!(
            "cannot name an index on '{}' without columns",
            table_name
        )));
    }
    Ok(())
}

/// Checks shared by every engine's type mapping.
pub(crate) fn check_column_type(engine: EngineId, column: &Column) -> Result<()> {
    if column.column_type().length() == Some(0) {
        return Err(MigrationError::unsupported(
            engine,
            format!("zero-length character column '{}'", column.name()),
        ));
    }
    if let ColumnType::Decimal { precision, scale } = column.column_type() {
        if precision == 0 || scale > precision {
            return Err(MigrationError::invalid(format!(
                "column '{}' has invalid DECIMAL({}, {})",
                column.name(),
                precision,
                scale
            )));
        }
    }
    Ok(())
}
