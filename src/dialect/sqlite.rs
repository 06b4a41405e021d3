//! SQLite SQL dialect.
//!
//! SQLite stores values by type affinity, so the engine-neutral column types
//! collapse onto INTEGER, REAL, NUMERIC, TEXT, BLOB and the date affinities.

use super::{check_column_type, check_index_name, quote_with, Dialect, EngineId, IntrospectionQuery};
use crate::error::{MigrationError, Result};
use crate::schema::{Column, ColumnType, Index};

/// SQLite dialect implementation (SQLite 3.25+).
#[derive(Debug, Clone, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Create a new SQLite dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn driver_name(&self) -> EngineId {
        EngineId::Sqlite
    }

    fn quote(&self, name: &str) -> String {
        quote_with(name, '"')
    }

    fn sql_type(&self, column: &Column) -> Result<String> {
        check_column_type(EngineId::Sqlite, column)?;

        let sql = match column.column_type() {
            ColumnType::Bool | ColumnType::SmallInt | ColumnType::Int | ColumnType::BigInt => {
                "INTEGER"
            }
            ColumnType::Float | ColumnType::Double => "REAL",
            ColumnType::Decimal { .. } => "NUMERIC",
            ColumnType::Char(_)
            | ColumnType::Varchar(_)
            | ColumnType::NVarchar(_)
            | ColumnType::Text
            | ColumnType::MediumText
            | ColumnType::LongText => "TEXT",
            ColumnType::Blob => "BLOB",
            ColumnType::DateTime => "DATETIME",
            ColumnType::Date => "DATE",
            ColumnType::Uuid => {
                return Err(MigrationError::unsupported(
                    EngineId::Sqlite,
                    format!("native UUID column '{}'", column.name()),
                ))
            }
            ColumnType::Json => {
                return Err(MigrationError::unsupported(
                    EngineId::Sqlite,
                    format!("JSON column '{}'", column.name()),
                ))
            }
        };
        Ok(sql.to_string())
    }

    fn auto_increment_sql(
        &self,
        column: &Column,
        inline_primary_key: bool,
    ) -> Result<Option<&'static str>> {
        // AUTOINCREMENT is only legal on a single-column INTEGER PRIMARY KEY
        if !inline_primary_key {
            return Err(MigrationError::unsupported(
                EngineId::Sqlite,
                format!(
                    "auto-increment on '{}' outside a single-column primary key",
                    column.name()
                ),
            ));
        }
        Ok(Some("AUTOINCREMENT"))
    }

    fn drop_index_sql(&self, table_name: &str, index: &Index) -> Result<String> {
        check_index_name(table_name, index)?;
        Ok(format!(
            "DROP INDEX {}",
            self.quote(&index.qualified_name(table_name))
        ))
    }

    fn table_exists_query(&self, table_name: &str) -> IntrospectionQuery {
        IntrospectionQuery::new(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
            vec![table_name.to_string()],
        )
    }

    fn index_exists_query(&self, table_name: &str, index_name: &str) -> IntrospectionQuery {
        IntrospectionQuery::new(
            "SELECT 1 FROM sqlite_master WHERE type = 'index' AND tbl_name = ? AND name = ?",
            vec![table_name.to_string(), index_name.to_string()],
        )
    }

    fn column_exists_query(&self, table_name: &str, column_name: &str) -> IntrospectionQuery {
        IntrospectionQuery::new(
            "SELECT 1 FROM pragma_table_info(?) WHERE name = ?",
            vec![table_name.to_string(), column_name.to_string()],
        )
    }
}
