//! PostgreSQL SQL dialect.

use super::{check_column_type, check_index_name, quote_with, Dialect, EngineId, IntrospectionQuery};
use crate::error::{MigrationError, Result};
use crate::schema::{Column, ColumnType, Index};

/// PostgreSQL dialect implementation.
///
/// Auto-increment columns are expressed through the `SERIAL` family of types
/// rather than a keyword.
#[derive(Debug, Clone, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Create a new PostgreSQL dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn driver_name(&self) -> EngineId {
        EngineId::Postgres
    }

    fn quote(&self, name: &str) -> String {
        quote_with(name, '"')
    }

    fn sql_type(&self, column: &Column) -> Result<String> {
        check_column_type(EngineId::Postgres, column)?;

        if column.is_auto_increment() {
            let serial = match column.column_type() {
                ColumnType::SmallInt => "SMALLSERIAL",
                ColumnType::Int => "SERIAL",
                ColumnType::BigInt => "BIGSERIAL",
                _ => {
                    return Err(MigrationError::unsupported(
                        EngineId::Postgres,
                        format!("auto-increment on non-integer column '{}'", column.name()),
                    ))
                }
            };
            return Ok(serial.to_string());
        }

        let sql = match column.column_type() {
            ColumnType::Bool => "BOOL".to_string(),
            ColumnType::SmallInt => "SMALLINT".to_string(),
            ColumnType::Int => "INTEGER".to_string(),
            ColumnType::BigInt => "BIGINT".to_string(),
            ColumnType::Float => "REAL".to_string(),
            ColumnType::Double => "DOUBLE PRECISION".to_string(),
            ColumnType::Decimal { precision, scale } => format!("NUMERIC({}, {})", precision, scale),
            ColumnType::Char(len) => format!("CHAR({})", len),
            ColumnType::Varchar(len) => format!("VARCHAR({})", len),
            ColumnType::Text | ColumnType::MediumText | ColumnType::LongText => "TEXT".to_string(),
            ColumnType::Blob => "BYTEA".to_string(),
            ColumnType::DateTime => "TIMESTAMP".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::Uuid => "UUID".to_string(),
            ColumnType::Json => "JSON".to_string(),
            ColumnType::NVarchar(_) => {
                return Err(MigrationError::unsupported(
                    EngineId::Postgres,
                    format!("national character column '{}'", column.name()),
                ))
            }
        };
        Ok(sql)
    }

    fn auto_increment_sql(
        &self,
        _column: &Column,
        _inline_primary_key: bool,
    ) -> Result<Option<&'static str>> {
        // carried by the SERIAL type
        Ok(None)
    }

    fn default_value(&self, column: &Column) -> Option<String> {
        let default = column.default_sql()?;
        if column.column_type() == ColumnType::Bool {
            match default {
                "0" => return Some("FALSE".to_string()),
                "1" => return Some("TRUE".to_string()),
                _ => {}
            }
        }
        Some(default.to_string())
    }

    fn drop_index_sql(&self, table_name: &str, index: &Index) -> Result<String> {
        check_index_name(table_name, index)?;
        Ok(format!(
            "DROP INDEX {} CASCADE",
            self.quote(&index.qualified_name(table_name))
        ))
    }

    fn table_exists_query(&self, table_name: &str) -> IntrospectionQuery {
        IntrospectionQuery::new(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_name = $1",
            vec![table_name.to_string()],
        )
    }

    fn index_exists_query(&self, table_name: &str, index_name: &str) -> IntrospectionQuery {
        IntrospectionQuery::new(
            "SELECT 1 FROM pg_indexes \
             WHERE schemaname = current_schema() AND tablename = $1 AND indexname = $2",
            vec![table_name.to_string(), index_name.to_string()],
        )
    }

    fn column_exists_query(&self, table_name: &str, column_name: &str) -> IntrospectionQuery {
        IntrospectionQuery::new(
            "SELECT 1 FROM information_schema.columns \
             WHERE table_schema = current_schema() AND table_name = $1 AND column_name = $2",
            vec![table_name.to_string(), column_name.to_string()],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Table;

    #[test]
    fn test_serial_primary_key() {
        let table = Table::new("org")
            .with_column(Column::new("id", ColumnType::BigInt).primary_key().auto_increment())
            .with_column(Column::new("name", ColumnType::Varchar(190)))
            .with_column(Column::new("is_public", ColumnType::Bool).default_value("0"));

        let sql = PostgresDialect::new().create_table_sql(&table).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS \"org\" (\n    \
             \"id\" BIGSERIAL PRIMARY KEY NOT NULL,\n    \
             \"name\" VARCHAR(190) NOT NULL,\n    \
             \"is_public\" BOOL NOT NULL DEFAULT FALSE\n)"
        );
    }

    #[test]
    fn test_auto_increment_on_text_unsupported() {
        let column = Column::new("slug", ColumnType::Text).auto_increment();
        let err = PostgresDialect::new().column_sql(&column, true).unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_nvarchar_unsupported() {
        let column = Column::new("label", ColumnType::NVarchar(20));
        assert!(PostgresDialect::new().sql_type(&column).is_err());
    }

    #[test]
    fn test_drop_index_cascade() {
        let index = Index::new(["org_id"]);
        assert_eq!(
            PostgresDialect::new().drop_index_sql("team", &index).unwrap(),
            "DROP INDEX \"IDX_team_org_id\" CASCADE"
        );
    }

    #[test]
    fn test_introspection_uses_numbered_placeholders() {
        let query = PostgresDialect::new().index_exists_query("team", "IDX_team_org_id");
        assert!(query.sql.contains("$1") && query.sql.contains("$2"));
        assert_eq!(query.args, vec!["team".to_string(), "IDX_team_org_id".to_string()]);
    }
}
