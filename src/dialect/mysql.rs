//! MySQL/MariaDB SQL dialect.

use super::{check_column_type, check_index_name, quote_with, Dialect, EngineId, IntrospectionQuery};
use crate::error::{MigrationError, Result};
use crate::schema::{Column, ColumnType, Index};

/// MySQL/MariaDB dialect implementation.
///
/// Compatible with MySQL 5.7+, 8.0+, and MariaDB 10.2+.
#[derive(Debug, Clone, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Create a new MySQL dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for MysqlDialect {
    fn driver_name(&self) -> EngineId {
        EngineId::Mysql
    }

    fn quote(&self, name: &str) -> String {
        // MySQL uses backticks for identifier quoting
        quote_with(name, '`')
    }

    fn sql_type(&self, column: &Column) -> Result<String> {
        check_column_type(EngineId::Mysql, column)?;

        let sql = match column.column_type() {
            ColumnType::Bool => "TINYINT(1)".to_string(),
            ColumnType::SmallInt => "SMALLINT".to_string(),
            ColumnType::Int => "INT".to_string(),
            ColumnType::BigInt => "BIGINT".to_string(),
            ColumnType::Float => "FLOAT".to_string(),
            ColumnType::Double => "DOUBLE".to_string(),
            ColumnType::Decimal { precision, scale } => format!("DECIMAL({}, {})", precision, scale),
            ColumnType::Char(len) => format!("CHAR({})", len),
            ColumnType::Varchar(len) => format!("VARCHAR({})", len),
            ColumnType::NVarchar(len) => format!("NVARCHAR({})", len),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::MediumText => "MEDIUMTEXT".to_string(),
            ColumnType::LongText => "LONGTEXT".to_string(),
            ColumnType::Blob => "BLOB".to_string(),
            ColumnType::DateTime => "DATETIME".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::Json => "JSON".to_string(),
            ColumnType::Uuid => {
                return Err(MigrationError::unsupported(
                    EngineId::Mysql,
                    format!("native UUID column '{}'", column.name()),
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
        Ok(Some("AUTO_INCREMENT"))
    }

    fn create_table_suffix(&self) -> &'static str {
        " ENGINE=InnoDB DEFAULT CHARSET=utf8mb4"
    }

    fn drop_index_sql(&self, table_name: &str, index: &Index) -> Result<String> {
        check_index_name(table_name, index)?;
        Ok(format!(
            "DROP INDEX {} ON {}",
            self.quote(&index.qualified_name(table_name)),
            self.quote(table_name)
        ))
    }

    fn rename_table_sql(&self, old_name: &str, new_name: &str) -> String {
        format!("RENAME TABLE {} TO {}", self.quote(old_name), self.quote(new_name))
    }

    fn table_exists_query(&self, table_name: &str) -> IntrospectionQuery {
        IntrospectionQuery::new(
            "SELECT `TABLE_NAME` FROM `INFORMATION_SCHEMA`.`TABLES` \
             WHERE `TABLE_SCHEMA` = DATABASE() AND `TABLE_NAME` = ?",
            vec![table_name.to_string()],
        )
    }

    fn index_exists_query(&self, table_name: &str, index_name: &str) -> IntrospectionQuery {
        IntrospectionQuery::new(
            "SELECT 1 FROM `INFORMATION_SCHEMA`.`STATISTICS` \
             WHERE `TABLE_SCHEMA` = DATABASE() AND `TABLE_NAME` = ? AND `INDEX_NAME` = ?",
            vec![table_name.to_string(), index_name.to_string()],
        )
    }

    fn column_exists_query(&self, table_name: &str, column_name: &str) -> IntrospectionQuery {
        IntrospectionQuery::new(
            "SELECT 1 FROM `INFORMATION_SCHEMA`.`COLUMNS` \
             WHERE `TABLE_SCHEMA` = DATABASE() AND `TABLE_NAME` = ? AND `COLUMN_NAME` = ?",
            vec![table_name.to_string(), column_name.to_string()],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Table;

    #[test]
    fn test_quote_ident() {
        let dialect = MysqlDialect::new();
        assert_eq!(dialect.quote("name"), "`name`");
        assert_eq!(dialect.quote("table`name"), "`table``name`");
    }

    #[test]
    fn test_create_table_single_primary_key() {
        let table = Table::new("user")
            .with_column(
                Column::new("id", ColumnType::BigInt)
                    .primary_key()
                    .auto_increment(),
            )
            .with_column(Column::new("login", ColumnType::Varchar(190)))
            .with_column(Column::new("is_admin", ColumnType::Bool).default_value("0"));

        let sql = MysqlDialect::new().create_table_sql(&table).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS `user` (\n    \
             `id` BIGINT PRIMARY KEY AUTO_INCREMENT NOT NULL,\n    \
             `login` VARCHAR(190) NOT NULL,\n    \
             `is_admin` TINYINT(1) NOT NULL DEFAULT 0\n\
             ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4"
        );
    }

    #[test]
    fn test_create_table_composite_primary_key() {
        let table = Table::new("team_member")
            .with_column(Column::new("team_id", ColumnType::BigInt).primary_key())
            .with_column(Column::new("user_id", ColumnType::BigInt).primary_key());

        let sql = MysqlDialect::new().create_table_sql(&table).unwrap();
        assert!(sql.contains("`team_id` BIGINT NOT NULL,"));
        assert!(sql.contains("PRIMARY KEY (`team_id`, `user_id`)"));
    }

    #[test]
    fn test_rename_and_drop_index() {
        let dialect = MysqlDialect::new();
        assert_eq!(
            dialect.rename_table_sql("old_t", "new_t"),
            "RENAME TABLE `old_t` TO `new_t`"
        );
        let index = Index::new(["org_id", "login"]).unique();
        assert_eq!(
            dialect.drop_index_sql("user", &index).unwrap(),
            "DROP INDEX `UQE_user_org_id_login` ON `user`"
        );
    }

    #[test]
    fn test_uuid_unsupported() {
        let column = Column::new("uid", ColumnType::Uuid);
        let err = MysqlDialect::new().sql_type(&column).unwrap_err();
        assert!(matches!(
            err,
            MigrationError::UnsupportedFeature { engine: EngineId::Mysql, .. }
        ));
    }

    #[test]
    fn test_table_exists_query_uses_question_marks() {
        let query = MysqlDialect::new().table_exists_query("user");
        assert!(query.sql.ends_with("`TABLE_NAME` = ?"));
        assert_eq!(query.args, vec!["user".to_string()]);
    }

    #[test]
    fn test_column_exists_query() {
        let query = MysqlDialect::new().column_exists_query("user", "theme");
        assert!(query.sql.contains("`INFORMATION_SCHEMA`.`COLUMNS`"));
        assert!(query.sql.ends_with("`TABLE_NAME` = ? AND `COLUMN_NAME` = ?"));
        assert_eq!(query.args, vec!["user".to_string(), "theme".to_string()]);
    }
}
