use std::collections::BTreeMap;

use super::{migration_builder, Migration, MigrationBase};
use crate::condition::IfTableExistsCondition;
use crate::dialect::Dialect;
use crate::error::{MigrationError, Result};
use crate::schema::{Column, Table};

/// `CREATE TABLE` from an owned [`Table`]
#[derive(Debug)]
pub struct AddTableMigration {
    base: MigrationBase,
    table: Table,
}

migration_builder!(AddTableMigration);

impl AddTableMigration {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            base: MigrationBase::default(),
            table: Table::new(table_name),
        }
    }

    /// Start from an already assembled table
    pub fn from_table(table: Table) -> Self {
        Self {
            base: MigrationBase::default(),
            table,
        }
    }

    /// Rename the table being created
    pub fn name(mut self, table_name: impl Into<String>) -> Self {
        self.table.set_name(table_name);
        self
    }

    /// Append a column, recording it as a primary key when flagged
    pub fn with_column(mut self, column: Column) -> Self {
        self.table.add_column(column);
        self
    }

    pub fn with_columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        for column in columns {
            self.table.add_column(column);
        }
        self
    }

    pub fn table(&self) -> &Table {
        &self.table
    }
}

impl Migration for AddTableMigration {
    fn base(&self) -> &MigrationBase {
        &self.base
    }

    fn sql(&self, dialect: &dyn Dialect) -> Result<String> {
        dialect.create_table_sql(&self.table)
    }
}

/// `DROP TABLE IF EXISTS`
#[derive(Debug)]
pub struct DropTableMigration {
    base: MigrationBase,
    table_name: String,
}

migration_builder!(DropTableMigration);

impl DropTableMigration {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            base: MigrationBase::default(),
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

impl Migration for DropTableMigration {
    fn base(&self) -> &MigrationBase {
        &self.base
    }

    fn sql(&self, dialect: &dyn Dialect) -> Result<String> {
        Ok(dialect.drop_table_sql(&self.table_name))
    }
}

/// Rename a table, optionally gated on the old table existing
#[derive(Debug)]
pub struct RenameTableMigration {
    base: MigrationBase,
    old_name: String,
    new_name: String,
}

migration_builder!(RenameTableMigration);

impl RenameTableMigration {
    pub fn new(old_name: impl Into<String>) -> Self {
        Self {
            base: MigrationBase::default(),
            old_name: old_name.into(),
            new_name: String::new(),
        }
    }

    pub fn rename(mut self, new_name: impl Into<String>) -> Self {
        self.new_name = new_name.into();
        self
    }

    /// Only run while the old table exists
    pub fn if_table_exists(self) -> Self {
        let condition = IfTableExistsCondition::new(&self.old_name);
        self.with_condition(condition)
    }

    pub fn old_name(&self) -> &str {
        &self.old_name
    }

    pub fn new_name(&self) -> &str {
        &self.new_name
    }
}

impl Migration for RenameTableMigration {
    fn base(&self) -> &MigrationBase {
        &self.base
    }

    fn sql(&self, dialect: &dyn Dialect) -> Result<String> {
        if self.new_name.is_empty() {
            return Err(MigrationError::invalid(format!(
                "rename of '{}' has no target name",
                self.old_name
            )));
        }
        Ok(dialect.rename_table_sql(&self.old_name, &self.new_name))
    }
}

/// `INSERT INTO target (..) SELECT .. FROM source`
///
/// Built from a target-column to source-column mapping. The pairs are laid
/// out sorted by target column name, so the rendered text does not depend on
/// the order the mapping was supplied in.
#[derive(Debug)]
pub struct CopyTableDataMigration {
    base: MigrationBase,
    source_table: String,
    target_table: String,
    source_columns: Vec<String>,
    target_columns: Vec<String>,
}

migration_builder!(CopyTableDataMigration);

impl CopyTableDataMigration {
    /// `columns` maps each target column to the source column it is copied from
    pub fn new<I, K, V>(
        target_table: impl Into<String>,
        source_table: impl Into<String>,
        columns: I,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mapping: BTreeMap<String, String> = columns
            .into_iter()
            .map(|(target, source)| (target.into(), source.into()))
            .collect();
        let (target_columns, source_columns) = mapping.into_iter().unzip();

        Self {
            base: MigrationBase::default(),
            source_table: source_table.into(),
            target_table: target_table.into(),
            source_columns,
            target_columns,
        }
    }

    /// Only run while the source table exists
    pub fn if_table_exists(self) -> Self {
        let condition = IfTableExistsCondition::new(&self.source_table);
        self.with_condition(condition)
    }

    pub fn source_columns(&self) -> &[String] {
        &self.source_columns
    }

    pub fn target_columns(&self) -> &[String] {
        &self.target_columns
    }
}

impl Migration for CopyTableDataMigration {
    fn base(&self) -> &MigrationBase {
        &self.base
    }

    fn sql(&self, dialect: &dyn Dialect) -> Result<String> {
        dialect.copy_table_data_sql(
            &self.source_table,
            &self.target_table,
            &self.source_columns,
            &self.target_columns,
        )
    }
}
