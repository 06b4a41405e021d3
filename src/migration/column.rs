use super::{migration_builder, Migration, MigrationBase};
use crate::condition::IfColumnNotExistsCondition;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::schema::Column;

/// `ALTER TABLE .. ADD COLUMN ..` for exactly one column
#[derive(Debug)]
pub struct AddColumnMigration {
    base: MigrationBase,
    table_name: String,
    column: Column,
}

migration_builder!(AddColumnMigration);

impl AddColumnMigration {
    pub fn new(table_name: impl Into<String>, column: Column) -> Self {
        Self {
            base: MigrationBase::default(),
            table_name: table_name.into(),
            column,
        }
    }

    pub fn table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        if self.base.has_derived_condition() {
            let condition = self.column_condition();
            self.base.set_derived_condition(Box::new(condition));
        }
        self
    }

    /// Only run while the column is still missing; follows later `table` calls
    pub fn if_column_not_exists(mut self) -> Self {
        let condition = self.column_condition();
        self.base.set_derived_condition(Box::new(condition));
        self
    }

    fn column_condition(&self) -> IfColumnNotExistsCondition {
        IfColumnNotExistsCondition::new(&self.table_name, self.column.name())
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn column(&self) -> &Column {
        &self.column
    }
}

impl Migration for AddColumnMigration {
    fn base(&self) -> &MigrationBase {
        &self.base
    }

    fn sql(&self, dialect: &dyn Dialect) -> Result<String> {
        dialect.add_column_sql(&self.table_name, &self.column)
    }
}
