use super::{migration_builder, Migration, MigrationBase};
use crate::condition::IfIndexExistsCondition;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::schema::Index;

/// `CREATE [UNIQUE] INDEX`
#[derive(Debug)]
pub struct AddIndexMigration {
    base: MigrationBase,
    table_name: String,
    index: Index,
}

migration_builder!(AddIndexMigration);

impl AddIndexMigration {
    pub fn new(table_name: impl Into<String>, index: Index) -> Self {
        Self {
            base: MigrationBase::default(),
            table_name: table_name.into(),
            index,
        }
    }

    /// Move the migration to another table
    pub fn table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Replace the index with a plain one over `columns`
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index = Index::new(columns);
        self
    }

    /// Make the index unique
    pub fn unique(mut self) -> Self {
        self.index = self.index.unique();
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn index(&self) -> &Index {
        &self.index
    }
}

impl Migration for AddIndexMigration {
    fn base(&self) -> &MigrationBase {
        &self.base
    }

    fn sql(&self, dialect: &dyn Dialect) -> Result<String> {
        dialect.create_index_sql(&self.table_name, &self.index)
    }
}

/// `DROP INDEX`; an unnamed index resolves its name from its columns
#[derive(Debug)]
pub struct DropIndexMigration {
    base: MigrationBase,
    table_name: String,
    index: Index,
}

migration_builder!(DropIndexMigration);

impl DropIndexMigration {
    pub fn new(table_name: impl Into<String>, index: Index) -> Self {
        Self {
            base: MigrationBase::default(),
            table_name: table_name.into(),
            index,
        }
    }

    /// Move the migration to another table
    pub fn table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self.refresh_condition()
    }

    /// Replace the index with a plain one over `columns`
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index = Index::new(columns);
        self.refresh_condition()
    }

    /// Target the unique variant (`UQE_` prefix)
    pub fn unique(mut self) -> Self {
        self.index = self.index.unique();
        self.refresh_condition()
    }

    /// Only run while the index is still present.
    ///
    /// The check follows later `table`, `columns` and `unique` calls.
    pub fn if_index_exists(mut self) -> Self {
        let condition = self.index_condition();
        self.base.set_derived_condition(Box::new(condition));
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    fn index_condition(&self) -> IfIndexExistsCondition {
        IfIndexExistsCondition::new(&self.table_name, self.index.qualified_name(&self.table_name))
    }

    fn refresh_condition(mut self) -> Self {
        if self.base.has_derived_condition() {
            let condition = self.index_condition();
            self.base.set_derived_condition(Box::new(condition));
        }
        self
    }
}

impl Migration for DropIndexMigration {
    fn base(&self) -> &MigrationBase {
        &self.base
    }

    fn sql(&self, dialect: &dyn Dialect) -> Result<String> {
        dialect.drop_index_sql(&self.table_name, &self.index)
    }
}
