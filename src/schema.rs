//! Schema descriptors: passive data describing tables, columns and indexes.
//!
//! Descriptors carry no engine knowledge. A [`Dialect`](crate::dialect::Dialect)
//! turns them into SQL.

use once_cell::sync::OnceCell;

/// Engine-neutral column type.
///
/// Each dialect maps these to its own type names, or reports the type as
/// unsupported when it has no faithful equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Bool,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Decimal { precision: u8, scale: u8 },
    Char(u32),
    Varchar(u32),
    NVarchar(u32),
    Text,
    MediumText,
    LongText,
    Blob,
    DateTime,
    Date,
    Uuid,
    Json,
}

impl ColumnType {
    /// Whether the type can back an auto-increment column
    pub fn is_integer(&self) -> bool {
        matches!(self, ColumnType::SmallInt | ColumnType::Int | ColumnType::BigInt)
    }

    /// Declared length for fixed/variable character types
    pub fn length(&self) -> Option<u32> {
        match self {
            ColumnType::Char(len) | ColumnType::Varchar(len) | ColumnType::NVarchar(len) => {
                Some(*len)
            }
            _ => None,
        }
    }
}

/// Column descriptor
///
/// # Example
///
/// ```
/// use sqlmigrator::{Column, ColumnType};
///
/// let id = Column::new("id", ColumnType::BigInt).primary_key().auto_increment();
/// let login = Column::new("login", ColumnType::Varchar(190));
/// let email = Column::new("email", ColumnType::Varchar(190)).nullable();
/// assert!(id.is_primary_key());
/// assert!(!login.is_nullable());
/// assert!(email.is_nullable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    nullable: bool,
    default: Option<String>,
    is_primary_key: bool,
    is_auto_increment: bool,
}

impl Column {
    /// Create a non-nullable column with no default
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            default: None,
            is_primary_key: false,
            is_auto_increment: false,
        }
    }

    /// Allow NULL values
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Set the default as a raw SQL literal (`'0'`, `0`, `CURRENT_TIMESTAMP`)
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Mark the column as part of the primary key
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Mark the column as auto-incrementing
    pub fn auto_increment(mut self) -> Self {
        self.is_auto_increment = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn default_sql(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn is_primary_key(&self) -> bool {
        self.is_primary_key
    }

    pub fn is_auto_increment(&self) -> bool {
        self.is_auto_increment
    }
}

/// Index kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexKind {
    #[default]
    Plain,
    Unique,
}

/// Index descriptor
///
/// Column order is the index key order. When no explicit name is set, the name
/// is derived from the columns the first time it is needed and cached on the
/// instance, so repeated renders always agree.
#[derive(Debug, Clone, Default)]
pub struct Index {
    columns: Vec<String>,
    name: Option<String>,
    kind: IndexKind,
    derived_name: OnceCell<String>,
}

impl Index {
    /// Create a plain index over `columns`
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Give the index an explicit name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Make the index unique
    pub fn unique(mut self) -> Self {
        self.kind = IndexKind::Unique;
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    pub fn is_unique(&self) -> bool {
        self.kind == IndexKind::Unique
    }

    /// Explicit name, if one was set
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Explicit name, or the column names joined with `_`
    pub fn resolved_name(&self) -> &str {
        match &self.name {
            Some(name) => name,
            None => self.derived_name.get_or_init(|| self.columns.join("_")),
        }
    }

    /// Name as it appears in SQL: `IDX_<table>_<name>` or `UQE_<table>_<name>`.
    ///
    /// Names already carrying one of those prefixes are used as-is.
    pub fn qualified_name(&self, table_name: &str) -> String {
        let name = self.resolved_name();
        if name.starts_with("IDX_") || name.starts_with("UQE_") {
            return name.to_string();
        }
        match self.kind {
            IndexKind::Unique => format!("UQE_{}_{}", table_name, name),
            IndexKind::Plain => format!("IDX_{}_{}", table_name, name),
        }
    }
}

impl PartialEq for Index {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns && self.name == other.name && self.kind == other.kind
    }
}

impl Eq for Index {}

/// Table descriptor
///
/// Columns keep insertion order, which is the column order of the rendered DDL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    primary_keys: Vec<String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a column; primary-key columns are recorded in the same step.
    ///
    /// Duplicate names are kept here and rejected when the table is rendered.
    pub fn add_column(&mut self, column: Column) {
        if column.is_primary_key() && !self.primary_keys.iter().any(|pk| pk == column.name()) {
            self.primary_keys.push(column.name().to_string());
        }
        self.columns.push(column);
    }

    /// Builder form of [`Table::add_column`]
    pub fn with_column(mut self, column: Column) -> Self {
        self.add_column(column);
        self
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn primary_keys(&self) -> &[String] {
        &self.primary_keys
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }
}
