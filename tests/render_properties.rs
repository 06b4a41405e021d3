//! Rendering properties checked against the public API
//!
//! Every dialect must render the same migration to the same text each time,
//! derive unnamed index names the same way, and fail loudly instead of
//! emitting empty or approximated SQL.

use std::collections::HashMap;

use sqlmigrator::{
    dialect_for, render, AddIndexMigration, AddTableMigration, Column, ColumnType,
    CopyTableDataMigration, Dialect, DropIndexMigration, EngineId, Index, Migration,
    MigrationError, MysqlDialect, PostgresDialect, RawSqlMigration, SqliteDialect,
};

fn user_table() -> AddTableMigration {
    AddTableMigration::new("user")
        .with_id("create user table")
        .with_column(Column::new("id", ColumnType::BigInt).primary_key().auto_increment())
        .with_column(Column::new("version", ColumnType::Int))
        .with_column(Column::new("login", ColumnType::Varchar(190)))
        .with_column(Column::new("email", ColumnType::Varchar(190)))
        .with_column(Column::new("name", ColumnType::Varchar(255)).nullable())
        .with_column(Column::new("is_admin", ColumnType::Bool).default_value("0"))
        .with_column(Column::new("created", ColumnType::DateTime))
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn create_table_is_deterministic_for_every_engine() {
    let migration = user_table();
    for engine in EngineId::ALL {
        let dialect = dialect_for(engine);
        let first = render(&migration, dialect.as_ref()).unwrap();
        let second = render(&migration, dialect.as_ref()).unwrap();
        assert_eq!(first, second, "{engine} rendered differently on retry");
        assert!(first.starts_with("CREATE TABLE IF NOT EXISTS"));
    }
}

#[test]
fn create_table_column_order_follows_append_order() {
    let sql = user_table().sql(&SqliteDialect::new()).unwrap();
    let positions: Vec<usize> = ["\"id\"", "\"version\"", "\"login\"", "\"email\"", "\"created\""]
        .iter()
        .map(|name| sql.find(name).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{sql}");
}

// ============================================================================
// Index naming
// ============================================================================

#[test]
fn drop_index_resolves_name_from_columns() {
    let migration = DropIndexMigration::new("user", Index::new(["org_id", "login"]));
    for engine in EngineId::ALL {
        let dialect = dialect_for(engine);
        let sql = migration.sql(dialect.as_ref()).unwrap();
        assert!(sql.contains("IDX_user_org_id_login"), "{sql}");
        assert_eq!(sql, migration.sql(dialect.as_ref()).unwrap());
    }
    assert_eq!(migration.index().resolved_name(), "org_id_login");
}

#[test]
fn add_index_columns_then_unique() {
    let migration = AddIndexMigration::new("user", Index::new(["ignored"]))
        .columns(["a", "b"])
        .unique();
    assert_eq!(
        migration.sql(&MysqlDialect::new()).unwrap(),
        "CREATE UNIQUE INDEX `UQE_user_a_b` ON `user` (`a`, `b`)"
    );
    assert_eq!(
        migration.sql(&PostgresDialect::new()).unwrap(),
        "CREATE UNIQUE INDEX \"UQE_user_a_b\" ON \"user\" (\"a\", \"b\")"
    );
}

// ============================================================================
// Primary keys
// ============================================================================

#[test]
fn primary_keys_appear_once_in_append_order() {
    let migration = AddTableMigration::new("team_member")
        .with_column(Column::new("org_id", ColumnType::BigInt).primary_key())
        .with_column(Column::new("email", ColumnType::Varchar(190)))
        .with_column(Column::new("team_id", ColumnType::BigInt).primary_key())
        .with_column(Column::new("user_id", ColumnType::BigInt).primary_key());

    assert_eq!(migration.table().primary_keys(), ["org_id", "team_id", "user_id"]);

    let sql = migration.sql(&SqliteDialect::new()).unwrap();
    assert_eq!(sql.matches("PRIMARY KEY").count(), 1);
    assert!(sql.contains("PRIMARY KEY (\"org_id\", \"team_id\", \"user_id\")"));
}

// ============================================================================
// Copy table data
// ============================================================================

#[test]
fn copy_pairs_each_target_with_its_source() {
    let mut mapping = HashMap::new();
    mapping.insert("b", "y");
    mapping.insert("a", "x");

    let migration = CopyTableDataMigration::new("dst", "src", mapping);
    assert_eq!(migration.target_columns(), ["a", "b"]);
    assert_eq!(migration.source_columns(), ["x", "y"]);
    assert_eq!(
        migration.sql(&MysqlDialect::new()).unwrap(),
        "INSERT INTO `dst` (`a`, `b`) SELECT `x`, `y` FROM `src`"
    );
}

// ============================================================================
// Raw SQL dispatch and unsupported shapes
// ============================================================================

#[test]
fn raw_sql_picks_literal_per_engine() {
    let migration = RawSqlMigration::new()
        .with_id("raw")
        .sqlite("S1")
        .mysql("S2");

    assert_eq!(migration.sql(&SqliteDialect::new()).unwrap(), "S1");
    assert_eq!(migration.sql(&MysqlDialect::new()).unwrap(), "S2");
    match migration.sql(&PostgresDialect::new()) {
        Err(MigrationError::UnsupportedDialect { migration, engine }) => {
            assert_eq!(migration, "raw");
            assert_eq!(engine, EngineId::Postgres);
        }
        other => panic!("expected UnsupportedDialect, got {other:?}"),
    }
}

#[test]
fn unsupported_types_fail_instead_of_degrading() {
    let cases: [(Box<dyn Dialect>, ColumnType); 4] = [
        (Box::new(MysqlDialect::new()), ColumnType::Uuid),
        (Box::new(SqliteDialect::new()), ColumnType::Uuid),
        (Box::new(SqliteDialect::new()), ColumnType::Json),
        (Box::new(PostgresDialect::new()), ColumnType::NVarchar(40)),
    ];

    for (dialect, column_type) in cases {
        let migration = AddTableMigration::new("t")
            .with_column(Column::new("id", ColumnType::Int).primary_key())
            .with_column(Column::new("v", column_type));
        let err = migration.sql(dialect.as_ref()).unwrap_err();
        assert!(err.is_unsupported(), "{} accepted {:?}", dialect.driver_name(), column_type);
    }
}

#[test]
fn boxed_migrations_render_as_a_batch() {
    let batch: Vec<Box<dyn Migration>> = vec![
        Box::new(user_table()),
        Box::new(
            AddIndexMigration::new("user", Index::new(["login"]).unique()).with_id("unique login"),
        ),
        Box::new(
            DropIndexMigration::new("user", Index::new(["email"])).with_id("drop email index"),
        ),
    ];

    let dialect = PostgresDialect::new();
    let rendered: Vec<String> = batch
        .iter()
        .map(|m| render(m.as_ref(), &dialect))
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(rendered.len(), 3);
    assert_eq!(
        rendered[1],
        "CREATE UNIQUE INDEX \"UQE_user_login\" ON \"user\" (\"login\")"
    );
    assert_eq!(rendered[2], "DROP INDEX \"IDX_user_email\" CASCADE");
}
