//! Checksums over rendered migration SQL

use sha2::{Digest, Sha256};

use super::Migration;
use crate::dialect::Dialect;
use crate::error::{MigrationError, Result};

/// Hex SHA-256 of the statement `migration` renders for `dialect`.
///
/// A runner stores this alongside the applied id so it can notice a
/// migration whose rendered text changed after it ran.
///
/// # Errors
///
/// Returns the render error if the migration cannot be rendered.
pub fn checksum(migration: &dyn Migration, dialect: &dyn Dialect) -> Result<String> {
    let sql = migration.sql(dialect)?;

    let mut hasher = Sha256::new();
    hasher.update(sql.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Compare a stored checksum with the current one.
///
/// # Errors
///
/// Returns `ChecksumMismatch` naming `migration_id` when they differ.
pub fn validate_checksum(migration_id: &str, stored: &str, current: &str) -> Result<()> {
    if stored == current {
        Ok(())
    } else {
        Err(MigrationError::ChecksumMismatch {
            id: migration_id.to_string(),
            stored: stored.to_string(),
            current: current.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MysqlDialect, SqliteDialect};
    use crate::migration::DropTableMigration;

    #[test]
    fn test_checksum_is_stable_per_dialect() {
        let migration = DropTableMigration::new("star");
        let sqlite = checksum(&migration, &SqliteDialect::new()).unwrap();
        assert_eq!(sqlite.len(), 64);
        assert_eq!(sqlite, checksum(&migration, &SqliteDialect::new()).unwrap());
        assert_ne!(sqlite, checksum(&migration, &MysqlDialect::new()).unwrap());
    }

    #[test]
    fn test_validate_checksum() {
        assert!(validate_checksum("m1", "abc", "abc").is_ok());
        let err = validate_checksum("m1", "abc", "def").unwrap_err();
        assert!(err.to_string().contains("m1"));
        assert!(matches!(err, MigrationError::ChecksumMismatch { .. }));
    }
}
