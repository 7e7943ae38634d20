//! Database error type.
//!
//! Constraint violations reported by PostgreSQL are translated into the
//! domain taxonomy of [`CoreError`] using the constraint name, so callers can
//! match on `DuplicateKey` or `UniqueConstraint` instead of SQLSTATE codes.

use cmdb_core::error::CoreError;

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// PostgreSQL SQLSTATE for `check_violation`.
const CHECK_VIOLATION: &str = "23514";

/// Errors returned by repository operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A domain-level failure (not found, duplicate, invalid reference...).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// The domain error, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            DbError::Core(core) => Some(core),
            DbError::Database(_) => None,
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match classify(&err) {
            Some(core) => DbError::Core(core),
            None => DbError::Database(err),
        }
    }
}

/// Map a constraint violation onto the domain taxonomy.
fn classify(err: &sqlx::Error) -> Option<CoreError> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    let code = db_err.code()?;
    let constraint = db_err.constraint().unwrap_or("unknown");

    match code.as_ref() {
        UNIQUE_VIOLATION => unique_violation(constraint),
        FOREIGN_KEY_VIOLATION => Some(CoreError::InvalidReference(format!(
            "{constraint}: {}",
            db_err.message()
        ))),
        CHECK_VIOLATION => Some(CoreError::Validation(format!(
            "check constraint {constraint} failed"
        ))),
        _ => None,
    }
}

/// Translate a unique-constraint name from the migrations into a domain error.
fn unique_violation(constraint: &str) -> Option<CoreError> {
    let duplicate = |entity, field| Some(CoreError::DuplicateKey { entity, field });
    let component = |component| {
        Some(CoreError::UniqueConstraint {
            component,
            constraint: constraint.to_string(),
        })
    };

    match constraint {
        "uq_assets_name" => duplicate("Asset", "name"),
        "uq_assets_serial_number" => duplicate("Asset", "serial_number"),
        "uq_approval_entries_serial_number" => duplicate("ApprovalEntry", "serial_number"),
        "uq_software_version" => duplicate("Software", "version"),
        "uq_manufacturers_name" => duplicate("Manufacturer", "name"),
        "uq_data_centers_name" => duplicate("DataCenter", "name"),
        "uq_business_units_name" => duplicate("BusinessUnit", "name"),
        "uq_contracts_serial_number" => duplicate("Contract", "serial_number"),
        "uq_tags_name" => duplicate("Tag", "name"),
        "uq_users_username" => duplicate("User", "username"),
        "uq_asset_tags_asset_tag" => duplicate("AssetTag", "tag_id"),
        "uq_servers_asset" => duplicate("Server", "asset_id"),
        "uq_network_devices_asset" => duplicate("NetworkDevice", "asset_id"),
        "uq_storage_devices_asset" => duplicate("StorageDevice", "asset_id"),
        "uq_security_devices_asset" => duplicate("SecurityDevice", "asset_id"),
        "uq_cpus_asset" => component("CPU"),
        "uq_rams_asset_slot" => component("RAM"),
        "uq_disks_asset_slot" => component("Disk"),
        "uq_nics_asset_model_mac" => component("NIC"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn asset_constraints_map_to_duplicate_key() {
        assert_matches!(
            unique_violation("uq_assets_serial_number"),
            Some(CoreError::DuplicateKey {
                entity: "Asset",
                field: "serial_number"
            })
        );
    }

    #[test]
    fn component_constraints_map_to_unique_constraint() {
        assert_matches!(
            unique_violation("uq_rams_asset_slot"),
            Some(CoreError::UniqueConstraint { component: "RAM", .. })
        );
        assert_matches!(
            unique_violation("uq_nics_asset_model_mac"),
            Some(CoreError::UniqueConstraint { component: "NIC", .. })
        );
    }

    #[test]
    fn unknown_constraint_is_not_classified() {
        assert!(unique_violation("uq_something_else").is_none());
    }

    #[test]
    fn non_database_errors_pass_through() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert_matches!(err, DbError::Database(sqlx::Error::RowNotFound));
    }
}
