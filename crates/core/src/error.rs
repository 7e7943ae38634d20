use crate::types::DbId;

/// Domain error taxonomy shared by the persistence and HTTP layers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// A lookup by id or serial number found nothing.
    #[error("Entity not found: {entity} {key}")]
    NotFound { entity: &'static str, key: String },

    /// A unique column (name, serial number, version) already holds the value.
    #[error("Duplicate key: {entity}.{field} already exists")]
    DuplicateKey {
        entity: &'static str,
        field: &'static str,
    },

    /// A referenced row does not exist, or the reference would form a cycle.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// The approval entry was already promoted into the asset table.
    #[error("Approval entry {id} is already approved")]
    AlreadyApproved { id: DbId },

    /// A component collides with an existing one on the same asset.
    #[error("Unique constraint violated for {component}: {constraint}")]
    UniqueConstraint {
        component: &'static str,
        constraint: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] keyed by numeric id.
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound {
            entity,
            key: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_includes_entity_and_key() {
        let err = CoreError::not_found("Asset", 42);
        assert_eq!(err.to_string(), "Entity not found: Asset 42");
    }

    #[test]
    fn duplicate_key_names_the_field() {
        let err = CoreError::DuplicateKey {
            entity: "Asset",
            field: "serial_number",
        };
        assert_eq!(
            err.to_string(),
            "Duplicate key: Asset.serial_number already exists"
        );
    }
}
