//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Choice columns are SMALLINT codes decoded through `TryFrom<i16>`.

pub mod approval;
pub mod asset;
pub mod component;
pub mod event_log;
pub mod reference;
pub mod software;
pub mod specialization;
pub mod user;
