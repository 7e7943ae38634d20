//! Domain types for the CMDB.
//!
//! Everything in this crate is pure: no database or network access. The
//! persistence layer (`cmdb-db`) and the HTTP layer (`cmdb-api`) both build
//! on these definitions.

pub mod approval;
pub mod choices;
pub mod error;
pub mod hosting;
pub mod kind;
pub mod pagination;
pub mod types;
