//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-statement operations run in
//! a single transaction; `*_inner` helpers take the open connection.

pub mod approval_repo;
pub mod asset_repo;
pub mod business_unit_repo;
pub mod component_repo;
pub mod contract_repo;
pub mod data_center_repo;
pub mod event_log_repo;
pub mod manufacturer_repo;
pub mod software_repo;
pub mod specialization_repo;
pub mod tag_repo;
pub mod user_repo;

pub use approval_repo::ApprovalZoneRepo;
pub use asset_repo::AssetRepo;
pub use business_unit_repo::BusinessUnitRepo;
pub use component_repo::ComponentRepo;
pub use contract_repo::ContractRepo;
pub use data_center_repo::DataCenterRepo;
pub use event_log_repo::EventLogRepo;
pub use manufacturer_repo::ManufacturerRepo;
pub use software_repo::SoftwareRepo;
pub use specialization_repo::SpecializationRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
