pub mod approvals;
pub mod assets;
pub mod events;
pub mod reference;
pub mod software;
pub mod users;
