//! Hosting-chain validation for server specializations.
//!
//! A server may be hosted on another server (a virtual machine on a
//! physical host). Following `host` links from any server must never revisit
//! a server.

use crate::error::CoreError;
use crate::types::DbId;

/// Check that hosting `asset_id` on `host_id` keeps the hosting graph acyclic.
///
/// `chain_from_host` is the hosting chain starting at `host_id`: the host
/// itself, then its host, and so on, as currently stored.
pub fn validate_host_assignment(
    asset_id: DbId,
    host_id: DbId,
    chain_from_host: &[DbId],
) -> Result<(), CoreError> {
    if asset_id == host_id {
        return Err(CoreError::InvalidReference(format!(
            "server {asset_id} cannot host itself"
        )));
    }
    if chain_from_host.contains(&asset_id) {
        let path = chain_from_host
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(" -> ");
        return Err(CoreError::InvalidReference(format!(
            "hosting server {asset_id} on {host_id} would form a cycle ({asset_id} -> {path})"
        )));
    }
    Ok(())
}
