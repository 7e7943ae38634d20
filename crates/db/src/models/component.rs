//! Hardware component rows (CPU, RAM, disk, NIC) and attachment DTOs.

use std::net::IpAddr;

use cmdb_core::choices::DiskInterface;
use cmdb_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `cpus` table. One per asset.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Cpu {
    pub id: DbId,
    pub asset_id: DbId,
    pub cpu_model: Option<String>,
    pub cpu_count: i16,
    pub core_count: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `rams` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ram {
    pub id: DbId,
    pub asset_id: DbId,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub slot_number: String,
    pub size_gb: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `disks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Disk {
    pub id: DbId,
    pub asset_id: DbId,
    pub serial_number: Option<String>,
    pub slot_number: Option<String>,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub size_gb: Option<i32>,
    #[sqlx(try_from = "i16")]
    pub interface: DiskInterface,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `nics` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Nic {
    pub id: DbId,
    pub asset_id: DbId,
    pub name: Option<String>,
    pub model: String,
    pub mac: String,
    pub ip_address: Option<String>,
    pub netmask: Option<String>,
    pub bonding: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Which component table a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Cpu,
    Ram,
    Disk,
    Nic,
}

impl ComponentKind {
    pub fn table(self) -> &'static str {
        match self {
            ComponentKind::Cpu => "cpus",
            ComponentKind::Ram => "rams",
            ComponentKind::Disk => "disks",
            ComponentKind::Nic => "nics",
        }
    }

    /// Label used in event log entries and error messages.
    pub fn label(self) -> &'static str {
        match self {
            ComponentKind::Cpu => "CPU",
            ComponentKind::Ram => "RAM",
            ComponentKind::Disk => "Disk",
            ComponentKind::Nic => "NIC",
        }
    }
}

/// A stored component of any kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Component {
    Cpu(Cpu),
    Ram(Ram),
    Disk(Disk),
    Nic(Nic),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Cpu(_) => ComponentKind::Cpu,
            Component::Ram(_) => ComponentKind::Ram,
            Component::Disk(_) => ComponentKind::Disk,
            Component::Nic(_) => ComponentKind::Nic,
        }
    }

    pub fn id(&self) -> DbId {
        match self {
            Component::Cpu(c) => c.id,
            Component::Ram(c) => c.id,
            Component::Disk(c) => c.id,
            Component::Nic(c) => c.id,
        }
    }

    pub fn asset_id(&self) -> DbId {
        match self {
            Component::Cpu(c) => c.asset_id,
            Component::Ram(c) => c.asset_id,
            Component::Disk(c) => c.asset_id,
            Component::Nic(c) => c.asset_id,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

fn one() -> i16 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCpu {
    pub cpu_model: Option<String>,
    #[serde(default = "one")]
    pub cpu_count: i16,
    #[serde(default = "one")]
    pub core_count: i16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRam {
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub slot_number: String,
    pub size_gb: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDisk {
    pub serial_number: Option<String>,
    pub slot_number: Option<String>,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub size_gb: Option<i32>,
    #[serde(default)]
    pub interface: DiskInterface,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewNic {
    pub name: Option<String>,
    pub model: String,
    pub mac: String,
    pub ip_address: Option<IpAddr>,
    pub netmask: Option<String>,
    pub bonding: Option<String>,
}

/// A component to attach to an asset, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NewComponent {
    Cpu(NewCpu),
    Ram(NewRam),
    Disk(NewDisk),
    Nic(NewNic),
}

impl NewComponent {
    pub fn kind(&self) -> ComponentKind {
        match self {
            NewComponent::Cpu(_) => ComponentKind::Cpu,
            NewComponent::Ram(_) => ComponentKind::Ram,
            NewComponent::Disk(_) => ComponentKind::Disk,
            NewComponent::Nic(_) => ComponentKind::Nic,
        }
    }
}
