//! Repository for hardware components (`cpus`, `rams`, `disks`, `nics`).

use cmdb_core::approval::validate_cpu_counts;
use cmdb_core::error::CoreError;
use cmdb_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::error::DbResult;
use crate::models::component::{
    Component, ComponentKind, Cpu, Disk, NewComponent, NewCpu, NewDisk, NewNic, NewRam, Nic, Ram,
};
use crate::repositories::asset_repo::AssetRepo;

const CPU_COLUMNS: &str = "id, asset_id, cpu_model, cpu_count, core_count, created_at, updated_at";

const RAM_COLUMNS: &str =
    "id, asset_id, serial_number, model, brand, slot_number, size_gb, created_at, updated_at";

const DISK_COLUMNS: &str = "id, asset_id, serial_number, slot_number, model, brand, size_gb, \
    interface, created_at, updated_at";

const NIC_COLUMNS: &str =
    "id, asset_id, name, model, mac, ip_address, netmask, bonding, created_at, updated_at";

pub struct ComponentRepo;

impl ComponentRepo {
    /// Attach a component to an existing asset.
    ///
    /// Slot, MAC and single-CPU uniqueness are enforced by the store and
    /// surface as `UniqueConstraint`.
    pub async fn attach(
        pool: &PgPool,
        asset_id: DbId,
        input: &NewComponent,
    ) -> DbResult<Component> {
        let mut tx = pool.begin().await?;
        AssetRepo::find_inner(&mut tx, asset_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Asset", asset_id))?;

        let component = match input {
            NewComponent::Cpu(cpu) => {
                Component::Cpu(Self::insert_cpu_inner(&mut tx, asset_id, cpu).await?)
            }
            NewComponent::Ram(ram) => {
                Component::Ram(Self::insert_ram(&mut tx, asset_id, ram).await?)
            }
            NewComponent::Disk(disk) => {
                Component::Disk(Self::insert_disk(&mut tx, asset_id, disk).await?)
            }
            NewComponent::Nic(nic) => {
                Component::Nic(Self::insert_nic(&mut tx, asset_id, nic).await?)
            }
        };
        tx.commit().await?;
        Ok(component)
    }

    /// Remove a component by kind and ID. Returns `true` if a row was deleted.
    pub async fn detach(
        pool: &PgPool,
        kind: ComponentKind,
        component_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&query).bind(component_id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find one component by kind and ID.
    pub async fn find(
        pool: &PgPool,
        kind: ComponentKind,
        component_id: DbId,
    ) -> Result<Option<Component>, sqlx::Error> {
        let component = match kind {
            ComponentKind::Cpu => {
                let query = format!("SELECT {CPU_COLUMNS} FROM cpus WHERE id = $1");
                sqlx::query_as::<_, Cpu>(&query)
                    .bind(component_id)
                    .fetch_optional(pool)
                    .await?
                    .map(Component::Cpu)
            }
            ComponentKind::Ram => {
                let query = format!("SELECT {RAM_COLUMNS} FROM rams WHERE id = $1");
                sqlx::query_as::<_, Ram>(&query)
                    .bind(component_id)
                    .fetch_optional(pool)
                    .await?
                    .map(Component::Ram)
            }
            ComponentKind::Disk => {
                let query = format!("SELECT {DISK_COLUMNS} FROM disks WHERE id = $1");
                sqlx::query_as::<_, Disk>(&query)
                    .bind(component_id)
                    .fetch_optional(pool)
                    .await?
                    .map(Component::Disk)
            }
            ComponentKind::Nic => {
                let query = format!("SELECT {NIC_COLUMNS} FROM nics WHERE id = $1");
                sqlx::query_as::<_, Nic>(&query)
                    .bind(component_id)
                    .fetch_optional(pool)
                    .await?
                    .map(Component::Nic)
            }
        };
        Ok(component)
    }

    /// All components of an asset: CPU first, then RAM, disks and NICs,
    /// each ordered by ID.
    pub async fn list_by_asset(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Vec<Component>, sqlx::Error> {
        let mut components = Vec::new();

        let query = format!("SELECT {CPU_COLUMNS} FROM cpus WHERE asset_id = $1 ORDER BY id");
        let cpus = sqlx::query_as::<_, Cpu>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await?;
        components.extend(cpus.into_iter().map(Component::Cpu));

        let query = format!("SELECT {RAM_COLUMNS} FROM rams WHERE asset_id = $1 ORDER BY id");
        let rams = sqlx::query_as::<_, Ram>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await?;
        components.extend(rams.into_iter().map(Component::Ram));

        let query = format!("SELECT {DISK_COLUMNS} FROM disks WHERE asset_id = $1 ORDER BY id");
        let disks = sqlx::query_as::<_, Disk>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await?;
        components.extend(disks.into_iter().map(Component::Disk));

        let query = format!("SELECT {NIC_COLUMNS} FROM nics WHERE asset_id = $1 ORDER BY id");
        let nics = sqlx::query_as::<_, Nic>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await?;
        components.extend(nics.into_iter().map(Component::Nic));

        Ok(components)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    pub(crate) async fn insert_cpu_inner(
        conn: &mut PgConnection,
        asset_id: DbId,
        input: &NewCpu,
    ) -> DbResult<Cpu> {
        validate_cpu_counts(input.cpu_count, input.core_count)?;
        let query = format!(
            "INSERT INTO cpus (asset_id, cpu_model, cpu_count, core_count)
             VALUES ($1, $2, $3, $4)
             RETURNING {CPU_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Cpu>(&query)
            .bind(asset_id)
            .bind(&input.cpu_model)
            .bind(input.cpu_count)
            .bind(input.core_count)
            .fetch_one(&mut *conn)
            .await?)
    }

    async fn insert_ram(conn: &mut PgConnection, asset_id: DbId, input: &NewRam) -> DbResult<Ram> {
        let query = format!(
            "INSERT INTO rams (asset_id, serial_number, model, brand, slot_number, size_gb)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {RAM_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Ram>(&query)
            .bind(asset_id)
            .bind(&input.serial_number)
            .bind(&input.model)
            .bind(&input.brand)
            .bind(&input.slot_number)
            .bind(input.size_gb)
            .fetch_one(&mut *conn)
            .await?)
    }

    async fn insert_disk(
        conn: &mut PgConnection,
        asset_id: DbId,
        input: &NewDisk,
    ) -> DbResult<Disk> {
        let query = format!(
            "INSERT INTO disks (asset_id, serial_number, slot_number, model, brand, size_gb, interface)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {DISK_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Disk>(&query)
            .bind(asset_id)
            .bind(&input.serial_number)
            .bind(&input.slot_number)
            .bind(&input.model)
            .bind(&input.brand)
            .bind(input.size_gb)
            .bind(input.interface.code())
            .fetch_one(&mut *conn)
            .await?)
    }

    async fn insert_nic(conn: &mut PgConnection, asset_id: DbId, input: &NewNic) -> DbResult<Nic> {
        let query = format!(
            "INSERT INTO nics (asset_id, name, model, mac, ip_address, netmask, bonding)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {NIC_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Nic>(&query)
            .bind(asset_id)
            .bind(&input.name)
            .bind(&input.model)
            .bind(&input.mac)
            .bind(input.ip_address.map(|ip| ip.to_string()))
            .bind(&input.netmask)
            .bind(&input.bonding)
            .fetch_one(&mut *conn)
            .await?)
    }

    /// Delete every component of an asset.
    pub(crate) async fn delete_for_asset_inner(
        conn: &mut PgConnection,
        asset_id: DbId,
    ) -> Result<(), sqlx::Error> {
        for kind in [
            ComponentKind::Cpu,
            ComponentKind::Ram,
            ComponentKind::Disk,
            ComponentKind::Nic,
        ] {
            let query = format!("DELETE FROM {} WHERE asset_id = $1", kind.table());
            sqlx::query(&query).bind(asset_id).execute(&mut *conn).await?;
        }
        Ok(())
    }
}
