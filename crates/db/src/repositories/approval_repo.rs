//! Repository for the approval zone (`approval_entries`).
//!
//! Discovered assets are submitted here and promoted into the registry by
//! [`ApprovalZoneRepo::approve`], which runs as one transaction: either the
//! asset, its specialization, the approved flag and the event all land, or
//! nothing does.

use cmdb_core::approval::{
    approval_event_detail, default_asset_name, promoted_kind, validate_cpu_counts,
};
use cmdb_core::choices::{AssetStatus, AssetType, EventType};
use cmdb_core::error::CoreError;
use cmdb_core::kind::validate_required;
use cmdb_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use cmdb_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::approval::{
    ApprovalEntry, ApprovalListParams, ApprovalOutcome, ApproveOptions, CreateApprovalEntry,
};
use crate::models::asset::CreateAsset;
use crate::models::component::NewCpu;
use crate::models::event_log::CreateEventLog;
use crate::repositories::asset_repo::AssetRepo;
use crate::repositories::component_repo::ComponentRepo;
use crate::repositories::event_log_repo::EventLogRepo;
use crate::repositories::manufacturer_repo::ManufacturerRepo;
use crate::repositories::specialization_repo::SpecializationRepo;

const COLUMNS: &str = "id, asset_type, serial_number, manufacturer, model, ram_size_gb, \
    cpu_model, cpu_count, cpu_core_count, os_type, os_name, os_release, raw_data, approved, \
    created_at, updated_at";

pub struct ApprovalZoneRepo;

impl ApprovalZoneRepo {
    /// Submit a discovered asset for approval.
    pub async fn submit(pool: &PgPool, input: &CreateApprovalEntry) -> DbResult<ApprovalEntry> {
        validate_required("serial_number", &input.serial_number)?;
        validate_cpu_counts(input.cpu_count, input.cpu_core_count)?;

        let query = format!(
            "INSERT INTO approval_entries (asset_type, serial_number, manufacturer, model,
                ram_size_gb, cpu_model, cpu_count, cpu_core_count, os_type, os_name,
                os_release, raw_data)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, ApprovalEntry>(&query)
            .bind(input.asset_type.code())
            .bind(&input.serial_number)
            .bind(&input.manufacturer)
            .bind(&input.model)
            .bind(input.ram_size_gb)
            .bind(&input.cpu_model)
            .bind(input.cpu_count)
            .bind(input.cpu_core_count)
            .bind(&input.os_type)
            .bind(&input.os_name)
            .bind(&input.os_release)
            .bind(&input.raw_data)
            .fetch_one(pool)
            .await?)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ApprovalEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM approval_entries WHERE id = $1");
        sqlx::query_as::<_, ApprovalEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_serial(
        pool: &PgPool,
        serial_number: &str,
    ) -> Result<Option<ApprovalEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM approval_entries WHERE serial_number = $1");
        sqlx::query_as::<_, ApprovalEntry>(&query)
            .bind(serial_number)
            .fetch_optional(pool)
            .await
    }

    /// List entries newest first, optionally only those still pending.
    pub async fn list(
        pool: &PgPool,
        params: &ApprovalListParams,
    ) -> Result<Vec<ApprovalEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM approval_entries
             WHERE (NOT $1 OR approved = false)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ApprovalEntry>(&query)
            .bind(params.pending_only)
            .bind(clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    /// Delete an entry. Events that referenced it keep their history.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM approval_entries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Promote a pending entry into the asset registry.
    ///
    /// The entry row is locked for the duration of the transaction, so of two
    /// concurrent approvals the second observes `AlreadyApproved`.
    pub async fn approve(
        pool: &PgPool,
        entry_id: DbId,
        options: &ApproveOptions,
    ) -> DbResult<ApprovalOutcome> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM approval_entries WHERE id = $1 FOR UPDATE");
        let entry = sqlx::query_as::<_, ApprovalEntry>(&query)
            .bind(entry_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::not_found("ApprovalEntry", entry_id))?;
        entry.state().approve(entry.id)?;

        let existing: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM assets WHERE serial_number = $1")
                .bind(&entry.serial_number)
                .fetch_optional(&mut *tx)
                .await?;
        if existing.is_some() {
            return Err(CoreError::DuplicateKey {
                entity: "Asset",
                field: "serial_number",
            }
            .into());
        }

        let manufacturer_id = match entry
            .manufacturer
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
        {
            Some(name) => Some(ManufacturerRepo::get_or_create_inner(&mut tx, name).await?.id),
            None => None,
        };

        let name = match options.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => default_asset_name(&entry.serial_number),
        };
        let mut input = CreateAsset::new(
            name,
            entry.serial_number.clone(),
            promoted_kind(entry.asset_type, entry.facts()),
        );
        input.status = AssetStatus::Online;
        input.manufacturer_id = manufacturer_id;
        input.approver_id = options.approver_id;
        input.business_unit_id = options.business_unit_id;
        input.data_center_id = options.data_center_id;

        let asset = AssetRepo::insert_inner(&mut tx, &input).await?;
        SpecializationRepo::insert_inner(&mut tx, asset.id, &input.kind).await?;

        if entry.asset_type == AssetType::Server && entry.cpu_model.is_some() {
            let cpu = NewCpu {
                cpu_model: entry.cpu_model.clone(),
                cpu_count: entry.cpu_count,
                core_count: entry.cpu_core_count,
            };
            ComponentRepo::insert_cpu_inner(&mut tx, asset.id, &cpu).await?;
        }

        let query = format!(
            "UPDATE approval_entries SET approved = true WHERE id = $1 RETURNING {COLUMNS}"
        );
        let entry = sqlx::query_as::<_, ApprovalEntry>(&query)
            .bind(entry.id)
            .fetch_one(&mut *tx)
            .await?;

        let event = EventLogRepo::record_inner(
            &mut tx,
            &CreateEventLog {
                name: format!("Asset {} approved", asset.name),
                asset_id: Some(asset.id),
                event_type: EventType::Online,
                pending_asset_id: Some(entry.id),
                component: None,
                detail: approval_event_detail(&entry.serial_number, entry.asset_type),
                user_id: options.approver_id,
                memo: None,
            },
        )
        .await?;

        tx.commit().await?;
        tracing::debug!(entry_id = entry.id, asset_id = asset.id, "Approval entry promoted");

        Ok(ApprovalOutcome {
            entry,
            asset,
            event,
        })
    }
}
