use std::time::Duration;

use assert_matches::assert_matches;
use cmdb_core::choices::{AssetStatus, AssetType, EventType};
use cmdb_core::error::CoreError;
use cmdb_core::kind::{AssetKind, NetworkDeviceSpec, ServerSpec};
use cmdb_db::models::asset::{AssetDetail, AssetListParams, CreateAsset, UpdateAsset};
use cmdb_db::models::component::{NewComponent, NewNic, NewRam};
use cmdb_db::models::event_log::CreateEventLog;
use cmdb_db::models::reference::{CreateBusinessUnit, CreateTag};
use cmdb_db::models::specialization::{
    Specialization, UpdateNetworkDevice, UpdateSpecialization,
};
use cmdb_db::repositories::{
    AssetRepo, BusinessUnitRepo, ComponentRepo, EventLogRepo, SpecializationRepo, TagRepo,
};
use cmdb_db::DbError;
use sqlx::PgPool;

async fn count_rows(pool: &PgPool, table: &str, asset_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table} WHERE asset_id = $1"))
        .bind(asset_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn create_server(pool: &PgPool, name: &str) -> AssetDetail {
    AssetRepo::create(
        pool,
        &CreateAsset::new(name, format!("SN-{name}"), AssetKind::Server(ServerSpec::default())),
    )
    .await
    .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_inserts_asset_and_specialization(pool: PgPool) {
    let input = CreateAsset::new(
        "core-switch-01",
        "SN-SW-1",
        AssetKind::NetworkDevice(NetworkDeviceSpec {
            model: Some("C9300".into()),
            vlan_ip: Some("10.0.0.1".parse().unwrap()),
            port_count: Some(48),
            ..Default::default()
        }),
    );
    let detail = AssetRepo::create(&pool, &input).await.unwrap();

    assert_eq!(detail.asset.asset_type, AssetType::NetworkDevice);
    assert_eq!(detail.asset.status, AssetStatus::Online);
    match detail.specialization {
        Some(Specialization::NetworkDevice(ref nd)) => {
            assert_eq!(nd.asset_id, detail.asset.id);
            assert_eq!(nd.vlan_ip.as_deref(), Some("10.0.0.1"));
            assert_eq!(nd.port_count, Some(48));
        }
        ref other => panic!("expected network device, got {other:?}"),
    }

    let found = AssetRepo::find_by_serial(&pool, "SN-SW-1").await.unwrap().unwrap();
    assert_eq!(found.id, detail.asset.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_software_asset_has_no_specialization(pool: PgPool) {
    let detail = AssetRepo::create(&pool, &CreateAsset::new("office", "SN-OFF", AssetKind::Software))
        .await
        .unwrap();
    assert_eq!(detail.asset.asset_type, AssetType::Software);
    assert!(detail.specialization.is_none());

    let loaded = SpecializationRepo::find_for_asset(&pool, detail.asset.id).await.unwrap();
    assert!(loaded.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_name_and_serial_rejected(pool: PgPool) {
    create_server(&pool, "web-01").await;

    let same_serial = CreateAsset::new("web-02", "SN-web-01", AssetKind::Software);
    assert_matches!(
        AssetRepo::create(&pool, &same_serial).await,
        Err(DbError::Core(CoreError::DuplicateKey {
            entity: "Asset",
            field: "serial_number"
        }))
    );

    let same_name = CreateAsset::new("web-01", "SN-other", AssetKind::Software);
    assert_matches!(
        AssetRepo::create(&pool, &same_name).await,
        Err(DbError::Core(CoreError::DuplicateKey {
            entity: "Asset",
            field: "name"
        }))
    );

    // The failed creates left nothing behind.
    let all = AssetRepo::list(&pool, &AssetListParams::default()).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_creates_with_same_serial(pool: PgPool) {
    let a = CreateAsset::new("race-a", "SN-RACE", AssetKind::Software);
    let b = CreateAsset::new("race-b", "SN-RACE", AssetKind::Software);

    let (ra, rb) = futures::join!(AssetRepo::create(&pool, &a), AssetRepo::create(&pool, &b));
    let successes = [ra.is_ok(), rb.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);

    let err = ra.err().or(rb.err()).unwrap();
    assert_matches!(
        err,
        DbError::Core(CoreError::DuplicateKey {
            field: "serial_number",
            ..
        })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_name_rejected(pool: PgPool) {
    let input = CreateAsset::new("  ", "SN-1", AssetKind::Software);
    assert_matches!(
        AssetRepo::create(&pool, &input).await,
        Err(DbError::Core(CoreError::Validation(_)))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_reference_is_invalid_reference(pool: PgPool) {
    let mut input = CreateAsset::new("orphan", "SN-ORPHAN", AssetKind::Software);
    input.manufacturer_id = Some(9_999);
    assert_matches!(
        AssetRepo::create(&pool, &input).await,
        Err(DbError::Core(CoreError::InvalidReference(_)))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_applies_patch_and_refreshes_updated_at(pool: PgPool) {
    let created = create_server(&pool, "db-01").await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    let patch = UpdateAsset {
        status: Some(AssetStatus::Faulty),
        memo: Some(Some("disk errors".into())),
        management_ip: Some(Some("192.168.1.20".parse().unwrap())),
        ..Default::default()
    };
    let updated = AssetRepo::update(&pool, created.asset.id, &patch).await.unwrap();

    assert_eq!(updated.status, AssetStatus::Faulty);
    assert_eq!(updated.memo.as_deref(), Some("disk errors"));
    assert_eq!(updated.management_ip.as_deref(), Some("192.168.1.20"));
    assert_eq!(updated.name, "db-01");
    assert!(updated.updated_at > created.asset.updated_at);
    assert_eq!(updated.created_at, created.asset.created_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_asset_is_not_found(pool: PgPool) {
    assert_matches!(
        AssetRepo::update(&pool, 404, &UpdateAsset::default()).await,
        Err(DbError::Core(CoreError::NotFound { entity: "Asset", .. }))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_to_taken_name_is_duplicate(pool: PgPool) {
    create_server(&pool, "app-01").await;
    let second = create_server(&pool, "app-02").await;

    let patch = UpdateAsset {
        name: Some("app-01".into()),
        ..Default::default()
    };
    assert_matches!(
        AssetRepo::update(&pool, second.asset.id, &patch).await,
        Err(DbError::Core(CoreError::DuplicateKey { field: "name", .. }))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascades_and_keeps_event_history(pool: PgPool) {
    let host = create_server(&pool, "host-01").await;
    let guest = create_server(&pool, "vm-01").await;
    SpecializationRepo::set_server_host(&pool, guest.asset.id, Some(host.asset.id))
        .await
        .unwrap();
    ComponentRepo::attach(
        &pool,
        host.asset.id,
        &NewComponent::Ram(NewRam {
            serial_number: None,
            model: None,
            brand: None,
            slot_number: "A1".into(),
            size_gb: Some(32),
        }),
    )
    .await
    .unwrap();
    let tag = TagRepo::create(&pool, &CreateTag { name: "prod".into() }).await.unwrap();
    AssetRepo::set_tags(&pool, host.asset.id, &[tag.id]).await.unwrap();
    let event = EventLogRepo::record(
        &pool,
        &CreateEventLog::for_asset(host.asset.id, EventType::Maintenance, "Reboot", "planned"),
    )
    .await
    .unwrap();

    assert!(AssetRepo::delete(&pool, host.asset.id).await.unwrap());

    assert!(AssetRepo::find_by_id(&pool, host.asset.id).await.unwrap().is_none());
    assert!(ComponentRepo::list_by_asset(&pool, host.asset.id).await.unwrap().is_empty());
    assert_eq!(count_rows(&pool, "servers", host.asset.id).await, 0);
    assert_eq!(count_rows(&pool, "asset_tags", host.asset.id).await, 0);

    let events = EventLogRepo::list(&pool, &Default::default()).await.unwrap();
    let kept = events.iter().find(|e| e.id == event.id).unwrap();
    assert_eq!(kept.asset_id, None);
    assert_eq!(kept.detail, "planned");

    let guest_detail = AssetRepo::find_detail(&pool, guest.asset.id).await.unwrap();
    match guest_detail.specialization {
        Some(Specialization::Server(server)) => assert_eq!(server.host_asset_id, None),
        other => panic!("expected server, got {other:?}"),
    }

    // The tag itself survives.
    assert!(TagRepo::find_by_id(&pool, tag.id).await.unwrap().is_some());
    assert!(!AssetRepo::delete(&pool, host.asset.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_network_device_removes_specialization_and_nics(pool: PgPool) {
    let switch = AssetRepo::create(
        &pool,
        &CreateAsset::new(
            "edge-switch",
            "SN-EDGE",
            AssetKind::NetworkDevice(NetworkDeviceSpec {
                port_count: Some(24),
                ..Default::default()
            }),
        ),
    )
    .await
    .unwrap();
    ComponentRepo::attach(
        &pool,
        switch.asset.id,
        &NewComponent::Nic(NewNic {
            name: Some("mgmt0".into()),
            model: "X710".into(),
            mac: "00:1b:21:aa:bb:cc".into(),
            ip_address: None,
            netmask: None,
            bonding: None,
        }),
    )
    .await
    .unwrap();
    assert_eq!(count_rows(&pool, "network_devices", switch.asset.id).await, 1);

    assert!(AssetRepo::delete(&pool, switch.asset.id).await.unwrap());

    assert_eq!(count_rows(&pool, "network_devices", switch.asset.id).await, 0);
    assert_eq!(count_rows(&pool, "nics", switch.asset.id).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_with_explicit_null_clears_nullable_fields(pool: PgPool) {
    let unit = BusinessUnitRepo::create(
        &pool,
        &CreateBusinessUnit {
            parent_id: None,
            name: "Ops".into(),
            memo: None,
        },
    )
    .await
    .unwrap();
    let mut input = CreateAsset::new("batch-01", "SN-BATCH", AssetKind::Software);
    input.business_unit_id = Some(unit.id);
    input.memo = Some("nightly jobs".into());
    input.price = Some(1200.0);
    let created = AssetRepo::create(&pool, &input).await.unwrap();
    assert_eq!(created.asset.business_unit_id, Some(unit.id));

    let patch = UpdateAsset {
        business_unit_id: Some(None),
        memo: Some(None),
        ..Default::default()
    };
    let updated = AssetRepo::update(&pool, created.asset.id, &patch).await.unwrap();

    assert_eq!(updated.business_unit_id, None);
    assert_eq!(updated.memo, None);
    // Absent fields are left alone.
    assert_eq!(updated.price, Some(1200.0));
    assert_eq!(updated.name, "batch-01");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_specialization_patch_clears_nullable_fields(pool: PgPool) {
    let switch = AssetRepo::create(
        &pool,
        &CreateAsset::new(
            "dist-switch",
            "SN-DIST",
            AssetKind::NetworkDevice(NetworkDeviceSpec {
                model: Some("C9500".into()),
                vlan_ip: Some("10.1.0.1".parse().unwrap()),
                port_count: Some(48),
                ..Default::default()
            }),
        ),
    )
    .await
    .unwrap();

    let patch = UpdateSpecialization::NetworkDevice(UpdateNetworkDevice {
        vlan_ip: Some(None),
        port_count: Some(None),
        ..Default::default()
    });
    match SpecializationRepo::update(&pool, switch.asset.id, &patch).await.unwrap() {
        Specialization::NetworkDevice(nd) => {
            assert_eq!(nd.vlan_ip, None);
            assert_eq!(nd.port_count, None);
            assert_eq!(nd.model.as_deref(), Some("C9500"));
        }
        other => panic!("expected network device, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_and_orders_newest_first(pool: PgPool) {
    let first = create_server(&pool, "alpha").await;
    let second = create_server(&pool, "beta").await;
    AssetRepo::create(&pool, &CreateAsset::new("gamma", "SN-gamma", AssetKind::Software))
        .await
        .unwrap();

    let servers = AssetRepo::list(
        &pool,
        &AssetListParams {
            asset_type: Some(AssetType::Server),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let ids: Vec<_> = servers.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![second.asset.id, first.asset.id]);

    let by_name = AssetRepo::list(
        &pool,
        &AssetListParams {
            name: Some("ALP".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "alpha");

    let paged = AssetRepo::list(
        &pool,
        &AssetListParams {
            limit: Some(1),
            offset: Some(1),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(paged.len(), 1);

    let software = AssetRepo::find_by_type(&pool, AssetType::Software).await.unwrap();
    assert_eq!(software.len(), 1);
    let online = AssetRepo::find_by_status(&pool, AssetStatus::Online).await.unwrap();
    assert_eq!(online.len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tags_replace_and_filter(pool: PgPool) {
    let asset = create_server(&pool, "tagged").await;
    let prod = TagRepo::create(&pool, &CreateTag { name: "prod".into() }).await.unwrap();
    let db = TagRepo::create(&pool, &CreateTag { name: "db".into() }).await.unwrap();

    let ids = AssetRepo::set_tags(&pool, asset.asset.id, &[db.id, prod.id]).await.unwrap();
    assert_eq!(ids.len(), 2);

    let patch = UpdateAsset {
        tag_ids: Some(vec![prod.id]),
        ..Default::default()
    };
    AssetRepo::update(&pool, asset.asset.id, &patch).await.unwrap();
    let detail = AssetRepo::find_detail(&pool, asset.asset.id).await.unwrap();
    assert_eq!(detail.tag_ids, vec![prod.id]);

    let tagged_db = AssetRepo::list(
        &pool,
        &AssetListParams {
            tag_id: Some(db.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(tagged_db.is_empty());

    assert_matches!(
        AssetRepo::set_tags(&pool, 9_999, &[prod.id]).await,
        Err(DbError::Core(CoreError::NotFound { .. }))
    );
}
