mod helpers;

use helpers::{grant_permission, grant_schema, insert_database, setup_test_db, user};
use igce_core::SecurityManager;
use igce_db::PermissionRepository;

fn names(schemas: &[&str]) -> Vec<String> {
    schemas.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_admin_needs_no_grant() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let warehouse = insert_database(&db.pool, "warehouse", true, &["finance"]).await;
    let repo = PermissionRepository::new(db.pool.clone());

    let admin = user(&["Admin"]);
    assert!(repo.can_access_database(&admin, &warehouse).await.unwrap());
    assert_eq!(
        repo.schemas_accessible_by_user(&admin, &warehouse, &names(&["finance", "ops"]))
            .await
            .unwrap(),
        names(&["finance", "ops"])
    );
}

#[tokio::test]
async fn test_blanket_permissions_grant_every_database() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let warehouse = insert_database(&db.pool, "warehouse", true, &[]).await;
    let examples = insert_database(&db.pool, "examples", true, &[]).await;
    let repo = PermissionRepository::new(db.pool.clone());

    let all_databases = user(&["gamma"]);
    grant_permission(&db.pool, &all_databases, "all_database_access", None).await;
    let all_datasources = user(&["gamma"]);
    grant_permission(&db.pool, &all_datasources, "all_datasource_access", None).await;

    for grantee in [&all_databases, &all_datasources] {
        assert!(repo.can_access_database(grantee, &warehouse).await.unwrap());
        assert!(repo.can_access_database(grantee, &examples).await.unwrap());
    }
    assert!(!repo
        .can_access_database(&user(&["gamma"]), &warehouse)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_database_access_is_scoped_to_one_database() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let warehouse = insert_database(&db.pool, "warehouse", true, &[]).await;
    let examples = insert_database(&db.pool, "examples", true, &[]).await;
    let repo = PermissionRepository::new(db.pool.clone());

    let analyst = user(&["gamma"]);
    grant_permission(&db.pool, &analyst, "database_access", Some(warehouse.id)).await;

    assert!(repo.can_access_database(&analyst, &warehouse).await.unwrap());
    assert!(!repo.can_access_database(&analyst, &examples).await.unwrap());
}

#[tokio::test]
async fn test_schema_grants_filter_and_keep_order() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let warehouse = insert_database(&db.pool, "warehouse", true, &["finance", "ops", "hr"]).await;
    let examples = insert_database(&db.pool, "examples", true, &["finance"]).await;
    let repo = PermissionRepository::new(db.pool.clone());

    let analyst = user(&["gamma"]);
    grant_schema(&db.pool, &analyst, warehouse.id, "hr").await;
    grant_schema(&db.pool, &analyst, warehouse.id, "finance").await;
    grant_schema(&db.pool, &analyst, examples.id, "ops").await;

    let accessible = repo
        .schemas_accessible_by_user(&analyst, &warehouse, &names(&["finance", "ops", "hr"]))
        .await
        .unwrap();
    assert_eq!(accessible, names(&["finance", "hr"]));

    // Grants on another database do not leak across
    let accessible = repo
        .schemas_accessible_by_user(&analyst, &examples, &names(&["finance", "ops"]))
        .await
        .unwrap();
    assert!(accessible.is_empty());

    assert!(repo
        .schemas_accessible_by_user(&analyst, &warehouse, &[])
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_database_grant_covers_all_schemas() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let warehouse = insert_database(&db.pool, "warehouse", true, &["finance", "ops"]).await;
    let repo = PermissionRepository::new(db.pool.clone());

    let analyst = user(&["gamma"]);
    grant_permission(&db.pool, &analyst, "database_access", Some(warehouse.id)).await;

    assert_eq!(
        repo.schemas_accessible_by_user(&analyst, &warehouse, &names(&["ops", "finance"]))
            .await
            .unwrap(),
        names(&["ops", "finance"])
    );
}
