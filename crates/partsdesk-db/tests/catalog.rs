//! Catalog repository tests: field validation at the write boundary and
//! the manual stock-adjustment backstop.

use chrono::Utc;
use uuid::Uuid;

use partsdesk_core::{Product, ValidationError};
use partsdesk_db::{Database, DbConfig, DbError};

async fn memory_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

fn product(sku: &str, name: &str) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4().to_string(),
        sku: sku.to_string(),
        name: name.to_string(),
        brand: None,
        make: Some("Toyota".to_string()),
        model: Some("Corolla".to_string()),
        variant: None,
        category: None,
        purchase_price_cents: None,
        sale_price_cents: 5000,
        tax_rate_bps: 1800,
        stock: 3,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn insert_rejects_malformed_sku() {
    let db = memory_db().await;

    let err = db
        .products()
        .insert(&product("has space", "Oil Filter"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DbError::Validation(ValidationError::InvalidFormat { .. })
    ));
    assert_eq!(db.products().count().await.unwrap(), 0);
}

#[tokio::test]
async fn insert_rejects_empty_name() {
    let db = memory_db().await;

    let err = db
        .products()
        .insert(&product("FLT-TOY-0001", "   "))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DbError::Validation(ValidationError::Required { .. })
    ));
}

#[tokio::test]
async fn update_rejects_malformed_sku() {
    let db = memory_db().await;

    let mut p = product("FLT-TOY-0002", "Oil Filter");
    db.products().insert(&p).await.unwrap();

    p.sku = "not/allowed".to_string();
    let err = db.products().update(&p).await.unwrap_err();
    assert!(matches!(err, DbError::Validation(_)));

    // The stored row keeps its original SKU.
    let stored = db.products().get_by_id(&p.id).await.unwrap().unwrap();
    assert_eq!(stored.sku, "FLT-TOY-0002");
}

#[tokio::test]
async fn search_rejects_oversized_query() {
    let db = memory_db().await;

    let err = db
        .products()
        .search(&"q".repeat(101), 10)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DbError::Validation(ValidationError::TooLong { .. })
    ));
}

#[tokio::test]
async fn search_trims_and_matches_fitment_fields() {
    let db = memory_db().await;

    db.products()
        .insert(&product("BRK-TOY-0003", "Brake Pad Set Front"))
        .await
        .unwrap();

    let hits = db.products().search("  corolla  ", 10).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].sku, "BRK-TOY-0003");
}

#[tokio::test]
async fn manual_stock_adjustment_cannot_go_negative() {
    let db = memory_db().await;

    let p = product("SUS-TOY-0004", "Shock Absorber Front");
    db.products().insert(&p).await.unwrap();

    let err = db.products().set_stock(&p.id, -1).await.unwrap_err();
    assert!(matches!(err, DbError::CheckViolation { .. }));

    db.products().set_stock(&p.id, 7).await.unwrap();
    let stored = db.products().get_by_id(&p.id).await.unwrap().unwrap();
    assert_eq!(stored.stock, 7);
}
