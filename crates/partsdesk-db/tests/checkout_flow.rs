//! End-to-end checkout tests over a real SQLite database.
//!
//! Most tests use an in-memory database. The concurrency tests use a
//! temp-file database because in-memory SQLite is per-connection and the
//! in-memory pool is capped at one connection.

use chrono::Utc;
use uuid::Uuid;

use partsdesk_core::{
    LedgerDirection, OrderLine, OrderRequest, Party, PartyRole, PaymentMethod, Product,
    ValidationError,
};
use partsdesk_db::{CheckoutError, Database, DbConfig};

// =============================================================================
// Fixtures
// =============================================================================

async fn memory_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// A temp-file database whose pool allows true concurrent connections.
async fn file_db() -> (Database, std::path::PathBuf) {
    let path = std::env::temp_dir().join(format!("partsdesk-test-{}.db", Uuid::new_v4()));
    let db = Database::new(DbConfig::new(&path).max_connections(4))
        .await
        .expect("temp-file database");
    (db, path)
}

fn cleanup_file_db(path: &std::path::Path) {
    for suffix in ["", "-wal", "-shm"] {
        let mut p = path.as_os_str().to_owned();
        p.push(suffix);
        let _ = std::fs::remove_file(std::path::PathBuf::from(p));
    }
}

fn product(sku: &str, sale_price_cents: i64, tax_rate_bps: u32, stock: i64) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4().to_string(),
        sku: sku.to_string(),
        name: format!("Part {sku}"),
        brand: Some("Bosch".to_string()),
        make: Some("Toyota".to_string()),
        model: Some("Corolla".to_string()),
        variant: None,
        category: Some("BRK".to_string()),
        purchase_price_cents: Some(sale_price_cents * 7 / 10),
        sale_price_cents,
        tax_rate_bps,
        stock,
        created_at: now,
        updated_at: now,
    }
}

fn client(name: &str) -> Party {
    Party {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        role: PartyRole::Client,
        gst_no: None,
        phone: None,
        address: None,
        created_at: Utc::now(),
    }
}

fn line(product: &Product, quantity: i64) -> OrderLine {
    OrderLine {
        product_id: product.id.clone(),
        quantity,
        unit_price_cents: product.sale_price_cents,
        tax_rate_bps: product.tax_rate_bps,
    }
}

fn cash_order(items: Vec<OrderLine>, paid_cents: i64) -> OrderRequest {
    OrderRequest {
        party_id: None,
        items,
        is_cash_sale: true,
        payment_method: Some(PaymentMethod::Cash),
        paid_amount_cents: Some(paid_cents),
    }
}

// =============================================================================
// Happy Path
// =============================================================================

#[tokio::test]
async fn checkout_commits_invoice_items_stock_and_ledger() {
    let db = memory_db().await;

    let p1 = product("BRK-TOY-0001", 11800, 1800, 10);
    let p2 = product("FLT-TOY-0002", 2500, 0, 5);
    db.products().insert(&p1).await.unwrap();
    db.products().insert(&p2).await.unwrap();

    let total = 2 * 11800 + 3 * 2500;
    let receipt = db
        .checkout()
        .checkout(cash_order(vec![line(&p1, 2), line(&p2, 3)], total))
        .await
        .unwrap();

    // Totals reconcile: sum of line amounts, tax backed out of taxed lines.
    assert_eq!(receipt.total_amount_cents, total);
    assert_eq!(receipt.tax_amount_cents, 3600); // 2 × 1800, zero-rate line adds nothing
    assert!(receipt.invoice_number.starts_with("INV-"));

    // Invoice header persisted with the same numbers.
    let invoice = db
        .invoices()
        .get_by_number(&receipt.invoice_number)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(invoice.id, receipt.invoice_id);
    assert_eq!(invoice.total_amount_cents, total);
    assert_eq!(invoice.tax_amount_cents, 3600);
    assert!(invoice.is_cash_sale);

    // Line items snapshot price and rate.
    let mut items = db.invoices().get_items(&invoice.id).await.unwrap();
    items.sort_by_key(|i| i.unit_price_cents);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].unit_price_cents, 2500);
    assert_eq!(items[0].amount_cents, 7500);
    assert_eq!(items[1].unit_price_cents, 11800);
    assert_eq!(items[1].tax_rate_bps, 1800);
    assert_eq!(items[1].amount_cents, 23600);

    // Stock decremented exactly once per line.
    let p1_after = db.products().get_by_id(&p1.id).await.unwrap().unwrap();
    let p2_after = db.products().get_by_id(&p2.id).await.unwrap().unwrap();
    assert_eq!(p1_after.stock, 8);
    assert_eq!(p2_after.stock, 2);

    // Payment recorded as a credit against the invoice.
    let entries = db.ledger().list_for_invoice(&invoice.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount_cents, total);
    assert_eq!(entries[0].direction, LedgerDirection::Credit);
    assert_eq!(entries[0].payment_method, Some(PaymentMethod::Cash));
    assert_eq!(
        db.ledger().total_credited(&invoice.id).await.unwrap().cents(),
        total
    );
}

#[tokio::test]
async fn checkout_with_party_links_invoice_and_ledger_to_party() {
    let db = memory_db().await;

    let p = product("SUS-TOY-0003", 9000, 1800, 4);
    db.products().insert(&p).await.unwrap();
    let party = client("City Motors Workshop");
    db.parties().insert(&party).await.unwrap();

    let request = OrderRequest {
        party_id: Some(party.id.clone()),
        items: vec![line(&p, 1)],
        is_cash_sale: false,
        payment_method: Some(PaymentMethod::Bank),
        paid_amount_cents: Some(5000), // partial payment on credit sale
    };

    let receipt = db.checkout().checkout(request).await.unwrap();

    let invoice = db
        .invoices()
        .get_by_id(&receipt.invoice_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(invoice.party_id.as_deref(), Some(party.id.as_str()));
    assert!(!invoice.is_cash_sale);

    let entries = db.ledger().list_for_party(&party.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount_cents, 5000);
    assert_eq!(entries[0].invoice_id.as_deref(), Some(receipt.invoice_id.as_str()));
}

#[tokio::test]
async fn unpaid_checkout_writes_no_ledger_entry() {
    let db = memory_db().await;

    let p = product("ELE-TOY-0004", 4000, 1800, 3);
    db.products().insert(&p).await.unwrap();

    let request = OrderRequest {
        party_id: None,
        items: vec![line(&p, 1)],
        is_cash_sale: false,
        payment_method: None,
        paid_amount_cents: None,
    };

    let receipt = db.checkout().checkout(request).await.unwrap();

    let entries = db.ledger().list_for_invoice(&receipt.invoice_id).await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn invoice_numbers_are_sequential_and_unique() {
    let db = memory_db().await;

    let p = product("ENG-TOY-0005", 1000, 0, 100);
    db.products().insert(&p).await.unwrap();

    let mut numbers = Vec::new();
    for _ in 0..3 {
        let receipt = db
            .checkout()
            .checkout(cash_order(vec![line(&p, 1)], 1000))
            .await
            .unwrap();
        numbers.push(receipt.invoice_number);
    }

    assert_eq!(numbers, vec!["INV-000001", "INV-000002", "INV-000003"]);
}

#[tokio::test]
async fn invoice_snapshot_survives_catalog_price_change() {
    let db = memory_db().await;

    let mut p = product("BRK-TOY-0006", 11800, 1800, 10);
    db.products().insert(&p).await.unwrap();

    let receipt = db
        .checkout()
        .checkout(cash_order(vec![line(&p, 1)], 11800))
        .await
        .unwrap();

    // Reprice the catalog item after the sale.
    p.sale_price_cents = 20000;
    db.products().update(&p).await.unwrap();

    let items = db.invoices().get_items(&receipt.invoice_id).await.unwrap();
    assert_eq!(items[0].unit_price_cents, 11800);

    let invoice = db
        .invoices()
        .get_by_id(&receipt.invoice_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(invoice.total_amount_cents, 11800);
}

#[tokio::test]
async fn invoice_listing_nests_party_and_items_newest_first() {
    let db = memory_db().await;

    let p1 = product("BRK-TOY-0020", 11800, 1800, 10);
    let p2 = product("FLT-TOY-0021", 2500, 0, 10);
    db.products().insert(&p1).await.unwrap();
    db.products().insert(&p2).await.unwrap();
    let party = client("Khan Auto Repairs");
    db.parties().insert(&party).await.unwrap();

    // First a walk-in cash sale, then a credit sale for the party.
    let first = db
        .checkout()
        .checkout(cash_order(vec![line(&p1, 1)], 11800))
        .await
        .unwrap();
    let second = db
        .checkout()
        .checkout(OrderRequest {
            party_id: Some(party.id.clone()),
            items: vec![line(&p1, 2), line(&p2, 1)],
            is_cash_sale: false,
            payment_method: None,
            paid_amount_cents: None,
        })
        .await
        .unwrap();

    let listed = db.invoices().list_with_details(10).await.unwrap();
    assert_eq!(listed.len(), 2);

    // Newest first: the credit sale leads.
    assert_eq!(listed[0].invoice.invoice_number, second.invoice_number);
    assert_eq!(listed[1].invoice.invoice_number, first.invoice_number);

    // Party nested where one exists, absent on the walk-in sale.
    let with_party = listed[0].party.as_ref().expect("credit sale has a party");
    assert_eq!(with_party.name, "Khan Auto Repairs");
    assert!(listed[1].party.is_none());

    // Line items nested per invoice.
    assert_eq!(listed[0].items.len(), 2);
    assert_eq!(listed[1].items.len(), 1);
    assert_eq!(listed[1].items[0].unit_price_cents, 11800);

    // The limit bounds the listing.
    let capped = db.invoices().list_with_details(1).await.unwrap();
    assert_eq!(capped.len(), 1);
    assert_eq!(capped[0].invoice.invoice_number, second.invoice_number);
}

// =============================================================================
// Failure Atomicity
// =============================================================================

async fn assert_no_durable_effects(db: &Database, product_id: &str, expected_stock: i64) {
    assert_eq!(db.invoices().count().await.unwrap(), 0);
    let p = db.products().get_by_id(product_id).await.unwrap().unwrap();
    assert_eq!(p.stock, expected_stock);
}

#[tokio::test]
async fn insufficient_stock_aborts_with_no_writes() {
    let db = memory_db().await;

    let p = product("BRK-TOY-0007", 5000, 1800, 2);
    db.products().insert(&p).await.unwrap();

    let err = db
        .checkout()
        .checkout(cash_order(vec![line(&p, 3)], 15000))
        .await
        .unwrap_err();

    match err {
        CheckoutError::InsufficientStock {
            requested,
            available,
            ..
        } => {
            assert_eq!(requested, 3);
            assert_eq!(available, 2);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }
    assert!(err.is_client_fault());

    assert_no_durable_effects(&db, &p.id, 2).await;
}

#[tokio::test]
async fn insufficient_stock_on_second_line_rolls_back_first_line() {
    let db = memory_db().await;

    let p1 = product("FLT-TOY-0008", 2000, 0, 10);
    let p2 = product("FLT-TOY-0009", 3000, 0, 1);
    db.products().insert(&p1).await.unwrap();
    db.products().insert(&p2).await.unwrap();

    let err = db
        .checkout()
        .checkout(cash_order(vec![line(&p1, 2), line(&p2, 5)], 19000))
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::InsufficientStock { .. }));

    // The first line's product must be untouched too.
    assert_no_durable_effects(&db, &p1.id, 10).await;
    assert_no_durable_effects(&db, &p2.id, 1).await;
}

#[tokio::test]
async fn unknown_product_aborts_checkout() {
    let db = memory_db().await;

    let request = cash_order(
        vec![OrderLine {
            product_id: "no-such-product".to_string(),
            quantity: 1,
            unit_price_cents: 1000,
            tax_rate_bps: 0,
        }],
        1000,
    );

    let err = db.checkout().checkout(request).await.unwrap_err();
    assert!(matches!(err, CheckoutError::ProductNotFound(id) if id == "no-such-product"));
    assert_eq!(db.invoices().count().await.unwrap(), 0);
}

#[tokio::test]
async fn unknown_party_aborts_checkout() {
    let db = memory_db().await;

    let p = product("ELE-TOY-0010", 1500, 0, 5);
    db.products().insert(&p).await.unwrap();

    let request = OrderRequest {
        party_id: Some("no-such-party".to_string()),
        items: vec![line(&p, 1)],
        is_cash_sale: false,
        payment_method: None,
        paid_amount_cents: None,
    };

    let err = db.checkout().checkout(request).await.unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::Validation(ValidationError::UnknownReference { .. })
    ));

    assert_no_durable_effects(&db, &p.id, 5).await;
}

#[tokio::test]
async fn empty_order_is_rejected_before_touching_the_store() {
    let db = memory_db().await;

    let err = db
        .checkout()
        .checkout(cash_order(vec![], 0))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::Validation(ValidationError::EmptyOrder)
    ));
    assert_eq!(db.invoices().count().await.unwrap(), 0);
}

#[tokio::test]
async fn nonpositive_quantity_is_rejected() {
    let db = memory_db().await;

    let p = product("ENG-TOY-0011", 1000, 0, 5);
    db.products().insert(&p).await.unwrap();

    let err = db
        .checkout()
        .checkout(cash_order(vec![line(&p, 0)], 0))
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::Validation(_)));
    assert_no_durable_effects(&db, &p.id, 5).await;
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_checkouts_cannot_oversell_last_unit() {
    let (db, path) = file_db().await;

    let p = product("BRK-TOY-0012", 8000, 1800, 1);
    db.products().insert(&p).await.unwrap();

    let a = {
        let db = db.clone();
        let request = cash_order(vec![line(&p, 1)], 8000);
        tokio::spawn(async move { db.checkout().checkout(request).await })
    };
    let b = {
        let db = db.clone();
        let request = cash_order(vec![line(&p, 1)], 8000);
        tokio::spawn(async move { db.checkout().checkout(request).await })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "exactly one checkout may claim the last unit");

    let loss = results.iter().find(|r| r.is_err()).unwrap();
    match loss.as_ref().unwrap_err() {
        CheckoutError::InsufficientStock { available, .. }
        | CheckoutError::ConcurrentStockConflict { available, .. } => {
            assert_eq!(*available, 0);
        }
        other => panic!("unexpected loser error: {other:?}"),
    }

    let after = db.products().get_by_id(&p.id).await.unwrap().unwrap();
    assert_eq!(after.stock, 0);
    assert_eq!(db.invoices().count().await.unwrap(), 1);

    db.close().await;
    cleanup_file_db(&path);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_checkouts_get_distinct_invoice_numbers() {
    let (db, path) = file_db().await;

    let p = product("FLT-TOY-0013", 1200, 0, 100);
    db.products().insert(&p).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let db = db.clone();
        let request = cash_order(vec![line(&p, 1)], 1200);
        handles.push(tokio::spawn(
            async move { db.checkout().checkout(request).await },
        ));
    }

    let mut numbers = Vec::new();
    for handle in handles {
        let receipt = handle.await.unwrap().expect("ample stock, all succeed");
        numbers.push(receipt.invoice_number);
    }

    let unique: std::collections::HashSet<_> = numbers.iter().collect();
    assert_eq!(unique.len(), numbers.len(), "invoice numbers must be unique");

    let after = db.products().get_by_id(&p.id).await.unwrap().unwrap();
    assert_eq!(after.stock, 92);

    db.close().await;
    cleanup_file_db(&path);
}
