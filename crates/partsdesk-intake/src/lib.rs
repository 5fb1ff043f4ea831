//! # partsdesk-intake: Text Order Intake
//!
//! Turns a free-text message ("2x audi a4 abs sensor") into either a
//! formatted stock quote or a draft checkout request for the coordinator.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  message                                                                │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  parser::parse_message  ──► make / model / part name / quantity        │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  catalog search (part name) ──► filter by make/model substring         │
//! │     │                                                                   │
//! │     ├──► quote(..)        formatted availability reply                 │
//! │     └──► draft_order(..)  OrderRequest snapshotting the first match's  │
//! │                           current sale price and tax rate              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Drafts are NOT checkouts: the caller reviews the request and submits it
//! to the checkout coordinator, which re-checks stock authoritatively.

pub mod parser;

use tracing::debug;

use partsdesk_core::{OrderLine, OrderRequest, Product};
use partsdesk_db::{Database, DbError};

pub use parser::{parse_message, ParsedOrder};

/// How many catalog rows a quote considers.
const SEARCH_LIMIT: u32 = 20;

/// Intake failures. Thin by design: the interesting errors belong to the
/// checkout engine, not the front end.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Storage failure: {0}")]
    Db(#[from] DbError),
}

/// A drafted order plus the products it matched, for caller review.
#[derive(Debug, Clone)]
pub struct DraftOrder {
    pub request: OrderRequest,
    pub matched: Product,
}

/// Text-intake service over the catalog.
#[derive(Debug, Clone)]
pub struct OrderIntake {
    db: Database,
}

impl OrderIntake {
    /// Creates an intake service over the given database handle.
    pub fn new(db: Database) -> Self {
        OrderIntake { db }
    }

    /// Answers a free-text availability question with a formatted reply.
    ///
    /// Never fails on a non-matching message; unknown parts produce a
    /// polite "no stock" reply instead of an error.
    pub async fn quote(&self, message: &str) -> Result<String, IntakeError> {
        let parsed = parse_message(message);

        if parsed.is_empty() {
            return Ok(
                "I couldn't identify the part you are looking for. \
                 Please specify part name, make, and model."
                    .to_string(),
            );
        }

        let matches = self.search(&parsed).await?;

        if matches.is_empty() {
            return Ok(format!(
                "Sorry, no stock found for {} ({} {})",
                parsed.part_name,
                parsed.make.as_deref().unwrap_or("Any Make"),
                parsed.model.as_deref().unwrap_or(""),
            ));
        }

        let lines: Vec<String> = matches
            .iter()
            .map(|p| {
                format!(
                    "*{}*\nBrand: {}\nPrice: {}\nStock: {}",
                    p.name,
                    p.brand.as_deref().unwrap_or("-"),
                    p.sale_price(),
                    p.stock,
                )
            })
            .collect();

        Ok(format!(
            "Found {} items:\n\n{}",
            matches.len(),
            lines.join("\n\n")
        ))
    }

    /// Drafts a cash-sale checkout request from a message, snapshotting
    /// the best match's current sale price and tax rate.
    ///
    /// Returns `None` when nothing in the catalog matched. The draft
    /// carries no payment; the caller fills that in before checkout.
    pub async fn draft_order(&self, message: &str) -> Result<Option<DraftOrder>, IntakeError> {
        let parsed = parse_message(message);

        if parsed.is_empty() {
            return Ok(None);
        }

        let matches = self.search(&parsed).await?;

        let Some(product) = matches.into_iter().next() else {
            return Ok(None);
        };

        debug!(sku = %product.sku, quantity = parsed.quantity, "Drafting order");

        let request = OrderRequest {
            party_id: None,
            items: vec![OrderLine {
                product_id: product.id.clone(),
                quantity: parsed.quantity,
                unit_price_cents: product.sale_price_cents,
                tax_rate_bps: product.tax_rate_bps,
            }],
            is_cash_sale: true,
            payment_method: None,
            paid_amount_cents: None,
        };

        Ok(Some(DraftOrder {
            request,
            matched: product,
        }))
    }

    /// Searches by part name, then narrows by make/model substring when
    /// the message carried a fitment.
    async fn search(&self, parsed: &ParsedOrder) -> Result<Vec<Product>, IntakeError> {
        let candidates = self
            .db
            .products()
            .search(&parsed.part_name, SEARCH_LIMIT)
            .await?;

        let filtered = candidates
            .into_iter()
            .filter(|p| {
                fitment_matches(parsed.make.as_deref(), p.make.as_deref())
                    && fitment_matches(parsed.model.as_deref(), p.model.as_deref())
            })
            .collect();

        Ok(filtered)
    }
}

/// A fitment filter passes when no filter was given, the product carries
/// no fitment, or the product's value contains the asked-for one.
fn fitment_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match (wanted, actual) {
        (Some(w), Some(a)) => a.to_lowercase().contains(&w.to_lowercase()),
        _ => true,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use partsdesk_db::DbConfig;
    use uuid::Uuid;

    fn part(name: &str, make: &str, model: &str, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4().to_string(),
            sku: format!("SKU-{}", Uuid::new_v4()),
            name: name.to_string(),
            brand: Some("Bosch".to_string()),
            make: Some(make.to_string()),
            model: Some(model.to_string()),
            variant: None,
            category: None,
            purchase_price_cents: None,
            sale_price_cents: price_cents,
            tax_rate_bps: 1800,
            stock,
            created_at: now,
            updated_at: now,
        }
    }

    async fn seeded_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products()
            .insert(&part("ABS Sensor Front Left", "Audi", "A4", 11800, 4))
            .await
            .unwrap();
        db.products()
            .insert(&part("ABS Sensor Front Left", "Toyota", "Corolla", 9500, 2))
            .await
            .unwrap();
        db.products()
            .insert(&part("Radiator", "Toyota", "Corolla", 25000, 0))
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn quote_filters_by_fitment() {
        let intake = OrderIntake::new(seeded_db().await);

        let reply = intake.quote("audi a4 abs sensor").await.unwrap();
        assert!(reply.starts_with("Found 1 items:"));
        assert!(reply.contains("ABS Sensor Front Left"));
        assert!(reply.contains("Price: 118.00"));
        assert!(reply.contains("Stock: 4"));
    }

    #[tokio::test]
    async fn quote_reports_no_stock_for_unknown_part() {
        let intake = OrderIntake::new(seeded_db().await);

        let reply = intake.quote("audi a4 flux capacitor").await.unwrap();
        assert!(reply.starts_with("Sorry, no stock found for flux capacitor"));
    }

    #[tokio::test]
    async fn quote_asks_for_detail_on_unusable_message() {
        let intake = OrderIntake::new(seeded_db().await);

        let reply = intake.quote("  ").await.unwrap();
        assert!(reply.contains("couldn't identify"));
    }

    #[tokio::test]
    async fn draft_order_snapshots_price_and_quantity() {
        let intake = OrderIntake::new(seeded_db().await);

        let draft = intake
            .draft_order("2x toyota corolla abs sensor")
            .await
            .unwrap()
            .expect("catalog match");

        assert_eq!(draft.matched.make.as_deref(), Some("Toyota"));
        assert_eq!(draft.request.items.len(), 1);
        assert_eq!(draft.request.items[0].quantity, 2);
        assert_eq!(draft.request.items[0].unit_price_cents, 9500);
        assert_eq!(draft.request.items[0].tax_rate_bps, 1800);
        assert!(draft.request.is_cash_sale);
        assert!(draft.request.paid_amount_cents.is_none());
    }

    #[tokio::test]
    async fn draft_order_returns_none_when_nothing_matched() {
        let intake = OrderIntake::new(seeded_db().await);

        let draft = intake.draft_order("honda civic turbocharger").await.unwrap();
        assert!(draft.is_none());
    }
}
