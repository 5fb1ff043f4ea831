//! # Invoice Repository
//!
//! Read-only access to committed invoices.
//!
//! ## Why Read-Only?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Invoices, line items, and their ledger entries are written EXACTLY    │
//! │  ONCE, inside the checkout coordinator's transaction. After commit     │
//! │  they are historical records: no update or delete path exists in       │
//! │  this crate, so snapshots can never drift from what was sold.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use partsdesk_core::{Invoice, InvoiceItem, Party};

const INVOICE_COLUMNS: &str = "id, invoice_number, party_id, kind, date, \
     total_amount_cents, tax_amount_cents, is_cash_sale, created_at";

const ITEM_COLUMNS: &str =
    "id, invoice_id, product_id, quantity, unit_price_cents, tax_rate_bps, amount_cents";

/// An invoice with its nested party and line-item detail, as returned by
/// the listing operation.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceWithDetails {
    pub invoice: Invoice,
    pub party: Option<Party>,
    pub items: Vec<InvoiceItem>,
}

/// Repository for invoice queries.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Gets an invoice by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Invoice>> {
        let sql = format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1");

        let invoice: Option<Invoice> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(invoice)
    }

    /// Gets an invoice by its business number.
    pub async fn get_by_number(&self, invoice_number: &str) -> DbResult<Option<Invoice>> {
        let sql = format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE invoice_number = ?1");

        let invoice: Option<Invoice> = sqlx::query_as(&sql)
            .bind(invoice_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(invoice)
    }

    /// Gets all line items for an invoice.
    pub async fn get_items(&self, invoice_id: &str) -> DbResult<Vec<InvoiceItem>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM invoice_items WHERE invoice_id = ?1");

        let items: Vec<InvoiceItem> = sqlx::query_as(&sql)
            .bind(invoice_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Lists invoices newest-first with nested party and line-item detail.
    ///
    /// ## Consistency
    /// Plain reads at the store's default isolation; the listing has no
    /// atomicity requirement beyond that.
    pub async fn list_with_details(&self, limit: u32) -> DbResult<Vec<InvoiceWithDetails>> {
        debug!(limit = %limit, "Listing invoices with details");

        let sql = format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY date DESC, invoice_number DESC LIMIT ?1"
        );

        let invoices: Vec<Invoice> = sqlx::query_as(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let party_sql =
            "SELECT id, name, role, gst_no, phone, address, created_at FROM parties WHERE id = ?1";

        let mut detailed = Vec::with_capacity(invoices.len());
        for invoice in invoices {
            let party: Option<Party> = match &invoice.party_id {
                Some(party_id) => {
                    sqlx::query_as(party_sql)
                        .bind(party_id)
                        .fetch_optional(&self.pool)
                        .await?
                }
                None => None,
            };

            let items = self.get_items(&invoice.id).await?;

            detailed.push(InvoiceWithDetails {
                invoice,
                party,
                items,
            });
        }

        Ok(detailed)
    }

    /// Counts committed invoices (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
