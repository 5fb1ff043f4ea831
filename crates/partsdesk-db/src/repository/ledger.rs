//! # Ledger Repository
//!
//! Read-only access to ledger entries.
//!
//! Entries are written solely by the checkout coordinator (payment
//! received at checkout); everything here is a query over that history.

use sqlx::SqlitePool;

use crate::error::DbResult;
use partsdesk_core::{LedgerEntry, Money};

const LEDGER_COLUMNS: &str =
    "id, invoice_id, party_id, amount_cents, direction, payment_method, description, date";

/// Repository for ledger queries.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Entries settling a given invoice, oldest first.
    pub async fn list_for_invoice(&self, invoice_id: &str) -> DbResult<Vec<LedgerEntry>> {
        let sql = format!(
            "SELECT {LEDGER_COLUMNS} FROM ledger_entries WHERE invoice_id = ?1 ORDER BY date"
        );

        let entries: Vec<LedgerEntry> = sqlx::query_as(&sql)
            .bind(invoice_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    /// Entries on a party's ledger, oldest first.
    pub async fn list_for_party(&self, party_id: &str) -> DbResult<Vec<LedgerEntry>> {
        let sql = format!(
            "SELECT {LEDGER_COLUMNS} FROM ledger_entries WHERE party_id = ?1 ORDER BY date"
        );

        let entries: Vec<LedgerEntry> = sqlx::query_as(&sql)
            .bind(party_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    /// Total credited against an invoice (payments received).
    pub async fn total_credited(&self, invoice_id: &str) -> DbResult<Money> {
        let total: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(amount_cents) FROM ledger_entries \
             WHERE invoice_id = ?1 AND direction = 'credit'",
        )
        .bind(invoice_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(total.unwrap_or(0)))
    }
}
