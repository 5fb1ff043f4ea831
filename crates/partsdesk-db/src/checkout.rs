//! # Checkout Coordinator
//!
//! The order-fulfilment engine: the only subsystem that must preserve
//! multi-entity invariants atomically under concurrency.
//!
//! ## One Checkout, One Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Checkout Phases                                   │
//! │                                                                         │
//! │  Validating ──► CheckingStock ──► Pricing ──► Persisting               │
//! │                                                    │                    │
//! │                       MutatingStock ◄──────────────┘                    │
//! │                            │                                            │
//! │                       RecordingLedger ──► Committed                     │
//! │                                                                         │
//! │  Any failure in any phase → Aborted: the transaction rolls back        │
//! │  and NOTHING is durable. There is no partial commit.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stock Safety
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Two guards, one authority:                                            │
//! │                                                                         │
//! │  1. CheckingStock reads the product row inside the transaction and     │
//! │     fast-fails with InsufficientStock. ADVISORY ONLY.                  │
//! │                                                                         │
//! │  2. MutatingStock runs the conditional decrement                       │
//! │        UPDATE products SET stock = stock - q                           │
//! │        WHERE id = ? AND stock >= q                                     │
//! │     Zero rows affected → ConcurrentStockConflict and the whole         │
//! │     checkout aborts. THIS is the authoritative guard; a CHECK          │
//! │     constraint on the column backstops it.                             │
//! │                                                                         │
//! │  There is no application-level lock across checkouts. Two checkouts    │
//! │  for the same product cannot both win: the decrement condition is      │
//! │  evaluated under the store's write lock.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write-First Lock Ordering
//! The FIRST statement of the transaction is the invoice-number sequence
//! bump. On SQLite this acquires the write lock immediately, so concurrent
//! checkouts queue on the busy timeout instead of failing a read-snapshot
//! upgrade mid-flight. It also makes invoice numbers collision-free by
//! construction.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::DbError;
use partsdesk_core::validation::validate_order;
use partsdesk_core::{
    CheckoutReceipt, InvoiceType, LedgerDirection, OrderLine, OrderRequest, TaxBreakdown,
    ValidationError,
};

// =============================================================================
// Error Taxonomy
// =============================================================================

/// Everything a checkout can fail with.
///
/// ## Fault Classification
/// ```text
/// Client fault (fix the request):   Validation, ProductNotFound,
///                                   InsufficientStock
/// Server fault (retry the request): ConcurrentStockConflict, Persistence
/// ```
/// The coordinator never retries on the caller's behalf.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The request was malformed; nothing was attempted.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An order line references a product id that doesn't resolve.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The advisory availability check found too little stock.
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        requested: i64,
        available: i64,
    },

    /// The authoritative conditional decrement failed: a concurrent
    /// checkout consumed the stock between our advisory read and the
    /// mutation. Retryable by the caller.
    #[error(
        "Concurrent stock conflict on {product_id}: available {available}, requested {requested}"
    )]
    ConcurrentStockConflict {
        product_id: String,
        requested: i64,
        available: i64,
    },

    /// A transient store error. Retryable by the caller.
    #[error("Persistence failure: {0}")]
    Persistence(#[from] DbError),
}

impl CheckoutError {
    /// True when the caller can fix the error by changing the request.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            CheckoutError::Validation(_)
                | CheckoutError::ProductNotFound(_)
                | CheckoutError::InsufficientStock { .. }
        )
    }

    /// True when retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CheckoutError::ConcurrentStockConflict { .. } | CheckoutError::Persistence(_)
        )
    }
}

impl From<sqlx::Error> for CheckoutError {
    fn from(err: sqlx::Error) -> Self {
        CheckoutError::Persistence(DbError::from(err))
    }
}

// =============================================================================
// Phases
// =============================================================================

/// Coordinator state machine. `Aborted` is reached from any phase by
/// returning an error; the transaction guard rolls back on drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Validating,
    CheckingStock,
    Pricing,
    Persisting,
    MutatingStock,
    RecordingLedger,
    Committed,
}

fn enter(phase: Phase) {
    debug!(?phase, "checkout phase");
}

// =============================================================================
// Coordinator
// =============================================================================

/// Orchestrates a checkout as one all-or-nothing unit of work.
///
/// ## Usage
/// ```rust,ignore
/// let receipt = db.checkout().checkout(request).await?;
/// println!("created {}", receipt.invoice_number);
/// ```
///
/// The handle is injected per call site; there is no process-wide
/// coordinator state and no lock shared across requests.
#[derive(Debug, Clone)]
pub struct CheckoutCoordinator {
    pool: SqlitePool,
}

impl CheckoutCoordinator {
    /// Creates a coordinator over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        CheckoutCoordinator { pool }
    }

    /// Runs one checkout: validates, checks stock, prices, persists the
    /// invoice with snapshot line items, decrements stock conditionally,
    /// records the payment ledger entry, and commits.
    ///
    /// On any error the transaction is rolled back and there is no
    /// durable effect of any kind.
    pub async fn checkout(&self, request: OrderRequest) -> Result<CheckoutReceipt, CheckoutError> {
        match self.run(&request).await {
            Ok(receipt) => {
                info!(
                    invoice_number = %receipt.invoice_number,
                    total = %receipt.total_amount_cents,
                    tax = %receipt.tax_amount_cents,
                    lines = request.items.len(),
                    "Checkout committed"
                );
                Ok(receipt)
            }
            Err(err) => {
                warn!(error = %err, client_fault = err.is_client_fault(), "Checkout aborted");
                Err(err)
            }
        }
    }

    async fn run(&self, request: &OrderRequest) -> Result<CheckoutReceipt, CheckoutError> {
        enter(Phase::Validating);
        validate_order(request)?;

        let mut tx = self.pool.begin().await?;

        // Write-first: allocate the invoice number before any read so the
        // transaction owns the write lock for its whole lifetime.
        let invoice_number = next_invoice_number(&mut tx).await?;

        enter(Phase::CheckingStock);
        for line in &request.items {
            let stock: Option<i64> =
                sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
                    .bind(&line.product_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            let available =
                stock.ok_or_else(|| CheckoutError::ProductNotFound(line.product_id.clone()))?;

            if available < line.quantity {
                return Err(CheckoutError::InsufficientStock {
                    product_id: line.product_id.clone(),
                    requested: line.quantity,
                    available,
                });
            }
        }

        if let Some(party_id) = &request.party_id {
            let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM parties WHERE id = ?1")
                .bind(party_id)
                .fetch_optional(&mut *tx)
                .await?;

            if found.is_none() {
                return Err(ValidationError::UnknownReference {
                    field: "partyId".to_string(),
                    id: party_id.clone(),
                }
                .into());
            }
        }

        enter(Phase::Pricing);
        let mut totals = TaxBreakdown::new();
        for line in &request.items {
            totals.add_line(line.unit_price(), line.tax_rate(), line.quantity);
        }

        enter(Phase::Persisting);
        let invoice_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO invoices (\
                 id, invoice_number, party_id, kind, date, \
                 total_amount_cents, tax_amount_cents, is_cash_sale, created_at\
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&invoice_id)
        .bind(&invoice_number)
        .bind(&request.party_id)
        .bind(InvoiceType::Sales)
        .bind(now)
        .bind(totals.total().cents())
        .bind(totals.tax_total().cents())
        .bind(request.is_cash_sale)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for line in &request.items {
            insert_line_item(&mut tx, &invoice_id, line).await?;
        }

        enter(Phase::MutatingStock);
        for line in &request.items {
            decrement_stock(&mut tx, line).await?;
        }

        enter(Phase::RecordingLedger);
        let paid = request.paid_amount();
        if paid.is_positive() {
            sqlx::query(
                "INSERT INTO ledger_entries (\
                     id, invoice_id, party_id, amount_cents, direction, \
                     payment_method, description, date\
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&invoice_id)
            .bind(&request.party_id)
            .bind(paid.cents())
            // Payment received = credit on the party ledger: it reduces
            // their outstanding receivable.
            .bind(LedgerDirection::Credit)
            .bind(request.payment_method)
            .bind(format!("Payment for invoice {invoice_number}"))
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        enter(Phase::Committed);

        Ok(CheckoutReceipt {
            invoice_id,
            invoice_number,
            total_amount_cents: totals.total().cents(),
            tax_amount_cents: totals.tax_total().cents(),
            is_cash_sale: request.is_cash_sale,
        })
    }
}

// =============================================================================
// Transaction Steps
// =============================================================================

/// Allocates the next invoice number from the store-side sequence.
///
/// Monotonic and collision-free under concurrency: the bump happens
/// inside this transaction, so two checkouts can never observe the same
/// value. (Replaces a wall-clock scheme that could collide under load.)
async fn next_invoice_number(tx: &mut Transaction<'_, Sqlite>) -> Result<String, CheckoutError> {
    let value: i64 = sqlx::query_scalar(
        "UPDATE invoice_sequences SET next_value = next_value + 1 \
         WHERE scope = ?1 RETURNING next_value",
    )
    .bind("sales")
    .fetch_one(&mut **tx)
    .await?;

    Ok(format!("INV-{value:06}"))
}

/// Persists one snapshot line item.
async fn insert_line_item(
    tx: &mut Transaction<'_, Sqlite>,
    invoice_id: &str,
    line: &OrderLine,
) -> Result<(), CheckoutError> {
    sqlx::query(
        "INSERT INTO invoice_items (\
             id, invoice_id, product_id, quantity, unit_price_cents, \
             tax_rate_bps, amount_cents\
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(invoice_id)
    .bind(&line.product_id)
    .bind(line.quantity)
    .bind(line.unit_price_cents)
    .bind(line.tax_rate_bps)
    .bind(line.unit_price().multiply_quantity(line.quantity).cents())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// The authoritative stock guard: decrement only if enough stock remains
/// AT MUTATION TIME. A failed condition means a concurrent checkout ran
/// between our advisory read and this statement.
async fn decrement_stock(
    tx: &mut Transaction<'_, Sqlite>,
    line: &OrderLine,
) -> Result<(), CheckoutError> {
    let now = Utc::now();

    let result = sqlx::query(
        "UPDATE products SET stock = stock - ?1, updated_at = ?2 \
         WHERE id = ?3 AND stock >= ?1",
    )
    .bind(line.quantity)
    .bind(now)
    .bind(&line.product_id)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        // Distinguish "vanished" from "outraced" for the caller.
        let available: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
            .bind(&line.product_id)
            .fetch_optional(&mut **tx)
            .await?;

        return Err(match available {
            Some(available) => CheckoutError::ConcurrentStockConflict {
                product_id: line.product_id.clone(),
                requested: line.quantity,
                available,
            },
            None => CheckoutError::ProductNotFound(line.product_id.clone()),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
