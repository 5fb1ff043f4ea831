//! # Domain Types
//!
//! Core domain types used throughout PartsDesk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Invoice      │   │  LedgerEntry    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  sku (business) │   │  invoice_number │   │  invoice_id?    │       │
//! │  │  sale_price     │   │  total_amount   │   │  direction      │       │
//! │  │  stock          │   │  tax_amount     │   │  amount         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Party       │   │  InvoiceItem    │   │  OrderRequest   │       │
//! │  │  client or      │   │  price/rate     │   │  what the       │       │
//! │  │  supplier       │   │  SNAPSHOT       │   │  caller submits │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where one exists: (sku, invoice_number) - human-readable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::{Money, TaxRate};

// =============================================================================
// Party Role
// =============================================================================

/// Which side of the counter a party sits on.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyRole {
    /// Buys from us. May carry an outstanding receivable.
    Client,
    /// Sells to us.
    Supplier,
}

// =============================================================================
// Invoice Type
// =============================================================================

/// Document type of an invoice.
///
/// The checkout engine only ever creates `Sales` invoices; the other
/// variants exist for the purchasing and returns paths that share the
/// same table.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceType {
    Sales,
    Purchase,
    SalesReturn,
    PurchaseReturn,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a payment was tendered.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash at the counter.
    Cash,
    /// Bank transfer / deposit.
    Bank,
}

// =============================================================================
// Ledger Direction
// =============================================================================

/// Direction of money movement from the party-ledger perspective.
///
/// Convention: a payment RECEIVED from a party is a `Credit` to that
/// party's ledger - it reduces their outstanding receivable. A `Debit`
/// increases what they owe us.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerDirection {
    Credit,
    Debit,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog item.
///
/// `stock` is only ever mutated by the checkout engine's conditional
/// decrement or by the manual adjustment path - never anywhere else.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier, unique.
    pub sku: String,

    /// Display name, e.g. "ABS Sensor Front Left".
    pub name: String,

    /// Manufacturer brand, e.g. "Bosch".
    pub brand: Option<String>,

    /// Vehicle make this part fits, e.g. "Audi".
    pub make: Option<String>,

    /// Vehicle model, e.g. "A4".
    pub model: Option<String>,

    /// Model variant / trim.
    pub variant: Option<String>,

    /// Catalog category, e.g. "Brakes".
    pub category: Option<String>,

    /// Purchase (cost) price in cents, if known.
    pub purchase_price_cents: Option<i64>,

    /// Sale price in cents. TAX-INCLUSIVE: the tax portion is backed out,
    /// never added on top.
    pub sale_price_cents: i64,

    /// Tax rate in basis points (1800 = 18%).
    pub tax_rate_bps: u32,

    /// Units on hand. Never negative; the schema carries a CHECK as a
    /// backstop and the checkout engine decrements conditionally.
    pub stock: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the sale price as a Money type.
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }

    /// Returns the tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Advisory check: is there enough stock on hand for this quantity?
    ///
    /// The authoritative guard is the conditional decrement at mutation
    /// time; this is the fast-fail read.
    #[inline]
    pub fn can_fulfil(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Party
// =============================================================================

/// A client or supplier in the directory.
///
/// Read-only from the checkout engine's perspective: invoices and ledger
/// entries reference parties, they never modify them.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    pub id: String,
    pub name: String,
    pub role: PartyRole,
    /// GST registration number, if registered.
    pub gst_no: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Invoice
// =============================================================================

/// An invoice header. Created exactly once inside the checkout
/// transaction and immutable thereafter.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,

    /// Business identifier, e.g. "INV-000042". Unique; allocated from a
    /// store-side monotonic sequence so concurrent checkouts can never
    /// collide.
    pub invoice_number: String,

    /// Optional party; None for anonymous walk-in cash sales.
    pub party_id: Option<String>,

    pub kind: InvoiceType,

    /// Submission time of the order.
    pub date: DateTime<Utc>,

    /// Sum of line amounts, in cents.
    pub total_amount_cents: i64,

    /// Tax backed out of the lines, rounded once at the aggregate.
    pub tax_amount_cents: i64,

    /// If true, no credit was extended for this sale.
    pub is_cash_sale: bool,

    pub created_at: DateTime<Utc>,
}

impl Invoice {
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }

    #[inline]
    pub fn tax_amount(&self) -> Money {
        Money::from_cents(self.tax_amount_cents)
    }
}

// =============================================================================
// Invoice Item
// =============================================================================

/// A line item on an invoice.
///
/// Uses the snapshot pattern: unit price and tax rate are frozen at
/// checkout time, so later catalog price changes never retroactively
/// alter historical invoices.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: String,
    pub invoice_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Tax rate in bps at time of sale (frozen).
    pub tax_rate_bps: u32,
    /// Line amount = unit price × quantity.
    pub amount_cents: i64,
}

impl InvoiceItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Ledger Entry
// =============================================================================

/// An immutable record of money movement.
///
/// Written only inside the checkout transaction (payment received) so an
/// entry can never reference an invoice that failed to commit.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    /// Invoice this movement settles, if any.
    pub invoice_id: Option<String>,
    /// None for anonymous cash entries.
    pub party_id: Option<String>,
    pub amount_cents: i64,
    pub direction: LedgerDirection,
    pub payment_method: Option<PaymentMethod>,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
}

impl LedgerEntry {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Order Request
// =============================================================================

/// One line of an order request.
///
/// Carries the price and rate the caller quoted; these are the values
/// snapshotted onto the invoice, decoupled from the product's current
/// catalog price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub tax_rate_bps: u32,
}

impl OrderLine {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

/// A checkout request as submitted by a caller.
///
/// Validated up front by [`crate::validation::validate_order`]; nothing
/// untyped ever reaches persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Optional party; None for anonymous walk-in sales.
    pub party_id: Option<String>,
    pub items: Vec<OrderLine>,
    pub is_cash_sale: bool,
    pub payment_method: Option<PaymentMethod>,
    /// Amount paid at checkout, in cents. Zero or None means no ledger
    /// entry is written.
    pub paid_amount_cents: Option<i64>,
}

impl OrderRequest {
    /// Paid amount, defaulting to zero.
    #[inline]
    pub fn paid_amount(&self) -> Money {
        Money::from_cents(self.paid_amount_cents.unwrap_or(0))
    }
}

// =============================================================================
// Checkout Receipt
// =============================================================================

/// What a successful checkout returns to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub invoice_id: String,
    pub invoice_number: String,
    pub total_amount_cents: i64,
    pub tax_amount_cents: i64,
    pub is_cash_sale: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================
