//! # partsdesk-core: Pure Business Logic for PartsDesk
//!
//! This crate is the **heart** of PartsDesk. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       PartsDesk Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                partsdesk-intake (front end)                     │   │
//! │  │    free-text message ──► quote / draft checkout request         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ partsdesk-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │    tax    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ inclusive │  │   rules   │  │   │
//! │  │   │  Invoice  │  │  TaxRate  │  │ back-calc │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 partsdesk-db (Database Layer)                   │   │
//! │  │       SQLite repositories + transactional checkout engine       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Party, Invoice, LedgerEntry, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`tax`] - Tax-inclusive price back-calculation
//! - [`error`] - Domain error types
//! - [`validation`] - Checkout request and field validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use partsdesk_core::money::Money;
//! use partsdesk_core::money::TaxRate;
//! use partsdesk_core::tax::TaxBreakdown;
//!
//! // Prices are tax-inclusive: tax is backed OUT, never added on top.
//! let mut totals = TaxBreakdown::new();
//! totals.add_line(Money::from_cents(11800), TaxRate::from_bps(1800), 1);
//!
//! assert_eq!(totals.total().cents(), 11800);   // line amount = P × qty
//! assert_eq!(totals.tax_total().cents(), 1800); // 18% backed out of 118.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use partsdesk_core::Money` instead of
// `use partsdesk_core::money::Money`

pub use error::ValidationError;
pub use money::{Money, TaxRate};
pub use tax::TaxBreakdown;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single line item in an order
///
/// ## Business Reason
/// A sanity bound against data-entry accidents (a barcode pasted into the
/// quantity field). Generous enough that any real counter order passes.
pub const MAX_LINE_QUANTITY: i64 = 99_999;

/// Maximum unit price accepted on a line item, in cents (one billion).
///
/// ## Business Reason
/// A sanity bound against data-entry accidents. Together with
/// [`MAX_LINE_QUANTITY`] and [`MAX_ORDER_LINES`] it also guarantees that
/// order totals stay far inside `i64`:
/// `200 × 99_999 × 10^11 < 2^63`, so the totaling math cannot overflow.
pub const MAX_UNIT_PRICE_CENTS: i64 = 100_000_000_000;

/// Maximum tax rate accepted on a line item, in basis points (100%)
///
/// ## Business Reason
/// A rate above 100% on a tax-inclusive price is always a data-entry error.
pub const MAX_TAX_RATE_BPS: u32 = 10_000;

/// Maximum line items allowed in a single order
pub const MAX_ORDER_LINES: usize = 200;
