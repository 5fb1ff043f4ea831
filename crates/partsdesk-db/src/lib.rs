//! # partsdesk-db: Storage Layer for PartsDesk
//!
//! SQLite persistence for the PartsDesk back-office, built on sqlx.
//! Home of the checkout coordinator - the single write path for sales.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       PartsDesk Data Flow                               │
//! │                                                                         │
//! │  Caller (back-office UI, intake assistant, seed tool)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   partsdesk-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌─────────────────┐ │   │
//! │  │   │   Database    │   │ Repositories  │   │    Checkout     │ │   │
//! │  │   │   (pool.rs)   │   │ product/party │   │   Coordinator   │ │   │
//! │  │   │               │   │ invoice/ledger│   │ (checkout.rs)   │ │   │
//! │  │   │ SqlitePool    │◄──│   reads +     │   │ ONE transaction │ │   │
//! │  │   │ WAL + busy    │   │ catalog CRUD  │   │ per checkout    │ │   │
//! │  │   │ timeout       │   └───────────────┘   └─────────────────┘ │   │
//! │  │   └───────────────┘                                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, party, invoice, ledger)
//! - [`checkout`] - The order-fulfilment coordinator
//!
//! ## Usage
//!
//! ```rust,ignore
//! use partsdesk_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/partsdesk.db")).await?;
//!
//! // Reads go through repositories
//! let parts = db.products().search("abs sensor", 20).await?;
//!
//! // Sales go through the coordinator
//! let receipt = db.checkout().checkout(request).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{CheckoutCoordinator, CheckoutError};
pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::invoice::{InvoiceRepository, InvoiceWithDetails};
pub use repository::ledger::LedgerRepository;
pub use repository::party::PartyRepository;
pub use repository::product::ProductRepository;
