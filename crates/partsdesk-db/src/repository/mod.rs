//! # Repository Module
//!
//! Database repository implementations for PartsDesk.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Caller                                                                │
//! │       │                                                                 │
//! │       │  db.products().search("abs sensor", 20)                        │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── search(&self, query, limit)                                       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, product)                                            │
//! │  └── set_stock(&self, id, stock)                                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write Boundaries
//! The repositories here are the simple CRUD collaborators. Invoices,
//! invoice items, ledger entries, and stock decrements are written ONLY by
//! the checkout coordinator inside its transaction - the repositories
//! expose them read-only (plus the manual stock-adjustment path).
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD, search, stock adjustment
//! - [`party::PartyRepository`] - Party directory
//! - [`invoice::InvoiceRepository`] - Invoice listing with details
//! - [`ledger::LedgerRepository`] - Ledger queries

pub mod invoice;
pub mod ledger;
pub mod party;
pub mod product;
