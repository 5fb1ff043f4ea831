//! # Error Types
//!
//! Domain-specific error types for partsdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  partsdesk-core errors (this file)                                     │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  partsdesk-db errors (separate crate)                                  │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── CheckoutError    - Checkout engine taxonomy (stock availability,  │
//! │                         conflicts, persistence; wraps ValidationError) │
//! │                                                                         │
//! │  Flow: ValidationError → DbError / CheckoutError → caller              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, ID, quantities)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a request doesn't meet requirements.
/// Used for early validation before any business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., malformed SKU).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A reference points at a row that does not exist.
    ///
    /// ## When This Occurs
    /// - Order names a party_id missing from the directory
    #[error("{field} references unknown id: {id}")]
    UnknownReference { field: String, id: String },

    /// An order was submitted with no line items.
    #[error("order must contain at least one item")]
    EmptyOrder,

    /// An order has more line items than allowed.
    #[error("order cannot have more than {max} items")]
    TooManyLines { max: usize },
}

// =============================================================================
// Unit Tests
// =============================================================================
