//! # Validation Module
//!
//! Input validation for PartsDesk.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (intake / API client)                                 │
//! │  ├── Basic format checks                                               │
//! │  └── Immediate feedback                                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Typed request structure (no untyped passthrough)                  │
//! │  └── Business rule validation before any transaction is opened         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  ├── CHECK (stock >= 0)                                                │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use partsdesk_core::validation::{validate_sku, validate_quantity};
//!
//! validate_sku("ABS-AUDI-001").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::OrderRequest;
use crate::{MAX_LINE_QUANTITY, MAX_ORDER_LINES, MAX_TAX_RATE_BPS, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Order Request Validation
// =============================================================================

/// Validates a checkout request before the coordinator opens a transaction.
///
/// ## Rules (all pure, no side effects)
/// - items must be non-empty and within the line cap
/// - every quantity must be positive and within the sanity cap
/// - unit prices must be within [0, MAX_UNIT_PRICE_CENTS]; rates capped
///   at 100%
/// - paid amount, when present, must not be negative
///
/// The quantity/price/line caps are deliberate sanity bounds, stricter
/// than what the data model could hold. Together they guarantee that the
/// totaling arithmetic downstream stays inside `i64` (see the constants
/// in the crate root).
///
/// ## Example
/// ```rust
/// use partsdesk_core::types::{OrderLine, OrderRequest};
/// use partsdesk_core::validation::validate_order;
///
/// let req = OrderRequest {
///     party_id: None,
///     items: vec![OrderLine {
///         product_id: "p1".into(),
///         quantity: 1,
///         unit_price_cents: 11800,
///         tax_rate_bps: 1800,
///     }],
///     is_cash_sale: true,
///     payment_method: None,
///     paid_amount_cents: Some(11800),
/// };
/// assert!(validate_order(&req).is_ok());
/// ```
pub fn validate_order(request: &OrderRequest) -> ValidationResult<()> {
    if request.items.is_empty() {
        return Err(ValidationError::EmptyOrder);
    }

    if request.items.len() > MAX_ORDER_LINES {
        return Err(ValidationError::TooManyLines {
            max: MAX_ORDER_LINES,
        });
    }

    for line in &request.items {
        if line.product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "productId".to_string(),
            });
        }

        validate_quantity(line.quantity)?;

        if line.unit_price_cents < 0 {
            return Err(ValidationError::MustNotBeNegative {
                field: "unitPriceCents".to_string(),
            });
        }

        if line.unit_price_cents > MAX_UNIT_PRICE_CENTS {
            return Err(ValidationError::OutOfRange {
                field: "unitPriceCents".to_string(),
                min: 0,
                max: MAX_UNIT_PRICE_CENTS,
            });
        }

        if line.tax_rate_bps > MAX_TAX_RATE_BPS {
            return Err(ValidationError::OutOfRange {
                field: "taxRateBps".to_string(),
                min: 0,
                max: MAX_TAX_RATE_BPS as i64,
            });
        }
    }

    if let Some(paid) = request.paid_amount_cents {
        if paid < 0 {
            return Err(ValidationError::MustNotBeNegative {
                field: "paidAmountCents".to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a catalog search query.
///
/// ## Rules
/// - Can be empty (returns default listing)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
