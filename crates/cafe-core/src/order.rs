//! # Order Module
//!
//! Sale requests and the pure pricing steps of finalizing one.
//!
//! ## Finalization Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Sale Finalization                               │
//! │                                                                         │
//! │  SaleRequest { table_id, staff_id, items: [OrderLine] }                │
//! │       │                                                                 │
//! │       ▼  SaleRequest::validate()        (no store access)              │
//! │       │                                                                 │
//! │       ▼  per line: price_line(&product, quantity)                      │
//! │       │     ├── stock check → InsufficientStock                        │
//! │       │     └── price snapshot → OrderItem                             │
//! │       │                                                                 │
//! │       ▼  order_total(&items)            (checked i64 cents)            │
//! │       │                                                                 │
//! │       ▼  cafe-db commits stock, sale and table release atomically      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{OrderItem, Product};
use crate::validation::{validate_quantity, validate_required};

// =============================================================================
// Request Types
// =============================================================================

/// One requested line: a product reference and how many units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: i64,
}

impl OrderLine {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        OrderLine {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Everything needed to finalize a sale at a table.
///
/// Lines may repeat a product; each line is checked against the stock left
/// by the lines before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleRequest {
    pub table_id: String,
    pub staff_id: String,
    pub items: Vec<OrderLine>,
}

impl SaleRequest {
    /// Checks the request shape before any store access.
    ///
    /// ## Rules
    /// - `table_id` and `staff_id` are non-empty
    /// - at least one line
    /// - every line names a product and asks for a positive quantity
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required("tableId", &self.table_id)?;
        validate_required("staffId", &self.staff_id)?;

        if self.items.is_empty() {
            return Err(ValidationError::required("items"));
        }

        for line in &self.items {
            validate_required("productId", &line.product_id)?;
            validate_quantity(line.quantity)?;
        }

        Ok(())
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// Prices one line against the product's current state.
///
/// Returns the snapshotted item and the product's stock after the line.
///
/// ## Errors
/// - [`CoreError::InsufficientStock`] if `quantity` exceeds current stock
/// - [`CoreError::AmountOverflow`] if the line total is not representable
pub fn price_line(product: &Product, quantity: i64) -> CoreResult<(OrderItem, i64)> {
    let remaining = product.stock_after_sale(quantity)?;

    let item = OrderItem {
        product_id: product.id.clone(),
        quantity,
        price_at_sale: product.price,
    };

    if item.line_total().is_none() {
        return Err(CoreError::AmountOverflow {
            context: format!("line total for {}", product.name),
        });
    }

    Ok((item, remaining))
}

/// Sums `price_at_sale × quantity` over all items.
///
/// ## Example
/// ```rust
/// use cafe_core::money::Money;
/// use cafe_core::order::order_total;
/// use cafe_core::types::OrderItem;
///
/// let items = vec![
///     OrderItem { product_id: "prod-2".into(), quantity: 2, price_at_sale: Money::from_cents(850) },
///     OrderItem { product_id: "prod-7".into(), quantity: 3, price_at_sale: Money::from_cents(400) },
/// ];
/// assert_eq!(order_total(&items).unwrap(), Money::from_cents(2_900));
/// ```
pub fn order_total(items: &[OrderItem]) -> CoreResult<Money> {
    items.iter().try_fold(Money::zero(), |acc, item| {
        item.line_total()
            .and_then(|line| acc.checked_add(line))
            .ok_or_else(|| CoreError::AmountOverflow {
                context: "sale total".to_string(),
            })
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
