//! # Domain Types
//!
//! Core domain types used throughout Café POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   CafeTable     │   │  StaffMember    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  price (Money)  │   │  status         │   │  name           │       │
//! │  │  stock ≥ 0      │   │  current_order  │   │  commission bps │       │
//! │  └────────┬────────┘   └────────┬────────┘   └────────┬────────┘       │
//! │           │ snapshot            │ released            │ attributed     │
//! │           ▼                     ▼                     ▼                │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Sale { table_id, staff_id, items: [OrderItem], total, date }   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Shared entities (Product, CafeTable, StaffMember) are addressed by id and
//! owned by the ledger. A Sale owns value copies of its items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{parse_hundredths, Money};

// =============================================================================
// Rate
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 500 bps = 5% and 650 bps = 6.5%.
/// Commission rates are stored and multiplied as integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Parses a percentage string (`"5"`, `"6.5"`, `"12.25"`) exactly.
    ///
    /// ## Example
    /// ```rust
    /// use cafe_core::types::Rate;
    ///
    /// assert_eq!(Rate::parse_percentage("5").unwrap().bps(), 500);
    /// assert_eq!(Rate::parse_percentage("6.5").unwrap().bps(), 650);
    /// ```
    pub fn parse_percentage(input: &str) -> Result<Self, ValidationError> {
        let bps = parse_hundredths(input, "commissionRate")?;
        u32::try_from(bps)
            .map(Rate)
            .map_err(|_| ValidationError::OutOfRange {
                field: "commissionRate".to_string(),
                min: 0,
                max: u32::MAX as i64,
            })
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

/// Renders as a percentage: `5%`, `6.5%`, `12.25%`.
impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        match frac {
            0 => write!(f, "{}%", whole),
            f2 if f2 % 10 == 0 => write!(f, "{}.{}%", whole, f2 / 10),
            f2 => write!(f, "{}.{:02}%", whole, f2),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product on the café menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name shown to staff and on reports.
    pub name: String,

    /// Menu category (e.g. "Bebidas Quentes").
    pub category: String,

    /// Unit price, never negative.
    pub price: Money,

    /// Units on hand, never negative.
    pub stock: i64,

    /// Optimistic concurrency token, incremented on every write.
    pub version: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the stock left after selling `quantity` units.
    ///
    /// ## Errors
    /// [`CoreError::InsufficientStock`] naming this product when the result
    /// would be negative.
    pub fn stock_after_sale(&self, quantity: i64) -> CoreResult<i64> {
        let remaining = self.stock - quantity;
        if remaining < 0 {
            return Err(CoreError::InsufficientStock {
                product_id: self.id.clone(),
                product: self.name.clone(),
                available: self.stock,
                requested: quantity,
            });
        }
        Ok(remaining)
    }
}

/// Fields supplied when creating or editing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub price: Money,
    pub stock: i64,
}

// =============================================================================
// Staff
// =============================================================================

/// A staff member sales are attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    /// Share of the member's sales paid as commission. Not range-checked.
    pub commission_rate: Rate,
}

/// Fields supplied when creating or editing a staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StaffDraft {
    pub name: String,
    pub commission_rate: Rate,
}

// =============================================================================
// Tables
// =============================================================================

/// Occupancy state of a café table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
}

impl TableStatus {
    /// All statuses, in display order.
    pub const ALL: [TableStatus; 3] = [
        TableStatus::Available,
        TableStatus::Occupied,
        TableStatus::Reserved,
    ];

    /// Lowercase name as stored in the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Occupied => "occupied",
            TableStatus::Reserved => "reserved",
        }
    }
}

impl Default for TableStatus {
    fn default() -> Self {
        TableStatus::Available
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: TableStatus::ALL
                    .iter()
                    .map(|status| status.as_str().to_string())
                    .collect(),
            })
    }
}

/// A table in the café floor plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CafeTable {
    pub id: String,
    pub name: String,
    pub status: TableStatus,
    /// Opaque reference to the order being served, if any.
    pub current_order_id: Option<String>,
    pub version: i64,
}

// =============================================================================
// Sale
// =============================================================================

/// A priced line of a sale.
///
/// `price_at_sale` is a value copied from the product when the sale commits;
/// later price edits never reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: i64,
    pub price_at_sale: Money,
}

impl OrderItem {
    /// `price_at_sale × quantity`, `None` on overflow.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        self.price_at_sale.checked_mul_quantity(self.quantity)
    }
}

/// The immutable record of a committed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub table_id: String,
    pub staff_id: String,
    /// Line items in the order they were requested.
    pub items: Vec<OrderItem>,
    pub total: Money,
    /// Commit time, serialized as RFC 3339 UTC.
    #[serde(rename = "date")]
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Total units across all lines.
    pub fn units(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: "prod-2".to_string(),
            name: "Cappuccino".to_string(),
            category: "Bebidas Quentes".to_string(),
            price: Money::from_cents(850),
            stock,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_rate_display() {
        assert_eq!(Rate::from_bps(500).to_string(), "5%");
        assert_eq!(Rate::from_bps(650).to_string(), "6.5%");
        assert_eq!(Rate::from_bps(1225).to_string(), "12.25%");
    }

    #[test]
    fn test_rate_parse_percentage() {
        assert_eq!(Rate::parse_percentage("6").unwrap(), Rate::from_bps(600));
        assert_eq!(Rate::parse_percentage("0.25").unwrap(), Rate::from_bps(25));
        assert!(Rate::parse_percentage("-5").is_err());
        assert!(Rate::parse_percentage("five").is_err());
    }

    #[test]
    fn test_stock_after_sale() {
        assert_eq!(product(5).stock_after_sale(5).unwrap(), 0);

        let err = product(5).stock_after_sale(6).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                product,
                available,
                requested,
                ..
            } => {
                assert_eq!(product, "Cappuccino");
                assert_eq!(available, 5);
                assert_eq!(requested, 6);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_table_status_parse() {
        assert_eq!("occupied".parse::<TableStatus>().unwrap(), TableStatus::Occupied);
        assert_eq!(" Reserved ".parse::<TableStatus>().unwrap(), TableStatus::Reserved);
        assert!("closed".parse::<TableStatus>().is_err());
        assert_eq!(TableStatus::default(), TableStatus::Available);
    }

    #[test]
    fn test_sale_serializes_date_as_rfc3339() {
        let created_at = DateTime::parse_from_rfc3339("2026-10-17T12:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let sale = Sale {
            id: "sale-1".to_string(),
            table_id: "table-1".to_string(),
            staff_id: "staff-1".to_string(),
            items: vec![OrderItem {
                product_id: "prod-2".to_string(),
                quantity: 2,
                price_at_sale: Money::from_cents(850),
            }],
            total: Money::from_cents(1700),
            created_at,
        };

        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(json["date"], "2026-10-17T12:30:00Z");
        assert_eq!(json["tableId"], "table-1");
        assert_eq!(json["items"][0]["priceAtSale"], 850);
        assert_eq!(json["total"], 1700);
        assert_eq!(sale.units(), 2);
    }
}
