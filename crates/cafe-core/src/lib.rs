//! # cafe-core: Pure Business Logic for Café POS
//!
//! This crate contains the café's business rules as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Café POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 cafe-cli (or any other front end)               │   │
//! │  │      products, staff, tables, sale finalize, reports            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               cafe-db (Ledger + Sale Engine)                    │   │
//! │  │        SQLite queries, migrations, repositories, transaction    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cafe-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   order   │  │  reports  │  │   │
//! │  │   │  Product  │  │   Money   │  │ SaleReq   │  │ commission│  │   │
//! │  │   │   Sale    │  │   Rate    │  │ pricing   │  │ dashboard │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, StaffMember, CafeTable, Sale)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`order`] - Sale requests and line pricing
//! - [`reports`] - Read-side aggregations (sales, inventory, commissions)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use cafe_core::money::Money;
//! use cafe_core::types::Rate;
//!
//! let total_sold = Money::from_cents(12_345); // R$ 123.45
//! let rate = Rate::from_bps(500);             // 5%
//!
//! // Commission rounds half-up to the cent
//! assert_eq!(total_sold.apply_rate(rate).cents(), 617);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod order;
pub mod reports;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{OrderLine, SaleRequest};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Label used by reports when a sale references a product or staff member that
/// no longer exists in the ledger.
pub const UNKNOWN_LABEL: &str = "N/A";

/// Number of days covered by the dashboard revenue series (today included).
pub const DASHBOARD_DAYS: usize = 7;
