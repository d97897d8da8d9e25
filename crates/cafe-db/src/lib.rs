//! # cafe-db: Ledger and Sale Engine for Café POS
//!
//! SQLite storage for products, staff, tables and sales, plus the
//! transactional sale finalization that ties them together.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Café POS Data Flow                               │
//! │                                                                         │
//! │  cafe-pos sale finalize --table table-3 --item prod-2:2                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     cafe-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  SaleEngine  │  │   │
//! │  │   │   (pool.rs)   │    │  product      │    │  (engine.rs) │  │   │
//! │  │   │               │◄───│  staff        │◄───│  one tx per  │  │   │
//! │  │   │ SqlitePool    │    │  table        │    │  sale        │  │   │
//! │  │   │ migrations    │    │  sale         │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types and classification
//! - [`repository`] - Ledger repositories (product, staff, table, sale)
//! - [`engine`] - Sale finalization transaction
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cafe_core::{OrderLine, SaleRequest};
//! use cafe_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("cafe.db")).await?;
//! db.seed_initial_data().await?;
//!
//! let sale = db
//!     .sale_engine()
//!     .finalize_sale(&SaleRequest {
//!         table_id: "table-3".into(),
//!         staff_id: "staff-1".into(),
//!         items: vec![OrderLine::new("prod-2", 2)],
//!     })
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use engine::SaleEngine;
pub use error::{DbError, DbResult, ErrorKind};
pub use pool::{Database, DbConfig};

pub use repository::{ProductRepository, SaleRepository, StaffRepository, TableRepository};
