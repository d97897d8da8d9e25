//! # Repository Module
//!
//! Database repository implementations for Café POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Caller                                                                │
//! │       │  db.tables().set_status("table-2", Occupied, Some(..))         │
//! │       ▼                                                                 │
//! │  TableRepository                                                       │
//! │  ├── list / get / get_by_id                                            │
//! │  ├── create / update / delete                                          │
//! │  └── set_status                                                        │
//! │       │  SQL (runtime-bound) → private Row struct → TryFrom            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Each module also exposes crate-private helpers that take a           │
//! │  connection, so the sale engine can run them inside its transaction.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Product CRUD and stock edits
//! - [`StaffRepository`] - Staff CRUD
//! - [`TableRepository`] - Floor plan and occupancy
//! - [`SaleRepository`] - Committed sales (read side)

pub mod product;
pub mod sale;
pub mod staff;
pub mod table;

pub use product::ProductRepository;
pub use sale::SaleRepository;
pub use staff::StaffRepository;
pub use table::TableRepository;
