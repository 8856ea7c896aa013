//! # Repository Module
//!
//! One repository per store table, each a thin struct over `SqlitePool`.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ShortageService / CLI                                                  │
//! │       │                                                                 │
//! │       │  db.sales().page_sale_items_since(id, since, offset, limit)    │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── insert_sale(&self, sale)                                          │
//! │  ├── add_item(&self, item)                                             │
//! │  ├── page_sales_since(&self, business, since, offset, limit)           │
//! │  └── page_sale_items_since(&self, business, since, offset, limit)      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `page_*` methods take `(offset, limit)` so they plug straight into
//! [`crate::pagination::paginate`].
//!
//! ## Available Repositories
//!
//! - [`business::BusinessRepository`] - Tenants
//! - [`product::ProductRepository`] - Product master (catalog)
//! - [`inventory::InventoryRepository`] - Per-business stock levels
//! - [`sale::SaleRepository`] - Sales and sale items
//! - [`expense::ExpenseRepository`] - Expenses
//! - [`shift::ShiftRepository`] - Employee shifts

pub mod business;
pub mod expense;
pub mod inventory;
pub mod product;
pub mod sale;
pub mod shift;
