//! Item storage (SQLite via sqlx).
//!
//! Holds the `items` table: schema creation, batched insert, and exact-match
//! lookup. Has no retry logic of its own.

mod db;
mod items;
mod types;

pub use db::ItemStorage;
pub use types::ItemEntry;
