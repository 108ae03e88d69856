//! Types stored in the item database.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One row of the `items` table. `item_id` is unique across the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub item_id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
}

impl ItemEntry {
    /// Parse a JSON array of items (the `items import` file format).
    pub fn parse_batch(json: &str) -> Result<Vec<ItemEntry>> {
        serde_json::from_str(json).context("parse item batch JSON")
    }
}
