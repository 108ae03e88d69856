//! Item CRUD: schema, batched insert, exact-match lookup.

use super::db::ItemStorage;
use super::types::ItemEntry;
use anyhow::{Context, Result};
use sqlx::{QueryBuilder, Row, Sqlite};

/// Four binds per row keeps every statement under SQLite's historical
/// 999-variable limit.
const MAX_ROWS_PER_INSERT: usize = 249;

impl ItemStorage {
    /// Create the `items` table if it does not exist.
    pub async fn create_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                item_id INTEGER PRIMARY KEY NOT NULL,
                user_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("create items table")?;

        Ok(())
    }

    /// Insert all `items` in one transaction using bound parameters.
    ///
    /// Either every row is inserted or none is: a duplicate `item_id` (within
    /// the batch or against existing rows) rolls the whole batch back.
    pub async fn save_batch(&self, items: &[ItemEntry]) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for chunk in items.chunks(MAX_ROWS_PER_INSERT) {
            let mut query: QueryBuilder<Sqlite> =
                QueryBuilder::new("INSERT INTO items (item_id, user_id, title, description) ");
            query.push_values(chunk, |mut row, item| {
                row.push_bind(item.item_id)
                    .push_bind(item.user_id)
                    .push_bind(item.title.clone())
                    .push_bind(item.description.clone());
            });
            query
                .build()
                .execute(&mut *tx)
                .await
                .context("insert item batch")?;
        }
        tx.commit().await?;

        tracing::debug!("saved {} items", items.len());
        Ok(())
    }

    /// Items whose `user_id`, `title` and `description` all match exactly, by `item_id`.
    pub async fn find_matching(
        &self,
        user_id: i64,
        title: &str,
        description: &str,
    ) -> Result<Vec<ItemEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT item_id, user_id, title, description
            FROM items
            WHERE user_id = ?1 AND title = ?2 AND description = ?3
            ORDER BY item_id
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(description)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(ItemEntry {
                item_id: row.get("item_id"),
                user_id: row.get("user_id"),
                title: row.get("title"),
                description: row.get("description"),
            });
        }
        Ok(out)
    }

    /// Total number of stored items.
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM items")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }
}
