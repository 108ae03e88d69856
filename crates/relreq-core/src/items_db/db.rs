//! Connection handling for the item database.
//!
//! The pool is an explicit handle: open it at startup, pass it where needed,
//! and `close` it on shutdown. Item CRUD lives in `items`.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Handle to the SQLite-backed item store.
#[derive(Clone)]
pub struct ItemStorage {
    pub(crate) pool: Pool<Sqlite>,
}

impl ItemStorage {
    /// Connect to a sqlx SQLite URL, creating the database file if missing.
    /// In-memory databases get a single connection that is never reaped, so
    /// every query sees the same database for the life of the handle.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("parse database URL {url}"))?
            .create_if_missing(true);
        let mut pool_options = SqlitePoolOptions::new();
        if url.contains(":memory:") {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            pool_options = pool_options.max_connections(8);
        }
        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("connect to {url}"))?;
        tracing::debug!("item storage connected: {}", url);
        Ok(ItemStorage { pool })
    }

    /// Open (or create) the database file at `path`. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Self::connect(&path_to_sqlite_uri(path)).await
    }

    /// Open (or create) `~/.local/state/relreq/items.db`.
    pub async fn open_default() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("relreq")?;
        let db_path = xdg_dirs.place_state_file("items.db")?;
        Self::open_at(db_path).await
    }

    /// Open `url` if given, else the default database.
    pub async fn open(url: Option<&str>) -> Result<Self> {
        match url {
            Some(url) => Self::connect(url).await,
            None => Self::open_default().await,
        }
    }

    /// Close all pooled connections gracefully.
    pub async fn close(self) {
        self.pool.close().await;
        tracing::debug!("item storage closed");
    }
}

#[cfg(test)]
/// Open an in-memory database with the schema in place (no disk I/O).
pub(crate) async fn open_memory() -> Result<ItemStorage> {
    let storage = ItemStorage::connect("sqlite::memory:").await?;
    storage.create_schema().await?;
    Ok(storage)
}
