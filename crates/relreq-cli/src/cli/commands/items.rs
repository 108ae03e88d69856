//! `relreq items ...` – item store maintenance and lookup.

use anyhow::{Context, Result};
use relreq_core::items_db::{ItemEntry, ItemStorage};

use crate::cli::ItemsCommand;

/// Open the store, run one command, and always close the pool afterwards.
pub async fn run_items(database_url: Option<&str>, command: ItemsCommand) -> Result<()> {
    let storage = ItemStorage::open(database_url).await?;
    let result = run_items_command(&storage, command).await;
    storage.close().await;
    result
}

pub(crate) async fn run_items_command(
    storage: &ItemStorage,
    command: ItemsCommand,
) -> Result<()> {
    storage.create_schema().await?;
    match command {
        ItemsCommand::Init => println!("Items table ready."),
        ItemsCommand::Import { path } => {
            let data = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("read {}", path.display()))?;
            let items = ItemEntry::parse_batch(&data)?;
            storage.save_batch(&items).await?;
            println!("Imported {} items from {}", items.len(), path.display());
        }
        ItemsCommand::Find {
            user_id,
            title,
            description,
        } => {
            let items = storage.find_matching(user_id, &title, &description).await?;
            if items.is_empty() {
                println!("No matching items.");
            } else {
                println!("{:<10} {:<10} {:<24} {}", "ITEM", "USER", "TITLE", "DESCRIPTION");
                for i in items {
                    println!(
                        "{:<10} {:<10} {:<24} {}",
                        i.item_id, i.user_id, i.title, i.description
                    );
                }
            }
        }
    }
    Ok(())
}
