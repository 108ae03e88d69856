//! CLI command handlers, one file per command.

mod fetch;
mod items;

pub use fetch::run_fetch;
pub use items::run_items;
#[cfg(test)]
pub(crate) use items::run_items_command;
