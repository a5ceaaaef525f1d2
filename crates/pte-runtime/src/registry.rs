use crate::table_task::{self, TableHandle};
use pte_core::{Config, ID};
use pte_table::{Stakes, TableMarker};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// The process-wide map of table id to running task — the only global
/// state in the process. A lock around a map plus an atomic counter,
/// `open`/`close` spawning and tearing down tasks.
#[derive(Default)]
pub struct Registry {
    tables: RwLock<HashMap<ID<TableMarker>, TableHandle>>,
    opened: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a new table task and registers its handle.
    pub async fn open(&self, stakes: Stakes, config: Config) -> anyhow::Result<ID<TableMarker>> {
        let handle = table_task::spawn(stakes, config);
        let id = handle.id;
        self.tables.write().await.insert(id, handle);
        self.opened.fetch_add(1, Ordering::Relaxed);
        log::info!("opened table {id}");
        Ok(id)
    }

    /// Tears a table down: drops its handle, which closes the inbound
    /// channel and lets the task's loop exit on its own.
    pub async fn close(&self, id: ID<TableMarker>) -> anyhow::Result<()> {
        self.tables
            .write()
            .await
            .remove(&id)
            .map(|_| log::info!("closed table {id}"))
            .ok_or_else(|| anyhow::anyhow!("table not found"))
    }

    /// Returns a clone of a table's handle — an inbound command sender
    /// and a subscribable outbound event broadcaster for a client joining
    /// the table.
    pub async fn handle(&self, id: ID<TableMarker>) -> anyhow::Result<TableHandle> {
        self.tables
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("table not found"))
    }

    pub async fn list(&self) -> Vec<ID<TableMarker>> {
        self.tables.read().await.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stakes() -> Stakes {
        Stakes {
            small_blind: 1,
            big_blind: 2,
            ante: None,
        }
    }

    #[tokio::test]
    async fn open_registers_a_reachable_handle() {
        let registry = Registry::new();
        let id = registry.open(stakes(), Config::default()).await.unwrap();
        assert!(registry.list().await.contains(&id));
        assert!(registry.handle(id).await.is_ok());
    }

    #[tokio::test]
    async fn close_removes_the_table_and_future_lookups_fail() {
        let registry = Registry::new();
        let id = registry.open(stakes(), Config::default()).await.unwrap();
        registry.close(id).await.unwrap();
        assert!(registry.handle(id).await.is_err());
        assert!(!registry.list().await.contains(&id));
    }

    #[tokio::test]
    async fn closing_an_unknown_table_errors() {
        let registry = Registry::new();
        let bogus = ID::default();
        assert!(registry.close(bogus).await.is_err());
    }
}
