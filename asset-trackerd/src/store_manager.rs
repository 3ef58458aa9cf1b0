use std::thread;
use anyhow::anyhow;
use chrono::Utc;
use tokio::sync::{mpsc, oneshot, watch};
use shared::asset_id::{next_asset_id, DeviceCode, IdScheme};
use shared::types::Asset;
use crate::store::{db::AssetDb, hash};
use crate::store::error::{StoreError, StoreResult};

/// Commands sent to the store thread
pub enum StoreCommand {
    List(oneshot::Sender<StoreResult<Vec<Asset>>>),
    Get(String, oneshot::Sender<StoreResult<Option<Asset>>>),
    NextId(String, oneshot::Sender<StoreResult<String>>),
    Create(Asset, oneshot::Sender<StoreResult<Asset>>),
    Update(String, Asset, oneshot::Sender<StoreResult<Asset>>),
    Delete(String, oneshot::Sender<StoreResult<bool>>),
    Import(Vec<Asset>, oneshot::Sender<StoreResult<Vec<Asset>>>),
    Shutdown,
}

/// Handle to the asset database.
///
/// The database lives on one dedicated thread that executes commands in
/// arrival order, so identifier allocation and the insert that uses it can
/// never interleave with another create.
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<StoreCommand>,
}

impl StoreHandle {
    /// Spawn a new store thread with the given database
    pub fn spawn(mut db: AssetDb, scheme: IdScheme, hash_tx: watch::Sender<String>) -> Self {
        let (tx, mut rx) = mpsc::channel::<StoreCommand>(256);

        let recompute_hash = |db: &AssetDb, hash_tx: &watch::Sender<String>| {
            match db.list_assets() {
                Ok(assets) => {
                    let _ = hash_tx.send(hash::compute_hash(&assets));
                }
                Err(e) => tracing::error!("Failed to recompute collection hash: {:#}", e),
            }
        };

        thread::spawn(move || {
            while let Some(cmd) = rx.blocking_recv() {
                match cmd {
                    StoreCommand::List(reply) => {
                        let _ = reply.send(db.list_assets().map_err(StoreError::from));
                    }
                    StoreCommand::Get(asset_id, reply) => {
                        let _ = reply.send(db.get_asset(&asset_id).map_err(StoreError::from));
                    }
                    StoreCommand::NextId(asset_type, reply) => {
                        let code = DeviceCode::from_asset_type(&asset_type);
                        let result = db
                            .existing_ids()
                            .map_err(StoreError::from)
                            .and_then(|ids| {
                                next_asset_id(ids.iter().map(String::as_str), code, &scheme)
                                    .map_err(StoreError::from)
                            });
                        let _ = reply.send(result);
                    }
                    StoreCommand::Create(draft, reply) => {
                        let result = db.create_asset(draft, &scheme, Utc::now());
                        if let Ok(asset) = &result {
                            tracing::info!(asset_id = %asset.asset_id, "Created asset");
                            recompute_hash(&db, &hash_tx);
                        }
                        let _ = reply.send(result);
                    }
                    StoreCommand::Update(asset_id, changes, reply) => {
                        let result = db.update_asset(&asset_id, changes, Utc::now());
                        if result.is_ok() {
                            tracing::info!(%asset_id, "Updated asset");
                            recompute_hash(&db, &hash_tx);
                        }
                        let _ = reply.send(result);
                    }
                    StoreCommand::Delete(asset_id, reply) => {
                        let result = db.delete_asset(&asset_id).map_err(StoreError::from);
                        if matches!(&result, Ok(true)) {
                            tracing::info!(%asset_id, "Deleted asset");
                            recompute_hash(&db, &hash_tx);
                        }
                        let _ = reply.send(result);
                    }
                    StoreCommand::Import(records, reply) => {
                        let result = db.import_assets(records, &scheme, Utc::now());
                        if let Ok(imported) = &result {
                            tracing::info!(count = imported.len(), "Imported assets");
                            recompute_hash(&db, &hash_tx);
                        }
                        let _ = reply.send(result);
                    }
                    StoreCommand::Shutdown => {
                        tracing::info!("Store thread shutting down");
                        break;
                    }
                }
            }
        });

        Self { tx }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<StoreResult<T>>) -> StoreCommand,
    ) -> StoreResult<T> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(make(reply)).await.map_err(|_| stopped())?;
        rx.await.map_err(|_| stopped())?
    }

    /// All assets in insertion order
    pub async fn list(&self) -> StoreResult<Vec<Asset>> {
        self.request(StoreCommand::List).await
    }

    /// Get a single asset by id
    pub async fn get(&self, asset_id: String) -> StoreResult<Option<Asset>> {
        self.request(|reply| StoreCommand::Get(asset_id, reply)).await
    }

    /// Identifier the next asset of `asset_type` would receive
    pub async fn next_id(&self, asset_type: String) -> StoreResult<String> {
        self.request(|reply| StoreCommand::NextId(asset_type, reply)).await
    }

    /// Create an asset under a freshly allocated identifier
    pub async fn create(&self, draft: Asset) -> StoreResult<Asset> {
        self.request(|reply| StoreCommand::Create(draft, reply)).await
    }

    /// Update an existing asset
    pub async fn update(&self, asset_id: String, changes: Asset) -> StoreResult<Asset> {
        self.request(|reply| StoreCommand::Update(asset_id, changes, reply)).await
    }

    /// Delete an asset. Returns true if it existed.
    pub async fn delete(&self, asset_id: String) -> StoreResult<bool> {
        self.request(|reply| StoreCommand::Delete(asset_id, reply)).await
    }

    /// Insert a batch atomically
    pub async fn import(&self, records: Vec<Asset>) -> StoreResult<Vec<Asset>> {
        self.request(|reply| StoreCommand::Import(records, reply)).await
    }

    /// Shutdown the store thread
    pub async fn shutdown(&self) -> anyhow::Result<()> {
        self.tx.send(StoreCommand::Shutdown).await?;
        Ok(())
    }
}

fn stopped() -> StoreError {
    StoreError::Internal(anyhow!("store thread has stopped"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(asset_type: &str, hostname: &str) -> Asset {
        Asset {
            hostname: hostname.to_string(),
            asset_type: asset_type.to_string(),
            serial_number: "SN-1".to_string(),
            location: "Headquarters".to_string(),
            status: "Active".to_string(),
            ..Default::default()
        }
    }

    fn spawn() -> (StoreHandle, watch::Receiver<String>) {
        let db = AssetDb::open(":memory:").unwrap();
        let (hash_tx, hash_rx) = watch::channel(String::new());
        (StoreHandle::spawn(db, IdScheme::default(), hash_tx), hash_rx)
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let (store, _hash_rx) = spawn();

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create(draft("Desktop", &format!("UB-DEV-{i:03}"))).await })
            })
            .collect();

        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap().unwrap().asset_id);
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
        assert_eq!(ids.last().unwrap(), "UBITASTPC020");
    }

    #[tokio::test]
    async fn test_next_id_previews_without_allocating() {
        let (store, _hash_rx) = spawn();
        store.create(draft("Laptop", "UB-LAP-001")).await.unwrap();

        assert_eq!(store.next_id("Laptop".to_string()).await.unwrap(), "UBITASTLP002");
        assert_eq!(store.next_id("Laptop".to_string()).await.unwrap(), "UBITASTLP002");
        assert_eq!(store.next_id("Toaster".to_string()).await.unwrap(), "UBITASTOT001");
    }

    #[tokio::test]
    async fn test_mutations_publish_new_hash() {
        let (store, mut hash_rx) = spawn();

        let created = store.create(draft("Server", "UB-SRV-001")).await.unwrap();
        hash_rx.changed().await.unwrap();
        let after_create = hash_rx.borrow_and_update().clone();
        assert!(!after_create.is_empty());

        assert!(store.delete(created.asset_id.clone()).await.unwrap());
        hash_rx.changed().await.unwrap();
        assert_ne!(*hash_rx.borrow(), after_create);

        // Deleting a missing asset changes nothing
        assert!(!store.delete(created.asset_id).await.unwrap());
        assert!(!hash_rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_requests_fail_after_shutdown() {
        let (store, _hash_rx) = spawn();
        store.shutdown().await.unwrap();

        let err = store.list().await.unwrap_err();
        assert!(matches!(err, StoreError::Internal(_)));
    }
}
