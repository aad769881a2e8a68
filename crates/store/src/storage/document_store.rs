use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::{fs, sync::RwLock};
use tracing::{debug, info, warn};

use crate::errors::StoreError;
use crate::matching::loose_eq;
use crate::record::{ensure_id, has_key, merge, record_key, Record, ID_FIELD};
use crate::storage::prepare::{prepare_storage, StorageStatus};

/// Every collection, keyed by resource name. This is also the on-disk layout.
pub type Database = BTreeMap<String, Vec<Record>>;

/// JSON file-backed document store.
///
/// Holds the whole database in memory and rewrites the file after each
/// mutation. Mutations keep the write lock until the file is written, so
/// writes never interleave.
pub struct Store {
    inner: RwLock<Database>,
    resources: Vec<String>,
    file_path: PathBuf,
    status: StorageStatus,
}

impl Store {
    /// Prepare the file, load it, and make sure every declared resource has a collection.
    pub async fn open<P, I, S>(path: P, resources: I) -> Result<Arc<Self>, StoreError>
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let file_path = path.into();
        let resources: Vec<String> = resources.into_iter().map(Into::into).collect();
        let status = prepare_storage(&file_path).await;

        let mut db = if status.is_available() {
            load(&file_path).await?
        } else {
            warn!(path = %file_path.display(), "storage unavailable; starting from an empty database");
            Database::new()
        };
        for resource in &resources {
            db.entry(resource.clone()).or_default();
        }

        info!(
            path = %file_path.display(),
            resources = ?resources,
            records = db.values().map(Vec::len).sum::<usize>(),
            "document store opened"
        );

        Ok(Arc::new(Self { inner: RwLock::new(db), resources, file_path, status }))
    }

    pub fn resources(&self) -> &[String] { &self.resources }

    pub fn contains(&self, resource: &str) -> bool {
        self.resources.iter().any(|r| r == resource)
    }

    pub fn path(&self) -> &Path { &self.file_path }

    pub fn storage_status(&self) -> &StorageStatus { &self.status }

    /// All records of `resource` in insertion order.
    pub async fn list_all(&self, resource: &str) -> Result<Vec<Record>, StoreError> {
        let db = self.inner.read().await;
        Ok(self.collection(&db, resource)?.clone())
    }

    /// First record whose id renders as `key`.
    pub async fn get_by_id(&self, resource: &str, key: &str) -> Result<Option<Record>, StoreError> {
        let db = self.inner.read().await;
        let found = self.collection(&db, resource)?.iter().find(|r| has_key(r, key)).cloned();
        Ok(found)
    }

    /// Append a record, generating an id if it lacks one, and persist.
    pub async fn insert(&self, resource: &str, mut record: Record) -> Result<Record, StoreError> {
        let mut db = self.inner.write().await;
        let collection = self.collection_mut(&mut db, resource)?;

        let generated = ensure_id(&mut record);
        if let Some(key) = record_key(&record) {
            if collection.iter().any(|r| has_key(r, &key)) {
                return Err(StoreError::duplicate_id(resource, &key));
            }
        }
        collection.push(record.clone());
        debug!(%resource, generated, id = ?record.get(ID_FIELD), "record inserted");

        self.persist(&db).await?;
        Ok(record)
    }

    /// Shallow-merge `partial` over the record with id `key` and persist.
    ///
    /// With no such record the result is `partial` alone; it is returned but
    /// not stored.
    pub async fn update(&self, resource: &str, key: &str, partial: Record) -> Result<Record, StoreError> {
        let mut db = self.inner.write().await;
        let collection = self.collection_mut(&mut db, resource)?;

        let position = collection.iter().position(|r| has_key(r, key));
        let base = position.map(|i| collection[i].clone()).unwrap_or_default();
        let merged = merge(base, partial);

        match position {
            Some(i) => {
                if let Some(new_key) = record_key(&merged) {
                    let clash = collection
                        .iter()
                        .enumerate()
                        .any(|(j, r)| j != i && has_key(r, &new_key));
                    if clash {
                        return Err(StoreError::duplicate_id(resource, &new_key));
                    }
                }
                collection[i] = merged.clone();
                debug!(%resource, %key, "record updated");
            }
            None => debug!(%resource, %key, "update target missing; returning partial"),
        }

        self.persist(&db).await?;
        Ok(merged)
    }

    /// Drop every record whose id loosely equals `key` and persist.
    /// Returns `key` whether or not anything matched.
    pub async fn remove(&self, resource: &str, key: &str) -> Result<String, StoreError> {
        let mut db = self.inner.write().await;
        let collection = self.collection_mut(&mut db, resource)?;

        let before = collection.len();
        collection.retain(|r| !r.get(ID_FIELD).is_some_and(|id| loose_eq(id, key)));
        debug!(%resource, %key, removed = before - collection.len(), "records removed");

        self.persist(&db).await?;
        Ok(key.to_string())
    }

    fn collection<'a>(&self, db: &'a Database, resource: &str) -> Result<&'a Vec<Record>, StoreError> {
        if !self.contains(resource) {
            return Err(StoreError::unknown(resource));
        }
        db.get(resource).ok_or_else(|| StoreError::unknown(resource))
    }

    fn collection_mut<'a>(&self, db: &'a mut Database, resource: &str) -> Result<&'a mut Vec<Record>, StoreError> {
        if !self.contains(resource) {
            return Err(StoreError::unknown(resource));
        }
        db.get_mut(resource).ok_or_else(|| StoreError::unknown(resource))
    }

    async fn persist(&self, db: &Database) -> Result<(), StoreError> {
        let data = serde_json::to_vec(db).map_err(|e| StoreError::Serialize(e.to_string()))?;
        fs::write(&self.file_path, &data).await.map_err(|e| StoreError::Io(e.to_string()))?;
        debug!(path = %self.file_path.display(), bytes = data.len(), "database persisted");
        Ok(())
    }
}

/// Read the snapshot at `path`. A missing or blank file is an empty database.
async fn load(path: &Path) -> Result<Database, StoreError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Database::new()),
        Err(e) => return Err(StoreError::Io(e.to_string())),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Database::new());
    }
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
