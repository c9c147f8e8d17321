use super::check_limits;
use crate::domain::config::TableLimits;
use crate::domain::entity::StorageEntity;
use crate::domain::errors::AdapterError;
use crate::ports::outbound::{StorageAdapter, WriteMode};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

type Rows = BTreeMap<String, BTreeMap<String, StorageEntity>>;

/// File-backed table store.
///
/// Keeps every row in memory and rewrites a JSON file on each mutation, via
/// a temp file and rename so a crash never leaves a torn file. Suitable for
/// development and single-process deployments.
pub struct FileBackedTableStore {
    rows: RwLock<Rows>,
    path: PathBuf,
    limits: TableLimits,
}

impl FileBackedTableStore {
    /// Open the store at `path`, loading existing rows if the file exists.
    pub fn open<P: AsRef<Path>>(path: P, limits: TableLimits) -> Result<Self, AdapterError> {
        let path = path.as_ref().to_path_buf();
        let rows = Self::load_from_file(&path)?;

        if rows.is_empty() {
            tracing::info!("[store] 📁 No existing table file at {}", path.display());
        } else {
            tracing::info!(
                "[store] 💾 Loaded {} partitions from {}",
                rows.len(),
                path.display()
            );
        }

        Ok(Self {
            rows: RwLock::new(rows),
            path,
            limits,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_file(path: &Path) -> Result<Rows, AdapterError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Rows::new()),
            Err(e) => return Err(io_error(e)),
        };
        if bytes.is_empty() {
            return Ok(Rows::new());
        }

        serde_json::from_slice(&bytes).map_err(|e| AdapterError::Io {
            message: format!("corrupt table file {}: {}", path.display(), e),
        })
    }

    fn save_to_file(&self, rows: &Rows) -> Result<(), AdapterError> {
        use std::io::Write;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let bytes = serde_json::to_vec(rows).map_err(|e| AdapterError::Io {
            message: e.to_string(),
        })?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;

        std::fs::rename(&temp_path, &self.path).map_err(io_error)
    }
}

fn io_error(e: std::io::Error) -> AdapterError {
    AdapterError::Io {
        message: e.to_string(),
    }
}

impl StorageAdapter for FileBackedTableStore {
    fn get(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<StorageEntity>, AdapterError> {
        Ok(self
            .rows
            .read()
            .get(partition_key)
            .and_then(|partition| partition.get(row_key))
            .cloned())
    }

    fn put(&self, entity: StorageEntity, mode: WriteMode) -> Result<(), AdapterError> {
        check_limits(&entity, &self.limits)?;

        let mut rows = self.rows.write();
        let exists = rows
            .get(&entity.partition_key)
            .is_some_and(|partition| partition.contains_key(&entity.row_key));
        if mode == WriteMode::Insert && exists {
            return Err(AdapterError::EntityExists {
                partition_key: entity.partition_key,
                row_key: entity.row_key,
            });
        }

        let mut next = rows.clone();
        next.entry(entity.partition_key.clone())
            .or_default()
            .insert(entity.row_key.clone(), entity);
        self.save_to_file(&next)?;
        *rows = next;
        Ok(())
    }

    fn delete(&self, partition_key: &str, row_key: &str) -> Result<bool, AdapterError> {
        let mut rows = self.rows.write();
        let exists = rows
            .get(partition_key)
            .is_some_and(|partition| partition.contains_key(row_key));
        if !exists {
            return Ok(false);
        }

        let mut next = rows.clone();
        if let Some(partition) = next.get_mut(partition_key) {
            partition.remove(row_key);
            if partition.is_empty() {
                next.remove(partition_key);
            }
        }
        self.save_to_file(&next)?;
        *rows = next;
        Ok(true)
    }

    fn list_partition(&self, partition_key: &str) -> Result<Vec<StorageEntity>, AdapterError> {
        Ok(self
            .rows
            .read()
            .get(partition_key)
            .map(|partition| partition.values().cloned().collect())
            .unwrap_or_default())
    }
}
