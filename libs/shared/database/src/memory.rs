use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use shared_models::error::BookingError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("Row not found: {0}")]
    RowNotFound(Uuid),

    #[error("Storage operation failed: {0}")]
    OperationFailed(String),
}

impl From<StorageError> for BookingError {
    fn from(err: StorageError) -> Self {
        BookingError::Storage(err.to_string())
    }
}

/// Uuid-keyed table held in process memory.
///
/// All mutation goes through the table's write lock, so a closure passed to
/// `write` or `update` observes and produces a consistent state — this is the
/// unit-of-work boundary the stores build their conditional updates on.
/// Readers take snapshots and never block writers beyond the lock itself.
pub struct MemTable<T> {
    rows: RwLock<HashMap<Uuid, T>>,
}

impl<T: Clone> MemTable<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch a single row by key.
    pub async fn get(&self, id: Uuid) -> Option<T> {
        self.rows.read().await.get(&id).cloned()
    }

    /// Run a read-only closure over the full table.
    pub async fn read<R>(&self, f: impl FnOnce(&HashMap<Uuid, T>) -> R) -> R {
        let rows = self.rows.read().await;
        f(&rows)
    }

    /// Run a closure with exclusive access to the full table. Check-then-act
    /// sequences inside the closure are atomic with respect to every other
    /// table operation.
    pub async fn write<R>(&self, f: impl FnOnce(&mut HashMap<Uuid, T>) -> R) -> R {
        let mut rows = self.rows.write().await;
        f(&mut rows)
    }

    /// Atomic read-modify-write of a single row.
    pub async fn update<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, StorageError> {
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(&id).ok_or(StorageError::RowNotFound(id))?;
        Ok(f(row))
    }
}

impl<T: Clone> Default for MemTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_missing_row_reports_row_not_found() {
        let table: MemTable<u32> = MemTable::new();
        let id = Uuid::new_v4();

        let result = table.update(id, |v| *v += 1).await;

        assert_eq!(result, Err(StorageError::RowNotFound(id)));
    }

    #[tokio::test]
    async fn write_closure_sees_consistent_state() {
        let table: MemTable<u32> = MemTable::new();
        let id = Uuid::new_v4();

        table.write(|rows| rows.insert(id, 1)).await;
        let doubled = table
            .write(|rows| {
                let current = *rows.get(&id).unwrap();
                rows.insert(id, current * 2);
                current * 2
            })
            .await;

        assert_eq!(doubled, 2);
        assert_eq!(table.get(id).await, Some(2));
    }
}
