//! Locker record storage.

use anyhow::Result;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const LOCKER_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("locker");

/// Key under which the single shared record lives.
const CURRENT_KEY: &str = "current";

/// The persisted locker record.
///
/// `number` is an identifier, not a quantity: it is stored and compared as
/// text so leading zeros survive round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockerRecord {
    pub number: String,
}

/// Locker record storage
#[derive(Clone)]
pub struct LockerStorage {
    db: Arc<Database>,
}

impl LockerStorage {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        // Create table
        let write_txn = db.begin_write()?;
        write_txn.open_table(LOCKER_TABLE)?;
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Get the current record, if any
    pub fn get(&self) -> Result<Option<LockerRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LOCKER_TABLE)?;

        if let Some(data) = table.get(CURRENT_KEY)? {
            let record: LockerRecord = serde_json::from_slice(data.value())?;
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }

    /// Replace the current record
    pub fn put(&self, record: &LockerRecord) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(LOCKER_TABLE)?;
            let serialized = serde_json::to_vec(record)?;
            table.insert(CURRENT_KEY, serialized.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get the current record, materializing `default` if none exists.
    ///
    /// Check and insert happen inside a single write transaction, so two
    /// simultaneous first readers cannot both persist the default.
    pub fn get_or_init(&self, default: &LockerRecord) -> Result<LockerRecord> {
        let write_txn = self.db.begin_write()?;
        let record = {
            let mut table = write_txn.open_table(LOCKER_TABLE)?;
            let existing = table
                .get(CURRENT_KEY)?
                .map(|data| serde_json::from_slice::<LockerRecord>(data.value()))
                .transpose()?;

            match existing {
                Some(record) => record,
                None => {
                    let serialized = serde_json::to_vec(default)?;
                    table.insert(CURRENT_KEY, serialized.as_slice())?;
                    default.clone()
                }
            }
        };
        write_txn.commit()?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn setup_test_storage() -> (LockerStorage, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        let storage = LockerStorage::new(db).unwrap();
        (storage, temp_dir)
    }

    #[test]
    fn test_empty_store_reads_none() {
        let (storage, _temp_dir) = setup_test_storage();

        assert!(storage.get().unwrap().is_none());
    }

    #[test]
    fn test_put_then_get() {
        let (storage, _temp_dir) = setup_test_storage();

        let record = LockerRecord {
            number: "0042".to_string(),
        };
        storage.put(&record).unwrap();

        let retrieved = storage.get().unwrap().unwrap();
        assert_eq!(retrieved.number, "0042");
    }

    #[test]
    fn test_get_or_init_materializes_default() {
        let (storage, _temp_dir) = setup_test_storage();

        let default = LockerRecord {
            number: "1234".to_string(),
        };
        let record = storage.get_or_init(&default).unwrap();
        assert_eq!(record, default);

        // The default must now be persisted, not just returned.
        let stored = storage.get().unwrap().unwrap();
        assert_eq!(stored.number, "1234");
    }

    #[test]
    fn test_get_or_init_keeps_existing() {
        let (storage, _temp_dir) = setup_test_storage();

        storage
            .put(&LockerRecord {
                number: "777".to_string(),
            })
            .unwrap();

        let default = LockerRecord {
            number: "1234".to_string(),
        };
        let record = storage.get_or_init(&default).unwrap();
        assert_eq!(record.number, "777");
    }
}
