//! Durable CRUD over link records
//!
//! Each method runs in its own redb transaction; nothing spans calls.

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable};
use std::sync::Arc;

use crate::database::{LINK_SEQUENCE, TABLE_LINKS, TABLE_PATHS, TABLE_SEQUENCES};
use crate::error::StoreError;
use crate::model::Link;

#[derive(Clone)]
pub struct LinkStore {
    db: Arc<Database>,
}

impl LinkStore {
    pub fn new(db: Arc<Database>) -> Self {
        LinkStore { db }
    }

    /// Inserts a new link and returns it with its assigned id.
    ///
    /// Fails with [`StoreError::DuplicatePath`] when the path index already
    /// holds `short_path`. The check and the insert share one write
    /// transaction.
    pub fn insert(
        &self,
        short_path: &str,
        long_url: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Link, StoreError> {
        let write_txn = self.db.begin_write()?;
        let link = {
            let mut paths = write_txn.open_table(TABLE_PATHS)?;
            if paths.get(short_path)?.is_some() {
                return Err(StoreError::DuplicatePath(short_path.to_string()));
            }

            // Ids come from a persisted counter so deleted ids are never handed out again
            let mut sequences = write_txn.open_table(TABLE_SEQUENCES)?;
            let last_id = sequences
                .get(LINK_SEQUENCE)?
                .map(|guard| guard.value())
                .unwrap_or(0);
            let id = last_id + 1;
            sequences.insert(LINK_SEQUENCE, id)?;

            let link = Link {
                id,
                short_path: short_path.to_string(),
                long_url: long_url.to_string(),
                created_at,
                clicks: 0,
            };
            let record_json = serde_json::to_string(&link)?;

            let mut links = write_txn.open_table(TABLE_LINKS)?;
            links.insert(id, record_json.as_str())?;
            paths.insert(short_path, id)?;

            link
        };
        write_txn.commit()?;

        Ok(link)
    }

    /// Exact, case-sensitive lookup by short path.
    pub fn find_by_path(&self, short_path: &str) -> Result<Link, StoreError> {
        let read_txn = self.db.begin_read()?;
        let paths = read_txn.open_table(TABLE_PATHS)?;

        let id = match paths.get(short_path)? {
            Some(guard) => guard.value(),
            None => return Err(StoreError::NotFound),
        };

        let links = read_txn.open_table(TABLE_LINKS)?;
        let link = match links.get(id)? {
            Some(guard) => serde_json::from_str::<Link>(guard.value())?,
            None => return Err(StoreError::NotFound),
        };

        Ok(link)
    }

    /// All links, newest `created_at` first. Ties fall back to the higher id.
    pub fn list_all(&self) -> Result<Vec<Link>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let links = read_txn.open_table(TABLE_LINKS)?;

        let mut results = Vec::new();
        for entry in links.iter()? {
            let (_, value) = entry?;
            results.push(serde_json::from_str::<Link>(value.value())?);
        }

        results.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(results)
    }

    /// Replaces the destination of an existing link and returns the updated record.
    pub fn update_destination(&self, id: u64, long_url: &str) -> Result<Link, StoreError> {
        let write_txn = self.db.begin_write()?;
        let link = {
            let mut links = write_txn.open_table(TABLE_LINKS)?;

            let mut link = match links.get(id)? {
                Some(guard) => serde_json::from_str::<Link>(guard.value())?,
                None => return Err(StoreError::NotFound),
            };
            link.long_url = long_url.to_string();

            let record_json = serde_json::to_string(&link)?;
            links.insert(id, record_json.as_str())?;

            link
        };
        write_txn.commit()?;

        Ok(link)
    }

    /// Hard-deletes a link and frees its short path. Returns the removed record.
    pub fn delete(&self, id: u64) -> Result<Link, StoreError> {
        let write_txn = self.db.begin_write()?;
        let link = {
            let mut links = write_txn.open_table(TABLE_LINKS)?;

            let link = match links.get(id)? {
                Some(guard) => serde_json::from_str::<Link>(guard.value())?,
                None => return Err(StoreError::NotFound),
            };

            links.remove(id)?;

            let mut paths = write_txn.open_table(TABLE_PATHS)?;
            paths.remove(link.short_path.as_str())?;

            link
        };
        write_txn.commit()?;

        Ok(link)
    }
}
