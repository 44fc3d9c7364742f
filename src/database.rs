//! Database initialization and table definitions
//!
//! This module handles the setup of the embedded redb database and the shared
//! application state handed to every request handler.

use redb::{Database, TableDefinition};
use std::sync::Arc;

use crate::config::Config;
use crate::service::LinkService;
use crate::store::LinkStore;

/// Main table for storing link records
///
/// Key: link id
/// Value: JSON-serialized Link as string
///
/// Example:
/// - Key: 7
/// - Value: '{"id":7,"short_path":"promo1","long_url":"https://example.com",...}'
pub const TABLE_LINKS: TableDefinition<u64, &str> = TableDefinition::new("links_v1");

/// Unique index from short path to link id
///
/// Every insert checks this table inside its write transaction. redb allows a
/// single writer at a time, so two creators of the same path cannot both pass.
pub const TABLE_PATHS: TableDefinition<&str, u64> = TableDefinition::new("link_paths_v1");

/// Monotonic counters, keyed by sequence name
pub const TABLE_SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences_v1");

/// Sequence used for link ids
pub const LINK_SEQUENCE: &str = "links";

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    pub links: LinkService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        let store = LinkStore::new(Arc::new(db));
        let links = LinkService::new(store, &config.public_base_url);

        AppState {
            links,
            config: Arc::new(config),
        }
    }
}

/// Initializes the embedded database and creates required tables
///
/// # Example
///
/// ```no_run
/// # use shortlinks::database::init_db;
/// let db = init_db("data.db").expect("Failed to initialize database");
/// ```
pub fn init_db(db_path: &str) -> Result<Database, redb::Error> {
    let db = Database::create(db_path)?;

    let write_txn = db.begin_write()?;
    {
        write_txn.open_table(TABLE_LINKS)?;
        write_txn.open_table(TABLE_PATHS)?;
        write_txn.open_table(TABLE_SEQUENCES)?;
    }
    write_txn.commit()?;

    Ok(db)
}
