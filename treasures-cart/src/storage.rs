//! redb-based local storage
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `storefront` | `"cart"` | `Vec<CartLine>` (JSON) | Persisted cart contents |
//! | `storefront` | `"admin_token"` | `String` (JSON) | Bearer token for admin calls |
//!
//! # Durability
//!
//! redb commits are persistent as soon as `commit()` returns, so every cart
//! mutation survives an abrupt shutdown of the storefront process.
//!
//! # Corruption policy
//!
//! Writes are fallible and surface [`StoreError`]. Reads of the cart and
//! token fail soft: bytes that no longer deserialize yield the empty cart
//! (or no token) with a warning, never an error. A corrupt blob must not
//! keep the storefront from starting.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::cart::CartLine;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Single key-value table: key = storage key, value = JSON bytes
const STORE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("storefront");

const CART_KEY: &str = "cart";
const TOKEN_KEY: &str = "admin_token";

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Client-local durable key-value store
///
/// One database file per storefront installation, shared by the cart and
/// the API client (for the bearer token). Cheap to clone.
#[derive(Clone)]
pub struct LocalStore {
    db: Arc<Database>,
}

impl LocalStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(STORE_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(STORE_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ========== Raw Key Access ==========

    fn put_raw(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(STORE_TABLE)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    fn get_raw(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STORE_TABLE)?;
        Ok(table.get(key)?.map(|guard| guard.value().to_vec()))
    }

    fn delete_raw(&self, key: &str) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(STORE_TABLE)?;
            table.remove(key)?;
        }
        txn.commit()?;
        Ok(())
    }

    // ========== Cart ==========

    /// Persist the full cart contents under the fixed cart key
    pub fn save_cart(&self, items: &[CartLine]) -> StoreResult<()> {
        let value = serde_json::to_vec(items)?;
        self.put_raw(CART_KEY, &value)
    }

    /// Load the persisted cart, failing soft to empty
    ///
    /// Missing key, unreadable storage, and undeserializable bytes all
    /// yield an empty cart; the storefront must start regardless of what
    /// a previous session left behind.
    pub fn load_cart(&self) -> Vec<CartLine> {
        let bytes = match self.get_raw(CART_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read persisted cart, starting empty: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Persisted cart is corrupt, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Remove the persisted cart entry
    pub fn clear_cart(&self) -> StoreResult<()> {
        self.delete_raw(CART_KEY)
    }

    // ========== Bearer Token ==========

    /// Persist the admin bearer token
    pub fn save_token(&self, token: &str) -> StoreResult<()> {
        let value = serde_json::to_vec(token)?;
        self.put_raw(TOKEN_KEY, &value)
    }

    /// Load the stored bearer token, if any
    pub fn load_token(&self) -> Option<String> {
        let bytes = match self.get_raw(TOKEN_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read stored token: {}", e);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!("Stored token is corrupt, ignoring: {}", e);
                None
            }
        }
    }

    /// Remove the stored bearer token
    pub fn clear_token(&self) -> StoreResult<()> {
        self.delete_raw(TOKEN_KEY)
    }

    // ========== Test Support ==========

    /// Overwrite a key with arbitrary bytes, bypassing serialization
    ///
    /// Only used by tests to simulate corruption left by another writer.
    #[doc(hidden)]
    pub fn put_raw_bytes(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.put_raw(key, value)
    }
}
