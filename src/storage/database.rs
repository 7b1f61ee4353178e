// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded document store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `credentials`: credential id → serialized CredentialRecord
//! - `credential_emails`: email → credential id (uniqueness index)
//! - `services`: service id → serialized ServiceRecord

use std::path::Path;

use redb::backends::InMemoryBackend;
use redb::{Database, ReadableDatabase, TableDefinition};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: credential id → serialized CredentialRecord (JSON bytes).
pub(crate) const CREDENTIALS: TableDefinition<&str, &[u8]> = TableDefinition::new("credentials");

/// Index: email → credential id. Written in the same transaction as the record.
pub(crate) const CREDENTIAL_EMAILS: TableDefinition<&str, &str> =
    TableDefinition::new("credential_emails");

/// Primary table: service id → serialized ServiceRecord (JSON bytes).
pub(crate) const SERVICES: TableDefinition<&str, &[u8]> = TableDefinition::new("services");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid {0}")]
    Validation(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// DocumentStore
// =============================================================================

/// Embedded ACID document store shared by all repositories.
pub struct DocumentStore {
    db: Database,
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore").finish_non_exhaustive()
    }
}

impl DocumentStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Self::with_tables(db)
    }

    /// Create a database that lives only in memory. Used by tests.
    pub fn in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
        Self::with_tables(db)
    }

    /// Pre-create all tables so later read transactions don't fail.
    fn with_tables(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CREDENTIALS)?;
            let _ = write_txn.open_table(CREDENTIAL_EMAILS)?;
            let _ = write_txn.open_table(SERVICES)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    pub(crate) fn db(&self) -> &Database {
        &self.db
    }

    /// Verify that a read transaction can be opened against every table.
    pub fn health_check(&self) -> StorageResult<()> {
        let read_txn = self.db.begin_read()?;
        read_txn.open_table(CREDENTIALS)?;
        read_txn.open_table(CREDENTIAL_EMAILS)?;
        read_txn.open_table(SERVICES)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bic.redb");
        let store = DocumentStore::open(&path).unwrap();
        assert!(path.exists());
        store.health_check().unwrap();
    }

    #[test]
    fn reopening_keeps_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bic.redb");
        drop(DocumentStore::open(&path).unwrap());

        let store = DocumentStore::open(&path).unwrap();
        store.health_check().unwrap();
    }

    #[test]
    fn in_memory_store_is_healthy() {
        DocumentStore::in_memory().unwrap().health_check().unwrap();
    }
}
