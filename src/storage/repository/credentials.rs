// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential repository.
//!
//! Credential records are stored as JSON under their id; a second table maps
//! each email to its id so lookups by email are a single index read and so
//! duplicate emails are rejected inside the write transaction.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::database::{CREDENTIALS, CREDENTIAL_EMAILS};
use super::super::{DocumentStore, StorageError, StorageResult};

/// A persisted user identity.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialRecord {
    /// Opaque unique key (UUID) assigned on creation.
    pub id: String,
    /// Login email. Unique and compared byte-for-byte.
    pub email: String,
    /// Display name from registration, if one was given.
    #[serde(default)]
    pub username: Option<String>,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Build a new record with a fresh id.
    pub fn new(email: impl Into<String>, username: Option<String>, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            username,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Access to persisted credential records.
///
/// The authentication service only depends on this trait, so tests can
/// substitute an unavailable or scripted store.
pub trait CredentialStore: Send + Sync {
    /// Find the single record registered under `email`.
    fn find_by_email(&self, email: &str) -> StorageResult<Option<CredentialRecord>>;

    /// Fetch a record by id.
    fn get(&self, id: &str) -> StorageResult<Option<CredentialRecord>>;

    /// Persist a new record. Fails with `AlreadyExists` if the email is taken.
    fn create(&self, record: &CredentialRecord) -> StorageResult<()>;
}

/// Repository for credential operations on the document store.
pub struct CredentialRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> CredentialRepository<'a> {
    /// Create a new CredentialRepository.
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Get a credential record by id.
    pub fn get(&self, id: &str) -> StorageResult<Option<CredentialRecord>> {
        let read_txn = self.store.db().begin_read()?;
        let table = read_txn.open_table(CREDENTIALS)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Look up a credential record through the email index.
    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<CredentialRecord>> {
        let read_txn = self.store.db().begin_read()?;
        let emails = read_txn.open_table(CREDENTIAL_EMAILS)?;
        let id = match emails.get(email)? {
            Some(id) => id.value().to_string(),
            None => return Ok(None),
        };

        let records = read_txn.open_table(CREDENTIALS)?;
        match records.get(id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            // The index points at a record that is gone; nothing in this
            // crate deletes records, so treat it as corruption.
            None => Err(StorageError::NotFound(format!(
                "Credential {id} referenced by email index"
            ))),
        }
    }

    /// Create a new credential record.
    pub fn create(&self, record: &CredentialRecord) -> StorageResult<()> {
        let json = serde_json::to_vec(record)?;

        let write_txn = self.store.db().begin_write()?;
        {
            let mut emails = write_txn.open_table(CREDENTIAL_EMAILS)?;
            if emails.get(record.email.as_str())?.is_some() {
                return Err(StorageError::AlreadyExists(format!(
                    "Credential for {}",
                    record.email
                )));
            }

            let mut records = write_txn.open_table(CREDENTIALS)?;
            if records.get(record.id.as_str())?.is_some() {
                return Err(StorageError::AlreadyExists(format!(
                    "Credential {}",
                    record.id
                )));
            }

            records.insert(record.id.as_str(), json.as_slice())?;
            emails.insert(record.email.as_str(), record.id.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Number of stored credentials.
    pub fn count(&self) -> StorageResult<usize> {
        let read_txn = self.store.db().begin_read()?;
        let table = read_txn.open_table(CREDENTIALS)?;
        let mut count = 0;
        for entry in table.iter()? {
            entry?;
            count += 1;
        }
        Ok(count)
    }
}

impl CredentialStore for DocumentStore {
    fn find_by_email(&self, email: &str) -> StorageResult<Option<CredentialRecord>> {
        CredentialRepository::new(self).find_by_email(email)
    }

    fn get(&self, id: &str) -> StorageResult<Option<CredentialRecord>> {
        CredentialRepository::new(self).get(id)
    }

    fn create(&self, record: &CredentialRecord) -> StorageResult<()> {
        CredentialRepository::new(self).create(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(email: &str) -> CredentialRecord {
        CredentialRecord::new(email, Some("Ada".to_string()), "$argon2id$stub".to_string())
    }

    #[test]
    fn create_and_find_by_email() {
        let store = DocumentStore::in_memory().unwrap();
        let repo = CredentialRepository::new(&store);

        let created = record("a@x.com");
        repo.create(&created).unwrap();

        let found = repo.find_by_email("a@x.com").unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(repo.get(&created.id).unwrap(), Some(created));
    }

    #[test]
    fn unknown_email_is_none() {
        let store = DocumentStore::in_memory().unwrap();
        let repo = CredentialRepository::new(&store);
        repo.create(&record("a@x.com")).unwrap();

        assert!(repo.find_by_email("b@x.com").unwrap().is_none());
        assert!(repo.get("missing-id").unwrap().is_none());
    }

    #[test]
    fn email_lookup_is_case_sensitive() {
        let store = DocumentStore::in_memory().unwrap();
        let repo = CredentialRepository::new(&store);
        repo.create(&record("a@x.com")).unwrap();

        assert!(repo.find_by_email("A@X.COM").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let store = DocumentStore::in_memory().unwrap();
        let repo = CredentialRepository::new(&store);
        repo.create(&record("a@x.com")).unwrap();

        let result = repo.create(&record("a@x.com"));
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bic.redb");
        let created = record("a@x.com");
        {
            let store = DocumentStore::open(&path).unwrap();
            CredentialRepository::new(&store).create(&created).unwrap();
        }

        let store = DocumentStore::open(&path).unwrap();
        let found = CredentialStore::find_by_email(&store, "a@x.com").unwrap();
        assert_eq!(found, Some(created));
    }

    #[test]
    fn debug_output_omits_password_hash() {
        let rendered = format!("{:?}", record("a@x.com"));
        assert!(!rendered.contains("argon2id"));
        assert!(rendered.contains("a@x.com"));
    }
}
