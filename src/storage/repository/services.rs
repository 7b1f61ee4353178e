// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Service catalogue repository.
//!
//! Services are the consultancy offerings listed on the website. The API only
//! reads them; records are created at startup from a seed file.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::super::database::SERVICES;
use super::super::{DocumentStore, StorageError, StorageResult};

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 100;
const DESCRIPTION_MIN: usize = 10;
const DESCRIPTION_MAX: usize = 1000;

/// A consultancy service offered on the website.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ServiceRecord {
    /// Unique service identifier (UUID)
    pub id: String,
    /// Display name (3-100 characters)
    pub name: String,
    /// Long description (10-1000 characters)
    pub description: String,
    /// Whether the service is currently offered
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for a new service, as found in the seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct NewService {
    pub name: String,
    pub description: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl NewService {
    /// Trim and validate the input, producing a record with a fresh id.
    pub fn into_record(self) -> StorageResult<ServiceRecord> {
        let name = self.name.trim().to_string();
        let description = self.description.trim().to_string();

        check_length("name", &name, NAME_MIN, NAME_MAX)?;
        check_length("description", &description, DESCRIPTION_MIN, DESCRIPTION_MAX)?;

        let now = Utc::now();
        Ok(ServiceRecord {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        })
    }
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> StorageResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(StorageError::Validation(format!(
            "service {field}: must be between {min} and {max} characters, got {len}"
        )));
    }
    Ok(())
}

/// Repository for service operations on the document store.
pub struct ServiceRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> ServiceRepository<'a> {
    /// Create a new ServiceRepository.
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Get a service by id.
    pub fn get(&self, id: &str) -> StorageResult<ServiceRecord> {
        let read_txn = self.store.db().begin_read()?;
        let table = read_txn.open_table(SERVICES)?;
        match table.get(id)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Err(StorageError::NotFound(format!("Service {id}"))),
        }
    }

    /// List all services ordered by name.
    pub fn list(&self) -> StorageResult<Vec<ServiceRecord>> {
        let read_txn = self.store.db().begin_read()?;
        let table = read_txn.open_table(SERVICES)?;

        let mut services = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            services.push(serde_json::from_slice::<ServiceRecord>(value.value())?);
        }
        services.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(services)
    }

    /// Validate and store a new service.
    pub fn create(&self, service: NewService) -> StorageResult<ServiceRecord> {
        let record = service.into_record()?;
        let json = serde_json::to_vec(&record)?;

        let write_txn = self.store.db().begin_write()?;
        {
            let mut table = write_txn.open_table(SERVICES)?;
            table.insert(record.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(record)
    }

    /// Create services whose name is not already present.
    ///
    /// Returns the number of services inserted.
    pub fn seed(&self, services: Vec<NewService>) -> StorageResult<usize> {
        let existing = self.list()?;
        let mut inserted = 0;
        for service in services {
            let name = service.name.trim();
            if existing.iter().any(|s| s.name == name) {
                continue;
            }
            self.create(service)?;
            inserted += 1;
        }
        Ok(inserted)
    }
}
