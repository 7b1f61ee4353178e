// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for credentials and the service catalogue, kept in a
//! single embedded redb database under `DATA_DIR`.
//!
//! ## Storage Layout
//!
//! ```text
//! $DATA_DIR/
//!   bic.redb
//!     credentials         id    -> CredentialRecord (JSON)
//!     credential_emails   email -> id
//!     services            id    -> ServiceRecord (JSON)
//! ```
//!
//! Password hashes are stored, never plaintext passwords.

pub mod database;
pub mod repository;

pub use database::{DocumentStore, StorageError, StorageResult};
pub use repository::{
    CredentialRecord, CredentialRepository, CredentialStore, NewService, ServiceRecord,
    ServiceRepository,
};
