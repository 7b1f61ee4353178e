// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the document store.
//!
//! Each repository provides operations for a specific entity type,
//! using the DocumentStore for all transactions.

pub mod credentials;
pub mod services;

pub use credentials::{CredentialRecord, CredentialRepository, CredentialStore};
pub use services::{NewService, ServiceRecord, ServiceRepository};
