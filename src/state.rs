// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::AuthService;
use crate::storage::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(store: Arc<DocumentStore>, auth: AuthService) -> Self {
        Self { store, auth }
    }
}
