// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Client
//!
//! Client-side half of the login flow. A [`SessionClient`] submits
//! credentials through an [`AuthApi`] transport, keeps the issued token in a
//! [`SessionStorage`] under the key `"token"`, and restores it on start.
//!
//! ```rust,ignore
//! let api = HttpAuthApi::new("http://localhost:5000")?;
//! let mut client = SessionClient::new(FileStorage::new(path), api);
//! client.restore();
//! if !client.is_logged_in() {
//!     client.login("a@x.com", "secret").await?;
//! }
//! let header = client.authorization_header();
//! ```

pub mod error;
pub mod session;
pub mod storage;
pub mod transport;

pub use error::ClientError;
pub use session::{SessionClient, SessionState};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageFailure, TOKEN_KEY};
pub use transport::{AuthApi, HttpAuthApi, DEFAULT_REQUEST_TIMEOUT};
