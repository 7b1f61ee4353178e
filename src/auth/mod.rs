// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Credential login for the BIC website API.
//!
//! ## Auth Flow
//!
//! 1. Client sends `{ email, password }` to `POST /api/auth/login`
//! 2. Server:
//!    - Looks up the credential record by email
//!    - Verifies the password against its Argon2id hash
//!    - Signs an HS256 token with `sub` = record id, expiring after one hour
//! 3. Client stores the token and sends `Authorization: Bearer <token>`
//!    on later requests
//!
//! ## Security
//!
//! - Unknown email and wrong password produce the same error
//! - The signing secret comes from `JWT_SECRET` and never leaves the server
//! - Clock skew tolerance is 30 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod service;
pub mod token;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use error::AuthError;
pub use extractor::Auth;
pub use password::PasswordHasher;
pub use service::{password_strength, AuthService};
pub use token::TokenIssuer;
