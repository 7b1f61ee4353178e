// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Argon2id password hashing.

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version};
use rand::rngs::OsRng;

use super::AuthError;

/// Hashes passwords at account creation and verifies them at login.
///
/// Holds a hash of a random throwaway password so that a login for an
/// unknown email can run the same verification work as one for a known
/// email.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

impl PasswordHasher {
    /// Build a hasher with the argon2 crate's default Argon2id parameters.
    pub fn new() -> Result<Self, AuthError> {
        Self::with_argon2(Argon2::default())
    }

    /// Build a hasher with caller-specified parameters (cheap ones for tests).
    pub fn with_params(params: Params) -> Result<Self, AuthError> {
        Self::with_argon2(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    fn with_argon2(argon2: Argon2<'static>) -> Result<Self, AuthError> {
        let mut hasher = Self {
            argon2,
            dummy_hash: String::new(),
        };
        let throwaway = SaltString::generate(&mut OsRng);
        hasher.dummy_hash = hasher.hash(throwaway.as_str())?;
        Ok(hasher)
    }

    /// Hash a password with a fresh random salt. Returns a PHC string.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::InternalError(format!("password hashing failed: {e}")))
    }

    /// Check a password against a stored PHC string.
    ///
    /// Returns `Ok(false)` on mismatch. A stored hash that cannot be parsed is
    /// an error, not a mismatch.
    pub fn verify(&self, password: &str, password_hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| AuthError::InternalError(format!("stored password hash is invalid: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::InternalError(format!(
                "password verification failed: {e}"
            ))),
        }
    }

    /// Run a verification that always fails, to equalize timing.
    pub fn verify_dummy(&self, password: &str) {
        let _ = self.verify(password, &self.dummy_hash);
    }
}

#[cfg(test)]
pub(crate) fn test_hasher() -> PasswordHasher {
    // Minimum memory cost keeps tests fast; production uses the defaults.
    let params = Params::new(Params::MIN_M_COST, 1, 1, None).unwrap();
    PasswordHasher::with_params(params).unwrap()
}
