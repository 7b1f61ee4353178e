// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! BIC Server - credential authentication for the BIC consultancy website
//!
//! This crate serves the website's login endpoint and service catalogue, and
//! provides the session client that talks to it.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Password verification and bearer tokens
//! - `client` - Session client with persistent token storage
//! - `storage` - Credential and service records (redb)
//! - `server` - Startup, seeding, and graceful shutdown

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod server;
pub mod state;
pub mod storage;
