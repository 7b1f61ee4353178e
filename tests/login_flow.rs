// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! End-to-end login flow over real HTTP.

use std::time::Duration;

use bic_server::{
    client::{ClientError, FileStorage, HttpAuthApi, SessionClient, SessionState},
    config::ServerConfig,
    server::{build_state, serve_listener},
};
use tempfile::TempDir;
use tokio::{net::TcpListener, task::JoinHandle};
use tokio_util::sync::CancellationToken;

struct TestServer {
    base_url: String,
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
    _data_dir: TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let data_dir = TempDir::new().unwrap();
        let config = ServerConfig::from_vars([
            ("JWT_SECRET", "integration-secret".to_string()),
            ("DATA_DIR", data_dir.path().display().to_string()),
            ("SEED_USER_EMAIL", "a@x.com".to_string()),
            ("SEED_USER_PASSWORD", "secret".to_string()),
        ])
        .unwrap();
        let state = build_state(&config).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let shutdown = CancellationToken::new();
        let server_shutdown = shutdown.clone();
        let handle = tokio::spawn(async move {
            serve_listener(listener, state, server_shutdown).await.unwrap();
        });

        Self {
            base_url,
            shutdown,
            handle,
            _data_dir: data_dir,
        }
    }

    async fn stop(self) {
        self.shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .unwrap()
            .unwrap();
    }
}

#[tokio::test]
async fn login_persist_restore_logout() {
    let server = TestServer::start().await;
    let client_dir = TempDir::new().unwrap();
    let session_path = client_dir.path().join("session.json");

    let mut client = SessionClient::new(
        FileStorage::new(&session_path),
        HttpAuthApi::new(&server.base_url).unwrap(),
    );
    assert_eq!(client.restore(), SessionState::LoggedOut);

    let err = client.login("a@x.com", "wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidCredentials(_)));
    assert_eq!(err.user_message(), "Invalid email or password");
    assert_eq!(client.state(), SessionState::LoggedOut);

    let unknown = client.login("b@x.com", "secret").await.unwrap_err();
    assert_eq!(unknown.user_message(), err.user_message());

    client.login("a@x.com", "secret").await.unwrap();
    assert_eq!(client.state(), SessionState::LoggedIn);

    // The stored token opens authenticated endpoints.
    let me = reqwest::Client::new()
        .get(format!("{}/api/auth/me", server.base_url))
        .header("Authorization", client.authorization_header().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(me.status(), reqwest::StatusCode::OK);

    // A restarted client picks the session back up from disk.
    let mut restarted = SessionClient::new(
        FileStorage::new(&session_path),
        HttpAuthApi::new(&server.base_url).unwrap(),
    );
    assert_eq!(restarted.restore(), SessionState::LoggedIn);
    assert_eq!(restarted.token(), client.token());

    restarted.logout();
    let mut after_logout = SessionClient::new(
        FileStorage::new(&session_path),
        HttpAuthApi::new(&server.base_url).unwrap(),
    );
    assert_eq!(after_logout.restore(), SessionState::LoggedOut);

    server.stop().await;
}
