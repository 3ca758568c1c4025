//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use comment_service::config::{ApiConfig, StoreBackend};
use comment_service::{App, AppError, Shutdown};
use tokio::task::JoinHandle;

/// A comment API running on an ephemeral port with in-memory storage.
pub struct RunningApp {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), AppError>>,
}

impl RunningApp {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Trigger shutdown and wait for the run to return.
    #[allow(dead_code)]
    pub async fn stop(self) -> Result<(), AppError> {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(10), self.handle)
            .await
            .expect("app did not stop")
            .expect("app task panicked")
    }
}

pub fn memory_config() -> ApiConfig {
    let mut config = ApiConfig::default();
    config.server.grpc_addr = "127.0.0.1:0".to_string();
    config.pg.backend = StoreBackend::Memory;
    config.graceful.timeout_ms = 5_000;
    config
}

pub async fn start_app(config: ApiConfig) -> RunningApp {
    let app = App::build(config).await.expect("app should build");
    let addr = app.local_addr().unwrap();
    let shutdown = Shutdown::new();

    let run_shutdown = shutdown.clone();
    let handle = tokio::spawn(async move { app.run(run_shutdown).await });

    RunningApp {
        addr,
        shutdown,
        handle,
    }
}

/// A client that never reuses connections, so each call hits the listener.
#[allow(dead_code)]
pub fn fresh_client(base_url: &str) -> comment_sdk::CommentClient {
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();
    comment_sdk::CommentClient::with_client(client, base_url)
}
