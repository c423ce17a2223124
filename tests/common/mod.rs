//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use pathrouter::config::ServerConfig;
use pathrouter::{api, Router, RunningServer, Server};

/// Config bound to an ephemeral loopback port.
pub fn local_config(shutdown_timeout_secs: u64) -> ServerConfig {
    ServerConfig {
        bind_address: "127.0.0.1:0".to_string(),
        shutdown_timeout_secs,
        ..ServerConfig::default()
    }
}

/// Start the real service routes behind the standard middleware.
pub async fn start_app() -> RunningServer {
    start_with(api::routes(), local_config(5)).await
}

/// Start `router` behind the standard middleware with `config`.
pub async fn start_with(router: Router, config: ServerConfig) -> RunningServer {
    Server::new(config, api::pipeline(router))
        .start()
        .await
        .expect("test server failed to start")
}

/// Client without connection reuse, so shutdown tests see fresh connections.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

pub fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{}{}", addr, path)
}

/// Poll `condition` until it holds or a few seconds pass.
#[allow(dead_code)]
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}
