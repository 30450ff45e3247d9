// SPDX-License-Identifier: BUSL-1.1
//! Incubation platform API stub server: standalone development server.
//!
//! Environment:
//! - `IMS_STUB_PORT` (default 8090)
//! - `IMS_STUB_OMIT_IDS` answer document creates without the new id
//! - `RUST_LOG` (default `info`)

use std::net::SocketAddr;

use ims_stub::{router, AppState, StubOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("IMS_STUB_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8090);

    let options = StubOptions::from_env();
    let app = router(AppState::new(options));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(omit_create_ids = options.omit_create_ids, "ims-stub listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await
}
