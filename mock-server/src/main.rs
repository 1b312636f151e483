//! Standalone mock server for poking at the client by hand.
//!
//! Listens on loopback; `PORT` picks the port (3000 when unset). Logging goes
//! through `env_logger`, so `RUST_LOG` applies.

use std::net::{Ipv4Addr, SocketAddr};

use tokio::net::TcpListener;

const DEFAULT_PORT: u16 = 3000;

fn port_from_env() -> u16 {
    match std::env::var("PORT") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("ignoring unusable PORT {raw:?}, using {DEFAULT_PORT}");
            DEFAULT_PORT
        }),
        Err(_) => DEFAULT_PORT,
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port_from_env()));
    let listener = TcpListener::bind(addr).await?;
    log::info!("mock server on http://{}", listener.local_addr()?);
    mock_server::run(listener).await
}
