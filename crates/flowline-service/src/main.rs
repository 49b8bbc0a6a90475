//! Service entrypoint
//!
//! Bind address and port come from `FLOWLINE_HOST` / `FLOWLINE_PORT`,
//! defaulting to localhost:8000. Logging is configured through the
//! standard `RUST_LOG` filter.

use std::net::SocketAddr;

#[tokio::main]
async fn main() {
    env_logger::init();

    let host = std::env::var("FLOWLINE_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("FLOWLINE_PORT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(8000);

    let addr: SocketAddr = match format!("{host}:{port}").parse() {
        Ok(addr) => addr,
        Err(err) => {
            log::error!("invalid bind address {host}:{port}: {err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = flowline_service::serve(addr).await {
        log::error!("server error: {err}");
        std::process::exit(1);
    }
}
