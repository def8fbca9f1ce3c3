//! docvault entry point
//!
//! Reads configuration from the environment, builds the server, and runs it.
//! All wiring lives in the http_server module; main only reports failure.

use docvault::http_server::{HttpServer, ServiceConfig};

#[tokio::main]
async fn main() {
    let config = ServiceConfig::from_env();
    let server = HttpServer::with_config(config);

    if let Err(e) = server.start().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
