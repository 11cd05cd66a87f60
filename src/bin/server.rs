//! Hosting server binary.
//!
//! Runs the HTTP/WebSocket front door for live multi-table play.

use holdem_server::config::Config;
use holdem_server::hosting;

#[tokio::main]
async fn main() {
    holdem_server::init();
    let config = Config::from_env();
    hosting::Server::run(&config).await.expect("hosting server crashed");
}
