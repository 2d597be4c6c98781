use std::env;

use database::MemoryDatabase;
use web::{start_web_server, WebState, DEFAULT_BIND_ADDRESS};

#[tokio::main]
async fn main() {
    env_logger::init();

    let address =
        env::var("WEB_BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_owned());
    let state = WebState::new(MemoryDatabase::new());

    if let Err(why) = start_web_server(state, address.as_str()).await {
        log::error!("Web server stopped: {}", why);
        std::process::exit(1);
    }
}
