use std::sync::Arc;

use static_range::config::{AppState, Config};
use static_range::error::StartupError;
use static_range::{logger, server};
use tokio_util::sync::CancellationToken;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // First argument is the config file path without extension
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = Config::load_from(&config_path).map_err(StartupError::from)?;

    logger::init(&cfg.logging)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(AppState::new(&cfg)?);
    let listener = server::create_listener(addr).map_err(StartupError::from)?;

    logger::log_server_start(&addr, &cfg);

    let shutdown = CancellationToken::new();
    server::spawn_shutdown_listener(shutdown.clone());
    server::run(listener, state, shutdown).await;
    Ok(())
}
