use std::sync::Arc;

use wasm_cache_server::config::{self, AppState};
use wasm_cache_server::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());

    // Fails before anything is bound when the version token is missing
    let state = AppState::load(&config_path)
        .inspect_err(|e| logger::log_error(&format!("Startup aborted: {e}")))?;
    logger::init(&state)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = state.config.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(Arc::new(state)))
}

async fn async_main(state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = state.config.get_socket_addr()?;
    let listener = server::create_listener(addr, state.config.server.backlog)?;

    logger::log_server_start(&listener.local_addr()?, &state);

    server::start_server_loop(listener, state, server::shutdown_signal()).await;
    Ok(())
}
