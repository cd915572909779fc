//! Serve command implementation

use crate::config::ServeArgs;
use crate::server::PredictionServer;
use crate::service::PredictionService;
use std::sync::Arc;

pub fn run_serve(args: ServeArgs) -> Result<(), String> {
    let mut config = args.artifacts.resolve().map_err(|e| format!("Config error: {e}"))?;
    if let Some(addr) = args.addr {
        config.server = config.server.with_address(addr);
    }

    let service =
        PredictionService::from_config(&config).map_err(|e| format!("Startup failed: {e}"))?;
    let server = PredictionServer::new(config.server, Arc::new(service));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start runtime: {e}"))?;

    runtime.block_on(server.run()).map_err(|e| format!("Server error: {e}"))
}
