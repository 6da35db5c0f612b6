// [apps/server/src/main.rs]
use dotenvy::dotenv;
use tracing::info;
use warroom_server::prelude::Kernel;
use warroom_telemetry::init_tracing;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_tracing("warroom_server");

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    runtime.block_on(async {
        let config = warroom_server::config::AppConfig::load().expect("FATAL: invalid configuration");

        info!(port = config.port, "igniting kernel");
        let kernel = Kernel::ignite(config).await;
        kernel.launch().await;
    });

    Ok(())
}
