//! serialwire binary: load the schema, open the serial device, and print one
//! line per decoded frame until interrupted.

use tracing_subscriber::EnvFilter;

use serialwire::{framer, transport, Config, ConsoleSink, Result, SchemaRegistry};

#[tokio::main]
async fn main() {
    // A .env file is just another way to populate the environment.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    let registry = SchemaRegistry::load(&config.schema_path)?;
    let port = transport::open_serial(&config)?;

    tracing::info!(
        device = %config.device,
        baud = config.baud_rate,
        protocols = registry.len(),
        idle_ms = config.idle_threshold.as_millis() as u64,
        "listening"
    );

    let mut sink = ConsoleSink::new();
    tokio::select! {
        result = framer::run_framer(port, &registry, &mut sink, config.idle_threshold) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupt received, closing serial port");
            Ok(())
        }
    }
    // The serial stream drops here on every path, releasing the device.
}
