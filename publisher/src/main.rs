use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use device_publisher::config::{Cli, RunSettings};
use device_publisher::devices::DeviceSynthesizer;
use device_publisher::{driver, DeviceSchema, KafkaPublisher};
use tracing::{error, info, Level};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            println!("{}", e.render());
            std::process::exit(1);
        }
    };

    // Initialize logging, warnings and errors to stderr
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .or_else(std::io::stdout);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .init();

    if let Err(e) = run_main(cli.into_settings()).await {
        error!("{:?}", e);
        std::process::exit(1);
    }
}

async fn run_main(settings: RunSettings) -> anyhow::Result<()> {
    info!("Starting device publisher");
    info!(
        "Broker: {}, Topic: {}, Devices: {}, Registry: {}",
        settings.publisher.brokers,
        settings.topic,
        settings.count,
        settings.publisher.registry_url
    );

    let schema = match &settings.schema_file {
        Some(path) => DeviceSchema::load(path)
            .with_context(|| format!("Failed to load schema from {}", path.display()))?,
        None => DeviceSchema::embedded().context("Built-in device schema is invalid")?,
    };

    let mut client = KafkaPublisher::new(&settings.publisher, schema)
        .context("Failed to create Kafka publisher")?;

    let mut synthesizer = DeviceSynthesizer::seeded(settings.seed);
    driver::run(&mut client, &mut synthesizer, &settings.topic, settings.count)
        .await
        .context("Failed to close Kafka publisher")?;

    info!("Publisher finished");
    Ok(())
}
