use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Publishes synthetic IoT device records to a Kafka topic, Avro-encoded
/// against a schema registered with a schema registry.
#[derive(Debug, Parser)]
#[command(name = "device-publisher", version)]
pub struct Cli {
    /// Kafka topic to publish to
    pub topic: String,

    /// Number of devices to publish; zero or negative publishes none
    #[arg(allow_negative_numbers = true)]
    pub count: i32,

    /// Schema registry base URL
    pub registry_url: String,

    /// Kafka bootstrap servers
    #[arg(long, env = "KAFKA_BROKERS", default_value = "localhost:9092")]
    pub brokers: String,

    /// Broker acknowledgements required per record
    #[arg(
        long,
        env = "KAFKA_ACKS",
        default_value = "all",
        allow_negative_numbers = true,
        value_parser = ["all", "-1", "0", "1"]
    )]
    pub acks: String,

    /// Producer-level retries per record
    #[arg(long, env = "KAFKA_RETRIES", default_value_t = 0)]
    pub retries: u32,

    /// How long close waits for in-flight records; waits until all are
    /// delivered when unset
    #[arg(long)]
    pub flush_timeout_ms: Option<u64>,

    /// Records the producer may buffer before sends wait for room
    #[arg(long, env = "KAFKA_QUEUE_CAPACITY", default_value_t = 100_000)]
    pub queue_capacity: u32,

    /// Avro schema file to use instead of the built-in one
    #[arg(long)]
    pub schema_file: Option<PathBuf>,

    /// Seed for reproducible readings
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Connection settings for the Kafka publisher and its schema registry.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    pub brokers: String,
    pub registry_url: String,
    pub acks: String,
    pub retries: u32,
    pub flush_timeout: Option<Duration>,
    pub queue_capacity: u32,
    pub client_id: String,
}

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub topic: String,
    pub count: i32,
    pub schema_file: Option<PathBuf>,
    pub seed: Option<u64>,
    pub publisher: PublisherConfig,
}

impl Cli {
    pub fn into_settings(self) -> RunSettings {
        let client_id = format!("device-publisher-{}", uuid::Uuid::new_v4());

        RunSettings {
            topic: self.topic,
            count: self.count,
            schema_file: self.schema_file,
            seed: self.seed,
            publisher: PublisherConfig {
                brokers: self.brokers,
                registry_url: self.registry_url,
                acks: self.acks,
                retries: self.retries,
                flush_timeout: self.flush_timeout_ms.map(Duration::from_millis),
                queue_capacity: self.queue_capacity,
                client_id,
            },
        }
    }
}
