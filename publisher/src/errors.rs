use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("Avro error: {0}")]
    Avro(#[from] apache_avro::Error),

    #[error("Schema registry request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Schema registry returned {status}: {message}")]
    Registry { status: u16, message: String },

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Record does not conform to schema: {0}")]
    Conformance(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
