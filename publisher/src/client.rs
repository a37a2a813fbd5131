use crate::codec;
use crate::config::PublisherConfig;
use crate::errors::{Error, Result};
use crate::model::DeviceRecord;
use crate::registry::{subject_for, SchemaRegistry};
use crate::schema::DeviceSchema;
use rdkafka::client::ClientContext;
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::message::Message;
use rdkafka::producer::{BaseRecord, DeliveryResult, Producer, ProducerContext, ThreadedProducer};
use rdkafka::ClientConfig;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long a send waits before offering a record to a full queue again.
const QUEUE_FULL_BACKOFF: Duration = Duration::from_millis(100);

/// Receipt for a record handed to the client. Delivery itself is reported
/// asynchronously, if at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub topic: String,
    pub bytes: usize,
}

/// Something that can take device records bound for a topic.
#[allow(async_fn_in_trait)]
pub trait PublishClient {
    async fn send(&mut self, topic: &str, record: &DeviceRecord) -> Result<Ack>;

    /// Flushes buffered records and releases the client.
    fn close(&mut self) -> Result<()>;
}

/// Logs delivery reports from the producer's polling thread.
pub struct DeliveryLogger;

impl ClientContext for DeliveryLogger {}

impl ProducerContext for DeliveryLogger {
    type DeliveryOpaque = ();

    fn delivery(&self, delivery_result: &DeliveryResult<'_>, _: Self::DeliveryOpaque) {
        match delivery_result {
            Ok(message) => debug!(
                topic = message.topic(),
                partition = message.partition(),
                offset = message.offset(),
                "Record delivered"
            ),
            Err((err, message)) => warn!(
                topic = message.topic(),
                error = %err,
                "Record delivery failed"
            ),
        }
    }
}

/// Kafka-backed client. Records are Avro-encoded with the id their topic's
/// schema is registered under and queued without waiting for broker
/// acknowledgement.
///
/// The schema is registered on the first send to each topic. A failed
/// registration fails only that send; the next send tries again.
pub struct KafkaPublisher {
    producer: ThreadedProducer<DeliveryLogger>,
    registry: SchemaRegistry,
    schema: DeviceSchema,
    schema_ids: HashMap<String, u32>,
    flush_timeout: Option<Duration>,
}

impl KafkaPublisher {
    /// Creates the producer. No broker or registry traffic happens here.
    pub fn new(config: &PublisherConfig, schema: DeviceSchema) -> Result<Self> {
        info!(
            "Creating Kafka producer {} for {}",
            config.client_id, config.brokers
        );
        let producer: ThreadedProducer<DeliveryLogger> =
            client_config(config).create_with_context(DeliveryLogger)?;
        let registry = SchemaRegistry::new(&config.registry_url)?;

        Ok(Self {
            producer,
            registry,
            schema,
            schema_ids: HashMap::new(),
            flush_timeout: config.flush_timeout,
        })
    }

    /// Uses `schema_id` for `topic` instead of registering on first send.
    pub fn with_registered(mut self, topic: &str, schema_id: u32) -> Self {
        self.schema_ids.insert(subject_for(topic), schema_id);
        self
    }

    /// The id records for `topic` are framed with, once registered.
    pub fn schema_id(&self, topic: &str) -> Option<u32> {
        self.schema_ids.get(&subject_for(topic)).copied()
    }

    async fn resolve_schema_id(&mut self, topic: &str) -> Result<u32> {
        let subject = subject_for(topic);
        if let Some(id) = self.schema_ids.get(&subject) {
            return Ok(*id);
        }

        let id = self.registry.register(&subject, &self.schema).await?;
        self.schema_ids.insert(subject, id);
        Ok(id)
    }
}

impl PublishClient for KafkaPublisher {
    async fn send(&mut self, topic: &str, record: &DeviceRecord) -> Result<Ack> {
        let schema_id = self.resolve_schema_id(topic).await?;
        let payload = codec::encode(&self.schema, schema_id, record)?;

        // A full local queue never accepted the record, so wait for the
        // polling thread to drain it rather than dropping the record.
        let mut pending = BaseRecord::<(), [u8]>::to(topic).payload(payload.as_slice());
        loop {
            match self.producer.send(pending) {
                Ok(()) => break,
                Err((KafkaError::MessageProduction(RDKafkaErrorCode::QueueFull), returned)) => {
                    debug!(device_id = record.device_id, "Producer queue full, waiting");
                    pending = returned;
                    tokio::time::sleep(QUEUE_FULL_BACKOFF).await;
                }
                Err((err, _)) => return Err(Error::Kafka(err)),
            }
        }

        Ok(Ack {
            topic: topic.to_string(),
            bytes: payload.len(),
        })
    }

    fn close(&mut self) -> Result<()> {
        info!(
            "Flushing {} in-flight records (timeout {:?})",
            self.producer.in_flight_count(),
            self.flush_timeout
        );
        if let Err(e) = self.producer.flush(self.flush_timeout) {
            warn!(
                "Flush did not finish, {} records left undelivered: {}",
                self.producer.in_flight_count(),
                e
            );
        }
        Ok(())
    }
}

fn client_config(config: &PublisherConfig) -> ClientConfig {
    let mut client_config = ClientConfig::new();
    client_config
        .set("bootstrap.servers", &config.brokers)
        .set("client.id", &config.client_id)
        .set("acks", &config.acks)
        .set("retries", config.retries.to_string())
        .set(
            "queue.buffering.max.messages",
            config.queue_capacity.to_string(),
        );
    client_config
}
