//! Publishes synthetic IoT device telemetry to Kafka.
//!
//! Each device record is built by [`devices::DeviceSynthesizer`], encoded by
//! [`codec`] against the `devices` Avro schema registered through
//! [`registry`], and handed to a [`client::PublishClient`]. The
//! [`driver`] ties these together for a single sequential run.

pub mod client;
pub mod codec;
pub mod config;
pub mod devices;
pub mod driver;
pub mod errors;
pub mod model;
pub mod registry;
pub mod schema;

#[cfg(test)]
mod testing;

pub use client::{Ack, KafkaPublisher, PublishClient};
pub use errors::{Error, Result};
pub use model::DeviceRecord;
pub use schema::DeviceSchema;
