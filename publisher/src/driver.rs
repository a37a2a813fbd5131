use crate::client::PublishClient;
use crate::devices::DeviceSynthesizer;
use crate::errors::Result;
use rand::Rng;
use tracing::{debug, error, info};

/// Publishes devices `0..count` in order, then closes the client. A count of
/// zero or less publishes nothing.
///
/// A record that fails to send is logged and dropped; the loop moves on to
/// the next device. Only the final close can fail the run.
pub async fn run<C, R>(
    client: &mut C,
    synthesizer: &mut DeviceSynthesizer<R>,
    topic: &str,
    count: i32,
) -> Result<()>
where
    C: PublishClient,
    R: Rng,
{
    info!("Publishing {} devices to topic {}", count.max(0), topic);

    for id in 0..count {
        let record = synthesizer.build_device_info(id);
        info!("Device info publishing to Kafka topic {} : {:?}", topic, record);

        match client.send(topic, &record).await {
            Ok(ack) => debug!(device_id = id, bytes = ack.bytes, "Record queued"),
            Err(e) => error!("Failed to publish device {}: {} ({:?})", id, e, e),
        }
    }

    client.close()
}
