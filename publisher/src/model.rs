use serde::{Deserialize, Serialize};

/// Scale every synthesized temperature is reported in.
pub const SCALE_CELSIUS: &str = "Celsius";

/// One IoT device telemetry reading.
///
/// Field order matches the `devices` Avro record, since the Avro serializer
/// walks struct fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub device_id: i32,
    pub device_name: String,
    pub ip: String,
    pub temp: i32,
    pub humidity: i32,
    pub lat: i32,
    pub long: i32,
    pub zipcode: i32,
    pub scale: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}
