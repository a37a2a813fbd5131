use crate::model::{DeviceRecord, SCALE_CELSIUS};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TEMP_MIN: i32 = 10;
const TEMP_MAX: i32 = 35;
const HUMIDITY_MIN: i32 = 25;
const HUMIDITY_MAX: i32 = 100;
const COORDINATE_MIN: i32 = -90;
const COORDINATE_MAX: i32 = 90;

const DEVICE_KINDS: [&str; 8] = [
    "sensor-pad",
    "device-mac",
    "therm-stick",
    "gauge-meter",
    "sensor-igauge",
    "meter-gauge",
    "sensor-inest",
    "device-xbox",
];

const ZIPCODES: [i32; 10] = [
    94538, 94086, 94301, 95014, 95051, 95110, 94043, 94025, 97201, 10001,
];

/// Builds synthetic device records from an injected random source.
pub struct DeviceSynthesizer<R> {
    rng: R,
}

impl DeviceSynthesizer<StdRng> {
    /// A synthesizer seeded for reproducible output, or from OS entropy.
    pub fn seeded(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(rng)
    }
}

impl<R: Rng> DeviceSynthesizer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Builds the record for device `id`, stamped with the current time.
    pub fn build_device_info(&mut self, id: i32) -> DeviceRecord {
        DeviceRecord {
            device_id: id,
            device_name: device_type(id),
            ip: format!("192.34.5.{}", id),
            temp: temp(&mut self.rng),
            humidity: humidity(&mut self.rng),
            lat: coordinate(&mut self.rng),
            long: coordinate(&mut self.rng),
            zipcode: zipcode(id),
            scale: SCALE_CELSIUS.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Device name, `<kind>-<id>`, with the kind picked round-robin by id.
pub fn device_type(id: i32) -> String {
    let kind = DEVICE_KINDS[table_index(id, DEVICE_KINDS.len())];
    format!("{}-{}", kind, id)
}

pub fn zipcode(id: i32) -> i32 {
    ZIPCODES[table_index(id, ZIPCODES.len())]
}

pub fn temp(rng: &mut impl Rng) -> i32 {
    rng.gen_range(TEMP_MIN..=TEMP_MAX)
}

pub fn humidity(rng: &mut impl Rng) -> i32 {
    rng.gen_range(HUMIDITY_MIN..=HUMIDITY_MAX)
}

pub fn coordinate(rng: &mut impl Rng) -> i32 {
    rng.gen_range(COORDINATE_MIN..=COORDINATE_MAX)
}

fn table_index(id: i32, len: usize) -> usize {
    id.rem_euclid(len as i32) as usize
}
