//! Registry-framed Avro encoding of device records.
//!
//! Every payload is `[0x00][schema id: u32 big-endian][avro binary datum]`,
//! the framing registry-aware consumers expect.

use crate::errors::{Error, Result};
use crate::model::DeviceRecord;
use crate::schema::DeviceSchema;
use apache_avro::{from_avro_datum, from_value, to_avro_datum, to_value};

pub const MAGIC_BYTE: u8 = 0;
const HEADER_LEN: usize = 5;

/// Validates `record` against the schema and frames its Avro encoding.
pub fn encode(schema: &DeviceSchema, schema_id: u32, record: &DeviceRecord) -> Result<Vec<u8>> {
    let value = to_value(record)?;
    if !value.validate(schema.avro()) {
        return Err(Error::Conformance(format!(
            "device {} does not match the devices schema",
            record.device_id
        )));
    }

    let datum = to_avro_datum(schema.avro(), value)?;

    let mut payload = Vec::with_capacity(HEADER_LEN + datum.len());
    payload.push(MAGIC_BYTE);
    payload.extend_from_slice(&schema_id.to_be_bytes());
    payload.extend_from_slice(&datum);
    Ok(payload)
}

/// Splits a framed payload into its schema id and decoded record.
pub fn decode(schema: &DeviceSchema, payload: &[u8]) -> Result<(u32, DeviceRecord)> {
    if payload.len() < HEADER_LEN {
        return Err(Error::Conformance(format!(
            "payload of {} bytes is shorter than the {} byte header",
            payload.len(),
            HEADER_LEN
        )));
    }
    if payload[0] != MAGIC_BYTE {
        return Err(Error::Conformance(format!(
            "unknown magic byte {:#04x}",
            payload[0]
        )));
    }

    let schema_id = u32::from_be_bytes([payload[1], payload[2], payload[3], payload[4]]);
    let mut datum = &payload[HEADER_LEN..];
    let value = from_avro_datum(schema.avro(), &mut datum, None)?;
    let record = from_value::<DeviceRecord>(&value)?;

    Ok((schema_id, record))
}
