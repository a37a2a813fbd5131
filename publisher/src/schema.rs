//! The `devices` Avro schema every published record is bound to.

use crate::errors::{Error, Result};
use apache_avro::Schema;
use std::path::Path;
use tracing::debug;

/// Schema shipped with the binary, used unless a schema file is supplied.
pub const DEFAULT_SCHEMA: &str = include_str!("../schemas/device.avsc");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldType {
    Int,
    Long,
    String,
}

const EXPECTED_FIELDS: [(&str, FieldType); 10] = [
    ("device_id", FieldType::Int),
    ("device_name", FieldType::String),
    ("ip", FieldType::String),
    ("temp", FieldType::Int),
    ("humidity", FieldType::Int),
    ("lat", FieldType::Int),
    ("long", FieldType::Int),
    ("zipcode", FieldType::Int),
    ("scale", FieldType::String),
    ("timestamp", FieldType::Long),
];

/// A parsed and shape-checked device schema, shared by the codec and the
/// registry client for the whole run.
#[derive(Debug, Clone)]
pub struct DeviceSchema {
    schema: Schema,
    text: String,
}

impl DeviceSchema {
    /// Parses schema text and checks it describes a `DeviceRecord`.
    pub fn parse(text: &str) -> Result<Self> {
        let schema = Schema::parse_str(text)?;
        check_shape(&schema)?;

        Ok(Self {
            schema,
            text: text.trim().to_string(),
        })
    }

    /// Reads and parses a schema file.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading schema from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// The embedded default schema.
    pub fn embedded() -> Result<Self> {
        Self::parse(DEFAULT_SCHEMA)
    }

    pub fn avro(&self) -> &Schema {
        &self.schema
    }

    /// Schema text as submitted to the registry.
    pub fn text(&self) -> &str {
        &self.text
    }
}

fn check_shape(schema: &Schema) -> Result<()> {
    let record = match schema {
        Schema::Record(record) => record,
        other => {
            return Err(Error::Schema(format!(
                "expected a record schema, found {:?}",
                other
            )))
        }
    };

    if record.fields.len() != EXPECTED_FIELDS.len() {
        return Err(Error::Schema(format!(
            "record {} has {} fields, expected {}",
            record.name.name,
            record.fields.len(),
            EXPECTED_FIELDS.len()
        )));
    }

    for (field, (name, expected)) in record.fields.iter().zip(EXPECTED_FIELDS) {
        if field.name != name {
            return Err(Error::Schema(format!(
                "field {} is named {}, expected {}",
                field.position, field.name, name
            )));
        }

        let matches = matches!(
            (expected, &field.schema),
            (FieldType::Int, Schema::Int)
                | (FieldType::Long, Schema::Long)
                | (FieldType::String, Schema::String)
        );
        if !matches {
            return Err(Error::Schema(format!(
                "field {} has type {:?}, expected {:?}",
                name, field.schema, expected
            )));
        }
    }

    Ok(())
}
