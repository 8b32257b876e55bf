//! Versioned slot envelope
//!
//! Every slot is written as `{"schemaVersion": N, "data": ...}`.
//! A bare JSON value without the envelope is a payload from before
//! versioning and is read as version 0.

use crate::config::SCHEMA_VERSION;
use crate::error::{AppError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

const VERSION_FIELD: &str = "schemaVersion";
const DATA_FIELD: &str = "data";

#[derive(Serialize)]
struct Envelope<'a, T> {
    #[serde(rename = "schemaVersion")]
    schema_version: u32,
    data: &'a T,
}

/// Serialize a collection into the current envelope
pub fn encode<T: Serialize>(data: &T) -> Result<String> {
    let envelope = Envelope {
        schema_version: SCHEMA_VERSION,
        data,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Parse a slot, migrating older payloads up to the current version
pub fn decode<T: DeserializeOwned>(slot: &str, text: &str) -> Result<T> {
    let raw: Value = serde_json::from_str(text)?;
    let (version, data) = split_envelope(slot, raw)?;

    if version > SCHEMA_VERSION {
        return Err(AppError::UnsupportedSchema {
            slot: slot.to_string(),
            version,
        });
    }

    let data = migrate(slot, version, data)?;
    Ok(serde_json::from_value(data)?)
}

fn split_envelope(slot: &str, raw: Value) -> Result<(u32, Value)> {
    match raw {
        Value::Object(mut map) if map.contains_key(VERSION_FIELD) && map.contains_key(DATA_FIELD) => {
            let version = map
                .get(VERSION_FIELD)
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| {
                    AppError::Storage(format!("Slot '{}' has a malformed schema version", slot))
                })?;
            let data = map.remove(DATA_FIELD).unwrap_or(Value::Null);
            Ok((version, data))
        }
        other => Ok((0, other)),
    }
}

/// Upgrade `data` one version at a time until it matches [`SCHEMA_VERSION`]
pub fn migrate(slot: &str, mut version: u32, mut data: Value) -> Result<Value> {
    while version < SCHEMA_VERSION {
        data = match version {
            // v0 is the bare collection; v1 only introduced the envelope
            0 => data,
            other => {
                return Err(AppError::Storage(format!(
                    "No migration for slot '{}' from schema version {}",
                    slot, other
                )))
            }
        };
        version += 1;
        tracing::debug!("Migrated slot {} to schema version {}", slot, version);
    }

    Ok(data)
}
