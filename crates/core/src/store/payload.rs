//! Structural checks on raw holdings-store payloads.

use serde_json::Value;

use crate::errors::CoreError;
use crate::models::holding::HoldingRecord;

/// Name of a JSON value's type, for diagnostics.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decode a `GET /stocks` payload.
///
/// The payload must be an array, and every element must be an object that
/// decodes into a [`HoldingRecord`]. The first element that does not aborts
/// the whole decode; the error names its index and actual JSON type.
pub fn decode_holdings(payload: Value) -> Result<Vec<HoldingRecord>, CoreError> {
    let items = match payload {
        Value::Array(items) => items,
        other => {
            return Err(CoreError::UpstreamDataInvalid(format!(
                "expected a list of holdings but got {}",
                json_type_name(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| decode_element(item, &format!("at index {index}")))
        .collect()
}

/// Decode a `GET /stocks/{id}` payload.
pub fn decode_holding(payload: Value, id: &str) -> Result<HoldingRecord, CoreError> {
    let mut record = decode_element(payload, &format!("'{id}'"))?;
    if record.id.is_none() {
        record.id = Some(id.to_string());
    }
    Ok(record)
}

fn decode_element(item: Value, position: &str) -> Result<HoldingRecord, CoreError> {
    if !item.is_object() {
        return Err(CoreError::UpstreamDataInvalid(format!(
            "invalid stock format {position}: expected object but got {}",
            json_type_name(&item)
        )));
    }
    serde_json::from_value(item).map_err(|e| {
        CoreError::UpstreamDataInvalid(format!("invalid stock format {position}: {e}"))
    })
}
