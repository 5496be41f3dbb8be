//! Tolerant decoding of message feeds
//!
//! List endpoints answer `{ "result": [...] }`, but the admin endpoint returns
//! a bare object when there is a single message, and older deployments return
//! the array without an envelope. Entries can be `null` or missing required
//! fields. None of this is an error: undecodable entries are logged and
//! skipped, and the rest of the feed is kept.

use serde_json::Value;

use super::message::MessageRecord;

/// Decode a list response body into records
pub fn decode_feed(body: Value) -> Vec<MessageRecord> {
    let payload = match body {
        Value::Object(mut map) if map.contains_key("result") => {
            map.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    };

    let entries = match payload {
        Value::Array(entries) => entries,
        Value::Null => return Vec::new(),
        single @ Value::Object(_) => vec![single],
        other => {
            tracing::warn!("Ignoring feed with unexpected shape: {}", other);
            return Vec::new();
        }
    };

    let total = entries.len();
    let records: Vec<MessageRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| decode_entry(index, entry))
        .collect();

    if records.len() < total {
        tracing::debug!("Decoded {} of {} feed entries", records.len(), total);
    }
    records
}

fn decode_entry(index: usize, entry: Value) -> Option<MessageRecord> {
    if entry.is_null() {
        tracing::warn!("Skipping null feed entry at index {}", index);
        return None;
    }
    match serde_json::from_value::<MessageRecord>(entry) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!("Skipping undecodable feed entry at index {}: {}", index, e);
            None
        }
    }
}
