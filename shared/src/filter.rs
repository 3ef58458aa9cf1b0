use std::collections::BTreeMap;
use chrono::{DateTime, SecondsFormat, Utc};
use crate::protocol::SEARCH_KEY;
use crate::types::Asset;

/// Fields the free-text `search` criterion looks at
pub const SEARCH_FIELDS: [&str; 5] = ["asset_id", "hostname", "used_by", "serial_number", "model_no"];

/// Field name to expected value. Deserializes directly from a query string.
pub type Criteria = BTreeMap<String, String>;

/// Returns the records matching every active criterion, in input order.
///
/// Empty values and keys that name no field are ignored. `search` is a
/// case-insensitive substring test over [`SEARCH_FIELDS`]; every other key
/// is a case-insensitive exact match on the field of that name.
pub fn apply<'a>(records: &'a [Asset], criteria: &Criteria) -> Vec<&'a Asset> {
    let active: Vec<(&str, String)> = criteria
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.as_str(), value.to_lowercase()))
        .collect();

    records
        .iter()
        .filter(|asset| active.iter().all(|(key, value)| matches(asset, key, value)))
        .collect()
}

/// `needle` must already be lowercased
fn matches(asset: &Asset, key: &str, needle: &str) -> bool {
    if key == SEARCH_KEY {
        return SEARCH_FIELDS
            .iter()
            .filter_map(|name| asset.field(name))
            .any(|value| value.to_lowercase().contains(needle));
    }
    let value = match key {
        "created_at" => timestamp(asset.created_at),
        "updated_at" => timestamp(asset.updated_at),
        _ => match asset.field(key) {
            Some(value) => value.to_string(),
            None => return true,
        },
    };
    value.to_lowercase() == needle
}

/// Same rendering the JSON API uses, e.g. `2024-05-15T10:30:00Z`
fn timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        .unwrap_or_default()
}
