use serde_json::Value;

/// A `connectionreference` record. The logical name is the natural key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedConnectionReference {
    pub id: String,
    pub logical_name: String,
    pub display_name: String,
    pub connection_id: String,
    pub connector_id: String,
}

fn field(record: &Value, name: &str) -> String {
    record
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

impl SharedConnectionReference {
    /// Missing attributes read as empty strings.
    pub fn from_record(record: &Value) -> Self {
        Self {
            id: field(record, "connectionreferenceid"),
            logical_name: field(record, "connectionreferencelogicalname"),
            display_name: field(record, "connectionreferencedisplayname"),
            connection_id: field(record, "connectionid"),
            connector_id: field(record, "connectorid"),
        }
    }
}
