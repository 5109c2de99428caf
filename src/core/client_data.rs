//! View over a workflow's `clientdata` blob.
//!
//! The blob is held as the parsed JSON tree. Reading walks
//! `properties.connectionReferences.<key>.{api.name,
//! connection.connectionReferenceLogicalName}` and rebinding writes only the
//! logical name, so key order, explicit nulls and unknown fields come back out
//! exactly as they were read.

use serde::de::Error as _;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const PROPERTIES: &str = "properties";
const CONNECTION_REFERENCES: &str = "connectionReferences";
const LOGICAL_NAME: &str = "connectionReferenceLogicalName";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ClientData(Value);

/// One entry of `properties.connectionReferences`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub key: String,
    pub provider: String,
    pub logical_name: String,
}

fn provider(entry: &Value) -> &str {
    entry
        .get("api")
        .and_then(|api| api.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("")
}

fn logical_name(entry: &Value) -> &str {
    entry
        .get("connection")
        .and_then(|c| c.get(LOGICAL_NAME))
        .and_then(Value::as_str)
        .unwrap_or("")
}

impl ClientData {
    /// Parse a blob. The document must be an object, and a non-null
    /// `connectionReferences` must map keys to objects.
    pub fn parse(json: &str) -> serde_json::Result<Self> {
        let raw: Value = serde_json::from_str(json)?;
        if !raw.is_object() {
            return Err(serde_json::Error::custom("clientdata is not a JSON object"));
        }
        let data = Self(raw);
        match data.0.get(PROPERTIES).and_then(|p| p.get(CONNECTION_REFERENCES)) {
            None | Some(Value::Null) => {}
            Some(Value::Object(refs)) => {
                if let Some((key, _)) = refs.iter().find(|(_, entry)| !entry.is_object()) {
                    return Err(serde_json::Error::custom(format!(
                        "connection reference `{key}` is not an object"
                    )));
                }
            }
            Some(_) => {
                return Err(serde_json::Error::custom(
                    "connectionReferences is not an object",
                ))
            }
        }
        Ok(data)
    }

    pub fn to_compact_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }

    fn references(&self) -> Option<&Map<String, Value>> {
        self.0.get(PROPERTIES)?.get(CONNECTION_REFERENCES)?.as_object()
    }

    fn references_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.0
            .get_mut(PROPERTIES)?
            .get_mut(CONNECTION_REFERENCES)?
            .as_object_mut()
    }

    /// Bindings ordered by reference key; empty when the map is absent.
    pub fn bindings(&self) -> Vec<Binding> {
        let mut bindings: Vec<Binding> = self
            .references()
            .map(|refs| {
                refs.iter()
                    .map(|(key, entry)| Binding {
                        key: key.clone(),
                        provider: provider(entry).to_string(),
                        logical_name: logical_name(entry).to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        bindings.sort_by(|a, b| a.key.cmp(&b.key));
        bindings
    }

    /// Point every binding whose provider is a key of `targets` at the mapped
    /// logical name. Returns the non-empty names that were replaced.
    pub fn rebind(&mut self, targets: &BTreeMap<String, String>) -> Vec<String> {
        let Some(refs) = self.references_mut() else {
            return Vec::new();
        };

        let mut previous = Vec::new();
        for entry in refs.values_mut() {
            let Some(target) = targets.get(provider(entry)) else {
                continue;
            };
            let old = logical_name(entry).to_string();
            let Some(fields) = entry.as_object_mut() else {
                continue;
            };
            match fields.get_mut("connection") {
                Some(Value::Object(connection)) => {
                    connection.insert(LOGICAL_NAME.to_string(), Value::String(target.clone()));
                }
                _ => {
                    let mut connection = Map::new();
                    connection.insert(LOGICAL_NAME.to_string(), Value::String(target.clone()));
                    fields.insert("connection".to_string(), Value::Object(connection));
                }
            }
            if !old.is_empty() {
                previous.push(old);
            }
        }
        previous
    }
}
