use super::client_data::{Binding, ClientData};
use serde_json::Value;
use std::fmt;

/// A cloud flow with its client data parsed once at load.
#[derive(Debug, Clone, PartialEq)]
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub client_data: ClientData,
}

/// Why a workflow record was not loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingFields,
    InvalidClientData(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingFields => f.write_str("No clientdata found or missing required fields."),
            SkipReason::InvalidClientData(e) => write!(f, "clientdata is not valid: {e}"),
        }
    }
}

fn non_empty_str<'a>(record: &'a Value, field: &str) -> Option<&'a str> {
    record.get(field)?.as_str().filter(|s| !s.is_empty())
}

impl Workflow {
    /// Build from a raw `workflow` record carrying `name`, `workflowid` and
    /// `clientdata`.
    pub fn from_record(record: &Value) -> Result<Self, SkipReason> {
        let (Some(name), Some(id), Some(blob)) = (
            non_empty_str(record, "name"),
            non_empty_str(record, "workflowid"),
            non_empty_str(record, "clientdata"),
        ) else {
            return Err(SkipReason::MissingFields);
        };

        let client_data =
            ClientData::parse(blob).map_err(|e| SkipReason::InvalidClientData(e.to_string()))?;

        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            client_data,
        })
    }

    pub fn bindings(&self) -> Vec<Binding> {
        self.client_data.bindings()
    }

    /// Distinct non-empty providers, in binding order.
    pub fn providers(&self) -> Vec<String> {
        let mut providers: Vec<String> = Vec::new();
        for binding in self.bindings() {
            if !binding.provider.is_empty() && !providers.contains(&binding.provider) {
                providers.push(binding.provider);
            }
        }
        providers
    }
}
