//! Factory functions for records and payloads used across tests.

use crate::config::{AppConfig, AuthMethod, ProviderMapping};
use crate::remote::Response;
use serde_json::{json, Value};

/// A `clientdata` blob with one binding per `(key, provider, logical_name)`.
/// An empty logical name leaves the `connection` object out.
pub fn client_data(bindings: &[(&str, &str, &str)]) -> String {
    let mut refs = serde_json::Map::new();
    for (key, provider, logical_name) in bindings {
        let mut entry = json!({ "api": { "name": provider } });
        if !logical_name.is_empty() {
            entry["connection"] = json!({ "connectionReferenceLogicalName": logical_name });
        }
        refs.insert((*key).to_string(), entry);
    }
    json!({
        "properties": {
            "connectionReferences": refs,
            "definition": { "actions": {} }
        },
        "schemaVersion": "1.0.0.0"
    })
    .to_string()
}

/// A raw `workflow` record as returned by the workflow query.
pub fn workflow_record(id: &str, name: &str, client_data: &str) -> Value {
    json!({ "workflowid": id, "name": name, "clientdata": client_data })
}

/// A raw `connectionreference` record.
pub fn reference_record(id: &str, logical_name: &str, connection_id: &str) -> Value {
    json!({
        "connectionreferenceid": id,
        "connectionreferencelogicalname": logical_name,
        "connectionreferencedisplayname": logical_name,
        "connectionid": connection_id,
        "connectorid": ""
    })
}

/// A single-page collection response.
pub fn page(records: Vec<Value>) -> Response {
    Response::json(200, &json!({ "value": records }))
}

/// `204 No Content` with an `OData-EntityId` header for a created reference.
pub fn created(id: &str) -> Response {
    Response::new(204, "").with_header(
        "OData-EntityId",
        format!("https://test.crm.dynamics.com/api/data/v9.2/connectionreferences({id})"),
    )
}

/// Configuration with prefix `new` and the given provider mappings as
/// `(provider, connection_id, connector_id)`.
pub fn config_with_mappings(mappings: &[(&str, &str, &str)]) -> AppConfig {
    let mut config = AppConfig::default();
    config.platform.dataverse_url = "https://test.crm.dynamics.com".into();
    config.platform.auth_method = AuthMethod::AccessToken;
    config.platform.access_token = Some("token".into());
    for (provider, connection_id, connector_id) in mappings {
        config.connection_references.provider_mappings.insert(
            (*provider).to_string(),
            ProviderMapping {
                connection_id: (*connection_id).to_string(),
                connector_id: (*connector_id).to_string(),
            },
        );
    }
    config
}
