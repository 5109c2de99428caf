//! Workflow extraction: list the cloud flows in a package and parse their
//! bindings.

pub mod rewrite;

use crate::core::{Binding, ClientData, Workflow};
use crate::errors::{ConnRefError, Result};
use crate::remote::{fetchxml, DataverseClient};
use serde_json::Value;
use tracing::{debug, warn};

pub use rewrite::{update_bindings, update_flows_in_package, FlowUpdate};

/// Raw workflow records that belong to `package`, all pages.
pub fn fetch_workflow_records(client: &DataverseClient, package: &str) -> Result<Vec<Value>> {
    let endpoint = fetchxml::fetch_endpoint("workflows", &fetchxml::workflows_in_package(package));
    client.fetch_all(&client.api_url(&endpoint))
}

/// Cloud flows in `package`. Records that cannot be interpreted are skipped
/// with a diagnostic.
pub fn list_workflows_in_package(client: &DataverseClient, package: &str) -> Result<Vec<Workflow>> {
    let records = fetch_workflow_records(client, package)?;
    let workflows: Vec<Workflow> = records.iter().filter_map(parse_workflow).collect();
    debug!(
        package,
        records = records.len(),
        loaded = workflows.len(),
        "workflows listed"
    );
    Ok(workflows)
}

pub fn parse_workflow(record: &Value) -> Option<Workflow> {
    match Workflow::from_record(record) {
        Ok(workflow) => Some(workflow),
        Err(reason) => {
            let name = record.get("name").and_then(Value::as_str).unwrap_or("");
            warn!("[SKIP] {name}: {reason}");
            None
        }
    }
}

/// Bindings in a raw client-data blob, ordered by reference key.
pub fn extract_bindings(workflow_name: &str, blob: &str) -> Result<Vec<Binding>> {
    let data = ClientData::parse(blob).map_err(|e| ConnRefError::ClientData {
        workflow: workflow_name.to_string(),
        message: e.to_string(),
    })?;
    Ok(data.bindings())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::Method;
    use crate::testkit::{helpers, MockTransport};

    #[test]
    fn test_list_skips_uninterpretable_records() {
        let mock = MockTransport::new();
        mock.on(
            Method::Get,
            "workflows?fetchXml=",
            helpers::page(vec![
                helpers::workflow_record("wf-1", "Good", &helpers::client_data(&[("a", "shared_sql", "")])),
                helpers::workflow_record("wf-2", "", "{}"),
                helpers::workflow_record("wf-3", "Broken", "{nope"),
            ]),
        );

        let workflows = list_workflows_in_package(&mock.client(), "Pkg").unwrap();
        assert_eq!(workflows.len(), 1);
        assert_eq!(workflows[0].id, "wf-1");

        let url = &mock.requests()[0].url;
        assert!(url.starts_with("https://test.crm.dynamics.com/api/data/v9.2/workflows?fetchXml="));
        assert!(url.contains("Pkg"));
    }

    #[test]
    fn test_list_fails_on_remote_error() {
        let mock = MockTransport::new();
        mock.on(Method::Get, "workflows", crate::remote::Response::new(500, "boom"));
        let err = list_workflows_in_package(&mock.client(), "Pkg").unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_extract_bindings() {
        let blob = helpers::client_data(&[("z", "shared_sql", "n1"), ("a", "shared_o365", "")]);
        let bindings = extract_bindings("wf", &blob).unwrap();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].key, "a");
        assert_eq!(bindings[1].logical_name, "n1");

        assert!(extract_bindings("wf", r#"{"x":1}"#).unwrap().is_empty());
        assert!(matches!(
            extract_bindings("wf", "[").unwrap_err(),
            ConnRefError::ClientData { .. }
        ));
    }
}
