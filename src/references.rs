//! CRUD on `connectionreference` records.

use crate::core::SharedConnectionReference;
use crate::errors::{ConnRefError, Result};
use crate::remote::{fetchxml, DataverseClient, Response};
use serde_json::{json, Value};
use tracing::debug;

const ENTITY_SET: &str = "connectionreferences";

/// Fields for a new connection reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReference {
    pub logical_name: String,
    pub display_name: String,
    pub connection_id: String,
    pub connector_id: String,
}

/// Look up a reference by logical name.
pub fn find_by_logical_name(
    client: &DataverseClient,
    logical_name: &str,
) -> Result<Option<SharedConnectionReference>> {
    let endpoint = format!(
        "{ENTITY_SET}?$select=connectionreferenceid,connectionreferencelogicalname,connectionid,connectorid&$filter={}",
        fetchxml::odata_filter_eq("connectionreferencelogicalname", logical_name)
    );
    let page = client.fetch_page(&client.api_url(&endpoint))?;
    Ok(page.value.first().map(SharedConnectionReference::from_record))
}

/// References that are components of `package`.
pub fn list_in_package(
    client: &DataverseClient,
    package: &str,
) -> Result<Vec<SharedConnectionReference>> {
    let endpoint = fetchxml::fetch_endpoint(
        ENTITY_SET,
        &fetchxml::connection_references_in_package(package),
    );
    let records = client.fetch_all(&client.api_url(&endpoint))?;
    Ok(records
        .iter()
        .map(SharedConnectionReference::from_record)
        .collect())
}

/// Create a reference and return its id.
pub fn create(client: &DataverseClient, reference: &NewReference) -> Result<String> {
    let body = json!({
        "connectionid": reference.connection_id,
        "connectorid": reference.connector_id,
        "connectionreferencedisplayname": reference.display_name,
        "connectionreferencelogicalname": reference.logical_name,
    });
    let response = client.post_json(&client.api_url(ENTITY_SET), body)?;
    let id = created_id(&response).ok_or_else(|| {
        ConnRefError::remote(
            response.status,
            format!("no connectionreferenceid in create response: {}", response.body),
        )
    })?;
    debug!(id = %id, logical_name = %reference.logical_name, "reference created");
    Ok(id)
}

/// Id of a created record: the `OData-EntityId` header
/// (`.../connectionreferences(<id>)`), else `connectionreferenceid` in the body.
pub fn created_id(response: &Response) -> Option<String> {
    response
        .header("OData-EntityId")
        .and_then(id_from_entity_url)
        .or_else(|| {
            serde_json::from_str::<Value>(&response.body)
                .ok()?
                .get("connectionreferenceid")?
                .as_str()
                .filter(|id| !id.is_empty())
                .map(str::to_string)
        })
}

fn id_from_entity_url(url: &str) -> Option<String> {
    let marker = format!("{ENTITY_SET}(");
    let start = url.find(&marker)? + marker.len();
    let rest = &url[start..];
    let id = &rest[..rest.find(')')?];
    let is_guid = !id.is_empty() && id.chars().all(|c| c.is_ascii_hexdigit() || c == '-');
    is_guid.then(|| id.to_string())
}

pub fn update_connection_id(client: &DataverseClient, id: &str, connection_id: &str) -> Result<()> {
    client.patch_json(
        &client.api_url(&format!("{ENTITY_SET}({id})")),
        json!({ "connectionid": connection_id }),
    )?;
    Ok(())
}

pub fn delete(client: &DataverseClient, id: &str) -> Result<()> {
    client.delete(&client.api_url(&format!("{ENTITY_SET}({id})")))?;
    Ok(())
}
