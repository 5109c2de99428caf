//! Adding connection references to a package with `AddSolutionComponent`.
//!
//! The component type of `connectionreference` is read from entity metadata
//! once per run. When that lookup fails the known codes are tried in order.

use crate::errors::{ConnRefError, Result};
use crate::remote::DataverseClient;
use serde_json::json;
use std::cell::OnceCell;
use tracing::{debug, warn};

/// Codes observed for `connectionreference` across environments.
pub const FALLBACK_COMPONENT_TYPES: [u32; 2] = [10132, 10469];

const METADATA_ENDPOINT: &str =
    "EntityDefinitions(LogicalName='connectionreference')?$select=ObjectTypeCode";

#[derive(Debug)]
pub enum MembershipOutcome {
    Added { component_type: u32 },
    /// Every attempt was rejected and at least one rejection was the
    /// "Invalid component type" 400, which the platform returns even though
    /// the component was added. Counted as added.
    SoftSuccess,
    Failed(ConnRefError),
}

impl MembershipOutcome {
    pub fn is_added(&self) -> bool {
        !matches!(self, MembershipOutcome::Failed(_))
    }
}

/// A `400` whose body mentions "Invalid component type".
pub fn is_soft_component_type_error(error: &ConnRefError) -> bool {
    match error {
        ConnRefError::Remote { status: 400, body } => body.contains("Invalid component type"),
        _ => false,
    }
}

/// Discovered component type first, then the fallbacks, without repeats.
pub fn candidate_types(discovered: Option<u32>) -> Vec<u32> {
    let mut candidates: Vec<u32> = discovered.into_iter().collect();
    for code in FALLBACK_COMPONENT_TYPES {
        if !candidates.contains(&code) {
            candidates.push(code);
        }
    }
    candidates
}

/// Adds components to packages, caching the discovered component type.
pub struct MembershipAdder<'a> {
    client: &'a DataverseClient,
    component_type: OnceCell<Option<u32>>,
}

impl<'a> MembershipAdder<'a> {
    pub fn new(client: &'a DataverseClient) -> Self {
        Self {
            client,
            component_type: OnceCell::new(),
        }
    }

    fn discovered_type(&self) -> Option<u32> {
        *self
            .component_type
            .get_or_init(|| match discover_component_type(self.client) {
                Ok(code) => {
                    debug!(code, "connectionreference component type discovered");
                    Some(code)
                }
                Err(e) => {
                    warn!("[WARN] Component type discovery failed, using known codes: {e}");
                    None
                }
            })
    }

    pub fn add(&self, package: &str, component_id: &str, logical_name: &str) -> MembershipOutcome {
        let mut soft_error_seen = false;
        let mut last_error = None;

        for component_type in candidate_types(self.discovered_type()) {
            match add_solution_component(self.client, package, component_id, component_type) {
                Ok(()) => return MembershipOutcome::Added { component_type },
                Err(e) => {
                    if is_soft_component_type_error(&e) {
                        debug!(component_type, logical_name, "component type rejected");
                        soft_error_seen = true;
                    } else {
                        debug!(component_type, logical_name, error = %e, "add to package failed");
                    }
                    last_error = Some(e);
                }
            }
        }

        if soft_error_seen {
            warn!(
                "[WARN] Received 'Invalid component type' for '{logical_name}'; the reference may still have been added to '{package}'"
            );
            return MembershipOutcome::SoftSuccess;
        }
        MembershipOutcome::Failed(
            last_error.unwrap_or_else(|| ConnRefError::Http("no component type to try".to_string())),
        )
    }
}

pub fn discover_component_type(client: &DataverseClient) -> Result<u32> {
    let metadata = client.get_json(&client.api_url(METADATA_ENDPOINT))?;
    metadata
        .get("ObjectTypeCode")
        .and_then(|v| v.as_u64())
        .and_then(|code| u32::try_from(code).ok())
        .ok_or_else(|| ConnRefError::remote(200, format!("ObjectTypeCode missing: {metadata}")))
}

fn add_solution_component(
    client: &DataverseClient,
    package: &str,
    component_id: &str,
    component_type: u32,
) -> Result<()> {
    let body = json!({
        "ComponentId": component_id,
        "ComponentType": component_type,
        "SolutionUniqueName": package,
        "AddRequiredComponents": false,
    });
    client.post_json(&client.api_url("AddSolutionComponent"), body)?;
    Ok(())
}
