// Shared setup for connref integration tests
#![allow(dead_code)]

use connref::commands::Session;
use connref::config::AppConfig;
use connref::formatting::{ColoredFormatter, FormattingConfig};
use connref::remote::{Method, Response};
use connref::testkit::{helpers, MockTransport};
use serde_json::{json, Value};

pub const SOLUTION: &str = "Pkg";

/// Config mapping `shared_sql` to `conn-1`.
pub fn sql_config() -> AppConfig {
    helpers::config_with_mappings(&[("shared_sql", "conn-1", "connector-sql")])
}

/// Serve `records` as the solution's workflow listing.
pub fn serve_flows(mock: &MockTransport, records: Vec<Value>) {
    mock.on(Method::Get, "workflows?fetchXml", helpers::page(records));
}

/// Serve `records` for every single-reference lookup.
pub fn serve_lookups(mock: &MockTransport, records: Vec<Value>) {
    mock.on(
        Method::Get,
        "connectionreferences?$select",
        helpers::page(records),
    );
}

/// Serve the component type and accept every membership request.
pub fn accept_membership(mock: &MockTransport) {
    mock.on(
        Method::Get,
        "EntityDefinitions(",
        Response::json(200, &json!({ "ObjectTypeCode": 10132 })),
    );
    mock.on(Method::Post, "AddSolutionComponent", Response::new(204, ""));
}

pub fn flow(id: &str, name: &str, bindings: &[(&str, &str, &str)]) -> Value {
    helpers::workflow_record(id, name, &helpers::client_data(bindings))
}

/// Run a command handler against `mock` with plain formatting and return its
/// value along with everything it printed.
pub fn run<T>(
    mock: &MockTransport,
    config: &AppConfig,
    command: impl FnOnce(&Session<'_>, &mut Vec<u8>) -> anyhow::Result<T>,
) -> anyhow::Result<(T, String)> {
    let client = mock.client();
    let formatter = ColoredFormatter::new(FormattingConfig::plain());
    let session = Session {
        client: &client,
        config,
        formatter: &formatter,
    };
    let mut out = Vec::new();
    let value = command(&session, &mut out)?;
    Ok((value, String::from_utf8(out)?))
}
