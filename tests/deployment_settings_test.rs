mod common;

use common::{flow, run, serve_flows, sql_config, SOLUTION};
use connref::commands;
use connref::testkit::MockTransport;
use indoc::indoc;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn test_writes_settings_for_expected_names() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("deploymentsettings.json");

    let mock = MockTransport::new();
    serve_flows(
        &mock,
        vec![
            flow("wf-2", "Second", &[("a", "shared_sql", ""), ("b", "shared_teams", "")]),
            flow("WF-1", "First", &[("a", "shared_sql", "old")]),
        ],
    );

    let (document, out) = run(&mock, &sql_config(), |session, out| {
        commands::generate_deployment_settings(session, out, SOLUTION, &path)
    })
    .unwrap();

    assert_eq!(document.connection_references.len(), 3);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        indoc! {r#"
            {
              "EnvironmentVariables": [],
              "ConnectionReferences": [
                {
                  "LogicalName": "new_shared_sql_wf1",
                  "ConnectionId": "",
                  "ConnectorId": "connector-sql"
                },
                {
                  "LogicalName": "new_shared_sql_wf2",
                  "ConnectionId": "",
                  "ConnectorId": "connector-sql"
                },
                {
                  "LogicalName": "new_shared_teams_wf2",
                  "ConnectionId": "",
                  "ConnectorId": ""
                }
              ]
            }"#}
    );
    assert!(out.contains("Generated deployment settings with 3 connection references"));
    assert_eq!(mock.mutating_count(), 0);
}

#[test]
fn test_unwritable_destination_fails() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing-dir").join("settings.json");

    let mock = MockTransport::new();
    serve_flows(&mock, vec![flow("wf-1", "Flow", &[("a", "shared_sql", "")])]);

    let result = run(&mock, &sql_config(), |session, out| {
        commands::generate_deployment_settings(session, out, SOLUTION, &path)
    });
    assert!(result.is_err());
}
