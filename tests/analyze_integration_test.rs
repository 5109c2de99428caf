mod common;

use common::{flow, run, serve_flows, serve_lookups, sql_config, SOLUTION};
use connref::commands;
use connref::output::{OutputFormat, NO_FLOWS};
use connref::remote::{Method, Response};
use connref::testkit::{helpers, MockTransport};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;

fn analyze(mock: &MockTransport, format: OutputFormat) -> String {
    let (_, out) = run(mock, &sql_config(), |session, out| {
        commands::analyze(session, out, SOLUTION, format, None)
    })
    .unwrap();
    out
}

#[test]
fn test_zero_flows_in_every_format() {
    let mock = MockTransport::new();
    serve_flows(&mock, vec![]);

    for format in [OutputFormat::Table, OutputFormat::Vertical] {
        let out = analyze(&mock, format);
        assert!(out.contains("=== FLOW AND CONNECTION REFERENCE ANALYSIS FOR 'Pkg' ==="));
        assert!(out.contains(NO_FLOWS), "{format:?}: {out}");
        assert!(out.contains("Total Flows: 0"));
    }

    let csv = analyze(&mock, OutputFormat::Csv);
    assert_eq!(
        csv,
        "FlowId,FlowName,ConnectionReferenceId,LogicalName,Provider,ConnectionId\n\
         # No flows found in the solution.\n\
         # Total Flows: 0\n\
         # Total Connection References: 0\n"
    );

    let json: Value = serde_json::from_str(&analyze(&mock, OutputFormat::Json)).unwrap();
    assert_eq!(json["SolutionName"], "Pkg");
    assert_eq!(json["Message"], NO_FLOWS);
    assert_eq!(json["Summary"]["TotalFlows"], 0);
    assert_eq!(json["Summary"]["TotalConnectionReferences"], 0);
    assert_eq!(json["Flows"], json!([]));
    assert_eq!(mock.count(Method::Get, "connectionreferences"), 0);
}

#[test]
fn test_csv_escapes_quotes_in_flow_names() {
    let mock = MockTransport::new();
    serve_flows(
        &mock,
        vec![flow("wf-1", r#"Say "hi", then sync"#, &[("k", "shared_sql", "new_ref")])],
    );
    serve_lookups(&mock, vec![helpers::reference_record("id-1", "new_ref", "conn-1")]);

    let csv = analyze(&mock, OutputFormat::Csv);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[1],
        r#""wf-1","Say ""hi"", then sync","id-1","new_ref","shared_sql","conn-1""#
    );
}

#[test]
fn test_lookup_outcomes_use_sentinels() {
    let mock = MockTransport::new();
    serve_flows(
        &mock,
        vec![flow(
            "wf-1",
            "Flow One",
            &[
                ("a", "shared_sql", "missing_ref"),
                ("b", "shared_o365", "broken_ref"),
                ("c", "shared_teams", ""),
            ],
        )],
    );
    mock.on(Method::Get, "%27missing_ref%27", helpers::page(vec![]));
    mock.on(Method::Get, "%27broken_ref%27", Response::new(500, "boom"));

    let (result, out) = run(&mock, &sql_config(), |session, out| {
        commands::analyze(session, out, SOLUTION, OutputFormat::Vertical, None)
    })
    .unwrap();

    let details: Vec<(&str, &str)> = result.workflows[0]
        .references
        .iter()
        .map(|r| (r.reference_id.as_str(), r.connection_id.as_str()))
        .collect();
    assert_eq!(
        details,
        vec![
            ("Not Found", "Not Found"),
            ("Unknown", "Not Set"),
            ("Not Found", "Not Found"),
        ]
    );
    assert!(out.contains("  Connection References (3):"));
    assert_eq!(mock.count(Method::Get, "connectionreferences"), 2);
}

#[test]
fn test_invalid_workflows_are_skipped() {
    let mock = MockTransport::new();
    serve_flows(
        &mock,
        vec![
            json!({ "workflowid": "wf-bad", "name": "Broken", "clientdata": "{not json" }),
            json!({ "name": "No id" }),
            flow("wf-2", "Good", &[]),
        ],
    );

    let (result, _) = run(&mock, &sql_config(), |session, out| {
        commands::analyze(session, out, SOLUTION, OutputFormat::Table, None)
    })
    .unwrap();

    assert_eq!(result.workflows.len(), 1);
    assert_eq!(result.workflows[0].id, "wf-2");
    assert_eq!(result.summary().flows_without_references, 1);
}

#[test]
fn test_listing_failure_is_fatal() {
    let mock = MockTransport::new();
    mock.on(Method::Get, "workflows?fetchXml", Response::new(401, "expired token"));

    let result = run(&mock, &sql_config(), |session, out| {
        commands::analyze(session, out, SOLUTION, OutputFormat::Vertical, None)
    });
    let error = format!("{:#}", result.unwrap_err());
    assert!(error.contains("failed to analyze solution 'Pkg'"));
    assert!(error.contains("401"));
}

#[test]
fn test_output_file_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("reports").join("analysis.json");

    let mock = MockTransport::new();
    serve_flows(&mock, vec![flow("wf-1", "Flow One", &[("k", "shared_sql", "new_ref")])]);
    serve_lookups(&mock, vec![helpers::reference_record("id-1", "new_ref", "conn-1")]);

    let (_, out) = run(&mock, &sql_config(), |session, out| {
        commands::analyze(session, out, SOLUTION, OutputFormat::Json, Some(&path))
    })
    .unwrap();

    assert_eq!(out, format!("JSON output saved to: {}\n", path.display()));
    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["Summary"]["TotalConnectionReferences"], 1);
    assert_eq!(saved["Flows"][0]["ConnectionReferences"][0]["ConnectionReferenceId"], "id-1");
}
