//! End-to-end scenarios over a scripted transport: full multi-page scan,
//! failed-scan behavior, and the write round trips, all without touching
//! the network.

use std::sync::Arc;

use moosend_adapter::{
    Column, ColumnType, MemoryLog, MoosendAdapter, MoosendConfig, Row, ScriptedTransport, Severity,
    TableSource, Value,
};

fn page(total: u32, current: u32, subscribers: &[(&str, &str)]) -> String {
    let subscribers: Vec<String> = subscribers
        .iter()
        .map(|(email, name)| format!(r#"{{"Email":"{email}","Name":"{name}","CustomFields":[]}}"#))
        .collect();
    format!(
        r#"{{"Code":0,"Context":{{"Subscribers":[{}],"Paging":{{"TotalPageCount":{total},"CurrentPage":{current}}}}}}}"#,
        subscribers.join(",")
    )
}

struct Fixture {
    adapter: MoosendAdapter,
    transport: Arc<ScriptedTransport>,
    log: Arc<MemoryLog>,
}

fn fixture(columns: Vec<Column>) -> Fixture {
    let transport = Arc::new(ScriptedTransport::new());
    let log = Arc::new(MemoryLog::new());
    let config = MoosendConfig::new("api-key", "list-1").with_primary_key("Email");
    let adapter = MoosendAdapter::new(
        config,
        columns,
        Box::new(Arc::clone(&transport)),
        Box::new(Arc::clone(&log)),
    )
    .expect("fixture config is valid");
    Fixture {
        adapter,
        transport,
        log,
    }
}

fn text_row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::Text(v.to_string())))
        .collect()
}

#[test]
fn three_page_scan_yields_six_rows_with_requested_keys() {
    let fx = fixture(vec![
        Column::new("Email", ColumnType::Text),
        Column::new("Name", ColumnType::Text),
    ]);
    fx.transport
        .push_response(page(3, 1, &[("a@x.com", "A"), ("b@x.com", "B")]));
    fx.transport
        .push_response(page(3, 2, &[("c@x.com", "C"), ("d@x.com", "D")]));
    fx.transport
        .push_response(page(3, 3, &[("e@x.com", "E"), ("f@x.com", "F")]));

    let rows: Vec<Row> = fx.adapter.scan(&[]).collect();

    assert_eq!(rows.len(), 6);
    for row in &rows {
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Email", "Name"]);
    }
    assert_eq!(fx.transport.requests().len(), 3);
}

#[test]
fn invalid_api_key_scan_is_empty_and_logged() {
    let fx = fixture(vec![Column::new("Email", ColumnType::Text)]);
    fx.transport
        .push_response(r#"{"Code":1,"Error":"Invalid ApiKey"}"#);

    let rows: Vec<Row> = fx.adapter.scan(&[]).collect();

    assert!(rows.is_empty());
    let errors = fx.log.lines_at(Severity::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Invalid ApiKey"));
}

#[test]
fn typed_columns_coerce_across_a_scan() {
    let fx = fixture(vec![
        Column::new("Email", ColumnType::Text),
        Column::new("UnsubscribedFromID", ColumnType::Integer),
        Column::new("CreatedOn", ColumnType::TimestampTz),
        Column::new("UnsubscribedOn", ColumnType::TimestampTz),
    ]);
    fx.transport.push_response(
        r#"{"Code":0,"Context":{"Subscribers":[{
            "Email":"a@x.com",
            "UnsubscribedFromID":"42",
            "CreatedOn":"/Date(1000000000000+0000)/",
            "UnsubscribedOn":null
        }],"Paging":{"TotalPageCount":1,"CurrentPage":1}}}"#,
    );

    let rows: Vec<Row> = fx.adapter.scan(&[]).collect();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["UnsubscribedFromID"], Value::Integer(42));
    assert_eq!(rows[0]["UnsubscribedOn"], Value::Null);
    match &rows[0]["CreatedOn"] {
        Value::TimestampTz(ts) => assert_eq!(ts.timestamp(), 1_000_000_000),
        other => panic!("expected tz-aware timestamp, got {other:?}"),
    }
}

#[test]
fn insert_round_trips_through_subscribe_endpoint() {
    let fx = fixture(vec![
        Column::new("Email", ColumnType::Text),
        Column::new("Name", ColumnType::Text),
        Column::new("CustomField1", ColumnType::Text),
    ]);
    fx.transport.push_response(
        r#"{"Code":0,"Context":{"Email":"a@x.com","Name":"A",
            "CustomFields":[{"Name":"CustomField1","Value":"v"}]}}"#,
    );

    let table: &dyn TableSource = &fx.adapter;
    let echoed = table
        .insert(&text_row(&[
            ("Name", "A"),
            ("Email", "a@x.com"),
            ("CustomField1", "v"),
        ]))
        .unwrap()
        .unwrap();

    let requests = fx.transport.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.path().ends_with("/subscribers/list-1/subscribe.json"));
    let body = requests[0].body.as_ref().unwrap();
    assert_eq!(body["CustomFields"][0], "CustomField1=v");
    assert_eq!(body["HasExternalDoubleOptIn"], true);

    assert_eq!(echoed["Email"], Value::Text("a@x.com".to_string()));
}

#[test]
fn delete_success_and_failure_logging() {
    let fx = fixture(vec![Column::new("Email", ColumnType::Text)]);
    fx.transport.push_response(r#"{"Code":0}"#);
    fx.transport
        .push_response(r#"{"Code":2,"Error":"Member not found"}"#);

    let table: &dyn TableSource = &fx.adapter;
    table.delete("a@x.com").unwrap();
    assert!(fx.log.lines_at(Severity::Error).is_empty());

    table.delete("ghost@x.com").unwrap();
    let errors = fx.log.lines_at(Severity::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Member not found"));

    let requests = fx.transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].url.path().ends_with("/subscribers/list-1/remove.json"));
    assert_eq!(requests[1].body.as_ref().unwrap()["Email"], "ghost@x.com");
}
