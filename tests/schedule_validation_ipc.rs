use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_examseatd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn examseatd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn time_range(json_hours: (u32, u32)) -> serde_json::Value {
    json!({
        "start": { "hour": json_hours.0, "minute": 0, "meridiem": "AM" },
        "end": { "hour": json_hours.1, "minute": 0, "meridiem": "PM" }
    })
}

fn entry(date: &str, subjects: &[(&str, &str)]) -> serde_json::Value {
    let assignments: Vec<serde_json::Value> = subjects
        .iter()
        .map(|(year, subject)| json!({ "year": year, "subject": subject }))
        .collect();
    json!({
        "date": date,
        "shifts": [{ "timeRange": time_range((9, 12)), "assignments": assignments }]
    })
}

fn violations(resp: &serde_json::Value) -> Vec<serde_json::Value> {
    assert_eq!(resp["error"]["code"].as_str(), Some("invalid_schedule"));
    resp["error"]["details"]["violations"]
        .as_array()
        .expect("violations array")
        .clone()
}

#[test]
fn valid_schedule_round_trips_unchanged() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let config = json!([
        entry("2024-05-01", &[("II Yr", "CS201")]),
        entry("2024-05-02", &[("III Yr", "CS301")]),
    ]);
    let resp = request(
        &mut stdin,
        &mut reader,
        "1",
        "schedule.validate",
        json!({ "config": config }),
    );
    assert_eq!(resp["ok"].as_bool(), Some(true));
    assert_eq!(resp["result"]["valid"].as_bool(), Some(true));
    assert_eq!(resp["result"]["config"], config);

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn duplicate_date_flags_only_the_second_entry() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let config = json!([
        entry("2024-05-01", &[("I Yr", "MA101")]),
        entry("2024-05-01", &[("II Yr", "MA201")]),
    ]);
    let resp = request(
        &mut stdin,
        &mut reader,
        "1",
        "schedule.validate",
        json!({ "config": config }),
    );
    let v = violations(&resp);
    assert_eq!(v.len(), 1);
    assert_eq!(v[0]["kind"].as_str(), Some("duplicate_date"));
    assert_eq!(v[0]["location"]["dateIndex"].as_u64(), Some(1));
    assert_eq!(v[0]["value"].as_str(), Some("2024-05-01"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn duplicate_subject_is_global_across_dates() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let config = json!([
        entry("2024-05-01", &[("III Yr", "CS301")]),
        entry("2024-05-02", &[("III Yr", "CS301")]),
    ]);
    let resp = request(
        &mut stdin,
        &mut reader,
        "1",
        "schedule.validate",
        json!({ "config": config }),
    );
    let v = violations(&resp);
    assert_eq!(v.len(), 1);
    assert_eq!(v[0]["kind"].as_str(), Some("duplicate_subject"));
    assert_eq!(v[0]["location"]["dateIndex"].as_u64(), Some(1));
    assert_eq!(v[0]["value"].as_str(), Some("CS301"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn empty_schedule_is_a_distinct_rejection() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let resp = request(
        &mut stdin,
        &mut reader,
        "1",
        "schedule.validate",
        json!({ "config": [] }),
    );
    let v = violations(&resp);
    assert_eq!(v.len(), 1);
    assert_eq!(v[0]["kind"].as_str(), Some("empty_schedule"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn all_violations_are_collected_in_document_order() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let config = json!([
        {
            "date": "",
            "shifts": [{
                "timeRange": { "start": { "hour": 9, "minute": 0, "meridiem": "AM" }, "end": {} },
                "assignments": []
            }]
        },
        { "date": "2024-05-02", "shifts": [] },
        entry("2024-05-02", &[("I Yr", ""), ("II Yr", "PH201")]),
    ]);
    let resp = request(
        &mut stdin,
        &mut reader,
        "1",
        "schedule.validate",
        json!({ "config": config }),
    );
    let v = violations(&resp);
    let kinds: Vec<&str> = v.iter().map(|v| v["kind"].as_str().expect("kind")).collect();
    assert_eq!(
        kinds,
        vec![
            "missing_date",
            "incomplete_time",
            "no_year_selected",
            "empty_date_entry",
            "duplicate_date",
            "missing_subject",
        ]
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn build_payload_fails_closed_then_produces_engine_shapes() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let created = request(&mut stdin, &mut reader, "1", "rooms.init", json!({ "count": 2 }));
    let rooms = created["result"]["rooms"].as_array().expect("rooms").clone();

    let config = json!([entry("2024-05-01", &[("II Yr", "CS201")])]);

    // Invalid schedule blocks payload building entirely.
    let invalid = json!([entry("2024-05-01", &[("II Yr", "")])]);
    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "schedule.buildPayload",
        json!({ "config": invalid }),
    );
    assert_eq!(resp["error"]["code"].as_str(), Some("invalid_schedule"));

    // A valid schedule with unconfigured rooms still fails closed.
    let resp = request(
        &mut stdin,
        &mut reader,
        "3",
        "schedule.buildPayload",
        json!({ "config": config }),
    );
    assert_eq!(resp["error"]["code"].as_str(), Some("room_incomplete"));
    assert_eq!(resp["error"]["details"]["roomIndex"].as_u64(), Some(0));

    for (i, room) in rooms.iter().enumerate() {
        let _ = request(
            &mut stdin,
            &mut reader,
            &format!("4-{}", i),
            "rooms.update",
            json!({
                "roomId": room["id"],
                "patch": { "rows": 7, "cols": 9 }
            }),
        );
    }

    let resp = request(
        &mut stdin,
        &mut reader,
        "5",
        "schedule.buildPayload",
        json!({ "config": config }),
    );
    assert_eq!(resp["ok"].as_bool(), Some(true));
    let result = &resp["result"];
    assert_eq!(
        result["schedule_config"][0]["shifts"][0]["time"].as_str(),
        Some("9:00 AM - 12:00 PM")
    );
    assert_eq!(
        result["schedule_config"][0]["shifts"][0]["years"][0]["subject"].as_str(),
        Some("CS201")
    );
    assert_eq!(result["room_config"][0]["name"].as_str(), Some("N101"));
    assert_eq!(result["room_config"][0]["rows"].as_u64(), Some(7));
    assert_eq!(
        result["room_config"][0]["seating_pattern"].as_str(),
        Some("IV Yr, III Yr, II Yr, I Yr")
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn validation_is_idempotent_over_ipc() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let config = json!([
        entry("2024-05-01", &[("I Yr", "CS101")]),
        entry("2024-05-01", &[("I Yr", "CS101")]),
    ]);
    let first = request(
        &mut stdin,
        &mut reader,
        "1",
        "schedule.validate",
        json!({ "config": config }),
    );
    let second = request(
        &mut stdin,
        &mut reader,
        "2",
        "schedule.validate",
        json!({ "config": config }),
    );
    assert_eq!(first["error"]["details"], second["error"]["details"]);

    drop(stdin);
    let _ = child.wait();
}
