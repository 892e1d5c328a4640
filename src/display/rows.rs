//! Projections from API records to table rows.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use super::attributes::{
    bool_attr, cell, decode, is_present, list_attr, map_attr, number_attr, string_attr,
};
use super::table::Table;

pub const DEFAULT_ARCHITECTURE: &str = "x86_64";
const NONE: &str = "None";

pub const TOPOLOGY_HEADERS: [&str; 6] = [
    "name",
    "owner",
    "topology_id",
    "workflow",
    "reservation",
    "version",
];

pub const ARTIFACT_HEADERS: [&str; 8] = [
    "artifact_id",
    "artifact_type",
    "file_name",
    "file_version",
    "owner",
    "storage",
    "vendor",
    "architecture",
];

pub const WORKFLOW_HEADERS: [&str; 5] = [
    "topology_id",
    "workflow_id",
    "workflow_name",
    "start_time",
    "state",
];

pub const RESERVATION_HEADERS: [&str; 3] = ["topology_id", "field", "value"];

pub const USER_HEADERS: [&str; 2] = ["setting", "value"];

/// A list endpoint may answer with a single record; treat it as a one-element list.
pub fn records(body: &Value) -> Vec<&Value> {
    match body {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

fn text(record: &Value, key: &str) -> String {
    string_attr(record, key).unwrap_or_default().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Finished,
    Running,
}

impl WorkflowState {
    fn of(workflow: &Value) -> Self {
        if bool_attr(workflow, "finished") == Some(true) {
            Self::Finished
        } else {
            Self::Running
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Finished => "finished",
            Self::Running => "running",
        }
    }
}

/// `<workflow name>(<state>)`, with `None` standing in for whatever is missing.
fn workflow_summary(record: &Value) -> String {
    let workflow = map_attr(record, "workflow");
    let name = workflow
        .and_then(|w| w.get("workflow_name"))
        .and_then(|name| name.get("S"))
        .and_then(Value::as_str)
        .unwrap_or(NONE);
    let state = if is_present(record.get("workflow")) {
        workflow.map_or(WorkflowState::Running, WorkflowState::of).as_str()
    } else {
        NONE
    };
    format!("{name}({state})")
}

pub fn topology_row(record: &Value) -> Vec<String> {
    vec![
        text(record, "topology_name"),
        text(record, "owner"),
        text(record, "topology_id"),
        workflow_summary(record),
        is_present(record.get("reservation")).to_string(),
        number_attr(record, "version").unwrap_or_default(),
    ]
}

pub fn topology_table(body: &Value) -> Table {
    let mut table = Table::new(TOPOLOGY_HEADERS);
    for record in records(body) {
        table.push(topology_row(record));
    }
    table
}

pub fn artifact_row(record: &Value) -> Vec<String> {
    let mut row: Vec<String> = ARTIFACT_HEADERS[..7]
        .iter()
        .map(|key| text(record, key))
        .collect();
    row.push(
        string_attr(record, "architecture")
            .unwrap_or(DEFAULT_ARCHITECTURE)
            .to_string(),
    );
    row
}

pub fn artifact_table(body: &Value) -> Table {
    let mut table = Table::new(ARTIFACT_HEADERS);
    for record in records(body) {
        table.push(artifact_row(record));
    }
    table
}

/// One entry of a topology's workflow history.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowRow {
    pub topology_id: String,
    pub workflow_id: String,
    pub workflow_name: String,
    pub start_time: String,
    pub state: WorkflowState,
    started_at: Option<DateTime<Utc>>,
}

impl WorkflowRow {
    fn from_map(topology_id: &str, workflow: &Value) -> Self {
        let start_time = workflow
            .get("start_time")
            .map(|raw| cell(&decode(raw)))
            .unwrap_or_default();
        Self {
            topology_id: topology_id.to_string(),
            workflow_id: text(workflow, "workflow_id"),
            workflow_name: workflow
                .get("workflow_name")
                .and_then(|name| name.get("S"))
                .and_then(Value::as_str)
                .unwrap_or(NONE)
                .to_string(),
            started_at: parse_timestamp(&start_time),
            start_time,
            state: WorkflowState::of(workflow),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.topology_id.clone(),
            self.workflow_id.clone(),
            self.workflow_name.clone(),
            self.start_time.clone(),
            self.state.as_str().to_string(),
        ]
    }
}

/// Expands `workflow_history` (or the lone `workflow`) of a record, newest first.
pub fn workflow_rows(record: &Value) -> Vec<WorkflowRow> {
    let topology_id = string_attr(record, "topology_id").unwrap_or_default();

    let mut rows: Vec<WorkflowRow> = match list_attr(record, "workflow_history") {
        Some(history) => history
            .iter()
            .filter_map(|entry| entry.get("M"))
            .map(|workflow| WorkflowRow::from_map(topology_id, workflow))
            .collect(),
        None => map_attr(record, "workflow")
            .map(|workflow| vec![WorkflowRow::from_map(topology_id, workflow)])
            .unwrap_or_default(),
    };

    rows.sort_by(|a, b| newest_first(a.started_at, b.started_at));
    rows
}

fn newest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Workflow rows of every record, each record's history newest first.
fn all_workflow_rows(body: &Value) -> Vec<WorkflowRow> {
    records(body).into_iter().flat_map(workflow_rows).collect()
}

pub fn workflow_table(body: &Value) -> Table {
    let mut table = Table::new(WORKFLOW_HEADERS);
    for row in all_workflow_rows(body) {
        table.push(row.cells());
    }
    table
}

/// The decoded `workflow_history` of every record, `null` where there is none.
pub fn workflow_histories(body: &Value) -> Value {
    Value::Array(
        records(body)
            .into_iter()
            .map(|record| {
                record
                    .get("workflow_history")
                    .map(decode)
                    .unwrap_or(Value::Null)
            })
            .collect(),
    )
}

/// The decoded `reservation` of every record, `null` where there is none.
pub fn reservations(body: &Value) -> Value {
    Value::Array(
        records(body)
            .into_iter()
            .map(|record| record.get("reservation").map(decode).unwrap_or(Value::Null))
            .collect(),
    )
}

/// The JSON blob held in `key` of every record.
pub fn embedded_blobs(body: &Value, key: &str) -> Value {
    Value::Array(
        records(body)
            .into_iter()
            .map(|record| embedded_json(record, key))
            .collect(),
    )
}

pub fn reservation_table(body: &Value) -> Table {
    let mut table = Table::new(RESERVATION_HEADERS);
    for record in records(body) {
        let topology_id = text(record, "topology_id");
        match record.get("reservation").map(decode) {
            Some(Value::Object(fields)) if !fields.is_empty() => {
                for (field, value) in &fields {
                    table.push(vec![topology_id.clone(), field.clone(), cell(value)]);
                }
            }
            Some(value) if !value.is_null() => {
                table.push(vec![topology_id, "reservation".to_string(), cell(&value)]);
            }
            _ => table.push(vec![topology_id, "reservation".to_string(), NONE.to_string()]),
        }
    }
    table
}

pub fn user_table(body: &Value) -> Table {
    let mut table = Table::new(USER_HEADERS);
    if let Some(settings) = body.as_object() {
        for (key, value) in settings {
            table.push(vec![key.clone(), cell(&decode(value))]);
        }
    }
    table
}

/// Decodes the JSON blob stored in a string attribute such as `topology_config`.
pub fn embedded_json(record: &Value, key: &str) -> Value {
    let raw = string_attr(record, key).unwrap_or("{}");
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Accepts RFC 3339, naive ISO 8601 (assumed UTC) and epoch seconds.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];
    for format in &formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }

    if let Ok(seconds) = raw.parse::<i64>() {
        return DateTime::from_timestamp(seconds, 0);
    }

    let seconds = raw.parse::<f64>().ok().filter(|s| s.is_finite())?;
    if seconds.abs() >= i64::MAX as f64 {
        return None;
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9) as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn topology() -> Value {
        json!({
            "topology_id": {"S": "t-1"},
            "topology_name": {"S": "spine-leaf"},
            "owner": {"S": "alice"},
            "version": {"N": "3"},
            "topology_config": {"S": "{\"nodes\": [\"r1\", \"r2\"]}"},
            "reservation": {"M": {"reservation_id": {"S": "r-9"}, "hosts": {"N": "2"}}},
            "workflow": {"M": {
                "workflow_name": {"S": "deploy"},
                "finished": {"BOOL": true}
            }},
            "workflow_history": {"L": [
                {"M": {
                    "workflow_id": {"S": "w-1"},
                    "workflow_name": {"S": "bootstrap"},
                    "start_time": {"S": "2024-03-01T10:00:00Z"},
                    "finished": {"BOOL": true}
                }},
                {"M": {
                    "workflow_id": {"S": "w-3"},
                    "workflow_name": {"S": "undeploy"},
                    "finished": {"BOOL": false}
                }},
                {"M": {
                    "workflow_id": {"S": "w-2"},
                    "workflow_name": {"S": "deploy"},
                    "start_time": {"N": "1709460000"},
                    "finished": {"BOOL": false}
                }}
            ]}
        })
    }

    #[test]
    fn topology_row_flattens_record() {
        assert_eq!(
            topology_row(&topology()),
            vec!["spine-leaf", "alice", "t-1", "deploy(finished)", "true", "3"]
        );
    }

    #[test]
    fn topology_row_without_workflow_or_reservation() {
        let record = json!({
            "topology_id": {"S": "t-2"},
            "topology_name": {"S": "ring"},
            "owner": {"S": "bob"},
            "version": {"N": "1"},
            "workflow": {"M": {"workflow_name": {"S": "ping"}}}
        });
        assert_eq!(
            topology_row(&record),
            vec!["ring", "bob", "t-2", "ping(running)", "false", "1"]
        );

        let bare = json!({"topology_id": {"S": "t-3"}});
        assert_eq!(topology_row(&bare)[3], "None(None)");
    }

    #[test]
    fn artifact_row_defaults_architecture() {
        let record = json!({
            "artifact_id": {"S": "a-1"},
            "artifact_type": {"S": "qcow"},
            "file_name": {"S": "veos.qcow2"},
            "file_version": {"S": "4.30.1F"},
            "owner": {"S": "alice"},
            "storage": {"S": "s3"},
            "vendor": {"S": "arista"}
        });
        assert_eq!(
            artifact_row(&record),
            vec!["a-1", "qcow", "veos.qcow2", "4.30.1F", "alice", "s3", "arista", "x86_64"]
        );

        let mut arm = record.clone();
        arm["architecture"] = json!({"S": "arm64"});
        assert_eq!(artifact_row(&arm)[7], "arm64");
    }

    #[test]
    fn workflow_history_is_sorted_newest_first() {
        let rows = workflow_rows(&topology());
        let ids: Vec<&str> = rows.iter().map(|row| row.workflow_id.as_str()).collect();
        assert_eq!(ids, ["w-2", "w-1", "w-3"]);
        assert_eq!(rows[0].start_time, "1709460000");
        assert_eq!(rows[0].state, WorkflowState::Running);
        assert_eq!(rows[1].state, WorkflowState::Finished);
        assert!(rows.iter().all(|row| row.topology_id == "t-1"));
    }

    #[test]
    fn single_workflow_is_used_without_history() {
        let record = json!({
            "topology_id": {"S": "t-2"},
            "workflow": {"M": {"workflow_name": {"S": "deploy"}}}
        });
        let rows = workflow_rows(&record);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].workflow_name, "deploy");
        assert_eq!(rows[0].workflow_id, "");
    }

    #[test]
    fn workflow_histories_keep_every_field_per_record() {
        let with_history = json!({
            "topology_id": {"S": "t-1"},
            "workflow_history": {"L": [
                {"M": {
                    "workflow_id": {"S": "w-1"},
                    "start_time": {"S": "2024-03-01T10:00:00Z"},
                    "end_time": {"S": "2024-03-01T10:05:00Z"},
                    "params": {"M": {"dry_run": {"BOOL": true}}}
                }}
            ]}
        });
        let without = json!({"topology_id": {"S": "t-2"}});

        assert_eq!(
            workflow_histories(&json!([with_history, without])),
            json!([
                [{
                    "workflow_id": "w-1",
                    "start_time": "2024-03-01T10:00:00Z",
                    "end_time": "2024-03-01T10:05:00Z",
                    "params": {"dry_run": true}
                }],
                null
            ])
        );
    }

    #[test]
    fn workflow_table_mixes_records() {
        let second = json!({
            "topology_id": {"S": "t-2"},
            "workflow": {"M": {
                "workflow_id": {"S": "w-9"},
                "workflow_name": {"S": "ping"},
                "start_time": {"S": "2024-04-01 08:00:00"},
                "finished": {"BOOL": true}
            }}
        });
        let bare = json!({"topology_id": {"S": "t-3"}});

        let table = workflow_table(&json!([topology(), second, bare]));
        let ids: Vec<(&str, &str)> = table
            .rows()
            .iter()
            .map(|row| (row[0].as_str(), row[1].as_str()))
            .collect();
        assert_eq!(
            ids,
            [("t-1", "w-2"), ("t-1", "w-1"), ("t-1", "w-3"), ("t-2", "w-9")]
        );
        assert_eq!(table.rows()[3][4], "finished");
    }

    #[test]
    fn reservations_decode_each_record() {
        let body = json!([topology(), {"topology_id": {"S": "t-2"}}]);
        assert_eq!(
            reservations(&body),
            json!([{"reservation_id": "r-9", "hosts": 2}, null])
        );
    }

    #[test]
    fn reservation_table_lists_fields() {
        let body = json!([topology(), {"topology_id": {"S": "t-2"}}]);
        let table = reservation_table(&body);
        assert_eq!(
            table.rows(),
            [
                vec!["t-1", "reservation_id", "r-9"],
                vec!["t-1", "hosts", "2"],
                vec!["t-2", "reservation", "None"],
            ]
        );
    }

    #[test]
    fn user_table_decodes_typed_values() {
        let body = json!({
            "region": {"S": "us-east-1"},
            "reservation_size": {"N": "4"},
            "instance_size": "m5.large"
        });
        let table = user_table(&body);
        assert_eq!(
            table.rows(),
            [
                vec!["region", "us-east-1"],
                vec!["reservation_size", "4"],
                vec!["instance_size", "m5.large"],
            ]
        );
    }

    #[test]
    fn embedded_json_defaults_to_empty_object() {
        assert_eq!(
            embedded_json(&topology(), "topology_config"),
            json!({"nodes": ["r1", "r2"]})
        );
        assert_eq!(embedded_json(&topology(), "topology_status"), json!({}));
    }

    #[test]
    fn single_record_body_is_treated_as_list() {
        let table = topology_table(&topology());
        assert_eq!(table.rows().len(), 1);
        assert!(records(&Value::Null).is_empty());
    }

    #[test]
    fn timestamps_parse_in_several_shapes() {
        assert!(parse_timestamp("2024-03-01T10:00:00Z").is_some());
        assert!(parse_timestamp("2024-03-01T10:00:00.123456").is_some());
        assert!(parse_timestamp("1709460000").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn epoch_timestamps_keep_fractions_and_reject_non_finite() {
        let whole = parse_timestamp("1709460000").unwrap();
        let fractional = parse_timestamp("1709460000.5").unwrap();
        assert_eq!(fractional - whole, chrono::Duration::milliseconds(500));

        for raw in ["NaN", "inf", "-inf", "1e300"] {
            assert!(parse_timestamp(raw).is_none(), "{raw} should not parse");
        }
    }
}
