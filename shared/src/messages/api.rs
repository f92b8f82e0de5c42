//! Client ↔ PollServer messages
//!
//! Logical request and response bodies of the HTTP API. Field names follow
//! the browser front-end (camelCase).

use serde::{Deserialize, Serialize};

/// Body of `POST /class/setup`
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureRosterRequest {
    pub class_name: Option<String>,
    pub students: Option<Vec<StudentEntry>>,
}

/// One raw roster row. Incomplete rows are skipped by the roster builder.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct StudentEntry {
    #[serde(default)]
    pub last: Option<String>,
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

impl StudentEntry {
    pub fn new(last: &str, first: &str, id: &str) -> Self {
        Self {
            last: Some(last.to_string()),
            first: Some(first.to_string()),
            id: Some(id.to_string()),
        }
    }
}

/// Body of `POST /poll/start`
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct StartPollRequest {
    #[serde(default)]
    pub question: String,
    /// Question type name; `multiplechoice` when omitted
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub choices: Vec<String>,
    /// Correct answer, stored verbatim
    #[serde(default)]
    pub answer: Option<String>,
}

/// Benign outcome of a session operation
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollStatus {
    #[serde(rename = "class setup complete")]
    ClassSetupComplete,
    #[serde(rename = "poll started")]
    PollStarted,
    #[serde(rename = "already running")]
    AlreadyRunning,
    #[serde(rename = "poll stopped")]
    PollStopped,
    #[serde(rename = "no poll running")]
    NoPollRunning,
}

impl PollStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollStatus::ClassSetupComplete => "class setup complete",
            PollStatus::PollStarted => "poll started",
            PollStatus::AlreadyRunning => "already running",
            PollStatus::PollStopped => "poll stopped",
            PollStatus::NoPollRunning => "no poll running",
        }
    }
}

/// `{ "status": ... }`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StatusReply {
    pub status: PollStatus,
}

/// `{ "error": ..., "kind": ... }`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorReply {
    pub error: String,
    pub kind: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub student_id: String,
    pub answer: String,
}

/// Body of `GET /poll/results`, entries in arrival order
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ResultsReply {
    pub results: Vec<ResultEntry>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub choice_count: usize,
}

/// Body of `GET /status`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusReply {
    pub state: String,
    pub class_name: Option<String>,
    pub student_count: usize,
    pub question: Option<QuestionSummary>,
    pub response_count: usize,
    pub dropped_responses: u64,
    pub device_connected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_roster_request_uses_front_end_field_names() {
        let body = json!({
            "className": "8B",
            "students": [{ "last": "Doe", "first": "Jane", "id": "1" }, { "last": "Roe" }]
        });

        let request: ConfigureRosterRequest = serde_json::from_value(body).unwrap();

        assert_eq!(request.class_name.as_deref(), Some("8B"));
        let students = request.students.unwrap();
        assert_eq!(students[0], StudentEntry::new("Doe", "Jane", "1"));
        assert_eq!(students[1].id, None);
    }

    #[test]
    fn test_start_request_defaults() {
        let request: StartPollRequest = serde_json::from_value(json!({ "question": "2+2?" })).unwrap();

        assert_eq!(request.question, "2+2?");
        assert!(request.kind.is_none());
        assert!(request.choices.is_empty());
        assert!(request.answer.is_none());
    }

    #[test]
    fn test_status_strings() {
        let reply = StatusReply { status: PollStatus::AlreadyRunning };
        assert_eq!(serde_json::to_value(&reply).unwrap(), json!({ "status": "already running" }));

        for status in [
            PollStatus::ClassSetupComplete,
            PollStatus::PollStarted,
            PollStatus::AlreadyRunning,
            PollStatus::PollStopped,
            PollStatus::NoPollRunning,
        ] {
            assert_eq!(serde_json::to_value(status).unwrap(), json!(status.as_str()));
        }
    }

    #[test]
    fn test_results_use_camel_case() {
        let reply = ResultsReply {
            results: vec![ResultEntry { student_id: "1".to_string(), answer: "B".to_string() }],
        };
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({ "results": [{ "studentId": "1", "answer": "B" }] })
        );
    }
}
