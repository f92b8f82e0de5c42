//! Append-only log of the answers received during one poll

use chrono::{DateTime, Utc};
use shared::ResultEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentResponse {
    pub student_id: String,
    /// Question id as reported by the device, kept for diagnostics only
    pub question_id: String,
    pub answer: String,
    /// Arrival position within the current poll, starting at 0
    pub sequence: u64,
    pub received_at: DateTime<Utc>,
}

impl StudentResponse {
    pub fn to_result_entry(&self) -> ResultEntry {
        ResultEntry {
            student_id: self.student_id.clone(),
            answer: self.answer.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ResponseLog {
    entries: Vec<StudentResponse>,
    next_sequence: u64,
}

impl ResponseLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer at the end of the log. Duplicates per student are kept.
    pub fn append(&mut self, student_id: String, question_id: String, answer: String) -> &StudentResponse {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.entries.push(StudentResponse {
            student_id,
            question_id,
            answer,
            sequence,
            received_at: Utc::now(),
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[StudentResponse] {
        &self.entries
    }

    /// Copy of the log in arrival order
    pub fn snapshot(&self) -> Vec<ResultEntry> {
        self.entries.iter().map(StudentResponse::to_result_entry).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_sequence = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
