//! Request bodies used across the integration tests

use serde_json::{Value, json};

/// The class from the reference walkthrough: one student, id "1"
pub fn single_student_class() -> Value {
    json!({
        "className": "8B",
        "students": [{ "last": "Doe", "first": "Jane", "id": "1" }]
    })
}

/// A class of `count` students with ids "1".."count"
pub fn class_of(count: usize) -> Value {
    let students: Vec<Value> = (1..=count)
        .map(|i| json!({ "last": format!("Last{i}"), "first": format!("First{i}"), "id": i.to_string() }))
        .collect();
    json!({ "className": "Per 3", "students": students })
}

pub fn multiple_choice_question() -> Value {
    json!({
        "question": "2+2?",
        "type": "multiplechoice",
        "choices": ["3", "4", "5"],
        "answer": "B"
    })
}

pub fn yes_no_question() -> Value {
    json!({ "question": "Ready?", "type": "yesno" })
}
