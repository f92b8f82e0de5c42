//! Classroom roster
//!
//! A roster is built once per `/class/setup` request and is immutable
//! afterwards. Incomplete rows and repeated ids are dropped one entry at a
//! time instead of failing the whole request.

use std::collections::HashSet;

use shared::{ConfigureRosterRequest, Source, StudentEntry, source_debug};

use crate::error::ValidationError;

/// Longest class name the response devices can display
pub const MAX_CLASS_NAME_CHARS: usize = 8;

/// Punctuation accepted in class names besides ASCII letters and digits
pub const CLASS_NAME_PUNCTUATION: &str = " `-=!@#$%&*()_+[];':\",./<?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    last_name: String,
    first_name: String,
    id: String,
}

impl Student {
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// `None` when any of the three fields is missing or empty
    fn from_entry(entry: &StudentEntry) -> Option<Self> {
        let field = |value: &Option<String>| value.as_deref().filter(|v| !v.is_empty()).map(str::to_string);

        Some(Self {
            last_name: field(&entry.last)?,
            first_name: field(&entry.first)?,
            id: field(&entry.id)?,
        })
    }
}

/// Outcome of adding one student, as reported by the device class API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddStudentStatus {
    Added,
    IdInUse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    name: String,
    students: Vec<Student>,
}

impl Roster {
    /// Build a roster from a setup request
    pub fn from_request(request: &ConfigureRosterRequest) -> Result<Self, ValidationError> {
        let name = request
            .class_name
            .as_deref()
            .ok_or_else(|| ValidationError::MissingField("className".to_string()))?;
        let entries = request
            .students
            .as_deref()
            .ok_or_else(|| ValidationError::MissingField("students".to_string()))?;

        let mut builder = RosterBuilder::new(name)?;
        for entry in entries {
            builder.add_entry(entry);
        }

        if builder.skipped_incomplete() > 0 || builder.skipped_duplicate() > 0 {
            source_debug!(
                Source::Session,
                "Roster '{}': skipped {} incomplete and {} duplicate entries",
                name,
                builder.skipped_incomplete(),
                builder.skipped_duplicate()
            );
        }
        builder.build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn contains(&self, student_id: &str) -> bool {
        self.students.iter().any(|s| s.id == student_id)
    }
}

/// Incremental roster construction with per-entry filtering
#[derive(Debug)]
pub struct RosterBuilder {
    name: String,
    students: Vec<Student>,
    ids: HashSet<String>,
    skipped_incomplete: usize,
    skipped_duplicate: usize,
}

impl RosterBuilder {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        validate_class_name(name)?;
        Ok(Self {
            name: name.to_string(),
            students: Vec::new(),
            ids: HashSet::new(),
            skipped_incomplete: 0,
            skipped_duplicate: 0,
        })
    }

    /// Add a raw row; incomplete rows are counted and ignored
    pub fn add_entry(&mut self, entry: &StudentEntry) -> Option<AddStudentStatus> {
        match Student::from_entry(entry) {
            Some(student) => Some(self.add_student(student)),
            None => {
                self.skipped_incomplete += 1;
                None
            }
        }
    }

    pub fn add_student(&mut self, student: Student) -> AddStudentStatus {
        if !self.ids.insert(student.id.clone()) {
            self.skipped_duplicate += 1;
            return AddStudentStatus::IdInUse;
        }
        self.students.push(student);
        AddStudentStatus::Added
    }

    pub fn skipped_incomplete(&self) -> usize {
        self.skipped_incomplete
    }

    pub fn skipped_duplicate(&self) -> usize {
        self.skipped_duplicate
    }

    pub fn build(self) -> Result<Roster, ValidationError> {
        if self.students.is_empty() {
            return Err(ValidationError::EmptyRoster);
        }
        Ok(Roster {
            name: self.name,
            students: self.students,
        })
    }
}

pub fn is_class_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || CLASS_NAME_PUNCTUATION.contains(c)
}

pub fn validate_class_name(name: &str) -> Result<(), ValidationError> {
    let length = name.chars().count();
    if length == 0 || length > MAX_CLASS_NAME_CHARS || !name.chars().all(is_class_name_char) {
        return Err(ValidationError::InvalidRosterName { name: name.to_string() });
    }
    Ok(())
}
