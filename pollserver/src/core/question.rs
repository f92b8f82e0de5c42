//! Pollable question definition

use std::fmt;
use std::str::FromStr;

use shared::{QuestionSummary, StartPollRequest};
use uuid::Uuid;

use crate::error::ValidationError;

pub const MIN_CHOICES: usize = 2;
pub const MAX_CHOICES: usize = 10;

/// Type used when a start request names none
pub const DEFAULT_QUESTION_TYPE: QuestionType = QuestionType::MultipleChoice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionType {
    MultipleChoice,
    MultipleAnswer,
    YesNo,
    TrueFalse,
    Decimal,
    Fractional,
    ShortText,
}

impl QuestionType {
    pub const ALL: [QuestionType; 7] = [
        QuestionType::MultipleChoice,
        QuestionType::MultipleAnswer,
        QuestionType::YesNo,
        QuestionType::TrueFalse,
        QuestionType::Decimal,
        QuestionType::Fractional,
        QuestionType::ShortText,
    ];

    /// Wire name used in start requests
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiplechoice",
            QuestionType::MultipleAnswer => "multipleanswer",
            QuestionType::YesNo => "yesno",
            QuestionType::TrueFalse => "truefalse",
            QuestionType::Decimal => "decimal",
            QuestionType::Fractional => "fractional",
            QuestionType::ShortText => "shorttext",
        }
    }

    /// Choice texts the device supplies itself
    pub fn fixed_choices(&self) -> Option<[&'static str; 2]> {
        match self {
            QuestionType::YesNo => Some(["Yes", "No"]),
            QuestionType::TrueFalse => Some(["True", "False"]),
            _ => None,
        }
    }

    /// Whether the caller must supply the choice texts
    pub fn takes_choices(&self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::MultipleAnswer)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuestionType::MultipleChoice => "Multiple choice",
            QuestionType::MultipleAnswer => "Multiple answer",
            QuestionType::YesNo => "Yes/No",
            QuestionType::TrueFalse => "True/False",
            QuestionType::Decimal => "Decimal",
            QuestionType::Fractional => "Fractional",
            QuestionType::ShortText => "Short text",
        };
        write!(f, "{label}")
    }
}

impl FromStr for QuestionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        QuestionType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| ValidationError::UnknownQuestionType { raw: s.to_string() })
    }
}

/// Letter shown on the device for the choice at `index` (`A` .. `J`)
pub fn choice_label(index: usize) -> Option<char> {
    if index < MAX_CHOICES {
        Some((b'A' + index as u8) as char)
    } else {
        None
    }
}

/// A validated question, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSpec {
    id: Uuid,
    kind: QuestionType,
    text: String,
    choices: Vec<String>,
    correct_answer: Option<String>,
}

impl QuestionSpec {
    /// Validate a start request. Checks run in order: type, choices, text.
    pub fn from_request(request: &StartPollRequest) -> Result<Self, ValidationError> {
        let kind = match request.kind.as_deref() {
            Some(raw) => raw.parse::<QuestionType>()?,
            None => DEFAULT_QUESTION_TYPE,
        };

        let choices = if kind.takes_choices() {
            let count = request.choices.len();
            if !(MIN_CHOICES..=MAX_CHOICES).contains(&count) {
                return Err(ValidationError::InvalidChoiceCount { kind: kind.to_string(), count });
            }
            request.choices.clone()
        } else if let Some(fixed) = kind.fixed_choices() {
            fixed.iter().map(|c| c.to_string()).collect()
        } else {
            Vec::new()
        };

        if request.question.is_empty() {
            return Err(ValidationError::EmptyQuestionText);
        }

        // Answer format is the caller's contract; stored verbatim
        let correct_answer = request.answer.clone().filter(|a| !a.is_empty());

        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            text: request.question.clone(),
            choices,
            correct_answer,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> QuestionType {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn correct_answer(&self) -> Option<&str> {
        self.correct_answer.as_deref()
    }

    /// Choices paired with their device labels
    pub fn labelled_choices(&self) -> impl Iterator<Item = (char, &str)> + '_ {
        self.choices
            .iter()
            .enumerate()
            .filter_map(|(i, text)| choice_label(i).map(|label| (label, text.as_str())))
    }

    pub fn summary(&self) -> QuestionSummary {
        QuestionSummary {
            id: self.id.to_string(),
            kind: self.kind.as_str().to_string(),
            text: self.text.clone(),
            choice_count: self.choices.len(),
        }
    }
}
