//! crates/tutor_core/src/validation.rs
//!
//! Field-level input validation. Every operation input implements [`Validate`];
//! the action layer runs the same rules on raw payloads before building those
//! inputs, so a bad request never reaches the provider.

use crate::domain::{
    EmotionInput, ImagineInput, QaInput, SpeechToTextInput, SummarizeInput, TextToSpeechInput,
    TranslateInput, GRADE_MAX, GRADE_MIN,
};
use crate::media::DataUri;

/// The first constraint a request violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Required field '{field}' is missing.")]
    Missing { field: &'static str },
    #[error("{message}")]
    Empty {
        field: &'static str,
        message: &'static str,
    },
    #[error("Field '{field}' must be {max} characters or less.")]
    TooLong { field: &'static str, max: usize },
    #[error("Field '{field}' must be between {min} and {max}, got {value}.")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
    #[error("Field '{field}' is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Missing { field }
            | ValidationError::Empty { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::Invalid { field, .. } => field,
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Implemented by every operation input.
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

//=========================================================================================
// Field Rules
//=========================================================================================

/// Length bounds for a string field, counted in characters.
#[derive(Debug, Clone, Copy)]
pub struct TextRule {
    pub field: &'static str,
    pub empty_message: &'static str,
    pub max_chars: usize,
}

impl TextRule {
    pub const fn new(field: &'static str, empty_message: &'static str, max_chars: usize) -> Self {
        Self {
            field,
            empty_message,
            max_chars,
        }
    }

    /// Checks a required value: non-empty and within the maximum length.
    pub fn check(&self, value: &str) -> ValidationResult<()> {
        if value.is_empty() {
            return Err(ValidationError::Empty {
                field: self.field,
                message: self.empty_message,
            });
        }
        self.check_length(value)
    }

    /// Checks only the upper bound; used for optional fields.
    pub fn check_length(&self, value: &str) -> ValidationResult<()> {
        if value.chars().count() > self.max_chars {
            return Err(ValidationError::TooLong {
                field: self.field,
                max: self.max_chars,
            });
        }
        Ok(())
    }
}

pub const QUESTION: TextRule = TextRule::new("question", "Question cannot be empty.", 2_000);
pub const EMOTIONAL_TONE: TextRule =
    TextRule::new("emotionalTone", "Emotional tone cannot be empty.", 2_000);
pub const QUERY: TextRule = TextRule::new("query", "Query cannot be empty.", 2_000);
pub const EMOTION: TextRule = TextRule::new("emotion", "Emotion cannot be empty.", 200);
pub const TEXTBOOK_CONTENT: TextRule =
    TextRule::new("textbookContent", "Content cannot be empty.", 20_000);
pub const STUDENT_QUERY: TextRule =
    TextRule::new("studentQuery", "Student query cannot be empty.", 2_000);
pub const TEXTBOOK_DESCRIPTION: TextRule =
    TextRule::new("textbookDescription", "Description cannot be empty.", 2_000);
pub const SPEECH_TEXT: TextRule = TextRule::new("text", "Text cannot be empty.", 5_000);
pub const TRANSLATE_TEXT: TextRule = TextRule::new("text", "Text cannot be empty.", 3_000);

/// Unwraps a required field or reports it missing.
pub fn require<T>(field: &'static str, value: Option<T>) -> ValidationResult<T> {
    value.ok_or(ValidationError::Missing { field })
}

/// Checks a grade against the inclusive `GRADE_MIN..=GRADE_MAX` range.
pub fn check_grade(field: &'static str, value: i64) -> ValidationResult<u8> {
    if !(i64::from(GRADE_MIN)..=i64::from(GRADE_MAX)).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field,
            min: i64::from(GRADE_MIN),
            max: i64::from(GRADE_MAX),
            value,
        });
    }
    Ok(value as u8)
}

/// Checks that a string is a `data:<mime>;base64,<payload>` URI.
pub fn check_data_uri(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::Empty {
            field,
            message: "Audio data cannot be empty.",
        });
    }
    DataUri::parse(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::Invalid {
            field,
            reason: "expected 'data:<mimetype>;base64,<encoded_data>'".to_string(),
        })
}

/// Treats an optional string that is present but blank as absent.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

//=========================================================================================
// Input Validation
//=========================================================================================

impl Validate for QaInput {
    fn validate(&self) -> ValidationResult<()> {
        QUESTION.check(&self.question)?;
        check_grade("grade", i64::from(self.grade))?;
        if let Some(tone) = &self.emotional_tone {
            EMOTIONAL_TONE.check_length(tone)?;
        }
        Ok(())
    }
}

impl Validate for EmotionInput {
    fn validate(&self) -> ValidationResult<()> {
        QUERY.check(&self.query)?;
        EMOTION.check(&self.emotion)?;
        check_grade("gradeLevel", i64::from(self.grade_level))?;
        Ok(())
    }
}

impl Validate for SummarizeInput {
    fn validate(&self) -> ValidationResult<()> {
        TEXTBOOK_CONTENT.check(&self.textbook_content)?;
        check_grade("gradeLevel", i64::from(self.grade_level))?;
        if let Some(query) = &self.student_query {
            STUDENT_QUERY.check_length(query)?;
        }
        Ok(())
    }
}

impl Validate for ImagineInput {
    fn validate(&self) -> ValidationResult<()> {
        TEXTBOOK_DESCRIPTION.check(&self.textbook_description)
    }
}

impl Validate for SpeechToTextInput {
    fn validate(&self) -> ValidationResult<()> {
        check_data_uri("audioDataUri", &self.audio_data_uri)
    }
}

impl Validate for TextToSpeechInput {
    fn validate(&self) -> ValidationResult<()> {
        SPEECH_TEXT.check(&self.text)
    }
}

impl Validate for TranslateInput {
    fn validate(&self) -> ValidationResult<()> {
        // The target language is already constrained by its type.
        TRANSLATE_TEXT.check(&self.text)
    }
}
