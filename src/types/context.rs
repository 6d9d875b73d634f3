//! Per-request session context.

use serde::{Deserialize, Serialize};

/// Subjects treated as STEM for classification gating.
const STEM_SUBJECTS: &[&str] = &[
    "math",
    "mathematics",
    "maths",
    "physics",
    "chemistry",
    "biology",
    "computer science",
    "economics",
];

/// Context the web layer attaches to an incoming message.
///
/// All fields are optional; the classifier only inspects what is present.
/// When both `question` and `answer` are set the message is graded
/// regardless of its text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionContext {
    /// Question the student is currently working on, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    /// Student's submitted answer to `question`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// Subject of the session (e.g. "physics", "history").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Course level (e.g. "HL", "SL"), passed through to agent prompts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_level: Option<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the active question.
    pub fn question(mut self, q: impl Into<String>) -> Self {
        self.question = Some(q.into());
        self
    }

    /// Set the submitted answer.
    pub fn answer(mut self, a: impl Into<String>) -> Self {
        self.answer = Some(a.into());
        self
    }

    /// Set the session subject.
    pub fn subject(mut self, s: impl Into<String>) -> Self {
        self.subject = Some(s.into());
        self
    }

    /// Set the course level.
    pub fn student_level(mut self, l: impl Into<String>) -> Self {
        self.student_level = Some(l.into());
        self
    }

    /// Whether the session subject is a STEM subject.
    ///
    /// Matched case-insensitively by substring, so "Mathematics AA HL"
    /// counts as math.
    pub fn is_stem_subject(&self) -> bool {
        let Some(subject) = &self.subject else {
            return false;
        };
        let subject = subject.to_lowercase();
        STEM_SUBJECTS.iter().any(|s| subject.contains(s))
    }

    /// Whether a question is present without a submitted answer.
    pub fn has_open_question(&self) -> bool {
        self.question.is_some() && self.answer.is_none()
    }
}
