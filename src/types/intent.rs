//! Intent classification labels.

use serde::{Deserialize, Serialize};

/// Closed set of recognized request categories.
///
/// Determined per incoming message by the orchestrator and used for one
/// dispatch decision; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Evaluate a student answer against a question.
    GradeAnswer,
    /// Review a draft essay or internal-assessment document.
    ReviewCoursework,
    /// Research a topic with sources.
    ResearchRequest,
    /// Step-by-step solving of a math/science/computation problem.
    SolveStem,
    /// Explain a concept or definition.
    ExplainConcept,
    /// Anything else — open conversation.
    GeneralChat,
}

impl Intent {
    /// Stable wire label, also used for logging and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::GradeAnswer => "grade_answer",
            Intent::ReviewCoursework => "review_coursework",
            Intent::ResearchRequest => "research_request",
            Intent::SolveStem => "solve_stem",
            Intent::ExplainConcept => "explain_concept",
            Intent::GeneralChat => "general_chat",
        }
    }

    /// Parse a label back into an intent. Unknown labels return `None`
    /// (the orchestrator maps those to `GeneralChat`).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "grade_answer" => Some(Intent::GradeAnswer),
            "review_coursework" => Some(Intent::ReviewCoursework),
            "research_request" => Some(Intent::ResearchRequest),
            "solve_stem" => Some(Intent::SolveStem),
            "explain_concept" => Some(Intent::ExplainConcept),
            "general_chat" => Some(Intent::GeneralChat),
            _ => None,
        }
    }

    /// All labels, in the order presented to the LLM fallback classifier.
    pub fn labels() -> &'static [&'static str] {
        &[
            "grade_answer",
            "review_coursework",
            "research_request",
            "solve_stem",
            "explain_concept",
            "general_chat",
        ]
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
