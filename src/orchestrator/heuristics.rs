//! Rule-based intent classification (stage 1).
//!
//! Pure and deterministic — the cheapest checks run first so the LLM
//! fallback (stage 2, in the orchestrator) is only consulted when no
//! rule matches. First match wins; tiers are checked in a fixed
//! priority order.

use crate::types::{Intent, SessionContext};

const GRADING_PHRASES: &[&str] = &[
    "grade my",
    "grade this",
    "grade the",
    "mark my",
    "mark this",
    "check my answer",
    "is my answer",
    "how many marks",
    "score my",
];

const COURSEWORK_PHRASES: &[&str] = &[
    "internal assessment",
    "extended essay",
    "my ia",
    "my ee",
    "review my essay",
    "review my draft",
    "feedback on my essay",
    "feedback on my draft",
    "coursework",
];

const RESEARCH_PHRASES: &[&str] = &[
    "research",
    "find sources",
    "sources on",
    "sources for",
    "literature on",
    "look up",
];

/// Only applied when the session subject is a STEM subject.
const STEM_PHRASES: &[&str] = &[
    "solve",
    "calculate",
    "compute",
    "work out",
    "evaluate",
    "simplify",
    "integrate",
    "differentiate",
    "equation",
    "derivative",
    "integral",
];

const EXPLAIN_PHRASES: &[&str] = &[
    "explain",
    "what is",
    "what are",
    "what does",
    "how does",
    "how do",
    "why does",
    "why is",
    "define",
    "tell me about",
];

fn matches_any(message: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| message.contains(p))
}

/// Classify a message by rules alone. `None` means no rule matched and
/// the orchestrator should fall back to the LLM classifier.
///
/// Priority order: explicit grading context → grading phrases →
/// coursework review → research requests → STEM phrases (gated on the
/// subject) → an unanswered question in context (the message is treated
/// as the answer) → explain phrasing.
pub fn classify(message: &str, ctx: &SessionContext) -> Option<Intent> {
    // A supplied question + answer pair is graded regardless of text.
    if ctx.question.is_some() && ctx.answer.is_some() {
        return Some(Intent::GradeAnswer);
    }

    let message = message.to_lowercase();

    if matches_any(&message, GRADING_PHRASES) {
        return Some(Intent::GradeAnswer);
    }
    if matches_any(&message, COURSEWORK_PHRASES) {
        return Some(Intent::ReviewCoursework);
    }
    if matches_any(&message, RESEARCH_PHRASES) {
        return Some(Intent::ResearchRequest);
    }
    if ctx.is_stem_subject() && matches_any(&message, STEM_PHRASES) {
        return Some(Intent::SolveStem);
    }
    if ctx.has_open_question() {
        return Some(Intent::GradeAnswer);
    }
    if matches_any(&message, EXPLAIN_PHRASES) {
        return Some(Intent::ExplainConcept);
    }

    None
}
