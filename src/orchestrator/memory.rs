//! Best-effort conversation memory extraction.
//!
//! After conversational intents the orchestrator extracts durable facts
//! about the student (goals, weak topics, preferences) from the
//! accumulated history and hands them to an injected sink. The whole
//! path is best-effort: any failure is logged at debug level and
//! swallowed — it must never affect the user-visible response.

use async_trait::async_trait;

use crate::gateway::{CallOptions, ResilientClient};
use crate::types::Message;
use crate::Result;

use super::RouteConfig;

/// Where extracted facts go (e.g. a per-student profile store).
#[async_trait]
pub trait MemorySink: Send + Sync {
    async fn store(&self, facts: Vec<String>) -> Result<()>;
}

const EXTRACTION_SYSTEM: &str = "Extract durable facts about the student from \
the conversation: goals, misconceptions, weak topics, preferences. Return one \
fact per line, no numbering. Return NONE if there is nothing durable.";

/// Run one extraction pass over the history.
///
/// Returns the extracted facts; the caller decides what to do on error.
pub(crate) async fn extract_facts(
    client: &ResilientClient,
    route: &RouteConfig,
    history: &[Message],
) -> Result<Vec<String>> {
    let transcript: String = history
        .iter()
        .map(|m| format!("{:?}: {}\n", m.role, m.content))
        .collect();

    let opts = CallOptions::new().system(EXTRACTION_SYSTEM);
    let (text, _) = client
        .resilient_call(&route.provider, &route.model, &transcript, &opts)
        .await?;

    if text.trim() == "NONE" {
        return Ok(Vec::new());
    }
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}
