//! Provider call primitive.
//!
//! One trait, implemented once per backend. The primitive does no retry,
//! no caching, and no circuit breaking — those are layered on by the
//! façade. Each backend's SDK/wire specifics are isolated behind this
//! boundary.

use async_trait::async_trait;

use crate::Result;
use crate::types::Message;

/// Raw text-completion call against one backend.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Provider name for registry keys, logging, and breaker state.
    fn name(&self) -> &str;

    /// Send a prompt (plus optional system prompt / multi-turn messages)
    /// and return the raw response text.
    ///
    /// When `messages` is present it forms the conversation; a non-empty
    /// `prompt` is appended as the final user turn. Raises on any failure
    /// (network, auth, malformed response).
    async fn call(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
        messages: Option<&[Message]>,
    ) -> Result<String>;
}

/// Flatten prompt + optional history into the turn list providers send.
///
/// Shared by all backends so their transcripts agree: history first,
/// then the prompt as a trailing user turn (skipped when empty).
pub(crate) fn build_turns(prompt: &str, messages: Option<&[Message]>) -> Vec<Message> {
    let mut turns: Vec<Message> = messages.map(|m| m.to_vec()).unwrap_or_default();
    if !prompt.is_empty() {
        turns.push(Message::user(prompt));
    }
    turns
}
