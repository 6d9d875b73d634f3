//! Intent classification and request routing.
//!
//! The orchestrator is stateless per call. Classification runs in two
//! tiers: deterministic keyword rules first ([`heuristics`]), then an
//! LLM fallback constrained to the closed [`Intent`] label set. Routing
//! is a fixed dispatch table from intent to one specialized agent.
//! Classification never errors — anything unresolvable is
//! [`Intent::GeneralChat`].

pub mod agents;
mod heuristics;
mod memory;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::gateway::{CallOptions, ResilientClient};
use crate::telemetry;
use crate::types::{Intent, Message, SessionContext};

pub use agents::{Agent, AgentResponse};
pub use memory::MemorySink;

use agents::{CourseworkAgent, GradingAgent, ResearchAgent, StemAgent, TutorAgent};

/// Provider + model pair for one class of call.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    pub provider: String,
    pub model: String,
}

impl RouteConfig {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
        }
    }
}

/// One routed interaction, handed to the [`InteractionLog`].
#[derive(Debug, Clone)]
pub struct InteractionRecord {
    pub intent: Intent,
    pub agent: String,
    pub confidence: f32,
    /// Input truncated to a short excerpt.
    pub input_excerpt: String,
    /// Output truncated to a short excerpt.
    pub output_excerpt: String,
    pub latency_ms: u64,
}

/// Sink for interaction records. Implementations must be best-effort:
/// the orchestrator swallows their errors.
#[async_trait]
pub trait InteractionLog: Send + Sync {
    async fn record(&self, entry: InteractionRecord) -> crate::Result<()>;
}

/// Default log: structured tracing events, cannot fail.
pub struct TracingLog;

#[async_trait]
impl InteractionLog for TracingLog {
    async fn record(&self, entry: InteractionRecord) -> crate::Result<()> {
        info!(
            intent = %entry.intent,
            agent = entry.agent,
            confidence = entry.confidence,
            latency_ms = entry.latency_ms,
            input = entry.input_excerpt,
            output = entry.output_excerpt,
            "routed interaction"
        );
        Ok(())
    }
}

const EXCERPT_LEN: usize = 200;

fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_LEN {
        text.to_string()
    } else {
        let mut s: String = text.chars().take(EXCERPT_LEN).collect();
        s.push('…');
        s
    }
}

/// Classifies intents and dispatches to specialized agents.
///
/// One orchestrator per user request/session; the shared state
/// (breaker, cache) lives in the injected [`ResilientClient`].
pub struct Orchestrator {
    client: Arc<ResilientClient>,
    classifier_route: RouteConfig,
    memory_route: RouteConfig,
    log: Arc<dyn InteractionLog>,
    memory: Option<Arc<dyn MemorySink>>,
    tutor: TutorAgent,
    grading: GradingAgent,
    stem: StemAgent,
    coursework: CourseworkAgent,
    research: ResearchAgent,
}

impl Orchestrator {
    /// Build an orchestrator over the given client. `chat_route` is used
    /// by the agents; `utility_route` (typically a cheaper model) by the
    /// fallback classifier and memory extraction.
    pub fn new(
        client: Arc<ResilientClient>,
        chat_route: RouteConfig,
        utility_route: RouteConfig,
    ) -> Self {
        Self {
            tutor: TutorAgent::new(client.clone(), chat_route.clone()),
            grading: GradingAgent::new(client.clone(), chat_route.clone()),
            stem: StemAgent::new(client.clone(), chat_route.clone()),
            coursework: CourseworkAgent::new(client.clone(), chat_route.clone()),
            research: ResearchAgent::new(client.clone(), chat_route),
            classifier_route: utility_route.clone(),
            memory_route: utility_route,
            log: Arc::new(TracingLog),
            memory: None,
            client,
        }
    }

    /// Replace the interaction log.
    pub fn with_log(mut self, log: Arc<dyn InteractionLog>) -> Self {
        self.log = log;
        self
    }

    /// Attach a memory sink for post-conversation fact extraction.
    pub fn with_memory(mut self, sink: Arc<dyn MemorySink>) -> Self {
        self.memory = Some(sink);
        self
    }

    /// Classify a message. Never errors: heuristics first, then the LLM
    /// fallback, then `GeneralChat`.
    pub async fn classify_intent(&self, message: &str, ctx: &SessionContext) -> Intent {
        if let Some(intent) = heuristics::classify(message, ctx) {
            return intent;
        }
        match self.classify_with_llm(message).await {
            Some(intent) => intent,
            None => Intent::GeneralChat,
        }
    }

    /// Stage 2: ask a cheap model for exactly one label from the closed
    /// set. Any failure or unrecognized label resolves to `None`.
    async fn classify_with_llm(&self, message: &str) -> Option<Intent> {
        let system = format!(
            "Classify the student message into exactly one of these labels: \
             {}. Reply with the label only.",
            Intent::labels().join(", ")
        );
        let opts = CallOptions::new().system(system);
        let result = self
            .client
            .resilient_call(
                &self.classifier_route.provider,
                &self.classifier_route.model,
                message,
                &opts,
            )
            .await;
        match result {
            Ok((label, _)) => {
                let intent = Intent::from_label(label.trim().to_lowercase().as_str());
                if intent.is_none() {
                    debug!(label = label.trim(), "classifier returned unknown label");
                }
                intent
            }
            Err(e) => {
                debug!(error = %e, "llm intent classification failed");
                None
            }
        }
    }

    /// Dispatch a classified message to its agent.
    ///
    /// On any façade failure the agent degrades to a typed unavailable
    /// response — a raw error never reaches the caller. The routed call
    /// is logged best-effort, and conversational intents trigger a
    /// best-effort memory-extraction pass before returning.
    pub async fn route(
        &self,
        intent: Intent,
        message: &str,
        ctx: &SessionContext,
        history: &[Message],
    ) -> AgentResponse {
        let start = Instant::now();
        let agent: &dyn Agent = match intent {
            Intent::GradeAnswer => &self.grading,
            Intent::ReviewCoursework => &self.coursework,
            Intent::ResearchRequest => &self.research,
            Intent::SolveStem => &self.stem,
            Intent::ExplainConcept | Intent::GeneralChat => &self.tutor,
        };

        let response = match agent.respond(message, ctx, history).await {
            Ok(response) => response,
            Err(e) => {
                debug!(agent = agent.name(), error = %e, "agent degraded");
                AgentResponse::degraded(agent.name())
            }
        };

        metrics::counter!(telemetry::ROUTED_TOTAL, "intent" => intent.as_str()).increment(1);

        let record = InteractionRecord {
            intent,
            agent: response.agent.clone(),
            confidence: response.confidence,
            input_excerpt: excerpt(message),
            output_excerpt: excerpt(&response.content),
            latency_ms: start.elapsed().as_millis() as u64,
        };
        if let Err(e) = self.log.record(record).await {
            debug!(error = %e, "interaction log failed");
        }

        if matches!(intent, Intent::GeneralChat | Intent::ExplainConcept) {
            self.extract_memory(message, &response, history).await;
        }

        response
    }

    /// Classify then route in one step.
    pub async fn handle(
        &self,
        message: &str,
        ctx: &SessionContext,
        history: &[Message],
    ) -> AgentResponse {
        let intent = self.classify_intent(message, ctx).await;
        self.route(intent, message, ctx, history).await
    }

    /// Best-effort memory extraction over the accumulated conversation.
    /// Runs within the call, before returning; every failure is swallowed.
    async fn extract_memory(&self, message: &str, response: &AgentResponse, history: &[Message]) {
        let Some(sink) = &self.memory else {
            return;
        };
        let mut full = history.to_vec();
        full.push(Message::user(message));
        full.push(Message::assistant(response.content.clone()));

        match memory::extract_facts(&self.client, &self.memory_route, &full).await {
            Ok(facts) if !facts.is_empty() => {
                if let Err(e) = sink.store(facts).await {
                    debug!(error = %e, "memory sink failed");
                }
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "memory extraction failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_truncates_long_text() {
        let long = "x".repeat(500);
        let e = excerpt(&long);
        assert_eq!(e.chars().count(), EXCERPT_LEN + 1);
        assert!(e.ends_with('…'));
    }

    #[test]
    fn excerpt_keeps_short_text() {
        assert_eq!(excerpt("hello"), "hello");
    }
}
