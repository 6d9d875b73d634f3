//! Specialized agents — thin consumers of the resilient call façade.
//!
//! Each agent pairs a domain system prompt with one façade call. Agents
//! return `Result`; the orchestrator converts failures into the typed
//! degraded response, so "feature unavailable" is a testable outcome
//! rather than a swallowed exception. No agent ever panics on a façade
//! error.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::gateway::{CallOptions, ResilientClient};
use crate::types::{Message, SessionContext};
use crate::Result;

use super::RouteConfig;

/// Response returned by every routed call.
#[derive(Debug, Clone)]
pub struct AgentResponse {
    pub content: String,
    /// Name of the responding agent.
    pub agent: String,
    pub confidence: f32,
    /// Optional suggested follow-up question for the student.
    pub follow_up: Option<String>,
    /// Free-form metadata (call metadata, degradation flag).
    pub metadata: serde_json::Value,
}

impl AgentResponse {
    /// The degraded response used when the façade fails (circuit open,
    /// retries exhausted). Clear, non-crashing, never a raw error.
    pub fn degraded(agent: &str) -> Self {
        Self {
            content: "This feature is temporarily unavailable. Please try again in a moment."
                .to_string(),
            agent: agent.to_string(),
            confidence: 0.0,
            follow_up: None,
            metadata: json!({ "degraded": true }),
        }
    }

    /// Whether this is the degraded fallback.
    pub fn is_degraded(&self) -> bool {
        self.metadata
            .get("degraded")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

/// A specialized agent the orchestrator can dispatch to.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Agent name for logging and the response envelope.
    fn name(&self) -> &str;

    async fn respond(
        &self,
        message: &str,
        ctx: &SessionContext,
        history: &[Message],
    ) -> Result<AgentResponse>;
}

/// Shared plumbing: one façade call, response wrapped in the envelope.
async fn facade_call(
    client: &ResilientClient,
    route: &RouteConfig,
    agent: &str,
    confidence: f32,
    prompt: &str,
    opts: CallOptions,
) -> Result<AgentResponse> {
    let (content, meta) = client
        .resilient_call(&route.provider, &route.model, prompt, &opts)
        .await?;
    Ok(AgentResponse {
        content,
        agent: agent.to_string(),
        confidence,
        follow_up: None,
        metadata: json!({
            "cache_hit": meta.cache_hit,
            "cost_estimate_usd": meta.cost_estimate_usd,
            "latency_ms": meta.latency_ms,
        }),
    })
}

fn level_line(ctx: &SessionContext) -> String {
    match (&ctx.subject, &ctx.student_level) {
        (Some(s), Some(l)) => format!("Subject: {s} ({l}).\n"),
        (Some(s), None) => format!("Subject: {s}.\n"),
        _ => String::new(),
    }
}

// ============================================================================
// TutorAgent — explanations and general chat
// ============================================================================

pub struct TutorAgent {
    client: Arc<ResilientClient>,
    route: RouteConfig,
}

impl TutorAgent {
    pub fn new(client: Arc<ResilientClient>, route: RouteConfig) -> Self {
        Self { client, route }
    }
}

#[async_trait]
impl Agent for TutorAgent {
    fn name(&self) -> &str {
        "tutor"
    }

    async fn respond(
        &self,
        message: &str,
        ctx: &SessionContext,
        history: &[Message],
    ) -> Result<AgentResponse> {
        let system = format!(
            "You are a patient IB Diploma tutor. {}Explain clearly at the \
             student's level, using short worked examples where they help.",
            level_line(ctx)
        );
        // Concept explanations repeat across students; cache briefly.
        let opts = CallOptions::new()
            .system(system)
            .messages(history.to_vec())
            .cache_ttl(Duration::from_secs(300));
        facade_call(&self.client, &self.route, self.name(), 0.8, message, opts).await
    }
}

// ============================================================================
// GradingAgent — answer evaluation
// ============================================================================

pub struct GradingAgent {
    client: Arc<ResilientClient>,
    route: RouteConfig,
}

impl GradingAgent {
    pub fn new(client: Arc<ResilientClient>, route: RouteConfig) -> Self {
        Self { client, route }
    }
}

#[async_trait]
impl Agent for GradingAgent {
    fn name(&self) -> &str {
        "grading"
    }

    async fn respond(
        &self,
        message: &str,
        ctx: &SessionContext,
        _history: &[Message],
    ) -> Result<AgentResponse> {
        let question = ctx.question.as_deref().unwrap_or("");
        let answer = ctx.answer.as_deref().unwrap_or(message);
        let prompt = format!(
            "Question:\n{question}\n\nStudent answer:\n{answer}\n\n\
             Grade the answer against IB criteria: give a mark, what was \
             done well, and what is missing."
        );
        let system = format!(
            "You are an experienced IB examiner. {}Be precise and cite the \
             marking criteria you apply.",
            level_line(ctx)
        );
        // Grading is per-student work; never cached.
        let opts = CallOptions::new().system(system);
        facade_call(&self.client, &self.route, self.name(), 0.9, &prompt, opts).await
    }
}

// ============================================================================
// StemAgent — step-by-step solving
// ============================================================================

pub struct StemAgent {
    client: Arc<ResilientClient>,
    route: RouteConfig,
}

impl StemAgent {
    pub fn new(client: Arc<ResilientClient>, route: RouteConfig) -> Self {
        Self { client, route }
    }
}

#[async_trait]
impl Agent for StemAgent {
    fn name(&self) -> &str {
        "stem"
    }

    async fn respond(
        &self,
        message: &str,
        ctx: &SessionContext,
        _history: &[Message],
    ) -> Result<AgentResponse> {
        let system = format!(
            "You are a STEM problem-solving assistant for IB students. \
             {}Show every step, state formulas before using them, and \
             check the final result.",
            level_line(ctx)
        );
        let opts = CallOptions::new()
            .system(system)
            .cache_ttl(Duration::from_secs(600));
        facade_call(&self.client, &self.route, self.name(), 0.85, message, opts).await
    }
}

// ============================================================================
// CourseworkAgent — essay / IA review
// ============================================================================

pub struct CourseworkAgent {
    client: Arc<ResilientClient>,
    route: RouteConfig,
}

impl CourseworkAgent {
    pub fn new(client: Arc<ResilientClient>, route: RouteConfig) -> Self {
        Self { client, route }
    }
}

#[async_trait]
impl Agent for CourseworkAgent {
    fn name(&self) -> &str {
        "coursework"
    }

    async fn respond(
        &self,
        message: &str,
        ctx: &SessionContext,
        _history: &[Message],
    ) -> Result<AgentResponse> {
        let system = format!(
            "You review IB coursework drafts (internal assessments, extended \
             essays). {}Structure feedback as: strengths, weaknesses against \
             the assessment criteria, concrete next revisions.",
            level_line(ctx)
        );
        let opts = CallOptions::new().system(system);
        facade_call(&self.client, &self.route, self.name(), 0.85, message, opts).await
    }
}

// ============================================================================
// ResearchAgent — sourced topic research
// ============================================================================

pub struct ResearchAgent {
    client: Arc<ResilientClient>,
    route: RouteConfig,
}

impl ResearchAgent {
    pub fn new(client: Arc<ResilientClient>, route: RouteConfig) -> Self {
        Self { client, route }
    }
}

#[async_trait]
impl Agent for ResearchAgent {
    fn name(&self) -> &str {
        "research"
    }

    async fn respond(
        &self,
        message: &str,
        ctx: &SessionContext,
        _history: &[Message],
    ) -> Result<AgentResponse> {
        let system = format!(
            "You help IB students research topics. {}Summarise the state of \
             knowledge and suggest the kinds of sources to consult; never \
             fabricate citations.",
            level_line(ctx)
        );
        let opts = CallOptions::new()
            .system(system)
            .cache_ttl(Duration::from_secs(3600));
        facade_call(&self.client, &self.route, self.name(), 0.75, message, opts).await
    }
}
