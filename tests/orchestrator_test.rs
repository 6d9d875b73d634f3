use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bifrost::{
    Agent, AgentResponse, Bifrost, BifrostError, InteractionLog, InteractionRecord, Intent,
    MemorySink, Message, Orchestrator, ResilientClient, Result, RouteConfig, SessionContext,
    TextProvider,
};

/// Mock provider that replies with scripted responses in order, then
/// repeats the last one.
struct ScriptedProvider {
    responses: Mutex<VecDeque<String>>,
    last: String,
    total_calls: AtomicU32,
}

impl ScriptedProvider {
    fn new(responses: &[&str]) -> Self {
        let mut queue: VecDeque<String> = responses.iter().map(|s| s.to_string()).collect();
        let last = queue.back().cloned().unwrap_or_else(|| "ok".to_string());
        if !queue.is_empty() {
            queue.pop_back();
        }
        Self {
            responses: Mutex::new(queue),
            last,
            total_calls: AtomicU32::new(0),
        }
    }

    fn call_count(&self) -> u32 {
        self.total_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl TextProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn call(
        &self,
        _model: &str,
        _prompt: &str,
        _system: &str,
        _messages: Option<&[Message]>,
    ) -> Result<String> {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
        let mut queue = self.responses.lock().unwrap();
        Ok(queue.pop_front().unwrap_or_else(|| self.last.clone()))
    }
}

/// Mock provider that always fails with a permanent error.
struct BrokenProvider;

#[async_trait]
impl TextProvider for BrokenProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn call(
        &self,
        _model: &str,
        _prompt: &str,
        _system: &str,
        _messages: Option<&[Message]>,
    ) -> Result<String> {
        Err(BifrostError::AuthenticationFailed)
    }
}

fn orchestrator_over(provider: Arc<dyn TextProvider>) -> (Orchestrator, Arc<ResilientClient>) {
    let client = Arc::new(
        Bifrost::builder()
            .provider(provider)
            .build()
            .expect("builder should accept one provider"),
    );
    let orchestrator = Orchestrator::new(
        client.clone(),
        RouteConfig::new("mock", "chat-model"),
        RouteConfig::new("mock", "utility-model"),
    );
    (orchestrator, client)
}

struct CapturingLog {
    entries: Mutex<Vec<InteractionRecord>>,
}

impl CapturingLog {
    fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl InteractionLog for CapturingLog {
    async fn record(&self, entry: InteractionRecord) -> Result<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}

struct CapturingSink {
    facts: Mutex<Vec<String>>,
}

impl CapturingSink {
    fn new() -> Self {
        Self {
            facts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MemorySink for CapturingSink {
    async fn store(&self, facts: Vec<String>) -> Result<()> {
        self.facts.lock().unwrap().extend(facts);
        Ok(())
    }
}

// ============================================================================
// Classification
// ============================================================================

#[tokio::test]
async fn heuristic_classification_needs_no_llm() {
    let provider = Arc::new(ScriptedProvider::new(&[]));
    let (orchestrator, _) = orchestrator_over(provider.clone());
    let ctx = SessionContext::new();

    let cases = [
        ("Please grade my answer", Intent::GradeAnswer),
        ("Can you review my extended essay draft?", Intent::ReviewCoursework),
        ("Find sources on the French Revolution", Intent::ResearchRequest),
        ("Explain photosynthesis", Intent::ExplainConcept),
    ];
    for (message, expected) in cases {
        let intent = orchestrator.classify_intent(message, &ctx).await;
        assert_eq!(intent, expected, "message: {message}");
    }
    // every case above resolved in tier 1
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn question_and_answer_context_forces_grading() {
    let provider = Arc::new(ScriptedProvider::new(&[]));
    let (orchestrator, _) = orchestrator_over(provider.clone());
    let ctx = SessionContext::new()
        .question("What is entropy?")
        .answer("A measure of disorder");

    let intent = orchestrator.classify_intent("here you go", &ctx).await;
    assert_eq!(intent, Intent::GradeAnswer);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn llm_fallback_resolves_ambiguous_message() {
    let provider = Arc::new(ScriptedProvider::new(&["research_request"]));
    let (orchestrator, _) = orchestrator_over(provider.clone());

    let intent = orchestrator
        .classify_intent("hmm, the usual thing please", &SessionContext::new())
        .await;
    assert_eq!(intent, Intent::ResearchRequest);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn llm_fallback_tolerates_padded_label() {
    let provider = Arc::new(ScriptedProvider::new(&["  Solve_Stem \n"]));
    let (orchestrator, _) = orchestrator_over(provider);

    let intent = orchestrator
        .classify_intent("hmm, the usual thing please", &SessionContext::new())
        .await;
    assert_eq!(intent, Intent::SolveStem);
}

#[tokio::test]
async fn unknown_label_defaults_to_general_chat() {
    let provider = Arc::new(ScriptedProvider::new(&["interpretive_dance"]));
    let (orchestrator, _) = orchestrator_over(provider);

    let intent = orchestrator
        .classify_intent("hmm, the usual thing please", &SessionContext::new())
        .await;
    assert_eq!(intent, Intent::GeneralChat);
}

#[tokio::test]
async fn classifier_failure_defaults_to_general_chat() {
    let (orchestrator, _) = orchestrator_over(Arc::new(BrokenProvider));

    let intent = orchestrator
        .classify_intent("hmm, the usual thing please", &SessionContext::new())
        .await;
    assert_eq!(intent, Intent::GeneralChat);
}

// ============================================================================
// Routing
// ============================================================================

#[tokio::test]
async fn route_dispatches_to_the_matching_agent() {
    let provider = Arc::new(ScriptedProvider::new(&["the agent answer"]));
    let (orchestrator, _) = orchestrator_over(provider);
    let ctx = SessionContext::new();

    let cases = [
        (Intent::GradeAnswer, "grading"),
        (Intent::ReviewCoursework, "coursework"),
        (Intent::ResearchRequest, "research"),
        (Intent::SolveStem, "stem"),
        (Intent::ExplainConcept, "tutor"),
        (Intent::GeneralChat, "tutor"),
    ];
    for (intent, expected_agent) in cases {
        let response = orchestrator
            .route(intent, "some message", &ctx, &[])
            .await;
        assert_eq!(response.agent, expected_agent, "intent: {intent}");
        assert!(!response.is_degraded());
        assert_eq!(response.content, "the agent answer");
    }
}

#[tokio::test]
async fn facade_failure_degrades_instead_of_erroring() {
    let (orchestrator, _) = orchestrator_over(Arc::new(BrokenProvider));

    let response = orchestrator
        .route(Intent::SolveStem, "solve x^2 = 4", &SessionContext::new(), &[])
        .await;

    assert!(response.is_degraded());
    assert_eq!(response.agent, "stem");
    assert_eq!(response.confidence, 0.0);
    assert!(response.content.contains("temporarily unavailable"));
}

#[tokio::test]
async fn handle_classifies_and_routes_in_one_step() {
    let provider = Arc::new(ScriptedProvider::new(&["Photosynthesis converts light..."]));
    let (orchestrator, _) = orchestrator_over(provider.clone());

    let response = orchestrator
        .handle("Explain photosynthesis", &SessionContext::new(), &[])
        .await;

    assert_eq!(response.agent, "tutor");
    assert!(response.content.starts_with("Photosynthesis"));
    // heuristic classification + one agent call
    assert_eq!(provider.call_count(), 1);
}

// ============================================================================
// Interaction log
// ============================================================================

#[tokio::test]
async fn routed_calls_are_logged() {
    let provider = Arc::new(ScriptedProvider::new(&["an answer"]));
    let log = Arc::new(CapturingLog::new());
    let client = Arc::new(Bifrost::builder().provider(provider).build().unwrap());
    let orchestrator = Orchestrator::new(
        client,
        RouteConfig::new("mock", "chat-model"),
        RouteConfig::new("mock", "utility-model"),
    )
    .with_log(log.clone());

    orchestrator
        .route(
            Intent::ExplainConcept,
            "Explain osmosis",
            &SessionContext::new(),
            &[],
        )
        .await;

    let entries = log.entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].intent, Intent::ExplainConcept);
    assert_eq!(entries[0].agent, "tutor");
    assert_eq!(entries[0].input_excerpt, "Explain osmosis");
    assert_eq!(entries[0].output_excerpt, "an answer");
}

#[tokio::test]
async fn degraded_responses_are_still_logged() {
    let log = Arc::new(CapturingLog::new());
    let client = Arc::new(
        Bifrost::builder()
            .provider(Arc::new(BrokenProvider))
            .build()
            .unwrap(),
    );
    let orchestrator = Orchestrator::new(
        client,
        RouteConfig::new("mock", "chat-model"),
        RouteConfig::new("mock", "utility-model"),
    )
    .with_log(log.clone());

    orchestrator
        .route(Intent::GradeAnswer, "grade this", &SessionContext::new(), &[])
        .await;

    let entries = log.entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].confidence, 0.0);
}

// ============================================================================
// Memory extraction
// ============================================================================

#[tokio::test]
async fn conversational_intents_feed_the_memory_sink() {
    // first response answers the chat, second is the extraction pass
    let provider = Arc::new(ScriptedProvider::new(&[
        "Nice to meet you!",
        "Student is preparing for IB physics HL\nStudent prefers worked examples",
    ]));
    let sink = Arc::new(CapturingSink::new());
    let client = Arc::new(Bifrost::builder().provider(provider.clone()).build().unwrap());
    let orchestrator = Orchestrator::new(
        client,
        RouteConfig::new("mock", "chat-model"),
        RouteConfig::new("mock", "utility-model"),
    )
    .with_memory(sink.clone());

    let response = orchestrator
        .route(
            Intent::GeneralChat,
            "hi, I'm studying physics HL and like worked examples",
            &SessionContext::new(),
            &[],
        )
        .await;

    assert_eq!(response.content, "Nice to meet you!");
    assert_eq!(provider.call_count(), 2);
    let facts = sink.facts.lock().unwrap();
    assert_eq!(facts.len(), 2);
    assert_eq!(facts[0], "Student is preparing for IB physics HL");
}

#[tokio::test]
async fn none_marker_stores_nothing() {
    let provider = Arc::new(ScriptedProvider::new(&["hello!", "NONE"]));
    let sink = Arc::new(CapturingSink::new());
    let client = Arc::new(Bifrost::builder().provider(provider).build().unwrap());
    let orchestrator = Orchestrator::new(
        client,
        RouteConfig::new("mock", "chat-model"),
        RouteConfig::new("mock", "utility-model"),
    )
    .with_memory(sink.clone());

    orchestrator
        .route(Intent::GeneralChat, "hello", &SessionContext::new(), &[])
        .await;

    assert!(sink.facts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn non_conversational_intents_skip_memory() {
    let provider = Arc::new(ScriptedProvider::new(&["graded: 6/7"]));
    let sink = Arc::new(CapturingSink::new());
    let client = Arc::new(Bifrost::builder().provider(provider.clone()).build().unwrap());
    let orchestrator = Orchestrator::new(
        client,
        RouteConfig::new("mock", "chat-model"),
        RouteConfig::new("mock", "utility-model"),
    )
    .with_memory(sink.clone());

    orchestrator
        .route(Intent::GradeAnswer, "grade this", &SessionContext::new(), &[])
        .await;

    // only the grading call, no extraction pass
    assert_eq!(provider.call_count(), 1);
    assert!(sink.facts.lock().unwrap().is_empty());
}

// ============================================================================
// Degraded response shape
// ============================================================================

#[test]
fn degraded_response_is_marked() {
    let degraded = AgentResponse::degraded("tutor");
    assert!(degraded.is_degraded());
    assert_eq!(degraded.agent, "tutor");
    assert!(degraded.follow_up.is_none());
}

#[test]
fn agent_trait_is_object_safe() {
    fn _takes_dyn(_: &dyn Agent) {}
}
