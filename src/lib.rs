//! Bifrost - resilient gateway for LLM APIs
//!
//! This crate provides a provider-agnostic resilient call layer over
//! hosted LLM providers: per-provider circuit breaking, a TTL response
//! cache, bounded exponential-backoff retry, and cost/latency tracking,
//! composed behind a single `resilient_call` façade. On top of it sits
//! an orchestrator that classifies message intent (deterministic rules
//! first, LLM fallback second) and dispatches to specialized agents.
//!
//! # Example
//!
//! ```rust,no_run
//! use bifrost::{Bifrost, CallOptions};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> bifrost::Result<()> {
//!     let gateway = Bifrost::builder()
//!         .gemini("your-api-key")
//!         .build()?;
//!
//!     let opts = CallOptions::new()
//!         .system("You are a concise assistant.")
//!         .cache_ttl(Duration::from_secs(60));
//!
//!     let (text, meta) = gateway
//!         .resilient_call("gemini", "gemini-1.5-flash", "What is 6*7?", &opts)
//!         .await?;
//!
//!     println!("{text} (cost ~${:.6})", meta.cost_estimate_usd);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod cost;
pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod providers;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use error::{BifrostError, Result};
pub use gateway::{Bifrost, BifrostBuilder, CallOptions, ResilientClient};

pub use cache::{CacheBackend, CacheConfig, MemoryCache};
pub use providers::{
    BreakerConfig, BreakerState, CircuitBreaker, ClaudeProvider, GeminiProvider, OpenAiProvider,
    RetryConfig, TextProvider,
};

pub use orchestrator::{
    Agent, AgentResponse, InteractionLog, InteractionRecord, MemorySink, Orchestrator, RouteConfig,
    TracingLog,
};
pub use types::{CallMetadata, Intent, Message, Role, SessionContext};
