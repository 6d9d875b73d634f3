//! Provider implementations, registry, retry, and circuit breaking.

mod anthropic;
pub mod breaker;
mod gemini;
mod openai;
mod registry;
pub mod retry;
pub mod traits;

pub use anthropic::ClaudeProvider;
pub use breaker::{BreakerConfig, BreakerState, CircuitBreaker};
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use registry::ProviderRegistry;
pub use retry::RetryConfig;
pub use traits::TextProvider;
