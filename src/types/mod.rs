//! Core types shared across the crate.

mod context;
mod intent;
mod message;
mod metadata;

pub use context::SessionContext;
pub use intent::Intent;
pub use message::{Message, Role};
pub use metadata::CallMetadata;
