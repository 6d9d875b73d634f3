//! Gateway construction and the resilient call façade.

mod builder;
mod client;

pub use builder::{Bifrost, BifrostBuilder};
pub use client::{CallOptions, ResilientClient};
