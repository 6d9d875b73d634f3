//! Name-keyed provider registry.
//!
//! The façade resolves the caller's provider string here. Which providers
//! are registered is decided once at build time by credential presence
//! (see [`BifrostBuilder`](crate::BifrostBuilder)) — an absent credential
//! simply means that provider is unavailable, not a runtime error path.

use std::collections::HashMap;
use std::sync::Arc;

use super::traits::TextProvider;
use crate::{BifrostError, Result};

/// Registry of providers keyed by name.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn TextProvider>>,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own name. Replaces any previous
    /// provider with the same name.
    pub fn register(&mut self, provider: Arc<dyn TextProvider>) {
        self.providers
            .insert(provider.name().to_string(), provider);
    }

    /// Resolve a provider by name.
    ///
    /// `NoProvider` when the registry is empty, `UnknownProvider` when
    /// the name isn't registered.
    pub fn get(&self, name: &str) -> Result<Arc<dyn TextProvider>> {
        if self.providers.is_empty() {
            return Err(BifrostError::NoProvider);
        }
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| BifrostError::UnknownProvider(name.to_string()))
    }

    /// Names of all registered providers (order unspecified).
    pub fn names(&self) -> Vec<&str> {
        self.providers.keys().map(|s| s.as_str()).collect()
    }

    /// Whether any provider is registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
