//! Shared application state

use std::sync::Arc;

use crate::collector::Collector;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Immutable collector; each request runs its own collection
    pub collector: Arc<Collector>,
}

impl AppState {
    pub fn new(collector: Arc<Collector>) -> Self {
        Self { collector }
    }
}
