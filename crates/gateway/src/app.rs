//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{ContextRegistry, FanoutDispatcher};

/// Gateway application state.
///
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub registry: Arc<ContextRegistry>,
    pub dispatcher: FanoutDispatcher,
}

impl App {
    pub fn new(registry: Arc<ContextRegistry>, dispatcher: FanoutDispatcher) -> Self {
        Self {
            registry,
            dispatcher,
        }
    }
}
