use std::sync::Arc;

use crate::llm_client::StructuredModel;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Document store. PostgreSQL in production, in-memory when no DATABASE_URL is set.
    pub store: Arc<dyn DocumentStore>,
    /// Structured-generation model. Default: the Gemini `LlmClient`.
    pub model: Arc<dyn StructuredModel>,
}
