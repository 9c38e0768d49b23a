use std::sync::Arc;

use crate::campaign::generator::GenerationSettings;
use crate::llm_client::CompletionProvider;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; requests share nothing else.
#[derive(Clone)]
pub struct AppState {
    /// `LlmClient` in production, a fixed-text stub in tests.
    pub provider: Arc<dyn CompletionProvider>,
    pub settings: GenerationSettings,
}
