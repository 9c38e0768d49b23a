//! Campaign Generation — orchestrates one request end to end.
//!
//! Flow: build prompt → one completion call → normalize → CampaignResponse.
//! There is no retry loop: a provider failure or an unusable completion is
//! returned to the caller as-is.

use std::time::Instant;

use tracing::{debug, info};

use crate::campaign::models::CampaignRequest;
use crate::campaign::normalizer::normalize;
use crate::campaign::prompts::{build_user_prompt, system_prompt};
use crate::campaign::schema::{CampaignResponse, SchemaVariant};
use crate::errors::AppError;
use crate::llm_client::{CompletionProvider, CompletionRequest};

/// Per-process generation settings, fixed at startup.
#[derive(Debug, Clone, Copy)]
pub struct GenerationSettings {
    pub variant: SchemaVariant,
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            variant: SchemaVariant::default(),
            temperature: 0.8,
        }
    }
}

/// Builds the completion request for a campaign.
pub fn build_completion_request(
    settings: &GenerationSettings,
    request: &CampaignRequest,
) -> CompletionRequest {
    CompletionRequest {
        system: system_prompt(settings.variant).to_string(),
        prompt: build_user_prompt(settings.variant, request),
        temperature: settings.temperature,
    }
}

/// Runs the generation pipeline for one validated request.
pub async fn generate_campaign(
    provider: &dyn CompletionProvider,
    settings: &GenerationSettings,
    request: &CampaignRequest,
) -> Result<CampaignResponse, AppError> {
    info!(
        "Generating campaign for '{}' on {} (schema: {})",
        request.product_name, request.platform, settings.variant
    );

    let completion = build_completion_request(settings, request);

    let started = Instant::now();
    let raw = provider
        .complete(&completion)
        .await
        .map_err(|e| AppError::CollaboratorUnavailable(e.to_string()))?;
    debug!(
        "Completion received in {}ms ({} chars)",
        started.elapsed().as_millis(),
        raw.len()
    );

    let response = normalize(&raw, request, settings.variant)?;

    info!(
        "Campaign for '{}' generated: risk_level={:?}",
        request.product_name, response.compliance.risk_level
    );
    Ok(response)
}
