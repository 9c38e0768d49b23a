//! Response schema for generated campaign assets.
//!
//! Two variants exist. `Basic` carries the analytical text fields only;
//! `Extended` additionally requires numeric scores with short explanations.
//! Score fields are `Option` here and made mandatory by the normalizer when
//! the configured variant is `Extended`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Number;

/// Number of ad variations every response must carry.
pub const VARIATION_COUNT: usize = 3;

/// Upper bound for `audience_match_score` and `risk_score`.
pub const MAX_PERCENT_SCORE: u8 = 100;

/// Upper bound for `strength_score`.
pub const MAX_STRENGTH_SCORE: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVariant {
    Basic,
    #[default]
    Extended,
}

impl SchemaVariant {
    pub fn requires_scores(self) -> bool {
        matches!(self, SchemaVariant::Extended)
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVariant::Basic => f.write_str("basic"),
            SchemaVariant::Extended => f.write_str("extended"),
        }
    }
}

impl FromStr for SchemaVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(SchemaVariant::Basic),
            "extended" => Ok(SchemaVariant::Extended),
            other => Err(format!("unknown schema variant '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Low" => Some(RiskLevel::Low),
            "Medium" => Some(RiskLevel::Medium),
            "High" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudienceInsight {
    pub pain_points: Vec<String>,
    pub emotional_triggers: Vec<String>,
    pub objections: Vec<String>,
    /// How the product differs from alternatives.
    pub competitive_angle: String,
    /// Ranked by importance, most important first.
    pub key_selling_points: Vec<String>,
    pub recommended_keywords: Vec<String>,
    /// Age range, gender, location.
    pub demographics: String,
    /// Interest categories usable in Meta / Google Ads targeting.
    pub targeting_interests: Vec<String>,
    pub behaviors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience_match_score: Option<u8>, // 0 – 100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score_explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdVariation {
    pub headline: String,
    pub primary_text: String,
    pub cta: String,
    /// "Emotional", "Logical" or "Scarcity" by convention; not enforced.
    pub angle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength_score: Option<Number>, // 0 – 10, integer or float
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceCheck {
    pub risk_level: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<u8>, // 0 – 100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score_explanation: Option<String>,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Channel copy. Length limits are prompt instructions, not checked here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelOptimization {
    pub whatsapp: String,
    pub sms: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignResponse {
    pub insights: AudienceInsight,
    pub variations: Vec<AdVariation>,
    pub compliance: ComplianceCheck,
    pub channel_opt: ChannelOptimization,
}
