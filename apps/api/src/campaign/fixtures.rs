//! Shared test data: the "Zen Mask" campaign and a complete model reply.

use serde_json::{json, Value};

use crate::campaign::models::CampaignRequest;

pub fn zen_mask_request() -> CampaignRequest {
    CampaignRequest {
        product_name: "Zen Mask".to_string(),
        description: "silk sleep mask".to_string(),
        target_audience: "new parents".to_string(),
        platform: "Meta".to_string(),
        campaign_goal: "Sales".to_string(),
        tone: "Urgent".to_string(),
        framework: "AIDA".to_string(),
    }
}

pub fn zen_mask_body() -> Value {
    json!({
        "product_name": "Zen Mask",
        "description": "silk sleep mask",
        "target_audience": "new parents",
        "platform": "Meta",
        "campaign_goal": "Sales",
        "tone": "Urgent",
        "framework": "AIDA"
    })
}

fn variation(angle: &str, score: f64) -> Value {
    json!({
        "headline": format!("{angle} headline"),
        "primary_text": "Blackout silk so the whole house sleeps when the baby does.",
        "cta": "Shop Now",
        "angle": angle,
        "strength_score": score,
        "score_explanation": "Clear benefit with a direct CTA."
    })
}

/// A complete, valid reply for the extended schema.
pub fn extended_payload() -> Value {
    json!({
        "insights": {
            "pain_points": ["Broken sleep", "Daytime naps in bright rooms", "Fatigue"],
            "emotional_triggers": ["Relief", "Self-care", "Control"],
            "objections": ["Price", "Comfort", "Will it stay on"],
            "competitive_angle": "Pure mulberry silk with a contoured blackout fit.",
            "key_selling_points": ["Total blackout", "Cool silk", "Adjustable strap"],
            "recommended_keywords": ["silk sleep mask", "blackout eye mask", "new parent gifts"],
            "demographics": "25-40, All genders, Urban",
            "targeting_interests": ["Parenting", "Sleep health", "Self-care"],
            "behaviors": ["Shops online at night", "Reads parenting blogs", "Mobile-first"],
            "audience_match_score": 73,
            "match_score_explanation": "Acute sleep pain with low solution awareness."
        },
        "variations": [
            variation("Emotional", 7.6),
            variation("Logical", 8.2),
            variation("Scarcity", 6.9)
        ],
        "compliance": {
            "risk_level": "Low",
            "risk_score": 23,
            "risk_score_explanation": "Mild urgency language only.",
            "issues": ["'Best sleep ever' is an unverifiable claim"],
            "suggestions": ["Soften superlatives"]
        },
        "channel_opt": {
            "whatsapp": "Tired of naps in bright rooms? Our silk Zen Mask blocks it all.",
            "sms": "Zen Mask: silk blackout sleep for tired parents. 20% off today."
        }
    })
}

/// `extended_payload` with every score and explanation removed.
pub fn basic_payload() -> Value {
    let mut payload = extended_payload();
    let insights = payload["insights"].as_object_mut().unwrap();
    insights.remove("audience_match_score");
    insights.remove("match_score_explanation");
    for v in payload["variations"].as_array_mut().unwrap() {
        let v = v.as_object_mut().unwrap();
        v.remove("strength_score");
        v.remove("score_explanation");
    }
    let compliance = payload["compliance"].as_object_mut().unwrap();
    compliance.remove("risk_score");
    compliance.remove("risk_score_explanation");
    payload
}
