// Prompt text for campaign generation, one system/user pair per schema variant.
// Placeholders: {product_name}, {description}, {target_audience}, {platform},
//               {campaign_goal}, {tone}, {framework}

use crate::campaign::models::CampaignRequest;
use crate::campaign::schema::SchemaVariant;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

pub const BASIC_SYSTEM: &str = "You are a world-class marketing engine. Return ONLY JSON. \
    Include ALL required fields in the insights object: pain_points, emotional_triggers, \
    objections, competitive_angle, key_selling_points, recommended_keywords, demographics, \
    targeting_interests, and behaviors.";

pub const EXTENDED_SYSTEM: &str = "You are a world-class marketing engine. Return ONLY JSON. \
    For all numeric scores, use precise numbers drawn from your analysis rather than \
    common round numbers like 80, 85, 90, 20 or 25.";

pub const BASIC_PROMPT_TEMPLATE: &str = r#"You are an expert marketing strategist and ad copywriter. Build a complete ad campaign suite.

INPUT:
- Product: {product_name}
- Description: {description}
- Audience: {target_audience}
- Platform: {platform}
- Goal: {campaign_goal}
- Tone: {tone}
- Framework: {framework}

STEPS:
1. Audience analysis: 3 pain points, 3 emotional triggers, 3 common objections.
2. Targeting for Meta and Google Ads: specific demographics (e.g. "25-45, Female, Urban areas"),
   8-12 targeting interests that exist as ad-platform interest categories, 5-7 online and purchase behaviors.
3. Competitive angle: 2-3 sentences on how this product differs from alternatives.
4. Key selling points: 5-7, ranked most important first.
5. Keywords: 8-12, mixing broad, specific and long-tail.
6. Structure the copy with the {framework} framework
   (AIDA, PAS, Problem-Solution or Urgency-Scarcity).
7. Write 3 variations with different hooks: Emotional, Logical, Scarcity.
8. Rewrite the primary copy as a WhatsApp broadcast (with emojis) and an SMS (max 160 chars).
9. Audit the copy against {platform} policies for overpromising or sensitive language.

OUTPUT FORMAT:
{
  "insights": {
    "pain_points": ["...", "...", "..."],
    "emotional_triggers": ["...", "...", "..."],
    "objections": ["...", "...", "..."],
    "competitive_angle": "...",
    "key_selling_points": ["...", "..."],
    "recommended_keywords": ["...", "..."],
    "demographics": "...",
    "targeting_interests": ["...", "..."],
    "behaviors": ["...", "..."]
  },
  "variations": [
    {"headline": "...", "primary_text": "...", "cta": "...", "angle": "Emotional"},
    {"headline": "...", "primary_text": "...", "cta": "...", "angle": "Logical"},
    {"headline": "...", "primary_text": "...", "cta": "...", "angle": "Scarcity"}
  ],
  "compliance": {
    "risk_level": "Low | Medium | High",
    "issues": ["..."],
    "suggestions": ["..."]
  },
  "channel_opt": {
    "whatsapp": "...",
    "sms": "..."
  }
}"#;

pub const EXTENDED_PROMPT_TEMPLATE: &str = r#"You are a senior digital marketing strategist specialising in audience targeting and ad copywriting.

PRODUCT:
- Product: {product_name}
- Description: {description}
- Target audience: {target_audience}

CAMPAIGN:
- Goal: {campaign_goal}
- Framework: {framework}
- Platform: {platform}
- Tone: {tone}

PART 1: AUDIENCE
- Demographics: a specific age range and career stage.
- 3 pain points, 3 emotional triggers, 3 objections. Be concrete.
- 3 behaviors: platforms used, how content is consumed, primary device.
- 5 targeting interests, named precisely (brands, creators, communities), not broad categories.
- Competitive angle (2-3 sentences), 5-7 ranked key selling points, 8-12 keywords.
- audience_match_score (0-100): weigh pain urgency, solution awareness, market competition
  and uniqueness of the offer. Explain the score in 2-3 sentences.

PART 2: STRATEGY
Adapt to the goal "{campaign_goal}": curiosity hooks for Awareness, value-led copy for Traffic,
urgency and direct CTAs for Sales. Apply {framework} naturally and keep a {tone} tone.

PART 3: VARIATIONS
Three variations: Emotional, Logical, Scarcity. Headline max 40 chars, 2-3 sentence body, specific CTA.
strength_score (0-10) is the average of clarity, emotional pull, urgency and CTA strength,
with a 1-2 sentence explanation.

PART 4: CHANNELS
WhatsApp: conversational, max 300 chars including emoji. SMS: max 160 chars.

PART 5: COMPLIANCE
Check the copy against {platform} policies: exaggerated claims, prohibited content, missing
disclosures, discriminatory targeting, trademark concerns. risk_score (0-100) with a 2-3 sentence
explanation; risk_level is "Low" (0-30), "Medium" (31-60) or "High" (61-100).

OUTPUT FORMAT:
{
  "insights": {
    "demographics": "...",
    "pain_points": ["...", "...", "..."],
    "emotional_triggers": ["...", "...", "..."],
    "objections": ["...", "...", "..."],
    "behaviors": ["...", "...", "..."],
    "targeting_interests": ["...", "...", "...", "...", "..."],
    "competitive_angle": "...",
    "key_selling_points": ["...", "..."],
    "recommended_keywords": ["...", "..."],
    "audience_match_score": 67,
    "match_score_explanation": "..."
  },
  "variations": [
    {"headline": "...", "primary_text": "...", "cta": "...", "angle": "Emotional", "strength_score": 7.4, "score_explanation": "..."},
    {"headline": "...", "primary_text": "...", "cta": "...", "angle": "Logical", "strength_score": 8.1, "score_explanation": "..."},
    {"headline": "...", "primary_text": "...", "cta": "...", "angle": "Scarcity", "strength_score": 6.8, "score_explanation": "..."}
  ],
  "compliance": {
    "risk_level": "Low",
    "risk_score": 23,
    "risk_score_explanation": "...",
    "issues": ["..."],
    "suggestions": ["..."]
  },
  "channel_opt": {
    "whatsapp": "...",
    "sms": "..."
  }
}"#;

pub fn system_prompt(variant: SchemaVariant) -> &'static str {
    match variant {
        SchemaVariant::Basic => BASIC_SYSTEM,
        SchemaVariant::Extended => EXTENDED_SYSTEM,
    }
}

/// Builds the user prompt for `variant` from the request fields.
pub fn build_user_prompt(variant: SchemaVariant, request: &CampaignRequest) -> String {
    let template = match variant {
        SchemaVariant::Basic => BASIC_PROMPT_TEMPLATE,
        SchemaVariant::Extended => EXTENDED_PROMPT_TEMPLATE,
    };
    let mut prompt = render_template(template, &request.fields());
    prompt.push_str("\n\n");
    prompt.push_str(JSON_ONLY_INSTRUCTION);
    prompt
}

/// Single-pass `{name}` substitution.
///
/// Braces that do not enclose a known name are copied as-is (the templates
/// embed JSON), and substituted values are never scanned again.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let replacement = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
