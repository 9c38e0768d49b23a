//! Response Normalizer — turns raw completion text into a schema-valid `CampaignResponse`.
//!
//! Pipeline (single attempt, never calls the model again):
//! 1. `parse_object`      — strip fences / surrounding prose, parse one JSON object.
//! 2. `canonicalize_keys` — rename variant spellings to the schema's field names.
//! 3. `repair`            — fill the whitelisted insight fields from `REPAIR_TABLE`.
//! 4. `validate`          — strict schema check, collecting every violation with its path.
//!
//! Only step 3 mutates content, and only for the fields listed in the table.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;
use tracing::warn;

use crate::campaign::models::CampaignRequest;
use crate::campaign::schema::{
    AdVariation, AudienceInsight, CampaignResponse, ChannelOptimization, ComplianceCheck,
    RiskLevel, SchemaVariant, MAX_PERCENT_SCORE, MAX_STRENGTH_SCORE, VARIATION_COUNT,
};

type Object = Map<String, Value>;

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// One schema violation, located by a dotted path such as `compliance.risk_score`
/// or `variations[1].headline`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Everything a caller needs to see which part of the contract the model broke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub violations: Vec<Violation>,
    /// Sorted keys of the parsed top-level object.
    pub top_level_keys: Vec<String>,
    /// Sorted keys of `insights`; empty when it is not an object.
    pub insights_keys: Vec<String>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self
            .violations
            .iter()
            .map(|v| format!("{}: {}", v.path, v.message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&summary)
    }
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("failed to parse response as JSON: {0}")]
    MalformedOutput(String),

    #[error("failed to validate response: {0}")]
    ValidationFailed(ValidationFailure),
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full pipeline on one completion.
pub fn normalize(
    raw: &str,
    request: &CampaignRequest,
    variant: SchemaVariant,
) -> Result<CampaignResponse, NormalizeError> {
    let mut object = parse_object(raw)?;
    canonicalize_keys(&mut object);

    let repaired = repair(object, request);
    if !repaired.filled.is_empty() {
        warn!(
            "Completion for '{}' omitted insight fields, filled with placeholders: {:?}",
            request.product_name, repaired.filled
        );
    }

    validate(&repaired.object, variant).map_err(NormalizeError::ValidationFailed)
}

// ────────────────────────────────────────────────────────────────────────────
// Step 1: parse
// ────────────────────────────────────────────────────────────────────────────

/// Parses completion text as a single JSON object.
///
/// Accepts Markdown code fences and prose around the object. Anything that
/// still does not parse, or parses to a non-object, is `MalformedOutput`.
pub fn parse_object(raw: &str) -> Result<Object, NormalizeError> {
    let text = strip_json_fences(raw);

    let value = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(err) => match embedded_object(text) {
            Some(object) => Value::Object(object),
            None => return Err(NormalizeError::MalformedOutput(err.to_string())),
        },
    };

    match value {
        Value::Object(object) => Ok(object),
        other => Err(NormalizeError::MalformedOutput(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}

/// The first complete JSON object embedded in prose.
///
/// Every `{` is tried as a start in turn, so braces in the surrounding text
/// that do not open a valid object are skipped. Trailing prose is ignored.
fn embedded_object(text: &str) -> Option<Object> {
    text.match_indices('{').find_map(|(start, _)| {
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(Value::Object(object))) => Some(object),
            _ => None,
        }
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Step 2: key canonicalization
// ────────────────────────────────────────────────────────────────────────────

const TOP_LEVEL_FIELDS: &[&str] = &["insights", "variations", "compliance", "channel_opt"];

const INSIGHT_FIELDS: &[&str] = &[
    "pain_points",
    "emotional_triggers",
    "objections",
    "competitive_angle",
    "key_selling_points",
    "recommended_keywords",
    "demographics",
    "targeting_interests",
    "behaviors",
    "audience_match_score",
    "match_score_explanation",
];

const VARIATION_FIELDS: &[&str] = &[
    "headline",
    "primary_text",
    "cta",
    "angle",
    "strength_score",
    "score_explanation",
];

const COMPLIANCE_FIELDS: &[&str] = &[
    "risk_level",
    "risk_score",
    "risk_score_explanation",
    "issues",
    "suggestions",
];

const CHANNEL_FIELDS: &[&str] = &["whatsapp", "sms"];

/// Renames keys to the schema's field names at every level the schema defines,
/// so `painPoints`, `PainPoints` and `pain-points` all become `pain_points`.
/// Unknown keys are left as they are. When a key already has the exact schema
/// spelling, its value wins over any variant spelling.
pub fn canonicalize_keys(object: &mut Object) {
    canonicalize_object(object, TOP_LEVEL_FIELDS);

    for (key, fields) in [
        ("insights", INSIGHT_FIELDS),
        ("compliance", COMPLIANCE_FIELDS),
        ("channel_opt", CHANNEL_FIELDS),
    ] {
        if let Some(Value::Object(nested)) = object.get_mut(key) {
            canonicalize_object(nested, fields);
        }
    }

    if let Some(Value::Array(variations)) = object.get_mut("variations") {
        for variation in variations.iter_mut() {
            if let Value::Object(v) = variation {
                canonicalize_object(v, VARIATION_FIELDS);
            }
        }
    }
}

fn canonicalize_object(object: &mut Object, fields: &[&'static str]) {
    if object
        .keys()
        .all(|k| known_field(k, fields).map_or(true, |field| *k == field))
    {
        return;
    }

    let original = std::mem::take(object);
    let mut renamed = Vec::new();
    for (key, value) in original {
        match known_field(&key, fields) {
            Some(field) if field != key => renamed.push((field, value)),
            _ => {
                object.insert(key, value);
            }
        }
    }
    for (field, value) in renamed {
        object.entry(field).or_insert(value);
    }
}

/// The schema field `key` refers to, ignoring case, `_` and `-`.
fn known_field(key: &str, fields: &[&'static str]) -> Option<&'static str> {
    let folded = fold_key(key);
    fields.iter().copied().find(|field| fold_key(field) == folded)
}

fn fold_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Step 3: shape repair
// ────────────────────────────────────────────────────────────────────────────

/// Default substituted for a blank insight field.
#[derive(Debug, Clone, Copy)]
pub enum Placeholder {
    Text(&'static str),
    /// A one-sentence claim naming the requested product.
    ProductClaim,
    List(&'static [&'static str]),
}

impl Placeholder {
    fn value(self, request: &CampaignRequest) -> Value {
        match self {
            Placeholder::Text(text) => Value::String(text.to_string()),
            Placeholder::ProductClaim => Value::String(format!(
                "{} offers unique value through its distinctive features and benefits.",
                request.product_name
            )),
            Placeholder::List(items) => Value::Array(
                items
                    .iter()
                    .map(|item| Value::String((*item).to_string()))
                    .collect(),
            ),
        }
    }
}

/// The only fields the normalizer will ever fill in. Everything else must come
/// from the model or fail validation.
pub const REPAIR_TABLE: [(&str, Placeholder); 6] = [
    ("competitive_angle", Placeholder::ProductClaim),
    (
        "key_selling_points",
        Placeholder::List(&["Core benefit 1", "Core benefit 2", "Core benefit 3"]),
    ),
    (
        "recommended_keywords",
        Placeholder::List(&["keyword1", "keyword2", "keyword3"]),
    ),
    ("demographics", Placeholder::Text("25-45, All genders")),
    (
        "targeting_interests",
        Placeholder::List(&["Online shopping", "Fashion", "Lifestyle"]),
    ),
    (
        "behaviors",
        Placeholder::List(&["Frequent online shoppers", "Engages with brand content"]),
    ),
];

/// A parsed object after shape repair, plus the fields that were filled.
#[derive(Debug, Clone, PartialEq)]
pub struct Repaired {
    pub object: Object,
    pub filled: Vec<&'static str>,
}

/// Fills blank `REPAIR_TABLE` fields in `insights`, creating `insights` if absent.
/// An `insights` value that is not an object is left for validation to report.
pub fn repair(mut object: Object, request: &CampaignRequest) -> Repaired {
    let mut filled = Vec::new();

    let insights = object
        .entry("insights")
        .or_insert_with(|| Value::Object(Map::new()));

    if let Value::Object(insights) = insights {
        for (field, placeholder) in REPAIR_TABLE {
            if insights.get(field).map_or(true, is_blank) {
                insights.insert(field.to_string(), placeholder.value(request));
                filled.push(field);
            }
        }
    }

    Repaired { object, filled }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Step 4: strict validation
// ────────────────────────────────────────────────────────────────────────────

/// Validates a repaired object against the schema for `variant`.
pub fn validate(object: &Object, variant: SchemaVariant) -> Result<CampaignResponse, ValidationFailure> {
    let mut checker = Checker {
        violations: Vec::new(),
        scores_required: variant.requires_scores(),
    };

    let insights = checker
        .object(object, "insights", "")
        .map(|o| checker.insights(o));
    let variations = checker.variations(object);
    let compliance = checker
        .object(object, "compliance", "")
        .map(|o| checker.compliance(o));
    let channel_opt = checker
        .object(object, "channel_opt", "")
        .map(|o| checker.channel_opt(o));

    match (insights, variations, compliance, channel_opt) {
        (Some(insights), Some(variations), Some(compliance), Some(channel_opt))
            if checker.violations.is_empty() =>
        {
            Ok(CampaignResponse {
                insights,
                variations,
                compliance,
                channel_opt,
            })
        }
        _ => Err(ValidationFailure {
            violations: checker.violations,
            top_level_keys: sorted_keys(object),
            insights_keys: object
                .get("insights")
                .and_then(Value::as_object)
                .map(sorted_keys)
                .unwrap_or_default(),
        }),
    }
}

fn sorted_keys(object: &Object) -> Vec<String> {
    let mut keys: Vec<String> = object.keys().cloned().collect();
    keys.sort();
    keys
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Reads typed fields out of untyped JSON, recording a `Violation` for each
/// problem and returning a placeholder so the walk can continue.
struct Checker {
    violations: Vec<Violation>,
    scores_required: bool,
}

impl Checker {
    fn fail(&mut self, path: String, message: impl Into<String>) {
        self.violations.push(Violation::new(path, message));
    }

    fn object<'a>(&mut self, parent: &'a Object, key: &str, prefix: &str) -> Option<&'a Object> {
        match parent.get(key) {
            Some(Value::Object(o)) => Some(o),
            None | Some(Value::Null) => {
                self.fail(join_path(prefix, key), "missing required field");
                None
            }
            Some(other) => {
                self.fail(
                    join_path(prefix, key),
                    format!("expected an object, got {}", json_kind(other)),
                );
                None
            }
        }
    }

    fn string(&mut self, parent: &Object, key: &str, prefix: &str) -> String {
        match parent.get(key) {
            Some(Value::String(s)) => s.clone(),
            None | Some(Value::Null) => {
                self.fail(join_path(prefix, key), "missing required field");
                String::new()
            }
            Some(other) => {
                self.fail(
                    join_path(prefix, key),
                    format!("expected a string, got {}", json_kind(other)),
                );
                String::new()
            }
        }
    }

    fn strings(&mut self, parent: &Object, key: &str, prefix: &str) -> Vec<String> {
        let path = join_path(prefix, key);
        match parent.get(key) {
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    match item {
                        Value::String(s) => out.push(s.clone()),
                        other => self.fail(
                            format!("{path}[{i}]"),
                            format!("expected a string, got {}", json_kind(other)),
                        ),
                    }
                }
                out
            }
            None | Some(Value::Null) => {
                self.fail(path, "missing required field");
                Vec::new()
            }
            Some(other) => {
                self.fail(path, format!("expected an array of strings, got {}", json_kind(other)));
                Vec::new()
            }
        }
    }

    /// A string that is mandatory only when scores are required.
    fn explanation(&mut self, parent: &Object, key: &str, prefix: &str) -> Option<String> {
        match parent.get(key) {
            None | Some(Value::Null) if !self.scores_required => None,
            _ => Some(self.string(parent, key, prefix)),
        }
    }

    /// Integer score in [0, 100]. Floats with no fractional part are accepted.
    fn percent(&mut self, parent: &Object, key: &str, prefix: &str) -> Option<u8> {
        let path = join_path(prefix, key);
        let value = match parent.get(key) {
            None | Some(Value::Null) => {
                if self.scores_required {
                    self.fail(path, "missing required field");
                }
                return None;
            }
            Some(value) => value,
        };

        let Some(number) = value.as_f64() else {
            self.fail(path, format!("expected an integer, got {}", json_kind(value)));
            return None;
        };
        if number.fract() != 0.0 {
            self.fail(path, format!("expected an integer, got {number}"));
            return None;
        }
        if !(0.0..=f64::from(MAX_PERCENT_SCORE)).contains(&number) {
            self.fail(
                path,
                format!("must be between 0 and {MAX_PERCENT_SCORE}, got {number}"),
            );
            return None;
        }
        // In range and integral, so the cast is exact.
        Some(number as u8)
    }

    /// Numeric score in [0, 10]. The number is kept as the model wrote it,
    /// so an integral `8` stays `8` on the way out.
    fn strength(&mut self, parent: &Object, key: &str, prefix: &str) -> Option<Number> {
        let path = join_path(prefix, key);
        let number = match parent.get(key) {
            None | Some(Value::Null) => {
                if self.scores_required {
                    self.fail(path, "missing required field");
                }
                return None;
            }
            Some(Value::Number(number)) => number,
            Some(other) => {
                self.fail(path, format!("expected a number, got {}", json_kind(other)));
                return None;
            }
        };

        let in_range = number
            .as_f64()
            .is_some_and(|score| (0.0..=MAX_STRENGTH_SCORE).contains(&score));
        if !in_range {
            self.fail(
                path,
                format!("must be between 0 and {MAX_STRENGTH_SCORE}, got {number}"),
            );
            return None;
        }
        Some(number.clone())
    }

    fn insights(&mut self, o: &Object) -> AudienceInsight {
        let p = "insights";
        AudienceInsight {
            pain_points: self.strings(o, "pain_points", p),
            emotional_triggers: self.strings(o, "emotional_triggers", p),
            objections: self.strings(o, "objections", p),
            competitive_angle: self.string(o, "competitive_angle", p),
            key_selling_points: self.strings(o, "key_selling_points", p),
            recommended_keywords: self.strings(o, "recommended_keywords", p),
            demographics: self.string(o, "demographics", p),
            targeting_interests: self.strings(o, "targeting_interests", p),
            behaviors: self.strings(o, "behaviors", p),
            audience_match_score: self.percent(o, "audience_match_score", p),
            match_score_explanation: self.explanation(o, "match_score_explanation", p),
        }
    }

    fn variations(&mut self, parent: &Object) -> Option<Vec<AdVariation>> {
        let items = match parent.get("variations") {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => {
                self.fail("variations".to_string(), "missing required field");
                return None;
            }
            Some(other) => {
                self.fail(
                    "variations".to_string(),
                    format!("expected an array, got {}", json_kind(other)),
                );
                return None;
            }
        };

        if items.len() != VARIATION_COUNT {
            self.fail(
                "variations".to_string(),
                format!(
                    "expected exactly {VARIATION_COUNT} entries, got {}",
                    items.len()
                ),
            );
        }

        let mut variations = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let p = format!("variations[{i}]");
            let Value::Object(o) = item else {
                self.fail(p, format!("expected an object, got {}", json_kind(item)));
                continue;
            };
            variations.push(AdVariation {
                headline: self.string(o, "headline", &p),
                primary_text: self.string(o, "primary_text", &p),
                cta: self.string(o, "cta", &p),
                angle: self.string(o, "angle", &p),
                strength_score: self.strength(o, "strength_score", &p),
                score_explanation: self.explanation(o, "score_explanation", &p),
            });
        }
        Some(variations)
    }

    fn compliance(&mut self, o: &Object) -> ComplianceCheck {
        let p = "compliance";
        let raw_level = self.string(o, "risk_level", p);
        let risk_level = match RiskLevel::parse(&raw_level) {
            Some(level) => level,
            None => {
                // Missing / non-string risk_level was already reported by `string`.
                if o.get("risk_level").is_some_and(Value::is_string) {
                    self.fail(
                        join_path(p, "risk_level"),
                        format!("expected one of Low, Medium, High, got {raw_level:?}"),
                    );
                }
                RiskLevel::Low
            }
        };

        ComplianceCheck {
            risk_level,
            risk_score: self.percent(o, "risk_score", p),
            risk_score_explanation: self.explanation(o, "risk_score_explanation", p),
            issues: self.strings(o, "issues", p),
            suggestions: self.strings(o, "suggestions", p),
        }
    }

    fn channel_opt(&mut self, o: &Object) -> ChannelOptimization {
        let p = "channel_opt";
        ChannelOptimization {
            whatsapp: self.string(o, "whatsapp", p),
            sms: self.string(o, "sms", p),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::fixtures::{basic_payload, extended_payload, zen_mask_request as request};
    use serde_json::json;

    fn validation_failure(raw: &str, variant: SchemaVariant) -> ValidationFailure {
        match normalize(raw, &request(), variant) {
            Err(NormalizeError::ValidationFailed(failure)) => failure,
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    fn as_object(value: Value) -> Object {
        match value {
            Value::Object(o) => o,
            _ => panic!("expected object"),
        }
    }

    // ── parse ──────────────────────────────────────────────────────────────

    #[test]
    fn test_not_json_is_malformed_output() {
        let result = normalize("not json at all", &request(), SchemaVariant::Extended);
        assert!(matches!(result, Err(NormalizeError::MalformedOutput(_))));
    }

    #[test]
    fn test_malformed_output_message_mentions_json() {
        let err = normalize("not json at all", &request(), SchemaVariant::Basic).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse response as JSON"));
    }

    #[test]
    fn test_non_object_json_is_malformed_output() {
        let err = parse_object("[1, 2, 3]").unwrap_err();
        match err {
            NormalizeError::MalformedOutput(msg) => assert!(msg.contains("an array")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_truncated_json_is_malformed_output() {
        let raw = r#"{"insights": {"pain_points": ["a""#;
        assert!(matches!(
            parse_object(raw),
            Err(NormalizeError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_fenced_json_parses() {
        let raw = format!("```json\n{}\n```", extended_payload());
        let response = normalize(&raw, &request(), SchemaVariant::Extended).unwrap();
        assert_eq!(response.variations.len(), 3);
    }

    #[test]
    fn test_prose_around_json_parses() {
        let raw = format!(
            "Here is your campaign:\n{}\nLet me know if you need changes!",
            extended_payload()
        );
        let response = normalize(&raw, &request(), SchemaVariant::Extended).unwrap();
        assert_eq!(response.compliance.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_braces_in_surrounding_prose_are_skipped() {
        let raw = format!(
            "Here is the plan {{v2}}:\n{}\nDone. {{end}}",
            extended_payload()
        );
        let embedded = normalize(&raw, &request(), SchemaVariant::Extended).unwrap();
        let bare = normalize(
            &extended_payload().to_string(),
            &request(),
            SchemaVariant::Extended,
        )
        .unwrap();
        assert_eq!(embedded, bare);
    }

    #[test]
    fn test_prose_with_only_stray_braces_is_malformed_output() {
        let result = parse_object("Sorry {user}, I cannot produce that {today}.");
        assert!(matches!(result, Err(NormalizeError::MalformedOutput(_))));
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    // ── canonicalization ───────────────────────────────────────────────────

    #[test]
    fn test_known_field_ignores_case_and_separators() {
        for key in ["whatsapp", "whatsApp", "WhatsApp", "whats_app", "WHATSAPP"] {
            assert_eq!(known_field(key, CHANNEL_FIELDS), Some("whatsapp"));
        }
        assert_eq!(known_field("painPoints", INSIGHT_FIELDS), Some("pain_points"));
        assert_eq!(known_field("primary-text", VARIATION_FIELDS), Some("primary_text"));
        assert_eq!(known_field("CTA", VARIATION_FIELDS), Some("cta"));
        assert_eq!(known_field("notes", CHANNEL_FIELDS), None);
    }

    #[test]
    fn test_whatsapp_spelling_variants_are_accepted() {
        for spelling in ["whatsApp", "WhatsApp", "whats_app"] {
            let mut payload = extended_payload();
            let channel = payload["channel_opt"].as_object_mut().unwrap();
            let text = channel.remove("whatsapp").unwrap();
            channel.insert(spelling.to_string(), text.clone());

            let response = normalize(&payload.to_string(), &request(), SchemaVariant::Extended)
                .unwrap_or_else(|e| panic!("{spelling}: {e}"));
            assert_eq!(response.channel_opt.whatsapp, text.as_str().unwrap());
        }
    }

    #[test]
    fn test_unknown_keys_are_left_alone() {
        let mut object = as_object(json!({"whatsApp": "w", "notes": "n"}));
        canonicalize_object(&mut object, CHANNEL_FIELDS);
        assert_eq!(object["whatsapp"], "w");
        assert_eq!(object["notes"], "n");
    }

    #[test]
    fn test_camel_case_payload_is_accepted() {
        let raw = json!({
            "insights": {
                "painPoints": ["a"],
                "emotionalTriggers": ["b"],
                "objections": ["c"],
                "competitiveAngle": "Different.",
                "keySellingPoints": ["d"],
                "recommendedKeywords": ["e"],
                "demographics": "25-40",
                "targetingInterests": ["f"],
                "behaviors": ["g"]
            },
            "variations": [
                {"headline": "h", "primaryText": "p", "cta": "c", "angle": "Emotional"},
                {"headline": "h", "primaryText": "p", "cta": "c", "angle": "Logical"},
                {"headline": "h", "primaryText": "p", "cta": "c", "angle": "Scarcity"}
            ],
            "compliance": {"riskLevel": "Medium", "issues": [], "suggestions": []},
            "channelOpt": {"whatsapp": "w", "sms": "s"}
        });
        let response = normalize(&raw.to_string(), &request(), SchemaVariant::Basic).unwrap();
        assert_eq!(response.insights.pain_points, vec!["a"]);
        assert_eq!(response.insights.competitive_angle, "Different.");
        assert_eq!(response.variations[2].primary_text, "p");
        assert_eq!(response.compliance.risk_level, RiskLevel::Medium);
        assert_eq!(response.channel_opt.sms, "s");
    }

    #[test]
    fn test_snake_case_wins_over_camel_case() {
        let mut object = as_object(json!({"riskLevel": "High", "risk_level": "Low"}));
        canonicalize_object(&mut object, COMPLIANCE_FIELDS);
        assert_eq!(object.len(), 1);
        assert_eq!(object["risk_level"], "Low");
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let mut once = as_object(json!({"channelOpt": {"whatsApp": "w"}, "insights": {"painPoints": []}}));
        canonicalize_keys(&mut once);
        let mut twice = once.clone();
        canonicalize_keys(&mut twice);
        assert_eq!(once, twice);
        assert_eq!(once["channel_opt"]["whats_app"], "w");
    }

    // ── repair ─────────────────────────────────────────────────────────────

    #[test]
    fn test_missing_competitive_angle_and_keywords_are_filled() {
        let mut payload = extended_payload();
        let insights = payload["insights"].as_object_mut().unwrap();
        insights.remove("competitive_angle");
        insights.remove("recommended_keywords");

        let response =
            normalize(&payload.to_string(), &request(), SchemaVariant::Extended).unwrap();
        assert!(!response.insights.competitive_angle.is_empty());
        assert!(response.insights.competitive_angle.contains("Zen Mask"));
        assert!(!response.insights.recommended_keywords.is_empty());
        assert!(response
            .insights
            .recommended_keywords
            .iter()
            .all(|k| !k.is_empty()));
    }

    #[test]
    fn test_repair_reports_filled_fields() {
        let object = as_object(json!({
            "insights": {
                "demographics": "",
                "behaviors": [],
                "targeting_interests": null,
                "key_selling_points": ["Kept"],
                "competitive_angle": "Kept",
                "recommended_keywords": ["kept"]
            }
        }));
        let repaired = repair(object, &request());
        assert_eq!(
            repaired.filled,
            vec!["demographics", "targeting_interests", "behaviors"]
        );
        assert_eq!(repaired.object["insights"]["demographics"], "25-45, All genders");
        assert_eq!(repaired.object["insights"]["key_selling_points"], json!(["Kept"]));
    }

    #[test]
    fn test_repair_is_idempotent() {
        let object = as_object(json!({"insights": {"pain_points": ["x"], "demographics": "  "}}));
        let once = repair(object, &request());
        let twice = repair(once.object.clone(), &request());
        assert_eq!(once.object, twice.object);
        assert!(twice.filled.is_empty());
    }

    #[test]
    fn test_repair_creates_missing_insights() {
        let repaired = repair(Map::new(), &request());
        let insights = repaired.object["insights"].as_object().unwrap();
        assert_eq!(insights.len(), REPAIR_TABLE.len());
        assert_eq!(repaired.filled.len(), REPAIR_TABLE.len());
    }

    #[test]
    fn test_repair_leaves_non_object_insights_alone() {
        let object = as_object(json!({"insights": "none"}));
        let repaired = repair(object, &request());
        assert_eq!(repaired.object["insights"], "none");
        assert!(repaired.filled.is_empty());
    }

    #[test]
    fn test_repair_does_not_touch_wrongly_typed_fields() {
        let object = as_object(json!({"insights": {"competitive_angle": 5}}));
        let repaired = repair(object, &request());
        assert_eq!(repaired.object["insights"]["competitive_angle"], 5);
        assert!(!repaired.filled.contains(&"competitive_angle"));
    }

    #[test]
    fn test_repair_never_fills_fields_outside_table() {
        let mut payload = basic_payload();
        payload["insights"]
            .as_object_mut()
            .unwrap()
            .remove("pain_points");
        let failure = validation_failure(&payload.to_string(), SchemaVariant::Basic);
        assert_eq!(failure.violations.len(), 1);
        assert_eq!(failure.violations[0].path, "insights.pain_points");
    }

    // ── validate ───────────────────────────────────────────────────────────

    #[test]
    fn test_valid_extended_payload_round_trips_unchanged() {
        let payload = extended_payload();
        let response =
            normalize(&payload.to_string(), &request(), SchemaVariant::Extended).unwrap();
        assert_eq!(serde_json::to_value(&response).unwrap(), payload);
    }

    #[test]
    fn test_valid_basic_payload_round_trips_unchanged() {
        let payload = basic_payload();
        let response = normalize(&payload.to_string(), &request(), SchemaVariant::Basic).unwrap();
        assert_eq!(serde_json::to_value(&response).unwrap(), payload);
    }

    #[test]
    fn test_integral_strength_score_keeps_its_form() {
        let mut payload = extended_payload();
        payload["variations"][0]["strength_score"] = json!(8);
        let response =
            normalize(&payload.to_string(), &request(), SchemaVariant::Extended).unwrap();
        let out = serde_json::to_value(&response).unwrap();
        assert_eq!(out["variations"][0]["strength_score"], json!(8));
        assert_eq!(out, payload);
    }

    #[test]
    fn test_two_variations_fail_and_name_variations() {
        let mut payload = extended_payload();
        payload["variations"].as_array_mut().unwrap().pop();

        let failure = validation_failure(&payload.to_string(), SchemaVariant::Extended);
        assert!(failure.violations.iter().any(|v| v.path == "variations"));
        assert!(failure.to_string().contains("variations"));
        assert_eq!(
            failure.top_level_keys,
            vec!["channel_opt", "compliance", "insights", "variations"]
        );
        assert!(failure.insights_keys.contains(&"pain_points".to_string()));
    }

    #[test]
    fn test_risk_score_out_of_range_fails() {
        let mut payload = extended_payload();
        payload["compliance"]["risk_score"] = json!(150);

        let failure = validation_failure(&payload.to_string(), SchemaVariant::Extended);
        assert_eq!(
            failure.violations,
            vec![Violation::new(
                "compliance.risk_score",
                "must be between 0 and 100, got 150"
            )]
        );
    }

    #[test]
    fn test_out_of_range_score_fails_even_in_basic_variant() {
        let mut payload = basic_payload();
        payload["compliance"]["risk_score"] = json!(150);
        let failure = validation_failure(&payload.to_string(), SchemaVariant::Basic);
        assert_eq!(failure.violations[0].path, "compliance.risk_score");
    }

    #[test]
    fn test_strength_score_out_of_range_fails() {
        let mut payload = extended_payload();
        payload["variations"][1]["strength_score"] = json!(10.5);
        let failure = validation_failure(&payload.to_string(), SchemaVariant::Extended);
        assert_eq!(failure.violations[0].path, "variations[1].strength_score");
    }

    #[test]
    fn test_integral_float_score_is_accepted() {
        let mut payload = extended_payload();
        payload["insights"]["audience_match_score"] = json!(67.0);
        let response =
            normalize(&payload.to_string(), &request(), SchemaVariant::Extended).unwrap();
        assert_eq!(response.insights.audience_match_score, Some(67));
    }

    #[test]
    fn test_fractional_percent_score_fails() {
        let mut payload = extended_payload();
        payload["insights"]["audience_match_score"] = json!(67.5);
        let failure = validation_failure(&payload.to_string(), SchemaVariant::Extended);
        assert_eq!(failure.violations[0].path, "insights.audience_match_score");
    }

    #[test]
    fn test_extended_variant_requires_scores() {
        let failure = validation_failure(&basic_payload().to_string(), SchemaVariant::Extended);
        let paths: Vec<&str> = failure.violations.iter().map(|v| v.path.as_str()).collect();
        assert!(paths.contains(&"insights.audience_match_score"));
        assert!(paths.contains(&"insights.match_score_explanation"));
        assert!(paths.contains(&"variations[0].strength_score"));
        assert!(paths.contains(&"compliance.risk_score"));
        assert!(paths.contains(&"compliance.risk_score_explanation"));
    }

    #[test]
    fn test_basic_variant_keeps_extra_scores() {
        let response = normalize(
            &extended_payload().to_string(),
            &request(),
            SchemaVariant::Basic,
        )
        .unwrap();
        assert_eq!(response.compliance.risk_score, Some(23));
    }

    #[test]
    fn test_unknown_risk_level_fails() {
        let mut payload = basic_payload();
        payload["compliance"]["risk_level"] = json!("Low/Medium/High");
        let failure = validation_failure(&payload.to_string(), SchemaVariant::Basic);
        assert_eq!(failure.violations.len(), 1);
        assert_eq!(failure.violations[0].path, "compliance.risk_level");
    }

    #[test]
    fn test_wrong_types_are_reported_with_paths() {
        let mut payload = basic_payload();
        payload["insights"]["objections"] = json!("Price");
        payload["variations"][0]["headline"] = json!(42);
        payload["channel_opt"] = json!("none");

        let failure = validation_failure(&payload.to_string(), SchemaVariant::Basic);
        let paths: Vec<&str> = failure.violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["insights.objections", "variations[0].headline", "channel_opt"]
        );
    }

    #[test]
    fn test_missing_insights_reports_empty_insight_keys_after_repair() {
        let mut payload = basic_payload();
        payload.as_object_mut().unwrap().remove("insights");
        let failure = validation_failure(&payload.to_string(), SchemaVariant::Basic);
        // Repair created insights with only the placeholder fields.
        assert!(failure
            .violations
            .iter()
            .any(|v| v.path == "insights.pain_points"));
        assert_eq!(failure.insights_keys.len(), REPAIR_TABLE.len());
    }

    #[test]
    fn test_non_string_list_entries_are_reported() {
        let mut payload = basic_payload();
        payload["compliance"]["issues"] = json!(["ok", 3]);
        let failure = validation_failure(&payload.to_string(), SchemaVariant::Basic);
        assert_eq!(failure.violations[0].path, "compliance.issues[1]");
    }
}
