//! Campaign request schema and validation.
//!
//! The handler accepts the body as an untyped JSON value so every missing or
//! malformed field can be reported at once, instead of stopping at the first
//! serde error.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::AppError;

/// The seven campaign parameters, in the order they are reported.
pub const REQUEST_FIELDS: [&str; 7] = [
    "product_name",
    "description",
    "target_audience",
    "platform",
    "campaign_goal",
    "tone",
    "framework",
];

/// Validated campaign parameters. All fields are non-blank and kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignRequest {
    pub product_name: String,
    pub description: String,
    pub target_audience: String,
    pub platform: String,
    pub campaign_goal: String,
    pub tone: String,
    pub framework: String,
}

/// Serialized with the same wording used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueKind {
    #[serde(rename = "missing")]
    Missing,
    #[serde(rename = "not a string")]
    NotAString,
    #[serde(rename = "empty")]
    Empty,
    #[serde(rename = "not an object")]
    NotAnObject,
}

impl IssueKind {
    fn as_str(self) -> &'static str {
        match self {
            IssueKind::Missing => "missing",
            IssueKind::NotAString => "not a string",
            IssueKind::Empty => "empty",
            IssueKind::NotAnObject => "not an object",
        }
    }
}

/// One problem with one field of an inbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub issue: IssueKind,
}

impl FieldIssue {
    pub fn new(field: &str, issue: IssueKind) -> Self {
        Self {
            field: field.to_string(),
            issue,
        }
    }
}

/// Human-readable summary used in error messages, e.g. `tone (missing), platform (empty)`.
pub fn describe_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{} ({})", i.field, i.issue.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

impl CampaignRequest {
    /// Validates an inbound JSON body. Unknown fields are ignored.
    pub fn from_value(body: &Value) -> Result<Self, AppError> {
        let Some(object) = body.as_object() else {
            return Err(AppError::InvalidRequest(vec![FieldIssue::new(
                "body",
                IssueKind::NotAnObject,
            )]));
        };

        // Field initializers run in source order, so issues come out in REQUEST_FIELDS order.
        let mut issues = Vec::new();
        let request = CampaignRequest {
            product_name: read_field(object, "product_name", &mut issues),
            description: read_field(object, "description", &mut issues),
            target_audience: read_field(object, "target_audience", &mut issues),
            platform: read_field(object, "platform", &mut issues),
            campaign_goal: read_field(object, "campaign_goal", &mut issues),
            tone: read_field(object, "tone", &mut issues),
            framework: read_field(object, "framework", &mut issues),
        };

        if !issues.is_empty() {
            return Err(AppError::InvalidRequest(issues));
        }
        Ok(request)
    }

    /// Field name / value pairs, used as prompt placeholders.
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        let values = [
            self.product_name.as_str(),
            &self.description,
            &self.target_audience,
            &self.platform,
            &self.campaign_goal,
            &self.tone,
            &self.framework,
        ];
        std::array::from_fn(|i| (REQUEST_FIELDS[i], values[i]))
    }
}

fn read_field(object: &Map<String, Value>, field: &str, issues: &mut Vec<FieldIssue>) -> String {
    match object.get(field) {
        None | Some(Value::Null) => {
            issues.push(FieldIssue::new(field, IssueKind::Missing));
            String::new()
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            issues.push(FieldIssue::new(field, IssueKind::Empty));
            String::new()
        }
        Some(Value::String(s)) => s.clone(),
        Some(_) => {
            issues.push(FieldIssue::new(field, IssueKind::NotAString));
            String::new()
        }
    }
}
