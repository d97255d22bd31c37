//! Endpoint checks and their summarized results

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

/// Field sampled from the first item when a check does not name one
pub const DEFAULT_SAMPLE_FIELD: &str = "phone_number_id";

/// One endpoint to probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointCheck {
    /// Request path, starting with `/`
    pub path: String,
    /// Key of the item sequence in the response document
    pub response_key: String,
    /// Field read from the first item
    #[serde(default = "default_sample_field")]
    pub sample_field: String,
    /// Name used in the count line (defaults to the capitalized response key)
    #[serde(default)]
    pub label: Option<String>,
    /// Singular noun used in the sample line (defaults to "item")
    #[serde(default)]
    pub item_noun: Option<String>,
    /// Extra query parameters, sent after `org_id` and `limit`
    #[serde(default)]
    pub query: BTreeMap<String, String>,
}

fn default_sample_field() -> String {
    DEFAULT_SAMPLE_FIELD.to_string()
}

impl EndpointCheck {
    /// Create a check with default label, noun and no extra query parameters
    #[must_use]
    pub fn new(path: &str, response_key: &str, sample_field: &str) -> Self {
        Self {
            path: path.to_string(),
            response_key: response_key.to_string(),
            sample_field: sample_field.to_string(),
            label: None,
            item_noun: None,
            query: BTreeMap::new(),
        }
    }

    /// Set the count-line label
    #[must_use]
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Set the sample-line noun
    #[must_use]
    pub fn with_item_noun(mut self, noun: &str) -> Self {
        self.item_noun = Some(noun.to_string());
        self
    }

    /// `GET /api/recordings`
    #[must_use]
    pub fn recordings() -> Self {
        Self::new("/api/recordings", "recordings", DEFAULT_SAMPLE_FIELD)
            .with_label("Recordings")
            .with_item_noun("recording")
    }

    /// `GET /api/sms/messages`
    #[must_use]
    pub fn sms_messages() -> Self {
        Self::new("/api/sms/messages", "messages", DEFAULT_SAMPLE_FIELD)
            .with_label("SMS")
            .with_item_noun("message")
    }

    /// The checks run when nothing else is configured
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![Self::recordings(), Self::sms_messages()]
    }

    /// Label shown in the count line
    pub fn label(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        let mut chars = self.response_key.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Noun shown in the sample line
    pub fn item_noun(&self) -> &str {
        self.item_noun.as_deref().unwrap_or("item")
    }
}

/// Summary of one endpoint response
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    /// HTTP status code
    pub status: u16,
    /// Length of the sequence under the response key (0 if absent)
    pub item_count: usize,
    /// Sample field of the first item, if there is a first item carrying it
    pub sample_value: Option<Value>,
}

impl CheckResult {
    /// Parse a raw body and summarize it
    ///
    /// # Errors
    ///
    /// Returns error if the body is not valid JSON
    pub fn from_body(check: &EndpointCheck, status: u16, body: &[u8]) -> Result<Self> {
        let document: Value = serde_json::from_slice(body)?;
        Ok(Self::from_document(check, status, &document))
    }

    /// Summarize an already parsed document
    ///
    /// A missing key, a non-sequence value or a non-object document all
    /// count as an empty sequence.
    #[must_use]
    pub fn from_document(check: &EndpointCheck, status: u16, document: &Value) -> Self {
        let items = document
            .get(check.response_key.as_str())
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice);

        let sample_value = items
            .first()
            .and_then(|first| first.get(check.sample_field.as_str()))
            .cloned();

        Self {
            status,
            item_count: items.len(),
            sample_value,
        }
    }

    /// Report lines for this result
    ///
    /// The sample line is only emitted when at least one item came back.
    pub fn report_lines(&self, check: &EndpointCheck) -> Vec<String> {
        let mut lines = vec![
            format!("Status: {}", self.status),
            format!("{} count: {}", check.label(), self.item_count),
        ];

        if self.item_count > 0 {
            lines.push(format!(
                "First {} {}: {}",
                check.item_noun(),
                check.sample_field,
                display_sample(self.sample_value.as_ref())
            ));
        }

        lines
    }
}

/// Render a sampled value: bare strings, JSON for everything else, `None` when absent
pub fn display_sample(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "None".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
