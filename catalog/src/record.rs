//! Job records as served by the catalog.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Catalog-assigned identifier of a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobId {
    Number(i64),
    Text(String),
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Number(n) => write!(f, "{n}"),
            JobId::Text(s) => f.write_str(s),
        }
    }
}

/// A job posting.
///
/// The fields used for matching are named; everything else the catalog sends
/// is kept in `extra` so a record serializes back to what was fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<JobId>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub job_title: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub company: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub requirements: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub location: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobRecord {
    pub fn title(&self) -> &str {
        self.job_title.as_deref().unwrap_or_default()
    }

    pub fn company(&self) -> &str {
        self.company.as_deref().unwrap_or_default()
    }

    /// The text that gets embedded for this job.
    ///
    /// Field order and labels are fixed; a missing field still produces its
    /// line with an empty value. Changing this invalidates every index built
    /// with the previous layout.
    pub fn compose_text(&self) -> String {
        format!(
            "Job Title: {}\nCompany: {}\nDescription: {}\nRequirements: {}\nLocation: {}",
            self.title(),
            self.company(),
            self.description.as_deref().unwrap_or_default(),
            self.requirements.as_deref().unwrap_or_default(),
            self.location.as_deref().unwrap_or_default(),
        )
    }
}

/// Accepts strings as-is and renders other scalars and lists as text.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| render(&value)))
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| render(item).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}
