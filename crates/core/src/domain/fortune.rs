use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const FALLBACK_FORTUNE: &str =
    "The spirits are too busy watching octopus videos! Try again later! 🔮";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FortuneRecord {
    pub fortune: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lucky_numbers: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lucky_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FortuneRecord {
    pub fn generated(
        fortune: String,
        theme: &str,
        style: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            fortune,
            theme: Some(theme.to_string()),
            style: Some(style.to_string()),
            timestamp,
            lucky_numbers: None,
            lucky_color: None,
            error: None,
        }
    }

    /// Record served when generation fails. Theme and style are left out.
    pub fn fallback(error: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            fortune: FALLBACK_FORTUNE.to_string(),
            theme: None,
            style: None,
            timestamp,
            lucky_numbers: None,
            lucky_color: None,
            error: Some(error),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub fortunes: Vec<FortuneRecord>,
    pub count: usize,
}

impl From<Vec<FortuneRecord>> for BatchResponse {
    fn from(fortunes: Vec<FortuneRecord>) -> Self {
        Self {
            count: fortunes.len(),
            fortunes,
        }
    }
}
