use crate::llm::Provider;
use serde_json::Value;
use std::fmt;

/// Where in the round trip a provider call went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Provider answered with a non-success status.
    Http,
    /// Response decoded but carried no usable text.
    Decode,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => f.write_str("http"),
            Self::Decode => f.write_str("decode"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmDiagnosticsError {
    pub provider: Provider,
    pub stage: Stage,
    pub detail: String,
    pub raw_output: Option<String>,
    pub raw_response_json: Option<Value>,
}

impl LlmDiagnosticsError {
    pub fn http(provider: Provider, status: reqwest::StatusCode, body: String) -> Self {
        Self {
            provider,
            stage: Stage::Http,
            detail: format!("status={status}"),
            raw_response_json: serde_json::from_str(&body).ok(),
            raw_output: Some(body),
        }
    }

    pub fn decode(provider: Provider, detail: impl Into<String>) -> Self {
        Self {
            provider,
            stage: Stage::Decode,
            detail: detail.into(),
            raw_output: None,
            raw_response_json: None,
        }
    }
}

impl fmt::Display for LlmDiagnosticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {} error: {}",
            self.provider, self.stage, self.detail
        )?;
        if let Some(message) = self
            .raw_response_json
            .as_ref()
            .and_then(|v| v.pointer("/error/message"))
            .and_then(Value::as_str)
        {
            write!(f, " ({message})")?;
        }
        Ok(())
    }
}

impl std::error::Error for LlmDiagnosticsError {}
