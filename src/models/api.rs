use serde::{Deserialize, Serialize};

use super::channel::{Channel, SourceStat};

/// Output format of the aggregate endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    M3u,
}

impl OutputFormat {
    /// Anything other than `m3u` falls back to JSON
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("m3u") => OutputFormat::M3u,
            _ => OutputFormat::Json,
        }
    }
}

/// Query params for GET /api/aggregate
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AggregateQuery {
    pub format: Option<String>,
    pub refresh: Option<String>,
}

impl AggregateQuery {
    /// Parse a raw query string; the first occurrence of a key wins and
    /// anything unrecognised is ignored, so this never fails
    pub fn from_query_string(query: Option<&str>) -> Self {
        let mut parsed = Self::default();

        for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "format" if parsed.format.is_none() => parsed.format = Some(value.into_owned()),
                "refresh" if parsed.refresh.is_none() => parsed.refresh = Some(value.into_owned()),
                _ => {}
            }
        }

        parsed
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_param(self.format.as_deref())
    }

    /// Only the literal `true` requests a refresh
    pub fn wants_refresh(&self) -> bool {
        self.refresh.as_deref() == Some("true")
    }
}

/// JSON envelope of the aggregate endpoint
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResponse {
    pub success: bool,
    pub total_channels: usize,
    pub last_updated: Option<String>,
    pub sources: Vec<SourceStat>,
    pub channels: Vec<Channel>,
}

/// Body of POST /api/sources
#[derive(Debug, Deserialize)]
pub struct CreateSourceRequest {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of PATCH /api/sources/:id
#[derive(Debug, Deserialize)]
pub struct UpdateSourceRequest {
    pub is_active: bool,
}

/// Body of POST /api/sources/verify-password
#[derive(Debug, Deserialize)]
pub struct VerifyPasswordRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyPasswordResponse {
    pub success: bool,
    pub valid: bool,
}
