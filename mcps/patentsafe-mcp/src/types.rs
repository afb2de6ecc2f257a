//! Type definitions for the PatentSafe MCP server

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// Wire Types
// ============================================================================

/// Server metadata returned by the `/api/mcp/connect` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub server_version: String,
    pub user_id: String,
    pub context_header: String,
    pub metadata_fields: Vec<String>,
}

/// A PatentSafe document with its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub text: String,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub location: String,
    pub author_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_values: Option<HashMap<String, Value>>,
}

/// Server-side document locations that can be listed over REST
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentLocation {
    PersonalIntray,
    GlobalIntray,
    Library,
}

impl DocumentLocation {
    /// Path segment used by `/api/mcp/documents/list/{location}`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PersonalIntray => "personal-intray",
            Self::GlobalIntray => "global-intray",
            Self::Library => "library",
        }
    }
}

impl std::fmt::Display for DocumentLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of an in-tray table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrayEntry {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Per-user in-tray listings, keyed by username (admin view)
pub type UserIntrays = BTreeMap<String, Vec<IntrayEntry>>;

/// One page of search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    pub documents: Vec<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    pub total: usize,
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum PsError {
    #[error("authentication failed - invalid token")]
    AuthenticationFailed,

    #[error("invalid PatentSafe URL")]
    InvalidUrl,

    #[error("document not found or access denied")]
    NotFound,

    #[error("unauthorized - invalid user ID")]
    Unauthorized,

    #[error("access denied")]
    AccessDenied,

    #[error("invalid search query: {0}")]
    InvalidQuery(String),

    #[error("invalid location: {0}")]
    InvalidLocation(String),

    #[error("unexpected response ({status}): {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Scrape(String),

    #[error("unknown or expired page token")]
    UnknownPageToken,

    #[error("invalid date '{0}': expected ISO 8601 (e.g. 2023-01-01T00:00:00Z)")]
    InvalidDate(String),
}
