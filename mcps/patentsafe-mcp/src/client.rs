//! HTTP client for the PatentSafe REST and HTML endpoints
//!
//! The REST surface lives under `/api/mcp` and speaks JSON with Bearer
//! auth. Document text and the in-tray listings have no JSON endpoint;
//! those come back as HTML pages that `scrape` picks apart.

use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;

use crate::config::Config;
use crate::types::{ConnectionInfo, Document, DocumentLocation, PsError};

/// Search request body for `POST /api/mcp/documents/search`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub lucene_query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_date_range_start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_date_range_end: Option<DateTime<Utc>>,
}

/// Client for a single PatentSafe instance
#[derive(Debug, Clone)]
pub struct PatentSafeClient {
    http: Client,
    base_url: String,
    auth_token: String,
}

impl PatentSafeClient {
    pub fn new(config: &Config) -> Result<Self, PsError> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("patentsafe-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/mcp{}", self.base_url, path)
    }

    /// Verify the connection and fetch server metadata. Called once at
    /// startup; a failure here aborts the server.
    pub async fn connect(&self) -> Result<ConnectionInfo, PsError> {
        let response = self
            .http
            .get(self.api_url("/connect"))
            .bearer_auth(&self.auth_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(connect_error(status, body_snippet(response).await));
        }

        Ok(response.json().await?)
    }

    /// Fetch a document by ID from the REST endpoint
    pub async fn get_document(&self, document_id: &str) -> Result<Document, PsError> {
        let response = self
            .http
            .get(self.api_url(&format!("/documents/{}", document_id)))
            .bearer_auth(&self.auth_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(document_error(status, body_snippet(response).await));
        }

        Ok(response.json().await?)
    }

    /// List the documents held at a server-side location. The payload is
    /// location-dependent, so it is passed through as raw JSON objects.
    pub async fn list_documents(
        &self,
        location: DocumentLocation,
    ) -> Result<Vec<serde_json::Value>, PsError> {
        let response = self
            .http
            .get(self.api_url(&format!("/documents/list/{}", location)))
            .bearer_auth(&self.auth_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(list_error(status, body_snippet(response).await, location));
        }

        Ok(response.json().await?)
    }

    /// Full-text search; the endpoint returns the complete match list,
    /// pagination happens on our side.
    pub async fn search_documents(&self, request: &SearchRequest) -> Result<Vec<Document>, PsError> {
        let response = self
            .http
            .post(self.api_url("/documents/search"))
            .bearer_auth(&self.auth_token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(search_error(status, body_snippet(response).await));
        }

        Ok(response.json().await?)
    }

    /// HTML page holding the rendered document text
    pub async fn document_text_page(&self, document_id: &str) -> Result<String, PsError> {
        self.html_page("/documents/text.html", &[("docId", document_id)])
            .await
    }

    /// HTML page listing the global in-tray
    pub async fn global_intray_page(&self) -> Result<String, PsError> {
        self.html_page("/in-tray/global.html", &[]).await
    }

    /// HTML overview page: the user's own in-tray, plus all users'
    /// in-trays when the account has admin access
    pub async fn overview_page(&self) -> Result<String, PsError> {
        self.html_page("/create/overview.html", &[]).await
    }

    async fn html_page(&self, path: &str, query: &[(&str, &str)]) -> Result<String, PsError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .bearer_auth(&self.auth_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(document_error(status, body_snippet(response).await));
        }

        Ok(response.text().await?)
    }
}

/// First part of an error response body, for diagnostics
async fn body_snippet(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    body.chars().take(200).collect()
}

// Status-to-error mapping is kept as pure functions so the taxonomy is
// unit-testable without a live server.

fn connect_error(status: StatusCode, body: String) -> PsError {
    match status {
        StatusCode::UNAUTHORIZED => PsError::AuthenticationFailed,
        StatusCode::NOT_FOUND => PsError::InvalidUrl,
        _ => PsError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        },
    }
}

fn document_error(status: StatusCode, body: String) -> PsError {
    match status {
        StatusCode::NOT_FOUND => PsError::NotFound,
        StatusCode::UNAUTHORIZED => PsError::Unauthorized,
        StatusCode::FORBIDDEN => PsError::AccessDenied,
        _ => PsError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        },
    }
}

fn list_error(status: StatusCode, body: String, location: DocumentLocation) -> PsError {
    match status {
        StatusCode::UNAUTHORIZED => PsError::Unauthorized,
        StatusCode::BAD_REQUEST => PsError::InvalidLocation(location.to_string()),
        _ => PsError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        },
    }
}

fn search_error(status: StatusCode, body: String) -> PsError {
    match status {
        StatusCode::UNAUTHORIZED => PsError::Unauthorized,
        StatusCode::BAD_REQUEST => PsError::InvalidQuery(body),
        _ => PsError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_maps_auth_and_url_failures() {
        assert!(matches!(
            connect_error(StatusCode::UNAUTHORIZED, String::new()),
            PsError::AuthenticationFailed
        ));
        assert!(matches!(
            connect_error(StatusCode::NOT_FOUND, String::new()),
            PsError::InvalidUrl
        ));
        assert!(matches!(
            connect_error(StatusCode::INTERNAL_SERVER_ERROR, "boom".into()),
            PsError::UnexpectedStatus { status: 500, .. }
        ));
    }

    #[test]
    fn document_errors_follow_the_taxonomy() {
        assert!(matches!(
            document_error(StatusCode::NOT_FOUND, String::new()),
            PsError::NotFound
        ));
        assert!(matches!(
            document_error(StatusCode::UNAUTHORIZED, String::new()),
            PsError::Unauthorized
        ));
        assert!(matches!(
            document_error(StatusCode::FORBIDDEN, String::new()),
            PsError::AccessDenied
        ));
    }

    #[test]
    fn invalid_query_carries_the_server_message() {
        let err = search_error(StatusCode::BAD_REQUEST, "bad lucene syntax".into());
        match err {
            PsError::InvalidQuery(msg) => assert_eq!(msg, "bad lucene syntax"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn list_errors_name_the_rejected_location() {
        assert!(matches!(
            list_error(StatusCode::UNAUTHORIZED, String::new(), DocumentLocation::Library),
            PsError::Unauthorized
        ));

        let err = list_error(
            StatusCode::BAD_REQUEST,
            String::new(),
            DocumentLocation::GlobalIntray,
        );
        match err {
            PsError::InvalidLocation(loc) => assert_eq!(loc, "global-intray"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn search_request_serializes_camel_case_and_skips_none() {
        let request = SearchRequest {
            lucene_query: "red cabbage AND green beans".to_string(),
            author_id: Some("jcoles".to_string()),
            submission_date_range_start: None,
            submission_date_range_end: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["luceneQuery"], "red cabbage AND green beans");
        assert_eq!(json["authorId"], "jcoles");
        assert!(json.get("submissionDateRangeStart").is_none());
    }
}
