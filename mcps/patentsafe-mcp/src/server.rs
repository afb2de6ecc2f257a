//! MCP server implementation for PatentSafe
//!
//! Exposes document retrieval, full-text search with pagination, scraped
//! document text, and the in-tray listings as MCP tools. Tool responses
//! are pretty-printed JSON (or plain text for document text), truncated
//! to the configured response size limit.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::client::{PatentSafeClient, SearchRequest};
use crate::config::Config;
use crate::pagination::Paginator;
use crate::scrape;
use crate::types::{ConnectionInfo, DocumentLocation, PsError};

/// The main PatentSafe MCP Server
#[derive(Clone)]
pub struct PatentSafeMcpServer {
    client: Arc<PatentSafeClient>,
    paginator: Arc<Paginator>,
    connection: Arc<ConnectionInfo>,
    config: Config,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Parameter Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetDocumentParams {
    #[schemars(description = "The ID of the document to get")]
    pub document_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ReadDocumentTextParams {
    #[schemars(description = "The ID of the document to read")]
    pub document_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchDocumentsParams {
    #[schemars(description = "Lucene query string for full text search. The simplest query is \
        the text to search for, e.g. `red cabbage`. Combine terms with AND/OR, e.g. \
        `red cabbage AND green beans`. Metadata tags can be filtered with `tag-$NAME:...`, \
        e.g. `tag-rating:5`.")]
    pub lucene_query: String,

    #[schemars(description = "Only return documents authored by this user ID")]
    pub author_id: Option<String>,

    #[schemars(description = "Earliest submission date to include, ISO 8601 \
        (e.g. 2023-01-01T00:00:00Z)")]
    pub submission_date_range_start: Option<String>,

    #[schemars(description = "Latest submission date to include, ISO 8601 \
        (e.g. 2023-12-31T23:59:59Z)")]
    pub submission_date_range_end: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListDocumentsParams {
    #[schemars(description = "Location to list documents from: personal-intray, \
        global-intray, or library")]
    pub location: DocumentLocation,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct NextPageParams {
    #[schemars(description = "Pagination token from a previous search_documents response")]
    pub next_page_token: String,
}

// ============================================================================
// Helpers
// ============================================================================

fn ps_error_to_mcp(err: PsError) -> McpError {
    match &err {
        PsError::InvalidQuery(_)
        | PsError::InvalidLocation(_)
        | PsError::InvalidDate(_)
        | PsError::UnknownPageToken => McpError::invalid_params(err.to_string(), None),
        PsError::NotFound | PsError::AccessDenied | PsError::Unauthorized => {
            McpError::invalid_request(err.to_string(), None)
        }
        _ => McpError::internal_error(err.to_string(), None),
    }
}

fn parse_date(label: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>, PsError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|_| PsError::InvalidDate(format!("{label}={raw}")))
}

/// Cut `text` down to at most `max_chars` characters, on a character
/// boundary, with an elision marker when anything was dropped.
pub fn truncate_chars(text: String, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text;
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str("\n... (response truncated)");
    truncated
}

// ============================================================================
// Tool Router Implementation
// ============================================================================

#[tool_router]
impl PatentSafeMcpServer {
    pub fn new(config: Config, client: PatentSafeClient, connection: ConnectionInfo) -> Self {
        Self {
            client: Arc::new(client),
            paginator: Arc::new(Paginator::new(config.page_size)),
            connection: Arc::new(connection),
            config,
            tool_router: Self::tool_router(),
        }
    }

    fn json_response<T: serde::Serialize>(&self, data: &T) -> Result<CallToolResult, McpError> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let json = truncate_chars(json, self.config.max_response_chars);
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    fn text_response(&self, text: String) -> CallToolResult {
        CallToolResult::success(vec![Content::text(truncate_chars(
            text,
            self.config.max_response_chars,
        ))])
    }

    #[tool(description = "Get a document by its ID, including metadata and text content.")]
    async fn get_document(
        &self,
        Parameters(params): Parameters<GetDocumentParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(document_id = %params.document_id, "fetching document");

        let document = self
            .client
            .get_document(&params.document_id)
            .await
            .map_err(ps_error_to_mcp)?;

        self.json_response(&document)
    }

    #[tool(description = "Read the rendered text content of a document by its ID.")]
    async fn read_document_text(
        &self,
        Parameters(params): Parameters<ReadDocumentTextParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(document_id = %params.document_id, "reading document text");

        let html = self
            .client
            .document_text_page(&params.document_id)
            .await
            .map_err(ps_error_to_mcp)?;
        let text = scrape::document_text(&html).map_err(ps_error_to_mcp)?;

        Ok(self.text_response(text))
    }

    #[tool(description = "Search documents with a Lucene full-text query, optionally filtered \
        by author and submission date range. Large result sets are paginated: when the \
        response carries a next_page_token, pass it to search_documents_next_page to \
        continue. When citing a document, link its ID using the citation pattern given \
        in the server instructions.")]
    async fn search_documents(
        &self,
        Parameters(params): Parameters<SearchDocumentsParams>,
    ) -> Result<CallToolResult, McpError> {
        let start = parse_date(
            "submission_date_range_start",
            params.submission_date_range_start.as_deref(),
        )
        .map_err(ps_error_to_mcp)?;
        let end = parse_date(
            "submission_date_range_end",
            params.submission_date_range_end.as_deref(),
        )
        .map_err(ps_error_to_mcp)?;

        tracing::info!(query = %params.lucene_query, "searching documents");

        let request = SearchRequest {
            lucene_query: params.lucene_query,
            author_id: params.author_id,
            submission_date_range_start: start,
            submission_date_range_end: end,
        };

        let documents = self
            .client
            .search_documents(&request)
            .await
            .map_err(ps_error_to_mcp)?;

        let total = documents.len();
        let page = self.paginator.paginate(documents, total);
        self.json_response(&page)
    }

    #[tool(description = "Get the next page of results for a previous search_documents call.")]
    async fn search_documents_next_page(
        &self,
        Parameters(params): Parameters<NextPageParams>,
    ) -> Result<CallToolResult, McpError> {
        let page = self
            .paginator
            .next_page(&params.next_page_token)
            .map_err(ps_error_to_mcp)?;
        self.json_response(&page)
    }

    #[tool(description = "List documents from a server-side location: personal-intray, \
        global-intray, or library.")]
    async fn list_documents(
        &self,
        Parameters(params): Parameters<ListDocumentsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(location = %params.location, "listing documents");

        let documents = self
            .client
            .list_documents(params.location)
            .await
            .map_err(ps_error_to_mcp)?;
        self.json_response(&documents)
    }

    #[tool(description = "List all documents in the global in-tray accessible to the current user.")]
    async fn list_global_intray(&self) -> Result<CallToolResult, McpError> {
        let html = self
            .client
            .global_intray_page()
            .await
            .map_err(ps_error_to_mcp)?;
        let entries = scrape::intray_rows(&html, "documents").map_err(ps_error_to_mcp)?;
        self.json_response(&entries)
    }

    #[tool(description = "List all documents in the current user's personal in-tray.")]
    async fn list_my_intray(&self) -> Result<CallToolResult, McpError> {
        let html = self.client.overview_page().await.map_err(ps_error_to_mcp)?;
        let entries = scrape::intray_rows(&html, "bits").map_err(ps_error_to_mcp)?;
        self.json_response(&entries)
    }

    #[tool(description = "List all documents in all users' in-trays (requires admin access).")]
    async fn list_all_intrays(&self) -> Result<CallToolResult, McpError> {
        let html = self.client.overview_page().await.map_err(ps_error_to_mcp)?;
        let trays = scrape::all_intrays(&html).map_err(ps_error_to_mcp)?;
        self.json_response(&trays)
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for PatentSafeMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut fields = self.connection.metadata_fields.clone();
        fields.sort();

        let instructions = format!(
            "PatentSafe MCP Server connected to {base} (server version {version}, \
             user {user}). Provides document retrieval, Lucene full-text search, and \
             in-tray listings.\n\n\
             When mentioning a document you MUST make its ID a Markdown link using the \
             pattern `[ID]({base}/ps/experiment/view/ID)`, and include such a citation \
             whenever information from a document is used.\n\n\
             Metadata fields available for `tag-$NAME:...` search filters: {fields}.",
            base = self.config.base_url,
            version = self.connection.server_version,
            user = self.connection.user_id,
            fields = fields.join(", "),
        );

        ServerInfo {
            instructions: Some(instructions),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
