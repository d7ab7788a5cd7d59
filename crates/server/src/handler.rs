//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::{
    BookSearchParams, BookSectionParams, BookTocParams, CachePurgeParams, CacheStatusParams, purge_impl,
    search_impl, section_impl, status_impl, toc_impl,
};
use folio_client::{HttpFetcher, Library};
use folio_core::AppConfig;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for folio.
#[derive(Clone)]
pub struct FolioServer {
    tool_router: ToolRouter<Self>,
    library: Library<HttpFetcher>,
    config: Arc<AppConfig>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl FolioServer {
    /// Create a new server handler.
    pub fn new(library: Library<HttpFetcher>, config: AppConfig) -> Self {
        Self { tool_router: Self::tool_router(), library, config: Arc::new(config) }
    }

    #[tool(
        description = "Search a book. Returns sections ranked by how well their titles, keywords, summary and content match the query, with book$<bookId>$<sectionId> locations."
    )]
    async fn book_search(&self, params: Parameters<BookSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.library, &self.config, params.0).await
    }

    #[tool(description = "Get a book's metadata and its chapter/section outline.")]
    async fn book_toc(&self, params: Parameters<BookTocParams>) -> Result<CallToolResult, McpError> {
        toc_impl(&self.library, &self.config, params.0).await
    }

    /// Unresolvable location fragments land on the first section, like the reader does.
    #[tool(
        description = "Read one section of a book by section id or book$<bookId>$<sectionId> location. Returns its full content and neighbouring section ids."
    )]
    async fn book_section(&self, params: Parameters<BookSectionParams>) -> Result<CallToolResult, McpError> {
        section_impl(&self.library, &self.config, params.0).await
    }

    #[tool(description = "Show the state of cached book documents (idle, loading, resolved).")]
    async fn cache_status(&self, params: Parameters<CacheStatusParams>) -> Result<CallToolResult, McpError> {
        status_impl(&self.library, params.0).await
    }

    #[tool(description = "Drop a cached book, or every cached book, so the next request fetches it again.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.library, &self.config, params.0).await
    }
}

impl ServerHandler for FolioServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "folio-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Search and read structured books. Tools take an optional `url`; the configured book is used when it is omitted."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
