//! PatentSafe MCP Library
//!
//! MCP server exposing a PatentSafe instance to LLM clients: document
//! retrieval, Lucene full-text search with pagination, scraped document
//! text, and in-tray listings.

pub mod client;
pub mod config;
pub mod logging;
pub mod pagination;
pub mod scrape;
pub mod server;
pub mod types;

pub use client::PatentSafeClient;
pub use config::Config;
pub use server::PatentSafeMcpServer;
