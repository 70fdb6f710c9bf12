//! MCP (Model Context Protocol) Server
//!
//! Exposes the knowledge base to AI clients over stdio.
//!
//! # Tools
//! - `kb_list_groups` - Top-level groups
//! - `kb_list_subsections` - Subsections of a group
//! - `kb_get_subsection` - Subsection and its articles
//! - `kb_list_articles` - Articles of a subsection
//! - `kb_get_article` - Single article by slug
//! - `kb_popular` / `kb_recent` - Ranked article lists
//! - `kb_related` - Articles sharing tags
//! - `kb_search` - Filtered search over articles and subsections
//! - `kb_whats_new` - Update feed
//! - `kb_list_tags` - Tag catalogue

mod handlers;
mod jsonrpc;
mod server;
mod tools;

pub use jsonrpc::{JsonRpcRequest, JsonRpcResponse};
pub use server::{run_mcp_server, serve, McpServer};
