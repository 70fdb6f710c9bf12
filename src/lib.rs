//! kbhub - Knowledge hub content layer
//!
//! A read-only knowledge base organised as groups > subsections > articles,
//! with tag-aware search and navigation queries.
//!
//! ## Key Concepts
//!
//! - **ContentStore**: immutable in-memory dataset (builtin seed or JSON file)
//! - **Queries**: pure lookups returning borrowed data, stable ordering
//! - **Search**: group/tag/text filters, match classification and snippets
//! - **Backends**: the same queries served locally or from a remote kbh server
//!
//! The `kbh` binary exposes the queries as CLI commands, an MCP stdio server
//! and a JSON HTTP API.

pub mod cli;
pub mod config;
pub mod core;
pub mod mcp;
pub mod remote;
pub mod server;

pub use crate::core::backend::{ContentBackend, LocalBackend, RemoteBackend};
pub use crate::core::content::{Article, Group, GroupInfo, Subsection, Tag, UpdateEntry, UpdateKind};
pub use crate::core::error::{KbError, Result};
pub use crate::core::search::{search, SearchFilters, SearchMode, SearchResult, SortOrder};
pub use crate::core::store::{ContentStore, Dataset};
pub use crate::mcp::run_mcp_server;
pub use crate::remote::RemoteClient;
