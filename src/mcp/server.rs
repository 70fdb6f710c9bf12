//! MCP Server implementation for the knowledge base
//!
//! Implements the Model Context Protocol (JSON-RPC 2.0) server directly
//! without external SDK dependencies. One request per line on stdin, one
//! response per line on stdout; diagnostics go through `tracing` (stderr).

use std::io::{BufRead, BufReader, Write};
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::handlers::dispatch_tool;
use super::jsonrpc::*;
use crate::config::QueryConfig;
use crate::core::store::ContentStore;

/// MCP Server handler
pub struct McpServer {
    store: Arc<ContentStore>,
    limits: QueryConfig,
    initialized: bool,
}

impl McpServer {
    pub fn new(store: Arc<ContentStore>, limits: QueryConfig) -> Self {
        Self {
            store,
            limits,
            initialized: false,
        }
    }

    /// Whether the client has sent `notifications/initialized`
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Handle a JSON-RPC request
    pub fn handle_request(&mut self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        // Notifications (no id) don't get responses
        let Some(id) = request.id.clone() else {
            match request.method.as_str() {
                "notifications/initialized" => {
                    self.initialized = true;
                    info!("MCP client initialized");
                }
                "notifications/cancelled" => debug!("MCP request cancelled"),
                other => warn!(method = other, "Unknown MCP notification"),
            }
            return None;
        };

        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(&request.params),
            "tools/list" => self.handle_list_tools(&request.params),
            "tools/call" => self.handle_call_tool(&request.params),
            "ping" => Ok(json!({})),
            _ => Err((
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            )),
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err((code, msg)) => JsonRpcResponse::error(id, code, msg),
        })
    }

    fn handle_initialize(&self, _params: &Value) -> Result<Value, (i64, String)> {
        Ok(json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            },
            "serverInfo": {
                "name": "kbhub",
                "version": env!("CARGO_PKG_VERSION")
            },
            "instructions": "kbhub is a read-only knowledge base organised as groups > subsections > articles. Use kb_search to find content, kb_get_article to read it, kb_list_groups and kb_list_subsections to browse."
        }))
    }

    fn handle_list_tools(&self, _params: &Value) -> Result<Value, (i64, String)> {
        Ok(json!({
            "tools": [
                {
                    "name": "kb_list_groups",
                    "description": "List the top-level groups (departments, resource-centre, tools) with their subsection counts.",
                    "inputSchema": { "type": "object", "properties": {} }
                },
                {
                    "name": "kb_list_subsections",
                    "description": "List subsections of a group. Example: kb_list_subsections({\"group\": \"departments\"})",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "group": { "type": "string", "enum": ["departments", "resource-centre", "tools"] }
                        },
                        "required": ["group"]
                    }
                },
                {
                    "name": "kb_get_subsection",
                    "description": "Get a subsection by slug together with its articles.",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "slug": { "type": "string", "description": "Subsection slug, e.g. 'it-devops'" }
                        },
                        "required": ["slug"]
                    }
                },
                {
                    "name": "kb_list_articles",
                    "description": "List the articles of a subsection.",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "subsection": { "type": "string", "description": "Subsection slug" }
                        },
                        "required": ["subsection"]
                    }
                },
                {
                    "name": "kb_get_article",
                    "description": "Get a single article by slug. Example: kb_get_article({\"slug\": \"kubernetes-basics\"})",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "slug": { "type": "string" },
                            "include_body": { "type": "boolean", "description": "Include the HTML body", "default": true }
                        },
                        "required": ["slug"]
                    }
                },
                {
                    "name": "kb_popular",
                    "description": "Most viewed articles.",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "limit": { "type": "integer", "description": "Max results (default: 6)" }
                        }
                    }
                },
                {
                    "name": "kb_recent",
                    "description": "Most recently updated articles.",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "limit": { "type": "integer", "description": "Max results (default: 6)" }
                        }
                    }
                },
                {
                    "name": "kb_related",
                    "description": "Articles sharing tags with the given tag ids, most shared tags first.",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "tags": { "type": "array", "items": { "type": "string" }, "description": "Tag ids" },
                            "exclude": { "type": "string", "description": "Article slug to leave out" },
                            "limit": { "type": "integer", "description": "Max results (default: 4)" }
                        },
                        "required": ["tags"]
                    }
                },
                {
                    "name": "kb_search",
                    "description": "Search articles and subsections. Example: kb_search({\"query\": \"kubernetes\", \"mode\": \"title\"})",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "query": { "type": "string", "description": "Case-insensitive substring" },
                            "mode": { "type": "string", "enum": ["all", "title", "tags", "content"], "default": "all" },
                            "tags": { "type": "array", "items": { "type": "string" }, "description": "Tag ids, any-of" },
                            "groups": { "type": "array", "items": { "type": "string" } },
                            "sort": { "type": "string", "enum": ["relevance", "date", "views"], "default": "relevance" }
                        }
                    }
                },
                {
                    "name": "kb_whats_new",
                    "description": "Update feed, newest first.",
                    "inputSchema": { "type": "object", "properties": {} }
                },
                {
                    "name": "kb_list_tags",
                    "description": "List all tags with their ids.",
                    "inputSchema": { "type": "object", "properties": {} }
                }
            ]
        }))
    }

    fn handle_call_tool(&mut self, params: &Value) -> Result<Value, (i64, String)> {
        let name = params["name"]
            .as_str()
            .ok_or((INVALID_PARAMS, "Missing tool name".to_string()))?;
        let arguments = &params["arguments"];

        debug!(tool = name, "MCP tool call");

        match dispatch_tool(&self.store, &self.limits, name, arguments) {
            Ok(text) => Ok(json!({
                "content": [{
                    "type": "text",
                    "text": text
                }]
            })),
            Err(e) => Ok(json!({
                "content": [{
                    "type": "text",
                    "text": format!("Error: {}", e)
                }],
                "isError": true
            })),
        }
    }
}

/// Serve requests from `reader` until EOF, writing responses to `writer`
pub fn serve<R: BufRead, W: Write>(
    server: &mut McpServer,
    reader: R,
    mut writer: W,
) -> anyhow::Result<()> {
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        debug!(request = %line.chars().take(100).collect::<String>(), "MCP received");

        let request: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                let response =
                    JsonRpcResponse::error(Value::Null, PARSE_ERROR, format!("Parse error: {}", e));
                writeln!(writer, "{}", serde_json::to_string(&response)?)?;
                writer.flush()?;
                continue;
            }
        };

        if let Some(response) = server.handle_request(&request) {
            let json = serde_json::to_string(&response)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// Run the MCP server over stdio
pub fn run_mcp_server(store: Arc<ContentStore>, limits: QueryConfig) -> anyhow::Result<()> {
    info!("kbh MCP server starting");

    let mut server = McpServer::new(store, limits);
    let stdin = std::io::stdin();
    let reader = BufReader::new(stdin.lock());
    serve(&mut server, reader, std::io::stdout())?;

    info!("kbh MCP server stopping");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> McpServer {
        McpServer::new(
            Arc::new(ContentStore::builtin().unwrap()),
            QueryConfig::default(),
        )
    }

    fn run_lines(input: &str) -> Vec<Value> {
        let mut server = server();
        let mut out = Vec::new();
        serve(&mut server, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_initialize_and_notification() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
            "\n"
        );
        let responses = run_lines(input);
        // The notification gets no response
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(responses[0]["result"]["serverInfo"]["name"], "kbhub");
        assert_eq!(responses[1]["id"], 2);
    }

    #[test]
    fn test_notification_marks_initialized() {
        let mut server = server();
        let request: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
                .unwrap();
        assert!(server.handle_request(&request).is_none());
        assert!(server.is_initialized());
    }

    #[test]
    fn test_tools_list_matches_dispatch() {
        let responses = run_lines(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#);
        let tools = responses[0]["result"]["tools"].as_array().unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, super::super::tools::TOOL_NAMES);
    }

    #[test]
    fn test_tool_call_not_found_is_not_an_error() {
        let responses = run_lines(
            r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"kb_get_article","arguments":{"slug":"nonexistent-slug"}}}"#,
        );
        let result = &responses[0]["result"];
        assert!(responses[0].get("error").is_none());
        assert!(result.get("isError").is_none());
        assert_eq!(
            result["content"][0]["text"],
            "Article not found: nonexistent-slug"
        );
    }

    #[test]
    fn test_unknown_tool_is_error_result() {
        let responses = run_lines(
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"kb_nope","arguments":{}}}"#,
        );
        assert_eq!(responses[0]["result"]["isError"], true);
    }

    #[test]
    fn test_missing_tool_name() {
        let responses =
            run_lines(r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{}}"#);
        assert_eq!(responses[0]["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn test_unknown_method_and_parse_error() {
        let input = "not json\n{\"jsonrpc\":\"2.0\",\"id\":4,\"method\":\"resources/list\"}\n";
        let responses = run_lines(input);
        assert_eq!(responses[0]["error"]["code"], PARSE_ERROR);
        assert_eq!(responses[0]["id"], Value::Null);
        assert_eq!(responses[1]["error"]["code"], METHOD_NOT_FOUND);
    }
}
