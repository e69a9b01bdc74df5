//! MCP (Model Context Protocol) surface for spotify-mcp.
//!
//! Exposes the Spotify tools to an orchestrating agent as JSON-RPC 2.0 over
//! stdio. Every tool call is answered with a text envelope; failures set
//! `isError` instead of surfacing as protocol errors.

mod dispatch;
pub mod protocol;
mod server;
pub mod tools;
pub mod validate;

pub use dispatch::Gateway;
pub use server::McpServer;
