//! The MCP protocol layer: JSON-RPC envelope types, the schema walker, the
//! tool registry with its adapters, and the stdio server loop.

pub mod adapters;
pub mod protocol;
pub mod schema;
pub mod server;
pub mod tools;
