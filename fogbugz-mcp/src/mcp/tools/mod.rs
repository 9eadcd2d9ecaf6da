//! Documentation tools exposed over MCP
//!
//! Each tool lives in its own submodule next to a `description.md` that is
//! compiled in as the tool description.

pub mod agent;
pub mod articles;
pub mod ping;
pub mod wikis;
