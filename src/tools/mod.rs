//! MCP tool implementations
//!
//! Each tool is a plain function over the journal controller, returning
//! serializable responses or a `String` error. The MCP layer wraps these
//! into protocol results.

pub mod data;
pub mod days;
pub mod presets;
pub mod progress;
pub mod status;
pub mod sync;
