//! `moai-platform` library.
//!
//! Detects the host OS and generates, applies and rolls back the MCP
//! manifest, statusline launch spec and Claude settings fragment for it.

mod macros;

pub mod backup;
pub mod commands;
pub mod constants;
pub mod diff;
pub mod document;
pub mod error;
pub mod generator;
pub mod handlers;
pub mod platform;
pub mod setup;
pub mod statusline;
pub mod styles;
pub mod templates;

//--------------------------------------------------------------------------------------------------
// Re-Exports
//--------------------------------------------------------------------------------------------------

pub use commands::*;
pub use constants::*;
pub use diff::*;
pub use document::*;
pub use error::*;
pub use generator::*;
pub use platform::*;
pub use setup::*;
pub use statusline::*;
pub use templates::*;
