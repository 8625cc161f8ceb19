//! Platform-keyed configuration templates and their shape validators.

mod kind;
mod tables;
mod validate;


//--------------------------------------------------------------------------------------------------
// Re-Exports
//--------------------------------------------------------------------------------------------------

pub use kind::ConfigKind;
pub use tables::{
    all_templates, claude_settings_template, mcp_template, statusline_template, template,
};
pub use validate::{validate_template, validate_template_named, validation_issues};
