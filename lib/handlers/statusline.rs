//! Statusline command handler.

use std::io::Read;

use crate::error::PlatformResult;
use crate::statusline::{LocalStatus, StatuslineReport};

use super::print_json;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Read a session context from stdin and print the resolved mode with the
/// normalized record.
pub fn statusline_data() -> PlatformResult<()> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;

    let local = LocalStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        ..Default::default()
    };

    print_json(&StatuslineReport::from_input(&input, local))
}
