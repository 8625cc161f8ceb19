//! Configuration document kinds.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CLAUDE_DIR, CLAUDE_SETTINGS_FILE, MCP_CONFIG_FILE, STATUSLINE_CONFIG_FILE,
};
use crate::error::PlatformError;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The three kinds of generated documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigKind {
    /// MCP server manifest (`.mcp.json`).
    Mcp,
    /// Statusline launch spec (`.claude/statusline.json`).
    Statusline,
    /// Claude settings fragment (`.claude/settings.json`).
    ClaudeSettings,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ConfigKind {
    pub const ALL: [ConfigKind; 3] = [Self::Mcp, Self::Statusline, Self::ClaudeSettings];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mcp => "mcp",
            Self::Statusline => "statusline",
            Self::ClaudeSettings => "claude_settings",
        }
    }

    /// Conventional location of this kind's artifact under a project root.
    pub fn artifact_path(&self, base: &Path) -> PathBuf {
        match self {
            Self::Mcp => base.join(MCP_CONFIG_FILE),
            Self::Statusline => base.join(CLAUDE_DIR).join(STATUSLINE_CONFIG_FILE),
            Self::ClaudeSettings => base.join(CLAUDE_DIR).join(CLAUDE_SETTINGS_FILE),
        }
    }

    /// Whether the artifact lives in the `.claude` directory.
    pub fn in_claude_dir(&self) -> bool {
        !matches!(self, Self::Mcp)
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl FromStr for ConfigKind {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mcp" => Ok(Self::Mcp),
            "statusline" => Ok(Self::Statusline),
            "claude_settings" | "claude-settings" => Ok(Self::ClaudeSettings),
            _ => Err(PlatformError::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
