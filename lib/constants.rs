//! Constants for moai-platform.
//!
//! Conventional artifact locations, environment variables and the fixed
//! MCP server catalogue.

//--------------------------------------------------------------------------------------------------
// Constants: Artifacts
//--------------------------------------------------------------------------------------------------

/// MCP server manifest, relative to the project root.
pub const MCP_CONFIG_FILE: &str = ".mcp.json";

/// Directory holding Claude settings, relative to the project root.
pub const CLAUDE_DIR: &str = ".claude";

/// Claude settings file inside [`CLAUDE_DIR`].
pub const CLAUDE_SETTINGS_FILE: &str = "settings.json";

/// Statusline launch spec inside [`CLAUDE_DIR`].
pub const STATUSLINE_CONFIG_FILE: &str = "statusline.json";

/// Infix between the original file name and the timestamp of a backup.
pub const BACKUP_INFIX: &str = ".backup.";

/// Suffix of the scratch file used for atomic writes.
pub const TEMP_SUFFIX: &str = ".tmp";

//--------------------------------------------------------------------------------------------------
// Constants: Environment
//--------------------------------------------------------------------------------------------------

/// Overrides the raw OS identifier (`win32`, `darwin`, `linux`, ...).
pub const PLATFORM_OVERRIDE_ENV: &str = "MOAI_PLATFORM";

/// Statusline mode used when the session context does not carry one.
pub const STATUSLINE_MODE_ENV: &str = "MOAI_STATUSLINE_MODE";

//--------------------------------------------------------------------------------------------------
// Constants: MCP Servers
//--------------------------------------------------------------------------------------------------

/// Launcher token every MCP server invocation goes through.
pub const NPX_TOKEN: &str = "npx";

/// MCP servers every generated manifest carries, with their package identifiers.
pub const KNOWN_MCP_SERVERS: [(&str, &str); 3] = [
    ("context7", "@upstash/context7-mcp@latest"),
    ("playwright", "playwright-bdd@latest"),
    (
        "figma-dev-mode-mcp-server",
        "figma-dev-mode-mcp-server@latest",
    ),
];

//--------------------------------------------------------------------------------------------------
// Constants: Statusline
//--------------------------------------------------------------------------------------------------

/// Statusline launch on windows: direct module invocation.
pub const WINDOWS_STATUSLINE_COMMAND: &str = "python";

/// Arguments for [`WINDOWS_STATUSLINE_COMMAND`].
pub const WINDOWS_STATUSLINE_ARGS: &[&str] = &["-m", "moai_adk.statusline.main"];

/// Statusline launch elsewhere: wrapped runner.
pub const UNIX_STATUSLINE_COMMAND: &str = "uv";

/// Arguments for [`UNIX_STATUSLINE_COMMAND`].
pub const UNIX_STATUSLINE_ARGS: &[&str] = &["run", "moai-adk", "statusline"];

/// Statusline startup budget in milliseconds.
pub const STATUSLINE_STARTUP_TIMEOUT_MS: i64 = 100;
