//! Canonical template documents.
//!
//! The table is built once on first use and never mutated. Every accessor
//! returns a deep copy.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::kind::ConfigKind;
use crate::constants::{
    KNOWN_MCP_SERVERS, NPX_TOKEN, STATUSLINE_STARTUP_TIMEOUT_MS, UNIX_STATUSLINE_ARGS,
    UNIX_STATUSLINE_COMMAND, WINDOWS_STATUSLINE_ARGS, WINDOWS_STATUSLINE_COMMAND,
};
use crate::document::{ConfigDocument, ConfigValue};
use crate::platform::{PlatformKey, execution_config};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

static TEMPLATES: LazyLock<BTreeMap<(PlatformKey, ConfigKind), ConfigDocument>> =
    LazyLock::new(|| {
        let mut table = BTreeMap::new();
        for platform in PlatformKey::supported() {
            table.insert((*platform, ConfigKind::Mcp), build_mcp(*platform));
            table.insert((*platform, ConfigKind::Statusline), build_statusline(*platform));
            table.insert(
                (*platform, ConfigKind::ClaudeSettings),
                build_claude_settings(*platform),
            );
        }
        table
    });

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Template for `(platform, kind)`. Unknown platforms get linux's template.
pub fn template(platform: PlatformKey, kind: ConfigKind) -> ConfigDocument {
    TEMPLATES
        .get(&(platform.template_key(), kind))
        .cloned()
        .unwrap_or_default()
}

pub fn mcp_template(platform: PlatformKey) -> ConfigDocument {
    template(platform, ConfigKind::Mcp)
}

pub fn statusline_template(platform: PlatformKey) -> ConfigDocument {
    template(platform, ConfigKind::Statusline)
}

pub fn claude_settings_template(platform: PlatformKey) -> ConfigDocument {
    template(platform, ConfigKind::ClaudeSettings)
}

/// All three templates for a platform, keyed by kind.
pub fn all_templates(platform: PlatformKey) -> BTreeMap<ConfigKind, ConfigDocument> {
    ConfigKind::ALL
        .into_iter()
        .map(|kind| (kind, template(platform, kind)))
        .collect()
}

fn build_mcp(platform: PlatformKey) -> ConfigDocument {
    let exec = execution_config(platform);

    let servers = KNOWN_MCP_SERVERS
        .iter()
        .map(|&(name, package)| {
            let entry = ConfigValue::mapping([
                ("command", ConfigValue::from(exec.command.as_str())),
                (
                    "args",
                    ConfigValue::strings(&[exec.shell_flag(), NPX_TOKEN, "-y", package]),
                ),
            ]);
            (name.to_string(), entry)
        })
        .collect::<BTreeMap<_, _>>();

    [("mcpServers", ConfigValue::from(servers))]
        .into_iter()
        .collect()
}

/// Windows launches the statusline module directly; other platforms go
/// through the `uv` runner.
fn statusline_launch(platform: PlatformKey) -> (&'static str, &'static [&'static str]) {
    match platform {
        PlatformKey::Windows => (WINDOWS_STATUSLINE_COMMAND, WINDOWS_STATUSLINE_ARGS),
        _ => (UNIX_STATUSLINE_COMMAND, UNIX_STATUSLINE_ARGS),
    }
}

fn build_statusline(platform: PlatformKey) -> ConfigDocument {
    let (command, args) = statusline_launch(platform);
    let exec = execution_config(platform);

    [
        ("command", ConfigValue::from(command)),
        ("args", ConfigValue::strings(args)),
        ("enabled", ConfigValue::from(true)),
        ("mode", ConfigValue::from("extended")),
        ("update_check", ConfigValue::from(true)),
        (
            "performance",
            ConfigValue::mapping([
                ("cache_enabled", ConfigValue::from(true)),
                (
                    "startup_timeout",
                    ConfigValue::from(STATUSLINE_STARTUP_TIMEOUT_MS),
                ),
                ("fast_startup", ConfigValue::from(exec.fast_startup)),
            ]),
        ),
    ]
    .into_iter()
    .collect()
}

fn build_claude_settings(platform: PlatformKey) -> ConfigDocument {
    let (command, args) = statusline_launch(platform);

    let statusline = ConfigValue::mapping([
        ("command", ConfigValue::from(command)),
        ("args", ConfigValue::strings(args)),
    ]);

    [(
        "claude",
        ConfigValue::mapping([("statusline", statusline)]),
    )]
    .into_iter()
    .collect()
}
