//! Required-shape checks for each document kind.
//!
//! Validators never fail; every mismatch becomes an issue string and the
//! boolean form is `issues.is_empty()`.

use std::collections::BTreeMap;

use super::kind::ConfigKind;
use crate::constants::{KNOWN_MCP_SERVERS, NPX_TOKEN};
use crate::document::{ConfigDocument, ConfigValue};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Whether `document` has the shape `kind` requires.
pub fn validate_template(document: &ConfigDocument, kind: ConfigKind) -> bool {
    validation_issues(document, kind).is_empty()
}

/// Like [`validate_template`] with a kind name. Unknown names are invalid.
pub fn validate_template_named(document: &ConfigDocument, kind: &str) -> bool {
    kind.parse::<ConfigKind>()
        .map(|kind| validate_template(document, kind))
        .unwrap_or(false)
}

/// Every reason `document` fails the shape check for `kind`.
pub fn validation_issues(document: &ConfigDocument, kind: ConfigKind) -> Vec<String> {
    let mut issues = Vec::new();
    match kind {
        ConfigKind::Mcp => check_mcp(document, &mut issues),
        ConfigKind::Statusline => {
            check_launch(document.as_map(), "", &mut issues);
        }
        ConfigKind::ClaudeSettings => check_claude_settings(document, &mut issues),
    }
    issues
}

fn check_mcp(document: &ConfigDocument, issues: &mut Vec<String>) {
    let Some(servers) = document.get("mcpServers") else {
        issues.push("missing required field `mcpServers`".into());
        return;
    };
    let Some(servers) = servers.as_mapping() else {
        issues.push("`mcpServers` must be a mapping".into());
        return;
    };

    for (name, package) in KNOWN_MCP_SERVERS {
        match servers.get(name) {
            None => issues.push(format!("missing server `{}`", name)),
            Some(entry) => check_mcp_server(name, package, entry, issues),
        }
    }

    for name in servers.keys() {
        if !KNOWN_MCP_SERVERS.iter().any(|(known, _)| known == name) {
            issues.push(format!("unexpected server `{}`", name));
        }
    }
}

fn check_mcp_server(name: &str, package: &str, entry: &ConfigValue, issues: &mut Vec<String>) {
    let location = format!("mcpServers.{}", name);

    let Some(entry) = entry.as_mapping() else {
        issues.push(format!("`{}` must be a mapping", location));
        return;
    };

    let command = match entry.get("command").and_then(ConfigValue::as_str) {
        Some(c) if !c.trim().is_empty() => c,
        Some(_) => {
            issues.push(format!("`{}.command` must not be empty", location));
            return;
        }
        None => {
            issues.push(format!("`{}.command` must be a string", location));
            return;
        }
    };

    let Some(args) = entry.get("args").and_then(string_sequence) else {
        issues.push(format!("`{}.args` must be a sequence of strings", location));
        return;
    };

    let flag = shell_flag_for(command);
    if args.first().copied() != Some(flag) {
        issues.push(format!(
            "`{}.args` must start with `{}` for `{}`",
            location, flag, command
        ));
    }
    if !args.contains(&NPX_TOKEN) {
        issues.push(format!("`{}.args` must invoke `{}`", location, NPX_TOKEN));
    }
    if !args.contains(&package) {
        issues.push(format!("`{}.args` must reference `{}`", location, package));
    }
}

fn check_claude_settings(document: &ConfigDocument, issues: &mut Vec<String>) {
    let Some(claude) = document.get("claude") else {
        issues.push("missing required field `claude`".into());
        return;
    };
    let Some(claude) = claude.as_mapping() else {
        issues.push("`claude` must be a mapping".into());
        return;
    };
    let Some(statusline) = claude.get("statusline") else {
        issues.push("missing required field `claude.statusline`".into());
        return;
    };
    let Some(statusline) = statusline.as_mapping() else {
        issues.push("`claude.statusline` must be a mapping".into());
        return;
    };

    check_launch(statusline, "claude.statusline.", issues);
}

/// `command` string plus `args` sequence, as used by both statusline kinds.
fn check_launch(map: &BTreeMap<String, ConfigValue>, prefix: &str, issues: &mut Vec<String>) {
    match map.get("command") {
        None => issues.push(format!("missing required field `{}command`", prefix)),
        Some(c) if c.as_str().is_none() => {
            issues.push(format!("`{}command` must be a string", prefix))
        }
        Some(_) => {}
    }

    match map.get("args") {
        None => issues.push(format!("missing required field `{}args`", prefix)),
        Some(a) if a.as_sequence().is_none() => {
            issues.push(format!("`{}args` must be a sequence", prefix))
        }
        Some(_) => {}
    }
}

fn string_sequence(value: &ConfigValue) -> Option<Vec<&str>> {
    value
        .as_sequence()?
        .iter()
        .map(ConfigValue::as_str)
        .collect()
}

/// `cmd` takes `/c`; every other launcher is a POSIX shell taking `-c`.
fn shell_flag_for(command: &str) -> &'static str {
    if command.eq_ignore_ascii_case("cmd") || command.eq_ignore_ascii_case("cmd.exe") {
        "/c"
    } else {
        "-c"
    }
}
