//! Generator tests.

use std::fs;

use tempfile::TempDir;

use super::*;
use crate::diff::DiffEntry;

fn generator(os: &str) -> ConfigGenerator {
    ConfigGenerator::with_detector(PlatformDetector::with_os_identifier(os))
}

fn doc(json: &str) -> ConfigDocument {
    ConfigDocument::from_json_str(json).unwrap()
}

#[test]
fn test_generated_documents_validate() {
    for os in ["win32", "darwin", "linux", "unknown-os"] {
        let generator = generator(os);
        for kind in ConfigKind::ALL {
            let document = generator.generate(kind);
            assert!(generator.validate(&document, kind.as_str()), "{os}/{kind}");
        }
    }
}

#[test]
fn test_generate_all_darwin() {
    let configs = generator("darwin").generate_all();

    assert_eq!(
        configs.mcp.get_str(&["mcpServers", "context7", "command"]),
        Some("bash")
    );
    let first_arg = configs
        .mcp
        .get_path(&["mcpServers", "context7", "args"])
        .and_then(ConfigValue::as_sequence)
        .and_then(|args| args.first())
        .and_then(ConfigValue::as_str);
    assert_eq!(first_arg, Some("-c"));
    assert_eq!(configs.statusline.get_str(&["command"]), Some("uv"));
    assert_eq!(
        configs
            .claude_settings
            .get_str(&["claude", "statusline", "command"]),
        Some("uv")
    );
    assert_eq!(configs.detected_os, PlatformKey::Macos);
    assert!(configs.is_valid);
    assert_eq!(configs.platform_info.platform, "darwin");
    assert!(chrono::DateTime::parse_from_rfc3339(&configs.generated_at).is_ok());
}

#[test]
fn test_generate_all_unknown_platform() {
    let configs = generator("aix").generate_all();
    assert_eq!(configs.detected_os, PlatformKey::Unknown);
    assert!(configs.is_valid);
    assert!(!configs.platform_info.is_supported);
    assert_eq!(configs.mcp, generator("linux").generate(ConfigKind::Mcp));
}

#[test]
fn test_generate_is_deterministic() {
    let generator = generator("win32");
    assert_eq!(
        generator.generate(ConfigKind::Statusline),
        generator.generate(ConfigKind::Statusline)
    );
}

#[test]
fn test_generate_named() {
    let generator = generator("linux");
    assert_eq!(
        generator.generate_named("claude_settings").unwrap(),
        generator.generate(ConfigKind::ClaudeSettings)
    );
    assert!(matches!(
        generator.generate_named("hooks"),
        Err(PlatformError::UnknownKind(_))
    ));
}

#[test]
fn test_validate_unknown_kind() {
    let generator = generator("linux");
    let document = generator.generate(ConfigKind::Mcp);
    assert!(!generator.validate(&document, "servers"));
    assert!(!generator.validate(&ConfigDocument::new(), "mcp"));
}

#[test]
fn test_first_apply_has_no_backup() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join(".mcp.json");
    let generator = generator("linux");
    let document = generator.generate(ConfigKind::Mcp);

    let outcome = generator.try_apply(&document, &target).unwrap();
    assert!(outcome.backup.is_none());
    assert!(generator.list_backups(&target).is_empty());
    assert_eq!(ConfigDocument::read(&target).unwrap(), document);

    assert!(generator.apply(&document, &target));
    assert_eq!(generator.list_backups(&target).len(), 1);
}

#[test]
fn test_apply_then_rollback_restores_previous() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("settings.json");
    let original = "{\n  \"env\": {\n    \"KEEP\": \"me\"\n  }\n}";
    fs::write(&target, original).unwrap();

    let generator = generator("darwin");
    let document = generator.generate(ConfigKind::ClaudeSettings);
    assert!(generator.apply(&document, &target));
    assert_eq!(ConfigDocument::read(&target).unwrap(), document);

    assert!(generator.rollback(&target));
    assert_eq!(fs::read_to_string(&target).unwrap(), original);
    assert_eq!(
        ConfigDocument::read(&target).unwrap(),
        doc(r#"{"env": {"KEEP": "me"}}"#)
    );
}

#[test]
fn test_rollback_consumes_backup() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("settings.json");
    fs::write(&target, "{\"rev\": 1}").unwrap();

    let generator = generator("linux");
    assert!(generator.apply(&doc(r#"{"rev": 2}"#), &target));
    assert_eq!(generator.list_backups(&target).len(), 1);

    assert!(generator.rollback(&target));
    assert!(generator.list_backups(&target).is_empty());

    // Nothing left to undo.
    assert!(!generator.rollback(&target));
    assert_eq!(fs::read_to_string(&target).unwrap(), "{\"rev\": 1}");

    // Rolled back state accepts another apply.
    assert!(generator.apply(&doc(r#"{"rev": 3}"#), &target));
    assert_eq!(generator.list_backups(&target).len(), 1);
}

#[test]
fn test_rollback_uses_newest_backup() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("settings.json");
    let generator = generator("linux");

    assert!(generator.apply(&doc(r#"{"rev": 1}"#), &target));
    assert!(generator.apply(&doc(r#"{"rev": 2}"#), &target));
    assert!(generator.apply(&doc(r#"{"rev": 3}"#), &target));
    assert_eq!(generator.list_backups(&target).len(), 2);

    assert!(generator.rollback(&target));
    assert_eq!(ConfigDocument::read(&target).unwrap(), doc(r#"{"rev": 2}"#));
    assert!(generator.rollback(&target));
    assert_eq!(ConfigDocument::read(&target).unwrap(), doc(r#"{"rev": 1}"#));
    assert!(!generator.rollback(&target));
}

#[test]
fn test_rollback_without_backup() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("settings.json");
    fs::write(&target, "{\"untouched\": true}").unwrap();

    let generator = generator("linux");
    assert!(!generator.rollback(&target));
    assert!(matches!(
        generator.try_rollback(&target),
        Err(PlatformError::NoBackup(_))
    ));
    assert_eq!(fs::read_to_string(&target).unwrap(), "{\"untouched\": true}");
}

#[test]
fn test_apply_missing_parent_fails() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("nested").join("settings.json");
    let generator = generator("linux");

    assert!(!generator.apply(&generator.generate(ConfigKind::ClaudeSettings), &target));
    assert!(!dir.path().join("nested").exists());
}

#[test]
fn test_failed_apply_keeps_existing_content() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join(".mcp.json");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("notes"), "prior bytes").unwrap();
    let generator = generator("linux");

    assert!(!generator.apply(&generator.generate(ConfigKind::Mcp), &target));

    assert!(target.is_dir());
    assert_eq!(fs::read(target.join("notes")).unwrap(), b"prior bytes");
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from(".mcp.json")]);
    assert!(generator.list_backups(&target).is_empty());
}

#[test]
fn test_apply_all_on_empty_directory() {
    let dir = TempDir::new().unwrap();
    let generator = generator("darwin");

    let report = generator.apply_all(dir.path());
    assert!(report.mcp);
    assert!(report.claude_settings);
    assert!(report.all_succeeded());

    let mcp = ConfigDocument::read(&dir.path().join(".mcp.json")).unwrap();
    let settings =
        ConfigDocument::read(&dir.path().join(".claude").join("settings.json")).unwrap();
    assert!(generator.validate(&mcp, "mcp"));
    assert!(generator.validate(&settings, "claude_settings"));

    // A second run backs up both artifacts.
    let report = generator.apply_all(dir.path());
    assert!(report.all_succeeded());
    assert_eq!(generator.list_backups(&dir.path().join(".mcp.json")).len(), 1);
    assert_eq!(
        generator
            .list_backups(&dir.path().join(".claude").join("settings.json"))
            .len(),
        1
    );
}

#[test]
fn test_apply_all_missing_base() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("absent");

    let report = generator("linux").apply_all(&base);
    assert_eq!(
        report,
        ApplyAllReport {
            mcp: false,
            claude_settings: false
        }
    );
    assert!(!base.exists());
}

#[test]
fn test_apply_all_failures_are_independent() {
    let dir = TempDir::new().unwrap();
    // A file where the .claude directory should be.
    fs::write(dir.path().join(".claude"), "not a directory").unwrap();

    let report = generator("linux").apply_all(dir.path());
    assert!(report.mcp);
    assert!(!report.claude_settings);
    assert!(!report.all_succeeded());
    assert_eq!(
        report.by_kind().get(&ConfigKind::ClaudeSettings),
        Some(&false)
    );
}

#[test]
fn test_localize_mcp_on_windows() {
    let input = doc(
        r#"{
            "mcpServers": {
                "plain": { "command": "npx", "args": ["-y", "pkg@latest"] },
                "events": { "type": "sse", "command": "npx", "args": ["-y", "sse-pkg"] },
                "native": { "command": "node", "args": ["server.js"] }
            }
        }"#,
    );

    let output = generator("win32").localize_mcp(input.clone());
    let diff = diff_documents(&input, &output);
    assert_eq!(diff.len(), 2);
    assert_eq!(
        diff.get("mcpServers.plain.command"),
        Some(&DiffEntry::Changed {
            old: ConfigValue::from("npx"),
            new: ConfigValue::from("cmd"),
        })
    );
    assert_eq!(
        output.get_path(&["mcpServers", "plain", "args"]),
        Some(&ConfigValue::strings(&["/c", "npx", "-y", "pkg@latest"]))
    );

    assert_eq!(generator("linux").localize_mcp(input.clone()), input);
}

#[test]
fn test_localize_keeps_templates_valid() {
    let generator = generator("win32");
    let localized = generator.localize_mcp(generator.generate(ConfigKind::Mcp));
    assert_eq!(localized, generator.generate(ConfigKind::Mcp));
}

#[test]
fn test_summary() {
    let summary = generator("darwin").summary();
    assert_eq!(summary.current_os, PlatformKey::Macos);
    assert!(summary.is_supported);
    assert_eq!(
        summary.mcp_servers,
        vec!["context7", "figma-dev-mode-mcp-server", "playwright"]
    );
    assert_eq!(summary.statusline_command, "uv");
    assert_eq!(summary.claude_statusline_command, "uv");
    assert_eq!(summary.recommendations.len(), 1);

    let summary = generator("win32").summary();
    assert_eq!(summary.statusline_command, "python");
    assert_eq!(summary.claude_statusline_command, "python");

    let summary = generator("beos").summary();
    assert!(!summary.is_supported);
    assert!(summary.recommendations[0].contains("beos"));
}

#[test]
fn test_diff_via_generator() {
    let generator = generator("linux");
    let document = generator.generate(ConfigKind::Statusline);
    assert!(generator.diff(&document, &document).is_empty());
}
