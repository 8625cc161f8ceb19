//! Project setup workflow built on [`ConfigGenerator`].
//!
//! Applies selected artifacts under a project root and inspects what is
//! already there (status, dry run, validation).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::diff::ConfigDiff;
use crate::document::ConfigDocument;
use crate::error::{PlatformError, PlatformResult};
use crate::generator::{ApplyOutcome, ConfigGenerator, ensure_claude_dir};
use crate::platform::{PlatformDiagnostics, PlatformKey};
use crate::templates::{ConfigKind, validation_issues};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Which artifacts a setup run writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupSelection {
    pub mcp: bool,
    pub statusline: bool,
    pub claude_settings: bool,
}

/// Outcome of [`setup_project`].
#[derive(Debug, Clone, Serialize)]
pub struct SetupReport {
    /// True iff every selected artifact was applied.
    pub success: bool,
    pub platform_detected: PlatformKey,
    pub details: BTreeMap<ConfigKind, bool>,
    /// Backups taken of artifacts that already existed.
    pub backups: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What is currently on disk under a project root.
#[derive(Debug, Clone, Serialize)]
pub struct SetupStatus {
    pub platform_detected: PlatformKey,
    pub is_supported: bool,
    pub configs_applied: BTreeMap<ConfigKind, bool>,
    pub backups: BTreeMap<ConfigKind, usize>,
    pub platform_details: PlatformDiagnostics,
    pub last_updated: String,
}

/// Estimated effect of a setup run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
}

/// Per-artifact preview inside a [`DryRunReport`].
#[derive(Debug, Clone, Serialize)]
pub struct DryRunArtifact {
    pub path: PathBuf,
    pub would_create: bool,
    pub would_modify: bool,
    /// Differences from the current file, when it exists and parses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<ConfigDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Preview of a full setup run. Nothing is written.
#[derive(Debug, Clone, Serialize)]
pub struct DryRunReport {
    pub platform_detected: PlatformKey,
    pub is_supported: bool,
    pub artifacts: BTreeMap<ConfigKind, DryRunArtifact>,
    pub estimated_impact: Impact,
}

/// Shape check of the artifacts already on disk.
#[derive(Debug, Clone, Serialize)]
pub struct SetupValidation {
    pub is_valid: bool,
    pub config_validations: BTreeMap<ConfigKind, bool>,
    pub issues: Vec<String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl SetupSelection {
    pub fn all() -> Self {
        Self {
            mcp: true,
            statusline: true,
            claude_settings: true,
        }
    }

    pub fn only(kind: ConfigKind) -> Self {
        Self {
            mcp: kind == ConfigKind::Mcp,
            statusline: kind == ConfigKind::Statusline,
            claude_settings: kind == ConfigKind::ClaudeSettings,
        }
    }

    pub fn includes(&self, kind: ConfigKind) -> bool {
        match kind {
            ConfigKind::Mcp => self.mcp,
            ConfigKind::Statusline => self.statusline,
            ConfigKind::ClaudeSettings => self.claude_settings,
        }
    }

    pub fn kinds(&self) -> Vec<ConfigKind> {
        ConfigKind::ALL
            .into_iter()
            .filter(|k| self.includes(*k))
            .collect()
    }
}

impl Default for SetupSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl SetupReport {
    fn refused(platform: PlatformKey, error: PlatformError) -> Self {
        Self {
            success: false,
            platform_detected: platform,
            details: BTreeMap::new(),
            backups: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    /// Kinds that failed to apply.
    pub fn failed(&self) -> Vec<ConfigKind> {
        self.details
            .iter()
            .filter(|(_, ok)| !**ok)
            .map(|(kind, _)| *kind)
            .collect()
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Apply the selected artifacts under `base`.
///
/// Refuses (without touching disk) when the platform is unsupported or
/// `base` is not a directory. Otherwise every selected artifact is attempted
/// and reported on its own.
pub fn setup_project(
    generator: &ConfigGenerator,
    base: &Path,
    selection: SetupSelection,
) -> SetupReport {
    let platform = generator.platform();

    if !platform.is_supported() {
        let raw = generator.detector().raw_identifier();
        tracing::warn!("Refusing setup on unsupported platform '{}'", raw);
        return SetupReport::refused(platform, PlatformError::UnsupportedPlatform(raw));
    }
    if !base.is_dir() {
        return SetupReport::refused(
            platform,
            PlatformError::DirectoryNotFound(base.to_path_buf()),
        );
    }

    let mut details = BTreeMap::new();
    let mut backups = Vec::new();

    for kind in selection.kinds() {
        match apply_kind(generator, base, kind) {
            Ok(outcome) => {
                backups.extend(outcome.backup);
                details.insert(kind, true);
            }
            Err(e) => {
                tracing::warn!("Setup of {} failed: {}", kind, e);
                details.insert(kind, false);
            }
        }
    }

    SetupReport {
        success: details.values().all(|ok| *ok),
        platform_detected: platform,
        details,
        backups,
        error: None,
    }
}

fn apply_kind(
    generator: &ConfigGenerator,
    base: &Path,
    kind: ConfigKind,
) -> PlatformResult<ApplyOutcome> {
    if kind.in_claude_dir() {
        ensure_claude_dir(base)?;
    }

    let document = match kind {
        ConfigKind::Mcp => generator.localize_mcp(generator.generate(kind)),
        _ => generator.generate(kind),
    };

    generator.try_apply(&document, &kind.artifact_path(base))
}

/// Which artifacts exist under `base` and how many backups each has.
pub fn setup_status(generator: &ConfigGenerator, base: &Path) -> SetupStatus {
    let mut configs_applied = BTreeMap::new();
    let mut backups = BTreeMap::new();

    for kind in ConfigKind::ALL {
        let path = kind.artifact_path(base);
        configs_applied.insert(kind, path.is_file());
        backups.insert(kind, generator.list_backups(&path).len());
    }

    let platform = generator.platform();
    SetupStatus {
        platform_detected: platform,
        is_supported: platform.is_supported(),
        configs_applied,
        backups,
        platform_details: generator.detector().diagnostics(),
        last_updated: Utc::now().to_rfc3339(),
    }
}

/// Preview a full setup run under `base`.
pub fn dry_run(generator: &ConfigGenerator, base: &Path) -> DryRunReport {
    let platform = generator.platform();
    let mut artifacts = BTreeMap::new();

    for kind in ConfigKind::ALL {
        let path = kind.artifact_path(base);
        let exists = path.is_file();
        let generated = match kind {
            ConfigKind::Mcp => generator.localize_mcp(generator.generate(kind)),
            _ => generator.generate(kind),
        };

        let (changes, error) = if exists {
            match ConfigDocument::read(&path) {
                Ok(current) => (Some(generator.diff(&current, &generated)), None),
                Err(e) => (None, Some(e.to_string())),
            }
        } else {
            (None, None)
        };

        artifacts.insert(
            kind,
            DryRunArtifact {
                path,
                would_create: !exists,
                would_modify: exists,
                changes,
                error,
            },
        );
    }

    let any_exists = artifacts.values().any(|a| a.would_modify);
    let estimated_impact = if any_exists || platform == PlatformKey::Windows {
        Impact::Medium
    } else {
        Impact::Low
    };

    DryRunReport {
        platform_detected: platform,
        is_supported: platform.is_supported(),
        artifacts,
        estimated_impact,
    }
}

/// Validate every artifact that exists under `base`.
pub fn validate_setup(base: &Path) -> SetupValidation {
    let mut config_validations = BTreeMap::new();
    let mut issues = Vec::new();

    for kind in ConfigKind::ALL {
        let path = kind.artifact_path(base);
        if !path.exists() {
            continue;
        }

        let valid = match ConfigDocument::read(&path) {
            Ok(document) => {
                let found = validation_issues(&document, kind);
                let valid = found.is_empty();
                issues.extend(
                    found
                        .into_iter()
                        .map(|issue| format!("{}: {}", path.display(), issue)),
                );
                valid
            }
            Err(e) => {
                issues.push(format!("{}: {}", path.display(), e));
                false
            }
        };
        config_validations.insert(kind, valid);
    }

    SetupValidation {
        is_valid: issues.is_empty(),
        config_validations,
        issues,
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformDetector;
    use std::fs;
    use tempfile::TempDir;

    fn generator(os: &str) -> ConfigGenerator {
        ConfigGenerator::with_detector(PlatformDetector::with_os_identifier(os))
    }

    #[test]
    fn test_setup_all() {
        let dir = TempDir::new().unwrap();
        let report = setup_project(&generator("linux"), dir.path(), SetupSelection::all());

        assert!(report.success);
        assert_eq!(report.details.len(), 3);
        assert!(report.backups.is_empty());
        assert!(report.failed().is_empty());
        for kind in ConfigKind::ALL {
            assert!(kind.artifact_path(dir.path()).is_file(), "{kind}");
        }
    }

    #[test]
    fn test_setup_only_one_kind() {
        let dir = TempDir::new().unwrap();
        let report = setup_project(
            &generator("darwin"),
            dir.path(),
            SetupSelection::only(ConfigKind::Statusline),
        );

        assert!(report.success);
        assert_eq!(report.details.keys().copied().collect::<Vec<_>>(), vec![
            ConfigKind::Statusline
        ]);
        assert!(dir.path().join(".claude").join("statusline.json").is_file());
        assert!(!dir.path().join(".mcp.json").exists());
        assert!(!dir.path().join(".claude").join("settings.json").exists());
    }

    #[test]
    fn test_setup_rerun_takes_backups() {
        let dir = TempDir::new().unwrap();
        let generator = generator("linux");
        setup_project(&generator, dir.path(), SetupSelection::all());
        let report = setup_project(&generator, dir.path(), SetupSelection::all());

        assert!(report.success);
        assert_eq!(report.backups.len(), 3);
    }

    #[test]
    fn test_setup_refuses_unsupported_platform() {
        let dir = TempDir::new().unwrap();
        let report = setup_project(&generator("os2"), dir.path(), SetupSelection::all());

        assert!(!report.success);
        assert_eq!(report.platform_detected, PlatformKey::Unknown);
        assert!(report.error.unwrap().contains("os2"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_setup_refuses_missing_directory() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("absent");
        let report = setup_project(&generator("linux"), &base, SetupSelection::all());

        assert!(!report.success);
        assert!(report.error.is_some());
        assert!(!base.exists());
    }

    #[test]
    fn test_setup_reports_each_failure() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".claude"), "blocked").unwrap();

        let report = setup_project(&generator("linux"), dir.path(), SetupSelection::all());
        assert!(!report.success);
        assert_eq!(report.details.get(&ConfigKind::Mcp), Some(&true));
        assert_eq!(report.failed(), vec![
            ConfigKind::Statusline,
            ConfigKind::ClaudeSettings
        ]);
    }

    #[test]
    fn test_status() {
        let dir = TempDir::new().unwrap();
        let generator = generator("linux");

        let status = setup_status(&generator, dir.path());
        assert!(status.configs_applied.values().all(|applied| !applied));

        setup_project(&generator, dir.path(), SetupSelection::only(ConfigKind::Mcp));
        setup_project(&generator, dir.path(), SetupSelection::only(ConfigKind::Mcp));

        let status = setup_status(&generator, dir.path());
        assert_eq!(status.configs_applied.get(&ConfigKind::Mcp), Some(&true));
        assert_eq!(
            status.configs_applied.get(&ConfigKind::ClaudeSettings),
            Some(&false)
        );
        assert_eq!(status.backups.get(&ConfigKind::Mcp), Some(&1));
        assert!(status.is_supported);
    }

    #[test]
    fn test_dry_run_fresh_directory() {
        let dir = TempDir::new().unwrap();
        let report = dry_run(&generator("darwin"), dir.path());

        assert_eq!(report.estimated_impact, Impact::Low);
        assert!(report.artifacts.values().all(|a| a.would_create));
        assert!(report.artifacts.values().all(|a| a.changes.is_none()));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

        let windows = dry_run(&generator("win32"), dir.path());
        assert_eq!(windows.estimated_impact, Impact::Medium);
    }

    #[test]
    fn test_dry_run_against_existing_files() {
        let dir = TempDir::new().unwrap();
        setup_project(&generator("linux"), dir.path(), SetupSelection::all());
        fs::write(dir.path().join(".claude").join("settings.json"), "{ broken").unwrap();

        let report = dry_run(&generator("linux"), dir.path());
        assert_eq!(report.estimated_impact, Impact::Medium);

        let mcp = &report.artifacts[&ConfigKind::Mcp];
        assert!(mcp.would_modify);
        assert_eq!(mcp.changes.as_ref().map(|c| c.len()), Some(0));

        let settings = &report.artifacts[&ConfigKind::ClaudeSettings];
        assert!(settings.changes.is_none());
        assert!(settings.error.is_some());

        // Switching platform shows the launcher changes.
        let report = dry_run(&generator("win32"), dir.path());
        let statusline = &report.artifacts[&ConfigKind::Statusline];
        assert!(statusline.changes.as_ref().unwrap().contains_key("command"));
    }

    #[test]
    fn test_validate_setup() {
        let dir = TempDir::new().unwrap();
        let empty = validate_setup(dir.path());
        assert!(empty.is_valid);
        assert!(empty.config_validations.is_empty());

        setup_project(&generator("win32"), dir.path(), SetupSelection::all());
        assert!(validate_setup(dir.path()).is_valid);

        fs::write(dir.path().join(".mcp.json"), "{\"mcpServers\": {}}").unwrap();
        fs::write(dir.path().join(".claude").join("statusline.json"), "[1, 2]").unwrap();

        let result = validate_setup(dir.path());
        assert!(!result.is_valid);
        assert_eq!(result.config_validations.get(&ConfigKind::Mcp), Some(&false));
        assert_eq!(
            result.config_validations.get(&ConfigKind::Statusline),
            Some(&false)
        );
        assert_eq!(
            result.config_validations.get(&ConfigKind::ClaudeSettings),
            Some(&true)
        );
        // Three missing servers plus the unparseable statusline file.
        assert_eq!(result.issues.len(), 4);
    }

    #[test]
    fn test_selection() {
        assert_eq!(SetupSelection::default(), SetupSelection::all());
        assert_eq!(SetupSelection::only(ConfigKind::Mcp).kinds(), vec![ConfigKind::Mcp]);
        assert_eq!(SetupSelection::all().kinds().len(), 3);
    }
}
