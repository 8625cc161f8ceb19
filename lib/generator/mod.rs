//! Config generation and the on-disk lifecycle of generated documents.
//!
//! Per target file the lifecycle is: absent, written (first apply, no
//! backup), written with backup (later applies), rolled back (rollback
//! consumes the newest backup). Any state accepts another apply.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::backup::{create_backup, latest_backup, list_backups, parent_dir, write_atomic};
use crate::constants::{CLAUDE_DIR, NPX_TOKEN};
use crate::diff::{ConfigDiff, diff_documents};
use crate::document::{ConfigDocument, ConfigValue};
use crate::error::{PlatformError, PlatformResult};
use crate::platform::{PlatformDetector, PlatformDiagnostics, PlatformKey};
use crate::templates::{ConfigKind, template, validate_template, validate_template_named};

#[cfg(test)]
mod tests;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Produces platform-resolved documents and manages their files.
#[derive(Debug, Clone, Default)]
pub struct ConfigGenerator {
    detector: PlatformDetector,
}

/// Everything [`ConfigGenerator::generate_all`] produces.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedConfigs {
    pub mcp: ConfigDocument,
    pub statusline: ConfigDocument,
    pub claude_settings: ConfigDocument,
    pub detected_os: PlatformKey,
    /// True iff every document passes its kind's validator.
    pub is_valid: bool,
    /// RFC 3339 generation time.
    pub generated_at: String,
    pub platform_info: PlatformDiagnostics,
}

/// Result of a successful apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub path: PathBuf,
    /// Backup of the previous content, when there was a previous file.
    pub backup: Option<PathBuf>,
}

/// Per-artifact status of [`ConfigGenerator::apply_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApplyAllReport {
    pub mcp: bool,
    pub claude_settings: bool,
}

/// Read-only view of what the generator would produce here.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub current_os: PlatformKey,
    pub is_supported: bool,
    pub mcp_servers: Vec<String>,
    /// Command of the statusline launch spec.
    pub statusline_command: String,
    /// Statusline command embedded in the Claude settings.
    pub claude_statusline_command: String,
    pub recommendations: Vec<String>,
    pub platform_details: PlatformDiagnostics,
}

//--------------------------------------------------------------------------------------------------
// Methods: Generation
//--------------------------------------------------------------------------------------------------

impl ConfigGenerator {
    /// Generator for the host platform.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_detector(detector: PlatformDetector) -> Self {
        Self { detector }
    }

    pub fn detector(&self) -> &PlatformDetector {
        &self.detector
    }

    /// The platform documents are generated for.
    pub fn platform(&self) -> PlatformKey {
        self.detector.detect()
    }

    /// Fresh document of `kind` for the detected platform.
    pub fn generate(&self, kind: ConfigKind) -> ConfigDocument {
        template(self.platform(), kind)
    }

    /// [`Self::generate`] from a kind name.
    pub fn generate_named(&self, kind: &str) -> PlatformResult<ConfigDocument> {
        Ok(self.generate(kind.parse()?))
    }

    pub fn generate_all(&self) -> GeneratedConfigs {
        let mcp = self.generate(ConfigKind::Mcp);
        let statusline = self.generate(ConfigKind::Statusline);
        let claude_settings = self.generate(ConfigKind::ClaudeSettings);

        let is_valid = validate_template(&mcp, ConfigKind::Mcp)
            && validate_template(&statusline, ConfigKind::Statusline)
            && validate_template(&claude_settings, ConfigKind::ClaudeSettings);

        GeneratedConfigs {
            mcp,
            statusline,
            claude_settings,
            detected_os: self.platform(),
            is_valid,
            generated_at: Utc::now().to_rfc3339(),
            platform_info: self.detector.diagnostics(),
        }
    }

    /// Wrap bare `npx` servers in `cmd /c` on windows.
    ///
    /// Servers of type `sse` are left alone. Other platforms get the document
    /// back unchanged.
    pub fn localize_mcp(&self, mut document: ConfigDocument) -> ConfigDocument {
        if self.platform() != PlatformKey::Windows {
            return document;
        }

        let Some(servers) = document
            .get_mut("mcpServers")
            .and_then(ConfigValue::as_mapping_mut)
        else {
            return document;
        };

        for (name, server) in servers.iter_mut() {
            let Some(entry) = server.as_mapping_mut() else {
                continue;
            };
            if entry.get("type").and_then(ConfigValue::as_str) == Some("sse") {
                continue;
            }
            if entry.get("command").and_then(ConfigValue::as_str) != Some(NPX_TOKEN) {
                continue;
            }

            let mut args = vec![ConfigValue::from("/c"), ConfigValue::from(NPX_TOKEN)];
            if let Some(original) = entry.get("args").and_then(ConfigValue::as_sequence) {
                args.extend(original.iter().cloned());
            }

            entry.insert("command".into(), ConfigValue::from("cmd"));
            entry.insert("args".into(), ConfigValue::from(args));
            tracing::debug!("Wrapped MCP server '{}' in cmd /c", name);
        }

        document
    }

    /// Validate `document` against a kind name. Unknown names are invalid.
    pub fn validate(&self, document: &ConfigDocument, kind: &str) -> bool {
        validate_template_named(document, kind)
    }

    pub fn diff(&self, old: &ConfigDocument, new: &ConfigDocument) -> ConfigDiff {
        diff_documents(old, new)
    }

    pub fn summary(&self) -> ConfigSummary {
        let platform = self.platform();
        let mcp = self.generate(ConfigKind::Mcp);
        let statusline = self.generate(ConfigKind::Statusline);
        let claude_settings = self.generate(ConfigKind::ClaudeSettings);

        let mcp_servers = mcp
            .get("mcpServers")
            .and_then(ConfigValue::as_mapping)
            .map(|servers| servers.keys().cloned().collect())
            .unwrap_or_default();

        let statusline_command = statusline
            .get_str(&["command"])
            .unwrap_or("unknown")
            .to_string();
        let claude_statusline_command = claude_settings
            .get_str(&["claude", "statusline", "command"])
            .unwrap_or("unknown")
            .to_string();

        let mut recommendations = Vec::new();
        match platform {
            PlatformKey::Unknown => recommendations.push(format!(
                "Unsupported platform '{}': falling back to linux templates",
                self.detector.raw_identifier()
            )),
            PlatformKey::Windows => {
                recommendations.push("MCP servers are launched through `cmd /c`".into());
                recommendations
                    .push("Set the console code page to UTF-8 if output is garbled".into());
            }
            PlatformKey::Macos | PlatformKey::Linux => recommendations.push(format!(
                "MCP servers are launched through `bash -c` on {}",
                platform
            )),
        }
        if statusline_command != claude_statusline_command {
            recommendations.push(format!(
                "Statusline command drift: '{}' vs '{}'",
                statusline_command, claude_statusline_command
            ));
        }

        ConfigSummary {
            current_os: platform,
            is_supported: platform.is_supported(),
            mcp_servers,
            statusline_command,
            claude_statusline_command,
            recommendations,
            platform_details: self.detector.diagnostics(),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Methods: Files
//--------------------------------------------------------------------------------------------------

impl ConfigGenerator {
    /// Write `document` to `target`, backing up any previous content.
    ///
    /// Returns `false` on any failure; the previous content of `target` is
    /// then untouched.
    pub fn apply(&self, document: &ConfigDocument, target: &Path) -> bool {
        match self.try_apply(document, target) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Failed to apply {}: {}", target.display(), e);
                false
            }
        }
    }

    /// [`Self::apply`] with the error and backup path exposed.
    pub fn try_apply(
        &self,
        document: &ConfigDocument,
        target: &Path,
    ) -> PlatformResult<ApplyOutcome> {
        let content = document.to_pretty_json()?;

        let dir = parent_dir(target);
        if !dir.is_dir() {
            return Err(PlatformError::MissingParentDirectory(dir));
        }

        let backup = create_backup(target)?;
        write_atomic(target, content.as_bytes())?;

        tracing::info!("Applied {}", target.display());
        Ok(ApplyOutcome {
            path: target.to_path_buf(),
            backup,
        })
    }

    /// Restore `target` from its newest backup and consume that backup.
    ///
    /// Returns `false` when there is no backup or the restore fails. The
    /// content being discarded is not itself backed up.
    pub fn rollback(&self, target: &Path) -> bool {
        match self.try_rollback(target) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Failed to roll back {}: {}", target.display(), e);
                false
            }
        }
    }

    /// [`Self::rollback`] returning the backup that was restored.
    pub fn try_rollback(&self, target: &Path) -> PlatformResult<PathBuf> {
        let backup = latest_backup(target)?
            .ok_or_else(|| PlatformError::NoBackup(target.to_path_buf()))?;

        let content = fs::read(&backup)?;
        write_atomic(target, &content)?;

        if let Err(e) = fs::remove_file(&backup) {
            tracing::warn!("Restored but could not remove {}: {}", backup.display(), e);
        }

        tracing::info!("Rolled back {} from {}", target.display(), backup.display());
        Ok(backup)
    }

    /// Backups of `target`, newest first. Unreadable directories yield none.
    pub fn list_backups(&self, target: &Path) -> Vec<PathBuf> {
        list_backups(target).unwrap_or_default()
    }

    /// Generate and apply the MCP manifest and Claude settings under `base`.
    ///
    /// Creates `base/.claude` when missing (but never `base` itself). Each
    /// artifact succeeds or fails independently.
    pub fn apply_all(&self, base: &Path) -> ApplyAllReport {
        let mcp = self.localize_mcp(self.generate(ConfigKind::Mcp));
        let mcp_ok = self.apply(&mcp, &ConfigKind::Mcp.artifact_path(base));

        let settings_ok = match ensure_claude_dir(base) {
            Ok(()) => self.apply(
                &self.generate(ConfigKind::ClaudeSettings),
                &ConfigKind::ClaudeSettings.artifact_path(base),
            ),
            Err(e) => {
                tracing::warn!("Failed to prepare {}: {}", CLAUDE_DIR, e);
                false
            }
        };

        ApplyAllReport {
            mcp: mcp_ok,
            claude_settings: settings_ok,
        }
    }
}

impl ApplyAllReport {
    pub fn all_succeeded(&self) -> bool {
        self.mcp && self.claude_settings
    }

    /// Status keyed by kind.
    pub fn by_kind(&self) -> BTreeMap<ConfigKind, bool> {
        BTreeMap::from([
            (ConfigKind::Mcp, self.mcp),
            (ConfigKind::ClaudeSettings, self.claude_settings),
        ])
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Create `base/.claude` if needed. `base` itself must exist.
pub(crate) fn ensure_claude_dir(base: &Path) -> PlatformResult<()> {
    match fs::create_dir(base.join(CLAUDE_DIR)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && base.join(CLAUDE_DIR).is_dir() => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(PlatformError::MissingParentDirectory(base.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}
