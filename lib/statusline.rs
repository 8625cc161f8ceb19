//! Statusline input contract.
//!
//! [`StatuslineData`] is the normalized record a statusline renderer
//! consumes. It is built once per invocation from the session context Claude
//! sends on stdin plus locally collected values, and never changes after.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::STATUSLINE_MODE_ENV;
use crate::error::PlatformError;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

const DEFAULT_MODEL: &str = "unknown";
const DEFAULT_CLAUDE_VERSION: &str = "unknown";
const DEFAULT_VERSION: &str = "0.0.0";
const DEFAULT_MEMORY_USAGE: &str = "0MB";
const DEFAULT_BRANCH: &str = "unknown";
const DEFAULT_GIT_STATUS: &str = "clean";
const DEFAULT_DURATION: &str = "0m";
const DEFAULT_DIRECTORY: &str = "project";
const DEFAULT_ACTIVE_TASK: &str = "none";
const DEFAULT_OUTPUT_STYLE: &str = "default";

//--------------------------------------------------------------------------------------------------
// Types: Session Context
//--------------------------------------------------------------------------------------------------

/// Session context JSON as sent by Claude. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionContext {
    pub model: Option<ModelInfo>,
    pub version: Option<String>,
    pub cwd: Option<String>,
    pub output_style: Option<OutputStyle>,
    pub statusline: Option<StatuslineSettings>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelInfo {
    pub display_name: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputStyle {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatuslineSettings {
    pub mode: Option<String>,
}

/// Display density requested of the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatuslineMode {
    Compact,
    Extended,
    Minimal,
}

//--------------------------------------------------------------------------------------------------
// Types: Statusline Data
//--------------------------------------------------------------------------------------------------

/// Values collected on this machine rather than sent by Claude.
#[derive(Debug, Clone, Default)]
pub struct LocalStatus {
    pub version: String,
    pub memory_usage: String,
    pub branch: String,
    pub git_status: String,
    pub duration: String,
    pub active_task: String,
    pub update_available: bool,
    pub latest_version: Option<String>,
}

/// Raw, unnormalized statusline fields.
#[derive(Debug, Clone, Default)]
pub struct StatuslineFields {
    pub model: String,
    pub claude_version: String,
    pub version: String,
    pub memory_usage: String,
    pub branch: String,
    pub git_status: String,
    pub duration: String,
    pub directory: String,
    pub active_task: String,
    pub output_style: String,
    pub update_available: bool,
    pub latest_version: Option<String>,
}

/// Normalized statusline record. No textual field is ever empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatuslineData {
    model: String,
    claude_version: String,
    version: String,
    memory_usage: String,
    branch: String,
    git_status: String,
    duration: String,
    directory: String,
    active_task: String,
    output_style: String,
    update_available: bool,
    latest_version: Option<String>,
}

/// Everything one statusline invocation hands to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatuslineReport {
    pub mode: StatuslineMode,
    pub data: StatuslineData,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl SessionContext {
    /// Parse stdin content. Empty or malformed input is an empty context.
    pub fn parse(input: &str) -> Self {
        if input.trim().is_empty() {
            return Self::default();
        }

        match serde_json::from_str(input) {
            Ok(context) => context,
            Err(e) => {
                tracing::debug!("Ignoring malformed session context: {}", e);
                Self::default()
            }
        }
    }

    /// `model.display_name`, else `model.name`.
    pub fn model_name(&self) -> Option<&str> {
        let model = self.model.as_ref()?;
        non_empty(model.display_name.as_deref()).or_else(|| non_empty(model.name.as_deref()))
    }

    /// Final component of `cwd`, or of its parent when `cwd` ends in `..`.
    pub fn directory_label(&self) -> Option<String> {
        let cwd = non_empty(self.cwd.as_deref())?;
        let path = Path::new(cwd);
        path.file_name()
            .or_else(|| path.parent().and_then(Path::file_name))
            .map(|name| name.to_string_lossy().into_owned())
    }

    pub fn output_style_name(&self) -> Option<&str> {
        non_empty(self.output_style.as_ref()?.name.as_deref())
    }

    pub fn requested_mode(&self) -> Option<&str> {
        non_empty(self.statusline.as_ref()?.mode.as_deref())
    }
}

impl StatuslineMode {
    /// Mode from the context, else [`STATUSLINE_MODE_ENV`], else extended.
    pub fn resolve(context: &SessionContext) -> Self {
        let env = std::env::var(STATUSLINE_MODE_ENV).ok();
        Self::resolve_with(context, env.as_deref())
    }

    /// [`Self::resolve`] with the environment value supplied. Unparseable
    /// values are skipped.
    pub fn resolve_with(context: &SessionContext, env_mode: Option<&str>) -> Self {
        [context.requested_mode(), env_mode]
            .into_iter()
            .flatten()
            .find_map(|mode| mode.parse().ok())
            .unwrap_or(Self::Extended)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Extended => "extended",
            Self::Minimal => "minimal",
        }
    }
}

impl StatuslineData {
    /// Normalize raw fields, replacing each empty one with its default.
    pub fn new(fields: StatuslineFields) -> Self {
        Self {
            model: or_default(fields.model, DEFAULT_MODEL),
            claude_version: or_default(fields.claude_version, DEFAULT_CLAUDE_VERSION),
            version: or_default(fields.version, DEFAULT_VERSION),
            memory_usage: or_default(fields.memory_usage, DEFAULT_MEMORY_USAGE),
            branch: or_default(fields.branch, DEFAULT_BRANCH),
            git_status: or_default(fields.git_status, DEFAULT_GIT_STATUS),
            duration: or_default(fields.duration, DEFAULT_DURATION),
            directory: or_default(fields.directory, DEFAULT_DIRECTORY),
            active_task: or_default(fields.active_task, DEFAULT_ACTIVE_TASK),
            output_style: or_default(fields.output_style, DEFAULT_OUTPUT_STYLE),
            update_available: fields.update_available,
            latest_version: fields.latest_version.filter(|v| !v.trim().is_empty()),
        }
    }

    /// Build the record for one statusline invocation.
    pub fn from_session(context: &SessionContext, local: LocalStatus) -> Self {
        Self::new(StatuslineFields {
            model: context.model_name().unwrap_or_default().to_string(),
            claude_version: context.version.clone().unwrap_or_default(),
            version: local.version.trim_start_matches('v').to_string(),
            memory_usage: local.memory_usage,
            branch: local.branch,
            git_status: local.git_status,
            duration: local.duration,
            directory: context.directory_label().unwrap_or_default(),
            active_task: local.active_task,
            output_style: context.output_style_name().unwrap_or_default().to_string(),
            update_available: local.update_available,
            latest_version: local.latest_version,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn claude_version(&self) -> &str {
        &self.claude_version
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn memory_usage(&self) -> &str {
        &self.memory_usage
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn git_status(&self) -> &str {
        &self.git_status
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn active_task(&self) -> &str {
        &self.active_task
    }

    pub fn output_style(&self) -> &str {
        &self.output_style
    }

    pub fn update_available(&self) -> bool {
        self.update_available
    }

    pub fn latest_version(&self) -> Option<&str> {
        self.latest_version.as_deref()
    }
}

impl StatuslineReport {
    /// Build the report from raw stdin content. The mode falls back to
    /// [`STATUSLINE_MODE_ENV`].
    pub fn from_input(input: &str, local: LocalStatus) -> Self {
        let env = std::env::var(STATUSLINE_MODE_ENV).ok();
        Self::from_input_with(input, env.as_deref(), local)
    }

    /// [`Self::from_input`] with the environment value supplied.
    pub fn from_input_with(input: &str, env_mode: Option<&str>, local: LocalStatus) -> Self {
        let context = SessionContext::parse(input);
        Self {
            mode: StatuslineMode::resolve_with(&context, env_mode),
            data: StatuslineData::from_session(&context, local),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl FromStr for StatuslineMode {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "extended" => Ok(Self::Extended),
            "minimal" => Ok(Self::Minimal),
            other => Err(PlatformError::Generic(format!(
                "Unknown statusline mode: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for StatuslineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn or_default(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
