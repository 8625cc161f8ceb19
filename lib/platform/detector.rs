//! OS detection.

use serde::Serialize;

use super::execution::{EnvironmentFormat, ExecutionConfig, execution_config};
use super::key::PlatformKey;
use crate::constants::PLATFORM_OVERRIDE_ENV;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Detects the running platform.
///
/// The OS identifier is read on every call, never cached, so a single
/// detector follows changes to [`PLATFORM_OVERRIDE_ENV`]. Tests pin the
/// identifier with [`PlatformDetector::with_os_identifier`].
#[derive(Debug, Clone, Default)]
pub struct PlatformDetector {
    pinned: Option<String>,
}

/// Read-only snapshot of what the detector sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformDiagnostics {
    /// Raw OS identifier used for detection.
    pub platform: String,
    pub detected_os: PlatformKey,
    pub is_supported: bool,
    /// Version of this crate.
    pub version: String,
    /// Target architecture the binary was built for.
    pub arch: String,
    /// Target family (`unix`, `windows`, ...).
    pub family: String,
    pub supported_platforms: Vec<PlatformKey>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl PlatformDetector {
    /// Detector for the host, honouring [`PLATFORM_OVERRIDE_ENV`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Detector that always sees `identifier`.
    pub fn with_os_identifier(identifier: impl Into<String>) -> Self {
        Self {
            pinned: Some(identifier.into()),
        }
    }

    /// The raw OS identifier as of now.
    pub fn raw_identifier(&self) -> String {
        if let Some(id) = &self.pinned {
            return id.clone();
        }

        std::env::var(PLATFORM_OVERRIDE_ENV)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| host_os_identifier().to_string())
    }

    pub fn detect(&self) -> PlatformKey {
        PlatformKey::from_os_identifier(&self.raw_identifier())
    }

    /// Execution settings for the detected platform (linux's when unknown).
    pub fn execution_config(&self) -> ExecutionConfig {
        execution_config(self.detect())
    }

    pub fn is_supported(&self) -> bool {
        self.detect().is_supported()
    }

    pub fn environment_format(&self) -> EnvironmentFormat {
        self.execution_config().environment_format()
    }

    pub fn diagnostics(&self) -> PlatformDiagnostics {
        let platform = self.raw_identifier();
        let detected_os = PlatformKey::from_os_identifier(&platform);

        PlatformDiagnostics {
            platform,
            detected_os,
            is_supported: detected_os.is_supported(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            arch: std::env::consts::ARCH.to_string(),
            family: std::env::consts::FAMILY.to_string(),
            supported_platforms: PlatformKey::supported().to_vec(),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// The host OS in `win32`/`darwin`/`linux` form. Other systems pass through.
pub fn host_os_identifier() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        "windows" => "win32",
        os => os,
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_known_identifiers() {
        let cases = [
            ("win32", PlatformKey::Windows),
            ("darwin", PlatformKey::Macos),
            ("linux", PlatformKey::Linux),
            ("sunos5", PlatformKey::Unknown),
        ];

        for (raw, expected) in cases {
            let detector = PlatformDetector::with_os_identifier(raw);
            assert_eq!(detector.detect(), expected, "identifier {raw}");
            assert_eq!(detector.is_supported(), expected != PlatformKey::Unknown);
        }
    }

    #[test]
    fn test_unknown_uses_linux_execution() {
        let unknown = PlatformDetector::with_os_identifier("haiku");
        let linux = PlatformDetector::with_os_identifier("linux");
        assert_eq!(unknown.execution_config(), linux.execution_config());
        assert!(!unknown.is_supported());
    }

    #[test]
    fn test_environment_format() {
        let windows = PlatformDetector::with_os_identifier("win32").environment_format();
        assert_eq!(windows.path_separator, '\\');
        assert_eq!(windows.env_var_format, "%NAME%");

        let macos = PlatformDetector::with_os_identifier("darwin").environment_format();
        assert_eq!(macos.path_separator, '/');
        assert_eq!(macos.env_var_format, "${NAME}");
    }

    #[test]
    fn test_diagnostics() {
        let info = PlatformDetector::with_os_identifier("darwin").diagnostics();
        assert_eq!(info.platform, "darwin");
        assert_eq!(info.detected_os, PlatformKey::Macos);
        assert!(info.is_supported);
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(info.supported_platforms.len(), 3);

        let info = PlatformDetector::with_os_identifier("plan9").diagnostics();
        assert_eq!(info.detected_os, PlatformKey::Unknown);
        assert!(!info.is_supported);
    }

    #[test]
    fn test_host_identifier_is_mapped() {
        let id = host_os_identifier();
        assert_ne!(id, "macos");
        assert_ne!(id, "windows");
    }
}
