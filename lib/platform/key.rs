//! Canonical platform keys.

use std::fmt;

use serde::{Deserialize, Serialize};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Canonical OS category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKey {
    Windows,
    Macos,
    Linux,
    Unknown,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl PlatformKey {
    /// Map a raw OS identifier (`win32`, `darwin`, `linux`) to a key.
    /// Anything else is [`PlatformKey::Unknown`].
    pub fn from_os_identifier(raw: &str) -> Self {
        match raw {
            "win32" => Self::Windows,
            "darwin" => Self::Macos,
            "linux" => Self::Linux,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Macos => "macos",
            Self::Linux => "linux",
            Self::Unknown => "unknown",
        }
    }

    /// Platforms with a dedicated template.
    pub fn supported() -> &'static [PlatformKey] {
        &[Self::Windows, Self::Macos, Self::Linux]
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Key whose templates this platform uses. `Unknown` borrows linux's.
    pub fn template_key(&self) -> PlatformKey {
        match self {
            Self::Unknown => Self::Linux,
            other => *other,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
