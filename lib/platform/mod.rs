//! Platform detection and per-platform execution settings.

mod detector;
mod execution;
mod key;

//--------------------------------------------------------------------------------------------------
// Re-Exports
//--------------------------------------------------------------------------------------------------

pub use detector::{PlatformDetector, PlatformDiagnostics, host_os_identifier};
pub use execution::{ENV_VAR_PLACEHOLDER, EnvironmentFormat, ExecutionConfig, execution_config};
pub use key::PlatformKey;
