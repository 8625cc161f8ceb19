//! Execution shell settings per platform.

use serde::Serialize;

use super::PlatformKey;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// How commands are launched on a platform.
///
/// Values are built fresh from a constant table on every lookup, so callers
/// own their copy and cannot alter the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionConfig {
    /// Shell program used to launch child processes.
    pub command: String,
    /// Leading arguments for [`Self::command`] (the shell-invocation flag).
    pub args: Vec<String>,
    /// Whether the command is run through the system shell.
    pub shell: bool,
    pub encoding: String,
    pub path_separator: char,
    /// Environment variable reference pattern; [`ENV_VAR_PLACEHOLDER`] marks
    /// the variable name.
    pub env_var_format: String,
    /// Whether startup latency is tuned (skips launcher hops).
    pub fast_startup: bool,
}

/// Path and environment variable conventions of a platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentFormat {
    pub path_separator: char,
    pub env_var_format: String,
}

struct ExecutionTemplate {
    command: &'static str,
    args: &'static [&'static str],
    shell: bool,
    encoding: &'static str,
    path_separator: char,
    env_var_format: &'static str,
    fast_startup: bool,
}

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Token in `env_var_format` replaced by the variable name.
pub const ENV_VAR_PLACEHOLDER: &str = "NAME";

const WINDOWS: ExecutionTemplate = ExecutionTemplate {
    command: "cmd",
    args: &["/c"],
    shell: true,
    encoding: "utf-8",
    path_separator: '\\',
    env_var_format: "%NAME%",
    fast_startup: true,
};

const MACOS: ExecutionTemplate = ExecutionTemplate {
    command: "bash",
    args: &["-c"],
    shell: false,
    encoding: "utf-8",
    path_separator: '/',
    env_var_format: "${NAME}",
    fast_startup: false,
};

const LINUX: ExecutionTemplate = ExecutionTemplate {
    command: "bash",
    args: &["-c"],
    shell: false,
    encoding: "utf-8",
    path_separator: '/',
    env_var_format: "${NAME}",
    fast_startup: false,
};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Execution settings for a platform. `Unknown` gets linux's settings.
pub fn execution_config(platform: PlatformKey) -> ExecutionConfig {
    let template = match platform.template_key() {
        PlatformKey::Windows => &WINDOWS,
        PlatformKey::Macos => &MACOS,
        PlatformKey::Linux | PlatformKey::Unknown => &LINUX,
    };
    template.to_config()
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ExecutionTemplate {
    fn to_config(&self) -> ExecutionConfig {
        ExecutionConfig {
            command: self.command.to_string(),
            args: self.args.iter().map(|a| a.to_string()).collect(),
            shell: self.shell,
            encoding: self.encoding.to_string(),
            path_separator: self.path_separator,
            env_var_format: self.env_var_format.to_string(),
            fast_startup: self.fast_startup,
        }
    }
}

impl ExecutionConfig {
    /// The shell-invocation flag (`/c` or `-c`).
    pub fn shell_flag(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or_default()
    }

    /// Render a reference to an environment variable, e.g. `%PATH%` or `${PATH}`.
    pub fn format_env_var(&self, name: &str) -> String {
        self.env_var_format.replacen(ENV_VAR_PLACEHOLDER, name, 1)
    }

    pub fn environment_format(&self) -> EnvironmentFormat {
        EnvironmentFormat {
            path_separator: self.path_separator,
            env_var_format: self.env_var_format.clone(),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_execution() {
        let config = execution_config(PlatformKey::Windows);
        assert_eq!(config.command, "cmd");
        assert_eq!(config.shell_flag(), "/c");
        assert!(config.shell);
        assert!(config.fast_startup);
        assert_eq!(config.path_separator, '\\');
        assert_eq!(config.format_env_var("PATH"), "%PATH%");
    }

    #[test]
    fn test_unix_execution() {
        for platform in [PlatformKey::Macos, PlatformKey::Linux] {
            let config = execution_config(platform);
            assert_eq!(config.command, "bash");
            assert_eq!(config.args, vec!["-c"]);
            assert!(!config.shell);
            assert!(!config.fast_startup);
            assert_eq!(config.encoding, "utf-8");
            assert_eq!(config.format_env_var("HOME"), "${HOME}");
        }
    }

    #[test]
    fn test_env_var_names_are_inserted_verbatim() {
        let linux = execution_config(PlatformKey::Linux);
        assert_eq!(linux.format_env_var("XDG_CONFIG_HOME"), "${XDG_CONFIG_HOME}");
        assert_eq!(linux.format_env_var("NAME"), "${NAME}");

        let windows = execution_config(PlatformKey::Windows);
        assert_eq!(windows.format_env_var("APPDATA"), "%APPDATA%");
        assert_eq!(
            windows.environment_format().env_var_format,
            windows.env_var_format
        );
    }

    #[test]
    fn test_unknown_matches_linux() {
        assert_eq!(
            execution_config(PlatformKey::Unknown),
            execution_config(PlatformKey::Linux)
        );
    }

    #[test]
    fn test_returned_configs_are_independent() {
        let mut first = execution_config(PlatformKey::Linux);
        first.command = "zsh".into();
        first.args.push("--login".into());

        let second = execution_config(PlatformKey::Linux);
        assert_eq!(second.command, "bash");
        assert_eq!(second.args, vec!["-c"]);
    }
}
