//! Help text macros.

/// Build an `Examples:` help block from `"command" # "description"` pairs.
#[macro_export]
macro_rules! examples {
    [$($cmd:literal # $desc:literal),* $(,)?] => {
        $crate::examples_section!["Examples:"; $($cmd # $desc),*]
    };
}

/// Build a titled help block from `"command" # "description"` pairs.
#[macro_export]
macro_rules! examples_section {
    [$title:literal; $($cmd:literal # $desc:literal),* $(,)?] => {
        concat!($title, $("\n  ", $cmd, "  ", $desc),*)
    };
}
