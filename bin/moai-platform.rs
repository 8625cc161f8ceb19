//! `moai-platform` is the command-line entry point.

use clap::Parser;
use colored::Colorize;
use moai_platform::handlers;
use moai_platform::{
    Cli, Command, ConfigGenerator, ConfigKind, PlatformError, PlatformResult, SetupSelection,
};
use tracing_subscriber::EnvFilter;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn main() {
    init_tracing();

    if let Err(e) = run() {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print an error with formatting based on its kind.
fn print_error(e: &PlatformError) {
    eprintln!();
    match e {
        PlatformError::ApplyFailed(kinds) => {
            eprintln!("  {} Some artifacts were not applied", "error".bright_red().bold());
            eprintln!();
            for kind in kinds.split(", ") {
                eprintln!("    {} {}", "✗".bright_red(), kind);
            }
            eprintln!();
            eprintln!(
                "    {}: rerun with {} for details",
                "hint".bright_blue().bold(),
                "RUST_LOG=warn".bright_white()
            );
        }
        PlatformError::InvalidDocument { kind, .. } => {
            eprintln!(
                "  {} Document is not a valid {}",
                "error".bright_red().bold(),
                kind.bright_white()
            );
        }
        PlatformError::UnknownKind(kind) => {
            eprintln!(
                "  {} Unknown config kind '{}'",
                "error".bright_red().bold(),
                kind.bright_white()
            );
            eprintln!();
            eprintln!(
                "    {}: expected one of {}",
                "hint".bright_blue().bold(),
                ConfigKind::ALL.map(|k| k.as_str()).join(", ")
            );
        }
        PlatformError::NoBackup(path) => {
            eprintln!(
                "  {} No backup found for {}",
                "error".bright_red().bold(),
                path.display().to_string().bright_white()
            );
        }
        _ => {
            let msg = e.to_string();
            match msg.split_once(": ") {
                Some((prefix, rest)) if prefix.ends_with("error") => {
                    eprintln!(
                        "  {} {}",
                        format!("error[{}]", prefix.to_lowercase().replace(" error", ""))
                            .bright_red()
                            .bold(),
                        rest.dimmed()
                    );
                }
                _ => eprintln!("  {} {}", "error".bright_red().bold(), msg),
            }
        }
    }
    eprintln!();
}

/// Initialize tracing. Only enables logging when RUST_LOG is set.
fn init_tracing() {
    let rust_log_set = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.is_empty())
        .is_some();

    // stdout carries command output.
    if !rust_log_set {
        return;
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run() -> PlatformResult<()> {
    let cli = Cli::parse();
    let generator = ConfigGenerator::new();
    let json = cli.json;

    match cli.command {
        Command::Detect => handlers::detect(&generator, json),

        Command::Generate { kind } => handlers::generate(&generator, &kind, json),

        Command::Apply { dir } => handlers::apply(&generator, dir, json),

        Command::Setup {
            dir,
            mcp_only,
            statusline_only,
            claude_only,
        } => {
            let selection = if mcp_only {
                SetupSelection::only(ConfigKind::Mcp)
            } else if statusline_only {
                SetupSelection::only(ConfigKind::Statusline)
            } else if claude_only {
                SetupSelection::only(ConfigKind::ClaudeSettings)
            } else {
                SetupSelection::all()
            };
            handlers::setup(&generator, dir, selection, json)
        }

        Command::Rollback { path, list } => handlers::rollback(&generator, &path, list, json),

        Command::Diff { old, new } => handlers::diff(&generator, &old, &new, json),

        Command::Validate { kind, path } => handlers::validate(&kind, &path, json),

        Command::Status { dir } => handlers::status(&generator, dir, json),

        Command::DryRun { dir } => handlers::dry_run(&generator, dir, json),

        Command::Summary => handlers::summary(&generator, json),

        Command::StatuslineData => handlers::statusline_data(),
    }
}
