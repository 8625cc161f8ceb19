//! Setup command handlers.

use std::path::PathBuf;

use colored::Colorize;

use super::{fail_if_any, mark, print_json, resolve_dir};
use crate::diff::ConfigDiff;
use crate::error::{PlatformError, PlatformResult};
use crate::generator::ConfigGenerator;
use crate::setup::{
    Impact, SetupSelection, dry_run as preview_setup, setup_project, setup_status,
    validate_setup,
};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

pub fn setup(
    generator: &ConfigGenerator,
    dir: Option<PathBuf>,
    selection: SetupSelection,
    json: bool,
) -> PlatformResult<()> {
    let base = resolve_dir(dir)?;
    let report = setup_project(generator, &base, selection);

    if json {
        print_json(&report)?;
    } else {
        println!();
        if let Some(error) = &report.error {
            println!("  {} Setup refused", mark(false));
            println!();
            println!("    {}", error);
        } else {
            println!(
                "  {} Setup for {}",
                mark(report.success),
                report.platform_detected.to_string().bold()
            );
            println!();
            for (kind, ok) in &report.details {
                println!(
                    "    {} {}",
                    mark(*ok),
                    kind.artifact_path(&base).display()
                );
            }
            if !report.backups.is_empty() {
                println!();
                for backup in &report.backups {
                    println!(
                        "    {}: {}",
                        "backup".dimmed(),
                        backup.display().to_string().dimmed()
                    );
                }
            }
        }
        println!();
    }

    if let Some(error) = report.error {
        return Err(PlatformError::Generic(error));
    }
    let failed: Vec<String> = report.failed().iter().map(ToString::to_string).collect();
    fail_if_any(&failed)
}

/// Show which artifacts exist and whether they are valid.
pub fn status(generator: &ConfigGenerator, dir: Option<PathBuf>, json: bool) -> PlatformResult<()> {
    let base = resolve_dir(dir)?;
    let status = setup_status(generator, &base);
    let validation = validate_setup(&base);

    if json {
        return print_json(&serde_json::json!({
            "status": status,
            "validation": validation,
        }));
    }

    println!();
    println!(
        "  {} {} {}",
        mark(status.is_supported),
        status.platform_detected.to_string().bold(),
        base.display().to_string().dimmed()
    );
    println!();
    for (kind, applied) in &status.configs_applied {
        let path = kind.artifact_path(&base);
        let backups = status.backups.get(kind).copied().unwrap_or_default();
        let state = match (applied, validation.config_validations.get(kind)) {
            (false, _) => "missing".dimmed(),
            (true, Some(false)) => "invalid".bright_red(),
            (true, _) => "present".bright_green(),
        };
        println!(
            "    {} {} {}",
            path.display(),
            state,
            format!("({} backups)", backups).dimmed()
        );
    }
    if !validation.issues.is_empty() {
        println!();
        for issue in &validation.issues {
            println!("    {} {}", "error".bright_red(), issue);
        }
    }
    println!();
    Ok(())
}

pub fn dry_run(generator: &ConfigGenerator, dir: Option<PathBuf>, json: bool) -> PlatformResult<()> {
    let base = resolve_dir(dir)?;
    let report = preview_setup(generator, &base);

    if json {
        return print_json(&report);
    }

    let impact = match report.estimated_impact {
        Impact::Low => "low".bright_green(),
        Impact::Medium => "medium".bright_yellow(),
    };

    println!();
    println!(
        "  {} {} {}",
        "Dry run for".bold(),
        report.platform_detected.to_string().bold(),
        format!("(impact: {})", impact).dimmed()
    );
    println!();
    for artifact in report.artifacts.values() {
        let action = if artifact.would_create {
            "create".bright_green()
        } else {
            "modify".bright_yellow()
        };
        println!("    {} {}", action, artifact.path.display());

        if let Some(error) = &artifact.error {
            println!("      {} {}", "error".bright_red(), error);
        }
        if let Some(changes) = &artifact.changes {
            print_change_paths(changes);
        }
    }
    println!();
    Ok(())
}

fn print_change_paths(changes: &ConfigDiff) {
    if changes.is_empty() {
        println!("      {}", "unchanged".dimmed());
    }
    for path in changes.keys() {
        println!("      {} {}", "~".bright_yellow(), path);
    }
}
