//! Generator command handlers.

use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Serialize;

use super::{fail_if_any, load_document, mark, print_json, resolve_dir};
use crate::diff::DiffEntry;
use crate::document::ConfigDocument;
use crate::error::{PlatformError, PlatformResult};
use crate::generator::ConfigGenerator;
use crate::templates::{ConfigKind, validation_issues};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

#[derive(Serialize)]
struct ValidateOutput<'a> {
    kind: ConfigKind,
    path: &'a Path,
    valid: bool,
    issues: Vec<String>,
}

#[derive(Serialize)]
struct RollbackOutput<'a> {
    path: &'a Path,
    restored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    backup: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

pub fn detect(generator: &ConfigGenerator, json: bool) -> PlatformResult<()> {
    let diagnostics = generator.detector().diagnostics();
    let exec = generator.detector().execution_config();

    if json {
        return print_json(&serde_json::json!({
            "diagnostics": diagnostics,
            "execution": exec,
        }));
    }

    println!();
    println!(
        "  {} {} {}",
        mark(diagnostics.is_supported),
        diagnostics.detected_os.to_string().bold(),
        format!("({})", diagnostics.platform).dimmed()
    );
    if !diagnostics.is_supported {
        println!(
            "    {}: using {} templates",
            "warning".bright_yellow().bold(),
            diagnostics.detected_os.template_key()
        );
    }
    println!();
    println!("    {}: {} {}", "Shell".dimmed(), exec.command, exec.shell_flag());
    println!(
        "    {}: {}",
        "Env vars".dimmed(),
        exec.format_env_var("HOME").bright_cyan()
    );
    println!("    {}: {}", "Path separator".dimmed(), exec.path_separator);
    println!("    {}: {}", "Encoding".dimmed(), exec.encoding);
    println!("    {}: {}", "Arch".dimmed(), diagnostics.arch);
    println!();
    Ok(())
}

pub fn generate(generator: &ConfigGenerator, kind: &str, json: bool) -> PlatformResult<()> {
    if kind.trim().eq_ignore_ascii_case("all") {
        let configs = generator.generate_all();
        if json {
            return print_json(&configs);
        }

        for (kind, document) in [
            (ConfigKind::Mcp, &configs.mcp),
            (ConfigKind::Statusline, &configs.statusline),
            (ConfigKind::ClaudeSettings, &configs.claude_settings),
        ] {
            print_document(kind, document)?;
        }
        return Ok(());
    }

    let kind: ConfigKind = kind.parse()?;
    let document = generator.generate(kind);
    if json {
        print!("{}", document.to_pretty_json()?);
        return Ok(());
    }
    print_document(kind, &document)
}

pub fn apply(generator: &ConfigGenerator, dir: Option<PathBuf>, json: bool) -> PlatformResult<()> {
    let base = resolve_dir(dir)?;
    let report = generator.apply_all(&base);

    if json {
        print_json(&report)?;
    } else {
        println!();
        for (kind, ok) in report.by_kind() {
            println!(
                "  {} {}",
                mark(ok),
                kind.artifact_path(&base).display().to_string().bold()
            );
        }
        println!();
    }

    let failed: Vec<String> = report
        .by_kind()
        .into_iter()
        .filter(|(_, ok)| !ok)
        .map(|(kind, _)| kind.to_string())
        .collect();
    fail_if_any(&failed)
}

pub fn rollback(
    generator: &ConfigGenerator,
    path: &Path,
    list: bool,
    json: bool,
) -> PlatformResult<()> {
    if list {
        let backups = generator.list_backups(path);
        if json {
            return print_json(&backups);
        }

        println!();
        if backups.is_empty() {
            println!("  No backups for {}", path.display().to_string().bold());
        }
        for backup in &backups {
            println!("  {}", backup.display());
        }
        println!();
        return Ok(());
    }

    let result = generator.try_rollback(path);

    if json {
        print_json(&RollbackOutput {
            path,
            restored: result.is_ok(),
            backup: result.as_ref().ok().cloned(),
            error: result.as_ref().err().map(ToString::to_string),
        })?;
        return result.map(|_| ());
    }

    let restored_from = result?;
    println!();
    println!(
        "  {} Restored {} from {}",
        mark(true),
        path.display().to_string().bold(),
        restored_from.display().to_string().dimmed()
    );
    println!();
    Ok(())
}

pub fn diff(generator: &ConfigGenerator, old: &Path, new: &Path, json: bool) -> PlatformResult<()> {
    let old_doc = load_document(old)?;
    let new_doc = load_document(new)?;
    let changes = generator.diff(&old_doc, &new_doc);

    if json {
        return print_json(&changes);
    }

    println!();
    if changes.is_empty() {
        println!("  {} No differences", mark(true));
    }
    for (path, entry) in &changes {
        match entry {
            DiffEntry::Changed { old, new } => println!(
                "  {} {}: {} → {}",
                "~".bright_yellow(),
                path.bold(),
                compact(old)?.dimmed(),
                compact(new)?
            ),
            DiffEntry::Added { added } => {
                println!("  {} {}: {}", "+".bright_green(), path.bold(), compact(added)?)
            }
            DiffEntry::Removed { removed } => println!(
                "  {} {}: {}",
                "-".bright_red(),
                path.bold(),
                compact(removed)?.dimmed()
            ),
        }
    }
    println!();
    Ok(())
}

pub fn validate(kind: &str, path: &Path, json: bool) -> PlatformResult<()> {
    let kind: ConfigKind = kind.parse()?;
    let document = load_document(path)?;
    let issues = validation_issues(&document, kind);

    if json {
        print_json(&ValidateOutput {
            kind,
            path,
            valid: issues.is_empty(),
            issues: issues.clone(),
        })?;
    } else {
        println!();
        if issues.is_empty() {
            println!(
                "  {} {} is a valid {} document",
                mark(true),
                path.display().to_string().bold(),
                kind
            );
        } else {
            println!(
                "  {} {} is not a valid {} document",
                mark(false),
                path.display().to_string().bold(),
                kind
            );
            println!();
            for issue in &issues {
                println!("    {} {}", "error".bright_red(), issue);
            }
        }
        println!();
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(PlatformError::InvalidDocument {
            kind: kind.to_string(),
            issues: issues.join("; "),
        })
    }
}

pub fn summary(generator: &ConfigGenerator, json: bool) -> PlatformResult<()> {
    let summary = generator.summary();
    if json {
        return print_json(&summary);
    }

    println!();
    println!(
        "  {} {}",
        mark(summary.is_supported),
        summary.current_os.to_string().bold()
    );
    println!();
    println!(
        "    {}: {}",
        "MCP servers".dimmed(),
        summary.mcp_servers.join(", ")
    );
    println!(
        "    {}: {}",
        "Statusline".dimmed(),
        summary.statusline_command
    );
    println!(
        "    {}: {}",
        "Claude statusline".dimmed(),
        summary.claude_statusline_command
    );
    if !summary.recommendations.is_empty() {
        println!();
        for recommendation in &summary.recommendations {
            println!("    {}: {}", "hint".bright_blue().bold(), recommendation);
        }
    }
    println!();
    Ok(())
}

fn print_document(kind: ConfigKind, document: &ConfigDocument) -> PlatformResult<()> {
    println!("{}", format!("# {}", kind).dimmed());
    print!("{}", document.to_pretty_json()?);
    println!();
    Ok(())
}

fn compact<T: Serialize>(value: &T) -> PlatformResult<String> {
    Ok(serde_json::to_string(value)?)
}
