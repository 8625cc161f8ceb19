//! CLI command definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::styles::styles;
use crate::{examples, examples_section};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

const GENERATE_EXAMPLES: &str = examples![
    "moai-platform generate mcp              " # "Print the MCP manifest for this OS",
    "moai-platform generate claude-settings  " # "Print the Claude settings fragment",
    "moai-platform generate all --json       " # "All three documents with platform info",
];

const SETUP_EXAMPLES: &str = examples![
    "moai-platform setup                     " # "Write every artifact in the current directory",
    "moai-platform setup --dir ./my-project  " # "Write into another project",
    "moai-platform setup --mcp-only          " # "Only write .mcp.json",
    "moai-platform setup --statusline-only   " # "Only write .claude/statusline.json",
];

const ROLLBACK_EXAMPLES: &str = examples![
    "moai-platform rollback .mcp.json        " # "Restore the newest backup",
    "moai-platform rollback .mcp.json --list " # "Show backups without restoring",
];

const VALIDATE_EXAMPLES: &str = examples![
    "moai-platform validate mcp .mcp.json                        " # "Check an MCP manifest",
    "moai-platform validate statusline .claude/statusline.json   " # "Check a statusline spec",
];

const STATUSLINE_EXAMPLES: &str = examples![
    "echo '{\"model\":{\"name\":\"opus\"}}' | moai-platform statusline-data" # "Normalize a session context",
];

const CLI_EXAMPLES: &str = concat!(
    examples![
        "moai-platform detect                    " # "Show the detected platform",
        "moai-platform generate all              " # "Preview generated documents",
        "moai-platform dry-run                   " # "Show what setup would change",
        "moai-platform setup                     " # "Write the configuration",
        "moai-platform rollback .mcp.json        " # "Undo the last write",
    ],
    "\n\n",
    examples_section!["Environment:";
        "MOAI_PLATFORM=win32                     " # "Pretend to run on another OS",
        "MOAI_STATUSLINE_MODE=compact            " # "Default statusline mode",
        "RUST_LOG=debug                          " # "Log to stderr",
    ],
);

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// MoAI platform configuration.
#[derive(Debug, Parser)]
#[command(name = "moai-platform", author, version, styles=styles())]
#[command(
    about = "Generate and apply platform-aware MoAI configuration",
    after_help = CLI_EXAMPLES
)]
pub struct Cli {
    /// Print machine-readable JSON instead of formatted text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the detected platform and its execution settings.
    Detect,

    /// Print a generated document without writing it.
    #[command(after_help = GENERATE_EXAMPLES)]
    Generate {
        /// Config kind: mcp, statusline, claude_settings, or all.
        #[arg(default_value = "all")]
        kind: String,
    },

    /// Write .mcp.json and .claude/settings.json, backing up existing files.
    Apply {
        /// Project root (defaults to current directory).
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Set up a project: write the selected artifacts.
    #[command(after_help = SETUP_EXAMPLES)]
    Setup {
        /// Project root (defaults to current directory).
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Only write the MCP manifest.
        #[arg(long, conflicts_with_all = ["statusline_only", "claude_only"])]
        mcp_only: bool,

        /// Only write the statusline launch spec.
        #[arg(long, conflicts_with = "claude_only")]
        statusline_only: bool,

        /// Only write the Claude settings.
        #[arg(long)]
        claude_only: bool,
    },

    /// Restore a file from its newest backup.
    #[command(after_help = ROLLBACK_EXAMPLES)]
    Rollback {
        /// File that was previously applied.
        path: PathBuf,

        /// List backups, newest first, instead of restoring.
        #[arg(short, long)]
        list: bool,
    },

    /// Show structural differences between two JSON documents.
    Diff {
        /// Old document.
        old: PathBuf,

        /// New document.
        new: PathBuf,
    },

    /// Check a document against the shape of its kind.
    #[command(after_help = VALIDATE_EXAMPLES)]
    Validate {
        /// Config kind: mcp, statusline, or claude_settings.
        kind: String,

        /// Document to check.
        path: PathBuf,
    },

    /// Show which artifacts exist in a project.
    Status {
        /// Project root (defaults to current directory).
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Preview what setup would create or modify.
    DryRun {
        /// Project root (defaults to current directory).
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Summarize the configuration for this platform.
    Summary,

    /// Read a session context from stdin and print the statusline record.
    #[command(after_help = STATUSLINE_EXAMPLES)]
    StatuslineData,
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
