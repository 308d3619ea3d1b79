//! Command-line interface definition and command implementations.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

pub mod completions;
pub mod log;
pub mod resolve;
pub mod utils;
pub mod visible;

/// gitscope - resolve, page and gate git browser requests.
#[derive(Debug, Parser)]
#[command(name = "gitscope", version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of `<git-dir>/gitscope.toml`.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only print essential output.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log resolution steps to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where a request is served from, and for whom.
#[derive(Debug, Clone, Args)]
pub struct Target {
    /// Repository to read (defaults to the current directory).
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub repo: PathBuf,

    /// Principal the request is made as (defaults to anonymous).
    #[arg(long, value_name = "KEY")]
    pub user: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Split a request path into revisions and a tree path.
    Resolve {
        /// Request path, e.g. `/main..feature/src/lib.rs`.
        path: String,

        #[command(flatten)]
        target: Target,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show one page of the history a request path names.
    Log {
        /// Request path, e.g. `/main` or `/v1.0..v2.0`.
        path: String,

        #[command(flatten)]
        target: Target,

        /// Commits per page.
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Commit the page starts at, as printed by a previous page.
        #[arg(short, long, value_name = "SHA")]
        start: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check whether an object may be shown.
    Visible {
        /// Object id, full or abbreviated.
        #[arg(value_name = "SHA")]
        id: String,

        #[command(flatten)]
        target: Target,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Flags shared by every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct Global<'a> {
    pub config: Option<&'a Path>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_flags() {
        let cli = Cli::try_parse_from([
            "gitscope", "log", "/main", "--repo", "/srv/git/a.git", "-n", "5", "--user",
            "alice", "-v",
        ])
        .unwrap_or_else(|e| panic!("{e}"));

        assert!(cli.verbose);
        let Commands::Log {
            path,
            target,
            limit,
            start,
            json,
        } = cli.command
        else {
            panic!("expected log command");
        };
        assert_eq!(path, "/main");
        assert_eq!(target.repo, PathBuf::from("/srv/git/a.git"));
        assert_eq!(target.user.as_deref(), Some("alice"));
        assert_eq!(limit, Some(5));
        assert_eq!(start, None);
        assert!(!json);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["gitscope", "-q", "-v", "visible", "abc"]).is_err());
    }
}
