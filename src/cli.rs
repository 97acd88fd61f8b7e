use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Deploy package directories into a destination tree via symlinks.
#[derive(Parser)]
#[command(name = "dploy", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Describe the plan without touching the filesystem.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Suppress the per-action/per-error output lines.
    #[arg(long, global = true)]
    pub silent: bool,
}

#[derive(Subcommand, Debug, strum::Display, Clone)]
#[command(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Command {
    /// Link one or more package directories into dest.
    Stow {
        /// Package directories to deploy.
        #[arg(required = true)]
        sources: Vec<PathBuf>,
        /// The directory to deploy into.
        dest: PathBuf,
        /// Shell-style glob to ignore, relative to each source root.
        #[arg(short, long)]
        ignore: Vec<String>,
    },
    /// Remove symlinks previously planted by stow.
    Unstow {
        /// Package directories to remove.
        #[arg(required = true)]
        sources: Vec<PathBuf>,
        /// The directory to remove links from.
        dest: PathBuf,
        /// Shell-style glob to ignore, relative to each source root.
        #[arg(short, long)]
        ignore: Vec<String>,
    },
    /// Remove broken symlinks in dest that point into source.
    Clean {
        /// Package directories whose broken links should be removed.
        #[arg(required = true)]
        sources: Vec<PathBuf>,
        /// The directory to clean.
        dest: PathBuf,
    },
    /// Create a single symlink pointing at source.
    Link {
        /// The file or directory the link will point to.
        source: PathBuf,
        /// The path at which to create the link.
        dest: PathBuf,
    },
}
