//! Error taxonomy shared by every planner, and the accumulate-then-report
//! collector the executor uses to turn a batch of planning errors into one
//! process exit.

use std::path::PathBuf;

use strum::Display as StrumDisplay;
use thiserror::Error;

/// Which subcommand an error or action belongs to. Threaded through every
/// error and action so messages can read `dploy stow: ...`, `dploy unstow:
/// ...`, etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum SubCommand {
    Stow,
    Unstow,
    Clean,
    Link,
}

/// The full error taxonomy. Every variant's `Display` reproduces the exact
/// `dploy <subcmd>: can not <subcmd> ...` message layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DployError {
    #[error("dploy {subcmd}: can not {subcmd} '{}': A source argument is the same as the dest argument", .file.display())]
    SourceIsSameAsDest { subcmd: SubCommand, file: PathBuf },

    #[error("{}", format_conflicts_with_another_source(.subcmd, .files))]
    ConflictsWithAnotherSource {
        subcmd: SubCommand,
        files: Vec<PathBuf>,
    },

    #[error("dploy {subcmd}: can not {subcmd} '{}': Conflicts with existing file '{}'", .source.display(), .dest.display())]
    ConflictsWithExistingFile {
        subcmd: SubCommand,
        source: PathBuf,
        dest: PathBuf,
    },

    #[error("dploy {subcmd}: can not {subcmd} '{}': Conflicts with existing symlink '{}'", .source.display(), .dest.display())]
    ConflictsWithExistingLink {
        subcmd: SubCommand,
        source: PathBuf,
        dest: PathBuf,
    },

    #[error("dploy {subcmd}: can not {subcmd} '{}': Insufficient permissions", .file.display())]
    InsufficientPermissions { subcmd: SubCommand, file: PathBuf },

    #[error("dploy {subcmd}: can not {subcmd} from '{}': Insufficient permissions", .file.display())]
    InsufficientPermissionsToSubcmdFrom { subcmd: SubCommand, file: PathBuf },

    #[error("dploy {subcmd}: can not {subcmd} to '{}': Insufficient permissions", .file.display())]
    InsufficientPermissionsToSubcmdTo { subcmd: SubCommand, file: PathBuf },

    #[error("dploy {subcmd}: can not {subcmd} '{}': No such directory", .file.display())]
    NoSuchDirectory { subcmd: SubCommand, file: PathBuf },

    #[error("dploy {subcmd}: can not {subcmd} into '{}': No such directory", .file.display())]
    NoSuchDirectoryToSubcmdInto { subcmd: SubCommand, file: PathBuf },

    #[error("dploy {subcmd}: can not {subcmd} '{}': No such file or directory", .file.display())]
    NoSuchFileOrDirectory { subcmd: SubCommand, file: PathBuf },

    #[error("dploy {subcmd}: can not {subcmd} '{}': Permission denied", .file.display())]
    PermissionDenied { subcmd: SubCommand, file: PathBuf },

    #[error("dploy {subcmd}: can not {subcmd} '{}': Duplicate source argument", .file.display())]
    DuplicateSource { subcmd: SubCommand, file: PathBuf },
}

fn format_conflicts_with_another_source(subcmd: &SubCommand, files: &[PathBuf]) -> String {
    let mut list = String::new();
    for file in files {
        list.push_str("\n    ");
        list.push_str(&file.display().to_string());
    }
    format!("dploy {subcmd}: can not {subcmd} the following: Conflicts with other source {list}")
}

impl DployError {
    pub fn subcmd(&self) -> SubCommand {
        match self {
            DployError::SourceIsSameAsDest { subcmd, .. }
            | DployError::ConflictsWithAnotherSource { subcmd, .. }
            | DployError::ConflictsWithExistingFile { subcmd, .. }
            | DployError::ConflictsWithExistingLink { subcmd, .. }
            | DployError::InsufficientPermissions { subcmd, .. }
            | DployError::InsufficientPermissionsToSubcmdFrom { subcmd, .. }
            | DployError::InsufficientPermissionsToSubcmdTo { subcmd, .. }
            | DployError::NoSuchDirectory { subcmd, .. }
            | DployError::NoSuchDirectoryToSubcmdInto { subcmd, .. }
            | DployError::NoSuchFileOrDirectory { subcmd, .. }
            | DployError::PermissionDenied { subcmd, .. }
            | DployError::DuplicateSource { subcmd, .. } => *subcmd,
        }
    }
}

/// Accumulates errors during planning and decides, once planning is
/// finished, whether to report and fail or let the executor proceed.
#[derive(Debug, Default)]
pub struct ErrorList {
    errors: Vec<DployError>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: DployError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Prints every collected error to stderr (unless `silent`) and returns
    /// the first one as the failure, if any were collected.
    pub fn handle(&self, silent: bool) -> Result<(), DployError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        if !silent {
            for error in &self.errors {
                eprintln!("{error}");
            }
        }
        Err(self.errors[0].clone())
    }
}

