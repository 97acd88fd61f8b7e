//! The planned-effect tagged union. Every planner emits a `Vec<Action>`;
//! the executor is the only thing that interprets them.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DployError, SubCommand};
use crate::path;

#[derive(Debug, Clone)]
pub enum Action {
    /// Create a symlink at `dest` whose literal (possibly relative) target
    /// is `source_rel`.
    SymbolicLink {
        subcmd: SubCommand,
        source_rel: PathBuf,
        dest: PathBuf,
    },
    /// Remove the symlink at `target`. Asserted to be a symlink at
    /// execution time.
    UnLink { subcmd: SubCommand, target: PathBuf },
    /// Create an empty directory at `target`. The parent is assumed to
    /// exist by construction.
    MakeDirectory { subcmd: SubCommand, target: PathBuf },
    /// Remove the (assumed-empty) directory at `target`.
    RemoveDirectory { subcmd: SubCommand, target: PathBuf },
    /// `dest` is already a symlink to `source_rel`; nothing to do.
    AlreadyLinked {
        subcmd: SubCommand,
        source_rel: PathBuf,
        dest: PathBuf,
    },
    /// `dest` was never one of ours; nothing to do.
    AlreadyUnlinked {
        subcmd: SubCommand,
        source_rel: PathBuf,
        dest: PathBuf,
    },
}

impl Action {
    pub fn symbolic_link(subcmd: SubCommand, source: &Path, dest: &Path) -> Self {
        let source_rel = path::relative(source, dest.parent().unwrap_or(Path::new(".")));
        Action::SymbolicLink {
            subcmd,
            source_rel,
            dest: dest.to_path_buf(),
        }
    }

    pub fn already_linked(subcmd: SubCommand, source: &Path, dest: &Path) -> Self {
        let source_rel = path::relative(source, dest.parent().unwrap_or(Path::new(".")));
        Action::AlreadyLinked {
            subcmd,
            source_rel,
            dest: dest.to_path_buf(),
        }
    }

    pub fn already_unlinked(subcmd: SubCommand, source: &Path, dest: &Path) -> Self {
        let source_rel = path::relative(source, dest.parent().unwrap_or(Path::new(".")));
        Action::AlreadyUnlinked {
            subcmd,
            source_rel,
            dest: dest.to_path_buf(),
        }
    }

    pub fn dest(&self) -> Option<&Path> {
        match self {
            Action::SymbolicLink { dest, .. }
            | Action::AlreadyLinked { dest, .. }
            | Action::AlreadyUnlinked { dest, .. } => Some(dest),
            Action::UnLink { target, .. }
            | Action::MakeDirectory { target, .. }
            | Action::RemoveDirectory { target, .. } => Some(target),
        }
    }

    /// The line printed for this action, matching the exact `dploy
    /// <subcmd>: ...` output format. Reads the live filesystem for
    /// `UnLink` (its source is the link's current literal target), which
    /// is only safe because printing happens immediately before execution,
    /// while the symlink still exists.
    pub fn describe(&self) -> String {
        match self {
            Action::SymbolicLink {
                subcmd,
                source_rel,
                dest,
            } => format!(
                "dploy {subcmd}: link {} => {}",
                dest.display(),
                source_rel.display()
            ),
            Action::AlreadyLinked {
                subcmd,
                source_rel,
                dest,
            } => format!(
                "dploy {subcmd}: already linked {} => {}",
                dest.display(),
                source_rel.display()
            ),
            Action::AlreadyUnlinked {
                subcmd,
                source_rel,
                dest,
            } => format!(
                "dploy {subcmd}: already unlinked {} => {}",
                dest.display(),
                source_rel.display()
            ),
            Action::UnLink { subcmd, target } => {
                let target_rel = path::readlink(target, false).unwrap_or_default();
                format!(
                    "dploy {subcmd}: unlink {} => {}",
                    target.display(),
                    target_rel.display()
                )
            }
            Action::MakeDirectory { subcmd, target } => {
                format!("dploy {subcmd}: make directory {}", target.display())
            }
            Action::RemoveDirectory { subcmd, target } => {
                format!("dploy {subcmd}: remove directory {}", target.display())
            }
        }
    }

    /// Applies this action's effect to the real filesystem.
    pub fn execute(&self) -> Result<(), DployError> {
        match self {
            Action::SymbolicLink {
                subcmd,
                source_rel,
                dest,
            } => create_symlink(source_rel, dest).map_err(|_| {
                DployError::InsufficientPermissionsToSubcmdTo {
                    subcmd: *subcmd,
                    file: dest
                        .parent()
                        .unwrap_or(Path::new("."))
                        .to_path_buf(),
                }
            }),
            Action::UnLink { subcmd, target } => {
                assert!(
                    target.is_symlink(),
                    "dploy: internal error: attempted to unlink a non-symlink at {}",
                    target.display()
                );
                fs::remove_file(target).map_err(|_| DployError::PermissionDenied {
                    subcmd: *subcmd,
                    file: target.clone(),
                })
            }
            Action::MakeDirectory { subcmd, target } => {
                fs::create_dir(target).map_err(|_| DployError::PermissionDenied {
                    subcmd: *subcmd,
                    file: target.clone(),
                })
            }
            Action::RemoveDirectory { subcmd, target } => {
                fs::remove_dir(target).map_err(|_| DployError::PermissionDenied {
                    subcmd: *subcmd,
                    file: target.clone(),
                })
            }
            Action::AlreadyLinked { .. } | Action::AlreadyUnlinked { .. } => Ok(()),
        }
    }
}

#[cfg(unix)]
fn create_symlink(source_rel: &Path, dest: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source_rel, dest)
}

#[cfg(windows)]
fn create_symlink(source_rel: &Path, dest: &Path) -> std::io::Result<()> {
    let source_abs = dest
        .parent()
        .unwrap_or(Path::new("."))
        .join(source_rel);
    if source_abs.is_dir() {
        std::os::windows::fs::symlink_dir(source_rel, dest)
    } else {
        std::os::windows::fs::symlink_file(source_rel, dest)
    }
}
