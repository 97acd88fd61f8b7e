//! Shared validation and the four per-subcommand tree walkers.

pub mod clean;
pub mod link;
pub mod stow;
pub mod unstow;

use std::path::{Path, PathBuf};

use crate::error::{DployError, SubCommand};
use crate::path;

/// Which directory-level checks a subcommand's destination is held to.
/// Generalizes the original's per-subcommand `_is_valid_dest` overrides
/// into one small config struct, per the redesign called for by the
/// polymorphism-to-tagged-sum note.
pub struct DestRequirement {
    pub need_write: bool,
    pub need_execute: bool,
}

pub const STOW_DEST: DestRequirement = DestRequirement {
    need_write: true,
    need_execute: false,
};
pub const UNSTOW_OR_CLEAN_DEST: DestRequirement = DestRequirement {
    need_write: true,
    need_execute: true,
};

/// Expands a leading `~` and resolves `p` to an absolute path, per the data
/// model's path-normalization rule, purely as a comparison key — falls back
/// to `p` itself (unmodified) if the current directory can't be read, the
/// same graceful-degradation the ignore matcher uses elsewhere in the
/// planners. Never used to replace a path that ends up in an `Action` or an
/// error message: those keep whatever form the caller gave so planned
/// symlink targets and reported paths still read the way the user typed
/// them.
fn comparison_key(p: &Path) -> PathBuf {
    path::absolutize(p).unwrap_or_else(|_| p.to_path_buf())
}

/// Shared input validation for stow/unstow/clean (§4.2.1). `link` has its
/// own bespoke single-file validation and does not call this.
pub fn validate(
    subcmd: SubCommand,
    sources: &[PathBuf],
    dest: &Path,
    dest_requirement: &DestRequirement,
) -> Vec<DployError> {
    let mut errors = Vec::new();

    let mut seen: Vec<PathBuf> = Vec::new();
    for source in sources {
        let key = comparison_key(source);
        if seen.contains(&key) {
            errors.push(DployError::DuplicateSource {
                subcmd,
                file: source.clone(),
            });
        } else {
            seen.push(key);
        }
    }

    if !dest.is_dir() {
        errors.push(DployError::NoSuchDirectoryToSubcmdInto {
            subcmd,
            file: dest.to_path_buf(),
        });
    } else {
        let access = path::effective_mode(dest);
        if dest_requirement.need_write && !access.writable {
            errors.push(DployError::InsufficientPermissionsToSubcmdTo {
                subcmd,
                file: dest.to_path_buf(),
            });
        } else if dest_requirement.need_execute && !access.executable {
            errors.push(DployError::InsufficientPermissionsToSubcmdTo {
                subcmd,
                file: dest.to_path_buf(),
            });
        }
    }

    for source in sources {
        if !source.is_dir() {
            errors.push(DployError::NoSuchDirectory {
                subcmd,
                file: source.clone(),
            });
            continue;
        }
        let access = path::effective_mode(source);
        if !access.readable || !access.executable {
            errors.push(DployError::InsufficientPermissionsToSubcmdFrom {
                subcmd,
                file: source.clone(),
            });
        }
    }

    let dest_key = comparison_key(dest);
    for source in sources {
        if comparison_key(source) == dest_key {
            errors.push(DployError::SourceIsSameAsDest {
                subcmd,
                file: source.clone(),
            });
        }
    }

    errors
}
