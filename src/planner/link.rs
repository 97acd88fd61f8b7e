//! The link planner: a single-shot, bespoke validator and emitter for the
//! `link` subcommand — it does not share the stow/unstow/clean validation
//! path since it takes one file (not a directory) destination.

use std::path::Path;

use crate::action::Action;
use crate::error::{DployError, SubCommand};
use crate::path;

const SUBCMD: SubCommand = SubCommand::Link;

pub fn plan(source: &Path, dest: &Path) -> (Option<Action>, Vec<DployError>) {
    let mut errors = Vec::new();

    if !source.exists() && !path::lexists(source) {
        errors.push(DployError::NoSuchFileOrDirectory {
            subcmd: SUBCMD,
            file: source.to_path_buf(),
        });
        return (None, errors);
    }

    let parent = dest.parent().unwrap_or(Path::new("."));
    if !parent.exists() {
        errors.push(DployError::NoSuchFileOrDirectory {
            subcmd: SUBCMD,
            file: parent.to_path_buf(),
        });
        return (None, errors);
    }

    if path::lexists(dest) {
        if dest.is_symlink() {
            if path::same_file(dest, source) {
                return (Some(Action::already_linked(SUBCMD, source, dest)), errors);
            }
            errors.push(DployError::ConflictsWithExistingLink {
                subcmd: SUBCMD,
                source: source.to_path_buf(),
                dest: dest.to_path_buf(),
            });
        } else {
            errors.push(DployError::ConflictsWithExistingFile {
                subcmd: SUBCMD,
                source: source.to_path_buf(),
                dest: dest.to_path_buf(),
            });
        }
        return (None, errors);
    }

    let source_access = path::effective_mode(source);
    if !source_access.readable {
        errors.push(DployError::InsufficientPermissions {
            subcmd: SUBCMD,
            file: source.to_path_buf(),
        });
        return (None, errors);
    }

    let dest_access = path::effective_mode(parent);
    if !dest_access.writable {
        errors.push(DployError::InsufficientPermissions {
            subcmd: SUBCMD,
            file: dest.to_path_buf(),
        });
        return (None, errors);
    }

    (Some(Action::symbolic_link(SUBCMD, source, dest)), errors)
}
