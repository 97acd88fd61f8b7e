//! The clean planner: walks the destination tree (not the sources) and
//! unlinks every symlink whose literal target resolves into a given
//! source but no longer exists.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::action::Action;
use crate::error::{DployError, SubCommand};
use crate::path;
use crate::planner::{self, UNSTOW_OR_CLEAN_DEST};

const SUBCMD: SubCommand = SubCommand::Clean;

pub fn plan(sources: &[PathBuf], dest: &Path) -> (Vec<Action>, Vec<DployError>) {
    let errors = planner::validate(SUBCMD, sources, dest, &UNSTOW_OR_CLEAN_DEST);
    if !errors.is_empty() {
        return (Vec::new(), errors);
    }

    let mut actions = Vec::new();
    for entry in WalkDir::new(dest).follow_links(false).into_iter().filter_map(Result::ok) {
        if entry.path() == dest || !entry.path_is_symlink() {
            continue;
        }
        let Ok(resolved_target) = path::readlink(entry.path(), true) else {
            continue;
        };
        if resolved_target.exists() {
            continue;
        }
        if sources.iter().any(|source| resolved_target.starts_with(source)) {
            actions.push(Action::UnLink {
                subcmd: SUBCMD,
                target: entry.path().to_path_buf(),
            });
        }
    }
    (actions, errors)
}
