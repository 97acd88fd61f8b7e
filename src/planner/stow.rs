//! The stow planner: folds the contents of one or more sources into a
//! destination, unfolding existing single-source symlinks and folding
//! newly-colliding multi-source directories as it goes.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::action::Action;
use crate::error::{DployError, SubCommand};
use crate::ignore::IgnoreMatcher;
use crate::path;
use crate::planner::{self, STOW_DEST};

const SUBCMD: SubCommand = SubCommand::Stow;

/// One source directory contributing entries at the current merge point.
/// `root`/`matcher` identify the original source (for ignore-pattern
/// lookups); `dir` is the absolute path of the directory this contributor
/// is presently offering, which descends as the merge recurses.
struct Contributor {
    root: PathBuf,
    matcher: Rc<IgnoreMatcher>,
    dir: PathBuf,
}

impl Contributor {
    fn rel(&self) -> PathBuf {
        self.dir
            .strip_prefix(&self.root)
            .unwrap_or(Path::new(""))
            .to_path_buf()
    }
}

pub fn plan(sources: &[PathBuf], dest: &Path, ignore_patterns: &[String]) -> (Vec<Action>, Vec<DployError>) {
    let mut errors = planner::validate(SUBCMD, sources, dest, &STOW_DEST);
    if !errors.is_empty() {
        return (Vec::new(), errors);
    }

    let contributors: Vec<Contributor> = sources
        .iter()
        .map(|source| Contributor {
            root: source.clone(),
            matcher: Rc::new(
                IgnoreMatcher::new(source, ignore_patterns).unwrap_or_else(|_| IgnoreMatcher::empty()),
            ),
            dir: source.clone(),
        })
        .collect();

    let mut actions = Vec::new();
    merge_dir(&contributors, dest, &mut actions, &mut errors);
    (actions, errors)
}

/// Merges every contributor's listing of its current directory into
/// `dest_dir`, grouping by entry name so that a name contributed by
/// exactly one source folds to a single symlink, and a name contributed by
/// more than one directory-valued source recurses into a real directory.
fn merge_dir(contributors: &[Contributor], dest_dir: &Path, actions: &mut Vec<Action>, errors: &mut Vec<DployError>) {
    let mut by_name: BTreeMap<OsString, Vec<(&Contributor, PathBuf)>> = BTreeMap::new();

    for contributor in contributors {
        let access = path::effective_mode(&contributor.dir);
        if !access.readable || !access.executable {
            errors.push(DployError::InsufficientPermissionsToSubcmdFrom {
                subcmd: SUBCMD,
                file: contributor.dir.clone(),
            });
            continue;
        }
        let entries = match path::sorted_dir_entries(&contributor.dir) {
            Ok(entries) => entries,
            Err(_) => {
                errors.push(DployError::InsufficientPermissionsToSubcmdFrom {
                    subcmd: SUBCMD,
                    file: contributor.dir.clone(),
                });
                continue;
            }
        };
        for entry_path in entries {
            let rel = contributor.rel().join(entry_path.file_name().unwrap_or_default());
            if contributor.matcher.should_ignore(&rel) {
                continue;
            }
            by_name
                .entry(entry_path.file_name().unwrap_or_default().to_os_string())
                .or_default()
                .push((contributor, entry_path));
        }
    }

    for (name, group) in by_name {
        let dest_entry = dest_dir.join(&name);
        if group.len() == 1 {
            let (contributor, entry_path) = &group[0];
            handle_single(contributor, entry_path, dest_dir, &dest_entry, actions, errors);
        } else {
            handle_multi(&group, dest_dir, &dest_entry, actions, errors);
        }
    }
}

fn handle_single(
    contributor: &Contributor,
    entry_path: &Path,
    dest_dir: &Path,
    dest_entry: &Path,
    actions: &mut Vec<Action>,
    errors: &mut Vec<DployError>,
) {
    if !path::lexists(dest_entry) {
        let access = path::effective_mode(dest_dir);
        if !access.writable {
            errors.push(DployError::InsufficientPermissionsToSubcmdTo {
                subcmd: SUBCMD,
                file: dest_dir.to_path_buf(),
            });
            return;
        }
        actions.push(Action::symbolic_link(SUBCMD, entry_path, dest_entry));
        return;
    }

    if dest_entry.is_symlink() {
        if path::same_file(dest_entry, entry_path) {
            actions.push(Action::already_linked(SUBCMD, entry_path, dest_entry));
        } else if let Some(real_dir) = path::resolved_dir(dest_entry) {
            if entry_path.is_dir() {
                unfold_and_merge(&[(contributor, entry_path)], &real_dir, dest_entry, actions, errors);
            } else {
                errors.push(DployError::ConflictsWithExistingLink {
                    subcmd: SUBCMD,
                    source: entry_path.to_path_buf(),
                    dest: dest_entry.to_path_buf(),
                });
            }
        } else {
            errors.push(DployError::ConflictsWithExistingLink {
                subcmd: SUBCMD,
                source: entry_path.to_path_buf(),
                dest: dest_entry.to_path_buf(),
            });
        }
        return;
    }

    if dest_entry.is_dir() && entry_path.is_dir() {
        let sub = Contributor {
            root: contributor.root.clone(),
            matcher: Rc::clone(&contributor.matcher),
            dir: entry_path.to_path_buf(),
        };
        merge_dir(&[sub], dest_entry, actions, errors);
        return;
    }

    errors.push(DployError::ConflictsWithExistingFile {
        subcmd: SUBCMD,
        source: entry_path.to_path_buf(),
        dest: dest_entry.to_path_buf(),
    });
}

fn handle_multi(
    group: &[(&Contributor, PathBuf)],
    dest_dir: &Path,
    dest_entry: &Path,
    actions: &mut Vec<Action>,
    errors: &mut Vec<DployError>,
) {
    if path::lexists(dest_entry) {
        if dest_entry.is_symlink() {
            if let Some(real_dir) = path::resolved_dir(dest_entry) {
                let dirs_only: Vec<(&Contributor, PathBuf)> = group
                    .iter()
                    .filter(|(_, p)| p.is_dir())
                    .map(|(c, p)| (*c, p.clone()))
                    .collect();
                for (_, entry_path) in group.iter().filter(|(_, p)| !p.is_dir()) {
                    errors.push(DployError::ConflictsWithExistingLink {
                        subcmd: SUBCMD,
                        source: entry_path.clone(),
                        dest: dest_entry.to_path_buf(),
                    });
                }
                if !dirs_only.is_empty() {
                    let refs: Vec<(&Contributor, &Path)> =
                        dirs_only.iter().map(|(c, p)| (*c, p.as_path())).collect();
                    unfold_and_merge(&refs, &real_dir, dest_entry, actions, errors);
                }
            } else {
                for (_, entry_path) in group {
                    errors.push(DployError::ConflictsWithExistingLink {
                        subcmd: SUBCMD,
                        source: entry_path.clone(),
                        dest: dest_entry.to_path_buf(),
                    });
                }
            }
            return;
        }

        if dest_entry.is_dir() {
            let dirs: Vec<Contributor> = group
                .iter()
                .filter(|(_, p)| p.is_dir())
                .map(|(c, p)| Contributor {
                    root: c.root.clone(),
                    matcher: Rc::clone(&c.matcher),
                    dir: p.clone(),
                })
                .collect();
            for (_, entry_path) in group.iter().filter(|(_, p)| !p.is_dir()) {
                errors.push(DployError::ConflictsWithExistingFile {
                    subcmd: SUBCMD,
                    source: entry_path.clone(),
                    dest: dest_entry.to_path_buf(),
                });
            }
            if !dirs.is_empty() {
                merge_dir(&dirs, dest_entry, actions, errors);
            }
            return;
        }

        for (_, entry_path) in group {
            errors.push(DployError::ConflictsWithExistingFile {
                subcmd: SUBCMD,
                source: entry_path.clone(),
                dest: dest_entry.to_path_buf(),
            });
        }
        return;
    }

    let all_dirs = group.iter().all(|(_, p)| p.is_dir());
    if !all_dirs {
        let mut files: Vec<PathBuf> = group.iter().map(|(_, p)| p.clone()).collect();
        files.sort();
        errors.push(DployError::ConflictsWithAnotherSource { subcmd: SUBCMD, files });
        return;
    }

    let access = path::effective_mode(dest_dir);
    if !access.writable {
        errors.push(DployError::InsufficientPermissionsToSubcmdTo {
            subcmd: SUBCMD,
            file: dest_dir.to_path_buf(),
        });
        return;
    }

    actions.push(Action::MakeDirectory {
        subcmd: SUBCMD,
        target: dest_entry.to_path_buf(),
    });
    let sub: Vec<Contributor> = group
        .iter()
        .map(|(c, p)| Contributor {
            root: c.root.clone(),
            matcher: Rc::clone(&c.matcher),
            dir: p.clone(),
        })
        .collect();
    merge_dir(&sub, dest_entry, actions, errors);
}

/// Replaces the symlink at `dest_entry` (currently pointing at `real_dir`,
/// some other already-folded source directory) with a real directory, then
/// merges in both `real_dir`'s own children (as a fresh ignore-free
/// contributor, since they were already filtered when first stowed) and
/// the new contributor(s) that triggered the unfold.
fn unfold_and_merge(
    group: &[(&Contributor, &Path)],
    real_dir: &Path,
    dest_entry: &Path,
    actions: &mut Vec<Action>,
    errors: &mut Vec<DployError>,
) {
    actions.push(Action::UnLink {
        subcmd: SUBCMD,
        target: dest_entry.to_path_buf(),
    });
    actions.push(Action::MakeDirectory {
        subcmd: SUBCMD,
        target: dest_entry.to_path_buf(),
    });

    let mut contributors: Vec<Contributor> = group
        .iter()
        .map(|(c, p)| Contributor {
            root: c.root.clone(),
            matcher: Rc::clone(&c.matcher),
            dir: p.to_path_buf(),
        })
        .collect();
    contributors.push(Contributor {
        root: real_dir.to_path_buf(),
        matcher: Rc::new(IgnoreMatcher::empty()),
        dir: real_dir.to_path_buf(),
    });
    merge_dir(&contributors, dest_entry, actions, errors);
}
