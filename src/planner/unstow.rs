//! The unstow planner: mirrors stow's walk to remove previously-planted
//! symlinks, then a folding post-pass that collapses any directory left
//! with a complete, single-source set of survivors back into one symlink.

use std::collections::{BTreeSet, HashMap};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::action::Action;
use crate::error::{DployError, SubCommand};
use crate::ignore::IgnoreMatcher;
use crate::path;
use crate::planner::{self, UNSTOW_OR_CLEAN_DEST};

const SUBCMD: SubCommand = SubCommand::Unstow;

pub fn plan(sources: &[PathBuf], dest: &Path, ignore_patterns: &[String]) -> (Vec<Action>, Vec<DployError>) {
    let mut errors = planner::validate(SUBCMD, sources, dest, &UNSTOW_OR_CLEAN_DEST);
    if !errors.is_empty() {
        return (Vec::new(), errors);
    }

    let mut actions = Vec::new();
    for source in sources {
        let matcher = IgnoreMatcher::new(source, ignore_patterns).unwrap_or_else(|_| IgnoreMatcher::empty());
        walk(&matcher, source, source, dest, &mut actions, &mut errors);
    }

    fold(dest, &mut actions);
    (actions, errors)
}

fn walk(
    matcher: &IgnoreMatcher,
    source_root: &Path,
    src_dir: &Path,
    dest_dir: &Path,
    actions: &mut Vec<Action>,
    errors: &mut Vec<DployError>,
) {
    let dest_access = path::effective_mode(dest_dir);
    if !dest_access.writable || !dest_access.executable {
        errors.push(DployError::InsufficientPermissionsToSubcmdTo {
            subcmd: SUBCMD,
            file: dest_dir.to_path_buf(),
        });
        return;
    }

    let src_access = path::effective_mode(src_dir);
    if !src_access.readable || !src_access.executable {
        errors.push(DployError::InsufficientPermissionsToSubcmdFrom {
            subcmd: SUBCMD,
            file: src_dir.to_path_buf(),
        });
        return;
    }

    let entries = match path::sorted_dir_entries(src_dir) {
        Ok(entries) => entries,
        Err(_) => {
            errors.push(DployError::InsufficientPermissionsToSubcmdFrom {
                subcmd: SUBCMD,
                file: src_dir.to_path_buf(),
            });
            return;
        }
    };

    for entry_path in entries {
        let name = entry_path.file_name().unwrap_or_default();
        let rel = entry_path.strip_prefix(source_root).unwrap_or(&entry_path);
        if matcher.should_ignore(rel) {
            continue;
        }
        let dest_entry = dest_dir.join(name);

        if !path::lexists(&dest_entry) {
            actions.push(Action::already_unlinked(SUBCMD, &entry_path, &dest_entry));
            continue;
        }

        if dest_entry.is_symlink() {
            if path::same_file(&dest_entry, &entry_path) {
                actions.push(Action::UnLink {
                    subcmd: SUBCMD,
                    target: dest_entry,
                });
            } else {
                errors.push(DployError::ConflictsWithExistingLink {
                    subcmd: SUBCMD,
                    source: entry_path,
                    dest: dest_entry,
                });
            }
            continue;
        }

        if dest_entry.is_dir() && entry_path.is_dir() {
            walk(matcher, source_root, &entry_path, &dest_entry, actions, errors);
            continue;
        }

        actions.push(Action::already_unlinked(SUBCMD, &entry_path, &dest_entry));
    }
}

/// For every directory that is the parent of at least one planned
/// `UnLink`, either removes it (if nothing survives) or collapses it back
/// into a single symlink (if every survivor is a symlink into the same
/// other source directory, and that set is a complete mirror of it).
fn fold(dest: &Path, actions: &mut Vec<Action>) {
    let mut parents: BTreeSet<PathBuf> = BTreeSet::new();
    let mut unlinked_names: HashMap<PathBuf, BTreeSet<OsString>> = HashMap::new();
    for action in actions.iter() {
        if let Action::UnLink { target, .. } = action {
            if let Some(parent) = target.parent() {
                parents.insert(parent.to_path_buf());
                unlinked_names
                    .entry(parent.to_path_buf())
                    .or_default()
                    .insert(target.file_name().unwrap_or_default().to_os_string());
            }
        }
    }

    for parent in parents {
        if parent == dest {
            continue;
        }
        let Ok(real_listing) = path::sorted_dir_entries(&parent) else {
            continue;
        };
        let removed = unlinked_names.get(&parent).cloned().unwrap_or_default();
        let survivors: Vec<PathBuf> = real_listing
            .into_iter()
            .filter(|p| !removed.contains(p.file_name().unwrap_or_default()))
            .collect();

        if survivors.is_empty() {
            actions.push(Action::RemoveDirectory {
                subcmd: SUBCMD,
                target: parent.clone(),
            });
            continue;
        }

        if let Some(source_dir) = single_mirrored_source(&survivors) {
            for survivor in &survivors {
                actions.push(Action::UnLink {
                    subcmd: SUBCMD,
                    target: survivor.clone(),
                });
            }
            actions.push(Action::RemoveDirectory {
                subcmd: SUBCMD,
                target: parent.clone(),
            });
            actions.push(Action::symbolic_link(SUBCMD, &source_dir, &parent));
        }
    }
}

/// If every entry in `survivors` is a symlink resolving into the same
/// other real directory, and the set of survivor names exactly matches
/// that directory's own listing, returns it. Otherwise `None` — a stray
/// non-symlink, a mismatched mirror, or contributions from more than one
/// remaining source all disqualify folding.
///
/// Resolves each survivor lexically (via `path::readlink`) rather than
/// through `fs::canonicalize`, so the returned source directory keeps the
/// same relative-vs-absolute form as `survivors` themselves — the result
/// is handed straight to `Action::symbolic_link` alongside `dest`, and a
/// canonicalized (always-absolute) result would silently defeat
/// `path::relative`'s lexical diff whenever `dest` was given as a relative
/// path on the command line.
fn single_mirrored_source(survivors: &[PathBuf]) -> Option<PathBuf> {
    let mut common_source: Option<PathBuf> = None;
    for survivor in survivors {
        if !survivor.is_symlink() {
            return None;
        }
        let real = path::readlink(survivor, true).ok()?;
        let parent = real.parent()?.to_path_buf();
        match &common_source {
            None => common_source = Some(parent),
            Some(existing) if *existing == parent => {}
            Some(_) => return None,
        }
    }
    let source_dir = common_source?;
    let source_listing = path::sorted_dir_entries(&source_dir).ok()?;

    let survivor_names: BTreeSet<OsString> = survivors
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_os_string()))
        .collect();
    let source_names: BTreeSet<OsString> = source_listing
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_os_string()))
        .collect();

    if survivor_names == source_names {
        Some(source_dir)
    } else {
        None
    }
}
