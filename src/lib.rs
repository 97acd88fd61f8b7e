//! `dploy` — a cross-platform clone of GNU Stow.
//!
//! The four entry points below mirror the CLI subcommands exactly and are
//! the library's whole public surface: build a plan from the given
//! sources/dest/ignore patterns, report any planning errors, then execute
//! (or merely print, in dry-run mode) the resulting actions in order.

pub mod action;
pub mod cli;
pub mod error;
pub mod executor;
pub mod ignore;
pub mod path;
pub mod planner;

use std::path::{Path, PathBuf};

pub use error::DployError;
use executor::Executor;

/// Deploys `sources` into `dest` by creating symlinks, folding any
/// directory contributed to by more than one source and unfolding any
/// destination directory-symlink a second source needs to add to.
pub fn stow(
    sources: &[PathBuf],
    dest: &Path,
    is_silent: bool,
    is_dry_run: bool,
    ignore_patterns: &[String],
) -> Result<(), DployError> {
    let (actions, errors) = planner::stow::plan(sources, dest, ignore_patterns);
    run(actions, errors, is_silent, is_dry_run)
}

/// Removes symlinks previously planted by [`stow`], folding any directory
/// left with a complete, single-source set of survivors back into one
/// symlink.
pub fn unstow(
    sources: &[PathBuf],
    dest: &Path,
    is_silent: bool,
    is_dry_run: bool,
    ignore_patterns: &[String],
) -> Result<(), DployError> {
    let (actions, errors) = planner::unstow::plan(sources, dest, ignore_patterns);
    run(actions, errors, is_silent, is_dry_run)
}

/// Removes broken symlinks under `dest` whose literal target resolves
/// into one of `sources`. Never touches a link pointing elsewhere, or a
/// link that still resolves.
pub fn clean(
    sources: &[PathBuf],
    dest: &Path,
    is_silent: bool,
    is_dry_run: bool,
) -> Result<(), DployError> {
    let (actions, errors) = planner::clean::plan(sources, dest);
    run(actions, errors, is_silent, is_dry_run)
}

/// Creates a single symlink at `dest` pointing at `source`. Unlike the
/// other three subcommands, `dest` names the link site itself, not a
/// directory to deploy into.
pub fn link(source: &Path, dest: &Path, is_silent: bool, is_dry_run: bool) -> Result<(), DployError> {
    let (action, errors) = planner::link::plan(source, dest);
    let actions = action.into_iter().collect();
    run(actions, errors, is_silent, is_dry_run)
}

fn run(
    actions: Vec<action::Action>,
    errors: Vec<DployError>,
    is_silent: bool,
    is_dry_run: bool,
) -> Result<(), DployError> {
    let mut executor = Executor::new(is_silent, is_dry_run);
    for error in errors {
        executor.add_error(error);
    }
    executor.handle_errors()?;
    for action in actions {
        executor.add_action(action);
    }
    executor.execute()
}
