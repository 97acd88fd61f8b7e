//! Per-source ignore matcher: caller-supplied glob patterns, unioned with
//! the source's own `.dploystowignore` file, unioned with a built-in
//! pattern that always ignores the ignore file itself.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};

pub const IGNORE_FILE_NAME: &str = ".dploystowignore";

pub struct IgnoreMatcher {
    /// Patterns written with a leading `/`: matched only against the full
    /// path from the source root (the slash is stripped before compiling).
    anchored: GlobSet,
    /// Patterns written without a leading `/`: matched at any depth, the
    /// way a `.gitignore`-style pattern does.
    unanchored: GlobSet,
    cache: RefCell<HashMap<PathBuf, bool>>,
}

impl IgnoreMatcher {
    /// Builds a matcher for `source_root`, combining `caller_patterns` with
    /// the root's `.dploystowignore` (if any) and the built-in self-ignore
    /// pattern.
    pub fn new(source_root: &Path, caller_patterns: &[String]) -> std::io::Result<Self> {
        let mut patterns: Vec<String> = caller_patterns.to_vec();
        patterns.extend(read_ignore_file(source_root)?);
        patterns.push(IGNORE_FILE_NAME.to_string());

        let mut anchored_builder = GlobSetBuilder::new();
        let mut unanchored_builder = GlobSetBuilder::new();
        for pattern in &patterns {
            match pattern.strip_prefix('/') {
                Some(rooted) => anchored_builder.add(compile_pattern(rooted)?),
                None => unanchored_builder.add(compile_pattern(pattern)?),
            };
        }
        let to_io_err = |e: globset::Error| std::io::Error::new(std::io::ErrorKind::InvalidInput, e);

        Ok(Self {
            anchored: anchored_builder.build().map_err(to_io_err)?,
            unanchored: unanchored_builder.build().map_err(to_io_err)?,
            cache: RefCell::new(HashMap::new()),
        })
    }

    /// A matcher with no patterns at all, used to mirror an already
    /// materialized (previously stowed) source directory during unfolding
    /// — its contents were already filtered against its own ignore rules
    /// when it was first stowed.
    pub fn empty() -> Self {
        let empty_set = || GlobSetBuilder::new().build().expect("empty globset");
        Self {
            anchored: empty_set(),
            unanchored: empty_set(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// True iff `rel` (relative to the source root this matcher was built
    /// for) or any of its ancestors matches a pattern.
    pub fn should_ignore(&self, rel: &Path) -> bool {
        if let Some(answer) = self.cache.borrow().get(rel) {
            return *answer;
        }
        let answer = self.matches_self_or_ancestor(rel);
        self.cache.borrow_mut().insert(rel.to_path_buf(), answer);
        answer
    }

    /// Anchored patterns are tested only against the full path from the
    /// root (accumulated from the first component). Unanchored patterns
    /// are tested starting from every component, not just the first, so a
    /// bare pattern like `aaa` matches `aaa` nested at any depth, not just
    /// at the source root. Either kind also matches on every ancestor
    /// prefix of its starting point, so ignoring a directory ignores
    /// everything inside it.
    fn matches_self_or_ancestor(&self, rel: &Path) -> bool {
        let components: Vec<_> = rel.components().collect();

        let mut anchored_candidate = PathBuf::new();
        for component in &components {
            anchored_candidate.push(component);
            if self.anchored.is_match(&anchored_candidate) {
                return true;
            }
        }

        for start in 0..components.len() {
            let mut candidate = PathBuf::new();
            for component in &components[start..] {
                candidate.push(component);
                if self.unanchored.is_match(&candidate) {
                    return true;
                }
            }
        }
        false
    }
}

fn compile_pattern(pattern: &str) -> std::io::Result<Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
}

fn read_ignore_file(source_root: &Path) -> std::io::Result<Vec<String>> {
    let ignore_path = source_root.join(IGNORE_FILE_NAME);
    if !ignore_path.exists() {
        return Ok(Vec::new());
    }
    let contents = fs::read_to_string(ignore_path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
