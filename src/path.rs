//! Pure path helpers used by every planner: lexical relative-path
//! computation, same-file comparison, literal symlink-target reads, and
//! permission probing. None of these follow symlinks unless explicitly
//! documented as doing so.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Lexical relative path from `to`'s directory to `from`. Never resolves
/// symlinks. Falls back to `from` itself (absolutized) when the two paths
/// don't share a common root (e.g. different Windows drives).
pub fn relative(from: &Path, to: &Path) -> PathBuf {
    pathdiff::diff_paths(from, to).unwrap_or_else(|| from.to_path_buf())
}

/// True iff `a` and `b` resolve, following symlinks, to the same path.
/// Broken links or missing paths never compare equal.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// The literal target stored in the symlink at `p`, without following it.
/// When `absolute` is true and the stored target is relative, it is joined
/// onto `p`'s parent directory.
pub fn readlink(p: &Path, absolute: bool) -> io::Result<PathBuf> {
    let target = fs::read_link(p)?;
    if absolute && target.is_relative() {
        let parent = p.parent().unwrap_or_else(|| Path::new("."));
        Ok(lexically_normalize(&parent.join(target)))
    } else {
        Ok(target)
    }
}

/// True iff `p` has a directory entry at all, without following a
/// terminal symlink (so a broken symlink still "lexists").
pub fn lexists(p: &Path) -> bool {
    fs::symlink_metadata(p).is_ok()
}

/// Resolves the symlink at `p` to its target, joined and lexically
/// normalized against `p`'s parent rather than canonicalized through the
/// filesystem, so the result keeps the same relative-vs-absolute form `p`
/// itself was given in. Returns it only if it names a directory. Used to
/// detect "symlink to a directory" for unfolding, where the result is
/// merged right back in alongside sibling paths built the same way —
/// canonicalizing here would make it absolute while everything else stays
/// relative, producing inconsistent symlink targets downstream.
pub fn resolved_dir(p: &Path) -> Option<PathBuf> {
    let target = readlink(p, true).ok()?;
    if target.is_dir() { Some(target) } else { None }
}

/// Expands a leading `~` and resolves the result to an absolute path,
/// purely lexically (no symlink resolution, matching the original's
/// `os.path.abspath(os.path.expanduser(path))`).
pub fn absolutize(p: &Path) -> io::Result<PathBuf> {
    let expanded = expand_home(p);
    let joined = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()?.join(expanded)
    };
    Ok(lexically_normalize(&joined))
}

fn expand_home(p: &Path) -> PathBuf {
    let Ok(rest) = p.strip_prefix("~") else {
        return p.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => p.to_path_buf(),
    }
}

/// Collapses `.` and lexical `..` components without touching the
/// filesystem. Adapted from the component-cleaning walk used for the
/// teacher's own `Tidy` transformation.
fn lexically_normalize(p: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    let mut components = p.components().peekable();

    if let Some(c @ Component::Prefix(..)) = components.peek() {
        cleaned.push(c);
        components.next();
    }
    if let Some(c @ Component::RootDir) = components.peek() {
        cleaned.push(c);
        components.next();
    }

    for component in components {
        match component {
            Component::Normal(c) => cleaned.push(c),
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(Component::Normal(..)) = cleaned.components().next_back() {
                    cleaned.pop();
                } else if cleaned.as_os_str().is_empty()
                    || cleaned.components().next_back() == Some(Component::ParentDir)
                {
                    cleaned.push("..");
                }
            }
            _ => {}
        }
    }
    cleaned
}

/// Sorted listing of a directory's immediate children (full paths),
/// matching the original's `get_directory_contents` (sorted for
/// deterministic planning order).
pub fn sorted_dir_entries(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<_>>()?;
    entries.sort();
    Ok(entries)
}

/// Read/write/execute-by-current-user probe. The single cross-platform
/// seam the Windows ACL machinery in the original would otherwise sit
/// behind; deliberately not a full ACL translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Access {
    pub readable: bool,
    pub writable: bool,
    pub executable: bool,
}

#[cfg(unix)]
pub fn effective_mode(p: &Path) -> Access {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(cpath) = CString::new(p.as_os_str().as_bytes()) else {
        return Access::default();
    };
    let probe = |mode: libc::c_int| unsafe { libc::access(cpath.as_ptr(), mode) == 0 };
    Access {
        readable: probe(libc::R_OK),
        writable: probe(libc::W_OK),
        executable: probe(libc::X_OK),
    }
}

#[cfg(not(unix))]
pub fn effective_mode(p: &Path) -> Access {
    match fs::metadata(p) {
        Ok(meta) => Access {
            readable: true,
            writable: !meta.permissions().readonly(),
            executable: true,
        },
        Err(_) => Access::default(),
    }
}
