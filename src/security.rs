use std::io;
use std::path::{Component, Path, PathBuf};

use crate::config::get_allowed_paths;
use crate::errors::{GuardError, GuardResult};

/// Collapses `.` and `..` segments and duplicate separators without touching
/// the filesystem. `..` never climbs above the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::Prefix(_) | Component::RootDir) => {}
                _ => out.push(".."),
            },
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Absolute, normalized form of `path`; relative paths resolve against the
/// process working directory.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(normalize(path))
    } else {
        Ok(normalize(&std::env::current_dir()?.join(path)))
    }
}

#[cfg(windows)]
fn same_component(a: &Component<'_>, b: &Component<'_>) -> bool {
    a.as_os_str()
        .to_string_lossy()
        .eq_ignore_ascii_case(&b.as_os_str().to_string_lossy())
}

#[cfg(not(windows))]
fn same_component(a: &Component<'_>, b: &Component<'_>) -> bool {
    a == b
}

/// Lexical path from `base` to `target`. Both must already be absolute and
/// normalized. When they share no root the target is returned unchanged.
pub fn relative(base: &Path, target: &Path) -> PathBuf {
    let base: Vec<Component<'_>> = base.components().collect();
    let target_parts: Vec<Component<'_>> = target.components().collect();
    let common = base
        .iter()
        .zip(&target_parts)
        .take_while(|(a, b)| same_component(a, b))
        .count();
    if common == 0 {
        return target.to_path_buf();
    }
    let mut rel = PathBuf::new();
    for _ in common..base.len() {
        rel.push("..");
    }
    for part in &target_parts[common..] {
        rel.push(part.as_os_str());
    }
    rel
}

fn is_strict_descendant(base: &Path, target: &Path) -> bool {
    let rel = relative(base, target);
    match rel.components().next() {
        None | Some(Component::ParentDir) => false,
        Some(_) => !rel.is_absolute(),
    }
}

/// Resolves `input` and admits it only if it lies strictly below one of
/// `allowed_bases`.
///
/// Admission is textual: no filesystem I/O happens and symlinks are not
/// followed. A path equal to a base is rejected.
pub fn validate_and_resolve_path(input: &str, allowed_bases: &[PathBuf]) -> GuardResult<PathBuf> {
    if input.trim().is_empty() {
        return Err(GuardError::InvalidInput { reason: "got an empty or whitespace-only path" });
    }
    if input.contains('\0') {
        return Err(GuardError::InvalidInput { reason: "path contains a NUL character" });
    }
    if allowed_bases.is_empty() {
        return Err(GuardError::NotConfigured);
    }
    let resolved = absolutize(Path::new(input))?;
    for base in allowed_bases {
        let base = absolutize(base)?;
        if is_strict_descendant(&base, &resolved) {
            return Ok(resolved);
        }
    }
    Err(GuardError::AccessDenied { path: input.to_string() })
}

/// [`validate_and_resolve_path`] against the allow-list currently in the
/// environment.
pub fn resolve_from_env(input: &str) -> GuardResult<PathBuf> {
    let bases = get_allowed_paths()?;
    validate_and_resolve_path(input, &bases)
}
