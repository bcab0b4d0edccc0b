use crate::core_sandbox::SandboxError;
use std::path::{Component, Path, PathBuf};

/// Normalizes `.` and `..` components without touching the filesystem.
///
/// `..` at the filesystem root stays at the root, so the result of cleaning an
/// absolute path is always absolute.
pub fn clean_path(path: &Path) -> PathBuf {
    path.components().fold(PathBuf::new(), |mut acc, comp| {
        match comp {
            Component::ParentDir => {
                acc.pop();
            }
            Component::CurDir => {}
            other => acc.push(other.as_os_str()),
        }
        acc
    })
}

/// A path that passed the containment check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    absolute: PathBuf,
    relative: PathBuf,
}

impl ResolvedPath {
    /// The cleaned absolute path, always inside the root.
    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    /// The same location relative to the root, `.` for the root itself.
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    pub fn into_relative(self) -> PathBuf {
        self.relative
    }
}

/// Confines every path a session touches to a fixed root directory.
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    /// `root` is expected to be absolute; it is cleaned once here and never changes.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: clean_path(&root.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Component-wise prefix check, so `/srv/data-evil` is not inside `/srv/data`.
    pub fn contains(&self, path: &Path) -> bool {
        clean_path(path).starts_with(&self.root)
    }

    /// Resolves `user_path` against `current_dir` (relative to the root).
    ///
    /// A leading `/` in `user_path` is dropped, so `/x` is `x` under `current_dir`.
    pub fn resolve(&self, current_dir: &Path, user_path: &str) -> Result<ResolvedPath, SandboxError> {
        let requested = Path::new(user_path);
        let base = self.root.join(current_dir);

        let tail: PathBuf = requested
            .components()
            .filter(|c| {
                matches!(
                    c,
                    Component::Normal(_) | Component::CurDir | Component::ParentDir
                )
            })
            .collect();

        let absolute = clean_path(&base.join(tail));
        if !absolute.starts_with(&self.root) {
            return Err(SandboxError::Violation(user_path.to_string()));
        }

        let relative = match absolute.strip_prefix(&self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
            Ok(rel) => rel.to_path_buf(),
            Err(_) => return Err(SandboxError::Violation(user_path.to_string())),
        };

        Ok(ResolvedPath { absolute, relative })
    }
}
