//! Path confinement to a workspace root.

use std::{
    io,
    path::{Component, Path, PathBuf},
};

use crate::SandboxError;

/// A canonical directory that file operations may not escape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Opens `root` as a workspace, creating it if missing.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::Io`] if the directory cannot be created or canonicalised.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, SandboxError> {
        let root = root.as_ref();
        std::fs::create_dir_all(root).map_err(|e| SandboxError::io(root, e))?;
        let root = root.canonicalize().map_err(|e| SandboxError::io(root, e))?;
        Ok(Self { root })
    }

    /// Opens an existing directory as a workspace without creating anything.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::Io`] if `root` does not exist, is not a directory, or
    /// cannot be canonicalised.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, SandboxError> {
        let root = root.as_ref();
        let canonical = root.canonicalize().map_err(|e| SandboxError::io(root, e))?;
        if !canonical.is_dir() {
            return Err(SandboxError::io(
                root,
                io::Error::new(io::ErrorKind::NotADirectory, "workspace root is not a directory"),
            ));
        }
        Ok(Self { root: canonical })
    }

    /// The canonical root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `path` against the root and checks that it stays inside.
    ///
    /// The result is the root itself or one of its descendants. `..` components are
    /// folded lexically, so `../ws-evil` is rejected even though its text shares a
    /// prefix with a root named `ws`. Any existing prefix of the result is also
    /// canonicalised, so a symlink inside the workspace cannot point outside it.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::UnsafePath`] when the path escapes the root.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, SandboxError> {
        let unsafe_path = || {
            tracing::warn!(path, root = %self.root.display(), "rejected path outside workspace");
            SandboxError::UnsafePath {
                path: path.to_owned(),
            }
        };

        let normalized = normalize(&self.root.join(path));
        if !normalized.starts_with(&self.root) {
            return Err(unsafe_path());
        }

        let resolved = resolve_existing(&normalized).map_err(|_| unsafe_path())?;
        if resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            Err(unsafe_path())
        }
    }

    /// Returns `true` if `path` resolves to the root or a descendant of it.
    #[must_use]
    pub fn is_safe(&self, path: &str) -> bool {
        self.resolve(path).is_ok()
    }
}

/// Returns `true` if `path`, resolved against `workspace`, stays inside it.
///
/// A workspace that does not exist or cannot be opened admits no paths.
#[must_use]
pub fn is_safe_path(workspace: impl AsRef<Path>, path: &str) -> bool {
    Workspace::open(workspace).is_ok_and(|ws| ws.is_safe(path))
}

// Folds `.` and `..` without touching the file system.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                out.push(component.as_os_str());
            }
        }
    }
    out
}

// Canonicalises the deepest existing ancestor and re-attaches the missing tail.
fn resolve_existing(path: &Path) -> io::Result<PathBuf> {
    let mut existing = path;
    let mut tail = Vec::new();
    loop {
        match std::fs::symlink_metadata(existing) {
            Ok(_) => break,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let (Some(parent), Some(name)) = (existing.parent(), existing.file_name()) else {
                    return Err(err);
                };
                tail.push(name.to_owned());
                existing = parent;
            }
            Err(err) => return Err(err),
        }
    }

    let mut resolved = existing.canonicalize()?;
    for name in tail.iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, Workspace) {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path().join("ws")).unwrap();
        (dir, ws)
    }

    #[test]
    fn accepts_root_and_descendants() {
        let (_dir, ws) = fixture();
        assert_eq!(ws.resolve("").unwrap(), ws.root());
        assert_eq!(ws.resolve(".").unwrap(), ws.root());
        assert_eq!(ws.resolve("src/main.rs").unwrap(), ws.root().join("src/main.rs"));
        assert_eq!(ws.resolve("a/../b.txt").unwrap(), ws.root().join("b.txt"));
    }

    #[test]
    fn rejects_sibling_sharing_prefix() {
        let (dir, ws) = fixture();
        std::fs::create_dir_all(dir.path().join("ws-evil")).unwrap();

        let err = ws.resolve("../ws-evil").unwrap_err();
        assert!(matches!(err, SandboxError::UnsafePath { ref path } if path == "../ws-evil"));
        assert!(!ws.is_safe("../ws-evil/secret"));
        assert!(!is_safe_path(ws.root(), "../ws-evil"));
    }

    #[test]
    fn rejects_parent_and_absolute_escapes() {
        let (_dir, ws) = fixture();
        assert!(!ws.is_safe(".."));
        assert!(!ws.is_safe("a/../../x"));
        assert!(!ws.is_safe("/etc/passwd"));
    }

    #[test]
    fn accepts_absolute_path_inside_root() {
        let (_dir, ws) = fixture();
        let inside = ws.root().join("notes.md");
        assert!(ws.is_safe(inside.to_str().unwrap()));
    }

    #[cfg(unix)]
    #[test]
    fn rejects_symlink_escape() {
        let (dir, ws) = fixture();
        let outside = dir.path().join("outside");
        std::fs::create_dir_all(&outside).unwrap();
        std::os::unix::fs::symlink(&outside, ws.root().join("link")).unwrap();

        assert!(!ws.is_safe("link"));
        assert!(!ws.is_safe("link/new-file.txt"));
    }

    #[test]
    fn free_function_matches_method() {
        let (_dir, ws) = fixture();
        assert!(is_safe_path(ws.root(), "deep/nested/file"));
        assert!(!is_safe_path(ws.root(), "../../etc"));
    }

    #[test]
    fn missing_workspace_admits_nothing_and_stays_missing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("never-created");

        assert!(!is_safe_path(&missing, "file.txt"));
        assert!(!missing.exists());
        assert!(matches!(
            Workspace::open(&missing),
            Err(SandboxError::Io { .. })
        ));
    }

    #[test]
    fn open_rejects_regular_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(Workspace::open(&file).is_err());
        assert!(!is_safe_path(&file, "a"));
    }
}
