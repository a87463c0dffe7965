use std::io;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to read directory {path}: {source}")]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Path is not absolute: {0}")]
    RelativePath(PathBuf),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TreeError>;

impl TreeError {
    /// Classifies a failed stat of `path`.
    pub fn from_stat(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Normalizes an absolute path lexically.
///
/// Drops `.` segments and trailing separators and resolves `..` against the
/// preceding segment (`..` at the root stays at the root). The filesystem is
/// not consulted, so symlinks are left as written.
pub fn normalize_path(path: &Path) -> Result<PathBuf> {
    if !path.is_absolute() {
        return Err(TreeError::RelativePath(path.to_path_buf()));
    }

    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(segment) => normalized.push(segment),
        }
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trailing_separator_and_dots() {
        let path = normalize_path(Path::new("/a/./b/")).unwrap();
        assert_eq!(path, PathBuf::from("/a/b"));
    }

    #[test]
    fn normalize_resolves_parent_segments() {
        assert_eq!(
            normalize_path(Path::new("/a/b/../c")).unwrap(),
            PathBuf::from("/a/c")
        );
        assert_eq!(
            normalize_path(Path::new("/../a")).unwrap(),
            PathBuf::from("/a")
        );
    }

    #[test]
    fn normalize_keeps_root() {
        assert_eq!(normalize_path(Path::new("/")).unwrap(), PathBuf::from("/"));
    }

    #[test]
    fn normalize_rejects_relative_paths() {
        let error = normalize_path(Path::new("a/b")).unwrap_err();
        assert!(matches!(error, TreeError::RelativePath(path) if path == Path::new("a/b")));
    }

    #[test]
    fn stat_errors_are_classified() {
        let missing = io::Error::from(io::ErrorKind::NotFound);
        assert!(matches!(
            TreeError::from_stat(Path::new("/x"), missing),
            TreeError::NotFound(_)
        ));

        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert!(matches!(
            TreeError::from_stat(Path::new("/x"), denied),
            TreeError::Io { .. }
        ));
    }
}
