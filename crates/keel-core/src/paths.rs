//! Path normalization for project roots and watch directories.

use std::path::{Component, Path, PathBuf};

/// Make `path` absolute against the current directory and drop `.` and `..`
/// components lexically. Symlinks are not resolved.
pub fn normalize_path(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("/"))
            .join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                out.push(component.as_os_str())
            }
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                out.pop();
            }
        }
    }
    out
}

/// Whether `path` is `dir` or lies beneath it, compared component-wise.
pub fn path_within(path: &Path, dir: &Path) -> bool {
    path.starts_with(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_absolute_path_is_cleaned() {
        assert_eq!(
            normalize_path(Path::new("/tmp/alpha/./src/../docs")),
            PathBuf::from("/tmp/alpha/docs")
        );
    }

    #[test]
    fn test_parent_of_root_is_root() {
        assert_eq!(normalize_path(Path::new("/../..")), PathBuf::from("/"));
    }

    #[test]
    fn test_relative_path_joins_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(normalize_path(Path::new("proj")), cwd.join("proj"));
    }

    #[test]
    fn test_path_within_is_component_wise() {
        assert!(path_within(Path::new("/tmp/alpha/src/main.rs"), Path::new("/tmp/alpha")));
        assert!(path_within(Path::new("/tmp/alpha"), Path::new("/tmp/alpha")));
        assert!(!path_within(Path::new("/tmp/alphabet/x"), Path::new("/tmp/alpha")));
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(parts in prop::collection::vec("[a-z]{1,6}|\\.|\\.\\.", 0..8)) {
            let raw = format!("/{}", parts.join("/"));
            let once = normalize_path(Path::new(&raw));
            prop_assert!(once.is_absolute());
            prop_assert_eq!(normalize_path(&once), once.clone());
            prop_assert!(once.components().all(|c| !matches!(c, Component::CurDir | Component::ParentDir)));
        }
    }
}
