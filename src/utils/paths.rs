//! Lexical path helpers used to build display paths.
//!
//! Nothing here touches the filesystem, so results do not depend on
//! symlinks or on whether the paths exist.

use std::path::{Component, Path, PathBuf};

/// Removes `.` components and folds `..` into the preceding component.
///
/// `..` directly below the root is dropped, as the OS would do.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Makes `path` absolute against `base` and normalizes it.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_lexically(path)
    } else {
        normalize_lexically(&base.join(path))
    }
}

/// Computes `target` relative to `base`. Both must be normalized and of the
/// same kind (both absolute or both relative).
pub fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base: Vec<Component> = base.components().collect();
    let target: Vec<Component> = target.components().collect();
    let common = base
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base.len() {
        rel.push("..");
    }
    for component in &target[common..] {
        rel.push(component.as_os_str());
    }
    rel
}

/// Joins the components of a relative path with `/`, whatever the platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Renders `dir` relative to `working_dir` for display.
///
/// Directories outside the working directory lose every leading `..` and
/// are rooted at `/` instead, so `../../foo` is shown as `/foo`.
pub fn display_relative_dir(working_dir: &Path, dir: &Path) -> String {
    let rel = relative_path(working_dir, dir);
    let mut components = rel.components().peekable();

    let mut climbed = false;
    while let Some(Component::ParentDir) = components.peek() {
        components.next();
        climbed = true;
    }

    let rest = components
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    if climbed {
        format!("/{rest}")
    } else if rest.is_empty() {
        ".".to_string()
    } else {
        rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(
            normalize_lexically(Path::new("/a/./b/../c")),
            PathBuf::from("/a/c")
        );
        assert_eq!(normalize_lexically(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(
            normalize_lexically(Path::new("../a/../../b")),
            PathBuf::from("../../b")
        );
        assert_eq!(normalize_lexically(Path::new("./")), PathBuf::new());
    }

    #[test]
    fn test_absolutize_joins_relative_paths() {
        assert_eq!(
            absolutize(Path::new("/work/dir"), Path::new("./docs/../notes")),
            PathBuf::from("/work/dir/notes")
        );
        assert_eq!(
            absolutize(Path::new("/work/dir"), Path::new("/elsewhere")),
            PathBuf::from("/elsewhere")
        );
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/a/b"), Path::new("/a/b/c/d")),
            PathBuf::from("c/d")
        );
        assert_eq!(
            relative_path(Path::new("/a/b/c"), Path::new("/a/x")),
            PathBuf::from("../../x")
        );
        assert_eq!(relative_path(Path::new("/a"), Path::new("/a")), PathBuf::new());
    }

    #[test]
    fn test_display_relative_dir_inside_working_dir() {
        let wd = Path::new("/home/me/project");
        assert_eq!(display_relative_dir(wd, Path::new("/home/me/project")), ".");
        assert_eq!(
            display_relative_dir(wd, Path::new("/home/me/project/docs/api")),
            "docs/api"
        );
    }

    #[test]
    fn test_display_relative_dir_outside_working_dir_is_rooted() {
        let wd = Path::new("/tmp/x/a/b");
        assert_eq!(display_relative_dir(wd, Path::new("/tmp/x/foo")), "/foo");
        assert_eq!(display_relative_dir(wd, Path::new("/tmp/x/a")), "/");
        assert_eq!(
            display_relative_dir(wd, Path::new("/tmp/x/a/c/d")),
            "/c/d"
        );
    }

    #[test]
    fn test_to_slash() {
        assert_eq!(to_slash(Path::new("a/b/c.md")), "a/b/c.md");
        assert_eq!(to_slash(Path::new("c.md")), "c.md");
    }
}
