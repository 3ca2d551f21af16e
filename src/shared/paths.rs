//! Lexical path helpers
//!
//! Nothing here touches the filesystem. Paths are compared component by
//! component, so callers must hand in paths rooted the same way (both absolute
//! or both relative to the same directory).

use std::path::{Component, Path, PathBuf};

/// Express `path` relative to `base`
///
/// When `path` lives below `base` this is a plain prefix strip. Otherwise the
/// shared prefix is removed and one `..` is emitted for every remaining
/// component of `base`.
pub fn relativize(base: &Path, path: &Path) -> PathBuf {
    if let Ok(relative) = path.strip_prefix(base) {
        return relative.to_path_buf();
    }

    let base_parts: Vec<Component> = base
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let path_parts: Vec<Component> = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let common = base_parts
        .iter()
        .zip(&path_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part.as_os_str());
    }
    relative
}

/// Render a path with `/` separators regardless of platform
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relativize_child() {
        let rel = relativize(Path::new("/repo"), Path::new("/repo/sub/b.json"));
        assert_eq!(rel, PathBuf::from("sub/b.json"));
    }

    #[test]
    fn test_relativize_same_path_is_empty() {
        let rel = relativize(Path::new("/repo"), Path::new("/repo"));
        assert_eq!(rel, PathBuf::new());
    }

    #[test]
    fn test_relativize_sibling() {
        let rel = relativize(Path::new("/repo/app"), Path::new("/repo/lib/x.yaml"));
        assert_eq!(rel, PathBuf::from("../lib/x.yaml"));
    }

    #[test]
    fn test_relativize_ignores_cur_dir() {
        let rel = relativize(Path::new("./repo"), Path::new("repo/a/b.xml"));
        assert_eq!(rel, PathBuf::from("a/b.xml"));
    }

    #[test]
    fn test_to_slash() {
        let path: PathBuf = ["sub", "dir", "file.json"].iter().collect();
        assert_eq!(to_slash(&path), "sub/dir/file.json");
        assert_eq!(to_slash(Path::new("../x")), "../x");
        assert_eq!(to_slash(Path::new("")), "");
    }
}
