//! VFS path helpers.
//!
//! Paths are absolute, `/`-separated, and resolved by walking directory
//! children by name. `.` and `..` components are not interpreted.

use std::borrow::Cow;

/// Check whether a path is already in normal form (starts with `/`, no `//`,
/// no trailing `/` unless root).
fn is_normalized(path: &str) -> bool {
    if !path.starts_with('/') {
        return false;
    }
    if path.len() > 1 && path.ends_with('/') {
        return false;
    }
    !path.contains("//")
}

/// Normalize a path: ensure leading `/`, collapse `//`, strip trailing `/`
/// (except for root). Returns the input unchanged (zero-alloc) when already
/// in normal form.
pub fn normalize(path: &str) -> Cow<'_, str> {
    if is_normalized(path) {
        return Cow::Borrowed(path);
    }
    let path_str = if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{path}"))
    };
    // Collapse repeated slashes.
    let mut result = String::with_capacity(path_str.len());
    let mut prev_slash = false;
    for ch in path_str.chars() {
        if ch == '/' {
            if !prev_slash {
                result.push(ch);
            }
            prev_slash = true;
        } else {
            result.push(ch);
            prev_slash = false;
        }
    }
    // Strip trailing slash unless root.
    if result.len() > 1 && result.ends_with('/') {
        result.pop();
    }
    Cow::Owned(result)
}

/// Split a normalized path into its segments. Root yields no segments.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Split a path into (parent, leaf name). Root has no parent.
pub fn split_parent(path: &str) -> Option<(String, String)> {
    let normalized = normalize(path);
    if normalized.as_ref() == "/" {
        return None;
    }
    // Normalized non-root paths always contain a `/` before the leaf.
    let idx = normalized.rfind('/').unwrap_or(0);
    let parent = if idx == 0 {
        "/".to_string()
    } else {
        normalized[..idx].to_string()
    };
    let name = normalized[idx + 1..].to_string();
    Some((parent, name))
}

/// Join a directory path and a child name.
pub fn join(dir: &str, name: &str) -> String {
    if dir == "/" {
        format!("/{name}")
    } else {
        format!("{dir}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_normal_form() {
        assert!(matches!(normalize("/a/b"), Cow::Borrowed("/a/b")));
        assert!(matches!(normalize("/"), Cow::Borrowed("/")));
    }

    #[test]
    fn normalize_adds_leading_slash() {
        assert_eq!(normalize("a/b"), "/a/b");
    }

    #[test]
    fn normalize_collapses_double_slashes() {
        assert_eq!(normalize("//a///b"), "/a/b");
    }

    #[test]
    fn normalize_strips_trailing_slash() {
        assert_eq!(normalize("/a/b/"), "/a/b");
        assert_eq!(normalize("/"), "/");
    }

    #[test]
    fn segments_of_root_is_empty() {
        assert_eq!(segments("/").count(), 0);
    }

    #[test]
    fn segments_of_nested_path() {
        let segs: Vec<&str> = segments("/Documents/notes/a.txt").collect();
        assert_eq!(segs, vec!["Documents", "notes", "a.txt"]);
    }

    #[test]
    fn split_parent_of_root_is_none() {
        assert!(split_parent("/").is_none());
    }

    #[test]
    fn split_parent_of_top_level() {
        let (parent, name) = split_parent("/Documents").unwrap();
        assert_eq!(parent, "/");
        assert_eq!(name, "Documents");
    }

    #[test]
    fn split_parent_of_nested() {
        let (parent, name) = split_parent("/Documents/a.txt").unwrap();
        assert_eq!(parent, "/Documents");
        assert_eq!(name, "a.txt");
    }

    #[test]
    fn join_root() {
        assert_eq!(join("/", "Documents"), "/Documents");
    }

    #[test]
    fn join_nested() {
        assert_eq!(join("/Documents", "a.txt"), "/Documents/a.txt");
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn normalize_is_idempotent(path in "[/a-z0-9_.]{1,50}") {
                let once = normalize(&path).into_owned();
                let twice = normalize(&once).into_owned();
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn normalize_never_has_double_slashes(path in "[/a-z0-9_.]{1,50}") {
                let normed = normalize(&path);
                prop_assert!(!normed.contains("//"));
            }

            #[test]
            fn normalize_starts_with_slash(path in "[a-z0-9_./]{0,50}") {
                let normed = normalize(&path);
                prop_assert!(normed.starts_with('/'));
            }

            #[test]
            fn join_then_split_roundtrips(
                dir in "(/[a-z]{1,8}){0,4}",
                name in "[a-z0-9_.]{1,12}",
            ) {
                let dir = if dir.is_empty() { "/".to_string() } else { dir };
                let joined = join(&dir, &name);
                let (parent, leaf) = split_parent(&joined).unwrap();
                prop_assert_eq!(parent.as_str(), dir.as_str());
                prop_assert_eq!(leaf.as_str(), name.as_str());
            }
        }
    }
}
