//! Insertion-ordered set of canonical paths inlined during one compile.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Canonical paths already inlined, in first-seen order.
///
/// Owned by a single compile; a path must be inserted before its content is
/// expanded so re-entry through a cycle finds it.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    order: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `path`; returns `false` if it was already present.
    pub fn insert(&mut self, path: &Path) -> bool {
        if self.seen.contains(path) {
            return false;
        }
        self.seen.insert(path.to_path_buf());
        self.order.push(path.to_path_buf());
        true
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.seen.contains(path)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Paths in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.order.iter().map(PathBuf::as_path)
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_first_visit_only() {
        let mut visited = VisitedSet::new();
        assert!(visited.insert(Path::new("/src/a.sh")));
        assert!(!visited.insert(Path::new("/src/a.sh")));
        assert!(visited.contains(Path::new("/src/a.sh")));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn iter_preserves_insertion_order() {
        let mut visited = VisitedSet::new();
        for path in ["/z.sh", "/a.sh", "/m.sh", "/a.sh"] {
            visited.insert(Path::new(path));
        }
        let order: Vec<&Path> = visited.iter().collect();
        assert_eq!(
            order,
            vec![Path::new("/z.sh"), Path::new("/a.sh"), Path::new("/m.sh")]
        );
    }
}
