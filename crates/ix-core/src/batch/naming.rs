//! Collision-safe archive entry naming

use std::collections::{HashMap, HashSet};

const MAX_STEM_CHARS: usize = 180;

/// Result of allocating a file name for a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatedName {
    /// Final entry name, extension included
    pub file_name: String,
    /// Whether the natural name was already taken
    pub collided: bool,
}

/// Hands out unique `<id>.<ext>` names in processing order.
///
/// The first record for an id gets `<id>.<ext>`; later ones get
/// `<id>-<n>.<ext>` with `n` counted per id starting at 1. A suffixed name
/// already used by another record, or reserved with [`reserve`], is skipped.
///
/// [`reserve`]: FileNameAllocator::reserve
#[derive(Debug)]
pub struct FileNameAllocator {
    extension: String,
    counters: HashMap<String, usize>,
    used: HashSet<String>,
    reserved: HashSet<String>,
}

impl FileNameAllocator {
    /// Create an allocator for the given extension (without the dot)
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            counters: HashMap::new(),
            used: HashSet::new(),
            reserved: HashSet::new(),
        }
    }

    /// Keep the natural name of `id` free for its own record.
    ///
    /// Suffixes handed to duplicates of other ids never take a reserved name.
    pub fn reserve(&mut self, id: &str) {
        let natural = self.natural_name(&sanitize_stem(id));
        self.reserved.insert(natural);
    }

    fn natural_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.extension)
    }

    /// Allocate the next name for `id`
    pub fn allocate(&mut self, id: &str) -> AllocatedName {
        let stem = sanitize_stem(id);
        let natural = self.natural_name(&stem);

        if self.used.insert(natural.clone()) {
            return AllocatedName {
                file_name: natural,
                collided: false,
            };
        }

        let counter = self.counters.entry(stem.clone()).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{}-{}.{}", stem, counter, self.extension);
            if !self.reserved.contains(&candidate) && self.used.insert(candidate.clone()) {
                return AllocatedName {
                    file_name: candidate,
                    collided: true,
                };
            }
        }
    }
}

/// Make an id safe to use as a zip entry stem
pub fn sanitize_stem(id: &str) -> String {
    let replaced: String = id
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .take(MAX_STEM_CHARS)
        .collect();

    let trimmed = replaced.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(ids: &[&str]) -> Vec<String> {
        let mut alloc = FileNameAllocator::new("intel");
        ids.iter().map(|id| alloc.allocate(id).file_name).collect()
    }

    #[test]
    fn test_unique_ids_keep_natural_names() {
        assert_eq!(names(&["a", "b"]), vec!["a.intel", "b.intel"]);
    }

    #[test]
    fn test_duplicates_get_counted_suffix() {
        assert_eq!(
            names(&["dup", "x", "dup", "dup"]),
            vec!["dup.intel", "x.intel", "dup-1.intel", "dup-2.intel"]
        );
    }

    #[test]
    fn test_collision_flag() {
        let mut alloc = FileNameAllocator::new("intel");
        assert!(!alloc.allocate("dup").collided);
        assert!(alloc.allocate("dup").collided);
    }

    #[test]
    fn test_suffix_skips_names_taken_by_real_ids() {
        assert_eq!(
            names(&["dup-1", "dup", "dup"]),
            vec!["dup-1.intel", "dup.intel", "dup-2.intel"]
        );
    }

    #[test]
    fn test_reserved_names_are_not_handed_to_duplicates() {
        let ids = ["dup", "dup", "dup-1"];
        let mut alloc = FileNameAllocator::new("intel");
        for id in ids {
            alloc.reserve(id);
        }

        let allocated: Vec<AllocatedName> = ids.iter().map(|id| alloc.allocate(id)).collect();
        let file_names: Vec<&str> = allocated.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(file_names, vec!["dup.intel", "dup-2.intel", "dup-1.intel"]);
        assert_eq!(
            allocated.iter().map(|a| a.collided).collect::<Vec<_>>(),
            vec![false, true, false]
        );
    }

    #[test]
    fn test_sanitize_stem() {
        assert_eq!(sanitize_stem("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize_stem("../etc"), "_etc");
        assert_eq!(sanitize_stem("  "), "untitled");
        assert_eq!(sanitize_stem("line\nbreak"), "line_break");
        assert_eq!(sanitize_stem(&"x".repeat(500)).len(), MAX_STEM_CHARS);
    }

    #[test]
    fn test_sanitized_ids_collide() {
        assert_eq!(names(&["a/b", "a:b"]), vec!["a_b.intel", "a_b-1.intel"]);
    }
}
