//! Divergence paths — where in the tree actual and expected disagree.
//!
//! Every mismatch carries the sequence of keys and indices from the tree
//! root to the first point of divergence, so a failing assertion reports
//! `tags[1].name`, not just "documents differ".

use std::fmt;

/// One step from a node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Map key.
    Key(String),
    /// Sequence index.
    Index(usize),
}

/// Sequence of keys/indices from the tree root to a node.
///
/// # Example
///
/// ```
/// use fixmatch::Path;
///
/// let path = Path::root().child_key("tags").child_index(1);
/// assert_eq!(path.to_string(), "tags[1]");
/// assert!(!path.is_root());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty path (the document root).
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns `true` if the path has no segments.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The segments, root-first.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// A new path descending into the given map key.
    #[must_use]
    pub fn child_key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(key.into()));
        Self { segments }
    }

    /// A new path descending into the given sequence index.
    #[must_use]
    pub fn child_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }
}

/// Renders `a.b[2].c`; the root renders as `(root)`.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "(root)");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(k) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{k}")?;
                }
                Segment::Index(n) => write!(f, "[{n}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_display() {
        assert_eq!(Path::root().to_string(), "(root)");
        assert!(Path::root().is_root());
    }

    #[test]
    fn test_nested_display() {
        let path = Path::root()
            .child_key("items")
            .child_index(2)
            .child_key("name");
        assert_eq!(path.to_string(), "items[2].name");
    }

    #[test]
    fn test_index_at_root() {
        assert_eq!(Path::root().child_index(0).to_string(), "[0]");
    }

    #[test]
    fn test_child_does_not_mutate_parent() {
        let parent = Path::root().child_key("a");
        let _child = parent.child_key("b");
        assert_eq!(parent.segments().len(), 1);
    }
}
