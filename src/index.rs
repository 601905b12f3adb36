//! This module defines an index type that can be invalid, although it has the same size as
//! usize. Renumbering maps built while separating a mesh are stored as `Vec<Index>`, where an
//! invalid entry marks a vertex that did not survive into the output.
use std::fmt;

/// A possibly invalid unsigned index.
/// The maximum `usize` integer represents an invalid index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Index(usize);

// SAFETY: Index is transparent and usize is Pod and Zeroable.
unsafe impl bytemuck::Pod for Index {}
unsafe impl bytemuck::Zeroable for Index {}

impl Index {
    /// Invalid index instance.
    pub const INVALID: Index = Index(usize::MAX);

    /// Create a valid index from a usize type. This constructor does the necessary check
    /// for debug builds only.
    #[inline]
    pub fn new(i: usize) -> Index {
        debug_assert!(Index::fits(i));
        Index(i)
    }

    /// Convert this `Index` into `Option<usize>`.
    #[inline]
    pub fn into_option(self) -> Option<usize> {
        self.into()
    }

    /// Returns true if this index is valid.
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    /// Apply a function to the inner `usize` index if it is valid.
    #[inline]
    pub fn if_valid<F: FnOnce(usize)>(self, f: F) {
        if self.is_valid() {
            f(self.0);
        }
    }

    /// Map the inner index. Invalid indices stay invalid.
    #[inline]
    pub fn map<F: FnOnce(usize) -> usize>(self, f: F) -> Index {
        if self.is_valid() {
            Index::new(f(self.0))
        } else {
            self
        }
    }

    /// Get the raw `usize` representation of this Index.
    #[inline]
    pub fn into_inner(self) -> usize {
        self.0
    }

    #[inline]
    fn fits(i: usize) -> bool {
        i != usize::MAX
    }
}

impl From<usize> for Index {
    #[inline]
    fn from(i: usize) -> Self {
        Index::new(i)
    }
}

impl From<Index> for Option<usize> {
    #[inline]
    fn from(val: Index) -> Self {
        if val.is_valid() {
            Some(val.0)
        } else {
            None
        }
    }
}

impl From<Option<usize>> for Index {
    #[inline]
    fn from(i: Option<usize>) -> Index {
        match i {
            Some(i) => Index::new(i),
            None => Index::INVALID,
        }
    }
}

impl Default for Index {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "invalid")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_validity() {
        let i = Index::new(2);
        let k = Index::INVALID;
        assert!(i.is_valid());
        assert!(!k.is_valid());
        assert_eq!(i.map(|x| x + 1), Index::new(3));
        assert_eq!(k.map(|x| x + 1), Index::INVALID);
        assert_eq!(i.into_option(), Some(2));
        assert_eq!(k.into_option(), None);
        assert_eq!(Index::from(None), Index::INVALID);
        assert_eq!(Index::default(), Index::INVALID);
    }

    #[test]
    fn index_slices_reinterpret_as_usize() {
        let map = vec![Index::new(0), Index::INVALID, Index::new(1)];
        let raw: &[usize] = bytemuck::cast_slice(map.as_slice());
        assert_eq!(raw, &[0, usize::MAX, 1]);
    }
}
