//! Strongly typed, zero-cost identifier wrappers.
//!
//! Two id spaces exist side by side:
//!
//! - [`NodeId`] is the sparse 64-bit identifier a node carries in the source
//!   map data (OSM ids routinely exceed `u32::MAX`).
//! - [`DenseIdx`] is the compact `0..N-1` position assigned by
//!   `Graph::build_index`, used to index the array-backed search state.
//!
//! Both are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// `false` only for the `INVALID` sentinel.
            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Identifier of a road-network node as it appears in the source map.
    pub struct NodeId(i64);
}

typed_id! {
    /// Compact position of a node in the dense index built by
    /// `Graph::build_index`.  Only meaningful for the index that produced it.
    pub struct DenseIdx(u32);
}

impl DenseIdx {
    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<DenseIdx> for usize {
    #[inline(always)]
    fn from(idx: DenseIdx) -> usize {
        idx.0 as usize
    }
}

impl TryFrom<usize> for DenseIdx {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<DenseIdx, Self::Error> {
        u32::try_from(n).map(DenseIdx)
    }
}

impl From<i64> for NodeId {
    #[inline(always)]
    fn from(raw: i64) -> NodeId {
        NodeId(raw)
    }
}
