use thiserror::Error;

/// Errors returned when building Merkle trees or proofs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    /// A tree needs at least one leaf.
    #[error("merkle tree has no leaves")]
    EmptyTree,
    /// No leaf exists at the requested index.
    #[error("leaf {index} requested from a tree of {tree_size} leaves")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// Number of leaves in the tree.
        tree_size: usize,
    },
    /// The tree has more leaves than supported.
    #[error("merkle tree exceeds the maximum supported size")]
    TooLarge,
    /// Computing the node count overflowed.
    #[error("merkle tree size calculation overflowed")]
    SizeCalculationOverflow,
}
