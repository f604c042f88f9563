//! Merkle accumulator over message hashes.
//!
//! Layers are reduced pairwise from left to right. Pairs are hashed in sorted order
//! (`keccak256(min(a, b) ‖ max(a, b))`), so a proof is just the list of siblings from the leaf up
//! to the root and carries no position bits. An unpaired node at the end of a layer is promoted to
//! the next layer unchanged, it is never duplicated or padded.

use crate::error::MerkleError;
use alloy::primitives::{B256, keccak256};

/// Maximum supported tree size to prevent overflow
#[cfg(target_pointer_width = "64")]
const MAX_TREE_SIZE: usize = 1 << 30;

#[cfg(target_pointer_width = "32")]
const MAX_TREE_SIZE: usize = 1 << 20;

/// A Merkle tree stored as a single allocation of all its layers.
///
/// Layer `0` holds the leaves, the last node of the allocation is the root. Internal layers are
/// computed on first access to [`MerkleTree::root`] or [`MerkleTree::proof`].
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// Single allocation containing all tree nodes
    nodes: Vec<B256>,
    /// Number of leaves in the tree
    leaf_count: usize,
    /// Whether the tree has been computed
    computed: bool,
    /// Size of every layer, leaves first, root last
    layer_sizes: Vec<usize>,
    /// Offset of every layer inside `nodes`
    layer_offsets: Vec<usize>,
}

#[allow(clippy::len_without_is_empty)]
impl MerkleTree {
    /// Creates a tree from an ordered sequence of leaves.
    pub fn from_leaves<I>(leaves: I) -> Result<Self, MerkleError>
    where
        I: IntoIterator<Item = B256>,
    {
        let mut nodes: Vec<B256> = leaves.into_iter().collect();
        let leaf_count = nodes.len();
        if leaf_count == 0 {
            return Err(MerkleError::EmptyTree);
        }
        if leaf_count > MAX_TREE_SIZE {
            return Err(MerkleError::TooLarge);
        }

        let (layer_sizes, total_nodes) = Self::calculate_layer_sizes_and_total(leaf_count)?;
        let layer_offsets = Self::calculate_layer_offsets(&layer_sizes);
        nodes.resize(total_nodes, B256::ZERO);

        Ok(Self { nodes, leaf_count, computed: false, layer_sizes, layer_offsets })
    }

    fn ensure_computed(&mut self) {
        if self.computed {
            return;
        }

        let mut hash_buffer = [0u8; 64];
        for layer in 0..self.height() {
            let size = self.layer_sizes[layer];
            let read = self.layer_offsets[layer];
            let write = self.layer_offsets[layer + 1];

            for i in 0..size / 2 {
                let (left, right) = (self.nodes[read + 2 * i], self.nodes[read + 2 * i + 1]);
                self.nodes[write + i] = hash_pair(&left, &right, &mut hash_buffer);
            }

            // promote the unpaired node
            if size & 1 == 1 {
                self.nodes[write + size / 2] = self.nodes[read + size - 1];
            }
        }

        self.computed = true;
    }

    /// Number of leaves.
    #[inline]
    pub fn len(&self) -> usize {
        self.leaf_count
    }

    /// Number of reductions between the leaves and the root. A single leaf has height 0.
    #[inline]
    pub fn height(&self) -> usize {
        self.layer_sizes.len() - 1
    }

    /// The leaves, in insertion order.
    #[inline]
    pub fn leaves(&self) -> &[B256] {
        &self.nodes[..self.leaf_count]
    }

    /// Returns the root, computing the internal layers if needed.
    pub fn root(&mut self) -> B256 {
        self.ensure_computed();
        self.nodes[self.nodes.len() - 1]
    }

    /// Returns the sibling path for the leaf at `index`.
    ///
    /// Layers where the node is promoted without a partner contribute no sibling, so the proof
    /// for a single-leaf tree is empty.
    pub fn proof(&mut self, index: usize) -> Result<Vec<B256>, MerkleError> {
        if index >= self.leaf_count {
            return Err(MerkleError::IndexOutOfBounds { index, tree_size: self.leaf_count });
        }

        self.ensure_computed();

        let mut proof = Vec::with_capacity(self.height());
        let mut current = index;
        for layer in 0..self.height() {
            let sibling = current ^ 1;
            if sibling < self.layer_sizes[layer] {
                proof.push(self.nodes[self.layer_offsets[layer] + sibling]);
            }
            current /= 2;
        }

        Ok(proof)
    }

    /// Verifies that `leaf` folds into `root` along `proof`.
    #[inline]
    pub fn verify_proof(root: &B256, proof: &[B256], leaf: &B256) -> bool {
        let mut hash_buffer = [0u8; 64];
        let folded =
            proof.iter().fold(*leaf, |acc, sibling| hash_pair(&acc, sibling, &mut hash_buffer));
        *root == folded
    }

    fn calculate_layer_offsets(layer_sizes: &[usize]) -> Vec<usize> {
        layer_sizes
            .iter()
            .scan(0usize, |offset, size| {
                let current = *offset;
                *offset += size;
                Some(current)
            })
            .collect()
    }

    /// Sizes of every layer including the root layer, and the total node count.
    fn calculate_layer_sizes_and_total(
        leaf_count: usize,
    ) -> Result<(Vec<usize>, usize), MerkleError> {
        let mut layer_sizes = vec![leaf_count];
        let mut current = leaf_count;
        let mut total = leaf_count;

        while current > 1 {
            current = current.div_ceil(2);
            total = total.saturating_add(current);
            if total > MAX_TREE_SIZE * 2 {
                return Err(MerkleError::SizeCalculationOverflow);
            }
            layer_sizes.push(current);
        }

        Ok((layer_sizes, total))
    }
}

/// Computes the root over an ordered, non-empty list of leaves.
///
/// A single leaf is its own root.
pub fn compute_root(leaves: &[B256]) -> Result<B256, MerkleError> {
    Ok(MerkleTree::from_leaves(leaves.iter().copied())?.root())
}

/// Returns true if `leaf` is included under `root` with the given sibling path.
pub fn verify(leaf: B256, siblings: &[B256], root: B256) -> bool {
    MerkleTree::verify_proof(&root, siblings, &leaf)
}

/// Hashes two nodes together in ascending order.
#[inline(always)]
fn hash_pair(left: &B256, right: &B256, buffer: &mut [u8; 64]) -> B256 {
    let (first, second) = if left < right { (left, right) } else { (right, left) };

    buffer[..32].copy_from_slice(first.as_ref());
    buffer[32..].copy_from_slice(second.as_ref());

    keccak256(buffer)
}
