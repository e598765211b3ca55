//! Ancestor lookup over block index records.
//!
//! The PoW engine never follows stored links between blocks. It asks a
//! [`ChainView`] for the ancestor at a given depth, which keeps traversal
//! order identical to a predecessor walk while leaving ownership of the
//! records with the chain index.

use crate::types::{BlockIndexNode, CoreError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Read-only ancestor lookup provided by the chain index.
pub trait ChainView {
    /// Returns the ancestor of `node` that lies `depth` blocks below it.
    ///
    /// Depth 0 is `node` itself. Returns `None` once the walk would leave the
    /// records the view holds.
    fn ancestor(&self, node: &BlockIndexNode, depth: u32) -> Option<&BlockIndexNode>;

    /// Returns the direct predecessor of `node`.
    fn predecessor(&self, node: &BlockIndexNode) -> Option<&BlockIndexNode> {
        self.ancestor(node, 1)
    }

    /// Returns the deepest ancestor of `node` the view holds.
    fn earliest<'a>(&'a self, node: &'a BlockIndexNode) -> &'a BlockIndexNode {
        let mut cur = node;
        while let Some(prev) = self.predecessor(cur) {
            cur = prev;
        }
        cur
    }
}

/// A contiguous run of block index records addressed by height.
///
/// `blocks[i]` has height `base_height + i`. The first record has no
/// predecessor in the view even if the real chain continues below it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SnapshotRecords", into = "SnapshotRecords"))]
pub struct ChainSnapshot {
    base_height: u32,
    blocks: Vec<BlockIndexNode>,
}

impl ChainSnapshot {
    /// Creates an empty snapshot whose first record will sit at `base_height`.
    pub fn new(base_height: u32) -> Self {
        Self {
            base_height,
            blocks: Vec::new(),
        }
    }

    /// Builds a snapshot from records ordered oldest to newest.
    pub fn from_blocks(blocks: Vec<BlockIndexNode>) -> Result<Self, CoreError> {
        let base_height = blocks.first().map(|b| b.height).unwrap_or(0);
        let mut snapshot = Self::new(base_height);
        for block in blocks {
            snapshot.push(block)?;
        }
        Ok(snapshot)
    }

    /// Appends a record; its height must extend the run by exactly one.
    pub fn push(&mut self, block: BlockIndexNode) -> Result<(), CoreError> {
        let expected = self.next_height()?;
        if block.height != expected {
            return Err(CoreError::NonContiguousHeight {
                expected,
                got: block.height,
            });
        }
        self.blocks.push(block);
        Ok(())
    }

    /// Height the next pushed record must carry.
    pub fn next_height(&self) -> Result<u32, CoreError> {
        let len = u32::try_from(self.blocks.len())
            .map_err(|_| CoreError::InvalidValue("snapshot longer than u32 heights"))?;
        self.base_height
            .checked_add(len)
            .ok_or(CoreError::InvalidValue("block height overflow"))
    }

    /// Record at `height`, if held.
    pub fn get(&self, height: u32) -> Option<&BlockIndexNode> {
        let idx = height.checked_sub(self.base_height)?;
        self.blocks.get(idx as usize)
    }

    /// Newest record.
    pub fn tip(&self) -> Option<&BlockIndexNode> {
        self.blocks.last()
    }

    /// Height of the oldest record.
    pub fn base_height(&self) -> u32 {
        self.base_height
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True if no records are held.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Records ordered oldest to newest.
    pub fn blocks(&self) -> &[BlockIndexNode] {
        &self.blocks
    }
}

impl ChainView for ChainSnapshot {
    fn ancestor(&self, node: &BlockIndexNode, depth: u32) -> Option<&BlockIndexNode> {
        let height = node.height.checked_sub(depth)?;
        self.get(height)
    }
}

/// On-disk shape of a [`ChainSnapshot`]: a plain list of records.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct SnapshotRecords {
    blocks: Vec<BlockIndexNode>,
}

#[cfg(feature = "serde")]
impl TryFrom<SnapshotRecords> for ChainSnapshot {
    type Error = CoreError;

    fn try_from(value: SnapshotRecords) -> Result<Self, Self::Error> {
        ChainSnapshot::from_blocks(value.blocks)
    }
}

#[cfg(feature = "serde")]
impl From<ChainSnapshot> for SnapshotRecords {
    fn from(value: ChainSnapshot) -> Self {
        SnapshotRecords {
            blocks: value.blocks,
        }
    }
}
