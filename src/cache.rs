//! The record data cache.
//!
//! Record data is assembled into reusable blocks of the maximum record
//! data size that live in a ring owned by the caller. Each finished record
//! hands the sink a reference into the current block; the index the sink
//! returns names the block the parser writes the *next* record into. With
//! a ring of two blocks and alternating indices, a sink thus gets a full
//! record of look-behind: the data delivered last is untouched until the
//! sink hands its block back.

/// The maximum size of record data in octets.
pub(crate) const MAX_RDATA: usize = 65535;

//------------ Cache ---------------------------------------------------------

/// A ring of reusable record data blocks.
#[derive(Debug)]
pub struct Cache {
    blocks: Vec<Vec<u8>>,
}

impl Cache {
    /// Creates a cache with the given number of blocks.
    ///
    /// A parse needs at least one block; passing a cache of size zero to
    /// the parser fails the parse.
    pub fn new(size: usize) -> Self {
        Cache {
            blocks: (0..size).map(|_| Vec::new()).collect(),
        }
    }

    /// Returns the number of blocks in the cache.
    pub fn size(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the content of the block with the given index.
    pub(crate) fn block(&self, index: usize) -> &[u8] {
        &self.blocks[index]
    }

    /// Returns the block with the given index for assembling.
    pub(crate) fn block_mut(&mut self, index: usize) -> &mut Vec<u8> {
        &mut self.blocks[index]
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn blocks_are_independent() {
        let mut cache = Cache::new(2);
        cache.block_mut(0).extend_from_slice(b"first");
        cache.block_mut(1).extend_from_slice(b"second");
        assert_eq!(cache.block(0), b"first");
        assert_eq!(cache.block(1), b"second");
        cache.block_mut(1).clear();
        assert_eq!(cache.block(0), b"first");
    }
}
