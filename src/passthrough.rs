use std::collections::HashMap;
use std::hash::{BuildHasher, Hasher};

/// Hash map that re-uses a key's precomputed u128 as its hash value.
pub(crate) type PassthroughHashMap<Key, Value> = HashMap<Key, Value, BuildPassthroughHasher>;

#[derive(Copy, Clone, Default)]
pub(crate) struct BuildPassthroughHasher;

#[derive(Default)]
pub(crate) struct PassthroughHasher {
    value: u64,
}

impl Hasher for PassthroughHasher {
    #[inline(always)]
    fn finish(&self) -> u64 {
        self.value
    }

    #[inline]
    fn write(&mut self, _bytes: &[u8]) {
        unimplemented!("composite keys only write their precomputed hash")
    }

    #[inline]
    fn write_u128(&mut self, i: u128) {
        // Fold both halves, the map only needs 64 bits.
        self.value = (i as u64) ^ ((i >> 64) as u64);
    }
}

impl BuildHasher for BuildPassthroughHasher {
    type Hasher = PassthroughHasher;

    #[inline]
    fn build_hasher(&self) -> PassthroughHasher {
        PassthroughHasher::default()
    }
}
